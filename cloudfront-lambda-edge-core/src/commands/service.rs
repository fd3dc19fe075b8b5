//! Template transformation service
//!
//! Entry point used by adapters (CLI, host plugins). The transformer holds the
//! host-provided naming and stage collaborators and runs the role update once
//! followed by one bind per declared association.

use crate::error::EdgeAssociationResult;
use crate::logging::{Diagnostics, LogSink};
use crate::naming::{NamingResolver, StageProvider};
use crate::template::Template;
use crate::types::{FunctionDefinitions, TransformReport};

use super::bind::bind_association;
use super::role::augment_execution_role;

pub struct TemplateTransformer<'a> {
    naming: &'a dyn NamingResolver,
    stage: &'a dyn StageProvider,
}

impl<'a> TemplateTransformer<'a> {
    pub fn new(naming: &'a dyn NamingResolver, stage: &'a dyn StageProvider) -> Self {
        Self { naming, stage }
    }

    /// Applies every declared edge association to `template` in place.
    ///
    /// Functions are processed in declaration order, and each function's specs
    /// in the order they were listed. Functions without an edge declaration are
    /// skipped. The first error stops the run; changes made by earlier binds
    /// are not rolled back. Notices go to `log` as they happen and are also
    /// returned in the report.
    pub fn transform(
        &self,
        template: &mut Template,
        functions: &FunctionDefinitions,
        log: &mut dyn LogSink,
    ) -> EdgeAssociationResult<TransformReport> {
        let mut diagnostics = Diagnostics::new(log);

        let role = augment_execution_role(template, &mut diagnostics)?;

        let mut bindings = Vec::new();
        for (function_name, definition) in functions {
            let Some(specs) = &definition.edge_association else {
                continue;
            };
            for spec in specs.as_slice() {
                bindings.push(bind_association(
                    template,
                    function_name,
                    spec,
                    self.naming,
                    self.stage,
                    &mut diagnostics,
                )?);
            }
        }

        Ok(TransformReport {
            role_found: role.role_found,
            trust_statements_updated: role.trust_statements_updated,
            bindings,
            diagnostics: diagnostics.into_entries(),
        })
    }
}
