//! Execution role changes required by Lambda@Edge

use crate::error::{EdgeAssociationError, EdgeAssociationResult};
use crate::logging::LogSink;
use crate::synthesis::build_edge_log_statement;
use crate::template::iam::{allow_edge_lambda, RoleProperties, EXECUTION_ROLE_LOGICAL_ID};
use crate::template::Template;

/// What [`augment_execution_role`] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleOutcome {
    pub role_found: bool,
    pub trust_statements_updated: usize,
}

/// Lets Lambda@Edge assume the execution role and grants it log permissions.
///
/// Every trust statement that trusts `lambda.amazonaws.com` but not
/// `edgelambda.amazonaws.com` gets the edge principal appended. One log
/// permissions statement is then appended to the first inline policy, whether
/// or not any trust statement changed. Calling this twice appends twice.
///
/// A template without an execution role is only warned about.
pub fn augment_execution_role(
    template: &mut Template,
    log: &mut dyn LogSink,
) -> EdgeAssociationResult<RoleOutcome> {
    let Some(role) = template.resources.get_mut(EXECUTION_ROLE_LOGICAL_ID) else {
        log.warn(
            "WARNING: no IAM role for Lambda execution found - can not modify assume role policy",
        );
        return Ok(RoleOutcome::default());
    };

    let mut properties: RoleProperties = role.typed_properties(EXECUTION_ROLE_LOGICAL_ID)?;

    let mut updated = 0;
    for statement in &mut properties.assume_role_policy.statements {
        if allow_edge_lambda(statement) {
            updated += 1;
            log.info("Updated Lambda assume role policy to allow Lambda@Edge to assume the role");
        }
    }

    if updated == 0 {
        log.warn(
            "WARNING: was unable to update the Lambda assume role policy to allow Lambda@Edge to assume the role",
        );
    }

    let policy = properties
        .policies
        .first_mut()
        .ok_or_else(|| EdgeAssociationError::MissingInlinePolicy(EXECUTION_ROLE_LOGICAL_ID.to_string()))?;
    let log_statement = serde_json::to_value(build_edge_log_statement())
        .map_err(|e| EdgeAssociationError::malformed(EXECUTION_ROLE_LOGICAL_ID, e))?;
    policy.document.statements.push(log_statement);

    role.set_typed_properties(EXECUTION_ROLE_LOGICAL_ID, &properties)?;

    Ok(RoleOutcome {
        role_found: true,
        trust_statements_updated: updated,
    })
}
