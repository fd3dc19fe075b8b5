//! This crate provides the core logic for attaching Lambda@Edge functions to
//! CloudFront distributions inside a compiled CloudFormation template:
//! - Execution role trust and log permission updates
//! - Event type validation
//! - Environment variable stripping and cache behavior association binding
//! - Export-only output stamping when no distribution is named
//!

pub mod commands;
mod error;
mod logging;
mod naming;
mod synthesis;
pub mod template;
mod types;
mod validation;

// Re-exports for a small, focused public API
pub use commands::{augment_execution_role, bind_association, RoleOutcome, TemplateTransformer};
pub use error::{EdgeAssociationError, EdgeAssociationResult};
pub use logging::{Diagnostic, LogFacadeSink, LogSink, Severity};
pub use naming::{NamingResolver, ServerlessNaming, StageProvider};
pub use synthesis::{build_edge_log_statement, EDGE_LOG_ACTIONS, EDGE_LOG_RESOURCE};
pub use template::{Output, Resource, Template, VersionRef};
pub use types::{
    AssociationSpec, BindingSummary, EventType, FunctionDefinition, FunctionDefinitions,
    OneOrMany, TransformReport,
};
pub use validation::validate_event_type;
