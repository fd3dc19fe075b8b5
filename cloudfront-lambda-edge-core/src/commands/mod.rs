//! Commands module - transformation steps and the service that sequences them

mod bind;
mod role;
pub(crate) mod service;

pub use bind::bind_association;
pub use role::{augment_execution_role, RoleOutcome};
pub use service::TemplateTransformer;
