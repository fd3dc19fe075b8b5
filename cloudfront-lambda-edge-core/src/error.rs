//! Error types for template transformation.

use thiserror::Error;

/// Fatal configuration errors. Any of these aborts the whole transformation;
/// binds that already succeeded stay applied to the template.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EdgeAssociationError {
    /// The declared event type is not one of the four Lambda@Edge triggers.
    #[error("\"{event_type}\" is not a valid event type, must be one of: {allowed}")]
    InvalidEventType { event_type: String, allowed: String },

    /// The naming resolver produced a logical id with no matching resource.
    #[error("Could not find function resource '{logical_id}' for function '{function}'")]
    FunctionResourceNotFound {
        function: String,
        logical_id: String,
    },

    /// The version output is missing or its value is not a usable reference.
    #[error("Could not find output by name of: {0} or value from it to use version ARN")]
    VersionOutputNotFound(String),

    #[error("Could not find CloudFront distribution resource '{0}'")]
    DistributionNotFound(String),

    #[error("Resource '{logical_id}' has type '{found}', expected '{expected}'")]
    NotADistribution {
        logical_id: String,
        found: String,
        expected: String,
    },

    #[error("Distribution '{distribution}' has no cache behavior with path pattern '{path_pattern}'")]
    CacheBehaviorNotFound {
        distribution: String,
        path_pattern: String,
    },

    #[error("Distribution '{0}' has no DefaultCacheBehavior to associate with")]
    MissingDefaultCacheBehavior(String),

    /// The execution role has no inline policy to receive the log permissions.
    #[error("Role '{0}' has no inline policy to append the log permissions to")]
    MissingInlinePolicy(String),

    /// A resource's properties did not fit the shape expected for its kind.
    #[error("Malformed properties on resource '{logical_id}': {reason}")]
    MalformedResource { logical_id: String, reason: String },
}

pub type EdgeAssociationResult<T> = Result<T, EdgeAssociationError>;

impl EdgeAssociationError {
    pub(crate) fn malformed(logical_id: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedResource {
            logical_id: logical_id.into(),
            reason: reason.to_string(),
        }
    }
}
