//! Input declarations and transformation results.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::logging::{Diagnostic, Severity};

/// Either a single value or an ordered list of values.
///
/// Serverless configuration lets users write one object where a list is also
/// accepted, so both shapes decode into this type and are flattened once via
/// [`OneOrMany::as_slice`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Uniform ordered view over the declared values.
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::One(value) => std::slice::from_ref(value),
            Self::Many(values) => values,
        }
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(values: Vec<T>) -> Self {
        Self::Many(values)
    }
}

/// The four CloudFront triggers a Lambda@Edge function can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    ViewerRequest,
    OriginRequest,
    ViewerResponse,
    OriginResponse,
}

impl EventType {
    pub const ALL: [EventType; 4] = [
        Self::ViewerRequest,
        Self::OriginRequest,
        Self::ViewerResponse,
        Self::OriginResponse,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ViewerRequest => "viewer-request",
            Self::OriginRequest => "origin-request",
            Self::ViewerResponse => "viewer-response",
            Self::OriginResponse => "origin-response",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared edge association of a function.
///
/// `event_type` stays a raw string here; it is checked by
/// [`crate::validate_event_type`] when the spec is bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationSpec {
    pub event_type: String,
    /// Logical id of the distribution to bind into. Without it the spec only
    /// stamps exports on the function's outputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_pattern: Option<String>,
}

impl AssociationSpec {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            distribution: None,
            path_pattern: None,
        }
    }

    #[must_use]
    pub fn with_distribution(mut self, distribution: impl Into<String>) -> Self {
        self.distribution = Some(distribution.into());
        self
    }

    #[must_use]
    pub fn with_path_pattern(mut self, path_pattern: impl Into<String>) -> Self {
        self.path_pattern = Some(path_pattern.into());
        self
    }
}

/// A function entry from the service definition. Only the edge declaration is
/// read; every other key is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    #[serde(
        rename = "lambdaAtEdge",
        alias = "edgeAssociation",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub edge_association: Option<OneOrMany<AssociationSpec>>,
}

impl FunctionDefinition {
    pub fn with_edge_association(specs: impl Into<OneOrMany<AssociationSpec>>) -> Self {
        Self {
            edge_association: Some(specs.into()),
        }
    }
}

impl From<AssociationSpec> for OneOrMany<AssociationSpec> {
    fn from(spec: AssociationSpec) -> Self {
        Self::One(spec)
    }
}

/// Declared functions in declaration order.
pub type FunctionDefinitions = IndexMap<String, FunctionDefinition>;

/// Record of one successfully bound spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingSummary {
    pub function: String,
    pub function_logical_id: String,
    pub event_type: EventType,
    /// Display form of the version reference that was bound.
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_pattern: Option<String>,
    pub removed_environment_variables: usize,
}

/// Everything a successful transformation reports besides the mutated template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformReport {
    pub role_found: bool,
    pub trust_statements_updated: usize,
    pub bindings: Vec<BindingSummary>,
    pub diagnostics: Vec<Diagnostic>,
}

impl TransformReport {
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }
}
