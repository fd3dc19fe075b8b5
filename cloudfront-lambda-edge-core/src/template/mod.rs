//! Typed view of a compiled CloudFormation template.
//!
//! Only the parts this crate edits are modelled as fields. Every struct keeps
//! the keys it does not know about in a flattened `extra` map, so a template
//! survives a decode/encode cycle unchanged apart from the edits made here.

pub mod cloudfront;
pub mod iam;
pub mod lambda;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{EdgeAssociationError, EdgeAssociationResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(rename = "Resources", default)]
    pub resources: IndexMap<String, Resource>,
    #[serde(rename = "Outputs", default, skip_serializing_if = "IndexMap::is_empty")]
    pub outputs: IndexMap<String, Output>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Template {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "Type")]
    pub resource_type: String,
    /// `None` when the resource has no `Properties` key at all.
    #[serde(rename = "Properties", default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource {
    pub fn new(resource_type: impl Into<String>, properties: Map<String, Value>) -> Self {
        Self {
            resource_type: resource_type.into(),
            properties: Some(properties),
            extra: Map::new(),
        }
    }

    /// Decodes the properties block into the typed shape of this resource kind.
    pub fn typed_properties<T: DeserializeOwned>(
        &self,
        logical_id: &str,
    ) -> EdgeAssociationResult<T> {
        let properties = self.properties.clone().unwrap_or_default();
        serde_json::from_value(Value::Object(properties))
            .map_err(|e| EdgeAssociationError::malformed(logical_id, e))
    }

    /// Writes an encoded typed value back over the properties block.
    ///
    /// Keys keep the position they had in the template; keys the typed value
    /// adds go last.
    pub fn set_typed_properties<T: Serialize>(
        &mut self,
        logical_id: &str,
        properties: &T,
    ) -> EdgeAssociationResult<()> {
        match serde_json::to_value(properties) {
            Ok(Value::Object(map)) => {
                match self.properties.as_mut() {
                    Some(current) => merge_object(current, map),
                    None if map.is_empty() => {}
                    None => self.properties = Some(map),
                }
                Ok(())
            }
            Ok(other) => Err(EdgeAssociationError::malformed(
                logical_id,
                format!("properties encoded to a non-object value: {other}"),
            )),
            Err(e) => Err(EdgeAssociationError::malformed(logical_id, e)),
        }
    }
}

fn merge_object(current: &mut Map<String, Value>, updated: Map<String, Value>) {
    current.retain(|key, _| updated.contains_key(key));
    for (key, value) in updated {
        match current.get_mut(&key) {
            Some(slot) => merge_value(slot, value),
            None => {
                current.insert(key, value);
            }
        }
    }
}

fn merge_value(current: &mut Value, updated: Value) {
    match (current, updated) {
        (Value::Object(current), Value::Object(updated)) => merge_object(current, updated),
        (Value::Array(current), Value::Array(updated)) => {
            current.truncate(updated.len());
            let mut updated = updated.into_iter();
            for (slot, value) in current.iter_mut().zip(updated.by_ref()) {
                merge_value(slot, value);
            }
            current.extend(updated);
        }
        (slot, updated) => *slot = updated,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Export {
    #[serde(rename = "Name")]
    pub name: Value,
}

impl Export {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Value::String(name.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "Value")]
    pub value: Value,
    #[serde(rename = "Export", default, skip_serializing_if = "Option::is_none")]
    pub export: Option<Export>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Output {
    pub fn new(value: Value) -> Self {
        Self {
            description: None,
            value,
            export: None,
            extra: Map::new(),
        }
    }

    /// Resolves the output value to a version reference, if it holds one.
    pub fn version_reference(&self) -> Option<VersionRef> {
        VersionRef::from_value(&self.value)
    }
}

/// Reference to an immutable function version, as found in a version output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRef {
    /// `{"Ref": "<logical id of an AWS::Lambda::Version>"}`
    Logical(String),
    /// A literal version ARN.
    Literal(String),
}

impl VersionRef {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) if map.len() == 1 => map
                .get("Ref")
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty())
                .map(|id| Self::Logical(id.to_string())),
            Value::String(arn) if !arn.is_empty() => Some(Self::Literal(arn.clone())),
            _ => None,
        }
    }

    /// Value to place in a `LambdaFunctionARN` field.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Logical(id) => serde_json::json!({ "Ref": id }),
            Self::Literal(arn) => Value::String(arn.clone()),
        }
    }
}

impl fmt::Display for VersionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Logical(id) => write!(f, "{{\"Ref\":\"{id}\"}}"),
            Self::Literal(arn) => f.write_str(arn),
        }
    }
}
