//! CloudFront distribution properties and cache behavior lookup.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::EventType;

pub const DISTRIBUTION_RESOURCE_TYPE: &str = "AWS::CloudFront::Distribution";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionProperties {
    #[serde(rename = "DistributionConfig")]
    pub config: DistributionConfig,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Behaviors and their association lists stay opaque so conditional entries
/// (`Fn::If`) and fields this crate does not touch pass through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionConfig {
    #[serde(
        rename = "DefaultCacheBehavior",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub default_cache_behavior: Option<Value>,
    #[serde(rename = "CacheBehaviors", default, skip_serializing_if = "Option::is_none")]
    pub cache_behaviors: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LambdaFunctionAssociation {
    #[serde(rename = "EventType")]
    pub event_type: String,
    #[serde(rename = "LambdaFunctionARN")]
    pub lambda_function_arn: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LambdaFunctionAssociation {
    pub fn new(event_type: EventType, lambda_function_arn: Value) -> Self {
        Self {
            event_type: event_type.as_str().to_string(),
            lambda_function_arn,
            extra: Map::new(),
        }
    }
}

/// Which behavior of a distribution an association targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorSelector {
    Default,
    /// Index into `CacheBehaviors`.
    PathPattern(usize),
}

impl DistributionConfig {
    /// Locates the behavior for `path_pattern`, or the default behavior when
    /// no pattern is given. The first behavior with an equal pattern wins;
    /// entries that are not plain objects are skipped.
    pub fn select_behavior(&self, path_pattern: Option<&str>) -> Option<BehaviorSelector> {
        match path_pattern {
            None => self
                .default_cache_behavior
                .as_ref()
                .filter(|behavior| behavior.is_object())
                .map(|_| BehaviorSelector::Default),
            Some(pattern) => self
                .cache_behaviors
                .as_ref()
                .and_then(Value::as_array)?
                .iter()
                .position(|behavior| {
                    behavior.get("PathPattern").and_then(Value::as_str) == Some(pattern)
                })
                .map(BehaviorSelector::PathPattern),
        }
    }

    pub fn behavior_mut(
        &mut self,
        selector: BehaviorSelector,
    ) -> Option<&mut Map<String, Value>> {
        let behavior = match selector {
            BehaviorSelector::Default => self.default_cache_behavior.as_mut(),
            BehaviorSelector::PathPattern(index) => self
                .cache_behaviors
                .as_mut()
                .and_then(Value::as_array_mut)
                .and_then(|behaviors| behaviors.get_mut(index)),
        };
        behavior.and_then(Value::as_object_mut)
    }
}

/// Appends to a behavior's `LambdaFunctionAssociations`, creating the list
/// when absent. Existing entries are kept as they are.
///
/// Fails with a description when the existing value is not a list.
pub fn push_association(
    behavior: &mut Map<String, Value>,
    association: Value,
) -> Result<(), String> {
    let associations = behavior
        .entry("LambdaFunctionAssociations")
        .or_insert_with(|| Value::Array(Vec::new()));
    if !associations.is_array() {
        return Err(format!(
            "LambdaFunctionAssociations is not a list: {associations}"
        ));
    }
    if let Some(list) = associations.as_array_mut() {
        list.push(association);
    }
    Ok(())
}
