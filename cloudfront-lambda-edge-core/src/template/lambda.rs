//! Lambda function properties.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionProperties {
    #[serde(rename = "Environment", default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(rename = "Variables", default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Environment {
    fn is_empty(&self) -> bool {
        self.variables.is_none() && self.extra.is_empty()
    }
}

impl FunctionProperties {
    /// Number of environment variables that would be dropped for an edge deployment.
    pub fn environment_variable_count(&self) -> usize {
        self.environment
            .as_ref()
            .and_then(|env| env.variables.as_ref())
            .map_or(0, Map::len)
    }

    /// Removes a non-empty `Environment.Variables` map, then the `Environment`
    /// block itself if nothing else is left in it. Returns how many variables
    /// were removed.
    pub fn strip_environment_variables(&mut self) -> usize {
        let removed = self.environment_variable_count();
        if removed == 0 {
            return 0;
        }

        if let Some(env) = self.environment.as_mut() {
            env.variables = None;
            if env.is_empty() {
                self.environment = None;
            }
        }
        removed
    }
}
