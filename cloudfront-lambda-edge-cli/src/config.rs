//! Service definition loading and stage resolution.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use cloudfront_lambda_edge_core::FunctionDefinitions;
use serde::Deserialize;

/// Stage used when neither the command line nor the service file names one.
pub const DEFAULT_STAGE: &str = "dev";

/// The parts of a `serverless.yml` (or its JSON equivalent) this tool reads.
#[derive(Debug, Default, Deserialize)]
pub struct ServiceDefinition {
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub functions: FunctionDefinitions,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub stage: Option<String>,
}

impl ServiceDefinition {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read service definition {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse service definition {}", path.display()))
    }

    /// YAML is a superset of JSON, so both formats go through `serde_yaml`.
    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Command line first, then `provider.stage`, then [`DEFAULT_STAGE`].
    pub fn resolve_stage(&self, cli_stage: Option<&str>) -> String {
        cli_stage
            .or(self.provider.stage.as_deref())
            .unwrap_or(DEFAULT_STAGE)
            .to_string()
    }
}
