//! Registry configuration, loaded from caller-supplied YAML.
//!
//! ```yaml
//! strict_edges: true
//! risk:
//!   candidate_threshold: 0.3
//! ```

use serde::{Deserialize, Serialize};

use chronos_risk::RiskConfig;

use crate::error::RegistryError;

/// Top-level configuration of a [`Registry`](crate::Registry).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Reject edges whose endpoints are not registered entities.
    pub strict_edges: bool,
    /// Scoring policy.
    pub risk: RiskConfig,
}

impl RegistryConfig {
    /// Parse a YAML document; unspecified fields keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RegistryError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| RegistryError::Config(e.to_string()))?;
        config.risk.validate()?;
        Ok(config)
    }
}
