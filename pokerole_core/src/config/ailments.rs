//! Ailment configuration loading

use super::ConfigError;
use crate::ailment::{AilmentConfig, AilmentRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Container for ailment configurations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AilmentsConfig {
    /// Start from the standard ailments and override only the listed ones
    #[serde(default)]
    pub extend_defaults: bool,
    #[serde(rename = "ailments", default)]
    pub ailments: Vec<AilmentConfig>,
}

impl AilmentsConfig {
    fn into_registry(self) -> Result<AilmentRegistry, ConfigError> {
        let mut registry = if self.extend_defaults {
            AilmentRegistry::with_defaults()
        } else {
            AilmentRegistry::new()
        };
        for ailment in self.ailments {
            if ailment.round_damage < 0 {
                return Err(ConfigError::ValidationError(format!(
                    "ailment {} has negative round damage {}",
                    ailment.kind, ailment.round_damage
                )));
            }
            registry.register(ailment);
        }
        Ok(registry)
    }
}

/// Load ailment configurations from a TOML file
pub fn load_ailment_configs(path: &Path) -> Result<AilmentRegistry, ConfigError> {
    let config: AilmentsConfig = super::load_toml(path)?;
    config.into_registry()
}

/// Load ailment configurations from a TOML string
pub fn parse_ailment_configs(content: &str) -> Result<AilmentRegistry, ConfigError> {
    let config: AilmentsConfig = super::parse_toml(content)?;
    config.into_registry()
}
