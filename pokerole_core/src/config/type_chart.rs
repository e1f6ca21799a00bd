//! Type chart loading
//!
//! Rows are keyed by defending type:
//!
//! ```toml
//! extend_defaults = true
//!
//! [types.normal]
//! weak = ["fighting"]
//! immune = ["ghost"]
//! ```

use super::ConfigError;
use crate::matchup::{TypeChart, TypeMatchups};
use crate::types::PokemonType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Type chart rows read from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeChartConfig {
    /// Start from the standard chart and replace only the listed rows
    #[serde(default)]
    pub extend_defaults: bool,
    #[serde(default)]
    pub types: BTreeMap<String, TypeMatchups>,
}

impl TypeChartConfig {
    fn into_chart(self) -> Result<TypeChart, ConfigError> {
        let mut chart = if self.extend_defaults {
            TypeChart::with_defaults()
        } else {
            TypeChart::empty()
        };
        for (name, row) in self.types {
            let defending: PokemonType = name
                .parse()
                .map_err(|_| ConfigError::ValidationError(format!("unknown type: {}", name)))?;
            if let Some(attacking) = conflicting_entry(&row) {
                return Err(ConfigError::ValidationError(format!(
                    "{} appears in more than one list for {}",
                    attacking, defending
                )));
            }
            chart.set_matchups(defending, row);
        }
        Ok(chart)
    }
}

/// An attacking type listed as more than one of weak, resist and immune
fn conflicting_entry(row: &TypeMatchups) -> Option<PokemonType> {
    let lists = [&row.weak, &row.resist, &row.immune];
    lists.iter().enumerate().find_map(|(i, list)| {
        list.iter()
            .find(|t| lists[i + 1..].iter().any(|other| other.contains(t)))
            .copied()
    })
}

/// Load a type chart from a TOML file
pub fn load_type_chart(path: &Path) -> Result<TypeChart, ConfigError> {
    let config: TypeChartConfig = super::load_toml(path)?;
    config.into_chart()
}

/// Load a type chart from a TOML string
pub fn parse_type_chart(content: &str) -> Result<TypeChart, ConfigError> {
    let config: TypeChartConfig = super::parse_toml(content)?;
    config.into_chart()
}
