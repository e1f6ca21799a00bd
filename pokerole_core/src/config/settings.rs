//! Session settings read by the resolver

use serde::{Deserialize, Serialize};

/// Attribute that backs Special Defense
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialDefenseStat {
    #[default]
    Vitality,
    Insight,
}

/// Host settings for one combat session
///
/// Constructed once per session and never changed while a resolver holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub special_defense_stat: SpecialDefenseStat,
    /// Track action counters and per-round clash/evade/move usage
    #[serde(default = "default_true")]
    pub round_resource_automation: bool,
    /// Disables custom move effects
    #[serde(default)]
    pub recovery_mode: bool,
    /// Skip defeated combatants when advancing turns
    #[serde(default = "default_true")]
    pub skip_defeated: bool,
    /// Add Insight to max HP
    #[serde(default)]
    pub hp_insight_bonus: bool,
}

fn default_true() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            special_defense_stat: SpecialDefenseStat::Vitality,
            round_resource_automation: true,
            recovery_mode: false,
            skip_defeated: true,
            hp_insight_bonus: false,
        }
    }
}
