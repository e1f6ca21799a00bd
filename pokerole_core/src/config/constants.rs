//! Game constants configuration

use serde::{Deserialize, Serialize};

/// Tunable rule constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConstants {
    /// Added to the damage pool when the move shares a type with its user
    #[serde(default = "default_stab_bonus")]
    pub stab_bonus: i32,
    /// Added to the damage pool on a critical hit
    #[serde(default = "default_crit_bonus")]
    pub crit_bonus: i32,
    /// Max Will is Insight plus this value
    #[serde(default = "default_max_will_bonus")]
    pub max_will_bonus: i32,
    #[serde(default = "default_paralysis_dexterity_decrease")]
    pub paralysis_dexterity_decrease: i32,
    #[serde(default = "default_burn_strength_decrease")]
    pub burn_strength_decrease: i32,
    #[serde(default = "default_frozen_special_decrease")]
    pub frozen_special_decrease: i32,
    /// Maximum actions per round
    #[serde(default = "default_max_actions")]
    pub max_actions: i32,
    /// Will spent to ignore a pain penalty
    #[serde(default = "default_will_to_ignore_pain")]
    pub will_to_ignore_pain: i32,
    #[serde(default)]
    pub heal: HealConstants,
}

impl Default for GameConstants {
    fn default() -> Self {
        GameConstants {
            stab_bonus: default_stab_bonus(),
            crit_bonus: default_crit_bonus(),
            max_will_bonus: default_max_will_bonus(),
            paralysis_dexterity_decrease: default_paralysis_dexterity_decrease(),
            burn_strength_decrease: default_burn_strength_decrease(),
            frozen_special_decrease: default_frozen_special_decrease(),
            max_actions: default_max_actions(),
            will_to_ignore_pain: default_will_to_ignore_pain(),
            heal: HealConstants::default(),
        }
    }
}

fn default_stab_bonus() -> i32 {
    1
}
fn default_crit_bonus() -> i32 {
    2
}
fn default_max_will_bonus() -> i32 {
    2
}
fn default_paralysis_dexterity_decrease() -> i32 {
    2
}
fn default_burn_strength_decrease() -> i32 {
    1
}
fn default_frozen_special_decrease() -> i32 {
    2
}
fn default_max_actions() -> i32 {
    5
}
fn default_will_to_ignore_pain() -> i32 {
    1
}

/// Regular and lethal damage healed by one heal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealAmount {
    pub regular: i32,
    #[serde(default)]
    pub lethal: i32,
}

/// Heal amounts for basic and complete heals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealConstants {
    pub basic: HealAmount,
    pub complete: HealAmount,
}

impl Default for HealConstants {
    fn default() -> Self {
        HealConstants {
            basic: HealAmount { regular: 3, lethal: 0 },
            complete: HealAmount { regular: 5, lethal: 5 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let constants = GameConstants::default();
        assert_eq!(constants.stab_bonus, 1);
        assert_eq!(constants.crit_bonus, 2);
        assert_eq!(constants.max_actions, 5);
        assert_eq!(constants.heal.basic.regular, 3);
    }

    #[test]
    fn test_parse_partial_constants() {
        let toml = r#"
crit_bonus = 3
max_actions = 4

[heal]
basic = { regular = 2 }
complete = { regular = 6, lethal = 6 }
"#;

        let constants: GameConstants = toml::from_str(toml).unwrap();
        assert_eq!(constants.crit_bonus, 3);
        assert_eq!(constants.max_actions, 4);
        // Unspecified fields keep their defaults
        assert_eq!(constants.stab_bonus, 1);
        assert_eq!(constants.paralysis_dexterity_decrease, 2);
        assert_eq!(constants.heal.basic.lethal, 0);
        assert_eq!(constants.heal.complete.regular, 6);
    }
}
