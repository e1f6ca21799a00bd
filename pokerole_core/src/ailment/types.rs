//! Ailment type definitions

use crate::types::{CombatantId, PokemonType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every ailment a combatant can suffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AilmentKind {
    Fainted,
    Paralysis,
    Frozen,
    Poison,
    BadlyPoisoned,
    Sleep,
    Burn1,
    Burn2,
    Burn3,
    Confused,
    Disabled,
    Flinch,
    Infatuated,
}

impl AilmentKind {
    pub fn all() -> &'static [AilmentKind] {
        use AilmentKind::*;
        &[
            Fainted,
            Paralysis,
            Frozen,
            Poison,
            BadlyPoisoned,
            Sleep,
            Burn1,
            Burn2,
            Burn3,
            Confused,
            Disabled,
            Flinch,
            Infatuated,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AilmentKind::Fainted => "fainted",
            AilmentKind::Paralysis => "paralysis",
            AilmentKind::Frozen => "frozen",
            AilmentKind::Poison => "poison",
            AilmentKind::BadlyPoisoned => "badlyPoisoned",
            AilmentKind::Sleep => "sleep",
            AilmentKind::Burn1 => "burn1",
            AilmentKind::Burn2 => "burn2",
            AilmentKind::Burn3 => "burn3",
            AilmentKind::Confused => "confused",
            AilmentKind::Disabled => "disabled",
            AilmentKind::Flinch => "flinch",
            AilmentKind::Infatuated => "infatuated",
        }
    }

    /// Display label used in announcements
    pub fn label(&self) -> &'static str {
        match self {
            AilmentKind::Fainted => "Fainted",
            AilmentKind::Paralysis => "Paralysis",
            AilmentKind::Frozen => "Frozen Solid",
            AilmentKind::Poison => "Poison",
            AilmentKind::BadlyPoisoned => "Badly Poisoned",
            AilmentKind::Sleep => "Sleep",
            AilmentKind::Burn1 => "1st Degree Burn",
            AilmentKind::Burn2 => "2nd Degree Burn",
            AilmentKind::Burn3 => "3rd Degree Burn",
            AilmentKind::Confused => "Confused",
            AilmentKind::Disabled => "Disabled",
            AilmentKind::Flinch => "Flinch",
            AilmentKind::Infatuated => "Infatuated",
        }
    }

    /// Mutual-exclusion family this kind belongs to, if any
    pub fn family(&self) -> Option<AilmentFamily> {
        match self {
            AilmentKind::Burn1 | AilmentKind::Burn2 | AilmentKind::Burn3 => {
                Some(AilmentFamily::Burn)
            }
            AilmentKind::Poison | AilmentKind::BadlyPoisoned => Some(AilmentFamily::Poison),
            _ => None,
        }
    }
}

impl fmt::Display for AilmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AilmentKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AilmentKind::all()
            .iter()
            .copied()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

/// Group of ailments of which a combatant holds at most one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AilmentFamily {
    Burn,
    Poison,
}

impl AilmentFamily {
    /// Members in order of increasing severity
    pub fn members(&self) -> &'static [AilmentKind] {
        match self {
            AilmentFamily::Burn => &[AilmentKind::Burn1, AilmentKind::Burn2, AilmentKind::Burn3],
            AilmentFamily::Poison => &[AilmentKind::Poison, AilmentKind::BadlyPoisoned],
        }
    }
}

/// An ailment held by a combatant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ailment {
    #[serde(rename = "type")]
    pub kind: AilmentKind,
    /// Move blocked by `disabled`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_uuid: Option<String>,
    /// Combatant a Pokémon is `infatuated` with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inflicted_by_uuid: Option<CombatantId>,
}

impl Ailment {
    pub fn new(kind: AilmentKind) -> Self {
        Ailment {
            kind,
            move_uuid: None,
            inflicted_by_uuid: None,
        }
    }
}

/// Kind-specific data supplied when inflicting an ailment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AilmentExtra {
    pub move_uuid: Option<String>,
    pub inflicted_by_uuid: Option<CombatantId>,
}

impl AilmentExtra {
    pub fn disabling(move_uuid: impl Into<String>) -> Self {
        AilmentExtra {
            move_uuid: Some(move_uuid.into()),
            inflicted_by_uuid: None,
        }
    }

    pub fn infatuated_with(source: impl Into<CombatantId>) -> Self {
        AilmentExtra {
            move_uuid: None,
            inflicted_by_uuid: Some(source.into()),
        }
    }
}

/// Rules for one ailment kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AilmentConfig {
    pub kind: AilmentKind,
    /// Display name
    pub name: String,
    /// Volatile ailments clear automatically when the encounter ends
    #[serde(default)]
    pub volatile: bool,
    /// Cleared at the end of every round
    #[serde(default)]
    pub clears_at_round_end: bool,
    /// Damage dealt in the end-of-round sweep
    #[serde(default)]
    pub round_damage: i32,
    /// Types that cannot receive this ailment
    #[serde(default)]
    pub immune_types: Vec<PokemonType>,
}

impl AilmentConfig {
    pub fn new(kind: AilmentKind) -> Self {
        AilmentConfig {
            kind,
            name: kind.label().to_string(),
            volatile: false,
            clears_at_round_end: false,
            round_damage: 0,
            immune_types: Vec::new(),
        }
    }

    pub fn volatile(mut self) -> Self {
        self.volatile = true;
        self
    }

    pub fn round_damage(mut self, damage: i32) -> Self {
        self.round_damage = damage;
        self
    }

    pub fn immune(mut self, types: &[PokemonType]) -> Self {
        self.immune_types = types.to_vec();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_families() {
        assert_eq!(AilmentKind::Burn2.family(), Some(AilmentFamily::Burn));
        assert_eq!(AilmentKind::BadlyPoisoned.family(), Some(AilmentFamily::Poison));
        assert_eq!(AilmentKind::Flinch.family(), None);
        assert!(AilmentFamily::Burn.members().contains(&AilmentKind::Burn3));
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("badlypoisoned".parse(), Ok(AilmentKind::BadlyPoisoned));
        assert_eq!("burn1".parse(), Ok(AilmentKind::Burn1));
        assert!("sunburn".parse::<AilmentKind>().is_err());
    }

    #[test]
    fn test_ailment_record_serialization() {
        let mut ailment = Ailment::new(AilmentKind::Disabled);
        ailment.move_uuid = Some("Item.tackle".to_string());
        let json = serde_json::to_value(&ailment).unwrap();
        assert_eq!(json["type"], "disabled");
        assert_eq!(json["moveUuid"], "Item.tackle");
        assert!(json.get("inflictedByUuid").is_none());
    }
}
