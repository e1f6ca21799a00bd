//! Core types shared across the rules engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a combatant, as assigned by the host application
pub type CombatantId = String;

/// Elemental type of a Pokémon or a move
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PokemonType {
    #[default]
    None,
    Normal,
    Bug,
    Dark,
    Dragon,
    Electric,
    Fairy,
    Fighting,
    Fire,
    Flying,
    Ghost,
    Grass,
    Ground,
    Ice,
    Poison,
    Psychic,
    Rock,
    Steel,
    Water,
}

impl PokemonType {
    /// Get all types, including `None`
    pub fn all() -> &'static [PokemonType] {
        &[
            PokemonType::None,
            PokemonType::Normal,
            PokemonType::Bug,
            PokemonType::Dark,
            PokemonType::Dragon,
            PokemonType::Electric,
            PokemonType::Fairy,
            PokemonType::Fighting,
            PokemonType::Fire,
            PokemonType::Flying,
            PokemonType::Ghost,
            PokemonType::Grass,
            PokemonType::Ground,
            PokemonType::Ice,
            PokemonType::Poison,
            PokemonType::Psychic,
            PokemonType::Rock,
            PokemonType::Steel,
            PokemonType::Water,
        ]
    }

    /// Parse a type name, falling back to `None` for anything unrecognized
    pub fn parse_lenient(name: &str) -> PokemonType {
        name.parse().unwrap_or(PokemonType::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PokemonType::None => "none",
            PokemonType::Normal => "normal",
            PokemonType::Bug => "bug",
            PokemonType::Dark => "dark",
            PokemonType::Dragon => "dragon",
            PokemonType::Electric => "electric",
            PokemonType::Fairy => "fairy",
            PokemonType::Fighting => "fighting",
            PokemonType::Fire => "fire",
            PokemonType::Flying => "flying",
            PokemonType::Ghost => "ghost",
            PokemonType::Grass => "grass",
            PokemonType::Ground => "ground",
            PokemonType::Ice => "ice",
            PokemonType::Poison => "poison",
            PokemonType::Psychic => "psychic",
            PokemonType::Rock => "rock",
            PokemonType::Steel => "steel",
            PokemonType::Water => "water",
        }
    }
}

impl FromStr for PokemonType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        PokemonType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == lower)
            .ok_or(())
    }
}

impl fmt::Display for PokemonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five core attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Strength,
    Dexterity,
    Vitality,
    Special,
    Insight,
}

impl Attribute {
    pub fn all() -> &'static [Attribute] {
        &[
            Attribute::Strength,
            Attribute::Dexterity,
            Attribute::Vitality,
            Attribute::Special,
            Attribute::Insight,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Strength => "strength",
            Attribute::Dexterity => "dexterity",
            Attribute::Vitality => "vitality",
            Attribute::Special => "special",
            Attribute::Insight => "insight",
        }
    }
}

/// The five social attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialAttribute {
    Tough,
    Cool,
    Beauty,
    Cute,
    Clever,
}

impl SocialAttribute {
    pub fn all() -> &'static [SocialAttribute] {
        &[
            SocialAttribute::Tough,
            SocialAttribute::Cool,
            SocialAttribute::Beauty,
            SocialAttribute::Cute,
            SocialAttribute::Clever,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SocialAttribute::Tough => "tough",
            SocialAttribute::Cool => "cool",
            SocialAttribute::Beauty => "beauty",
            SocialAttribute::Cute => "cute",
            SocialAttribute::Clever => "clever",
        }
    }
}

/// Stats that are recomputed from attributes, skills and rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DerivedStat {
    Initiative,
    Evade,
    ClashPhysical,
    ClashSpecial,
    Def,
    SpDef,
    UseItem,
    SearchForCover,
    RunAway,
}

impl DerivedStat {
    pub fn all() -> &'static [DerivedStat] {
        &[
            DerivedStat::Initiative,
            DerivedStat::Evade,
            DerivedStat::ClashPhysical,
            DerivedStat::ClashSpecial,
            DerivedStat::Def,
            DerivedStat::SpDef,
            DerivedStat::UseItem,
            DerivedStat::SearchForCover,
            DerivedStat::RunAway,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DerivedStat::Initiative => "initiative",
            DerivedStat::Evade => "evade",
            DerivedStat::ClashPhysical => "clashPhysical",
            DerivedStat::ClashSpecial => "clashSpecial",
            DerivedStat::Def => "def",
            DerivedStat::SpDef => "spDef",
            DerivedStat::UseItem => "useItem",
            DerivedStat::SearchForCover => "searchForCover",
            DerivedStat::RunAway => "runAway",
        }
    }
}

/// Skills every combatant sheet knows about
pub const KNOWN_SKILLS: &[&str] = &[
    "brawl", "channel", "clash", "evasion", "alert", "athletic", "nature", "stealth", "allure",
    "etiquette", "intimidate", "perform", "crafts", "lore", "medicine", "science",
];

/// Typed reference to any stat a roll may read
///
/// Skill and extra names are stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum StatKey {
    Attribute(Attribute),
    Social(SocialAttribute),
    Derived(DerivedStat),
    Skill(String),
    Extra(String),
    /// Maximum Will, readable like an attribute
    Will,
}

impl StatKey {
    /// Resolve a stat name case-insensitively.
    ///
    /// Attributes, social attributes, Will and derived stats are matched
    /// first; any name in [`KNOWN_SKILLS`] becomes a skill. Everything else is
    /// treated as a custom "extra" stat, so this never fails.
    pub fn parse(name: &str) -> StatKey {
        let lower = name.trim().to_lowercase();
        if let Some(a) = Attribute::all().iter().find(|a| a.as_str() == lower) {
            return StatKey::Attribute(*a);
        }
        if let Some(s) = SocialAttribute::all().iter().find(|s| s.as_str() == lower) {
            return StatKey::Social(*s);
        }
        if lower == "will" {
            return StatKey::Will;
        }
        if let Some(d) = DerivedStat::all()
            .iter()
            .find(|d| d.as_str().to_lowercase() == lower)
        {
            return StatKey::Derived(*d);
        }
        if KNOWN_SKILLS.contains(&lower.as_str()) {
            return StatKey::Skill(lower);
        }
        StatKey::Extra(lower)
    }

    /// Whether a pain penalty applies to rolls using this stat
    pub fn suffers_pain_penalty(&self) -> bool {
        !matches!(self, StatKey::Attribute(Attribute::Vitality) | StatKey::Will)
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatKey::Attribute(a) => f.write_str(a.as_str()),
            StatKey::Social(s) => f.write_str(s.as_str()),
            StatKey::Derived(d) => f.write_str(d.as_str()),
            StatKey::Skill(name) | StatKey::Extra(name) => f.write_str(name),
            StatKey::Will => f.write_str("will"),
        }
    }
}

/// Move category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveCategory {
    Physical,
    Special,
    Support,
}

/// Who a move is aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveTarget {
    #[serde(rename = "Foe")]
    Foe,
    #[serde(rename = "Random Foe")]
    RandomFoe,
    #[serde(rename = "All Foes")]
    AllFoes,
    #[serde(rename = "User")]
    User,
    #[serde(rename = "One Ally")]
    OneAlly,
    #[serde(rename = "User and Allies")]
    UserAndAllies,
    #[serde(rename = "Area")]
    Area,
    #[serde(rename = "Battlefield")]
    Battlefield,
    #[serde(rename = "Battlefield (Foes)")]
    BattlefieldFoes,
    #[serde(rename = "Battlefield and Area")]
    BattlefieldAndArea,
}

impl MoveTarget {
    /// Battlefield-wide moves cannot be clashed or evaded
    pub fn is_battlefield(&self) -> bool {
        matches!(self, MoveTarget::Battlefield | MoveTarget::BattlefieldFoes)
    }

    /// Whether the move might hit its own user
    pub fn might_target_user(&self) -> bool {
        matches!(
            self,
            MoveTarget::User
                | MoveTarget::UserAndAllies
                | MoveTarget::Area
                | MoveTarget::Battlefield
                | MoveTarget::BattlefieldAndArea
        )
    }
}

/// A `{value, max}` resource pool such as HP or Will
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub value: i32,
    pub max: i32,
}

impl Pool {
    pub fn full(max: i32) -> Self {
        Pool { value: max, max }
    }
}
