//! Moves as authored data

mod effect;

pub use effect::{Effect, EffectCondition, EffectGroup, EffectTarget};

use crate::config::GameConstants;
use crate::types::{MoveCategory, MoveTarget, PokemonType, SocialAttribute, StatKey};
use serde::{Deserialize, Serialize};

/// Stats that size an accuracy pool
///
/// When an alternate is given, the larger of the two values is rolled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccuracyModifiers {
    #[serde(default)]
    pub attribute: Option<String>,
    #[serde(default)]
    pub alternate_attribute: Option<String>,
    #[serde(default)]
    pub skill: Option<String>,
    #[serde(default)]
    pub alternate_skill: Option<String>,
}

impl AccuracyModifiers {
    pub fn new(attribute: &str, skill: Option<&str>) -> Self {
        AccuracyModifiers {
            attribute: Some(attribute.to_string()),
            alternate_attribute: None,
            skill: skill.map(str::to_string),
            alternate_skill: None,
        }
    }

    pub fn attribute_keys(&self) -> Vec<StatKey> {
        keys(&self.attribute, &self.alternate_attribute)
    }

    pub fn skill_keys(&self) -> Vec<StatKey> {
        keys(&self.skill, &self.alternate_skill)
    }
}

fn keys(primary: &Option<String>, alternate: &Option<String>) -> Vec<StatKey> {
    [primary, alternate]
        .into_iter()
        .flatten()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(StatKey::parse)
        .collect()
}

/// Battle flags of a move
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleAttributes {
    #[serde(default)]
    pub ignores_defenses: bool,
    /// The user takes damage back after hitting
    #[serde(default)]
    pub recoil: bool,
    #[serde(default)]
    pub never_fail: bool,
    /// Usable without being learned
    #[serde(default)]
    pub maneuver: bool,
    /// Successes removed from the accuracy roll
    #[serde(default)]
    pub accuracy_reduction: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HealKind {
    #[default]
    None,
    Basic,
    Complete,
    Custom,
    /// Heals the user for half the damage dealt
    Leech,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HealTarget {
    #[default]
    User,
    Targets,
}

/// How a move heals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealSpec {
    #[serde(rename = "type", default)]
    pub kind: HealKind,
    /// HP healed by a custom heal
    #[serde(default)]
    pub amount: i32,
    #[serde(default)]
    pub target: HealTarget,
    #[serde(default)]
    pub will_point_cost: i32,
}

/// A move a combatant can use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub id: String,
    pub name: String,
    pub category: MoveCategory,
    #[serde(rename = "type", default)]
    pub move_type: PokemonType,
    #[serde(default)]
    pub power: i32,
    #[serde(default)]
    pub accuracy: AccuracyModifiers,
    /// Attribute added to the damage pool
    #[serde(default)]
    pub damage_attribute: Option<String>,
    pub target: MoveTarget,
    #[serde(default)]
    pub attributes: BattleAttributes,
    #[serde(default)]
    pub heal: HealSpec,
    #[serde(default)]
    pub effect_groups: Vec<EffectGroup>,
    #[serde(default)]
    pub learned: bool,
    #[serde(default)]
    pub used_in_round: bool,
}

impl Move {
    /// A learned move with no accuracy stats, flags or effects
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: MoveCategory,
        move_type: PokemonType,
        power: i32,
    ) -> Self {
        Move {
            id: id.into(),
            name: name.into(),
            category,
            move_type,
            power,
            accuracy: AccuracyModifiers::default(),
            damage_attribute: None,
            target: MoveTarget::Foe,
            attributes: BattleAttributes::default(),
            heal: HealSpec::default(),
            effect_groups: Vec::new(),
            learned: true,
            used_in_round: false,
        }
    }

    pub fn with_accuracy(mut self, attribute: &str, skill: Option<&str>) -> Self {
        self.accuracy = AccuracyModifiers::new(attribute, skill);
        self
    }

    pub fn with_target(mut self, target: MoveTarget) -> Self {
        self.target = target;
        self
    }

    pub fn with_effect_group(mut self, group: EffectGroup) -> Self {
        self.effect_groups.push(group);
        self
    }

    /// Same-type attack bonus applies
    pub fn is_stab(&self, user_types: &[PokemonType]) -> bool {
        self.move_type != PokemonType::None && user_types.contains(&self.move_type)
    }

    /// Usable by its owner at all (learned, or a maneuver)
    pub fn is_usable(&self) -> bool {
        self.learned || self.attributes.maneuver
    }

    fn has_social_accuracy(&self) -> bool {
        self.accuracy.attribute.as_deref().is_some_and(|name| {
            SocialAttribute::all()
                .iter()
                .any(|s| s.as_str().eq_ignore_ascii_case(name.trim()))
        })
    }

    pub fn can_be_clashed(&self) -> bool {
        self.category != MoveCategory::Support
            && !self.attributes.maneuver
            && self.power > 0
            && !self.has_social_accuracy()
            && !self.target.is_battlefield()
    }

    pub fn can_be_evaded(&self) -> bool {
        !self.has_social_accuracy() && !self.attributes.never_fail && !self.target.is_battlefield()
    }

    /// Whether the move rolls damage
    pub fn is_damaging(&self) -> bool {
        self.category != MoveCategory::Support && (self.power > 0 || self.damage_attribute.is_some())
    }

    /// HP restored per target by a basic, complete or custom heal
    pub fn heal_amount(&self, constants: &GameConstants) -> Option<i32> {
        match self.heal.kind {
            HealKind::Basic => Some(constants.heal.basic.regular),
            HealKind::Complete => Some(constants.heal.complete.regular),
            HealKind::Custom => Some(self.heal.amount),
            HealKind::None | HealKind::Leech => None,
        }
    }

    /// Whether a heal from this move may land on someone other than the user
    pub fn heal_may_target_others(&self) -> bool {
        self.target != MoveTarget::User && self.heal.target != HealTarget::User
    }

    pub fn unconditional_effects(&self) -> impl Iterator<Item = &Effect> {
        self.effect_groups
            .iter()
            .filter(|g| g.condition == EffectCondition::None)
            .flat_map(|g| g.effects.iter())
    }

    pub fn chance_dice_groups(&self) -> impl Iterator<Item = &EffectGroup> {
        self.effect_groups
            .iter()
            .filter(|g| matches!(g.condition, EffectCondition::ChanceDice { .. }))
    }
}
