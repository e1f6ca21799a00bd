//! Interfaces to the surrounding application
//!
//! The engine never renders, stores or sends anything itself. Hosts plug in
//! implementations for user prompts, persistence and chat broadcasts.

use crate::ailment::{Ailment, AilmentKind};
use crate::combatant::{Combatant, ModifierLedger, PainPenalty};
use crate::types::CombatantId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A selectable move in a prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOption {
    pub id: String,
    pub name: String,
}

/// Why a move is being selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveSelectionPurpose {
    Clash,
    Disable,
}

/// A decision the engine needs from a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "prompt", rename_all = "snake_case")]
pub enum ChoicePrompt {
    /// Extra dice and flat successes before a roll
    RollBonus { title: String, formula: String },
    /// How the defender answers an incoming hit
    DefenseResponse {
        defender: CombatantId,
        attacker: CombatantId,
        move_name: String,
        can_clash: bool,
        can_evade: bool,
    },
    SelectMove {
        combatant: CombatantId,
        purpose: MoveSelectionPurpose,
        options: Vec<MoveOption>,
    },
    /// Critical hit, hold back and bonuses for one target's damage roll
    DamageRoll {
        move_name: String,
        target: CombatantId,
        stab: bool,
        effectiveness: Option<String>,
    },
    Confirm { title: String, message: String },
    /// Which member of an ailment family to inflict
    AilmentVariant { options: Vec<AilmentKind> },
    /// Take a pain penalty or spend Will to ignore it
    PainPenalty {
        combatant: CombatantId,
        penalty: PainPenalty,
        will_cost: i32,
    },
}

/// Bonus entered before a roll
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollBonus {
    /// Extra dice
    pub pool: i32,
    /// Flat successes, may be negative
    pub constant: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenseChoice {
    Clash,
    Evade,
    TakeHit,
}

/// Options for one damage roll
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageOptions {
    pub critical: bool,
    pub hold_back: bool,
    pub bonus: RollBonus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PainResponse {
    Accept,
    ToughItOut,
}

/// A user's answer to a [`ChoicePrompt`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "choice", content = "value", rename_all = "snake_case")]
pub enum Choice {
    RollBonus(RollBonus),
    Defense(DefenseChoice),
    Move(String),
    Damage(DamageOptions),
    Confirm(bool),
    Ailment(AilmentKind),
    Pain(PainResponse),
}

impl Choice {
    pub fn into_roll_bonus(self) -> Option<RollBonus> {
        match self {
            Choice::RollBonus(b) => Some(b),
            _ => None,
        }
    }

    pub fn into_defense(self) -> Option<DefenseChoice> {
        match self {
            Choice::Defense(d) => Some(d),
            _ => None,
        }
    }

    pub fn into_move(self) -> Option<String> {
        match self {
            Choice::Move(id) => Some(id),
            _ => None,
        }
    }

    pub fn into_damage(self) -> Option<DamageOptions> {
        match self {
            Choice::Damage(d) => Some(d),
            _ => None,
        }
    }

    pub fn into_confirm(self) -> Option<bool> {
        match self {
            Choice::Confirm(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_ailment(self) -> Option<AilmentKind> {
        match self {
            Choice::Ailment(k) => Some(k),
            _ => None,
        }
    }

    pub fn into_pain(self) -> Option<PainResponse> {
        match self {
            Choice::Pain(p) => Some(p),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Asks users to decide things and shows transient notifications
#[async_trait]
pub trait Presenter: Send + Sync {
    /// Present a choice; `None` means the user cancelled
    async fn present_choice(&self, prompt: ChoicePrompt) -> Option<Choice>;

    async fn notify(&self, level: NoticeLevel, message: &str);
}

/// Stores combatant state on behalf of the engine
#[async_trait]
pub trait Persistence: Send + Sync {
    async fn commit(&self, combatant: &CombatantId, update: CombatantUpdate);
}

/// Publishes roll results and status notices
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn announce(&self, text: &str, speaker: Option<&CombatantId>);
}

/// The three collaborators a resolver talks to
#[derive(Clone)]
pub struct Collaborators {
    pub presenter: Arc<dyn Presenter>,
    pub persistence: Arc<dyn Persistence>,
    pub broadcaster: Arc<dyn Broadcaster>,
}

/// Named-field partial update of a combatant
///
/// Only fields that are `Some` changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatantUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub will: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_count: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_clash: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_evade: Option<bool>,
    /// Move id to its used-this-round flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moves_used_in_round: Option<BTreeMap<String, bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ailments: Option<Vec<Ailment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defeated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat_changes: Option<ModifierLedger>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pain_penalty: Option<PainPenalty>,
}

impl CombatantUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hp(mut self, combatant: &Combatant) -> Self {
        self.hp = Some(combatant.hp.value);
        self
    }

    pub fn with_will(mut self, combatant: &Combatant) -> Self {
        self.will = Some(combatant.will.value);
        self
    }

    /// Action counter, clash/evade flags and per-move usage
    pub fn with_round_resources(mut self, combatant: &Combatant) -> Self {
        self.action_count = Some(combatant.action_count.value);
        self.can_clash = Some(combatant.can_clash);
        self.can_evade = Some(combatant.can_evade);
        self.moves_used_in_round = Some(
            combatant
                .moves
                .iter()
                .map(|m| (m.id.clone(), m.used_in_round))
                .collect(),
        );
        self
    }

    /// Ailment list and the defeated flag that mirrors `fainted`
    pub fn with_ailments(mut self, combatant: &Combatant) -> Self {
        self.ailments = Some(combatant.ailments.clone());
        self.defeated = Some(combatant.defeated);
        self
    }

    pub fn with_stat_changes(mut self, combatant: &Combatant) -> Self {
        self.stat_changes = Some(combatant.stat_changes.clone());
        self
    }

    pub fn with_pain_penalty(mut self, combatant: &Combatant) -> Self {
        self.pain_penalty = Some(combatant.pain_penalty);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Flat map of changed field names to values
    pub fn to_fields(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PokemonType;

    #[test]
    fn test_update_fields_only_contain_changes() {
        let mut c = Combatant::new("a", "Eevee", vec![PokemonType::Normal]).unwrap();
        c.hp.value = 2;
        let update = CombatantUpdate::new().with_hp(&c).with_ailments(&c);
        let fields = update.to_fields();

        assert_eq!(fields.len(), 3);
        assert_eq!(fields["hp"], 2);
        assert_eq!(fields["defeated"], false);
        assert!(fields["ailments"].as_array().unwrap().is_empty());
        assert!(!update.is_empty());
        assert!(CombatantUpdate::new().is_empty());
    }

    #[test]
    fn test_choice_accessors() {
        assert_eq!(Choice::Confirm(true).into_confirm(), Some(true));
        assert_eq!(Choice::Confirm(true).into_move(), None);
        let json = serde_json::to_string(&Choice::Defense(DefenseChoice::Evade)).unwrap();
        assert_eq!(json, r#"{"choice":"defense","value":"evade"}"#);
    }
}
