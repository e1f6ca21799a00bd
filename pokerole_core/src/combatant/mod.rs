//! Combatant - one Pokémon or trainer taking part in an encounter

mod derived;
mod ledger;
mod scores;

pub use derived::{derive_stats, DeriveRules, DerivedStats};
pub use ledger::{apply_floored, LedgerStat, ModifierLedger, StatChange};
pub use scores::{AttributeScores, PainPenalty, SocialScores};

use crate::ailment::{Ailment, AilmentKind};
use crate::config::{EngineConfig, GameConstants};
use crate::error::EngineError;
use crate::moves::Move;
use crate::rank::Rank;
use crate::types::{CombatantId, Pool, PokemonType, StatKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default number of actions per round
pub const DEFAULT_MAX_ACTIONS: i32 = 5;

/// Complete rules state of a combatant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combatant {
    // === Identity ===
    pub id: CombatantId,
    pub name: String,
    /// One to three elemental types
    pub types: Vec<PokemonType>,
    #[serde(default)]
    pub rank: Rank,

    // === Scores ===
    #[serde(default)]
    pub attributes: AttributeScores,
    #[serde(default)]
    pub social: SocialScores,
    /// Skill values by lowercase name
    #[serde(default)]
    pub skills: BTreeMap<String, i32>,
    /// Custom stats such as happiness or loyalty
    #[serde(default)]
    pub extra: BTreeMap<String, i32>,
    #[serde(default)]
    pub base_hp: i32,
    #[serde(default)]
    pub custom_initiative_mod: i32,

    // === Resources ===
    pub hp: Pool,
    pub will: Pool,
    pub action_count: Pool,
    pub can_clash: bool,
    pub can_evade: bool,

    // === Conditions ===
    #[serde(default)]
    pub ailments: Vec<Ailment>,
    #[serde(default)]
    pub stat_changes: ModifierLedger,
    #[serde(default)]
    pub pain_penalty: PainPenalty,
    /// Mirrors the `fainted` ailment
    #[serde(default)]
    pub defeated: bool,

    #[serde(default)]
    pub moves: Vec<Move>,
}

impl Combatant {
    /// Create a combatant with every attribute at 1 and full resources
    pub fn new(
        id: impl Into<CombatantId>,
        name: impl Into<String>,
        types: Vec<PokemonType>,
    ) -> Result<Self, EngineError> {
        if types.is_empty() || types.len() > 3 {
            return Err(EngineError::InvalidTyping(types.len()));
        }

        let mut combatant = Combatant {
            id: id.into(),
            name: name.into(),
            types,
            rank: Rank::None,
            attributes: AttributeScores::default(),
            social: SocialScores::default(),
            skills: BTreeMap::new(),
            extra: BTreeMap::new(),
            base_hp: 0,
            custom_initiative_mod: 0,
            hp: Pool::default(),
            will: Pool::default(),
            action_count: Pool {
                value: 0,
                max: DEFAULT_MAX_ACTIONS,
            },
            can_clash: true,
            can_evade: true,
            ailments: Vec::new(),
            stat_changes: ModifierLedger::new(),
            pain_penalty: PainPenalty::None,
            defeated: false,
            moves: Vec::new(),
        };
        combatant.recompute_pools(&EngineConfig::default(), &GameConstants::default());
        combatant.hp.value = combatant.hp.max;
        combatant.will.value = combatant.will.max;
        Ok(combatant)
    }

    /// Whether the combatant carries a third type
    pub fn has_triple_typing(&self) -> bool {
        self.types.len() == 3
    }

    // === Derived values ===

    pub fn derived(&self, rules: &DeriveRules) -> DerivedStats {
        derive_stats(self, rules)
    }

    /// Maximum HP: base HP plus Vitality and the rank's passive increase
    pub fn hp_max(&self, config: &EngineConfig) -> i32 {
        let mut max = self.base_hp + self.attributes.vitality + self.rank.passive_increase();
        if config.hp_insight_bonus {
            max += self.attributes.insight;
        }
        max
    }

    pub fn will_max(&self, constants: &GameConstants) -> i32 {
        self.attributes.insight + constants.max_will_bonus
    }

    /// Refresh HP, Will and action maxima after base stats change
    ///
    /// Current values are clamped to the new maxima.
    pub fn recompute_pools(&mut self, config: &EngineConfig, constants: &GameConstants) {
        self.hp.max = self.hp_max(config);
        self.hp.value = self.hp.value.clamp(0, self.hp.max.max(0));
        self.will.max = self.will_max(constants);
        self.will.value = self.will.value.clamp(0, self.will.max.max(0));
        self.action_count.max = constants.max_actions;
    }

    pub fn skill(&self, name: &str) -> i32 {
        self.skills.get(&name.to_lowercase()).copied().unwrap_or(0)
    }

    /// Skill cap granted by the current rank
    pub fn skill_limit(&self) -> i32 {
        self.rank.skill_limit()
    }

    /// Value of any stat by typed key
    ///
    /// Attributes are read after ailment penalties and stat changes. Unknown
    /// skills, extras and derived stats the combatant lacks read as 0.
    pub fn stat_value(&self, key: &StatKey, rules: &DeriveRules) -> i32 {
        match key {
            StatKey::Attribute(a) => self.derived(rules).attributes.get(*a),
            StatKey::Social(s) => self.social.get(*s),
            StatKey::Derived(d) => self.derived(rules).get(*d).unwrap_or(0),
            StatKey::Skill(name) => self.skill(name),
            StatKey::Extra(name) => self.extra.get(name).copied().unwrap_or(0),
            StatKey::Will => self.will.max,
        }
    }

    /// Largest value among the given keys, or 0 when empty
    pub fn best_of(&self, keys: &[StatKey], rules: &DeriveRules) -> i32 {
        keys.iter()
            .map(|k| self.stat_value(k, rules))
            .max()
            .unwrap_or(0)
    }

    /// Accuracy dice for a move before any bonus
    pub fn accuracy_pool(&self, mv: &Move, rules: &DeriveRules) -> i32 {
        self.best_of(&mv.accuracy.attribute_keys(), rules)
            + self.best_of(&mv.accuracy.skill_keys(), rules)
    }

    /// Damage dice for a move before STAB, criticals and defenses
    pub fn damage_pool(&self, mv: &Move, rules: &DeriveRules) -> i32 {
        let attribute = mv
            .damage_attribute
            .as_deref()
            .map_or(0, |name| self.stat_value(&StatKey::parse(name), rules));
        attribute + mv.power
    }

    /// Pain penalty applying to a roll on `key`
    pub fn pain_penalty_for(&self, key: &StatKey) -> i32 {
        if key.suffers_pain_penalty() {
            self.pain_penalty.value()
        } else {
            0
        }
    }

    pub fn confusion_penalty(&self) -> i32 {
        if self.has_ailment(AilmentKind::Confused) {
            self.rank.confusion_penalty()
        } else {
            0
        }
    }

    // === HP ===

    /// Lose HP, never going below 0; returns the HP actually lost
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let old = self.hp.value;
        self.hp.value = (old - amount.max(0)).max(0);
        old - self.hp.value
    }

    /// Restore HP up to the maximum; returns the HP actually restored
    pub fn heal(&mut self, amount: i32) -> i32 {
        let old = self.hp.value;
        self.hp.value = (old + amount.max(0)).min(self.hp.max).max(old);
        self.hp.value - old
    }

    // === Action economy ===

    pub fn has_available_actions(&self) -> bool {
        self.action_count.value < self.action_count.max
    }

    pub fn increase_action_count(&mut self) {
        self.action_count.value += 1;
    }

    /// Start-of-round reset; calling it twice is the same as calling it once
    pub fn reset_round_resources(&mut self) {
        self.action_count.value = 0;
        self.can_clash = true;
        self.can_evade = true;
        for mv in &mut self.moves {
            mv.used_in_round = false;
        }
    }

    // === Ailments ===

    pub fn has_ailment(&self, kind: AilmentKind) -> bool {
        self.ailments.iter().any(|a| a.kind == kind)
    }

    pub fn is_burned(&self) -> bool {
        self.ailments
            .iter()
            .any(|a| matches!(a.kind, AilmentKind::Burn1 | AilmentKind::Burn2 | AilmentKind::Burn3))
    }

    pub fn is_poisoned(&self) -> bool {
        self.ailments
            .iter()
            .any(|a| matches!(a.kind, AilmentKind::Poison | AilmentKind::BadlyPoisoned))
    }

    pub fn is_move_disabled(&self, move_id: &str) -> bool {
        self.ailments
            .iter()
            .any(|a| a.kind == AilmentKind::Disabled && a.move_uuid.as_deref() == Some(move_id))
    }

    // === Moves ===

    pub fn find_move(&self, move_id: &str) -> Option<&Move> {
        self.moves.iter().find(|m| m.id == move_id)
    }

    pub fn find_move_mut(&mut self, move_id: &str) -> Option<&mut Move> {
        self.moves.iter_mut().find(|m| m.id == move_id)
    }

    pub fn learned_moves(&self) -> impl Iterator<Item = &Move> {
        self.moves.iter().filter(|m| m.learned)
    }
}
