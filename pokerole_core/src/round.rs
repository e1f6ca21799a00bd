//! Turn order and round state
//!
//! Pokérole allows up to five actions per round, so the initiative order
//! restarts from the top instead of opening a new round when it wraps.

use crate::ailment::{AilmentKind, AilmentRegistry};
use crate::combatant::{Combatant, DeriveRules};
use crate::types::CombatantId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Where the encounter currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "turn", rename_all = "snake_case")]
pub enum RoundPhase {
    Idle,
    RoundActive,
    /// Index into the initiative order of whoever is acting
    TurnActive(usize),
    RoundComplete,
}

/// Something that happened while looking for the next combatant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    /// Lost an action and its turn to flinching
    Flinched(CombatantId),
    SkippedDefeated(CombatantId),
    /// The order ran past the last combatant and restarted from the first
    Wrapped,
}

/// Result of advancing the turn
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnAdvance {
    /// Combatant whose turn it now is, if anyone can act
    pub current: Option<CombatantId>,
    pub events: Vec<TurnEvent>,
}

/// Tracks initiative order, the active turn and the round number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnTracker {
    order: Vec<CombatantId>,
    phase: RoundPhase,
    round: u32,
    skip_defeated: bool,
}

impl TurnTracker {
    /// Create a tracker over a fixed initiative order
    pub fn new(order: Vec<CombatantId>, skip_defeated: bool) -> Self {
        TurnTracker {
            order,
            phase: RoundPhase::Idle,
            round: 0,
            skip_defeated,
        }
    }

    /// Order combatants by initiative, highest first; ties keep input order
    pub fn by_initiative(combatants: &[Combatant], rules: &DeriveRules, skip_defeated: bool) -> Self {
        let mut ranked: Vec<(i32, &Combatant)> = combatants
            .iter()
            .map(|c| (c.derived(rules).initiative, c))
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        Self::new(ranked.into_iter().map(|(_, c)| c.id.clone()).collect(), skip_defeated)
    }

    pub fn order(&self) -> &[CombatantId] {
        &self.order
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Combatant whose turn it is
    pub fn current(&self) -> Option<&CombatantId> {
        match self.phase {
            RoundPhase::TurnActive(index) => self.order.get(index),
            _ => None,
        }
    }

    /// Begin the first round
    ///
    /// With round automation every combatant's round resources are reset.
    pub fn start_combat(&mut self, combatants: &mut [Combatant], automation: bool) {
        self.round = 1;
        self.phase = RoundPhase::RoundActive;
        if automation {
            combatants.iter_mut().for_each(Combatant::reset_round_resources);
        }
        info!(combatants = self.order.len(), "combat started");
    }

    /// Advance to the next combatant who can act
    ///
    /// Flinching combatants lose an action and their flinch. Defeated
    /// combatants are passed over when the tracker skips them. The scan
    /// visits each combatant at most once.
    pub fn next_turn(
        &mut self,
        combatants: &mut [Combatant],
        ailments: &AilmentRegistry,
    ) -> TurnAdvance {
        let mut advance = TurnAdvance::default();
        if self.order.is_empty() {
            return advance;
        }

        let start = match self.phase {
            RoundPhase::Idle => {
                self.round = 1;
                0
            }
            RoundPhase::RoundActive | RoundPhase::RoundComplete => 0,
            RoundPhase::TurnActive(index) => index + 1,
        };

        let len = self.order.len();
        for step in 0..len {
            let position = start + step;
            if position == len {
                advance.events.push(TurnEvent::Wrapped);
            }
            let index = position % len;
            let id = &self.order[index];

            let Some(combatant) = combatants.iter_mut().find(|c| &c.id == id) else {
                warn!(combatant = %id, "combatant in turn order is missing");
                continue;
            };

            if self.skip_defeated && combatant.defeated {
                advance.events.push(TurnEvent::SkippedDefeated(id.clone()));
                continue;
            }

            if combatant.has_ailment(AilmentKind::Flinch) {
                combatant.increase_action_count();
                ailments.remove(combatant, AilmentKind::Flinch);
                debug!(combatant = %id, "flinched");
                advance.events.push(TurnEvent::Flinched(id.clone()));
                continue;
            }

            self.phase = RoundPhase::TurnActive(index);
            advance.current = Some(id.clone());
            return advance;
        }

        // Nobody can act this pass
        self.phase = RoundPhase::RoundActive;
        advance
    }

    /// Return to the first combatant without starting a new round
    pub fn reset_round(&mut self) {
        if self.phase != RoundPhase::Idle {
            self.phase = RoundPhase::RoundActive;
        }
    }

    /// Mark the round finished; the next round must be started explicitly
    pub fn end_round(&mut self) {
        if self.phase != RoundPhase::Idle {
            self.phase = RoundPhase::RoundComplete;
        }
    }

    /// Open the next round
    pub fn next_round(&mut self, combatants: &mut [Combatant], automation: bool) {
        self.round += 1;
        self.phase = RoundPhase::RoundActive;
        if automation {
            combatants.iter_mut().for_each(Combatant::reset_round_resources);
        }
        info!(round = self.round, "round started");
    }

    pub fn end_combat(&mut self) {
        self.phase = RoundPhase::Idle;
        self.round = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ailment::AilmentExtra;
    use crate::types::PokemonType;

    fn party() -> Vec<Combatant> {
        ["a", "b", "c"]
            .iter()
            .map(|id| Combatant::new(*id, id.to_uppercase(), vec![PokemonType::Normal]).unwrap())
            .collect()
    }

    fn tracker() -> TurnTracker {
        TurnTracker::new(vec!["a".into(), "b".into(), "c".into()], true)
    }

    #[test]
    fn test_turns_wrap_to_first() {
        let registry = AilmentRegistry::with_defaults();
        let mut combatants = party();
        let mut tracker = tracker();
        tracker.start_combat(&mut combatants, true);

        let ids: Vec<_> = (0..4)
            .map(|_| tracker.next_turn(&mut combatants, &registry).current.unwrap())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c", "a"]);
        assert_eq!(tracker.round(), 1);
    }

    #[test]
    fn test_flinch_consumes_action_and_is_removed() {
        let registry = AilmentRegistry::with_defaults();
        let mut combatants = party();
        registry
            .apply(&mut combatants[1], AilmentKind::Flinch, AilmentExtra::default())
            .unwrap();
        let mut tracker = tracker();
        tracker.start_combat(&mut combatants, true);

        tracker.next_turn(&mut combatants, &registry);
        let advance = tracker.next_turn(&mut combatants, &registry);

        assert_eq!(advance.current.as_deref(), Some("c"));
        assert_eq!(advance.events, vec![TurnEvent::Flinched("b".into())]);
        assert_eq!(combatants[1].action_count.value, 1);
        assert!(!combatants[1].has_ailment(AilmentKind::Flinch));
    }

    #[test]
    fn test_defeated_skipped_without_action() {
        let registry = AilmentRegistry::with_defaults();
        let mut combatants = party();
        registry
            .apply(&mut combatants[0], AilmentKind::Fainted, AilmentExtra::default())
            .unwrap();
        let mut tracker = tracker();
        tracker.start_combat(&mut combatants, true);

        let advance = tracker.next_turn(&mut combatants, &registry);
        assert_eq!(advance.current.as_deref(), Some("b"));
        assert_eq!(advance.events, vec![TurnEvent::SkippedDefeated("a".into())]);
        assert_eq!(combatants[0].action_count.value, 0);
    }

    #[test]
    fn test_defeated_not_skipped_when_disabled() {
        let registry = AilmentRegistry::with_defaults();
        let mut combatants = party();
        combatants[0].defeated = true;
        let mut tracker = TurnTracker::new(vec!["a".into(), "b".into()], false);
        tracker.start_combat(&mut combatants, true);
        let advance = tracker.next_turn(&mut combatants, &registry);
        assert_eq!(advance.current.as_deref(), Some("a"));
    }

    #[test]
    fn test_everyone_flinching_terminates() {
        let registry = AilmentRegistry::with_defaults();
        let mut combatants = party();
        for c in combatants.iter_mut() {
            registry.apply(c, AilmentKind::Flinch, AilmentExtra::default()).unwrap();
        }
        let mut tracker = tracker();
        tracker.start_combat(&mut combatants, true);

        let advance = tracker.next_turn(&mut combatants, &registry);
        assert_eq!(advance.current, None);
        assert_eq!(advance.events.len(), 3);
        assert_eq!(tracker.phase(), RoundPhase::RoundActive);
        assert!(combatants.iter().all(|c| c.action_count.value == 1));
    }

    #[test]
    fn test_round_lifecycle() {
        let registry = AilmentRegistry::with_defaults();
        let mut combatants = party();
        let mut tracker = tracker();
        assert_eq!(tracker.phase(), RoundPhase::Idle);

        tracker.start_combat(&mut combatants, true);
        tracker.next_turn(&mut combatants, &registry);
        tracker.next_turn(&mut combatants, &registry);
        assert_eq!(tracker.current().map(String::as_str), Some("b"));

        tracker.reset_round();
        let advance = tracker.next_turn(&mut combatants, &registry);
        assert_eq!(advance.current.as_deref(), Some("a"));

        combatants[0].increase_action_count();
        tracker.end_round();
        assert_eq!(tracker.phase(), RoundPhase::RoundComplete);
        tracker.next_round(&mut combatants, true);
        assert_eq!(tracker.round(), 2);
        assert_eq!(combatants[0].action_count.value, 0);

        tracker.end_combat();
        assert_eq!(tracker.phase(), RoundPhase::Idle);
    }

    #[test]
    fn test_order_by_initiative() {
        let mut combatants = party();
        combatants[2].attributes.dexterity = 4;
        combatants[1].attributes.dexterity = 2;
        let tracker = TurnTracker::by_initiative(&combatants, &DeriveRules::default(), true);
        assert_eq!(tracker.order(), &["c", "b", "a"]);
    }
}
