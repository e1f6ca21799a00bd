//! Outcomes of each resolution step

use crate::ailment::{AilmentKind, PendingAilmentDamage};
use crate::combatant::{LedgerStat, PainPenalty};
use crate::dice::{ChanceRoll, SuccessRoll};
use crate::matchup::MatchupScore;
use crate::types::CombatantId;
use serde::{Deserialize, Serialize};

/// Where a move resolution currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStep {
    AwaitingAccuracy,
    AwaitingClashOrEvadeChoice,
    AwaitingDamageConfirm,
    Done,
}

/// Result of an accuracy roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccuracyOutcome {
    pub move_id: String,
    pub roll: SuccessRoll,
    /// Constant added to the rolled successes
    pub modifier: i32,
    pub successes: i32,
    /// Actions already taken this round
    pub required: i32,
    pub hit: bool,
}

/// Result of a clash between an attack and a defender's move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClashOutcome {
    pub defender_id: CombatantId,
    pub clash_move_id: String,
    pub roll: SuccessRoll,
    pub successes: i32,
    /// Successes the attacker landed
    pub required: i32,
    pub success: bool,
    /// Damage dealt to the defender by the attack
    pub defender_damage: Option<DamageApplied>,
    /// Damage dealt to the attacker by the clashing move
    pub attacker_damage: Option<DamageApplied>,
}

/// Result of an evasion attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvadeOutcome {
    pub defender_id: CombatantId,
    pub roll: SuccessRoll,
    pub successes: i32,
    pub required: i32,
    pub success: bool,
}

/// How a defender answered an attack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "response", rename_all = "snake_case")]
pub enum DefenseOutcome {
    Clashed(ClashOutcome),
    Evaded(EvadeOutcome),
    TookHit { defender_id: CombatantId },
}

impl DefenseOutcome {
    /// Whether the defender escaped the attack's damage
    pub fn negates_hit(&self) -> bool {
        match self {
            DefenseOutcome::Clashed(c) => c.success,
            DefenseOutcome::Evaded(e) => e.success,
            DefenseOutcome::TookHit { .. } => false,
        }
    }
}

/// Damage rolled against one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDamage {
    pub target_id: CombatantId,
    pub roll: SuccessRoll,
    pub critical: bool,
    pub held_back: bool,
    pub matchup: MatchupScore,
    /// Successes before effectiveness, never negative
    pub base: i32,
    pub damage: i32,
}

/// Result of a damage roll over every target
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageOutcome {
    pub targets: Vec<TargetDamage>,
    /// HP the user regains from a leech move
    pub leech: i32,
    pub recoil_roll: Option<SuccessRoll>,
    pub recoil: i32,
    /// Whether the user confirmed applying the damage
    pub applied: bool,
    pub applications: Vec<DamageApplied>,
}

impl DamageOutcome {
    pub fn total_damage(&self) -> i32 {
        self.targets.iter().map(|t| t.damage).sum()
    }
}

/// HP actually lost by one combatant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageApplied {
    pub combatant_id: CombatantId,
    pub hp_before: i32,
    pub hp_after: i32,
    pub fainted: bool,
    /// Pain penalty newly taken, if any
    pub pain_penalty: Option<PainPenalty>,
    pub toughed_it_out: bool,
}

impl DamageApplied {
    pub fn lost(&self) -> i32 {
        self.hp_before - self.hp_after
    }
}

/// One effect as it landed (or didn't)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum AppliedEffect {
    Ailment {
        combatant_id: CombatantId,
        ailment: AilmentKind,
        replaced: Vec<AilmentKind>,
    },
    AilmentAlreadyPresent {
        combatant_id: CombatantId,
        ailment: AilmentKind,
    },
    AilmentRefused {
        combatant_id: CombatantId,
        ailment: AilmentKind,
        refusal: String,
    },
    StatChange {
        combatant_id: CombatantId,
        stat: LedgerStat,
        amount: i32,
        /// Ledger value after the change
        value: i32,
    },
    /// A weaker change in the same direction as the current one
    StatChangeIgnored {
        combatant_id: CombatantId,
        stat: LedgerStat,
        amount: i32,
    },
    /// Malformed effect data
    Skipped { reason: String },
}

/// A chance dice group and whether it fired
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChanceGroupRoll {
    pub description: String,
    pub roll: ChanceRoll,
}

/// Result of applying a move's effect groups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectsOutcome {
    /// Effects were not applied because recovery mode is on
    pub suppressed: bool,
    /// Descriptions of the groups the user chose not to apply
    pub declined: Vec<String>,
    pub chance_rolls: Vec<ChanceGroupRoll>,
    pub effects: Vec<AppliedEffect>,
}

/// Result of a healing move
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealOutcome {
    /// HP restored per combatant
    pub healed: Vec<(CombatantId, i32)>,
    pub will_spent: i32,
}

/// Result of ending a round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundEndOutcome {
    pub pending: PendingAilmentDamage,
    /// Whether the ailment damage was confirmed
    pub damage_applied: bool,
    pub applications: Vec<DamageApplied>,
    /// Ailments that wore off, per combatant
    pub cleared: Vec<(CombatantId, Vec<AilmentKind>)>,
}

/// Everything that happened while resolving one use of a move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    pub move_id: String,
    /// Steps the resolution passed through, in order
    pub steps: Vec<ResolutionStep>,
    pub accuracy: Option<AccuracyOutcome>,
    pub defenses: Vec<DefenseOutcome>,
    pub damage: Option<DamageOutcome>,
    pub heal: Option<HealOutcome>,
    pub effects: Option<EffectsOutcome>,
}

impl MoveReport {
    pub fn new(move_id: impl Into<String>) -> Self {
        MoveReport {
            move_id: move_id.into(),
            steps: Vec::new(),
            accuracy: None,
            defenses: Vec::new(),
            damage: None,
            heal: None,
            effects: None,
        }
    }

    pub fn hit(&self) -> bool {
        self.accuracy.as_ref().is_some_and(|a| a.hit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roll() -> SuccessRoll {
        SuccessRoll {
            successes: 2,
            rolls: vec![4, 5, 1],
        }
    }

    #[test]
    fn test_defense_negation() {
        let evade = EvadeOutcome {
            defender_id: "b".to_string(),
            roll: roll(),
            successes: 2,
            required: 2,
            success: true,
        };
        assert!(DefenseOutcome::Evaded(evade.clone()).negates_hit());
        assert!(!DefenseOutcome::Evaded(EvadeOutcome { success: false, ..evade }).negates_hit());
        assert!(!DefenseOutcome::TookHit {
            defender_id: "b".to_string()
        }
        .negates_hit());
    }

    #[test]
    fn test_damage_totals() {
        let target = |id: &str, damage| TargetDamage {
            target_id: id.to_string(),
            roll: roll(),
            critical: false,
            held_back: false,
            matchup: MatchupScore::NEUTRAL,
            base: damage,
            damage,
        };
        let outcome = DamageOutcome {
            targets: vec![target("a", 3), target("b", 2)],
            ..DamageOutcome::default()
        };
        assert_eq!(outcome.total_damage(), 5);

        let applied = DamageApplied {
            combatant_id: "a".to_string(),
            hp_before: 5,
            hp_after: 2,
            fainted: false,
            pain_penalty: None,
            toughed_it_out: false,
        };
        assert_eq!(applied.lost(), 3);
    }
}
