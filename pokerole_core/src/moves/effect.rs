//! Move effects and effect groups

use crate::ailment::AilmentKind;
use crate::combatant::LedgerStat;
use serde::{Deserialize, Serialize};

/// Who a move effect lands on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectTarget {
    User,
    #[default]
    Targets,
}

/// A single authored move effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Effect {
    Ailment {
        ailment: AilmentKind,
        #[serde(default)]
        affects: EffectTarget,
    },
    StatChange {
        /// Stat name as authored; resolved when the effect is applied
        stat: String,
        amount: i32,
        #[serde(default)]
        affects: EffectTarget,
    },
}

impl Effect {
    pub fn affects(&self) -> EffectTarget {
        match self {
            Effect::Ailment { affects, .. } | Effect::StatChange { affects, .. } => *affects,
        }
    }

    /// e.g. "Lower Dexterity by 2 (Targets)"
    pub fn describe(&self) -> String {
        let body = match self {
            Effect::Ailment { ailment, .. } => format!("Inflict Condition: {}", ailment.label()),
            Effect::StatChange { stat, amount, .. } => {
                let verb = if *amount > 0 { "Raise" } else { "Lower" };
                format!("{} {}", verb, stat_change_text(stat, *amount))
            }
        };
        let suffix = match self.affects() {
            EffectTarget::User => "(Self)",
            EffectTarget::Targets => "(Targets)",
        };
        format!("{} {}", body, suffix)
    }
}

fn stat_label(stat: &str) -> String {
    stat.parse::<LedgerStat>()
        .map(|s| s.label().to_string())
        .unwrap_or_else(|_| stat.to_string())
}

fn stat_change_text(stat: &str, amount: i32) -> String {
    let label = stat_label(stat);
    if amount.abs() == 1 {
        label
    } else {
        format!("{} by {}", label, amount.abs())
    }
}

/// When an effect group fires
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EffectCondition {
    #[default]
    None,
    ChanceDice { amount: u32 },
}

/// Effects that share one condition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectGroup {
    #[serde(default)]
    pub condition: EffectCondition,
    #[serde(default)]
    pub effects: Vec<Effect>,
}

impl EffectGroup {
    pub fn unconditional(effects: Vec<Effect>) -> Self {
        EffectGroup {
            condition: EffectCondition::None,
            effects,
        }
    }

    pub fn chance_dice(amount: u32, effects: Vec<Effect>) -> Self {
        EffectGroup {
            condition: EffectCondition::ChanceDice { amount },
            effects,
        }
    }

    /// e.g. "Roll 2 chance dice to lower Dexterity by 2"
    pub fn describe(&self) -> String {
        let amount = match self.condition {
            EffectCondition::None => {
                return self
                    .effects
                    .iter()
                    .map(Effect::describe)
                    .collect::<Vec<_>>()
                    .join("; ");
            }
            EffectCondition::ChanceDice { amount } => amount,
        };

        let mut raises = Vec::new();
        let mut lowers = Vec::new();
        let mut ailments = Vec::new();
        for effect in &self.effects {
            match effect {
                Effect::StatChange { stat, amount, .. } if *amount > 0 => {
                    raises.push(stat_change_text(stat, *amount))
                }
                Effect::StatChange { stat, amount, .. } if *amount < 0 => {
                    lowers.push(stat_change_text(stat, *amount))
                }
                Effect::StatChange { .. } => {}
                Effect::Ailment { ailment, .. } => ailments.push(ailment.label().to_string()),
            }
        }

        let mut clauses = Vec::new();
        if !raises.is_empty() {
            clauses.push(format!("raise {}", list_text(raises)));
        }
        if !lowers.is_empty() {
            clauses.push(format!("lower {}", list_text(lowers)));
        }
        if !ailments.is_empty() {
            let noun = if ailments.len() > 1 { "conditions" } else { "condition" };
            clauses.push(format!("inflict {}: {}", noun, list_text(ailments)));
        }

        let dice = if amount == 1 {
            "Roll 1 chance die".to_string()
        } else {
            format!("Roll {} chance dice", amount)
        };
        format!("{} to {}", dice, clauses.join(", and "))
    }
}

fn list_text(mut items: Vec<String>) -> String {
    match items.len() {
        0 => String::new(),
        1 => items.remove(0),
        _ => {
            let last = items.pop().unwrap_or_default();
            format!("{}, and {}", items.join(", "), last)
        }
    }
}
