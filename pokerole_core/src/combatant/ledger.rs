//! Stacking stat changes

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stats a move effect may raise or lower
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LedgerStat {
    Strength,
    Dexterity,
    Special,
    Def,
    SpDef,
    AccuracyMod,
}

impl LedgerStat {
    pub fn all() -> &'static [LedgerStat] {
        &[
            LedgerStat::Strength,
            LedgerStat::Dexterity,
            LedgerStat::Special,
            LedgerStat::Def,
            LedgerStat::SpDef,
            LedgerStat::AccuracyMod,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerStat::Strength => "strength",
            LedgerStat::Dexterity => "dexterity",
            LedgerStat::Special => "special",
            LedgerStat::Def => "def",
            LedgerStat::SpDef => "spDef",
            LedgerStat::AccuracyMod => "accuracyMod",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LedgerStat::Strength => "Strength",
            LedgerStat::Dexterity => "Dexterity",
            LedgerStat::Special => "Special",
            LedgerStat::Def => "Defense",
            LedgerStat::SpDef => "Special Defense",
            LedgerStat::AccuracyMod => "Accuracy",
        }
    }
}

impl fmt::Display for LedgerStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LedgerStat {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        LedgerStat::all()
            .iter()
            .copied()
            .find(|stat| stat.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| EngineError::UnknownStat(name.to_string()))
    }
}

/// Accumulated change to one stat, split by direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatChange {
    pub plus: i32,
    pub minus: i32,
}

impl StatChange {
    /// Effective signed change
    pub fn value(&self) -> i32 {
        self.plus - self.minus
    }

    fn set(&mut self, value: i32) {
        if value >= 0 {
            self.plus = value;
            self.minus = 0;
        } else {
            self.plus = 0;
            self.minus = -value;
        }
    }
}

/// Per-combatant record of every active stat change
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierLedger {
    #[serde(default)]
    pub strength: StatChange,
    #[serde(default)]
    pub dexterity: StatChange,
    #[serde(default)]
    pub special: StatChange,
    #[serde(default)]
    pub def: StatChange,
    #[serde(default)]
    pub sp_def: StatChange,
    #[serde(default)]
    pub accuracy_mod: StatChange,
}

impl ModifierLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, stat: LedgerStat) -> StatChange {
        match stat {
            LedgerStat::Strength => self.strength,
            LedgerStat::Dexterity => self.dexterity,
            LedgerStat::Special => self.special,
            LedgerStat::Def => self.def,
            LedgerStat::SpDef => self.sp_def,
            LedgerStat::AccuracyMod => self.accuracy_mod,
        }
    }

    fn get_mut(&mut self, stat: LedgerStat) -> &mut StatChange {
        match stat {
            LedgerStat::Strength => &mut self.strength,
            LedgerStat::Dexterity => &mut self.dexterity,
            LedgerStat::Special => &mut self.special,
            LedgerStat::Def => &mut self.def,
            LedgerStat::SpDef => &mut self.sp_def,
            LedgerStat::AccuracyMod => &mut self.accuracy_mod,
        }
    }

    /// Effective signed change for a stat
    pub fn value(&self, stat: LedgerStat) -> i32 {
        self.get(stat).value()
    }

    /// Stack a new change onto a stat
    ///
    /// A change against the current direction is added to it. A change in
    /// the same direction (or onto zero) replaces it only when larger in
    /// magnitude. Returns `false` when the change had no effect.
    pub fn apply_delta(&mut self, stat: LedgerStat, amount: i32) -> bool {
        if amount == 0 {
            return false;
        }

        let entry = self.get_mut(stat);
        let current = entry.value();
        if current != 0 && current.signum() != amount.signum() {
            entry.set(current + amount);
            true
        } else if amount.abs() > current.abs() {
            entry.set(amount);
            true
        } else {
            false
        }
    }

    /// Drop every stat change
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        LedgerStat::all().iter().all(|s| self.value(*s) == 0)
    }
}

/// Apply a signed change to a stat without taking it below 1
///
/// A zero change leaves the base untouched.
pub fn apply_floored(base: i32, change: i32) -> i32 {
    if change == 0 {
        base
    } else {
        (base + change).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_lower_then_raise_partially_cancels() {
        let mut ledger = ModifierLedger::new();

        assert!(ledger.apply_delta(LedgerStat::Strength, -2));
        assert_eq!(ledger.strength, StatChange { plus: 0, minus: 2 });

        assert!(ledger.apply_delta(LedgerStat::Strength, 1));
        assert_eq!(ledger.value(LedgerStat::Strength), -1);
    }

    #[test]
    fn test_smaller_same_direction_is_not_applied() {
        let mut ledger = ModifierLedger::new();
        ledger.apply_delta(LedgerStat::Def, 2);
        assert!(!ledger.apply_delta(LedgerStat::Def, 1));
        assert!(!ledger.apply_delta(LedgerStat::Def, 2));
        assert_eq!(ledger.value(LedgerStat::Def), 2);

        assert!(ledger.apply_delta(LedgerStat::Def, 3));
        assert_eq!(ledger.value(LedgerStat::Def), 3);
    }

    #[test]
    fn test_parse_ledger_stat() {
        assert_eq!("SPDEF".parse::<LedgerStat>(), Ok(LedgerStat::SpDef));
        assert_eq!("accuracyMod".parse::<LedgerStat>(), Ok(LedgerStat::AccuracyMod));
        assert_eq!(
            "luck".parse::<LedgerStat>(),
            Err(EngineError::UnknownStat("luck".to_string()))
        );
    }

    #[test]
    fn test_serialized_field_names() {
        let mut ledger = ModifierLedger::new();
        ledger.apply_delta(LedgerStat::SpDef, -1);
        let json = serde_json::to_value(&ledger).unwrap();
        assert_eq!(json["spDef"]["minus"], 1);
        assert_eq!(json["accuracyMod"]["plus"], 0);
    }

    #[test]
    fn test_clear() {
        let mut ledger = ModifierLedger::new();
        ledger.apply_delta(LedgerStat::Special, 2);
        assert!(!ledger.is_empty());
        ledger.clear();
        assert!(ledger.is_empty());
    }

    proptest! {
        #[test]
        fn prop_stacking_law(existing in -5i32..=5, delta in -5i32..=5) {
            let mut ledger = ModifierLedger::new();
            ledger.apply_delta(LedgerStat::Dexterity, existing);
            let v = ledger.value(LedgerStat::Dexterity);
            prop_assert_eq!(v, existing);

            ledger.apply_delta(LedgerStat::Dexterity, delta);
            let result = ledger.value(LedgerStat::Dexterity);

            let expected = if delta == 0 {
                v
            } else if v != 0 && v.signum() != delta.signum() {
                v + delta
            } else if delta.abs() > v.abs() {
                delta
            } else {
                v
            };
            prop_assert_eq!(result, expected);

            let entry = ledger.get(LedgerStat::Dexterity);
            prop_assert!(entry.plus == 0 || entry.minus == 0);
        }

        #[test]
        fn prop_floor_never_below_one(base in 0i32..10, change in -20i32..=20) {
            let value = apply_floored(base, change);
            if change != 0 {
                prop_assert!(value >= 1);
            } else {
                prop_assert_eq!(value, base);
            }
        }
    }
}
