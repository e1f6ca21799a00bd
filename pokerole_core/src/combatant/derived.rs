//! Derived stat computation
//!
//! Derived stats are never stored. They are recomputed from base scores,
//! ailments and the stat change ledger whenever they are read.

use super::ledger::{apply_floored, LedgerStat};
use super::{AttributeScores, Combatant};
use crate::ailment::AilmentKind;
use crate::config::{EngineConfig, GameConstants, SpecialDefenseStat};
use crate::types::{Attribute, DerivedStat};
use serde::{Deserialize, Serialize};

/// Settings that influence derived stats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeriveRules {
    pub special_defense: SpecialDefenseStat,
    pub paralysis_dexterity_decrease: i32,
    pub burn_strength_decrease: i32,
    pub frozen_special_decrease: i32,
}

impl DeriveRules {
    pub fn new(config: &EngineConfig, constants: &GameConstants) -> Self {
        DeriveRules {
            special_defense: config.special_defense_stat,
            paralysis_dexterity_decrease: constants.paralysis_dexterity_decrease,
            burn_strength_decrease: constants.burn_strength_decrease,
            frozen_special_decrease: constants.frozen_special_decrease,
        }
    }
}

impl Default for DeriveRules {
    fn default() -> Self {
        Self::new(&EngineConfig::default(), &GameConstants::default())
    }
}

/// Effective attributes and every derived stat of a combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedStats {
    /// Attributes after ailment penalties and stat changes
    pub attributes: AttributeScores,
    pub initiative: i32,
    pub evade: i32,
    pub clash_physical: i32,
    pub clash_special: i32,
    pub def: i32,
    pub sp_def: i32,
    /// Only combatants with the Medicine skill can use items
    pub use_item: Option<i32>,
    pub search_for_cover: i32,
    pub run_away: i32,
}

impl DerivedStats {
    pub fn get(&self, stat: DerivedStat) -> Option<i32> {
        match stat {
            DerivedStat::Initiative => Some(self.initiative),
            DerivedStat::Evade => Some(self.evade),
            DerivedStat::ClashPhysical => Some(self.clash_physical),
            DerivedStat::ClashSpecial => Some(self.clash_special),
            DerivedStat::Def => Some(self.def),
            DerivedStat::SpDef => Some(self.sp_def),
            DerivedStat::UseItem => self.use_item,
            DerivedStat::SearchForCover => Some(self.search_for_cover),
            DerivedStat::RunAway => Some(self.run_away),
        }
    }
}

/// Compute derived stats for a combatant
///
/// Paralysis, burns and freezing lower their attribute first. Stat changes
/// from the ledger are layered on top. Every lowered value stops at 1.
pub fn derive_stats(combatant: &Combatant, rules: &DeriveRules) -> DerivedStats {
    let mut attributes = combatant.attributes;

    if combatant.has_ailment(AilmentKind::Paralysis) {
        attributes.dexterity =
            apply_floored(attributes.dexterity, -rules.paralysis_dexterity_decrease);
    }
    if combatant.is_burned() {
        attributes.strength = apply_floored(attributes.strength, -rules.burn_strength_decrease);
    }
    if combatant.has_ailment(AilmentKind::Frozen) {
        attributes.special = apply_floored(attributes.special, -rules.frozen_special_decrease);
    }

    let ledger = &combatant.stat_changes;
    for (attribute, stat) in [
        (Attribute::Strength, LedgerStat::Strength),
        (Attribute::Dexterity, LedgerStat::Dexterity),
        (Attribute::Special, LedgerStat::Special),
    ] {
        let value = apply_floored(attributes.get(attribute), ledger.value(stat));
        attributes.set(attribute, value);
    }

    let passive = combatant.rank.passive_increase();
    let skill = |name: &str| combatant.skill(name);

    let sp_def_base = match rules.special_defense {
        SpecialDefenseStat::Vitality => attributes.vitality,
        SpecialDefenseStat::Insight => attributes.insight,
    };

    DerivedStats {
        initiative: attributes.dexterity
            + skill("alert")
            + combatant.custom_initiative_mod
            + passive,
        evade: attributes.dexterity + skill("evasion"),
        clash_physical: attributes.strength + skill("clash"),
        clash_special: attributes.special + skill("clash"),
        def: apply_floored(attributes.vitality + passive, ledger.value(LedgerStat::Def)),
        sp_def: apply_floored(sp_def_base + passive, ledger.value(LedgerStat::SpDef)),
        use_item: combatant
            .skills
            .get("medicine")
            .map(|medicine| combatant.social.clever + medicine),
        search_for_cover: attributes.insight + skill("alert"),
        run_away: attributes.dexterity + skill("athletic"),
        attributes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ailment::Ailment;
    use crate::rank::Rank;
    use crate::types::PokemonType;
    use proptest::prelude::*;

    fn combatant() -> Combatant {
        let mut c = Combatant::new("a", "Machop", vec![PokemonType::Fighting]).unwrap();
        c.attributes = AttributeScores {
            strength: 3,
            dexterity: 3,
            vitality: 2,
            special: 1,
            insight: 2,
        };
        c.skills.insert("alert".to_string(), 1);
        c.skills.insert("evasion".to_string(), 2);
        c.skills.insert("clash".to_string(), 1);
        c.skills.insert("athletic".to_string(), 2);
        c
    }

    #[test]
    fn test_base_derivation() {
        let mut c = combatant();
        c.rank = Rank::Master;
        c.custom_initiative_mod = 1;
        let stats = derive_stats(&c, &DeriveRules::default());

        assert_eq!(stats.initiative, 3 + 1 + 1 + 2);
        assert_eq!(stats.evade, 5);
        assert_eq!(stats.clash_physical, 4);
        assert_eq!(stats.clash_special, 2);
        assert_eq!(stats.def, 4);
        assert_eq!(stats.sp_def, 4);
        assert_eq!(stats.search_for_cover, 3);
        assert_eq!(stats.run_away, 5);
        assert_eq!(stats.use_item, None);
    }

    #[test]
    fn test_use_item_needs_medicine() {
        let mut c = combatant();
        c.social.clever = 2;
        c.skills.insert("medicine".to_string(), 1);
        let stats = derive_stats(&c, &DeriveRules::default());
        assert_eq!(stats.use_item, Some(3));
        assert_eq!(stats.get(DerivedStat::UseItem), Some(3));
    }

    #[test]
    fn test_insight_special_defense() {
        let c = combatant();
        let rules = DeriveRules {
            special_defense: SpecialDefenseStat::Insight,
            ..DeriveRules::default()
        };
        let mut c2 = c.clone();
        c2.attributes.insight = 4;
        assert_eq!(derive_stats(&c2, &rules).sp_def, 4);
        assert_eq!(derive_stats(&c, &DeriveRules::default()).sp_def, 2);
    }

    #[test]
    fn test_paralysis_lowers_evade() {
        let mut c = combatant();
        c.ailments.push(Ailment::new(AilmentKind::Paralysis));
        let stats = derive_stats(&c, &DeriveRules::default());
        assert_eq!(stats.attributes.dexterity, 1);
        assert_eq!(stats.evade, 3);
        assert_eq!(stats.run_away, 3);
    }

    #[test]
    fn test_burn_then_ledger() {
        let mut c = combatant();
        c.ailments.push(Ailment::new(AilmentKind::Burn2));
        c.stat_changes.apply_delta(LedgerStat::Strength, 2);
        let stats = derive_stats(&c, &DeriveRules::default());
        // 3 - 1 (burn) + 2
        assert_eq!(stats.attributes.strength, 4);
        assert_eq!(stats.clash_physical, 5);
    }

    #[test]
    fn test_frozen_floors_at_one() {
        let mut c = combatant();
        c.ailments.push(Ailment::new(AilmentKind::Frozen));
        c.stat_changes.apply_delta(LedgerStat::Special, -3);
        let stats = derive_stats(&c, &DeriveRules::default());
        assert_eq!(stats.attributes.special, 1);
    }

    proptest! {
        #[test]
        fn prop_stat_changes_never_below_one(
            strength in 1i32..6,
            vitality in 1i32..6,
            str_change in -6i32..=6,
            def_change in -6i32..=6,
            spdef_change in -6i32..=6,
        ) {
            let mut c = combatant();
            c.attributes.strength = strength;
            c.attributes.vitality = vitality;
            c.stat_changes.apply_delta(LedgerStat::Strength, str_change);
            c.stat_changes.apply_delta(LedgerStat::Def, def_change);
            c.stat_changes.apply_delta(LedgerStat::SpDef, spdef_change);

            let stats = derive_stats(&c, &DeriveRules::default());
            prop_assert!(stats.attributes.strength >= 1);
            prop_assert!(stats.def >= 1);
            prop_assert!(stats.sp_def >= 1);
        }
    }
}
