//! End-of-round ailment damage

use super::{AilmentKind, AilmentRegistry};
use crate::combatant::Combatant;
use crate::types::CombatantId;
use serde::{Deserialize, Serialize};

/// Damage one combatant takes from its ailments this round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AilmentDamage {
    pub combatant_id: CombatantId,
    pub name: String,
    pub damage: i32,
    pub sources: Vec<AilmentKind>,
}

/// Damage computed for every combatant, waiting for confirmation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAilmentDamage {
    pub entries: Vec<AilmentDamage>,
}

impl PendingAilmentDamage {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn damage_for(&self, id: &str) -> i32 {
        self.entries
            .iter()
            .filter(|e| e.combatant_id == id)
            .map(|e| e.damage)
            .sum()
    }

    /// One line per combatant, e.g. "Pikachu takes 2 damage (burn2)"
    pub fn describe(&self) -> String {
        self.entries
            .iter()
            .map(|e| {
                let sources: Vec<&str> = e.sources.iter().map(|k| k.label()).collect();
                format!("{} takes {} damage ({})", e.name, e.damage, sources.join(", "))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Sum ailment damage for every combatant before any of it is applied
pub fn compute_round_damage(
    registry: &AilmentRegistry,
    combatants: &[Combatant],
) -> PendingAilmentDamage {
    let entries = combatants
        .iter()
        .filter_map(|combatant| {
            let mut damage = 0;
            let mut sources = Vec::new();
            for ailment in &combatant.ailments {
                let amount = registry.round_damage(ailment.kind);
                if amount > 0 {
                    damage += amount;
                    sources.push(ailment.kind);
                }
            }
            (damage > 0).then(|| AilmentDamage {
                combatant_id: combatant.id.clone(),
                name: combatant.name.clone(),
                damage,
                sources,
            })
        })
        .collect();

    PendingAilmentDamage { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ailment::AilmentExtra;
    use crate::types::PokemonType;

    #[test]
    fn test_round_damage_sums_per_combatant() {
        let registry = AilmentRegistry::with_defaults();
        let mut burned = Combatant::new("a", "Eevee", vec![PokemonType::Normal]).unwrap();
        registry
            .apply(&mut burned, AilmentKind::Burn3, AilmentExtra::default())
            .unwrap();
        registry
            .apply(&mut burned, AilmentKind::Poison, AilmentExtra::default())
            .unwrap();
        let mut asleep = Combatant::new("b", "Snorlax", vec![PokemonType::Normal]).unwrap();
        registry
            .apply(&mut asleep, AilmentKind::Sleep, AilmentExtra::default())
            .unwrap();

        let pending = compute_round_damage(&registry, &[burned, asleep]);
        assert_eq!(pending.entries.len(), 1);
        assert_eq!(pending.damage_for("a"), 4);
        assert_eq!(pending.damage_for("b"), 0);
        assert_eq!(
            pending.entries[0].sources,
            vec![AilmentKind::Burn3, AilmentKind::Poison]
        );
    }

    #[test]
    fn test_burn_tiers_escalate() {
        let registry = AilmentRegistry::with_defaults();
        let burn1 = registry.round_damage(AilmentKind::Burn1);
        let burn2 = registry.round_damage(AilmentKind::Burn2);
        let burn3 = registry.round_damage(AilmentKind::Burn3);
        assert!(burn1 < burn2 && burn2 < burn3);
        assert!(
            registry.round_damage(AilmentKind::BadlyPoisoned)
                >= registry.round_damage(AilmentKind::Poison)
        );
    }

    #[test]
    fn test_nothing_pending() {
        let registry = AilmentRegistry::with_defaults();
        let healthy = Combatant::new("a", "Eevee", vec![PokemonType::Normal]).unwrap();
        assert!(compute_round_damage(&registry, &[healthy]).is_empty());
    }
}
