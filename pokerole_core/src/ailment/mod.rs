//! Ailment system
//!
//! Tracks which ailments exist, which families exclude each other, which
//! types are immune, and how much damage each deals at the end of a round.

pub mod sweep;
mod types;

pub use sweep::{compute_round_damage, AilmentDamage, PendingAilmentDamage};
pub use types::{Ailment, AilmentConfig, AilmentExtra, AilmentFamily, AilmentKind};

use crate::combatant::Combatant;
use crate::error::{EngineError, Refusal};
use crate::types::PokemonType;
use std::collections::HashMap;
use tracing::debug;

/// Result of inflicting an ailment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The ailment was added, replacing any other member of its family
    Applied { replaced: Vec<AilmentKind> },
    /// The combatant already had it; nothing changed
    AlreadyPresent,
}

/// Ailment type registry
#[derive(Debug, Clone, Default)]
pub struct AilmentRegistry {
    configs: HashMap<AilmentKind, AilmentConfig>,
}

impl AilmentRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        AilmentRegistry {
            configs: HashMap::new(),
        }
    }

    /// Register (or replace) the rules for one ailment kind
    pub fn register(&mut self, config: AilmentConfig) {
        self.configs.insert(config.kind, config);
    }

    pub fn get(&self, kind: AilmentKind) -> Option<&AilmentConfig> {
        self.configs.get(&kind)
    }

    /// Load the standard Pokérole ailments
    pub fn with_defaults() -> Self {
        use AilmentKind::*;
        use PokemonType as T;

        let mut registry = Self::new();
        registry.register(AilmentConfig::new(Fainted));
        registry.register(AilmentConfig::new(Paralysis).immune(&[T::Electric]));
        registry.register(AilmentConfig::new(Frozen).immune(&[T::Ice]));
        registry.register(AilmentConfig::new(Sleep));
        registry.register(
            AilmentConfig::new(Poison)
                .round_damage(1)
                .immune(&[T::Poison, T::Steel]),
        );
        registry.register(
            AilmentConfig::new(BadlyPoisoned)
                .round_damage(1)
                .immune(&[T::Poison, T::Steel]),
        );
        for (kind, damage) in [(Burn1, 1), (Burn2, 2), (Burn3, 3)] {
            registry.register(AilmentConfig::new(kind).round_damage(damage).immune(&[T::Fire]));
        }
        registry.register(AilmentConfig::new(Confused).volatile());
        registry.register(AilmentConfig::new(Disabled).volatile());
        registry.register(AilmentConfig::new(Infatuated).volatile());
        let mut flinch = AilmentConfig::new(Flinch).volatile();
        flinch.clears_at_round_end = true;
        registry.register(flinch);

        registry
    }

    pub fn is_volatile(&self, kind: AilmentKind) -> bool {
        self.get(kind).is_some_and(|c| c.volatile)
    }

    /// Damage this ailment deals in the end-of-round sweep
    pub fn round_damage(&self, kind: AilmentKind) -> i32 {
        self.get(kind).map_or(0, |c| c.round_damage.max(0))
    }

    /// Whether any of the given types is immune to `kind`
    pub fn is_immune(&self, kind: AilmentKind, types: &[PokemonType]) -> bool {
        self.get(kind)
            .is_some_and(|c| c.immune_types.iter().any(|t| types.contains(t)))
    }

    /// Inflict an ailment on a combatant
    ///
    /// All validation happens before the ailment list is touched. Any other
    /// member of the same family is removed first. Inflicting `fainted` marks
    /// the combatant defeated.
    pub fn apply(
        &self,
        combatant: &mut Combatant,
        kind: AilmentKind,
        extra: AilmentExtra,
    ) -> Result<ApplyOutcome, EngineError> {
        let mut ailment = Ailment::new(kind);
        match kind {
            AilmentKind::Disabled => {
                let move_uuid = extra.move_uuid.ok_or(EngineError::MissingAilmentData {
                    ailment: kind,
                    field: "moveUuid",
                })?;
                ailment.move_uuid = Some(move_uuid);
            }
            AilmentKind::Infatuated => {
                let source = extra.inflicted_by_uuid.ok_or(EngineError::MissingAilmentData {
                    ailment: kind,
                    field: "inflictedByUuid",
                })?;
                if source == combatant.id {
                    return Err(Refusal::SelfInfatuation.into());
                }
                ailment.inflicted_by_uuid = Some(source);
            }
            _ => {}
        }

        if self.is_immune(kind, &combatant.types) {
            return Err(Refusal::AilmentImmunity(kind).into());
        }

        // Several moves may be disabled at once
        let already_present = combatant.ailments.iter().any(|a| {
            a.kind == kind && (kind != AilmentKind::Disabled || a.move_uuid == ailment.move_uuid)
        });
        if already_present {
            return Ok(ApplyOutcome::AlreadyPresent);
        }

        let mut replaced = Vec::new();
        if let Some(family) = kind.family() {
            combatant.ailments.retain(|a| {
                let same_family = a.kind != kind && family.members().contains(&a.kind);
                if same_family {
                    replaced.push(a.kind);
                }
                !same_family
            });
        }

        combatant.ailments.push(ailment);
        if kind == AilmentKind::Fainted {
            combatant.defeated = true;
        }

        debug!(combatant = %combatant.id, ailment = %kind, ?replaced, "ailment applied");
        Ok(ApplyOutcome::Applied { replaced })
    }

    /// Remove every instance of `kind`, returning whether any was present
    pub fn remove(&self, combatant: &mut Combatant, kind: AilmentKind) -> bool {
        let before = combatant.ailments.len();
        combatant.ailments.retain(|a| a.kind != kind);
        if kind == AilmentKind::Fainted {
            combatant.defeated = false;
        }
        let removed = combatant.ailments.len() != before;
        if removed {
            debug!(combatant = %combatant.id, ailment = %kind, "ailment removed");
        }
        removed
    }

    /// Drop ailments that only last until the end of the round
    pub fn clear_round_end(&self, combatant: &mut Combatant) -> Vec<AilmentKind> {
        self.clear_where(combatant, |c| c.clears_at_round_end)
    }

    /// Drop every volatile ailment (end of encounter)
    pub fn clear_volatile(&self, combatant: &mut Combatant) -> Vec<AilmentKind> {
        self.clear_where(combatant, |c| c.volatile)
    }

    fn clear_where(
        &self,
        combatant: &mut Combatant,
        predicate: impl Fn(&AilmentConfig) -> bool,
    ) -> Vec<AilmentKind> {
        let mut cleared = Vec::new();
        combatant.ailments.retain(|a| {
            let clear = self.get(a.kind).is_some_and(&predicate);
            if clear {
                cleared.push(a.kind);
            }
            !clear
        });
        cleared
    }
}
