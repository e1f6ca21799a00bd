//! pokerole_core - Rules engine for the Pokérole tabletop RPG
//!
//! This library provides:
//! - TypeChart: Elemental weaknesses, resistances and immunities
//! - Dice: Success and chance dice pools with an injectable die source
//! - Combatant: Scores, derived stats, the stat change ledger and resources
//! - AilmentRegistry: Ailment families, immunities and end-of-round damage
//! - TurnTracker: Initiative order and the round state machine
//! - CombatResolver: Move resolution against presentation, persistence and
//!   broadcast collaborators

pub mod ailment;
pub mod combat;
pub mod combatant;
pub mod config;
pub mod dice;
pub mod error;
pub mod matchup;
pub mod moves;
pub mod prelude;
pub mod rank;
pub mod round;
pub mod types;

// Re-export core types for convenience
pub use ailment::{Ailment, AilmentConfig, AilmentExtra, AilmentKind, AilmentRegistry, ApplyOutcome};
pub use combat::{
    Broadcaster, Choice, ChoicePrompt, Collaborators, CombatResolver, CombatantUpdate, MoveReport,
    Persistence, Presenter,
};
pub use combatant::{Combatant, DeriveRules, DerivedStats, LedgerStat, ModifierLedger, PainPenalty};
pub use config::{ConfigError, EngineConfig, GameConstants, SpecialDefenseStat};
pub use dice::{ChanceRoll, DiceError, DieSource, RandomDice, ScriptedDice, SuccessRoll};
pub use error::{EngineError, Refusal};
pub use matchup::{MatchupScore, MatchupSummary, TypeChart};
pub use moves::{Effect, EffectGroup, Move};
pub use rank::Rank;
pub use round::{RoundPhase, TurnTracker};
pub use types::{CombatantId, MoveCategory, MoveTarget, PokemonType, StatKey};
