//! Prelude module for convenient imports
//!
//! ```rust
//! use pokerole_core::prelude::*;
//! ```

// Combatants
pub use crate::combatant::{Combatant, DeriveRules, LedgerStat, PainPenalty};
pub use crate::rank::Rank;
pub use crate::types::{Attribute, CombatantId, MoveCategory, MoveTarget, PokemonType, StatKey};

// Moves
pub use crate::moves::{Effect, EffectGroup, EffectTarget, Move};

// Rules tables
pub use crate::ailment::{AilmentExtra, AilmentKind, AilmentRegistry};
pub use crate::matchup::{MatchupScore, TypeChart};

// Dice
pub use crate::dice::{chance_dice_roll, success_roll, DieSource, ScriptedDice};

// Combat
pub use crate::combat::{
    Broadcaster, Choice, ChoicePrompt, Collaborators, CombatResolver, CombatantUpdate, Persistence,
    Presenter,
};
pub use crate::round::TurnTracker;

// Config and errors
pub use crate::config::{EngineConfig, GameConstants};
pub use crate::error::{EngineError, Refusal};
