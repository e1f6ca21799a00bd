//! Engine errors and user-facing refusals

use crate::ailment::AilmentKind;
use crate::dice::DiceError;
use thiserror::Error;

/// A rule says the requested action cannot happen right now
///
/// Refusals are shown to the user; nothing has been mutated when one is
/// returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Refusal {
    #[error("You can't take any more actions this round.")]
    NoActionsLeft,
    #[error("{0} has already been used in the current round.")]
    MoveAlreadyUsed(String),
    #[error("{0} is disabled.")]
    MoveDisabled(String),
    #[error("{0} hasn't been learned.")]
    MoveNotLearned(String),
    #[error("{0} can't be clashed.")]
    MoveCannotBeClashed(String),
    #[error("{0} can't be evaded.")]
    MoveCannotBeEvaded(String),
    #[error("No moves to clash with. At least one physical or special move must be learned to clash.")]
    NoClashMove,
    #[error("Clash has already been used this round.")]
    ClashUsed,
    #[error("Evade has already been used this round.")]
    EvadeUsed,
    #[error("The Pokémon is immune to {0}.")]
    AilmentImmunity(AilmentKind),
    #[error("A Pokémon can't infatuate itself.")]
    SelfInfatuation,
    #[error("Not enough Will: {required} needed, {available} available.")]
    InsufficientWill { required: i32, available: i32 },
    #[error("Select at least one target.")]
    MissingTargets,
    #[error("This Pokémon hasn't learned any moves to disable.")]
    NoMovesToDisable,
}

/// Error returned by orchestration operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("{0}")]
    Refused(#[from] Refusal),
    #[error("Cancelled by the user")]
    Cancelled,
    #[error(transparent)]
    Dice(#[from] DiceError),
    #[error("Ailment {ailment} requires `{field}`")]
    MissingAilmentData {
        ailment: AilmentKind,
        field: &'static str,
    },
    #[error("Unknown stat: {0}")]
    UnknownStat(String),
    #[error("Unknown move: {0}")]
    UnknownMove(String),
    #[error("Unknown combatant: {0}")]
    UnknownCombatant(String),
    #[error("A combatant must have between 1 and 3 types, got {0}")]
    InvalidTyping(usize),
}

impl EngineError {
    /// Whether this error indicates a defect rather than a game situation
    pub fn is_hard(&self) -> bool {
        !matches!(self, EngineError::Refused(_) | EngineError::Cancelled)
    }

    pub fn refusal(&self) -> Option<&Refusal> {
        match self {
            EngineError::Refused(r) => Some(r),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
