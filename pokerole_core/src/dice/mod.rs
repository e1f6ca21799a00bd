//! Dice pools
//!
//! Pokérole rolls pools of six-sided dice:
//! - Success rolls count every die above 3
//! - Chance dice succeed if any die shows a 6

mod source;

pub use source::{DieSource, RandomDice, ScriptedDice};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest pool that may be rolled at once
pub const MAX_DICE_POOL: u32 = 999;

/// A die counts as a success above this value
pub const SUCCESS_THRESHOLD: u8 = 3;

/// Dice input validation error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiceError {
    #[error("Dice pool of {requested} exceeds the maximum of {max}")]
    PoolTooLarge { requested: u32, max: u32 },
}

/// Outcome of a success roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessRoll {
    /// Dice that counted as successes
    pub successes: i32,
    /// Individual die values
    pub rolls: Vec<u8>,
}

impl SuccessRoll {
    /// Successes plus a constant modifier; may be negative
    pub fn total(&self, modifier: i32) -> i32 {
        self.successes + modifier
    }

    /// Compact description such as "3 successes [6, 2, 4, 5]"
    pub fn describe(&self, modifier: i32) -> String {
        let total = self.total(modifier);
        let noun = if total == 1 { "success" } else { "successes" };
        format!("{} {} {:?}", total, noun, self.rolls)
    }
}

/// Outcome of a chance dice roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChanceRoll {
    pub has_six: bool,
    pub rolls: Vec<u8>,
}

fn check_pool(n: u32) -> Result<(), DiceError> {
    if n > MAX_DICE_POOL {
        return Err(DiceError::PoolTooLarge {
            requested: n,
            max: MAX_DICE_POOL,
        });
    }
    Ok(())
}

/// Clamp a possibly negative pool size to a rollable count
pub fn pool_size(dice: i32) -> u32 {
    dice.max(0) as u32
}

/// Roll `n` dice and count those above 3 (RNG handled internally)
pub fn success_roll(n: u32) -> Result<SuccessRoll, DiceError> {
    success_roll_with(&mut RandomDice::from_entropy(), n)
}

/// Roll `n` dice from the given source and count those above 3
pub fn success_roll_with(dice: &mut dyn DieSource, n: u32) -> Result<SuccessRoll, DiceError> {
    check_pool(n)?;

    let rolls: Vec<u8> = (0..n).map(|_| dice.roll_d6()).collect();
    let successes = rolls.iter().filter(|r| **r > SUCCESS_THRESHOLD).count() as i32;

    Ok(SuccessRoll { successes, rolls })
}

/// Roll `n` chance dice (RNG handled internally)
pub fn chance_dice_roll(n: u32) -> Result<ChanceRoll, DiceError> {
    chance_dice_roll_with(&mut RandomDice::from_entropy(), n)
}

/// Roll `n` chance dice from the given source; succeeds on any natural 6
pub fn chance_dice_roll_with(dice: &mut dyn DieSource, n: u32) -> Result<ChanceRoll, DiceError> {
    check_pool(n)?;

    let rolls: Vec<u8> = (0..n).map(|_| dice.roll_d6()).collect();
    let has_six = rolls.contains(&6);

    Ok(ChanceRoll { has_six, rolls })
}
