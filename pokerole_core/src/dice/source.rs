//! Randomness sources for dice pools

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Anything that can produce d6 results
pub trait DieSource: Send {
    /// Roll one six-sided die, returning a value in `1..=6`
    fn roll_d6(&mut self) -> u8;
}

/// Dice backed by a random number generator
#[derive(Debug, Clone)]
pub struct RandomDice<R: Rng = StdRng> {
    rng: R,
}

impl RandomDice<StdRng> {
    /// Seed from operating system entropy
    pub fn from_entropy() -> Self {
        RandomDice {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic dice for replays and tests
    pub fn seeded(seed: u64) -> Self {
        RandomDice {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomDice<R> {
    pub fn new(rng: R) -> Self {
        RandomDice { rng }
    }
}

impl<R: Rng + Send> DieSource for RandomDice<R> {
    fn roll_d6(&mut self) -> u8 {
        self.rng.gen_range(1..=6)
    }
}

/// Dice that replay a fixed sequence of values
///
/// Once the script runs out every further die shows 1.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    values: VecDeque<u8>,
}

impl ScriptedDice {
    pub fn new(values: impl IntoIterator<Item = u8>) -> Self {
        ScriptedDice {
            values: values.into_iter().map(|v| v.clamp(1, 6)).collect(),
        }
    }

    /// Queue more values behind the current script
    pub fn push(&mut self, values: impl IntoIterator<Item = u8>) {
        self.values.extend(values.into_iter().map(|v| v.clamp(1, 6)));
    }

    /// Number of scripted values not yet rolled
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl DieSource for ScriptedDice {
    fn roll_d6(&mut self) -> u8 {
        self.values.pop_front().unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_dice_replay_then_fail() {
        let mut dice = ScriptedDice::new([6, 4]);
        assert_eq!(dice.roll_d6(), 6);
        assert_eq!(dice.roll_d6(), 4);
        assert_eq!(dice.roll_d6(), 1);
    }

    #[test]
    fn test_scripted_dice_clamps_values() {
        let mut dice = ScriptedDice::new([9, 0]);
        assert_eq!(dice.roll_d6(), 6);
        assert_eq!(dice.roll_d6(), 1);
    }

    #[test]
    fn test_seeded_dice_are_deterministic() {
        let mut a = RandomDice::seeded(42);
        let mut b = RandomDice::seeded(42);
        let rolls_a: Vec<u8> = (0..20).map(|_| a.roll_d6()).collect();
        let rolls_b: Vec<u8> = (0..20).map(|_| b.roll_d6()).collect();
        assert_eq!(rolls_a, rolls_b);
        assert!(rolls_a.iter().all(|r| (1..=6).contains(r)));
    }
}
