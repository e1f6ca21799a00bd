//! Type effectiveness - Elemental weaknesses, resistances and immunities

mod chart;

pub use chart::TypeMatchups;

use crate::types::PokemonType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Add;

/// Signed effectiveness of one attack against one or more defending types
///
/// `Immune` behaves like negative infinity: adding anything to it stays immune.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchupScore {
    Immune,
    Score(i32),
}

impl MatchupScore {
    pub const NEUTRAL: MatchupScore = MatchupScore::Score(0);

    pub fn is_immune(&self) -> bool {
        matches!(self, MatchupScore::Immune)
    }

    /// Finite score, or `None` if immune
    pub fn value(&self) -> Option<i32> {
        match self {
            MatchupScore::Immune => None,
            MatchupScore::Score(v) => Some(*v),
        }
    }

    /// Announcement text for this score, if it is not neutral
    pub fn effectiveness_text(&self) -> Option<String> {
        match self {
            MatchupScore::Immune => Some("It doesn't affect the target...".to_string()),
            MatchupScore::Score(0) => None,
            MatchupScore::Score(v) if *v > 0 => Some(format!("It's super effective! (+{})", v)),
            MatchupScore::Score(v) => Some(format!("It's not very effective... ({})", v)),
        }
    }
}

impl Default for MatchupScore {
    fn default() -> Self {
        MatchupScore::NEUTRAL
    }
}

impl Add for MatchupScore {
    type Output = MatchupScore;

    fn add(self, rhs: MatchupScore) -> MatchupScore {
        match (self, rhs) {
            (MatchupScore::Score(a), MatchupScore::Score(b)) => MatchupScore::Score(a + b),
            _ => MatchupScore::Immune,
        }
    }
}

/// Attacking types grouped by how well they hit a defender
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupSummary {
    pub weak: Vec<PokemonType>,
    pub double_weak: Vec<PokemonType>,
    pub triple_weak: Vec<PokemonType>,
    pub resist: Vec<PokemonType>,
    pub double_resist: Vec<PokemonType>,
    pub triple_resist: Vec<PokemonType>,
    pub immune: Vec<PokemonType>,
}

/// Static mapping from defending type to its matchups
#[derive(Debug, Clone)]
pub struct TypeChart {
    matchups: HashMap<PokemonType, TypeMatchups>,
}

impl Default for TypeChart {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl TypeChart {
    /// The standard chart of 18 types plus the neutral `none` type
    pub fn with_defaults() -> Self {
        TypeChart {
            matchups: chart::standard_matchups(),
        }
    }

    /// A chart without rows; every defender is neutral until rows are set
    pub fn empty() -> Self {
        TypeChart {
            matchups: HashMap::new(),
        }
    }

    /// Replace the row for one defending type
    pub fn set_matchups(&mut self, defending: PokemonType, matchups: TypeMatchups) {
        self.matchups.insert(defending, matchups);
    }

    /// Matchups for a defending type; unknown entries fall back to `none`
    pub fn matchups(&self, defending: PokemonType) -> &TypeMatchups {
        self.matchups
            .get(&defending)
            .or_else(|| self.matchups.get(&PokemonType::None))
            .unwrap_or(&chart::NEUTRAL)
    }

    /// Score one attacking type against one defending type
    pub fn score(&self, attacking: PokemonType, defending: PokemonType) -> MatchupScore {
        let m = self.matchups(defending);
        if m.weak.contains(&attacking) {
            MatchupScore::Score(1)
        } else if m.resist.contains(&attacking) {
            MatchupScore::Score(-1)
        } else if m.immune.contains(&attacking) {
            MatchupScore::Immune
        } else {
            MatchupScore::NEUTRAL
        }
    }

    /// Sum of scores across all defending types; any immunity dominates
    pub fn score_against(&self, attacking: PokemonType, defending: &[PokemonType]) -> MatchupScore {
        defending
            .iter()
            .map(|d| self.score(attacking, *d))
            .fold(MatchupScore::NEUTRAL, |acc, s| acc + s)
    }

    /// Classify every known attacking type against the given defender
    pub fn summary(&self, defending: &[PokemonType]) -> MatchupSummary {
        let mut summary = MatchupSummary::default();

        for attacking in PokemonType::all() {
            match self.score_against(*attacking, defending) {
                MatchupScore::Immune => summary.immune.push(*attacking),
                MatchupScore::Score(1) => summary.weak.push(*attacking),
                MatchupScore::Score(2) => summary.double_weak.push(*attacking),
                MatchupScore::Score(3) => summary.triple_weak.push(*attacking),
                MatchupScore::Score(-1) => summary.resist.push(*attacking),
                MatchupScore::Score(-2) => summary.double_resist.push(*attacking),
                MatchupScore::Score(-3) => summary.triple_resist.push(*attacking),
                MatchupScore::Score(_) => {}
            }
        }

        summary
    }
}
