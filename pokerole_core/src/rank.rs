//! Rank progression
//!
//! Each rank grants point budgets on reaching it and sets caps that apply
//! while the combatant holds it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;

/// Character progression tier, in ascending order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    #[default]
    None,
    Starter,
    Rookie,
    Standard,
    Advanced,
    Expert,
    Ace,
    Master,
    Champion,
}

/// Points granted on reaching a rank
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankBudget {
    pub attribute_points: i32,
    pub skill_points: i32,
    pub social_points: i32,
}

impl AddAssign for RankBudget {
    fn add_assign(&mut self, rhs: Self) {
        self.attribute_points += rhs.attribute_points;
        self.skill_points += rhs.skill_points;
        self.social_points += rhs.social_points;
    }
}

/// Everything a single rank defines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankTier {
    pub budget: RankBudget,
    /// Highest value any skill may reach
    pub skill_limit: i32,
    /// Most targets a multi-target move may select
    pub max_targets: u32,
    /// Added to initiative and both defenses
    pub passive_increase: i32,
    /// Accuracy penalty while confused
    pub confusion_penalty: i32,
}

const fn tier(
    points: (i32, i32, i32),
    skill_limit: i32,
    max_targets: u32,
    passive_increase: i32,
    confusion_penalty: i32,
) -> RankTier {
    RankTier {
        budget: RankBudget {
            attribute_points: points.0,
            skill_points: points.1,
            social_points: points.2,
        },
        skill_limit,
        max_targets,
        passive_increase,
        confusion_penalty,
    }
}

impl Rank {
    pub fn all() -> &'static [Rank] {
        &[
            Rank::None,
            Rank::Starter,
            Rank::Rookie,
            Rank::Standard,
            Rank::Advanced,
            Rank::Expert,
            Rank::Ace,
            Rank::Master,
            Rank::Champion,
        ]
    }

    pub fn tier(&self) -> RankTier {
        match self {
            Rank::None => tier((0, 0, 0), 0, 0, 0, 1),
            Rank::Starter => tier((0, 5, 0), 1, 2, 0, 1),
            Rank::Rookie => tier((2, 4, 2), 2, 2, 0, 1),
            Rank::Standard => tier((2, 3, 2), 3, 3, 0, 1),
            Rank::Advanced => tier((2, 2, 2), 4, 5, 0, 2),
            Rank::Expert => tier((2, 1, 2), 5, 6, 0, 2),
            Rank::Ace => tier((0, 0, 0), 5, 6, 0, 3),
            Rank::Master => tier((0, 0, 0), 5, 6, 2, 3),
            Rank::Champion => tier((0, 0, 0), 5, 6, 2, 3),
        }
    }

    pub fn skill_limit(&self) -> i32 {
        self.tier().skill_limit
    }

    pub fn passive_increase(&self) -> i32 {
        self.tier().passive_increase
    }

    pub fn confusion_penalty(&self) -> i32 {
        self.tier().confusion_penalty
    }

    pub fn max_targets(&self) -> u32 {
        self.tier().max_targets
    }

    /// Points earned advancing from `from` to `to`
    ///
    /// Sums the budget of every rank above `from` up to and including `to`.
    /// Moving down or staying put earns nothing.
    pub fn advancement_budget(from: Rank, to: Rank) -> RankBudget {
        let mut total = RankBudget::default();
        for rank in Rank::all().iter().filter(|r| **r > from && **r <= to) {
            total += rank.tier().budget;
        }
        total
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::None => "none",
            Rank::Starter => "starter",
            Rank::Rookie => "rookie",
            Rank::Standard => "standard",
            Rank::Advanced => "advanced",
            Rank::Expert => "expert",
            Rank::Ace => "ace",
            Rank::Master => "master",
            Rank::Champion => "champion",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
