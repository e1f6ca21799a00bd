//! Attribute score blocks and pain penalty tiers

use crate::types::{Attribute, SocialAttribute};
use serde::{Deserialize, Serialize};

/// The five core attributes of a combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeScores {
    pub strength: i32,
    pub dexterity: i32,
    pub vitality: i32,
    pub special: i32,
    pub insight: i32,
}

impl Default for AttributeScores {
    fn default() -> Self {
        AttributeScores {
            strength: 1,
            dexterity: 1,
            vitality: 1,
            special: 1,
            insight: 1,
        }
    }
}

impl AttributeScores {
    pub fn get(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Dexterity => self.dexterity,
            Attribute::Vitality => self.vitality,
            Attribute::Special => self.special,
            Attribute::Insight => self.insight,
        }
    }

    pub fn set(&mut self, attribute: Attribute, value: i32) {
        match attribute {
            Attribute::Strength => self.strength = value,
            Attribute::Dexterity => self.dexterity = value,
            Attribute::Vitality => self.vitality = value,
            Attribute::Special => self.special = value,
            Attribute::Insight => self.insight = value,
        }
    }
}

/// The five social attributes of a combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialScores {
    pub tough: i32,
    pub cool: i32,
    pub beauty: i32,
    pub cute: i32,
    pub clever: i32,
}

impl Default for SocialScores {
    fn default() -> Self {
        SocialScores {
            tough: 1,
            cool: 1,
            beauty: 1,
            cute: 1,
            clever: 1,
        }
    }
}

impl SocialScores {
    pub fn get(&self, attribute: SocialAttribute) -> i32 {
        match attribute {
            SocialAttribute::Tough => self.tough,
            SocialAttribute::Cool => self.cool,
            SocialAttribute::Beauty => self.beauty,
            SocialAttribute::Cute => self.cute,
            SocialAttribute::Clever => self.clever,
        }
    }
}

/// Constant penalty to rolls after taking heavy damage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PainPenalty {
    #[default]
    None,
    Minus1,
    Minus2,
    Minus3,
}

impl PainPenalty {
    /// Successes removed from each affected roll
    pub fn value(&self) -> i32 {
        match self {
            PainPenalty::None => 0,
            PainPenalty::Minus1 => 1,
            PainPenalty::Minus2 => 2,
            PainPenalty::Minus3 => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pain_penalty_table() {
        assert_eq!(PainPenalty::None.value(), 0);
        assert_eq!(PainPenalty::Minus1.value(), 1);
        assert_eq!(PainPenalty::Minus2.value(), 2);
        assert_eq!(PainPenalty::Minus3.value(), 3);
        assert_eq!(serde_json::to_string(&PainPenalty::Minus2).unwrap(), "\"minus2\"");
    }

    #[test]
    fn test_attribute_access() {
        let mut scores = AttributeScores::default();
        scores.set(Attribute::Special, 4);
        assert_eq!(scores.get(Attribute::Special), 4);
        assert_eq!(scores.get(Attribute::Insight), 1);
    }
}
