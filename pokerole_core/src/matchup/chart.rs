//! Standard type chart data

use crate::types::PokemonType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Weaknesses, resistances and immunities of one defending type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMatchups {
    #[serde(default)]
    pub weak: Vec<PokemonType>,
    #[serde(default)]
    pub resist: Vec<PokemonType>,
    #[serde(default)]
    pub immune: Vec<PokemonType>,
}

pub(super) static NEUTRAL: TypeMatchups = TypeMatchups {
    weak: Vec::new(),
    resist: Vec::new(),
    immune: Vec::new(),
};

fn entry(weak: &[PokemonType], resist: &[PokemonType], immune: &[PokemonType]) -> TypeMatchups {
    TypeMatchups {
        weak: weak.to_vec(),
        resist: resist.to_vec(),
        immune: immune.to_vec(),
    }
}

pub(super) fn standard_matchups() -> HashMap<PokemonType, TypeMatchups> {
    use PokemonType::*;

    let mut m = HashMap::new();
    m.insert(None, entry(&[], &[], &[]));
    m.insert(Normal, entry(&[Fighting], &[], &[Ghost]));
    m.insert(Bug, entry(&[Fire, Flying, Rock], &[Fighting, Grass, Ground], &[]));
    m.insert(Dark, entry(&[Bug, Fairy, Fighting], &[Dark, Ghost], &[Psychic]));
    m.insert(Dragon, entry(&[Dragon, Fairy, Ice], &[Electric, Fire, Grass, Water], &[]));
    m.insert(Electric, entry(&[Ground], &[Flying, Steel, Electric], &[]));
    m.insert(Fairy, entry(&[Poison, Steel], &[Bug, Dark, Fighting], &[Dragon]));
    m.insert(Fighting, entry(&[Fairy, Flying, Psychic], &[Bug, Dark, Rock], &[]));
    m.insert(
        Fire,
        entry(&[Ground, Rock, Water], &[Bug, Fairy, Fire, Grass, Ice, Steel], &[]),
    );
    m.insert(Flying, entry(&[Electric, Ice, Rock], &[Bug, Fighting, Grass], &[Ground]));
    m.insert(Ghost, entry(&[Dark, Ghost], &[Bug, Poison], &[Fighting, Normal]));
    m.insert(
        Grass,
        entry(&[Bug, Fire, Flying, Ice, Poison], &[Electric, Grass, Ground, Water], &[]),
    );
    m.insert(Ground, entry(&[Grass, Ice, Water], &[Poison, Rock], &[Electric]));
    m.insert(Ice, entry(&[Fighting, Fire, Rock, Steel], &[Ice], &[]));
    m.insert(
        Poison,
        entry(&[Ground, Psychic], &[Bug, Fairy, Fighting, Grass, Poison], &[]),
    );
    m.insert(Psychic, entry(&[Bug, Dark, Ghost], &[Fighting, Psychic], &[]));
    m.insert(
        Rock,
        entry(&[Grass, Ground, Fighting, Steel, Water], &[Fire, Flying, Normal, Poison], &[]),
    );
    m.insert(
        Steel,
        entry(
            &[Fighting, Fire, Ground],
            &[Bug, Dragon, Flying, Fairy, Grass, Ice, Normal, Psychic, Rock, Steel],
            &[Poison],
        ),
    );
    m.insert(Water, entry(&[Electric, Grass], &[Fire, Ice, Steel, Water], &[]));
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_an_entry() {
        let m = standard_matchups();
        for t in PokemonType::all() {
            assert!(m.contains_key(t), "Missing chart entry: {}", t);
        }
    }

    #[test]
    fn test_chart_deserializes() {
        let toml = r#"
weak = ["fighting"]
immune = ["ghost"]
"#;
        let parsed: TypeMatchups = toml::from_str(toml).unwrap();
        assert_eq!(parsed, standard_matchups()[&PokemonType::Normal]);
    }
}
