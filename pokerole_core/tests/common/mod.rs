//! Scripted collaborators and combatant builders shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use pokerole_core::combat::{
    Broadcaster, Choice, ChoicePrompt, Collaborators, CombatResolver, CombatantUpdate,
    DamageOptions, DefenseChoice, NoticeLevel, PainResponse, Persistence, Presenter, RollBonus,
};
use pokerole_core::config::{EngineConfig, GameConstants};
use pokerole_core::dice::ScriptedDice;
use pokerole_core::moves::Move;
use pokerole_core::types::{CombatantId, MoveCategory, PokemonType};
use pokerole_core::Combatant;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Answers prompts from a fixed script and records everything it was asked
#[derive(Default)]
pub struct ScriptedPresenter {
    answers: Mutex<VecDeque<Option<Choice>>>,
    prompts: Mutex<Vec<ChoicePrompt>>,
    notices: Mutex<Vec<(NoticeLevel, String)>>,
}

impl ScriptedPresenter {
    pub fn prompts(&self) -> Vec<ChoicePrompt> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<(NoticeLevel, String)> {
        self.notices.lock().unwrap().clone()
    }

    pub fn unanswered(&self) -> usize {
        self.answers.lock().unwrap().len()
    }
}

#[async_trait]
impl Presenter for ScriptedPresenter {
    async fn present_choice(&self, prompt: ChoicePrompt) -> Option<Choice> {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted answer for {:?}", prompt))
    }

    async fn notify(&self, level: NoticeLevel, message: &str) {
        self.notices.lock().unwrap().push((level, message.to_string()));
    }
}

#[derive(Default)]
pub struct RecordingPersistence {
    commits: Mutex<Vec<(CombatantId, CombatantUpdate)>>,
}

impl RecordingPersistence {
    pub fn commits(&self) -> Vec<(CombatantId, CombatantUpdate)> {
        self.commits.lock().unwrap().clone()
    }

    /// Most recent update stored for a combatant
    pub fn last_for(&self, id: &str) -> Option<CombatantUpdate> {
        self.commits
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(c, _)| c == id)
            .map(|(_, u)| u.clone())
    }
}

#[async_trait]
impl Persistence for RecordingPersistence {
    async fn commit(&self, combatant: &CombatantId, update: CombatantUpdate) {
        self.commits.lock().unwrap().push((combatant.clone(), update));
    }
}

#[derive(Default)]
pub struct RecordingBroadcaster {
    messages: Mutex<Vec<String>>,
}

impl RecordingBroadcaster {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.messages.lock().unwrap().iter().any(|m| m.contains(text))
    }
}

#[async_trait]
impl Broadcaster for RecordingBroadcaster {
    async fn announce(&self, text: &str, _speaker: Option<&CombatantId>) {
        self.messages.lock().unwrap().push(text.to_string());
    }
}

/// The three recording collaborators behind one resolver
pub struct Harness {
    pub presenter: Arc<ScriptedPresenter>,
    pub persistence: Arc<RecordingPersistence>,
    pub broadcaster: Arc<RecordingBroadcaster>,
}

impl Harness {
    pub fn new(answers: impl IntoIterator<Item = Option<Choice>>) -> Self {
        let presenter = ScriptedPresenter {
            answers: Mutex::new(answers.into_iter().collect()),
            ..ScriptedPresenter::default()
        };
        Harness {
            presenter: Arc::new(presenter),
            persistence: Arc::new(RecordingPersistence::default()),
            broadcaster: Arc::new(RecordingBroadcaster::default()),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            presenter: self.presenter.clone(),
            persistence: self.persistence.clone(),
            broadcaster: self.broadcaster.clone(),
        }
    }

    pub fn resolver(&self, dice: impl IntoIterator<Item = u8>) -> CombatResolver {
        self.resolver_with(EngineConfig::default(), dice)
    }

    pub fn resolver_with(
        &self,
        config: EngineConfig,
        dice: impl IntoIterator<Item = u8>,
    ) -> CombatResolver {
        CombatResolver::new(config, self.collaborators()).with_dice(ScriptedDice::new(dice))
    }
}

// === Scripted answers ===

pub fn bonus() -> Option<Choice> {
    Some(Choice::RollBonus(RollBonus::default()))
}

pub fn confirm(yes: bool) -> Option<Choice> {
    Some(Choice::Confirm(yes))
}

pub fn defend(choice: DefenseChoice) -> Option<Choice> {
    Some(Choice::Defense(choice))
}

pub fn pick(move_id: &str) -> Option<Choice> {
    Some(Choice::Move(move_id.to_string()))
}

pub fn damage(critical: bool) -> Option<Choice> {
    Some(Choice::Damage(DamageOptions {
        critical,
        ..DamageOptions::default()
    }))
}

pub fn pain(response: PainResponse) -> Option<Choice> {
    Some(Choice::Pain(response))
}

// === Combatants ===

/// A combatant with full HP and Will
///
/// `attributes` is strength, dexterity, vitality, special, insight.
pub fn pokemon(
    id: &str,
    name: &str,
    types: &[PokemonType],
    base_hp: i32,
    attributes: [i32; 5],
) -> Combatant {
    let mut c = Combatant::new(id, name, types.to_vec()).unwrap();
    let [strength, dexterity, vitality, special, insight] = attributes;
    c.attributes.strength = strength;
    c.attributes.dexterity = dexterity;
    c.attributes.vitality = vitality;
    c.attributes.special = special;
    c.attributes.insight = insight;
    c.base_hp = base_hp;
    c.recompute_pools(&EngineConfig::default(), &GameConstants::default());
    c.hp.value = c.hp.max;
    c.will.value = c.will.max;
    c
}

/// Electric type; HP 6, Will 4, knows Tackle and Thunder Shock
pub fn pikachu() -> Combatant {
    let mut c = pokemon("pikachu", "Pikachu", &[PokemonType::Electric], 4, [2, 3, 2, 3, 2]);
    for (skill, value) in [("brawl", 2), ("channel", 2), ("clash", 1), ("evasion", 1)] {
        c.skills.insert(skill.to_string(), value);
    }
    c.moves.push(tackle());
    c.moves.push(thunder_shock());
    c
}

/// Normal type; HP 6, Will 3, Def 2, knows Quick Attack
pub fn eevee() -> Combatant {
    let mut c = pokemon("eevee", "Eevee", &[PokemonType::Normal], 4, [2, 2, 2, 1, 1]);
    for (skill, value) in [("brawl", 1), ("clash", 1), ("evasion", 1)] {
        c.skills.insert(skill.to_string(), value);
    }
    c.moves.push(quick_attack());
    c
}

// === Moves ===

pub fn tackle() -> Move {
    let mut mv = Move::new("tackle", "Tackle", MoveCategory::Physical, PokemonType::Normal, 2)
        .with_accuracy("dexterity", Some("brawl"));
    mv.damage_attribute = Some("strength".to_string());
    mv
}

pub fn quick_attack() -> Move {
    let mut mv = Move::new(
        "quick-attack",
        "Quick Attack",
        MoveCategory::Physical,
        PokemonType::Normal,
        1,
    )
    .with_accuracy("dexterity", Some("brawl"));
    mv.damage_attribute = Some("strength".to_string());
    mv
}

pub fn thunder_shock() -> Move {
    let mut mv = Move::new(
        "thunder-shock",
        "Thunder Shock",
        MoveCategory::Special,
        PokemonType::Electric,
        2,
    )
    .with_accuracy("dexterity", Some("channel"));
    mv.damage_attribute = Some("special".to_string());
    mv
}
