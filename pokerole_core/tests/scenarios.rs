//! Integration test: rule scenarios from combatant setup through resolution
//!
//! Each test builds its combatants, drives the resolver with scripted dice
//! and answers, and checks state alongside what was committed and announced.

mod common;

use common::*;
use pokerole_core::combat::{ChoicePrompt, NoticeLevel, PainResponse};
use pokerole_core::combatant::PainPenalty;
use pokerole_core::config::EngineConfig;
use pokerole_core::matchup::MatchupScore;
use pokerole_core::moves::{Effect, EffectGroup, EffectTarget, Move};
use pokerole_core::types::{MoveCategory, PokemonType};
use pokerole_core::{AilmentKind, EngineError, LedgerStat, Rank, Refusal};

/// Sandshrew with a STAB Earthquake
fn sandshrew() -> pokerole_core::Combatant {
    let mut c = pokemon("sandshrew", "Sandshrew", &[PokemonType::Ground], 4, [2, 2, 2, 1, 1]);
    c.moves.push(Move::new(
        "earthquake",
        "Earthquake",
        MoveCategory::Physical,
        PokemonType::Ground,
        4,
    ));
    c
}

/// Water type with a deep HP pool; HP 7
fn squirtle() -> pokerole_core::Combatant {
    pokemon("squirtle", "Squirtle", &[PokemonType::Water], 6, [2, 2, 1, 2, 2])
}

#[tokio::test]
async fn test_immune_target_takes_no_damage() {
    let harness = Harness::new([damage(false), confirm(true)]);
    let mut resolver = harness.resolver([6, 6, 6, 6]);
    let mut user = sandshrew();
    let mut zapdos = pokemon(
        "zapdos",
        "Zapdos",
        &[PokemonType::Electric, PokemonType::Flying],
        5,
        [2, 2, 1, 3, 2],
    );

    let outcome = resolver
        .roll_damage(&mut user, &mut [&mut zapdos], "earthquake")
        .await
        .unwrap();

    // Power 4 + STAB 1 - Def 1
    let hit = &outcome.targets[0];
    assert_eq!(hit.roll.rolls.len(), 4);
    assert_eq!(hit.base, 4);
    assert_eq!(hit.matchup, MatchupScore::Immune);
    assert_eq!(hit.damage, 0);
    assert_eq!(zapdos.hp.value, zapdos.hp.max);

    match &harness.presenter.prompts()[0] {
        ChoicePrompt::DamageRoll {
            stab,
            effectiveness,
            ..
        } => {
            assert!(*stab);
            assert_eq!(effectiveness.as_deref(), Some("It doesn't affect the target..."));
        }
        other => panic!("expected a damage prompt, got {:?}", other),
    }
    assert!(harness.broadcaster.contains("The attack deals 0 damage!"));
}

#[tokio::test]
async fn test_opposing_stat_changes_partially_cancel() {
    let harness = Harness::new([confirm(true), confirm(true)]);
    let mut resolver = harness.resolver([]);
    let mut user = eevee();
    user.moves.push(
        Move::new("sand-attack", "Sand Attack", MoveCategory::Support, PokemonType::Ground, 0)
            .with_effect_group(EffectGroup::unconditional(vec![Effect::StatChange {
                stat: "dexterity".to_string(),
                amount: -2,
                affects: EffectTarget::Targets,
            }])),
    );
    user.moves.push(
        Move::new("work-up", "Work Up", MoveCategory::Support, PokemonType::Normal, 0)
            .with_effect_group(EffectGroup::unconditional(vec![Effect::StatChange {
                stat: "dexterity".to_string(),
                amount: 1,
                affects: EffectTarget::Targets,
            }])),
    );
    let mut target = pikachu();

    resolver
        .apply_move_effects(&mut user, &mut [&mut target], "sand-attack")
        .await
        .unwrap();
    resolver
        .apply_move_effects(&mut user, &mut [&mut target], "work-up")
        .await
        .unwrap();

    assert_eq!(target.stat_changes.value(LedgerStat::Dexterity), -1);
    let derived = target.derived(resolver.rules());
    assert_eq!(derived.attributes.dexterity, 2);
    assert_eq!(
        harness.persistence.last_for("pikachu").unwrap().stat_changes,
        Some(target.stat_changes.clone())
    );
}

#[test]
fn test_rank_raises_skill_limit() {
    let mut c = eevee();
    c.rank = Rank::Rookie;
    assert_eq!(c.skill_limit(), 2);
    c.rank = Rank::Standard;
    assert_eq!(c.skill_limit(), 3);
}

#[tokio::test]
async fn test_required_successes_follow_actions_taken() {
    let config = EngineConfig {
        round_resource_automation: false,
        ..EngineConfig::default()
    };
    let harness = Harness::new([bonus(), bonus()]);
    let mut resolver = harness.resolver_with(config, [4, 4, 4, 4, 4, 4, 4, 4, 4, 1]);
    let mut user = pikachu();
    for _ in 0..5 {
        user.increase_action_count();
    }

    // Dexterity 3 + Brawl 2
    let hit = resolver.roll_accuracy(&mut user, "tackle").await.unwrap();
    assert_eq!(hit.required, 5);
    assert_eq!(hit.successes, 5);
    assert!(hit.hit);

    let miss = resolver.roll_accuracy(&mut user, "tackle").await.unwrap();
    assert_eq!(miss.successes, 4);
    assert!(!miss.hit);

    // Manual mode leaves the counter alone
    assert_eq!(user.action_count.value, 5);
    assert!(harness.persistence.commits().is_empty());
}

#[tokio::test]
async fn test_no_actions_left_refuses_roll() {
    let harness = Harness::new([]);
    let mut resolver = harness.resolver([]);
    let mut user = pikachu();
    for _ in 0..5 {
        user.increase_action_count();
    }

    let err = resolver.roll_accuracy(&mut user, "tackle").await.unwrap_err();
    assert_eq!(err, EngineError::Refused(Refusal::NoActionsLeft));
    assert!(harness.presenter.prompts().is_empty());
    assert_eq!(
        harness.presenter.notices(),
        vec![(
            NoticeLevel::Warning,
            "You can't take any more actions this round.".to_string()
        )]
    );
}

#[tokio::test]
async fn test_critical_super_effective_hit_takes_pain_penalty() {
    let harness = Harness::new([damage(true), confirm(true), pain(PainResponse::Accept)]);
    let mut resolver = harness.resolver([6, 5, 4, 4, 1, 2]);
    let mut user = pikachu();
    let mut spark = Move::new("spark", "Spark", MoveCategory::Physical, PokemonType::Electric, 3);
    spark.attributes.ignores_defenses = true;
    user.moves.push(spark);
    let mut target = squirtle();
    assert_eq!(target.hp.value, 7);

    // Power 3 + STAB 1 + critical 2
    let outcome = resolver
        .roll_damage(&mut user, &mut [&mut target], "spark")
        .await
        .unwrap();

    assert_eq!(outcome.targets[0].roll.successes, 4);
    assert_eq!(outcome.targets[0].damage, 5);
    assert!(outcome.applied);
    assert_eq!(target.hp.value, 2);
    assert_eq!(target.pain_penalty, PainPenalty::Minus1);
    assert_eq!(outcome.applications[0].pain_penalty, Some(PainPenalty::Minus1));

    let prompts = harness.presenter.prompts();
    assert_eq!(prompts.len(), 3);
    assert!(matches!(prompts[2], ChoicePrompt::PainPenalty { will_cost: 1, .. }));
    assert!(harness.broadcaster.contains("A critical hit!"));

    let update = harness.persistence.last_for("squirtle").unwrap();
    assert_eq!(update.hp, Some(2));
    assert_eq!(update.pain_penalty, Some(PainPenalty::Minus1));
}

#[tokio::test]
async fn test_toughing_out_pain_spends_will() {
    let harness = Harness::new([pain(PainResponse::ToughItOut)]);
    let resolver = harness.resolver([]);
    let mut target = squirtle();
    let will = target.will.value;

    let applied = resolver.apply_damage(&mut target, 5).await.unwrap();

    assert!(applied.toughed_it_out);
    assert_eq!(applied.pain_penalty, None);
    assert_eq!(target.pain_penalty, PainPenalty::None);
    assert_eq!(target.will.value, will - 1);
    assert!(harness.broadcaster.contains("Squirtle spends 1 Will to tough it out!"));
}

#[tokio::test]
async fn test_no_pain_prompt_without_will() {
    let harness = Harness::new([]);
    let resolver = harness.resolver([]);
    let mut target = squirtle();
    target.will.value = 0;

    resolver.apply_damage(&mut target, 6).await.unwrap();

    assert!(harness.presenter.prompts().is_empty());
    assert_eq!(target.hp.value, 1);
    assert_eq!(target.pain_penalty, PainPenalty::Minus2);
}

#[tokio::test]
async fn test_faint_and_revive() {
    let harness = Harness::new([]);
    let resolver = harness.resolver([]);
    let mut target = eevee();

    let applied = resolver.apply_damage(&mut target, 10).await.unwrap();
    assert!(applied.fainted);
    assert_eq!(applied.lost(), 6);
    assert!(target.defeated);
    assert!(target.has_ailment(AilmentKind::Fainted));
    assert!(harness.broadcaster.contains("Eevee fainted!"));
    assert_eq!(harness.persistence.last_for("eevee").unwrap().defeated, Some(true));

    assert!(resolver.remove_ailment(&mut target, AilmentKind::Fainted).await);
    assert!(!target.defeated);
    assert!(!target.has_ailment(AilmentKind::Fainted));
    assert_eq!(harness.persistence.last_for("eevee").unwrap().defeated, Some(false));

    // Nothing left to remove, nothing committed
    let commits = harness.persistence.commits().len();
    assert!(!resolver.remove_ailment(&mut target, AilmentKind::Fainted).await);
    assert_eq!(harness.persistence.commits().len(), commits);
}

#[tokio::test]
async fn test_inflict_burn_asks_for_tier() {
    let harness = Harness::new([Some(pokerole_core::Choice::Ailment(AilmentKind::Burn2))]);
    let resolver = harness.resolver([]);
    let mut target = eevee();

    resolver
        .inflict_ailment(&mut target, AilmentKind::Burn1, None)
        .await
        .unwrap();

    assert!(target.has_ailment(AilmentKind::Burn2));
    assert!(!target.has_ailment(AilmentKind::Burn1));
    assert!(matches!(
        harness.presenter.prompts()[0],
        ChoicePrompt::AilmentVariant { .. }
    ));
}

#[tokio::test]
async fn test_infatuation_needs_a_source() {
    let harness = Harness::new([]);
    let resolver = harness.resolver([]);
    let mut target = eevee();

    let err = resolver
        .inflict_ailment(&mut target, AilmentKind::Infatuated, None)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::Refused(Refusal::MissingTargets));

    let source = "pikachu".to_string();
    resolver
        .inflict_ailment(&mut target, AilmentKind::Infatuated, Some(&source))
        .await
        .unwrap();
    assert_eq!(
        target.ailments[0].inflicted_by_uuid.as_deref(),
        Some("pikachu")
    );
}
