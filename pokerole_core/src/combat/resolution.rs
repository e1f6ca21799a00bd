//! Move resolution
//!
//! [`CombatResolver`] walks one use of a move through accuracy, the
//! defender's response, damage, healing and effects. Every user decision is
//! an await on the [`Presenter`]; decisions are gathered before the mutation
//! they guard, so a cancelled choice leaves combatants untouched.
//!
//! [`Presenter`]: super::Presenter

use super::collaborators::{
    Choice, ChoicePrompt, Collaborators, CombatantUpdate, DefenseChoice, MoveOption,
    MoveSelectionPurpose, NoticeLevel, PainResponse, RollBonus,
};
use super::result::{
    AccuracyOutcome, AppliedEffect, ChanceGroupRoll, ClashOutcome, DamageApplied, DamageOutcome,
    DefenseOutcome, EffectsOutcome, EvadeOutcome, HealOutcome, MoveReport, ResolutionStep,
    RoundEndOutcome, TargetDamage,
};
use crate::ailment::{compute_round_damage, AilmentExtra, AilmentKind, AilmentRegistry, ApplyOutcome};
use crate::combatant::{Combatant, DeriveRules, LedgerStat, PainPenalty};
use crate::config::{EngineConfig, GameConstants};
use crate::dice::{
    chance_dice_roll_with, pool_size, success_roll_with, DiceError, DieSource, RandomDice,
    SuccessRoll, MAX_DICE_POOL,
};
use crate::error::{EngineError, Refusal, Result};
use crate::matchup::{MatchupScore, TypeChart};
use crate::moves::{Effect, EffectCondition, EffectTarget, HealKind, Move};
use crate::round::{TurnAdvance, TurnEvent, TurnTracker};
use crate::types::{Attribute, CombatantId, MoveCategory, MoveTarget, PokemonType, StatKey};
use tracing::{debug, info, warn};

/// Who a planned effect lands on
#[derive(Debug, Clone, Copy)]
enum Recipient {
    User,
    Target(usize),
}

#[derive(Debug, Clone)]
enum PlannedChange {
    Ailment(AilmentKind, AilmentExtra),
    Stat(LedgerStat, i32),
}

/// Damage whose pain penalty choice has already been made
#[derive(Debug, Clone, Copy)]
struct DamagePlan {
    amount: i32,
    fainted: bool,
    pain: Option<PainPenalty>,
    toughed_it_out: bool,
}

/// Orchestrates rolls and rule effects for one combat session
pub struct CombatResolver {
    config: EngineConfig,
    constants: GameConstants,
    rules: DeriveRules,
    type_chart: TypeChart,
    ailments: AilmentRegistry,
    collaborators: Collaborators,
    dice: Box<dyn DieSource>,
}

impl CombatResolver {
    /// Create a resolver with the default tables and an entropy-seeded die
    pub fn new(config: EngineConfig, collaborators: Collaborators) -> Self {
        let constants = GameConstants::default();
        CombatResolver {
            rules: DeriveRules::new(&config, &constants),
            config,
            constants,
            type_chart: TypeChart::with_defaults(),
            ailments: AilmentRegistry::with_defaults(),
            collaborators,
            dice: Box::new(RandomDice::from_entropy()),
        }
    }

    pub fn with_constants(mut self, constants: GameConstants) -> Self {
        self.rules = DeriveRules::new(&self.config, &constants);
        self.constants = constants;
        self
    }

    pub fn with_type_chart(mut self, type_chart: TypeChart) -> Self {
        self.type_chart = type_chart;
        self
    }

    pub fn with_ailments(mut self, ailments: AilmentRegistry) -> Self {
        self.ailments = ailments;
        self
    }

    /// Replace the die source, e.g. with scripted dice in tests
    pub fn with_dice(mut self, dice: impl DieSource + 'static) -> Self {
        self.dice = Box::new(dice);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn constants(&self) -> &GameConstants {
        &self.constants
    }

    pub fn rules(&self) -> &DeriveRules {
        &self.rules
    }

    pub fn type_chart(&self) -> &TypeChart {
        &self.type_chart
    }

    pub fn ailments(&self) -> &AilmentRegistry {
        &self.ailments
    }

    // === Full move use ===

    /// Resolve one use of a move from accuracy through effects
    ///
    /// Targets that clash or evade successfully are spared the damage,
    /// healing and effects. A declined damage confirmation ends the
    /// resolution after the damage roll.
    pub async fn use_move(
        &mut self,
        user: &mut Combatant,
        targets: &mut [&mut Combatant],
        move_id: &str,
    ) -> Result<MoveReport> {
        let mut report = MoveReport::new(move_id);
        match self.drive_move(user, targets, &mut report).await {
            Ok(()) => {
                report.steps.push(ResolutionStep::Done);
                Ok(report)
            }
            Err(err) => {
                if err.is_hard() {
                    warn!(error = %err, move_id, "move resolution aborted");
                    self.collaborators
                        .presenter
                        .notify(NoticeLevel::Error, &err.to_string())
                        .await;
                }
                Err(err)
            }
        }
    }

    async fn drive_move(
        &mut self,
        user: &mut Combatant,
        targets: &mut [&mut Combatant],
        report: &mut MoveReport,
    ) -> Result<()> {
        let move_id = report.move_id.clone();
        let mv = find_move(user, &move_id)?;
        if let Some(refusal) = self.heal_refusal(user, &mv, Some(targets.len())) {
            return Err(self.refuse(refusal).await);
        }

        report.steps.push(ResolutionStep::AwaitingAccuracy);
        let accuracy = self.roll_accuracy(user, &move_id).await?;
        let (hit, successes) = (accuracy.hit, accuracy.successes);
        report.accuracy = Some(accuracy);
        if !hit {
            return Ok(());
        }

        let mut landed = vec![true; targets.len()];
        let aimed_at_foes = !matches!(
            mv.target,
            MoveTarget::User | MoveTarget::OneAlly | MoveTarget::UserAndAllies
        );
        if aimed_at_foes && (mv.can_be_clashed() || mv.can_be_evaded()) {
            report.steps.push(ResolutionStep::AwaitingClashOrEvadeChoice);
            for (index, target) in targets.iter_mut().enumerate() {
                let defense = self
                    .respond_to_attack(user, target, &move_id, successes)
                    .await?;
                landed[index] = !defense.negates_hit();
                report.defenses.push(defense);
            }
        }

        let mut hit_targets: Vec<&mut Combatant> = targets
            .iter_mut()
            .zip(&landed)
            .filter(|(_, landed)| **landed)
            .map(|(target, _)| &mut **target)
            .collect();

        if mv.is_damaging() && !hit_targets.is_empty() {
            report.steps.push(ResolutionStep::AwaitingDamageConfirm);
            let damage = self.roll_damage(user, &mut hit_targets, &move_id).await?;
            let applied = damage.applied;
            report.damage = Some(damage);
            if !applied {
                return Ok(());
            }
        }

        let heal_lost_targets = mv.heal_may_target_others() && hit_targets.is_empty();
        if mv.heal_amount(&self.constants).is_some() && !heal_lost_targets {
            report.heal = Some(self.apply_heal(user, &mut hit_targets, &move_id).await?);
        }

        if !mv.effect_groups.is_empty() {
            report.effects = Some(
                self.apply_move_effects(user, &mut hit_targets, &move_id)
                    .await?,
            );
        }
        Ok(())
    }

    // === Accuracy ===

    /// Roll accuracy for a move
    ///
    /// Required successes equal the actions the user already took this
    /// round. With round automation the roll spends an action and marks the
    /// move used.
    pub async fn roll_accuracy(
        &mut self,
        user: &mut Combatant,
        move_id: &str,
    ) -> Result<AccuracyOutcome> {
        let mv = find_move(user, move_id)?;
        if let Some(refusal) = self.accuracy_refusal(user, &mv) {
            return Err(self.refuse(refusal).await);
        }

        let bonus = self
            .ask_roll_bonus(format!("Accuracy roll: {}", mv.name), accuracy_formula(&mv))
            .await?;

        let dice = user.accuracy_pool(&mv, &self.rules) + bonus.pool;
        let modifier = bonus.constant
            - mv.attributes.accuracy_reduction
            - pain_for(user, &mv.accuracy.attribute_keys())
            - user.confusion_penalty()
            + user.stat_changes.value(LedgerStat::AccuracyMod);
        let required = user.action_count.value;

        let roll = self.roll(dice)?;
        let successes = roll.total(modifier);
        let hit = successes >= required;
        debug!(
            combatant = %user.id,
            move_id,
            dice,
            modifier,
            successes,
            required,
            hit,
            "accuracy roll"
        );
        self.announce(
            &format!("Accuracy roll: {}: {}", mv.name, roll.describe(modifier)),
            &user.id,
        )
        .await;

        if self.config.round_resource_automation {
            user.increase_action_count();
            if let Some(used) = user.find_move_mut(move_id) {
                used.used_in_round = true;
            }
            self.commit(user, CombatantUpdate::new().with_round_resources(user))
                .await;
        }

        Ok(AccuracyOutcome {
            move_id: move_id.to_string(),
            roll,
            modifier,
            successes,
            required,
            hit,
        })
    }

    fn accuracy_refusal(&self, user: &Combatant, mv: &Move) -> Option<Refusal> {
        if !mv.is_usable() {
            return Some(Refusal::MoveNotLearned(mv.name.clone()));
        }
        if user.is_move_disabled(&mv.id) {
            return Some(Refusal::MoveDisabled(mv.name.clone()));
        }
        if self.config.round_resource_automation {
            if !user.has_available_actions() {
                return Some(Refusal::NoActionsLeft);
            }
            if mv.used_in_round {
                return Some(Refusal::MoveAlreadyUsed(mv.name.clone()));
            }
        }
        self.heal_refusal(user, mv, None)
    }

    /// Healing moves need Will for their cost and, when they may heal
    /// others, at least one target. `None` skips the target check.
    fn heal_refusal(
        &self,
        user: &Combatant,
        mv: &Move,
        target_count: Option<usize>,
    ) -> Option<Refusal> {
        if mv.heal_amount(&self.constants).is_none() {
            return None;
        }
        if target_count == Some(0) && mv.heal_may_target_others() {
            return Some(Refusal::MissingTargets);
        }
        let cost = mv.heal.will_point_cost;
        if cost > user.will.value {
            return Some(Refusal::InsufficientWill {
                required: cost,
                available: user.will.value,
            });
        }
        None
    }

    // === Defender responses ===

    /// Ask the defender how to answer a landed attack
    pub async fn respond_to_attack(
        &mut self,
        attacker: &mut Combatant,
        defender: &mut Combatant,
        move_id: &str,
        attacker_successes: i32,
    ) -> Result<DefenseOutcome> {
        let attack = find_move(attacker, move_id)?;
        let automation = self.config.round_resource_automation;
        let can_clash = attack.can_be_clashed() && (!automation || defender.can_clash);
        let can_evade = attack.can_be_evaded() && (!automation || defender.can_evade);
        if !can_clash && !can_evade {
            return Ok(DefenseOutcome::TookHit {
                defender_id: defender.id.clone(),
            });
        }

        let prompt = ChoicePrompt::DefenseResponse {
            defender: defender.id.clone(),
            attacker: attacker.id.clone(),
            move_name: attack.name.clone(),
            can_clash,
            can_evade,
        };
        match self.choose_as(prompt, Choice::into_defense).await? {
            DefenseChoice::Clash => self
                .clash(attacker, defender, move_id, attacker_successes)
                .await
                .map(DefenseOutcome::Clashed),
            DefenseChoice::Evade => self
                .evade(attacker, defender, move_id, attacker_successes)
                .await
                .map(DefenseOutcome::Evaded),
            DefenseChoice::TakeHit => Ok(DefenseOutcome::TookHit {
                defender_id: defender.id.clone(),
            }),
        }
    }

    /// Clash an incoming attack with one of the defender's own moves
    ///
    /// On success both sides take `max(1 + score, 0)` damage from the other's
    /// move type, or none if immune. Pain choices for both sides come before
    /// the clash is spent.
    pub async fn clash(
        &mut self,
        attacker: &mut Combatant,
        defender: &mut Combatant,
        move_id: &str,
        attacker_successes: i32,
    ) -> Result<ClashOutcome> {
        let automation = self.config.round_resource_automation;
        let attack = find_move(attacker, move_id)?;
        if !attack.can_be_clashed() {
            return Err(self.refuse(Refusal::MoveCannotBeClashed(attack.name)).await);
        }
        if automation && !defender.can_clash {
            return Err(self.refuse(Refusal::ClashUsed).await);
        }

        let options: Vec<MoveOption> = defender
            .learned_moves()
            .filter(|m| m.category != MoveCategory::Support)
            .filter(|m| !defender.is_move_disabled(&m.id))
            .filter(|m| !(automation && m.used_in_round))
            .map(move_option)
            .collect();
        if options.is_empty() {
            return Err(self.refuse(Refusal::NoClashMove).await);
        }

        let prompt = ChoicePrompt::SelectMove {
            combatant: defender.id.clone(),
            purpose: MoveSelectionPurpose::Clash,
            options: options.clone(),
        };
        let clash_id = self.choose_as(prompt, Choice::into_move).await?;
        if !options.iter().any(|o| o.id == clash_id) {
            warn!(move_id = %clash_id, "selected clash move was not offered");
            return Err(EngineError::Cancelled);
        }
        let clash_move = find_move(defender, &clash_id)?;

        let attribute = match clash_move.category {
            MoveCategory::Special => Attribute::Special,
            _ => Attribute::Strength,
        };
        let bonus = self
            .ask_roll_bonus(
                format!("Clash: {}", clash_move.name),
                format!("{}+clash", attribute.as_str()),
            )
            .await?;

        let key = StatKey::Attribute(attribute);
        let dice = defender.stat_value(&key, &self.rules) + defender.skill("clash") + bonus.pool;
        let modifier =
            bonus.constant - defender.pain_penalty_for(&key) - defender.confusion_penalty();
        let roll = self.roll(dice)?;
        let successes = roll.total(modifier);
        let success = successes >= attacker_successes;
        debug!(combatant = %defender.id, successes, required = attacker_successes, success, "clash roll");
        self.announce(
            &format!("Clash: {}: {}", clash_move.name, roll.describe(modifier)),
            &defender.id,
        )
        .await;

        let exchange = if success {
            let to_defender = self.clash_damage(attack.move_type, &defender.types);
            let to_attacker = self.clash_damage(clash_move.move_type, &attacker.types);
            let defender_plan = self
                .plan_damage(defender, defender.hp.value, to_defender)
                .await?;
            let attacker_plan = self
                .plan_damage(attacker, attacker.hp.value, to_attacker)
                .await?;
            Some((defender_plan, attacker_plan))
        } else {
            None
        };

        if automation {
            defender.can_clash = false;
            self.commit(defender, CombatantUpdate::new().with_round_resources(defender))
                .await;
        }

        let mut outcome = ClashOutcome {
            defender_id: defender.id.clone(),
            clash_move_id: clash_id,
            roll,
            successes,
            required: attacker_successes,
            success,
            defender_damage: None,
            attacker_damage: None,
        };
        if let Some((defender_plan, attacker_plan)) = exchange {
            self.announce(
                &format!(
                    "{} clashed! {} takes {} damage and {} takes {} damage.",
                    defender.name,
                    defender.name,
                    defender_plan.amount,
                    attacker.name,
                    attacker_plan.amount
                ),
                &defender.id,
            )
            .await;
            outcome.defender_damage = Some(self.settle_damage(defender, defender_plan).await);
            outcome.attacker_damage = Some(self.settle_damage(attacker, attacker_plan).await);
        }
        Ok(outcome)
    }

    fn clash_damage(&self, move_type: PokemonType, defending: &[PokemonType]) -> i32 {
        match self.type_chart.score_against(move_type, defending).value() {
            Some(score) => (1 + score).max(0),
            None => 0,
        }
    }

    /// Try to dodge an incoming attack with Dexterity + Evasion
    pub async fn evade(
        &mut self,
        attacker: &Combatant,
        defender: &mut Combatant,
        move_id: &str,
        attacker_successes: i32,
    ) -> Result<EvadeOutcome> {
        let automation = self.config.round_resource_automation;
        let attack = find_move(attacker, move_id)?;
        if !attack.can_be_evaded() {
            return Err(self.refuse(Refusal::MoveCannotBeEvaded(attack.name)).await);
        }
        if automation && !defender.can_evade {
            return Err(self.refuse(Refusal::EvadeUsed).await);
        }

        let bonus = self
            .ask_roll_bonus("Evade".to_string(), "dexterity+evasion".to_string())
            .await?;

        let key = StatKey::Attribute(Attribute::Dexterity);
        let dice = defender.derived(&self.rules).evade + bonus.pool;
        let modifier =
            bonus.constant - defender.pain_penalty_for(&key) - defender.confusion_penalty();
        let roll = self.roll(dice)?;
        let successes = roll.total(modifier);
        let success = successes >= attacker_successes;
        debug!(combatant = %defender.id, successes, required = attacker_successes, success, "evade roll");
        self.announce(&format!("Evade: {}", roll.describe(modifier)), &defender.id)
            .await;

        if automation {
            defender.can_evade = false;
            self.commit(defender, CombatantUpdate::new().with_round_resources(defender))
                .await;
        }

        Ok(EvadeOutcome {
            defender_id: defender.id.clone(),
            roll,
            successes,
            required: attacker_successes,
            success,
        })
    }

    // === Damage ===

    /// Roll damage against every target, then apply it once confirmed
    ///
    /// All damage options are collected before the first die is rolled, and
    /// every pain penalty choice before the first HP changes. Leech healing
    /// and recoil are settled after the targets take damage.
    pub async fn roll_damage(
        &mut self,
        user: &mut Combatant,
        targets: &mut [&mut Combatant],
        move_id: &str,
    ) -> Result<DamageOutcome> {
        let mv = find_move(user, move_id)?;
        if targets.is_empty() {
            return Err(self.refuse(Refusal::MissingTargets).await);
        }
        let stab = mv.is_stab(&user.types);

        let mut plans = Vec::with_capacity(targets.len());
        for target in targets.iter() {
            let matchup = self.type_chart.score_against(mv.move_type, &target.types);
            let prompt = ChoicePrompt::DamageRoll {
                move_name: mv.name.clone(),
                target: target.id.clone(),
                stab,
                effectiveness: matchup.effectiveness_text(),
            };
            let options = self.choose_as(prompt, Choice::into_damage).await?;
            plans.push((matchup, options));
        }

        let stab_bonus = if stab { self.constants.stab_bonus } else { 0 };
        let base_pool = user.damage_pool(&mv, &self.rules) + stab_bonus;

        let mut outcome = DamageOutcome::default();
        for (target, (matchup, options)) in targets.iter().zip(plans) {
            let crit_bonus = if options.critical { self.constants.crit_bonus } else { 0 };
            let dice = base_pool + options.bonus.pool + crit_bonus - self.defense_against(&mv, target);
            let roll = self.roll(dice)?;
            let base = roll.total(options.bonus.constant).max(0);
            let damage = final_damage(base, matchup, options.hold_back);
            debug!(target = %target.id, dice, base, damage, "damage roll");

            let mut text = format!(
                "Damage roll: {} against {}: {}.",
                mv.name,
                target.name,
                roll.describe(options.bonus.constant)
            );
            if let Some(effectiveness) = matchup.effectiveness_text() {
                text.push(' ');
                text.push_str(&effectiveness);
            }
            let crit = if options.critical { "A critical hit! " } else { "" };
            text.push_str(&format!(" {}The attack deals {} damage!", crit, damage));
            self.announce(&text, &user.id).await;

            outcome.targets.push(TargetDamage {
                target_id: target.id.clone(),
                roll,
                critical: options.critical,
                held_back: options.hold_back,
                matchup,
                base,
                damage,
            });
        }

        if mv.heal.kind == HealKind::Leech {
            outcome.leech = outcome.targets.iter().map(|t| t.damage / 2).sum();
        }
        if mv.attributes.recoil {
            let before_effectiveness: i32 = outcome.targets.iter().map(|t| t.base).sum();
            let roll = self.roll(before_effectiveness)?;
            outcome.recoil = roll.successes;
            self.announce(
                &format!("Recoil: {}", roll.describe(0)),
                &user.id,
            )
            .await;
            outcome.recoil_roll = Some(roll);
        }

        let mut message: Vec<String> = outcome
            .targets
            .iter()
            .zip(targets.iter())
            .map(|(hit, target)| format!("{} takes {} damage", target.name, hit.damage))
            .collect();
        if outcome.leech > 0 {
            message.push(format!("{} heals {} HP", user.name, outcome.leech));
        }
        if outcome.recoil > 0 {
            message.push(format!("{} takes {} recoil damage", user.name, outcome.recoil));
        }
        let prompt = ChoicePrompt::Confirm {
            title: format!("Apply damage: {}", mv.name),
            message: message.join("\n"),
        };
        if !self.choose_as(prompt, Choice::into_confirm).await? {
            info!(move_id, "damage not applied");
            return Ok(outcome);
        }

        let mut target_plans = Vec::with_capacity(targets.len());
        for (target, hit) in targets.iter().zip(&outcome.targets) {
            target_plans.push(self.plan_damage(target, target.hp.value, hit.damage).await?);
        }
        let recoil_plan = if outcome.recoil > 0 {
            let hp_after_leech = (user.hp.value + outcome.leech)
                .min(user.hp.max)
                .max(user.hp.value);
            Some(self.plan_damage(user, hp_after_leech, outcome.recoil).await?)
        } else {
            None
        };

        outcome.applied = true;
        for (target, plan) in targets.iter_mut().zip(target_plans) {
            let applied = self.settle_damage(target, plan).await;
            outcome.applications.push(applied);
        }
        if outcome.leech > 0 {
            user.heal(outcome.leech);
            self.commit(user, CombatantUpdate::new().with_hp(user)).await;
        }
        if let Some(plan) = recoil_plan {
            let applied = self.settle_damage(user, plan).await;
            outcome.applications.push(applied);
        }
        Ok(outcome)
    }

    fn defense_against(&self, mv: &Move, target: &Combatant) -> i32 {
        if mv.attributes.ignores_defenses {
            return 0;
        }
        let derived = target.derived(&self.rules);
        match mv.category {
            MoveCategory::Physical => derived.def,
            MoveCategory::Special => derived.sp_def,
            MoveCategory::Support => 0,
        }
    }

    /// Take HP from a combatant, handling fainting and pain penalties
    ///
    /// The pain penalty choice is made before HP changes, so cancelling it
    /// leaves the combatant untouched.
    pub async fn apply_damage(
        &self,
        combatant: &mut Combatant,
        amount: i32,
    ) -> Result<DamageApplied> {
        let plan = self.plan_damage(combatant, combatant.hp.value, amount).await?;
        Ok(self.settle_damage(combatant, plan).await)
    }

    /// Ask for the pain penalty decision a hit would trigger
    ///
    /// `hp_before` is the HP the damage will land on, which differs from the
    /// current HP when a heal is settled first.
    async fn plan_damage(
        &self,
        combatant: &Combatant,
        hp_before: i32,
        amount: i32,
    ) -> Result<DamagePlan> {
        let amount = amount.max(0);
        let after = (hp_before - amount).max(0);
        let fainted = hp_before > 0 && after == 0;
        let pain = if fainted {
            None
        } else {
            pain_trigger(hp_before, after, combatant.hp.max, combatant.pain_penalty)
        };

        let will_cost = self.constants.will_to_ignore_pain;
        let mut toughed_it_out = false;
        if let Some(penalty) = pain {
            if combatant.will.value >= will_cost {
                let prompt = ChoicePrompt::PainPenalty {
                    combatant: combatant.id.clone(),
                    penalty,
                    will_cost,
                };
                toughed_it_out =
                    self.choose_as(prompt, Choice::into_pain).await? == PainResponse::ToughItOut;
            }
        }

        Ok(DamagePlan {
            amount,
            fainted,
            pain,
            toughed_it_out,
        })
    }

    async fn settle_damage(&self, combatant: &mut Combatant, plan: DamagePlan) -> DamageApplied {
        let before = combatant.hp.value;
        combatant.take_damage(plan.amount);
        let mut update = CombatantUpdate::new().with_hp(combatant);
        let mut applied_penalty = None;
        let will_cost = self.constants.will_to_ignore_pain;

        if plan.fainted {
            if let Err(err) = self
                .ailments
                .apply(combatant, AilmentKind::Fainted, AilmentExtra::default())
            {
                warn!(combatant = %combatant.id, error = %err, "could not mark fainted");
            }
            update = update.with_ailments(combatant);
            info!(combatant = %combatant.id, "fainted");
            self.announce(&format!("{} fainted!", combatant.name), &combatant.id)
                .await;
        } else if let Some(penalty) = plan.pain {
            if plan.toughed_it_out {
                combatant.will.value -= will_cost;
                update = update.with_will(combatant);
                self.announce(
                    &format!("{} spends {} Will to tough it out!", combatant.name, will_cost),
                    &combatant.id,
                )
                .await;
            } else {
                combatant.pain_penalty = penalty;
                applied_penalty = Some(penalty);
                update = update.with_pain_penalty(combatant);
            }
        }
        self.commit(combatant, update).await;

        DamageApplied {
            combatant_id: combatant.id.clone(),
            hp_before: before,
            hp_after: combatant.hp.value,
            fainted: plan.fainted,
            pain_penalty: applied_penalty,
            toughed_it_out: plan.toughed_it_out,
        }
    }

    // === Healing ===

    /// Heal with a basic, complete or custom healing move
    ///
    /// Will is spent here. [`use_move`](Self::use_move) checks the cost before
    /// the accuracy roll; moves without such a heal do nothing.
    pub async fn apply_heal(
        &mut self,
        user: &mut Combatant,
        targets: &mut [&mut Combatant],
        move_id: &str,
    ) -> Result<HealOutcome> {
        let mv = find_move(user, move_id)?;
        let Some(amount) = mv.heal_amount(&self.constants) else {
            return Ok(HealOutcome::default());
        };

        if let Some(refusal) = self.heal_refusal(user, &mv, Some(targets.len())) {
            return Err(self.refuse(refusal).await);
        }
        let heals_others = mv.heal_may_target_others();
        let cost = mv.heal.will_point_cost;

        let mut outcome = HealOutcome::default();
        if heals_others {
            for target in targets.iter_mut() {
                let restored = target.heal(amount);
                self.commit(target, CombatantUpdate::new().with_hp(target))
                    .await;
                outcome.healed.push((target.id.clone(), restored));
            }
        } else {
            let restored = user.heal(amount);
            outcome.healed.push((user.id.clone(), restored));
        }

        let mut update = CombatantUpdate::new().with_hp(user);
        if cost > 0 {
            user.will.value -= cost;
            outcome.will_spent = cost;
            update = update.with_will(user);
        }
        self.commit(user, update).await;

        for (id, restored) in &outcome.healed {
            debug!(combatant = %id, restored, "healed");
        }
        let summary: Vec<String> = outcome
            .healed
            .iter()
            .map(|(id, restored)| format!("{} restores {} HP", id, restored))
            .collect();
        self.announce(&format!("{}: {}", mv.name, summary.join(", ")), &user.id)
            .await;
        Ok(outcome)
    }

    // === Ailments and effects ===

    /// Inflict an ailment chosen by the user
    ///
    /// Burn and poison ask which tier to inflict; disabling asks which move;
    /// infatuation needs the combatant responsible.
    pub async fn inflict_ailment(
        &self,
        target: &mut Combatant,
        kind: AilmentKind,
        source: Option<&CombatantId>,
    ) -> Result<ApplyOutcome> {
        let kind = match kind.family() {
            Some(family) => {
                let options = family.members().to_vec();
                let prompt = ChoicePrompt::AilmentVariant {
                    options: options.clone(),
                };
                let chosen = self.choose_as(prompt, Choice::into_ailment).await?;
                if !options.contains(&chosen) {
                    warn!(ailment = %chosen, "selected ailment was not offered");
                    return Err(EngineError::Cancelled);
                }
                chosen
            }
            None => kind,
        };

        let extra = match kind {
            AilmentKind::Infatuated => match source {
                Some(source) => AilmentExtra::infatuated_with(source.clone()),
                None => return Err(self.refuse(Refusal::MissingTargets).await),
            },
            _ => self.ailment_extra(target, kind).await?,
        };

        match self.ailments.apply(target, kind, extra) {
            Ok(outcome) => {
                self.commit(target, CombatantUpdate::new().with_ailments(target))
                    .await;
                Ok(outcome)
            }
            Err(EngineError::Refused(refusal)) => Err(self.refuse(refusal).await),
            Err(err) => Err(err),
        }
    }

    /// Remove an ailment and store the result
    pub async fn remove_ailment(&self, target: &mut Combatant, kind: AilmentKind) -> bool {
        let removed = self.ailments.remove(target, kind);
        if removed {
            self.commit(target, CombatantUpdate::new().with_ailments(target))
                .await;
        }
        removed
    }

    /// Extra data for ailments that need it; asks which move to disable
    async fn ailment_extra(&self, target: &Combatant, kind: AilmentKind) -> Result<AilmentExtra> {
        if kind != AilmentKind::Disabled {
            return Ok(AilmentExtra::default());
        }
        let options: Vec<MoveOption> = target.learned_moves().map(move_option).collect();
        if options.is_empty() {
            return Err(self.refuse(Refusal::NoMovesToDisable).await);
        }
        let prompt = ChoicePrompt::SelectMove {
            combatant: target.id.clone(),
            purpose: MoveSelectionPurpose::Disable,
            options: options.clone(),
        };
        let move_id = self.choose_as(prompt, Choice::into_move).await?;
        if !options.iter().any(|o| o.id == move_id) {
            warn!(move_id = %move_id, "selected move to disable was not offered");
            return Err(EngineError::Cancelled);
        }
        Ok(AilmentExtra::disabling(move_id))
    }

    /// Apply a move's unconditional and chance dice effect groups
    ///
    /// Each group is offered in turn; a declined group is skipped, and a
    /// chance group is only rolled once accepted. Chance dice are rolled and
    /// every choice is made before the first effect lands. Effects naming an
    /// unknown stat are skipped with a warning; the rest still apply. Nothing
    /// happens in recovery mode.
    pub async fn apply_move_effects(
        &mut self,
        user: &mut Combatant,
        targets: &mut [&mut Combatant],
        move_id: &str,
    ) -> Result<EffectsOutcome> {
        let mv = find_move(user, move_id)?;
        let mut outcome = EffectsOutcome::default();
        if self.config.recovery_mode {
            debug!(move_id, "move effects suppressed in recovery mode");
            outcome.suppressed = true;
            return Ok(outcome);
        }

        for group in mv.chance_dice_groups() {
            if let EffectCondition::ChanceDice { amount } = group.condition {
                if amount > MAX_DICE_POOL {
                    return Err(DiceError::PoolTooLarge {
                        requested: amount,
                        max: MAX_DICE_POOL,
                    }
                    .into());
                }
            }
        }

        let mut effects: Vec<Effect> = Vec::new();
        for group in mv.effect_groups.iter().filter(|g| !g.effects.is_empty()) {
            let description = group.describe();
            let prompt = ChoicePrompt::Confirm {
                title: format!("Apply effects: {}", mv.name),
                message: description.clone(),
            };
            if !self.choose_as(prompt, Choice::into_confirm).await? {
                info!(move_id, group = %description, "effect group declined");
                outcome.declined.push(description);
                continue;
            }
            let EffectCondition::ChanceDice { amount } = group.condition else {
                effects.extend(group.effects.iter().cloned());
                continue;
            };
            let roll = chance_dice_roll_with(self.dice.as_mut(), amount)?;
            let verdict = if roll.has_six { "Success!" } else { "No effect." };
            self.announce(
                &format!("{}: {:?} {}", description, roll.rolls, verdict),
                &user.id,
            )
            .await;
            if roll.has_six {
                effects.extend(group.effects.iter().cloned());
            }
            outcome.chance_rolls.push(ChanceGroupRoll { description, roll });
        }

        let mut planned = Vec::new();
        for effect in &effects {
            let recipients: Vec<Recipient> = match effect.affects() {
                EffectTarget::User => vec![Recipient::User],
                EffectTarget::Targets => (0..targets.len()).map(Recipient::Target).collect(),
            };
            match effect {
                Effect::StatChange { stat, amount, .. } => match stat.parse::<LedgerStat>() {
                    Ok(ledger_stat) => planned.extend(
                        recipients
                            .into_iter()
                            .map(|r| (r, PlannedChange::Stat(ledger_stat, *amount))),
                    ),
                    Err(_) => {
                        warn!(stat = %stat, move_id, "unknown stat in move effect, skipped");
                        outcome.effects.push(AppliedEffect::Skipped {
                            reason: format!("Unknown stat: {}", stat),
                        });
                    }
                },
                Effect::Ailment { ailment, .. } => {
                    for recipient in recipients {
                        let combatant: &Combatant = match recipient {
                            Recipient::User => &*user,
                            Recipient::Target(index) => &*targets[index],
                        };
                        let extra = match ailment {
                            AilmentKind::Infatuated => AilmentExtra::infatuated_with(user.id.clone()),
                            kind => match self.ailment_extra(combatant, *kind).await {
                                Ok(extra) => extra,
                                Err(EngineError::Refused(refusal)) => {
                                    outcome.effects.push(AppliedEffect::AilmentRefused {
                                        combatant_id: combatant.id.clone(),
                                        ailment: *kind,
                                        refusal: refusal.to_string(),
                                    });
                                    continue;
                                }
                                Err(err) => return Err(err),
                            },
                        };
                        planned.push((recipient, PlannedChange::Ailment(*ailment, extra)));
                    }
                }
            }
        }

        let mut touched_user = false;
        let mut touched = vec![false; targets.len()];
        for (recipient, change) in planned {
            let combatant: &mut Combatant = match recipient {
                Recipient::User => {
                    touched_user = true;
                    &mut *user
                }
                Recipient::Target(index) => {
                    touched[index] = true;
                    &mut *targets[index]
                }
            };
            let applied = self.apply_change(combatant, change).await?;
            outcome.effects.push(applied);
        }

        if touched_user {
            self.commit_conditions(user).await;
        }
        for (target, touched) in targets.iter().zip(touched) {
            if touched {
                self.commit_conditions(target).await;
            }
        }
        Ok(outcome)
    }

    async fn apply_change(
        &self,
        combatant: &mut Combatant,
        change: PlannedChange,
    ) -> Result<AppliedEffect> {
        let combatant_id = combatant.id.clone();
        match change {
            PlannedChange::Stat(stat, amount) => {
                if combatant.stat_changes.apply_delta(stat, amount) {
                    let value = combatant.stat_changes.value(stat);
                    debug!(combatant = %combatant_id, stat = stat.as_str(), amount, value, "stat changed");
                    Ok(AppliedEffect::StatChange {
                        combatant_id,
                        stat,
                        amount,
                        value,
                    })
                } else {
                    let message = format!(
                        "{}'s {} is already changed by at least {}.",
                        combatant.name,
                        stat.label(),
                        amount.abs()
                    );
                    self.collaborators
                        .presenter
                        .notify(NoticeLevel::Warning, &message)
                        .await;
                    Ok(AppliedEffect::StatChangeIgnored {
                        combatant_id,
                        stat,
                        amount,
                    })
                }
            }
            PlannedChange::Ailment(kind, extra) => match self.ailments.apply(combatant, kind, extra) {
                Ok(ApplyOutcome::Applied { replaced }) => Ok(AppliedEffect::Ailment {
                    combatant_id,
                    ailment: kind,
                    replaced,
                }),
                Ok(ApplyOutcome::AlreadyPresent) => Ok(AppliedEffect::AilmentAlreadyPresent {
                    combatant_id,
                    ailment: kind,
                }),
                Err(EngineError::Refused(refusal)) => {
                    let refusal = self.refuse(refusal).await.to_string();
                    Ok(AppliedEffect::AilmentRefused {
                        combatant_id,
                        ailment: kind,
                        refusal,
                    })
                }
                Err(err) => Err(err),
            },
        }
    }

    async fn commit_conditions(&self, combatant: &Combatant) {
        let update = CombatantUpdate::new()
            .with_ailments(combatant)
            .with_stat_changes(combatant);
        self.commit(combatant, update).await;
    }

    // === Rounds ===

    /// Start the encounter; resets round resources under automation
    pub async fn start_combat(&self, combatants: &mut [Combatant], tracker: &mut TurnTracker) {
        let automation = self.config.round_resource_automation;
        tracker.start_combat(combatants, automation);
        if automation {
            for combatant in combatants.iter() {
                self.commit(combatant, CombatantUpdate::new().with_round_resources(combatant))
                    .await;
            }
        }
        self.collaborators
            .broadcaster
            .announce("Combat started!", None)
            .await;
    }

    /// Move to the next combatant able to act, announcing flinches
    pub async fn next_turn(
        &self,
        combatants: &mut [Combatant],
        tracker: &mut TurnTracker,
    ) -> TurnAdvance {
        let advance = tracker.next_turn(combatants, &self.ailments);
        for event in &advance.events {
            let TurnEvent::Flinched(id) = event else {
                continue;
            };
            if let Some(combatant) = combatants.iter().find(|c| &c.id == id) {
                let update = CombatantUpdate::new()
                    .with_round_resources(combatant)
                    .with_ailments(combatant);
                self.commit(combatant, update).await;
                self.announce(&format!("{} flinched!", combatant.name), id)
                    .await;
            }
        }
        advance
    }

    /// Close the round: settle ailment damage and clear round-long ailments
    ///
    /// Ailment damage is computed for every combatant before any of it is
    /// applied and confirmed once as a whole. Pain choices for every
    /// combatant are made before the first HP changes.
    pub async fn end_round(
        &self,
        combatants: &mut [Combatant],
        tracker: &mut TurnTracker,
    ) -> Result<RoundEndOutcome> {
        let pending = compute_round_damage(&self.ailments, combatants);
        let mut outcome = RoundEndOutcome::default();

        if !pending.is_empty() {
            let prompt = ChoicePrompt::Confirm {
                title: "Ailment damage".to_string(),
                message: pending.describe(),
            };
            if self.choose_as(prompt, Choice::into_confirm).await? {
                let mut plans = Vec::with_capacity(pending.entries.len());
                for entry in &pending.entries {
                    let Some(combatant) = combatants.iter().find(|c| c.id == entry.combatant_id)
                    else {
                        warn!(combatant = %entry.combatant_id, "combatant left before ailment damage");
                        continue;
                    };
                    let plan = self
                        .plan_damage(combatant, combatant.hp.value, entry.damage)
                        .await?;
                    plans.push((entry.combatant_id.clone(), plan));
                }
                for (id, plan) in plans {
                    if let Some(combatant) = combatants.iter_mut().find(|c| c.id == id) {
                        outcome
                            .applications
                            .push(self.settle_damage(combatant, plan).await);
                    }
                }
                outcome.damage_applied = true;
            }
        }

        for combatant in combatants.iter_mut() {
            let cleared = self.ailments.clear_round_end(combatant);
            if !cleared.is_empty() {
                self.commit(combatant, CombatantUpdate::new().with_ailments(combatant))
                    .await;
                outcome.cleared.push((combatant.id.clone(), cleared));
            }
        }

        tracker.end_round();
        info!(round = tracker.round(), "round ended");
        outcome.pending = pending;
        Ok(outcome)
    }

    /// Open the next round
    ///
    /// Under round automation the user confirms first, then every
    /// combatant's round resources are reset.
    pub async fn next_round(
        &self,
        combatants: &mut [Combatant],
        tracker: &mut TurnTracker,
    ) -> Result<()> {
        let automation = self.config.round_resource_automation;
        if automation {
            let prompt = ChoicePrompt::Confirm {
                title: "Next round".to_string(),
                message: "Start the next round? Actions, clash and evade are reset for every combatant."
                    .to_string(),
            };
            if !self.choose_as(prompt, Choice::into_confirm).await? {
                return Err(EngineError::Cancelled);
            }
        }

        tracker.next_round(combatants, automation);
        if automation {
            for combatant in combatants.iter() {
                self.commit(combatant, CombatantUpdate::new().with_round_resources(combatant))
                    .await;
            }
        }
        self.collaborators
            .broadcaster
            .announce(&format!("Round {}", tracker.round()), None)
            .await;
        Ok(())
    }

    /// End the encounter, clearing volatile ailments and stat changes
    pub async fn end_encounter(&self, combatants: &mut [Combatant], tracker: &mut TurnTracker) {
        tracker.end_combat();
        for combatant in combatants.iter_mut() {
            let cleared = self.ailments.clear_volatile(combatant);
            let had_changes = !combatant.stat_changes.is_empty();
            combatant.stat_changes.clear();
            if !cleared.is_empty() || had_changes {
                self.commit_conditions(combatant).await;
            }
        }
        info!("encounter ended");
    }

    // === Collaborator plumbing ===

    fn roll(&mut self, dice: i32) -> Result<SuccessRoll> {
        Ok(success_roll_with(self.dice.as_mut(), pool_size(dice))?)
    }

    async fn refuse(&self, refusal: Refusal) -> EngineError {
        warn!(%refusal, "refused");
        self.collaborators
            .presenter
            .notify(NoticeLevel::Warning, &refusal.to_string())
            .await;
        EngineError::Refused(refusal)
    }

    /// Present a choice and unwrap the expected answer
    ///
    /// Closing the prompt cancels; an answer of the wrong kind is treated
    /// the same way.
    async fn choose_as<T>(
        &self,
        prompt: ChoicePrompt,
        extract: fn(Choice) -> Option<T>,
    ) -> Result<T> {
        let choice = self
            .collaborators
            .presenter
            .present_choice(prompt)
            .await
            .ok_or(EngineError::Cancelled)?;
        extract(choice).ok_or_else(|| {
            warn!("presenter answered with the wrong kind of choice");
            EngineError::Cancelled
        })
    }

    async fn ask_roll_bonus(&self, title: String, formula: String) -> Result<RollBonus> {
        self.choose_as(ChoicePrompt::RollBonus { title, formula }, Choice::into_roll_bonus)
            .await
    }

    async fn announce(&self, text: &str, speaker: &CombatantId) {
        self.collaborators
            .broadcaster
            .announce(text, Some(speaker))
            .await;
    }

    async fn commit(&self, combatant: &Combatant, update: CombatantUpdate) {
        if !update.is_empty() {
            self.collaborators
                .persistence
                .commit(&combatant.id, update)
                .await;
        }
    }
}

fn find_move(combatant: &Combatant, move_id: &str) -> Result<Move> {
    combatant
        .find_move(move_id)
        .cloned()
        .ok_or_else(|| EngineError::UnknownMove(move_id.to_string()))
}

fn move_option(mv: &Move) -> MoveOption {
    MoveOption {
        id: mv.id.clone(),
        name: mv.name.clone(),
    }
}

/// e.g. "dexterity/special+brawl"
fn accuracy_formula(mv: &Move) -> String {
    let join = |keys: Vec<StatKey>| {
        keys.iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("/")
    };
    let attribute = join(mv.accuracy.attribute_keys());
    let skill = join(mv.accuracy.skill_keys());
    match (attribute.is_empty(), skill.is_empty()) {
        (_, true) => attribute,
        (true, false) => skill,
        (false, false) => format!("{}+{}", attribute, skill),
    }
}

/// Pain applies unless every attribute the roll uses is exempt
fn pain_for(combatant: &Combatant, keys: &[StatKey]) -> i32 {
    let exempt = !keys.is_empty() && keys.iter().all(|k| !k.suffers_pain_penalty());
    if exempt {
        0
    } else {
        combatant.pain_penalty.value()
    }
}

/// Damage after effectiveness and holding back
///
/// Effectiveness only modifies a positive roll. Immune targets take nothing.
fn final_damage(base: i32, matchup: MatchupScore, hold_back: bool) -> i32 {
    let Some(score) = matchup.value() else {
        return 0;
    };
    let mut damage = if base > 0 { (base + score).max(0) } else { 0 };
    if hold_back && damage > 0 {
        damage = (damage / 2).max(1);
    }
    damage
}

/// Pain penalty newly earned by dropping from `before` to `after` HP
fn pain_trigger(before: i32, after: i32, max: i32, current: PainPenalty) -> Option<PainPenalty> {
    if after == 1 && before != 1 && current < PainPenalty::Minus2 {
        return Some(PainPenalty::Minus2);
    }
    if after * 2 < max && before * 2 > max && current < PainPenalty::Minus1 {
        return Some(PainPenalty::Minus1);
    }
    None
}
