//! Combat orchestration - Accuracy, defense, damage and effects over async collaborators

mod collaborators;
mod resolution;
mod result;

pub use collaborators::{
    Broadcaster, Choice, ChoicePrompt, Collaborators, CombatantUpdate, DamageOptions,
    DefenseChoice, MoveOption, MoveSelectionPurpose, NoticeLevel, PainResponse, Persistence,
    Presenter, RollBonus,
};
pub use resolution::CombatResolver;
pub use result::{
    AccuracyOutcome, AppliedEffect, ChanceGroupRoll, ClashOutcome, DamageApplied, DamageOutcome,
    DefenseOutcome, EffectsOutcome, EvadeOutcome, HealOutcome, MoveReport, ResolutionStep,
    RoundEndOutcome, TargetDamage,
};
