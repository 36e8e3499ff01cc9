//! Finalization: career option, skill improvement and benefit selection
//!
//! Selections become improvement grants that flow through the same choice
//! queue as package grants, and a ledger of level deltas rebuilt from them.

pub mod ledger;
pub mod options;
pub mod stepper;

pub use ledger::ImprovementLedger;
pub use options::{
    plan_improvements, standard_skill_pairs, Benefit, CareerOption, ImprovementPick, SkillPair,
};
pub use stepper::{FinalizationStepper, Stage};
