//! Skill-grant resolution
//!
//! Package tables grant skills as terse strings. They are parsed, merged
//! into one skill list, and every generic grant of a specialized skill
//! becomes a choice the player resolves one at a time.

pub mod catalog;
pub mod choice;
pub mod grant;
pub mod merge;
pub mod sequencer;
pub mod source;

pub use catalog::SpecializationCatalog;
pub use choice::{
    detect_choices, detect_grant_choices, CandidateStatus, Choice, SpecializationCandidate,
};
pub use grant::{parse_grant, title_case, Grant, GrantForm};
pub use merge::{merge, merge_unfiltered, GrantOrigin, ResolvedSkill};
pub use sequencer::{ChoiceQueue, Resolution};
pub use source::{InstanceKey, SourceGrant, SourceGrants, SourcedGrant};
