pub mod config;
pub mod error;
pub mod types;

pub use config::ResolverConfig;
pub use error::{BuildError, ChoiceStateError, GrantParseError, Result, StepError};
pub use types::{clamp_level, Characteristic, SkillSource, Source, MAX_SKILL_LEVEL};
