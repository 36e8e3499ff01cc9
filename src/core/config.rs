//! Finalization configuration with documented constants
//!
//! The numbers here drive the career-option and benefit rules. The
//! resolution engine itself has a single hard constant, the skill level cap
//! in `core::types::MAX_SKILL_LEVEL`.

use crate::core::types::MAX_SKILL_LEVEL;
use serde::{Deserialize, Serialize};

/// Configuration for the finalization stepper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Target level for career option 1 ("raise one career skill")
    pub raise_to_max_target: u8,

    /// How many distinct career skills option 2 raises
    pub raise_three_count: usize,

    /// Option 2 raises by +1 but never past this level.
    ///
    /// Skills already at or above it are ineligible.
    pub raise_three_cap: u8,

    /// Level granted to each skill of an option-3 skill pair
    pub skill_pair_level: u8,

    /// Bonus set (not added) on the characteristic picked as a benefit
    pub benefit_bonus: i32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            raise_to_max_target: 4,
            raise_three_count: 3,
            raise_three_cap: 2,
            skill_pair_level: 1,
            benefit_bonus: 1,
        }
    }
}

impl ResolverConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.raise_to_max_target == 0 || self.raise_to_max_target > MAX_SKILL_LEVEL {
            return Err(format!(
                "raise_to_max_target ({}) must be within 1..={}",
                self.raise_to_max_target, MAX_SKILL_LEVEL
            ));
        }

        if self.raise_three_count == 0 {
            return Err("raise_three_count must be at least 1".into());
        }

        if self.raise_three_cap == 0 || self.raise_three_cap > MAX_SKILL_LEVEL {
            return Err(format!(
                "raise_three_cap ({}) must be within 1..={}",
                self.raise_three_cap, MAX_SKILL_LEVEL
            ));
        }

        // A level-0 pair grant would never trigger a choice or change anything
        if self.skill_pair_level == 0 || self.skill_pair_level > MAX_SKILL_LEVEL {
            return Err(format!(
                "skill_pair_level ({}) must be within 1..={}",
                self.skill_pair_level, MAX_SKILL_LEVEL
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ResolverConfig::new().validate().is_ok());
    }

    #[test]
    fn test_rejects_target_above_cap() {
        let config = ResolverConfig {
            raise_to_max_target: 5,
            ..ResolverConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_pair_level() {
        let config = ResolverConfig {
            skill_pair_level: 0,
            ..ResolverConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
