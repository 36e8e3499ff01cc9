use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest level any skill may reach
pub const MAX_SKILL_LEVEL: u8 = 4;

/// Clamp a computed level into the legal [0, MAX_SKILL_LEVEL] range
pub fn clamp_level(level: i32) -> u8 {
    level.clamp(0, MAX_SKILL_LEVEL as i32) as u8
}

/// Which grant list a source string lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Background,
    Career,
    /// Synthetic grants produced by the finalization stepper
    Improvement,
}

impl Source {
    pub fn name(&self) -> &'static str {
        match self {
            Source::Background => "background",
            Source::Career => "career",
            Source::Improvement => "improvement",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Provenance of a resolved skill after merging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillSource {
    Background,
    Career,
    Combined,
}

impl SkillSource {
    /// Combine two provenances; differing ones collapse to `Combined`
    pub fn join(self, other: SkillSource) -> SkillSource {
        if self == other {
            self
        } else {
            SkillSource::Combined
        }
    }

    /// True if the career package contributed to this skill
    pub fn from_career(&self) -> bool {
        matches!(self, SkillSource::Career | SkillSource::Combined)
    }
}

impl From<Source> for SkillSource {
    fn from(source: Source) -> Self {
        match source {
            Source::Background => SkillSource::Background,
            Source::Career | Source::Improvement => SkillSource::Career,
        }
    }
}

/// The six character characteristics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Characteristic {
    #[serde(rename = "STR")]
    Strength,
    #[serde(rename = "DEX")]
    Dexterity,
    #[serde(rename = "END")]
    Endurance,
    #[serde(rename = "INT")]
    Intellect,
    #[serde(rename = "EDU")]
    Education,
    #[serde(rename = "SOC")]
    SocialStanding,
}

impl Characteristic {
    /// Get all characteristics in sheet order
    pub fn all() -> &'static [Characteristic] {
        &[
            Characteristic::Strength,
            Characteristic::Dexterity,
            Characteristic::Endurance,
            Characteristic::Intellect,
            Characteristic::Education,
            Characteristic::SocialStanding,
        ]
    }

    /// Three-letter sheet abbreviation
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Characteristic::Strength => "STR",
            Characteristic::Dexterity => "DEX",
            Characteristic::Endurance => "END",
            Characteristic::Intellect => "INT",
            Characteristic::Education => "EDU",
            Characteristic::SocialStanding => "SOC",
        }
    }

    /// Parse a sheet abbreviation (case-insensitive)
    pub fn from_abbreviation(text: &str) -> Option<Characteristic> {
        Characteristic::all()
            .iter()
            .copied()
            .find(|c| c.abbreviation().eq_ignore_ascii_case(text.trim()))
    }

    pub fn index(&self) -> usize {
        match self {
            Characteristic::Strength => 0,
            Characteristic::Dexterity => 1,
            Characteristic::Endurance => 2,
            Characteristic::Intellect => 3,
            Characteristic::Education => 4,
            Characteristic::SocialStanding => 5,
        }
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_level() {
        assert_eq!(clamp_level(-2), 0);
        assert_eq!(clamp_level(3), 3);
        assert_eq!(clamp_level(7), MAX_SKILL_LEVEL);
    }

    #[test]
    fn test_skill_source_join() {
        assert_eq!(SkillSource::Background.join(SkillSource::Background), SkillSource::Background);
        assert_eq!(SkillSource::Background.join(SkillSource::Career), SkillSource::Combined);
        assert!(SkillSource::Combined.from_career());
        assert!(!SkillSource::Background.from_career());
    }

    #[test]
    fn test_characteristic_abbreviations() {
        assert_eq!(Characteristic::all().len(), 6);
        assert_eq!(Characteristic::from_abbreviation("dex"), Some(Characteristic::Dexterity));
        assert_eq!(Characteristic::from_abbreviation("LCK"), None);
        for (i, c) in Characteristic::all().iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }
}
