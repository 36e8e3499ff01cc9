//! Background and career packages

use crate::character::dice::AgeRule;
use crate::core::{BuildError, Characteristic, Result, Source};
use crate::skills::grant::parse_grant;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A background or career: skill grants plus the metadata that flows to export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Grant strings, e.g. `"Electronics (any)-1"`
    #[serde(default)]
    pub skills: Vec<String>,
    /// Keyed by characteristic abbreviation
    #[serde(default)]
    pub characteristic_modifiers: BTreeMap<String, i32>,
    #[serde(default)]
    pub credits: u32,
    #[serde(default)]
    pub equipment: Vec<String>,
    /// Only careers carry one
    #[serde(default)]
    pub age: Option<AgeRule>,
}

impl Package {
    pub fn new(name: &str, skills: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            characteristic_modifiers: BTreeMap::new(),
            credits: 0,
            equipment: Vec::new(),
            age: None,
        }
    }

    /// Check every grant string and modifier key
    ///
    /// A malformed grant is a defect in the package table, so the error names
    /// the package.
    pub fn validate(&self, source: Source) -> Result<()> {
        for text in &self.skills {
            parse_grant(text, source).map_err(|error| BuildError::InvalidPackage {
                package: self.name.clone(),
                error,
            })?;
        }
        for key in self.characteristic_modifiers.keys() {
            if Characteristic::from_abbreviation(key).is_none() {
                return Err(BuildError::Config(format!(
                    "package '{}' modifies unknown characteristic '{}'",
                    self.name, key
                )));
            }
        }
        Ok(())
    }
}
