//! Final character export

use crate::character::characteristics::Characteristics;
use crate::core::Result;
use crate::finalize::options::{Benefit, CareerOption};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalSkill {
    pub name: String,
    pub level: u8,
}

/// A completed build
#[derive(Debug, Clone, Serialize)]
pub struct FinalCharacter {
    pub background: String,
    pub career: String,
    pub age: Option<u32>,
    pub characteristics: Characteristics,
    /// Duplicate-free, sorted by name, improvements applied
    pub skills: Vec<FinalSkill>,
    pub career_option: Option<CareerOption>,
    /// Display name -> level delta earned during finalization
    pub improvements: BTreeMap<String, u8>,
    pub benefit: Option<Benefit>,
    pub credits: u32,
    pub equipment: Vec<String>,
}

impl FinalCharacter {
    pub fn skill(&self, name: &str) -> Option<u8> {
        self.skills.iter().find(|s| s.name == name).map(|s| s.level)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
