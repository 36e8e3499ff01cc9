//! The six characteristic scores

use crate::character::dice::{DiceRoller, DiceSpec};
use crate::core::{BuildError, Characteristic, Result};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Score of an average human
pub const AVERAGE_SCORE: i32 = 7;

/// Characteristic scores in sheet order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Characteristics {
    scores: [i32; 6],
}

impl Default for Characteristics {
    fn default() -> Self {
        Self {
            scores: [AVERAGE_SCORE; 6],
        }
    }
}

impl Characteristics {
    pub fn new(scores: [i32; 6]) -> Self {
        Self { scores }
    }

    /// Roll 2D6 for every characteristic
    pub fn roll(roller: &mut impl DiceRoller) -> Self {
        let spec = DiceSpec::new(2, 6, 0);
        let mut scores = [0; 6];
        for score in scores.iter_mut() {
            *score = roller.roll(&spec).total;
        }
        Self { scores }
    }

    pub fn get(&self, characteristic: Characteristic) -> i32 {
        self.scores[characteristic.index()]
    }

    pub fn set(&mut self, characteristic: Characteristic, value: i32) {
        self.scores[characteristic.index()] = value;
    }

    /// Add package modifiers keyed by abbreviation (`"STR"`, `"edu"`, ...)
    pub fn apply_modifiers(&mut self, modifiers: &BTreeMap<String, i32>) -> Result<()> {
        for (key, delta) in modifiers {
            let characteristic = Characteristic::from_abbreviation(key)
                .ok_or_else(|| BuildError::Config(format!("unknown characteristic '{}'", key)))?;
            self.scores[characteristic.index()] += delta;
        }
        Ok(())
    }

    /// Copy with a bonus added to one characteristic
    pub fn with_bonus(mut self, bonus: Option<(Characteristic, i32)>) -> Self {
        if let Some((characteristic, amount)) = bonus {
            self.scores[characteristic.index()] += amount;
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (Characteristic, i32)> + '_ {
        Characteristic::all().iter().map(|c| (*c, self.get(*c)))
    }
}

impl Serialize for Characteristics {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.scores.len()))?;
        for (characteristic, value) in self.iter() {
            map.serialize_entry(characteristic.abbreviation(), &value)?;
        }
        map.end()
    }
}
