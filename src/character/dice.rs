//! Dice expressions and the random-integer source
//!
//! Only age and optional characteristic rolls use dice. The resolution
//! engine itself is deterministic.

use crate::core::{BuildError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// `NdS+M` dice expression, e.g. `2D6+1`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceSpec {
    pub count: u32,
    pub sides: u32,
    pub modifier: i32,
}

impl DiceSpec {
    pub const fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self {
            count,
            sides,
            modifier,
        }
    }

    /// Parse `"2D6"`, `"1d6-1"`, `"D3"` or a bare constant like `"4"`
    pub fn parse(text: &str) -> Result<Self> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let upper = compact.to_ascii_uppercase();
        let bad = || BuildError::Dice(text.to_string());

        let Some(d) = upper.find('D') else {
            let modifier = upper.parse::<i32>().map_err(|_| bad())?;
            return Ok(Self::new(0, 0, modifier));
        };

        let count = match &upper[..d] {
            "" => 1,
            digits => digits.parse::<u32>().map_err(|_| bad())?,
        };

        let rest = &upper[d + 1..];
        let split = rest.find(['+', '-']).unwrap_or(rest.len());
        let sides = rest[..split].parse::<u32>().map_err(|_| bad())?;
        let modifier = match &rest[split..] {
            "" => 0,
            m => m.parse::<i32>().map_err(|_| bad())?,
        };

        if count == 0 || sides == 0 {
            return Err(bad());
        }
        Ok(Self::new(count, sides, modifier))
    }

    pub fn min(&self) -> i32 {
        self.count as i32 + self.modifier
    }

    pub fn max(&self) -> i32 {
        (self.count * self.sides) as i32 + self.modifier
    }
}

impl fmt::Display for DiceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            return write!(f, "{}", self.modifier);
        }
        write!(f, "{}D{}", self.count, self.sides)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{}", m),
            m => write!(f, "{}", m),
        }
    }
}

impl FromStr for DiceSpec {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for DiceSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DiceSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        DiceSpec::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Outcome of one dice roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Roll {
    pub total: i32,
    /// Individual die faces, in roll order
    pub rolls: Vec<u32>,
}

/// Anything that can roll dice
pub trait DiceRoller {
    fn roll(&mut self, spec: &DiceSpec) -> Roll;
}

/// Dice roller over any `rand` RNG
#[derive(Debug, Clone)]
pub struct RngRoller<R: Rng> {
    rng: R,
}

impl<R: Rng> RngRoller<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngRoller<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> DiceRoller for RngRoller<R> {
    fn roll(&mut self, spec: &DiceSpec) -> Roll {
        let rolls: Vec<u32> = (0..spec.count)
            .map(|_| self.rng.gen_range(1..=spec.sides))
            .collect();
        let total = rolls.iter().sum::<u32>() as i32 + spec.modifier;
        Roll { total, rolls }
    }
}

/// Age rule of a career package: `base + roll(dice)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRule {
    pub base: u32,
    pub dice: DiceSpec,
}

impl AgeRule {
    pub fn determine(&self, roller: &mut impl DiceRoller) -> u32 {
        let roll = roller.roll(&self.dice);
        let age = (self.base as i32 + roll.total).max(0) as u32;
        tracing::debug!("Age {} = {} + {} {:?}", age, self.base, self.dice, roll.rolls);
        age
    }
}
