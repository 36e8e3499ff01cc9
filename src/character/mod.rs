//! Character data outside skill resolution: packages, characteristics,
//! dice and the exported result

pub mod characteristics;
pub mod dice;
pub mod export;
pub mod package;

pub use characteristics::Characteristics;
pub use dice::{AgeRule, DiceRoller, DiceSpec, RngRoller, Roll};
pub use export::{FinalCharacter, FinalSkill};
pub use package::Package;
