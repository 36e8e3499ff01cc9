//! Career Forge - rule-driven skill resolution for character builds
//!
//! Background and career packages grant skills as strings such as
//! `"Electronics (any)-1"`. The engine merges them into one duplicate-free
//! skill list, queues every ambiguous grant as a choice, and walks the
//! end-of-career finalization steps.

pub mod character;
pub mod core;
pub mod finalize;
pub mod rules;
pub mod session;
pub mod skills;

pub use session::BuildSession;
