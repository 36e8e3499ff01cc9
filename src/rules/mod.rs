//! Rule tables and packages, built in or loaded from TOML

mod loader;
pub mod tables;

pub use loader::{builtin_packages, load_packages, load_rules, parse_packages, parse_rules};
pub use tables::{PackageBook, Rules};
