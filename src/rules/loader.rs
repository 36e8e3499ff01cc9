//! Load rule tables and packages from TOML

use crate::core::{BuildError, ResolverConfig, Result, Source};
use crate::finalize::options::SkillPair;
use crate::rules::tables::{PackageBook, Rules};
use crate::skills::catalog::SpecializationCatalog;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const BUILTIN_PACKAGES: &str = include_str!("../../data/packages.toml");

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RulesFile {
    finalization: Option<ResolverConfig>,
    specializations: BTreeMap<String, Vec<String>>,
    special_cases: BTreeMap<String, Vec<String>>,
    skill_pairs: Vec<SkillPair>,
}

/// Parse a rules file
///
/// Missing tables fall back to the built-in ones.
pub fn parse_rules(content: &str) -> Result<Rules> {
    let file: RulesFile = toml::from_str(content)?;
    let mut rules = Rules::standard();

    if let Some(config) = file.finalization {
        config.validate().map_err(BuildError::Config)?;
        rules.config = config;
    }

    if !file.specializations.is_empty() {
        let mut catalog = SpecializationCatalog::new();
        for (base, options) in file.specializations {
            catalog.insert(&base, options);
        }
        // Special cases are looked up separately, so start them from the built-ins
        if file.special_cases.is_empty() {
            for (name, options) in crate::skills::catalog::STANDARD_SPECIAL_CASES {
                catalog.insert_special_case(name, options.iter().map(|o| o.to_string()));
            }
        }
        rules.catalog = catalog;
    }

    for (name, options) in file.special_cases {
        rules.catalog.insert_special_case(&name, options);
    }

    if !file.skill_pairs.is_empty() {
        rules.skill_pairs = file.skill_pairs;
    }

    tracing::info!(
        "Loaded rules: {} specialized skills, {} skill pairs",
        rules.catalog.len(),
        rules.skill_pairs.len()
    );
    Ok(rules)
}

pub fn load_rules(path: &Path) -> Result<Rules> {
    let content = fs::read_to_string(path)?;
    parse_rules(&content)
}

/// Parse a package file, validating every grant string
pub fn parse_packages(content: &str) -> Result<PackageBook> {
    let book: PackageBook = toml::from_str(content)?;

    if book.backgrounds.is_empty() {
        return Err(BuildError::Config("package book has no backgrounds".into()));
    }
    if book.careers.is_empty() {
        return Err(BuildError::Config("package book has no careers".into()));
    }

    for package in &book.backgrounds {
        package.validate(Source::Background)?;
    }
    for package in &book.careers {
        package.validate(Source::Career)?;
    }

    tracing::info!(
        "Loaded {} backgrounds and {} careers",
        book.backgrounds.len(),
        book.careers.len()
    );
    Ok(book)
}

pub fn load_packages(path: &Path) -> Result<PackageBook> {
    let content = fs::read_to_string(path)?;
    parse_packages(&content)
}

/// The package book shipped with the crate
pub fn builtin_packages() -> Result<PackageBook> {
    parse_packages(BUILTIN_PACKAGES)
}
