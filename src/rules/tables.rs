//! Rule tables and the package book

use crate::character::package::Package;
use crate::core::{BuildError, ResolverConfig, Result};
use crate::finalize::options::{standard_skill_pairs, SkillPair};
use crate::skills::catalog::SpecializationCatalog;
use crate::skills::grant::skill_key;
use serde::{Deserialize, Serialize};

/// Everything the resolver needs besides the packages
#[derive(Debug, Clone)]
pub struct Rules {
    pub catalog: SpecializationCatalog,
    pub skill_pairs: Vec<SkillPair>,
    pub config: ResolverConfig,
}

impl Default for Rules {
    fn default() -> Self {
        Self::standard()
    }
}

impl Rules {
    /// Built-in catalog, skill pairs and constants
    pub fn standard() -> Self {
        Self {
            catalog: SpecializationCatalog::standard(),
            skill_pairs: standard_skill_pairs(),
            config: ResolverConfig::default(),
        }
    }
}

/// Backgrounds and careers available to a build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageBook {
    #[serde(default, rename = "background")]
    pub backgrounds: Vec<Package>,
    #[serde(default, rename = "career")]
    pub careers: Vec<Package>,
}

impl PackageBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a background by name (case-insensitive)
    pub fn background(&self, name: &str) -> Result<&Package> {
        find(&self.backgrounds, name)
    }

    /// Look up a career by name (case-insensitive)
    pub fn career(&self, name: &str) -> Result<&Package> {
        find(&self.careers, name)
    }
}

fn find<'a>(packages: &'a [Package], name: &str) -> Result<&'a Package> {
    packages
        .iter()
        .find(|p| skill_key(&p.name) == skill_key(name))
        .ok_or_else(|| BuildError::UnknownPackage(name.to_string()))
}
