//! Specialization catalog
//!
//! Static mapping from base skill to its valid specializations, plus the
//! option lists for named placeholder texts.

use crate::skills::grant::{skill_key, GrantForm};
use ahash::AHashMap;

/// Built-in specialization table
pub const STANDARD_SPECIALIZATIONS: &[(&str, &[&str])] = &[
    ("Animals", &["handling", "training", "veterinary"]),
    ("Art", &["holography", "instrument", "performer", "visual media", "write"]),
    ("Athletics", &["dexterity", "endurance", "strength"]),
    ("Drive", &["hovercraft", "mole", "track", "walker", "wheel"]),
    ("Electronics", &["comms", "computers", "remote ops", "sensors"]),
    ("Engineer", &["j-drive", "life support", "m-drive", "power"]),
    ("Flyer", &["airship", "grav", "ornithopter", "rotor", "wing"]),
    ("Gun Combat", &["archaic", "energy", "slug"]),
    ("Gunner", &["turret", "ortillery", "screen", "capital"]),
    ("Heavy Weapons", &["artillery", "man portable", "vehicle"]),
    ("Language", &["anglic", "vilani", "zdetl", "oynprith", "gvegh", "trokh"]),
    ("Melee", &["unarmed", "blade", "bludgeon", "natural"]),
    ("Pilot", &["small craft", "spacecraft", "capital ships"]),
    (
        "Profession",
        &[
            "belter",
            "biologicals",
            "civil engineering",
            "colonist",
            "construction",
            "hydroponics",
            "polymers",
            "scavenger",
        ],
    ),
    (
        "Science",
        &[
            "archaeology",
            "astronomy",
            "biology",
            "chemistry",
            "cosmology",
            "cybernetics",
            "economics",
            "genetics",
            "history",
            "linguistics",
            "philosophy",
            "physics",
            "planetology",
            "psionicology",
            "psychology",
            "robotics",
            "sophontology",
            "xenology",
        ],
    ),
    ("Seafarer", &["ocean ships", "personal", "sail", "submarine"]),
    ("Tactics", &["military", "naval"]),
];

/// Built-in option lists for the named placeholder texts
pub const STANDARD_SPECIAL_CASES: &[(&str, &[&str])] = &[
    ("any survival", &["belter", "colonist", "hydroponics", "scavenger"]),
    ("local dialect", &["anglic creole", "spacer cant", "trade pidgin"]),
];

/// Base skill -> valid specializations
#[derive(Debug, Clone, Default)]
pub struct SpecializationCatalog {
    /// Keyed by lowercased base skill; options keep table order
    skills: AHashMap<String, Vec<String>>,
    /// Keyed by lowercased placeholder text
    special_cases: AHashMap<String, Vec<String>>,
}

impl SpecializationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding the built-in tables
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        for (base, options) in STANDARD_SPECIALIZATIONS {
            catalog.insert(base, options.iter().map(|o| o.to_string()));
        }
        for (name, options) in STANDARD_SPECIAL_CASES {
            catalog.insert_special_case(name, options.iter().map(|o| o.to_string()));
        }
        catalog
    }

    /// Register (or replace) the specializations of a base skill
    pub fn insert(&mut self, base: &str, options: impl IntoIterator<Item = String>) {
        let options = options.into_iter().map(|o| skill_key(&o)).collect();
        self.skills.insert(skill_key(base), options);
    }

    /// Register (or replace) the option list of a placeholder text
    pub fn insert_special_case(&mut self, name: &str, options: impl IntoIterator<Item = String>) {
        let options = options.into_iter().map(|o| skill_key(&o)).collect();
        self.special_cases.insert(skill_key(name), options);
    }

    /// True if this base skill is specialized at all
    pub fn contains(&self, base: &str) -> bool {
        self.skills.contains_key(&skill_key(base))
    }

    /// Specializations of a base skill, empty if it has none
    pub fn specializations(&self, base: &str) -> &[String] {
        self.skills
            .get(&skill_key(base))
            .map(|options| options.as_slice())
            .unwrap_or(&[])
    }

    /// Candidate specializations for a grant of this base skill and form.
    ///
    /// Special cases win over the catalog; an or-list supplies its own options.
    pub fn options_for(&self, base: &str, form: &GrantForm) -> Vec<String> {
        match form {
            GrantForm::SpecialCase(name) => match self.special_cases.get(name) {
                Some(options) => options.clone(),
                None => self.specializations(base).to_vec(),
            },
            GrantForm::OrList(options) => options.clone(),
            _ => self.specializations(base).to_vec(),
        }
    }

    /// Number of specialized base skills
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_lookup_is_case_insensitive() {
        let catalog = SpecializationCatalog::standard();
        assert!(catalog.contains("electronics"));
        assert!(catalog.contains("ELECTRONICS"));
        assert_eq!(
            catalog.specializations("Electronics"),
            &["comms", "computers", "remote ops", "sensors"]
        );
    }

    #[test]
    fn test_unspecialized_skills_are_absent() {
        let catalog = SpecializationCatalog::standard();
        assert!(!catalog.contains("Mechanic"));
        assert!(!catalog.contains("Admin"));
        assert!(catalog.specializations("Mechanic").is_empty());
    }

    #[test]
    fn test_special_case_overrides_catalog() {
        let catalog = SpecializationCatalog::standard();
        let options =
            catalog.options_for("Profession", &GrantForm::SpecialCase("any survival".into()));
        assert_eq!(options, vec!["belter", "colonist", "hydroponics", "scavenger"]);
    }

    #[test]
    fn test_or_list_overrides_catalog() {
        let catalog = SpecializationCatalog::standard();
        let form = GrantForm::OrList(vec!["slug".into(), "energy".into()]);
        assert_eq!(catalog.options_for("Gun Combat", &form), vec!["slug", "energy"]);
    }

    #[test]
    fn test_placeholder_uses_catalog() {
        let catalog = SpecializationCatalog::standard();
        let options = catalog.options_for("Gunner", &GrantForm::Placeholder("any".into()));
        assert_eq!(options.len(), 4);
    }

    #[test]
    fn test_insert_replaces_entry() {
        let mut catalog = SpecializationCatalog::new();
        assert!(catalog.is_empty());
        catalog.insert("Tactics", vec!["Military".to_string()]);
        catalog.insert("tactics", vec!["naval".to_string(), "ground".to_string()]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.specializations("Tactics"), &["naval", "ground"]);
    }
}
