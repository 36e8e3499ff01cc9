//! Improvement ledger
//!
//! Level deltas earned during finalization, keyed by display name. A ledger
//! is only ever rebuilt whole from the current improvement grants.

use crate::core::clamp_level;
use crate::skills::catalog::SpecializationCatalog;
use crate::skills::choice::requires_choice;
use crate::skills::merge::{sort_by_name, suppress_generics, ResolvedSkill};
use crate::skills::source::SourcedGrant;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
struct LedgerEntry {
    base: String,
    specialization: Option<String>,
    delta: u8,
}

/// Display name -> level delta
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImprovementLedger {
    entries: BTreeMap<String, LedgerEntry>,
}

impl ImprovementLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from improvement grants against the filtered merge
    ///
    /// Each grant carries its target level; the delta is what it takes to
    /// get there from the merged level. Grants still waiting on a choice,
    /// and grants already met, contribute nothing.
    pub fn rebuild(
        improvements: &[SourcedGrant],
        skills: &[ResolvedSkill],
        catalog: &SpecializationCatalog,
    ) -> Self {
        let mut ledger = Self::new();

        for sourced in improvements {
            let grant = &sourced.grant;
            if requires_choice(&grant.base, &grant.form, grant.level, catalog) {
                continue;
            }

            let name = grant.display_name();
            let current = skills
                .iter()
                .find(|s| s.name == name)
                .map(|s| s.level)
                .unwrap_or(0);
            let delta = grant.level.saturating_sub(current);

            if delta == 0 {
                tracing::debug!("{} is already at level {}: no effect", name, current);
                continue;
            }

            let entry = ledger.entries.entry(name).or_insert(LedgerEntry {
                base: grant.base.clone(),
                specialization: grant.specialization().map(str::to_string),
                delta: 0,
            });
            entry.delta = entry.delta.max(delta);
        }

        tracing::debug!("Rebuilt improvement ledger with {} entries", ledger.len());
        ledger
    }

    pub fn get(&self, name: &str) -> u8 {
        self.entries.get(name).map(|e| e.delta).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (display name, delta) in name order
    pub fn deltas(&self) -> impl Iterator<Item = (&str, u8)> {
        self.entries.iter().map(|(name, e)| (name.as_str(), e.delta))
    }

    pub fn to_map(&self) -> BTreeMap<String, u8> {
        self.deltas().map(|(name, delta)| (name.to_string(), delta)).collect()
    }

    /// Union the ledger with a filtered merge for display
    pub fn apply(&self, skills: &[ResolvedSkill]) -> Vec<ResolvedSkill> {
        let mut combined = skills.to_vec();

        for (name, entry) in &self.entries {
            match combined.iter_mut().find(|s| &s.name == name) {
                Some(skill) => {
                    skill.level = clamp_level(skill.level as i32 + entry.delta as i32);
                }
                None => combined.push(ResolvedSkill {
                    name: name.clone(),
                    base: entry.base.clone(),
                    specialization: entry.specialization.clone(),
                    level: clamp_level(entry.delta as i32),
                    source: crate::core::SkillSource::Career,
                    origins: Vec::new(),
                }),
            }
        }

        sort_by_name(suppress_generics(combined))
    }
}

impl Serialize for ImprovementLedger {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}
