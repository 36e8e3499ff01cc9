//! Choice detection
//!
//! A generic grant of a specialized skill must be turned into one concrete
//! specialization by the player. Detection runs on the *unfiltered* merge,
//! so generic entries are still visible, and rates every candidate against
//! the specializations the character already holds.

use crate::skills::catalog::SpecializationCatalog;
use crate::skills::grant::{title_case, GrantForm};
use crate::skills::merge::ResolvedSkill;
use crate::skills::source::{InstanceKey, SourcedGrant};
use serde::Serialize;

/// How a candidate specialization relates to current holdings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateStatus {
    /// Not held yet
    New,
    /// Held below the granted level
    LevelUp,
    /// Held at or above the granted level
    Blocked,
}

/// One selectable (or blocked) specialization of a choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecializationCandidate {
    /// Title-cased specialization
    pub specialization: String,
    pub status: CandidateStatus,
    pub existing_level: u8,
    pub reason: String,
}

impl SpecializationCandidate {
    pub fn is_selectable(&self) -> bool {
        self.status != CandidateStatus::Blocked
    }
}

/// A pending specialization decision for one ambiguous grant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// Display name of the base skill
    pub skill_name: String,
    /// Base skill as written in the triggering grant
    pub base: String,
    /// Highest level among specializations of this skill already held
    pub current_level: u8,
    pub granted_level: u8,
    pub candidates: Vec<SpecializationCandidate>,
    pub instance_key: InstanceKey,
    pub resolved: bool,
}

impl Choice {
    /// Candidate by specialization, compared case-insensitively
    pub fn candidate(&self, specialization: &str) -> Option<&SpecializationCandidate> {
        self.candidates
            .iter()
            .find(|c| c.specialization.eq_ignore_ascii_case(specialization.trim()))
    }

    pub fn selectable(&self) -> impl Iterator<Item = &SpecializationCandidate> {
        self.candidates.iter().filter(|c| c.is_selectable())
    }

    pub fn is_fully_blocked(&self) -> bool {
        self.candidates.iter().all(|c| !c.is_selectable())
    }

    /// Mark a specialization blocked on this choice
    pub fn block(&mut self, specialization: &str, reason: &str) {
        for candidate in &mut self.candidates {
            if candidate.specialization.eq_ignore_ascii_case(specialization) {
                candidate.status = CandidateStatus::Blocked;
                candidate.reason = reason.to_string();
            }
        }
    }
}

/// True if a grant of this shape must be resolved by a choice
pub fn requires_choice(
    base: &str,
    form: &GrantForm,
    level: u8,
    catalog: &SpecializationCatalog,
) -> bool {
    level >= 1 && !form.is_explicit() && catalog.contains(base)
}

/// Detect choices for every ambiguous grant folded into the unfiltered merge
///
/// Choices come back in slot order. A grant whose candidates are all
/// blocked yields no choice.
pub fn detect_choices(unfiltered: &[ResolvedSkill], catalog: &SpecializationCatalog) -> Vec<Choice> {
    let mut choices: Vec<Choice> = unfiltered
        .iter()
        .flat_map(|skill| {
            skill.origins.iter().filter_map(move |origin| {
                build_choice(
                    &skill.base,
                    &origin.form,
                    origin.level,
                    &origin.key,
                    unfiltered,
                    catalog,
                )
            })
        })
        .collect();

    choices.sort_by_key(|choice| choice.instance_key.slot);
    choices
}

/// Detect choices for grants that are not part of the merge (improvement deltas)
pub fn detect_grant_choices(
    grants: &[SourcedGrant],
    unfiltered: &[ResolvedSkill],
    catalog: &SpecializationCatalog,
) -> Vec<Choice> {
    grants
        .iter()
        .filter_map(|sourced| {
            build_choice(
                &sourced.grant.base,
                &sourced.grant.form,
                sourced.grant.level,
                &sourced.key,
                unfiltered,
                catalog,
            )
        })
        .collect()
}

fn build_choice(
    base: &str,
    form: &GrantForm,
    level: u8,
    key: &InstanceKey,
    unfiltered: &[ResolvedSkill],
    catalog: &SpecializationCatalog,
) -> Option<Choice> {
    if !requires_choice(base, form, level, catalog) {
        return None;
    }

    let candidates: Vec<SpecializationCandidate> = catalog
        .options_for(base, form)
        .iter()
        .map(|option| rate_candidate(base, option, level, unfiltered))
        .collect();

    if candidates.iter().all(|c| !c.is_selectable()) {
        tracing::debug!("{} needs no choice: every specialization is already held", key);
        return None;
    }

    let current_level = unfiltered
        .iter()
        .filter(|s| s.has_base(base) && !s.is_generic())
        .map(|s| s.level)
        .max()
        .unwrap_or(0);

    Some(Choice {
        skill_name: title_case(base),
        base: base.to_string(),
        current_level,
        granted_level: level,
        candidates,
        instance_key: key.clone(),
        resolved: false,
    })
}

fn rate_candidate(
    base: &str,
    option: &str,
    granted_level: u8,
    unfiltered: &[ResolvedSkill],
) -> SpecializationCandidate {
    let existing = unfiltered
        .iter()
        .filter(|s| s.has_base(base) && s.has_specialization(option))
        .map(|s| s.level)
        .max();

    let (status, existing_level, reason) = match existing {
        None => (CandidateStatus::New, 0, "not yet known".to_string()),
        Some(level) if level >= granted_level => (
            CandidateStatus::Blocked,
            level,
            format!("already known at level {}", level),
        ),
        Some(level) => (
            CandidateStatus::LevelUp,
            level,
            format!("raises level {} to {}", level, granted_level),
        ),
    };

    SpecializationCandidate {
        specialization: title_case(option),
        status,
        existing_level,
        reason,
    }
}
