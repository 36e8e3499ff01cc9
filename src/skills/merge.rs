//! Grant merging
//!
//! Folds background grants, then career grants, into one skill list. The
//! unfiltered list keeps every generic entry (and the origin of every
//! grant folded into each entry) for choice detection; the filtered list is
//! what gets displayed.

use crate::core::{clamp_level, SkillSource, MAX_SKILL_LEVEL};
use crate::skills::grant::{display_name, skill_key, GrantForm};
use crate::skills::source::{InstanceKey, SourcedGrant};
use ahash::AHashSet;
use serde::Serialize;

/// A source grant folded into a resolved skill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantOrigin {
    pub key: InstanceKey,
    pub form: GrantForm,
    pub level: u8,
}

/// One merged skill entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSkill {
    /// `"Base"` or `"Base (Specialization)"`
    pub name: String,
    /// Base skill as first written in the tables
    pub base: String,
    /// Title-cased specialization, `None` for generic entries
    pub specialization: Option<String>,
    pub level: u8,
    pub source: SkillSource,
    /// Every grant folded into this entry, in merge order
    #[serde(skip)]
    pub origins: Vec<GrantOrigin>,
}

impl ResolvedSkill {
    fn from_grant(sourced: &SourcedGrant) -> Self {
        let grant = &sourced.grant;
        let specialization = grant.specialization().map(str::to_string);
        Self {
            name: display_name(&grant.base, specialization.as_deref()),
            base: grant.base.clone(),
            specialization,
            level: grant.level.min(MAX_SKILL_LEVEL),
            source: provenance(sourced),
            origins: vec![origin_of(sourced)],
        }
    }

    pub fn base_key(&self) -> String {
        skill_key(&self.base)
    }

    pub fn is_generic(&self) -> bool {
        self.specialization.is_none()
    }

    /// True if this skill has the given base, compared case-insensitively
    pub fn has_base(&self, base: &str) -> bool {
        self.base_key() == skill_key(base)
    }

    /// True if this skill carries the given specialization, compared case-insensitively
    pub fn has_specialization(&self, specialization: &str) -> bool {
        self.specialization
            .as_deref()
            .is_some_and(|spec| skill_key(spec) == skill_key(specialization))
    }

    /// Generic entry seeded by a parenthetical placeholder ("(any)" and friends)
    fn is_placeholder(&self) -> bool {
        self.is_generic()
            && self
                .origins
                .first()
                .is_some_and(|origin| origin.form.is_placeholder())
    }

    fn absorb(&mut self, level: i32, sourced: &SourcedGrant) {
        self.level = clamp_level(level);
        self.source = self.source.join(provenance(sourced));
        self.origins.push(origin_of(sourced));
    }
}

fn provenance(sourced: &SourcedGrant) -> SkillSource {
    let own = SkillSource::from(sourced.grant.source);
    match sourced.inherited {
        Some(other) => own.join(other.into()),
        None => own,
    }
}

fn origin_of(sourced: &SourcedGrant) -> GrantOrigin {
    GrantOrigin {
        key: sourced.key.clone(),
        form: sourced.grant.form.clone(),
        level: sourced.grant.level.min(MAX_SKILL_LEVEL),
    }
}

/// Merge background then career grants, keeping generic entries
pub fn merge_unfiltered(background: &[SourcedGrant], career: &[SourcedGrant]) -> Vec<ResolvedSkill> {
    let mut working: Vec<ResolvedSkill> = Vec::new();
    for sourced in background.iter().chain(career) {
        fold_grant(&mut working, sourced);
    }
    working
}

/// Merge background then career grants for display
///
/// Generic entries with a specialized sibling at level 1+ are dropped and
/// the result is sorted by display name.
pub fn merge(background: &[SourcedGrant], career: &[SourcedGrant]) -> Vec<ResolvedSkill> {
    sort_by_name(suppress_generics(merge_unfiltered(background, career)))
}

fn fold_grant(working: &mut Vec<ResolvedSkill>, sourced: &SourcedGrant) {
    let grant = &sourced.grant;
    let level = grant.level.min(MAX_SKILL_LEVEL) as i32;

    if !working.iter().any(|s| s.has_base(&grant.base)) {
        working.push(ResolvedSkill::from_grant(sourced));
        return;
    }

    if let Some(spec) = grant.specialization() {
        // Same explicit specialization: the higher grant wins
        if let Some(existing) = working
            .iter_mut()
            .find(|s| s.has_base(&grant.base) && s.has_specialization(spec))
        {
            let merged = (existing.level as i32).max(level);
            existing.absorb(merged, sourced);
        } else {
            working.push(ResolvedSkill::from_grant(sourced));
        }
        return;
    }

    // Generic grant onto a plain generic entry: levels add
    if let Some(existing) = working
        .iter_mut()
        .find(|s| s.has_base(&grant.base) && s.is_generic() && !s.is_placeholder())
    {
        let merged = existing.level as i32 + level;
        existing.absorb(merged, sourced);
        return;
    }

    // Generic grant onto a placeholder entry: keep one entry, remember both origins
    if let Some(existing) = working
        .iter_mut()
        .find(|s| s.has_base(&grant.base) && s.is_generic())
    {
        let merged = (existing.level as i32).max(level);
        existing.absorb(merged, sourced);
        return;
    }

    working.push(ResolvedSkill::from_grant(sourced));
}

/// Drop generic entries whose base has a specialized sibling at level 1+
pub fn suppress_generics(skills: Vec<ResolvedSkill>) -> Vec<ResolvedSkill> {
    let specialized: AHashSet<String> = skills
        .iter()
        .filter(|s| !s.is_generic() && s.level >= 1)
        .map(ResolvedSkill::base_key)
        .collect();

    skills
        .into_iter()
        .filter(|s| !(s.is_generic() && specialized.contains(&s.base_key())))
        .collect()
}

pub fn sort_by_name(mut skills: Vec<ResolvedSkill>) -> Vec<ResolvedSkill> {
    skills.sort_by(|a, b| a.name.cmp(&b.name));
    skills
}
