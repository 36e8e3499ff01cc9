//! Choice resolution sequencing
//!
//! Pending choices form one FIFO queue; only the head is "current". A
//! resolution rewrites the triggering source grant in place, so the next
//! parse/merge/detect pass sees an explicit specialization there.

use crate::core::{ChoiceStateError, Source};
use crate::skills::choice::{CandidateStatus, Choice};
use crate::skills::grant::{format_grant, parse_grant, skill_key};
use crate::skills::source::{InstanceKey, SourceGrant, SourceGrants};
use std::collections::VecDeque;

/// Outcome of resolving a choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved {
        choice: Choice,
        specialization: String,
        /// Lower-level grant strings deleted because the choice levelled them up
        removed: Vec<String>,
    },
    /// The choice pointed at a grant that no longer exists
    Discarded(InstanceKey),
}

/// A specialization already handed out by a resolved choice
#[derive(Debug, Clone, PartialEq, Eq)]
struct Claim {
    source: Source,
    base_key: String,
    specialization: String,
}

/// FIFO queue of pending choices plus the history of resolved ones
#[derive(Debug, Clone, Default)]
pub struct ChoiceQueue {
    pending: VecDeque<Choice>,
    resolved: Vec<Choice>,
    claims: Vec<Claim>,
}

impl ChoiceQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// The choice to present now
    pub fn current(&self) -> Option<&Choice> {
        self.pending.front()
    }

    pub fn pending(&self) -> impl Iterator<Item = &Choice> {
        self.pending.iter()
    }

    pub fn resolved(&self) -> &[Choice] {
        &self.resolved
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn has_pending_from(&self, source: Source) -> bool {
        self.pending.iter().any(|c| c.instance_key.source == source)
    }

    /// Replace the pending set with a fresh detection pass
    ///
    /// Choices already pending keep their queue position; new ones join at
    /// the back. Choices resolved earlier in this session are never asked
    /// again, and specializations handed out earlier stay blocked.
    pub fn refresh(&mut self, detected: Vec<Choice>) {
        let mut fresh: Vec<Choice> = detected
            .into_iter()
            .filter(|c| !self.resolved.iter().any(|r| r.instance_key == c.instance_key))
            .map(|mut c| {
                self.apply_claims(&mut c);
                c
            })
            .filter(|c| {
                if c.is_fully_blocked() {
                    tracing::debug!("{} resolved as a no-op: every option is taken", c.instance_key);
                    false
                } else {
                    true
                }
            })
            .collect();

        let mut next = VecDeque::with_capacity(fresh.len());
        for old in &self.pending {
            if let Some(pos) = fresh.iter().position(|c| c.instance_key == old.instance_key) {
                next.push_back(fresh.remove(pos));
            }
        }
        next.extend(fresh);

        tracing::debug!("{} choice(s) pending", next.len());
        self.pending = next;
    }

    /// Resolve the current choice
    pub fn resolve_current(
        &mut self,
        sources: &mut SourceGrants,
        specialization: &str,
    ) -> Result<Resolution, ChoiceStateError> {
        let key = self
            .current()
            .ok_or(ChoiceStateError::NoPendingChoice)?
            .instance_key
            .clone();
        self.resolve(sources, &key, specialization)
    }

    /// Resolve the choice identified by `key`, which must be the current one
    pub fn resolve(
        &mut self,
        sources: &mut SourceGrants,
        key: &InstanceKey,
        specialization: &str,
    ) -> Result<Resolution, ChoiceStateError> {
        if self.resolved.iter().any(|c| &c.instance_key == key) {
            return Err(ChoiceStateError::AlreadyResolved(key.to_string()));
        }

        let is_head = self
            .pending
            .front()
            .is_some_and(|head| &head.instance_key == key);
        if !is_head {
            if self.pending.iter().any(|c| &c.instance_key == key) {
                return Err(ChoiceStateError::OutOfOrder(key.to_string()));
            }
            tracing::debug!("Discarding stale choice {}", key);
            return Ok(Resolution::Discarded(key.clone()));
        }

        if sources.lookup(key).is_none() {
            tracing::debug!("Discarding choice {}: its grant is gone", key);
            self.pending.pop_front();
            return Ok(Resolution::Discarded(key.clone()));
        }

        let mut choice = self
            .pending
            .pop_front()
            .ok_or(ChoiceStateError::NoPendingChoice)?;

        let candidate = match choice.candidate(specialization) {
            Some(candidate) if candidate.is_selectable() => candidate.clone(),
            Some(candidate) => {
                let err = ChoiceStateError::CandidateBlocked {
                    skill: choice.skill_name.clone(),
                    specialization: candidate.specialization.clone(),
                    reason: candidate.reason.clone(),
                };
                self.pending.push_front(choice);
                return Err(err);
            }
            None => {
                let err = ChoiceStateError::UnknownCandidate {
                    skill: choice.skill_name.clone(),
                    specialization: specialization.to_string(),
                };
                self.pending.push_front(choice);
                return Err(err);
            }
        };
        let chosen = candidate.specialization;

        // Rewrite the triggering grant with the chosen specialization
        let rewritten = format_grant(&choice.base, Some(&chosen), choice.granted_level);
        sources.rewrite(key, rewritten.as_str());

        // A level-up supersedes the lower explicit grant. Improvement grants
        // leave package grants alone: the ledger works from the difference.
        let superseded = if candidate.status == CandidateStatus::LevelUp && key.source != Source::Improvement {
            remove_superseded(sources, &choice.base, &chosen, choice.granted_level, key.slot)
        } else {
            Vec::new()
        };

        // The rewritten grant keeps the provenance of what it replaced
        for (source, grant) in &superseded {
            for from in std::iter::once(*source).chain(grant.inherited) {
                sources.inherit(key.source, key.slot, from);
            }
        }
        let removed: Vec<String> = superseded.into_iter().map(|(_, grant)| grant.text).collect();

        choice.resolved = true;

        let reason = format!("already chosen for another {} grant", choice.skill_name);
        for other in self.pending.iter_mut() {
            if skill_key(&other.base) == skill_key(&choice.base) {
                other.block(&chosen, &reason);
            }
        }
        self.pending.retain(|c| !c.is_fully_blocked());

        self.claims.push(Claim {
            source: key.source,
            base_key: skill_key(&choice.base),
            specialization: chosen.clone(),
        });

        tracing::info!(
            "Resolved {} as '{}'{}",
            key,
            rewritten,
            if removed.is_empty() {
                String::new()
            } else {
                format!(" (replacing {})", removed.join(", "))
            }
        );

        self.resolved.push(choice.clone());
        Ok(Resolution::Resolved {
            choice,
            specialization: chosen,
            removed,
        })
    }

    /// Drop every pending choice, resolved record and claim that came from `source`
    pub fn forget(&mut self, source: Source) {
        self.pending.retain(|c| c.instance_key.source != source);
        self.resolved.retain(|c| c.instance_key.source != source);
        self.claims.retain(|c| c.source != source);
    }

    fn apply_claims(&self, choice: &mut Choice) {
        let base_key = skill_key(&choice.base);
        for claim in self.claims.iter().filter(|c| c.base_key == base_key) {
            choice.block(&claim.specialization, "already chosen for another grant");
        }
    }
}

/// Remove explicit package grants of `base (specialization)` below `level`
fn remove_superseded(
    sources: &mut SourceGrants,
    base: &str,
    specialization: &str,
    level: u8,
    keep_slot: u32,
) -> Vec<(Source, SourceGrant)> {
    let mut removed = Vec::new();

    for source in [Source::Background, Source::Career] {
        let superseded: Vec<u32> = sources
            .list(source)
            .iter()
            .filter(|g| g.slot != keep_slot)
            .filter(|g| match parse_grant(&g.text, source) {
                Ok(grant) => {
                    grant.base_key() == skill_key(base)
                        && grant
                            .specialization()
                            .is_some_and(|spec| skill_key(spec) == skill_key(specialization))
                        && grant.level < level
                }
                Err(_) => false,
            })
            .map(|g| g.slot)
            .collect();

        for slot in superseded {
            if let Some(grant) = sources.remove_slot(source, slot) {
                removed.push((source, grant));
            }
        }
    }

    removed
}
