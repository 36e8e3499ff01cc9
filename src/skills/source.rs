//! Authoritative source grant strings
//!
//! The background, career and improvement lists are the only mutable state
//! the resolution pipeline reads. Every string gets a slot number when it
//! enters a list; rewrites keep the slot so choices stay in FIFO order.

use crate::core::{GrantParseError, Source};
use crate::skills::grant::{parse_grant, Grant};
use std::fmt;

/// Identifies the source grant that triggered a choice
///
/// The text is part of the key: once the string at that slot is rewritten
/// or removed, the key is stale.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceKey {
    pub source: Source,
    pub slot: u32,
    pub text: String,
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}:{}", self.source, self.slot, self.text)
    }
}

/// One grant string in a source list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceGrant {
    pub slot: u32,
    pub text: String,
    /// The other package list, when this grant superseded one from there
    pub inherited: Option<Source>,
}

/// A parsed grant together with the key of the string it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcedGrant {
    pub key: InstanceKey,
    pub grant: Grant,
    pub inherited: Option<Source>,
}

/// The grant-string lists of one character build
#[derive(Debug, Clone, Default)]
pub struct SourceGrants {
    background: Vec<SourceGrant>,
    career: Vec<SourceGrant>,
    improvement: Vec<SourceGrant>,
    next_slot: u32,
}

impl SourceGrants {
    pub fn new<B, C>(background: B, career: C) -> Self
    where
        B: IntoIterator,
        B::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let mut grants = Self::default();
        for text in background {
            grants.push(Source::Background, text);
        }
        for text in career {
            grants.push(Source::Career, text);
        }
        grants
    }

    /// Append a grant string and return its key
    pub fn push(&mut self, source: Source, text: impl Into<String>) -> InstanceKey {
        let slot = self.next_slot;
        self.next_slot += 1;
        let text = text.into();
        self.list_mut(source).push(SourceGrant {
            slot,
            text: text.clone(),
            inherited: None,
        });
        InstanceKey { source, slot, text }
    }

    /// Replace a whole list; the new strings get fresh slots
    pub fn replace(&mut self, source: Source, texts: impl IntoIterator<Item = String>) {
        self.list_mut(source).clear();
        for text in texts {
            self.push(source, text);
        }
    }

    pub fn clear(&mut self, source: Source) {
        self.list_mut(source).clear();
    }

    pub fn list(&self, source: Source) -> &[SourceGrant] {
        match source {
            Source::Background => &self.background,
            Source::Career => &self.career,
            Source::Improvement => &self.improvement,
        }
    }

    fn list_mut(&mut self, source: Source) -> &mut Vec<SourceGrant> {
        match source {
            Source::Background => &mut self.background,
            Source::Career => &mut self.career,
            Source::Improvement => &mut self.improvement,
        }
    }

    /// Current grant strings of one list, in order
    pub fn texts(&self, source: Source) -> Vec<&str> {
        self.list(source).iter().map(|g| g.text.as_str()).collect()
    }

    /// The grant a key points at, if the key is still current
    pub fn lookup(&self, key: &InstanceKey) -> Option<&SourceGrant> {
        self.list(key.source)
            .iter()
            .find(|g| g.slot == key.slot && g.text == key.text)
    }

    /// Rewrite the string a current key points at. Returns false for stale keys.
    pub fn rewrite(&mut self, key: &InstanceKey, text: impl Into<String>) -> bool {
        match self
            .list_mut(key.source)
            .iter_mut()
            .find(|g| g.slot == key.slot && g.text == key.text)
        {
            Some(grant) => {
                grant.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Mark the grant at `slot` as also standing for a grant from `from`
    ///
    /// Marks from the grant's own list are ignored. Returns false if the
    /// slot is gone.
    pub fn inherit(&mut self, source: Source, slot: u32, from: Source) -> bool {
        match self.list_mut(source).iter_mut().find(|g| g.slot == slot) {
            Some(grant) => {
                if from != source {
                    grant.inherited = Some(from);
                }
                true
            }
            None => false,
        }
    }

    /// Remove the string at a slot
    pub fn remove_slot(&mut self, source: Source, slot: u32) -> Option<SourceGrant> {
        let list = self.list_mut(source);
        let index = list.iter().position(|g| g.slot == slot)?;
        Some(list.remove(index))
    }

    /// Parse one list into keyed grants
    pub fn parse(&self, source: Source) -> Result<Vec<SourcedGrant>, GrantParseError> {
        self.list(source)
            .iter()
            .map(|g| {
                Ok(SourcedGrant {
                    key: InstanceKey {
                        source,
                        slot: g.slot,
                        text: g.text.clone(),
                    },
                    grant: parse_grant(&g.text, source)?,
                    inherited: g.inherited,
                })
            })
            .collect()
    }
}
