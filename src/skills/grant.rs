//! Grant parsing
//!
//! A grant is the terse `"Name[ (spec)]-level"` string found in package
//! tables. Parsing classifies the parenthetical once, so later stages match
//! on a `GrantForm` instead of re-reading raw text.

use crate::core::{clamp_level, GrantParseError, Source, MAX_SKILL_LEVEL};

/// Placeholder texts that carry their own option lists in the catalog
pub const SPECIAL_CASES: &[&str] = &["any survival", "local dialect"];

/// What the parenthetical of a grant says about its specialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantForm {
    /// No parenthetical: `"Electronics-1"`
    Bare,
    /// A concrete specialization, title-cased: `"Electronics (computers)-1"`
    Explicit(String),
    /// An "any" placeholder, lowercased: `"Electronics (any)-1"`
    Placeholder(String),
    /// An inline option list, lowercased: `"Gun Combat (slug or energy)-1"`
    OrList(Vec<String>),
    /// A named special case from `SPECIAL_CASES`
    SpecialCase(String),
}

impl GrantForm {
    pub fn specialization(&self) -> Option<&str> {
        match self {
            GrantForm::Explicit(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self, GrantForm::Explicit(_))
    }

    /// True for parenthetical placeholders ("(any)", "(x or y)", special cases).
    ///
    /// Bare grants are generic but not placeholders.
    pub fn is_placeholder(&self) -> bool {
        matches!(
            self,
            GrantForm::Placeholder(_) | GrantForm::OrList(_) | GrantForm::SpecialCase(_)
        )
    }
}

/// A parsed skill grant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    /// Base skill name as written in the table
    pub base: String,
    pub form: GrantForm,
    pub level: u8,
    pub source: Source,
}

impl Grant {
    pub fn specialization(&self) -> Option<&str> {
        self.form.specialization()
    }

    /// Case-insensitive identity of the base skill
    pub fn base_key(&self) -> String {
        skill_key(&self.base)
    }

    /// `"Base"` or `"Base (Specialization)"`
    pub fn display_name(&self) -> String {
        display_name(&self.base, self.specialization())
    }
}

/// Parse a grant string of the form `"Name[ (spec)]-level"`
///
/// The level follows the last `-`, so hyphenated names such as
/// `"Jack-of-All-Trades-1"` parse as expected.
pub fn parse_grant(text: &str, source: Source) -> Result<Grant, GrantParseError> {
    let trimmed = text.trim();
    let (head, level_text) = trimmed
        .rsplit_once('-')
        .ok_or_else(|| GrantParseError::MissingLevel(trimmed.to_string()))?;

    let level_text = level_text.trim();
    if level_text.is_empty() || !level_text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GrantParseError::InvalidLevel {
            grant: trimmed.to_string(),
            level: level_text.to_string(),
        });
    }
    // Out-of-range levels clamp to the cap, however many digits they carry
    let level = level_text.parse::<i32>().map_or(MAX_SKILL_LEVEL, clamp_level);

    let head = head.trim();
    let (base, form) = match head.find('(') {
        None => {
            if head.contains(')') {
                return Err(GrantParseError::MalformedSpecialization(trimmed.to_string()));
            }
            (head, GrantForm::Bare)
        }
        Some(open) => {
            let inner = &head[open + 1..];
            if !inner.ends_with(')') || inner[..inner.len() - 1].contains(['(', ')']) {
                return Err(GrantParseError::MalformedSpecialization(trimmed.to_string()));
            }
            let inner = inner[..inner.len() - 1].trim();
            if inner.is_empty() {
                return Err(GrantParseError::MalformedSpecialization(trimmed.to_string()));
            }
            (head[..open].trim(), classify(inner))
        }
    };

    if base.is_empty() {
        return Err(GrantParseError::EmptyName(trimmed.to_string()));
    }

    Ok(Grant {
        base: base.to_string(),
        form,
        level,
        source,
    })
}

fn classify(inner: &str) -> GrantForm {
    let lower = inner.to_lowercase();

    if SPECIAL_CASES.contains(&lower.as_str()) {
        return GrantForm::SpecialCase(lower);
    }

    if lower.contains(" or ") {
        let options = lower
            .split(',')
            .flat_map(|part| part.split(" or "))
            .map(str::trim)
            .filter(|option| !option.is_empty())
            .map(str::to_string)
            .collect();
        return GrantForm::OrList(options);
    }

    // Word match, so "botany" or "company" stay explicit
    if lower.split_whitespace().any(|word| word == "any") {
        return GrantForm::Placeholder(lower);
    }

    GrantForm::Explicit(title_case(inner))
}

/// Write a grant string back in table form
pub fn format_grant(base: &str, specialization: Option<&str>, level: u8) -> String {
    match specialization {
        Some(spec) => format!("{} ({})-{}", base, spec, level),
        None => format!("{}-{}", base, level),
    }
}

/// Display name for a base skill and optional specialization
pub fn display_name(base: &str, specialization: Option<&str>) -> String {
    match specialization {
        Some(spec) => format!("{} ({})", title_case(base), title_case(spec)),
        None => title_case(base),
    }
}

/// Case-insensitive key for skill and specialization names
pub fn skill_key(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Capitalize the first letter of every word, lowercase the rest
///
/// Hyphens start a new word (`"Jack-Of-All-Trades"`); apostrophes and
/// digits do not.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = !(ch == '\'' || ch.is_alphanumeric());
        }
    }

    out
}
