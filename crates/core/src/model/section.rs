use serde::{Deserialize, Serialize};
use std::fmt;

//
// ─── SECTION ───────────────────────────────────────────────────────────────────
//

/// Subject section of a practice question.
///
/// The closed set of categories a question may carry; stored tags outside
/// this set fail record validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Language-arts questions (reading, writing, vocabulary, grammar).
    Language,
    /// Math questions (algebra, geometry).
    Math,
}

impl Section {
    pub const ALL: [Section; 2] = [Section::Language, Section::Math];

    /// Canonical stored tag for this section.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Section::Language => "LANGUAGE",
            Section::Math => "MATH",
        }
    }

    /// Resolves a raw stored tag into a section.
    ///
    /// Trims whitespace and normalizes case so incidental noise in stored
    /// tags still resolves; anything short of a whole-tag match yields
    /// `None` (substrings never match).
    #[must_use]
    pub fn from_tag(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_uppercase();
        Section::ALL
            .iter()
            .copied()
            .find(|section| section.tag() == normalized)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

//
// ─── SECTION TAG ───────────────────────────────────────────────────────────────
//

/// Raw section tag exactly as stored on a question.
///
/// Kept verbatim so whitespace/case noise in stored data survives
/// round-trips; comparisons go through [`Section::from_tag`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionTag(String);

impl SectionTag {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The section this tag resolves to, if any.
    #[must_use]
    pub fn section(&self) -> Option<Section> {
        Section::from_tag(&self.0)
    }

    /// Whether this tag resolves to the given section.
    #[must_use]
    pub fn matches(&self, section: Section) -> bool {
        self.section() == Some(section)
    }
}

impl From<Section> for SectionTag {
    fn from(section: Section) -> Self {
        Self(section.tag().to_string())
    }
}

impl fmt::Display for SectionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
