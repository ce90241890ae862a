//! Pure list derivation over the mistake log: section filtering, pagination,
//! and the immutable query object that ties the two together.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::{QuestionRecord, Section};

/// Page size used when a query is created or its category changes.
pub const DEFAULT_PAGE_SIZE: usize = 10;

//
// ─── CATEGORY ──────────────────────────────────────────────────────────────────
//

/// Browse category selected in the section tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    All,
    Language,
    Math,
}

impl Category {
    /// The section this category narrows to; `None` means no narrowing.
    #[must_use]
    pub fn section(self) -> Option<Section> {
        match self {
            Category::All => None,
            Category::Language => Some(Section::Language),
            Category::Math => Some(Section::Math),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Language => "language",
            Category::Math => "math",
        }
    }

    /// Parses a raw category value; unknown values fall back to `All`.
    #[must_use]
    pub fn from_tag(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "language" => Category::Language,
            "math" => Category::Math,
            _ => Category::All,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── FILTER + PAGINATE ─────────────────────────────────────────────────────────
//

/// Returns the subsequence of records matching the category, in input order.
///
/// `Category::All` returns the records unchanged. Section comparison goes
/// through tag normalization, so stored tags with incidental whitespace or
/// case noise still match; substrings never do.
#[must_use]
pub fn filter_by_category(records: &[QuestionRecord], category: Category) -> Vec<QuestionRecord> {
    match category.section() {
        None => records.to_vec(),
        Some(section) => records
            .iter()
            .filter(|record| record.section_tag().matches(section))
            .cloned()
            .collect(),
    }
}

/// Returns the 1-indexed `page` of `items`, at most `page_size` long.
///
/// Out-of-range pages (page 0 included) yield an empty slice rather than an
/// error; keeping `page` in range is the calling layer's job.
#[must_use]
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

//
// ─── LIST QUERY ────────────────────────────────────────────────────────────────
//

/// Immutable category/page/page-size view state.
///
/// Constructors uphold the stale-page rule: whenever the filtered sequence or
/// the page size changes, the page goes back to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    category: Category,
    page: usize,
    page_size: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            category: Category::All,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Switches category; resets the page to 1 and the page size back to the
    /// default, mirroring a fresh tab view.
    #[must_use]
    pub fn with_category(self, category: Category) -> Self {
        Self {
            category,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Changes the page size; resets the page to 1.
    #[must_use]
    pub fn with_page_size(self, page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            ..self
        }
    }

    /// Moves to another page of the current derivation.
    #[must_use]
    pub fn with_page(self, page: usize) -> Self {
        Self {
            page: page.max(1),
            ..self
        }
    }

    /// Derives the page view for this query over the full record sequence.
    #[must_use]
    pub fn run(&self, records: &[QuestionRecord]) -> PageView {
        let matching = filter_by_category(records, self.category);
        let total = matching.len();
        let items = paginate(&matching, self.page, self.page_size).to_vec();
        PageView {
            items,
            total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// One derived page of the filtered mistake log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub items: Vec<QuestionRecord>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

impl PageView {
    /// Number of pages the filtered sequence spans.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.page_size.max(1))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
