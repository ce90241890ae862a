//! Launch stubs for starting a new practice run from the mistake list.
//!
//! The dialog only picks what to launch; actually starting a run belongs to
//! the navigation collaborator.

use std::fmt;

/// Question types a focused practice run can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeType {
    Algebra,
    Geometry,
    Reading,
    Writing,
    Vocabulary,
    Grammar,
}

impl PracticeType {
    pub const ALL: [PracticeType; 6] = [
        PracticeType::Algebra,
        PracticeType::Geometry,
        PracticeType::Reading,
        PracticeType::Writing,
        PracticeType::Vocabulary,
        PracticeType::Grammar,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PracticeType::Algebra => "algebra",
            PracticeType::Geometry => "geometry",
            PracticeType::Reading => "reading",
            PracticeType::Writing => "writing",
            PracticeType::Vocabulary => "vocabulary",
            PracticeType::Grammar => "grammar",
        }
    }

    /// Localization key for the type's display label.
    #[must_use]
    pub fn label_key(self) -> &'static str {
        match self {
            PracticeType::Algebra => "practice.practice_types.algebra",
            PracticeType::Geometry => "practice.practice_types.geometry",
            PracticeType::Reading => "practice.practice_types.reading",
            PracticeType::Writing => "practice.practice_types.writing",
            PracticeType::Vocabulary => "practice.practice_types.vocabulary",
            PracticeType::Grammar => "practice.practice_types.grammar",
        }
    }
}

impl fmt::Display for PracticeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the learner asked to practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeLaunch {
    All,
    ByType(PracticeType),
}

/// State of the "practice by type" selection dialog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PracticeTypeDialog {
    open: bool,
    selected: Option<PracticeType>,
}

impl PracticeTypeDialog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn selected(&self) -> Option<PracticeType> {
        self.selected
    }

    /// Opens the dialog with no type selected.
    pub fn open(&mut self) {
        self.open = true;
        self.selected = None;
    }

    /// Closes the dialog, clearing the selection.
    pub fn close(&mut self) {
        self.open = false;
        self.selected = None;
    }

    pub fn select(&mut self, practice_type: PracticeType) {
        if self.open {
            self.selected = Some(practice_type);
        }
    }

    /// Whether the start button is enabled.
    #[must_use]
    pub fn can_start(&self) -> bool {
        self.open && self.selected.is_some()
    }

    /// Yields the launch request when a type is selected, closing the
    /// dialog; otherwise nothing happens.
    pub fn start(&mut self) -> Option<PracticeLaunch> {
        let practice_type = self.selected?;
        self.close();
        Some(PracticeLaunch::ByType(practice_type))
    }
}
