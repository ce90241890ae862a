use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── NOTE VALIDATION ───────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    #[error("note text is required")]
    Empty,
}

//
// ─── NOTE TYPES ────────────────────────────────────────────────────────────────
//

/// Unvalidated note text as typed into the review dialog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NoteDraft(String);

impl NoteDraft {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validates the draft into a committable [`Note`].
    ///
    /// The author's exact text is preserved; trimming is only used to decide
    /// whether any text is present.
    ///
    /// # Errors
    ///
    /// Returns `NoteValidationError::Empty` if the text is empty after
    /// trimming.
    pub fn validate(self) -> Result<Note, NoteValidationError> {
        if self.0.trim().is_empty() {
            return Err(NoteValidationError::Empty);
        }
        Ok(Note(self.0))
    }
}

/// Validated free-text review note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Note(String);

impl Note {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
