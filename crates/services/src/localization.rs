//! Display-string lookup consumed by the rendering layer.
//!
//! The review logic never branches on a resolved string; keys exist purely
//! so the UI can show localized text.

use std::collections::HashMap;

use review_core::model::Section;

/// Resolves a localization key into a display string.
pub trait LocalizationService {
    fn resolve(&self, key: &str) -> String;
}

/// Localization key for a section's display name.
#[must_use]
pub fn section_name_key(section: Section) -> &'static str {
    match section {
        Section::Language => "score_details.reading_writing",
        Section::Math => "score_details.math",
    }
}

/// Static in-memory catalog backing the demo binary and tests.
///
/// Missing keys resolve to the key itself so the UI always has something to
/// show.
pub struct StaticCatalog {
    entries: HashMap<&'static str, &'static str>,
}

impl StaticCatalog {
    #[must_use]
    pub fn english() -> Self {
        let entries = HashMap::from([
            ("practice.error_analysis", "Error analysis"),
            ("practice.back_to_practice", "Back to practice"),
            ("practice.review_question", "Review question"),
            ("practice.notes", "Notes"),
            ("practice.no_notes_yet", "No notes yet"),
            ("practice.enter_notes", "Enter your notes"),
            ("practice.reviewed", "Reviewed"),
            ("practice.practice_by_type", "Practice by type"),
            ("practice.practice_all", "Practice all"),
            ("practice.select_practice_type", "Select a practice type"),
            ("practice.start_practice", "Start practice"),
            ("practice.practice_types.algebra", "Algebra"),
            ("practice.practice_types.geometry", "Geometry"),
            ("practice.practice_types.reading", "Reading comprehension"),
            ("practice.practice_types.writing", "Writing"),
            ("practice.practice_types.vocabulary", "Vocabulary"),
            ("practice.practice_types.grammar", "Grammar"),
            ("error_logs.question", "questions"),
            ("error_logs.needs_review", "Needs review"),
            ("error_logs.note_updated", "Note updated"),
            ("error_logs.note_update_failed", "Could not update the note"),
            ("error_logs.note_required", "Please enter your notes before saving"),
            ("error_logs.status_updated", "Status updated"),
            ("error_logs.status_update_failed", "Could not update the status"),
            ("score_details.question", "Question"),
            ("score_details.answer_options", "Answer options"),
            ("score_details.reading_writing", "Reading and Writing"),
            ("score_details.math", "Math"),
            ("common.save", "Save"),
            ("common.cancel", "Cancel"),
            ("common.edit", "Edit"),
            ("common.close", "Close"),
        ]);
        Self { entries }
    }
}

impl LocalizationService for StaticCatalog {
    fn resolve(&self, key: &str) -> String {
        self.entries
            .get(key)
            .map_or_else(|| key.to_string(), ToString::to_string)
    }
}
