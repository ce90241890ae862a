//! Orchestrates the mistake-review screen: loading the log, opening and
//! closing review dialogs, and driving note/status persistence through the
//! modal controller's token-checked tickets.

use std::sync::Arc;
use tracing::debug;

use review_core::Clock;
use review_core::listing::{ListQuery, PageView};
use review_core::model::{QuestionId, QuestionRecord, ReviewStatus};
use storage::{NoteRepository, StatusRepository, Storage};

use crate::error::{ErrorLogError, ReviewFlowError};
use crate::error_log::ErrorLogService;
use crate::review_modal::{
    NoteSaveOutcome, ReviewModalController, SessionToken, StatusUpdateOutcome,
};
use crate::review_session::ReviewSession;

/// The single place where the note/status repositories are awaited.
///
/// Repository failures never escape as errors here; they surface through the
/// session's `last_error` and the outcome enums, and the screen keeps
/// running.
pub struct ReviewFlowService {
    log: ErrorLogService,
    modal: ReviewModalController,
    notes: Arc<dyn NoteRepository>,
    statuses: Arc<dyn StatusRepository>,
}

impl ReviewFlowService {
    #[must_use]
    pub fn new(clock: Clock, storage: &Storage) -> Self {
        Self {
            log: ErrorLogService::new(clock, Arc::clone(&storage.questions)),
            modal: ReviewModalController::new(),
            notes: Arc::clone(&storage.notes),
            statuses: Arc::clone(&storage.statuses),
        }
    }

    #[must_use]
    pub fn log(&self) -> &ErrorLogService {
        &self.log
    }

    #[must_use]
    pub fn modal(&self) -> &ReviewModalController {
        &self.modal
    }

    /// Loads (or reloads) the mistake log.
    ///
    /// # Errors
    ///
    /// Returns `ErrorLogError::Storage` when the fetch fails; the visible
    /// log is empty in that case but the screen stays usable.
    pub async fn load(&mut self) -> Result<usize, ErrorLogError> {
        self.log.load().await
    }

    /// Derives one page of the filtered log.
    #[must_use]
    pub fn page(&self, query: &ListQuery) -> PageView {
        self.log.page(query)
    }

    /// Opens the review dialog for a record, seeding the session's status
    /// from the status source.
    ///
    /// # Errors
    ///
    /// Returns `ReviewFlowError::UnknownRecord` if the record is not in the
    /// loaded log.
    pub fn open_review(&mut self, id: QuestionId) -> Result<SessionToken, ReviewFlowError> {
        let record = self
            .log
            .record(id)
            .cloned()
            .ok_or(ReviewFlowError::UnknownRecord(id))?;
        let status = self.log.status_of(id);
        Ok(self.modal.open(&record, status))
    }

    /// Closes the review dialog, discarding any unsaved session state.
    pub fn close_review(&mut self) {
        self.modal.close();
    }

    #[must_use]
    pub fn session(&self) -> Option<&ReviewSession> {
        self.modal.session()
    }

    /// Read-only view of the record under review.
    #[must_use]
    pub fn active_record(&self) -> Option<&QuestionRecord> {
        self.modal.record()
    }

    /// Flips the open session between viewing and editing the note.
    pub fn toggle_edit(&mut self) {
        if let Some(session) = self.modal.session_mut() {
            session.toggle_edit();
        }
    }

    /// Replaces the open session's note draft.
    pub fn edit_draft(&mut self, text: impl Into<String>) {
        if let Some(session) = self.modal.session_mut() {
            session.edit_draft(text);
        }
    }

    /// Validates and persists the note draft of the open session.
    ///
    /// A committed note is applied back to the record store in place.
    /// Validation failures and in-flight saves come back as
    /// [`NoteSaveOutcome::Rejected`] with the inline error on the session.
    pub async fn save_note(&mut self) -> NoteSaveOutcome {
        let Some(request) = self.modal.begin_note_save() else {
            return NoteSaveOutcome::Rejected;
        };
        let result = self.notes.update_note(request.record_id, &request.note).await;
        let outcome = self.modal.complete_note_save(request.token, result);
        if let NoteSaveOutcome::Committed { record_id, note } = &outcome {
            self.log.commit_note(*record_id, note);
            debug!("committed note for record {record_id}");
        }
        outcome
    }

    /// Optimistically applies and persists a status change for the open
    /// session; rolls back on persistence failure.
    pub async fn set_status(&mut self, status: ReviewStatus) -> StatusUpdateOutcome {
        let Some(request) = self.modal.request_status(status) else {
            return StatusUpdateOutcome::Ignored;
        };
        let result = self
            .statuses
            .update_status(request.record_id, request.requested)
            .await;
        let outcome = self.modal.complete_status_update(request.token, result);
        if let StatusUpdateOutcome::Applied { record_id, status } = outcome {
            self.log.record_status(record_id, status);
            debug!("recorded status {status} for record {record_id}");
        }
        outcome
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
