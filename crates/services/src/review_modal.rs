//! Review-dialog controller: owns at most one [`ReviewSession`] and guards
//! persistence completions with a generation token, so a completion that
//! lands after the dialog closed (or reopened) is inert instead of mutating
//! a discarded session.

use review_core::model::{Note, QuestionId, QuestionRecord, ReviewStatus};
use storage::StorageError;
use tracing::{debug, warn};

use crate::review_session::ReviewSession;

/// Generation token identifying one opened review dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionToken(u64);

/// Staged note save handed to the persistence driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSaveRequest {
    pub token: SessionToken,
    pub record_id: QuestionId,
    pub note: Note,
}

/// How a note save settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteSaveOutcome {
    /// Persisted; the committed note must be applied to the record store.
    Committed { record_id: QuestionId, note: Note },
    /// Nothing was staged: no open session, save in flight, or validation
    /// failed (the session carries the inline error).
    Rejected,
    /// The repository call failed; the session stayed in edit mode.
    Failed,
    /// The session was closed (or replaced) before the completion arrived.
    Stale,
}

/// Staged optimistic status change handed to the persistence driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdateRequest {
    pub token: SessionToken,
    pub record_id: QuestionId,
    pub prior: ReviewStatus,
    pub requested: ReviewStatus,
}

/// How a status change settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusUpdateOutcome {
    /// Persisted; the optimistic value stands and should be recorded.
    Applied {
        record_id: QuestionId,
        status: ReviewStatus,
    },
    /// Nothing was staged: no open session, update in flight, or the
    /// requested status already shows.
    Ignored,
    /// The repository call failed; the status rolled back.
    RolledBack,
    /// The session was closed (or replaced) before the completion arrived.
    Stale,
}

struct OpenReview {
    token: SessionToken,
    record: QuestionRecord,
    session: ReviewSession,
}

/// Orchestrates creation and destruction of review sessions.
#[derive(Default)]
pub struct ReviewModalController {
    open: Option<OpenReview>,
    next_token: u64,
}

impl ReviewModalController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a review session for the record, seeding the note draft from
    /// the record's current note. Any previously open session is discarded.
    pub fn open(&mut self, record: &QuestionRecord, status: ReviewStatus) -> SessionToken {
        let token = SessionToken(self.next_token);
        self.next_token += 1;
        let session = ReviewSession::new(record.id(), record.note(), status);
        self.open = Some(OpenReview {
            token,
            record: record.clone(),
            session,
        });
        debug!("opened review dialog for record {}", record.id());
        token
    }

    /// Closes the dialog, discarding the session and any unsaved state.
    pub fn close(&mut self) {
        if let Some(open) = self.open.take() {
            debug!("closed review dialog for record {}", open.record.id());
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    #[must_use]
    pub fn token(&self) -> Option<SessionToken> {
        self.open.as_ref().map(|open| open.token)
    }

    /// Read-only view of the record under review.
    #[must_use]
    pub fn record(&self) -> Option<&QuestionRecord> {
        self.open.as_ref().map(|open| &open.record)
    }

    #[must_use]
    pub fn session(&self) -> Option<&ReviewSession> {
        self.open.as_ref().map(|open| &open.session)
    }

    pub fn session_mut(&mut self) -> Option<&mut ReviewSession> {
        self.open.as_mut().map(|open| &mut open.session)
    }

    /// Stages a note save on the open session.
    pub fn begin_note_save(&mut self) -> Option<NoteSaveRequest> {
        let open = self.open.as_mut()?;
        let note = open.session.begin_note_save()?;
        Some(NoteSaveRequest {
            token: open.token,
            record_id: open.record.id(),
            note,
        })
    }

    /// Applies a note-save completion, token-checked.
    ///
    /// A completion for a closed or replaced session returns
    /// [`NoteSaveOutcome::Stale`] and mutates nothing.
    pub fn complete_note_save(
        &mut self,
        token: SessionToken,
        result: Result<(), StorageError>,
    ) -> NoteSaveOutcome {
        let Some(open) = self.open.as_mut() else {
            warn!("ignoring note-save completion for a closed review dialog");
            return NoteSaveOutcome::Stale;
        };
        if open.token != token {
            warn!(
                "ignoring note-save completion for a replaced review dialog (record {})",
                open.record.id()
            );
            return NoteSaveOutcome::Stale;
        }
        match open.session.finish_note_save(result) {
            Some(note) => {
                open.record.commit_note(&note);
                NoteSaveOutcome::Committed {
                    record_id: open.record.id(),
                    note,
                }
            }
            None => NoteSaveOutcome::Failed,
        }
    }

    /// Stages an optimistic status change on the open session.
    pub fn request_status(&mut self, requested: ReviewStatus) -> Option<StatusUpdateRequest> {
        let open = self.open.as_mut()?;
        let change = open.session.request_status(requested)?;
        Some(StatusUpdateRequest {
            token: open.token,
            record_id: open.record.id(),
            prior: change.prior,
            requested: change.requested,
        })
    }

    /// Applies a status-update completion, token-checked.
    ///
    /// A completion for a closed or replaced session returns
    /// [`StatusUpdateOutcome::Stale`] and mutates nothing.
    pub fn complete_status_update(
        &mut self,
        token: SessionToken,
        result: Result<(), StorageError>,
    ) -> StatusUpdateOutcome {
        let Some(open) = self.open.as_mut() else {
            warn!("ignoring status-update completion for a closed review dialog");
            return StatusUpdateOutcome::Stale;
        };
        if open.token != token {
            warn!(
                "ignoring status-update completion for a replaced review dialog (record {})",
                open.record.id()
            );
            return StatusUpdateOutcome::Stale;
        }
        if open.session.finish_status_update(result) {
            StatusUpdateOutcome::Applied {
                record_id: open.record.id(),
                status: open.session.status(),
            }
        } else {
            StatusUpdateOutcome::RolledBack
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SessionError;
    use crate::review_session::{NoteMode, StatusUpdateState};
    use review_core::model::{
        AnswerLetter, QuestionContent, QuestionId, QuestionRecordDraft, Section, SectionTag,
    };
    use review_core::time::fixed_now;
    use std::collections::BTreeMap;

    fn record(id: u64, note: &str) -> QuestionRecord {
        let answers = BTreeMap::from([
            (AnswerLetter::A, "first".to_string()),
            (AnswerLetter::B, "second".to_string()),
        ]);
        QuestionRecordDraft {
            question: QuestionContent {
                text: format!("question {id}"),
                section: SectionTag::from(Section::Math),
                answers,
                correct_answer: AnswerLetter::B,
            },
            selected_answer: AnswerLetter::A,
            note: note.to_string(),
        }
        .validate(fixed_now())
        .unwrap()
        .assign_id(QuestionId::new(id))
    }

    fn storage_err() -> StorageError {
        StorageError::Connection("boom".to_string())
    }

    #[test]
    fn open_seeds_the_session_from_the_record() {
        let mut modal = ReviewModalController::new();
        modal.open(&record(1, "prior note"), ReviewStatus::Reviewed);

        let session = modal.session().unwrap();
        assert_eq!(session.record_id(), QuestionId::new(1));
        assert_eq!(session.note_draft(), "prior note");
        assert_eq!(session.status(), ReviewStatus::Reviewed);
        assert_eq!(session.mode(), NoteMode::Viewing);
    }

    #[test]
    fn close_discards_everything() {
        let mut modal = ReviewModalController::new();
        modal.open(&record(1, ""), ReviewStatus::NeedsReview);
        modal.session_mut().unwrap().toggle_edit();
        modal.session_mut().unwrap().edit_draft("unsaved");

        modal.close();
        assert!(!modal.is_open());
        assert!(modal.session().is_none());
        assert!(modal.record().is_none());
    }

    #[test]
    fn reopening_starts_from_the_committed_note_again() {
        let mut modal = ReviewModalController::new();
        let rec = record(1, "committed");
        modal.open(&rec, ReviewStatus::NeedsReview);
        modal.session_mut().unwrap().toggle_edit();
        modal.session_mut().unwrap().edit_draft("discarded on close");
        modal.close();

        modal.open(&rec, ReviewStatus::NeedsReview);
        assert_eq!(modal.session().unwrap().note_draft(), "committed");
    }

    #[test]
    fn committed_save_updates_the_exposed_record() {
        let mut modal = ReviewModalController::new();
        modal.open(&record(1, "old"), ReviewStatus::NeedsReview);
        modal.session_mut().unwrap().toggle_edit();
        modal.session_mut().unwrap().edit_draft("new insight");

        let request = modal.begin_note_save().unwrap();
        let outcome = modal.complete_note_save(request.token, Ok(()));

        assert!(matches!(
            outcome,
            NoteSaveOutcome::Committed { record_id, ref note }
                if record_id == QuestionId::new(1) && note.as_str() == "new insight"
        ));
        assert_eq!(modal.record().unwrap().note(), "new insight");
    }

    #[test]
    fn completion_after_close_is_stale_and_inert() {
        let mut modal = ReviewModalController::new();
        modal.open(&record(1, ""), ReviewStatus::NeedsReview);
        modal.session_mut().unwrap().toggle_edit();
        modal.session_mut().unwrap().edit_draft("mid-flight");

        let request = modal.begin_note_save().unwrap();
        modal.close();

        let outcome = modal.complete_note_save(request.token, Ok(()));
        assert_eq!(outcome, NoteSaveOutcome::Stale);
        assert!(!modal.is_open());
    }

    #[test]
    fn completion_for_a_replaced_session_is_stale() {
        let mut modal = ReviewModalController::new();
        modal.open(&record(1, ""), ReviewStatus::NeedsReview);
        modal.session_mut().unwrap().toggle_edit();
        modal.session_mut().unwrap().edit_draft("from the first dialog");
        let request = modal.begin_note_save().unwrap();

        // User closes and opens a different record before the save settles.
        modal.close();
        modal.open(&record(2, "second"), ReviewStatus::NeedsReview);

        let outcome = modal.complete_note_save(request.token, Ok(()));
        assert_eq!(outcome, NoteSaveOutcome::Stale);
        assert_eq!(modal.record().unwrap().note(), "second");
        assert_eq!(modal.session().unwrap().mode(), NoteMode::Viewing);
    }

    #[test]
    fn stale_status_completion_leaves_the_new_session_alone() {
        let mut modal = ReviewModalController::new();
        modal.open(&record(1, ""), ReviewStatus::NeedsReview);
        let request = modal.request_status(ReviewStatus::Reviewed).unwrap();

        modal.close();
        modal.open(&record(1, ""), ReviewStatus::NeedsReview);

        let outcome = modal.complete_status_update(request.token, Ok(()));
        assert_eq!(outcome, StatusUpdateOutcome::Stale);
        assert_eq!(modal.session().unwrap().status(), ReviewStatus::NeedsReview);
        assert_eq!(
            modal.session().unwrap().status_update(),
            StatusUpdateState::Idle
        );
    }

    #[test]
    fn failed_status_update_reports_rollback() {
        let mut modal = ReviewModalController::new();
        modal.open(&record(1, ""), ReviewStatus::NeedsReview);
        let request = modal.request_status(ReviewStatus::Reviewed).unwrap();

        let outcome = modal.complete_status_update(request.token, Err(storage_err()));
        assert_eq!(outcome, StatusUpdateOutcome::RolledBack);

        let session = modal.session().unwrap();
        assert_eq!(session.status(), ReviewStatus::NeedsReview);
        assert!(matches!(
            session.last_error(),
            Some(SessionError::Persistence(_))
        ));
    }

    #[test]
    fn begin_without_an_open_dialog_yields_nothing() {
        let mut modal = ReviewModalController::new();
        assert!(modal.begin_note_save().is_none());
        assert!(modal.request_status(ReviewStatus::Reviewed).is_none());
    }
}
