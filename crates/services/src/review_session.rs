//! Per-record review state machine: note editing with validated saves, and
//! optimistic status toggling with rollback on persistence failure.
//!
//! The session is purely transitional; awaiting the repositories is the
//! caller's job (see `review_flow`). Each persistence kind follows the same
//! two-phase shape: `begin_*` stages the change and yields what must be
//! persisted, `finish_*` applies the repository outcome.

use review_core::model::{Note, NoteDraft, QuestionId, ReviewStatus};
use storage::StorageError;

use crate::error::SessionError;

//
// ─── SESSION STATES ────────────────────────────────────────────────────────────
//

/// Whether the note area shows the committed note or an editable draft.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteMode {
    Viewing,
    Editing,
}

/// Whether a note save is in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveState {
    Idle,
    Saving,
}

/// Whether a status update is in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusUpdateState {
    Idle,
    Updating,
}

//
// ─── OPTIMISTIC VALUES ─────────────────────────────────────────────────────────
//

/// A value updated optimistically: snapshot the committed value, stage the
/// new one immediately, then commit or roll back once persistence settles.
///
/// One staged update at a time; `begin` refuses a second while the first is
/// in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Optimistic<T> {
    committed: T,
    pending: Option<T>,
}

impl<T: Clone> Optimistic<T> {
    fn new(value: T) -> Self {
        Self {
            committed: value,
            pending: None,
        }
    }

    /// The visible value: the staged one while in flight, else the committed.
    fn current(&self) -> &T {
        self.pending.as_ref().unwrap_or(&self.committed)
    }

    fn committed(&self) -> &T {
        &self.committed
    }

    fn in_flight(&self) -> bool {
        self.pending.is_some()
    }

    /// Stages `value` and returns the committed snapshot it would replace;
    /// `None` if an update is already in flight.
    fn begin(&mut self, value: T) -> Option<T> {
        if self.pending.is_some() {
            return None;
        }
        let prior = self.committed.clone();
        self.pending = Some(value);
        Some(prior)
    }

    fn commit(&mut self) {
        if let Some(value) = self.pending.take() {
            self.committed = value;
        }
    }

    fn rollback(&mut self) {
        self.pending = None;
    }
}

//
// ─── REVIEW SESSION ────────────────────────────────────────────────────────────
//

/// Prior/requested pair for an optimistic status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub prior: ReviewStatus,
    pub requested: ReviewStatus,
}

/// Ephemeral review context for one mistake-log record.
///
/// Created when the review dialog opens and discarded in full when it
/// closes; no draft state survives a close. Note saving and status updating
/// are independent operations — each may be in flight while the other runs,
/// but each kind is serialized against itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSession {
    record_id: QuestionId,
    mode: NoteMode,
    note_draft: String,
    note: Optimistic<String>,
    status: Optimistic<ReviewStatus>,
    last_error: Option<SessionError>,
}

impl ReviewSession {
    /// Creates a session seeded from the record's committed note and the
    /// status source's current value.
    #[must_use]
    pub fn new(record_id: QuestionId, note: &str, status: ReviewStatus) -> Self {
        Self {
            record_id,
            mode: NoteMode::Viewing,
            note_draft: note.to_string(),
            note: Optimistic::new(note.to_string()),
            status: Optimistic::new(status),
            last_error: None,
        }
    }

    #[must_use]
    pub fn record_id(&self) -> QuestionId {
        self.record_id
    }

    #[must_use]
    pub fn mode(&self) -> NoteMode {
        self.mode
    }

    #[must_use]
    pub fn note_draft(&self) -> &str {
        &self.note_draft
    }

    /// The last committed note text.
    #[must_use]
    pub fn committed_note(&self) -> &str {
        self.note.committed()
    }

    /// The visible status, optimistic while an update is in flight.
    #[must_use]
    pub fn status(&self) -> ReviewStatus {
        *self.status.current()
    }

    #[must_use]
    pub fn save_state(&self) -> SaveState {
        if self.note.in_flight() {
            SaveState::Saving
        } else {
            SaveState::Idle
        }
    }

    #[must_use]
    pub fn status_update(&self) -> StatusUpdateState {
        if self.status.in_flight() {
            StatusUpdateState::Updating
        } else {
            StatusUpdateState::Idle
        }
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }

    //
    // ─── NOTE EDITING ──────────────────────────────────────────────────────
    //

    /// Flips between viewing and editing the note.
    ///
    /// Leaving edit mode discards the draft back to the last committed note
    /// and clears any inline error; nothing is partially committed. Ignored
    /// while a save is in flight.
    pub fn toggle_edit(&mut self) {
        if self.note.in_flight() {
            return;
        }
        match self.mode {
            NoteMode::Viewing => {
                self.mode = NoteMode::Editing;
            }
            NoteMode::Editing => {
                self.mode = NoteMode::Viewing;
                self.note_draft = self.note.committed().clone();
                self.last_error = None;
            }
        }
    }

    /// Replaces the draft text. Only effective while editing.
    pub fn edit_draft(&mut self, text: impl Into<String>) {
        if self.mode == NoteMode::Editing {
            self.note_draft = text.into();
        }
    }

    /// Starts a note save, yielding the validated note to persist.
    ///
    /// Returns `None` without touching the repositories when:
    /// - the session is not in edit mode;
    /// - a save is already in flight (no queued saves);
    /// - the draft is empty after trimming — `last_error` is set to
    ///   [`SessionError::NoteRequired`] and the session stays in edit mode.
    pub fn begin_note_save(&mut self) -> Option<Note> {
        if self.mode != NoteMode::Editing || self.note.in_flight() {
            return None;
        }
        let note = match NoteDraft::new(self.note_draft.clone()).validate() {
            Ok(note) => note,
            Err(err) => {
                self.last_error = Some(err.into());
                return None;
            }
        };
        self.note.begin(note.as_str().to_string());
        self.last_error = None;
        Some(note)
    }

    /// Applies the persistence outcome of a note save.
    ///
    /// On success the draft becomes the committed note, the session returns
    /// to viewing, and the committed note is handed back for the record
    /// store. On failure the session stays in edit mode with the draft
    /// intact and `last_error` set. A finish without a matching begin is a
    /// no-op.
    pub fn finish_note_save(&mut self, result: Result<(), StorageError>) -> Option<Note> {
        if !self.note.in_flight() {
            return None;
        }
        match result {
            Ok(()) => {
                self.note.commit();
                self.note_draft = self.note.committed().clone();
                self.mode = NoteMode::Viewing;
                self.last_error = None;
                NoteDraft::new(self.note.committed().clone()).validate().ok()
            }
            Err(err) => {
                self.note.rollback();
                self.last_error = Some(SessionError::Persistence(err.to_string()));
                None
            }
        }
    }

    //
    // ─── STATUS TOGGLING ───────────────────────────────────────────────────
    //

    /// Optimistically applies a status change and yields the prior value.
    ///
    /// The visible status flips immediately. Returns `None` while an update
    /// is in flight (no queued mutation) or when the requested status equals
    /// the visible one.
    pub fn request_status(&mut self, requested: ReviewStatus) -> Option<StatusChange> {
        if self.status.in_flight() || requested == *self.status.current() {
            return None;
        }
        let prior = self.status.begin(requested)?;
        Some(StatusChange { prior, requested })
    }

    /// Applies the persistence outcome of a status change.
    ///
    /// On success the optimistic value stands; on failure the status rolls
    /// back to the snapshot and `last_error` is set. Returns whether the
    /// optimistic value stood.
    pub fn finish_status_update(&mut self, result: Result<(), StorageError>) -> bool {
        if !self.status.in_flight() {
            return false;
        }
        match result {
            Ok(()) => {
                self.status.commit();
                true
            }
            Err(err) => {
                self.status.rollback();
                self.last_error = Some(SessionError::Persistence(err.to_string()));
                false
            }
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
