//! In-memory store of the loaded mistake log plus the per-record review
//! status source.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, warn};

use review_core::Clock;
use review_core::listing::{ListQuery, PageView};
use review_core::model::{Note, QuestionId, QuestionRecord, ReviewStatus};
use storage::QuestionLogRepository;

use crate::error::ErrorLogError;

/// A recorded review status and when it was last persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusEntry {
    pub status: ReviewStatus,
    pub updated_at: DateTime<Utc>,
}

/// Holds the ordered record sequence for the current browsing session.
///
/// Loaded once from the [`QuestionLogRepository`]; a failed load leaves the
/// visible sequence empty so the screen stays usable with zero records.
/// Records never change except through [`ErrorLogService::commit_note`], the
/// single mutation path fed by a persisted review-dialog save.
pub struct ErrorLogService {
    clock: Clock,
    questions: Arc<dyn QuestionLogRepository>,
    records: Vec<QuestionRecord>,
    statuses: HashMap<QuestionId, StatusEntry>,
}

impl ErrorLogService {
    #[must_use]
    pub fn new(clock: Clock, questions: Arc<dyn QuestionLogRepository>) -> Self {
        Self {
            clock,
            questions,
            records: Vec::new(),
            statuses: HashMap::new(),
        }
    }

    /// Fetches the mistake log, replacing the visible sequence.
    ///
    /// On failure the sequence becomes empty and the error is both logged
    /// and returned; callers keep the UI alive either way.
    ///
    /// # Errors
    ///
    /// Returns `ErrorLogError::Storage` when the repository fetch fails.
    pub async fn load(&mut self) -> Result<usize, ErrorLogError> {
        match self.questions.fetch_all().await {
            Ok(records) => {
                let count = records.len();
                self.records = records;
                Ok(count)
            }
            Err(err) => {
                error!("failed to load mistake log, showing empty list: {err}");
                self.records.clear();
                Err(err.into())
            }
        }
    }

    #[must_use]
    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn record(&self, id: QuestionId) -> Option<&QuestionRecord> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Derives one page of the filtered log for the given query.
    #[must_use]
    pub fn page(&self, query: &ListQuery) -> PageView {
        query.run(&self.records)
    }

    /// Current review status for a record; unrecorded records need review.
    #[must_use]
    pub fn status_of(&self, id: QuestionId) -> ReviewStatus {
        self.statuses
            .get(&id)
            .map_or_else(ReviewStatus::default, |entry| entry.status)
    }

    #[must_use]
    pub fn status_entry(&self, id: QuestionId) -> Option<&StatusEntry> {
        self.statuses.get(&id)
    }

    /// Records a successfully persisted status change.
    pub fn record_status(&mut self, id: QuestionId, status: ReviewStatus) {
        self.statuses.insert(
            id,
            StatusEntry {
                status,
                updated_at: self.clock.now(),
            },
        );
    }

    /// Applies a committed note to the matching record in place, preserving
    /// identity and order. Returns whether a record was updated.
    pub fn commit_note(&mut self, id: QuestionId, note: &Note) -> bool {
        match self.records.iter_mut().find(|record| record.id() == id) {
            Some(record) => {
                record.commit_note(note);
                true
            }
            None => {
                warn!("committed note for record {id} not in the loaded log");
                false
            }
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
