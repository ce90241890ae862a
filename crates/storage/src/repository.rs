use async_trait::async_trait;
use review_core::model::{Note, QuestionId, QuestionRecord, ReviewStatus};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Source of the mistake log: every incorrectly answered question, in the
/// order the backing collaborator defines.
#[async_trait]
pub trait QuestionLogRepository: Send + Sync {
    /// Fetch the full ordered mistake log.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be fetched.
    async fn fetch_all(&self) -> Result<Vec<QuestionRecord>, StorageError>;
}

/// Persistence for a record's review note.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Persist a committed note for the given record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the record is missing, or other
    /// storage errors.
    async fn update_note(&self, id: QuestionId, note: &Note) -> Result<(), StorageError>;
}

/// Persistence for a record's review status.
#[async_trait]
pub trait StatusRepository: Send + Sync {
    /// Persist the review status for the given record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the record is missing, or other
    /// storage errors.
    async fn update_status(&self, id: QuestionId, status: ReviewStatus)
    -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// Records stay in insertion order; statuses live in a side map keyed by
/// record id.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    records: Arc<Mutex<Vec<QuestionRecord>>>,
    statuses: Arc<Mutex<HashMap<QuestionId, ReviewStatus>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_records(records: Vec<QuestionRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            statuses: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Stored note text for a record, mostly useful in tests.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the record is missing.
    pub fn note_of(&self, id: QuestionId) -> Result<String, StorageError> {
        let guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .iter()
            .find(|record| record.id() == id)
            .map(|record| record.note().to_string())
            .ok_or(StorageError::NotFound)
    }

    /// Stored status for a record; unrecorded statuses default.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the map is poisoned.
    pub fn status_of(&self, id: QuestionId) -> Result<ReviewStatus, StorageError> {
        let guard = self
            .statuses
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&id).copied().unwrap_or_default())
    }
}

#[async_trait]
impl QuestionLogRepository for InMemoryRepository {
    async fn fetch_all(&self) -> Result<Vec<QuestionRecord>, StorageError> {
        let guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl NoteRepository for InMemoryRepository {
    async fn update_note(&self, id: QuestionId, note: &Note) -> Result<(), StorageError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let record = guard
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or(StorageError::NotFound)?;
        record.commit_note(note);
        Ok(())
    }
}

#[async_trait]
impl StatusRepository for InMemoryRepository {
    async fn update_status(
        &self,
        id: QuestionId,
        status: ReviewStatus,
    ) -> Result<(), StorageError> {
        let known = {
            let records = self
                .records
                .lock()
                .map_err(|e| StorageError::Connection(e.to_string()))?;
            records.iter().any(|record| record.id() == id)
        };
        if !known {
            return Err(StorageError::NotFound);
        }

        let mut guard = self
            .statuses
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(id, status);
        Ok(())
    }
}

/// Aggregates the three repositories behind trait objects for easy backend
/// swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionLogRepository>,
    pub notes: Arc<dyn NoteRepository>,
    pub statuses: Arc<dyn StatusRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    #[must_use]
    pub fn seeded(records: Vec<QuestionRecord>) -> Self {
        Self::from_repository(InMemoryRepository::with_records(records))
    }

    fn from_repository(repo: InMemoryRepository) -> Self {
        let questions: Arc<dyn QuestionLogRepository> = Arc::new(repo.clone());
        let notes: Arc<dyn NoteRepository> = Arc::new(repo.clone());
        let statuses: Arc<dyn StatusRepository> = Arc::new(repo);
        Self {
            questions,
            notes,
            statuses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_core::model::{
        AnswerLetter, NoteDraft, QuestionContent, QuestionRecordDraft, Section, SectionTag,
    };
    use review_core::time::fixed_now;
    use std::collections::BTreeMap;

    fn build_record(id: u64, section: Section) -> QuestionRecord {
        let answers = BTreeMap::from([
            (AnswerLetter::A, "first".to_string()),
            (AnswerLetter::B, "second".to_string()),
        ]);
        QuestionRecordDraft {
            question: QuestionContent {
                text: format!("question {id}"),
                section: SectionTag::from(section),
                answers,
                correct_answer: AnswerLetter::B,
            },
            selected_answer: AnswerLetter::A,
            note: String::new(),
        }
        .validate(fixed_now())
        .unwrap()
        .assign_id(QuestionId::new(id))
    }

    #[tokio::test]
    async fn fetch_all_preserves_order() {
        let records = vec![
            build_record(3, Section::Math),
            build_record(1, Section::Language),
            build_record(2, Section::Math),
        ];
        let repo = InMemoryRepository::with_records(records);

        let fetched = repo.fetch_all().await.unwrap();
        let ids: Vec<u64> = fetched.iter().map(|r| r.id().value()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn update_note_persists_in_place() {
        let repo = InMemoryRepository::with_records(vec![build_record(1, Section::Math)]);
        let note = NoteDraft::new("sign error").validate().unwrap();

        repo.update_note(QuestionId::new(1), &note).await.unwrap();

        assert_eq!(repo.note_of(QuestionId::new(1)).unwrap(), "sign error");
    }

    #[tokio::test]
    async fn update_note_for_unknown_record_is_not_found() {
        let repo = InMemoryRepository::new();
        let note = NoteDraft::new("anything").validate().unwrap();

        let err = repo.update_note(QuestionId::new(9), &note).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn update_status_for_unknown_record_is_not_found() {
        let repo = InMemoryRepository::new();
        let err = repo
            .update_status(QuestionId::new(1), ReviewStatus::Reviewed)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn status_round_trips_and_defaults() {
        let repo = InMemoryRepository::with_records(vec![build_record(1, Section::Language)]);
        assert_eq!(
            repo.status_of(QuestionId::new(1)).unwrap(),
            ReviewStatus::NeedsReview
        );

        repo.update_status(QuestionId::new(1), ReviewStatus::Reviewed)
            .await
            .unwrap();
        assert_eq!(
            repo.status_of(QuestionId::new(1)).unwrap(),
            ReviewStatus::Reviewed
        );
    }
}
