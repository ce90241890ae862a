use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use review_core::listing::{Category, ListQuery};
use review_core::model::{
    AnswerLetter, Note, QuestionContent, QuestionId, QuestionRecord, QuestionRecordDraft,
    ReviewStatus, Section, SectionTag,
};
use review_core::time::{fixed_clock, fixed_now};
use services::{
    NoteMode, NoteSaveOutcome, ReviewFlowService, SessionError, StatusUpdateOutcome,
};
use storage::sample::sample_error_log;
use storage::{NoteRepository, StatusRepository, Storage, StorageError};

/// Note repository that counts calls and can be switched to fail.
#[derive(Default)]
struct CountingNoteRepo {
    calls: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl NoteRepository for CountingNoteRepo {
    async fn update_note(&self, _id: QuestionId, _note: &Note) -> Result<(), StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(StorageError::Connection("note backend down".to_string()))
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
struct FailingStatusRepo;

#[async_trait]
impl StatusRepository for FailingStatusRepo {
    async fn update_status(
        &self,
        _id: QuestionId,
        _status: ReviewStatus,
    ) -> Result<(), StorageError> {
        Err(StorageError::Connection("status backend down".to_string()))
    }
}

fn seeded_storage() -> Storage {
    Storage::seeded(sample_error_log().expect("sample log is valid"))
}

fn record_without_note(id: u64) -> QuestionRecord {
    let answers = BTreeMap::from([
        (AnswerLetter::A, "16".to_string()),
        (AnswerLetter::B, "32".to_string()),
    ]);
    QuestionRecordDraft {
        question: QuestionContent {
            text: "What is the perimeter of a square with side 8?".to_string(),
            section: SectionTag::from(Section::Math),
            answers,
            correct_answer: AnswerLetter::B,
        },
        selected_answer: AnswerLetter::A,
        note: String::new(),
    }
    .validate(fixed_now())
    .expect("record is valid")
    .assign_id(QuestionId::new(id))
}

fn storage_with_notes(notes: Arc<dyn NoteRepository>) -> Storage {
    let base = seeded_storage();
    Storage {
        questions: base.questions,
        notes,
        statuses: base.statuses,
    }
}

fn storage_with_statuses(statuses: Arc<dyn StatusRepository>) -> Storage {
    let base = seeded_storage();
    Storage {
        questions: base.questions,
        notes: base.notes,
        statuses,
    }
}

#[tokio::test]
async fn math_tab_shows_all_four_math_records_on_one_page() {
    let storage = seeded_storage();
    let mut flow = ReviewFlowService::new(fixed_clock(), &storage);
    assert_eq!(flow.load().await.expect("load sample log"), 8);

    let view = flow.page(&ListQuery::new().with_category(Category::Math));

    assert_eq!(view.items.len(), 4);
    assert_eq!(view.total, 4);
    assert!(
        view.items
            .iter()
            .all(|record| record.section_tag().matches(Section::Math))
    );
}

#[tokio::test]
async fn second_page_of_two_returns_the_third_and_fourth_records() {
    let storage = seeded_storage();
    let mut flow = ReviewFlowService::new(fixed_clock(), &storage);
    flow.load().await.expect("load sample log");

    let view = flow.page(&ListQuery::new().with_page_size(2).with_page(2));

    let ids: Vec<u64> = view.items.iter().map(|r| r.id().value()).collect();
    assert_eq!(ids, vec![3, 4]);
}

#[tokio::test]
async fn empty_note_save_never_reaches_the_repository() {
    let notes = Arc::new(CountingNoteRepo::default());
    let storage = storage_with_notes(Arc::clone(&notes) as Arc<dyn NoteRepository>);
    let mut flow = ReviewFlowService::new(fixed_clock(), &storage);
    flow.load().await.expect("load sample log");

    flow.open_review(QuestionId::new(1)).expect("open review");
    flow.toggle_edit();
    flow.edit_draft("");

    let outcome = flow.save_note().await;

    assert_eq!(outcome, NoteSaveOutcome::Rejected);
    assert_eq!(notes.calls.load(Ordering::SeqCst), 0);
    let session = flow.session().expect("session still open");
    assert_eq!(session.mode(), NoteMode::Editing);
    assert_eq!(session.last_error(), Some(&SessionError::NoteRequired));
}

#[tokio::test]
async fn saving_untouched_on_a_noteless_record_is_rejected() {
    let notes = Arc::new(CountingNoteRepo::default());
    let base = Storage::seeded(vec![record_without_note(1)]);
    let storage = Storage {
        questions: base.questions,
        notes: Arc::clone(&notes) as Arc<dyn NoteRepository>,
        statuses: base.statuses,
    };
    let mut flow = ReviewFlowService::new(fixed_clock(), &storage);
    flow.load().await.expect("load log");

    flow.open_review(QuestionId::new(1)).expect("open review");
    flow.toggle_edit();
    // Save without typing anything; the seeded draft is already empty.
    let outcome = flow.save_note().await;

    assert_eq!(outcome, NoteSaveOutcome::Rejected);
    assert_eq!(notes.calls.load(Ordering::SeqCst), 0);
    let session = flow.session().expect("session still open");
    assert_eq!(session.mode(), NoteMode::Editing);
    assert_eq!(session.last_error(), Some(&SessionError::NoteRequired));
}

#[tokio::test]
async fn failed_note_save_keeps_the_draft_and_the_stored_note() {
    let notes = Arc::new(CountingNoteRepo {
        calls: AtomicUsize::new(0),
        fail: true,
    });
    let storage = storage_with_notes(Arc::clone(&notes) as Arc<dyn NoteRepository>);
    let mut flow = ReviewFlowService::new(fixed_clock(), &storage);
    flow.load().await.expect("load sample log");

    let original_note = flow
        .log()
        .record(QuestionId::new(1))
        .expect("record 1")
        .note()
        .to_string();

    flow.open_review(QuestionId::new(1)).expect("open review");
    flow.toggle_edit();
    flow.edit_draft("a better explanation");

    let outcome = flow.save_note().await;

    assert_eq!(outcome, NoteSaveOutcome::Failed);
    assert_eq!(notes.calls.load(Ordering::SeqCst), 1);

    let session = flow.session().expect("session still open");
    assert_eq!(session.mode(), NoteMode::Editing);
    assert_eq!(session.note_draft(), "a better explanation");
    assert!(matches!(
        session.last_error(),
        Some(SessionError::Persistence(_))
    ));
    assert_eq!(
        flow.log().record(QuestionId::new(1)).expect("record 1").note(),
        original_note
    );
}

#[tokio::test]
async fn successful_note_save_updates_store_and_repository() {
    let storage = seeded_storage();
    let mut flow = ReviewFlowService::new(fixed_clock(), &storage);
    flow.load().await.expect("load sample log");

    flow.open_review(QuestionId::new(3)).expect("open review");
    flow.toggle_edit();
    flow.edit_draft("f(3) = 2*9 - 12 + 1 = 7, option a");

    let outcome = flow.save_note().await;
    assert!(matches!(outcome, NoteSaveOutcome::Committed { .. }));

    assert_eq!(
        flow.log().record(QuestionId::new(3)).expect("record 3").note(),
        "f(3) = 2*9 - 12 + 1 = 7, option a"
    );
    // Reloading pulls the persisted note back from the repository.
    flow.close_review();
    flow.load().await.expect("reload sample log");
    assert_eq!(
        flow.log().record(QuestionId::new(3)).expect("record 3").note(),
        "f(3) = 2*9 - 12 + 1 = 7, option a"
    );
}

#[tokio::test]
async fn failed_status_update_rolls_back_to_the_prior_value() {
    let storage = storage_with_statuses(Arc::new(FailingStatusRepo));
    let mut flow = ReviewFlowService::new(fixed_clock(), &storage);
    flow.load().await.expect("load sample log");

    flow.open_review(QuestionId::new(6)).expect("open review");
    let outcome = flow.set_status(ReviewStatus::Reviewed).await;

    assert_eq!(outcome, StatusUpdateOutcome::RolledBack);
    let session = flow.session().expect("session still open");
    assert_eq!(session.status(), ReviewStatus::NeedsReview);
    assert!(matches!(
        session.last_error(),
        Some(SessionError::Persistence(_))
    ));
    assert_eq!(
        flow.log().status_of(QuestionId::new(6)),
        ReviewStatus::NeedsReview
    );
}

#[tokio::test]
async fn note_and_status_stay_independently_triggerable() {
    let storage = storage_with_statuses(Arc::new(FailingStatusRepo));
    let mut flow = ReviewFlowService::new(fixed_clock(), &storage);
    flow.load().await.expect("load sample log");

    flow.open_review(QuestionId::new(7)).expect("open review");

    // The status update fails and rolls back...
    let status_outcome = flow.set_status(ReviewStatus::Reviewed).await;
    assert_eq!(status_outcome, StatusUpdateOutcome::RolledBack);

    // ...while a note save on the same session still goes through.
    flow.toggle_edit();
    flow.edit_draft("perimeter of a square is four times the side");
    let note_outcome = flow.save_note().await;
    assert!(matches!(note_outcome, NoteSaveOutcome::Committed { .. }));
}

#[tokio::test]
async fn closing_mid_flight_makes_the_completion_inert() {
    let storage = seeded_storage();
    let mut flow = ReviewFlowService::new(fixed_clock(), &storage);
    flow.load().await.expect("load sample log");

    // Drive the controller directly to interleave a close between begin and
    // complete, which the awaited flow methods cannot express.
    let mut modal = services::ReviewModalController::new();
    let record = flow
        .log()
        .record(QuestionId::new(8))
        .expect("record 8")
        .clone();
    modal.open(&record, ReviewStatus::NeedsReview);
    modal.session_mut().expect("session").toggle_edit();
    modal
        .session_mut()
        .expect("session")
        .edit_draft("late completion");

    let request = modal.begin_note_save().expect("begin save");
    modal.close();

    let outcome = modal.complete_note_save(request.token, Ok(()));
    assert_eq!(outcome, NoteSaveOutcome::Stale);
    assert!(!modal.is_open());
}
