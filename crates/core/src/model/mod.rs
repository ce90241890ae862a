mod ids;
mod note;
mod question;
mod review;
mod section;

pub use ids::{ParseIdError, QuestionId};
pub use note::{Note, NoteDraft, NoteValidationError};
pub use question::{
    AnswerLetter, ParseAnswerLetterError, QuestionContent, QuestionRecord, QuestionRecordDraft,
    QuestionValidationError, ValidatedRecord,
};
pub use review::{ReviewStatus, ReviewStatusError};
pub use section::{Section, SectionTag};
