use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::note::Note;
use crate::model::section::SectionTag;

//
// ─── ANSWER LETTERS ────────────────────────────────────────────────────────────
//

/// The fixed alphabet of answer option letters.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AnswerLetter {
    A,
    B,
    C,
    D,
}

impl AnswerLetter {
    pub const ALL: [AnswerLetter; 4] = [
        AnswerLetter::A,
        AnswerLetter::B,
        AnswerLetter::C,
        AnswerLetter::D,
    ];

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            AnswerLetter::A => 'a',
            AnswerLetter::B => 'b',
            AnswerLetter::C => 'c',
            AnswerLetter::D => 'd',
        }
    }
}

impl fmt::Display for AnswerLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid answer letter: {0}")]
pub struct ParseAnswerLetterError(pub String);

impl FromStr for AnswerLetter {
    type Err = ParseAnswerLetterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" => Ok(AnswerLetter::A),
            "b" => Ok(AnswerLetter::B),
            "c" => Ok(AnswerLetter::C),
            "d" => Ok(AnswerLetter::D),
            other => Err(ParseAnswerLetterError(other.to_string())),
        }
    }
}

//
// ─── QUESTION CONTENT ──────────────────────────────────────────────────────────
//

/// The question as shown to the learner: text, section tag, answer options,
/// and the correct option letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionContent {
    pub text: String,
    pub section: SectionTag,
    pub answers: BTreeMap<AnswerLetter, String>,
    pub correct_answer: AnswerLetter,
}

impl QuestionContent {
    /// Option text for the given letter, if that option exists.
    #[must_use]
    pub fn option(&self, letter: AnswerLetter) -> Option<&str> {
        self.answers.get(&letter).map(String::as_str)
    }

    /// Whether the given letter is the correct option.
    #[must_use]
    pub fn is_correct_option(&self, letter: AnswerLetter) -> bool {
        letter == self.correct_answer
    }
}

//
// ─── RECORD TYPES ──────────────────────────────────────────────────────────────
//

/// Unvalidated mistake-log entry: a question plus the learner's response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecordDraft {
    pub question: QuestionContent,
    pub selected_answer: AnswerLetter,
    pub note: String,
}

impl QuestionRecordDraft {
    /// Validates the draft into a record ready for an identifier.
    ///
    /// # Errors
    ///
    /// Returns `QuestionValidationError` if the question text is blank, no
    /// answer options exist, the correct or selected letter is not among the
    /// options, or the section tag is outside the closed set.
    pub fn validate(
        self,
        answered_at: DateTime<Utc>,
    ) -> Result<ValidatedRecord, QuestionValidationError> {
        if self.question.text.trim().is_empty() {
            return Err(QuestionValidationError::EmptyQuestionText);
        }
        if self.question.answers.is_empty() {
            return Err(QuestionValidationError::NoAnswerOptions);
        }
        if !self.question.answers.contains_key(&self.question.correct_answer) {
            return Err(QuestionValidationError::MissingCorrectAnswer(
                self.question.correct_answer,
            ));
        }
        if !self.question.answers.contains_key(&self.selected_answer) {
            return Err(QuestionValidationError::MissingSelectedAnswer(
                self.selected_answer,
            ));
        }
        if self.question.section.section().is_none() {
            return Err(QuestionValidationError::UnknownSection(
                self.question.section.as_str().to_string(),
            ));
        }

        let is_correct = self.selected_answer == self.question.correct_answer;

        Ok(ValidatedRecord {
            question: self.question,
            selected_answer: self.selected_answer,
            is_correct,
            note: self.note,
            answered_at,
        })
    }
}

/// A validated record awaiting its storage-assigned identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRecord {
    question: QuestionContent,
    selected_answer: AnswerLetter,
    is_correct: bool,
    note: String,
    answered_at: DateTime<Utc>,
}

impl ValidatedRecord {
    #[must_use]
    pub fn assign_id(self, id: QuestionId) -> QuestionRecord {
        QuestionRecord {
            id,
            question: self.question,
            selected_answer: self.selected_answer,
            is_correct: self.is_correct,
            note: self.note,
            answered_at: self.answered_at,
        }
    }
}

/// One previously answered practice question with the learner's response and
/// review note.
///
/// Immutable apart from the note, which changes only through
/// [`QuestionRecord::commit_note`] once a review-dialog save has persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    id: QuestionId,
    question: QuestionContent,
    selected_answer: AnswerLetter,
    is_correct: bool,
    note: String,
    answered_at: DateTime<Utc>,
}

impl QuestionRecord {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn question(&self) -> &QuestionContent {
        &self.question
    }

    #[must_use]
    pub fn section_tag(&self) -> &SectionTag {
        &self.question.section
    }

    #[must_use]
    pub fn selected_answer(&self) -> AnswerLetter {
        self.selected_answer
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    #[must_use]
    pub fn note(&self) -> &str {
        &self.note
    }

    #[must_use]
    pub fn answered_at(&self) -> DateTime<Utc> {
        self.answered_at
    }

    /// Replaces the record's note with a committed one.
    ///
    /// The whole field is swapped at once; identity and every other field
    /// are untouched.
    pub fn commit_note(&mut self, note: &Note) {
        self.note = note.as_str().to_string();
    }
}

//
// ─── RECORD VALIDATION ERRORS ──────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionValidationError {
    #[error("question text is empty")]
    EmptyQuestionText,

    #[error("question has no answer options")]
    NoAnswerOptions,

    #[error("correct answer '{0}' is not among the options")]
    MissingCorrectAnswer(AnswerLetter),

    #[error("selected answer '{0}' is not among the options")]
    MissingSelectedAnswer(AnswerLetter),

    #[error("unknown section tag: {0:?}")]
    UnknownSection(String),
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
