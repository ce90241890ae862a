//! Seeded sample mistake log used by the demo binary and integration tests.

use chrono::Duration;
use review_core::model::{
    AnswerLetter, QuestionContent, QuestionId, QuestionRecord, QuestionRecordDraft,
    QuestionValidationError, Section, SectionTag,
};
use review_core::time::fixed_now;
use std::collections::BTreeMap;

struct SampleQuestion {
    id: u64,
    text: &'static str,
    section: Section,
    answers: [&'static str; 4],
    correct: AnswerLetter,
    selected: AnswerLetter,
    note: &'static str,
}

const SAMPLE_QUESTIONS: [SampleQuestion; 8] = [
    SampleQuestion {
        id: 1,
        text: "If 3x + 5 = 14, what is the value of x?",
        section: Section::Math,
        answers: ["2", "3", "4", "5"],
        correct: AnswerLetter::B,
        selected: AnswerLetter::A,
        note: "Forgot to subtract 5 from both sides first",
    },
    SampleQuestion {
        id: 2,
        text: "Which of the following best describes the author's tone in the passage?",
        section: Section::Language,
        answers: ["Optimistic", "Critical", "Neutral", "Enthusiastic"],
        correct: AnswerLetter::B,
        selected: AnswerLetter::A,
        note: "Need to pay more attention to negative words in the passage",
    },
    SampleQuestion {
        id: 3,
        text: "The function f(x) = 2x\u{b2} - 4x + 1. What is f(3)?",
        section: Section::Math,
        answers: ["7", "11", "15", "19"],
        correct: AnswerLetter::A,
        selected: AnswerLetter::B,
        note: "Made calculation error: 2(9) - 4(3) + 1 = 18 - 12 + 1 = 7",
    },
    SampleQuestion {
        id: 4,
        text: "Based on the graph, what is the relationship between variables x and y?",
        section: Section::Language,
        answers: [
            "Directly proportional",
            "Inversely proportional",
            "No relationship",
            "Exponential growth",
        ],
        correct: AnswerLetter::A,
        selected: AnswerLetter::C,
        note: "Need to practice reading graphs more carefully",
    },
    SampleQuestion {
        id: 5,
        text: "Solve for y: 2y - 7 = 3y + 2",
        section: Section::Math,
        answers: ["-9", "-5", "5", "9"],
        correct: AnswerLetter::A,
        selected: AnswerLetter::D,
        note: "Wrong sign when moving terms: 2y - 3y = 2 + 7, so -y = 9, therefore y = -9",
    },
    SampleQuestion {
        id: 6,
        text: "The author uses the phrase 'a double-edged sword' to suggest that technology:",
        section: Section::Language,
        answers: [
            "Is always beneficial",
            "Has both positive and negative effects",
            "Is dangerous",
            "Should be avoided",
        ],
        correct: AnswerLetter::B,
        selected: AnswerLetter::C,
        note: "Double-edged sword means having both advantages and disadvantages",
    },
    SampleQuestion {
        id: 7,
        text: "If the area of a square is 64 square units, what is its perimeter?",
        section: Section::Math,
        answers: ["16", "24", "32", "64"],
        correct: AnswerLetter::C,
        selected: AnswerLetter::A,
        note: "Side length = \u{221a}64 = 8, so perimeter = 4 \u{d7} 8 = 32",
    },
    SampleQuestion {
        id: 8,
        text: "Which transition word best connects these two sentences in the passage?",
        section: Section::Language,
        answers: ["However", "Therefore", "Furthermore", "Meanwhile"],
        correct: AnswerLetter::A,
        selected: AnswerLetter::C,
        note: "The second sentence contrasts with the first, so 'However' is correct",
    },
];

/// Builds the seeded 8-record mistake log (4 math, 4 language).
///
/// # Errors
///
/// Returns `QuestionValidationError` if a sample entry fails validation.
pub fn sample_error_log() -> Result<Vec<QuestionRecord>, QuestionValidationError> {
    let base = fixed_now();
    SAMPLE_QUESTIONS
        .iter()
        .map(|sample| {
            let answers: BTreeMap<AnswerLetter, String> = AnswerLetter::ALL
                .iter()
                .copied()
                .zip(sample.answers.iter().map(ToString::to_string))
                .collect();
            let answered_at = base - Duration::minutes(SAMPLE_QUESTIONS.len() as i64 - sample.id as i64);
            let record = QuestionRecordDraft {
                question: QuestionContent {
                    text: sample.text.to_string(),
                    section: SectionTag::from(sample.section),
                    answers,
                    correct_answer: sample.correct,
                },
                selected_answer: sample.selected,
                note: sample.note.to_string(),
            }
            .validate(answered_at)?
            .assign_id(QuestionId::new(sample.id));
            Ok(record)
        })
        .collect()
}
