#![forbid(unsafe_code)]

pub mod repository;
pub mod sample;

pub use repository::{
    InMemoryRepository, NoteRepository, QuestionLogRepository, StatusRepository, Storage,
    StorageError,
};
