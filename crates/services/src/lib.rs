#![forbid(unsafe_code)]

pub mod error;
pub mod error_log;
pub mod localization;
pub mod navigation;
pub mod practice_launcher;
pub mod review_flow;
pub mod review_modal;
pub mod review_session;

pub use review_core::Clock;

pub use error::{ErrorLogError, ReviewFlowError, SessionError};
pub use error_log::{ErrorLogService, StatusEntry};
pub use localization::{LocalizationService, StaticCatalog, section_name_key};
pub use navigation::{NavigationService, NoopNavigator, PRACTICE_ROUTE};
pub use practice_launcher::{PracticeLaunch, PracticeType, PracticeTypeDialog};
pub use review_flow::ReviewFlowService;
pub use review_modal::{
    NoteSaveOutcome, NoteSaveRequest, ReviewModalController, SessionToken, StatusUpdateOutcome,
    StatusUpdateRequest,
};
pub use review_session::{NoteMode, ReviewSession, SaveState, StatusChange, StatusUpdateState};
