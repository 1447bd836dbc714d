pub mod kiosk_state;
pub mod quiz_session;

pub use kiosk_state::KioskState;
pub use quiz_session::{Feedback, QuestionRecord, QuizSession, QuizSummary, SessionError};
