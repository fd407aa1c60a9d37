pub mod attempt_session;
pub mod quiz;
pub mod quiz_attempt;
pub mod quiz_question;
pub mod session_context;
pub use attempt_session::{AnswerSheet, AttemptSession, SubmissionState, TickOutcome};
pub use quiz::{Quiz, QuizId, QuizSummary};
pub use quiz_attempt::{GradedResult, QuestionResult};
pub use quiz_question::{OptionKey, Question, QuestionId};
pub use session_context::{SessionContext, UserRole};
