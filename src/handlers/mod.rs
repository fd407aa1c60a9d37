pub mod attempt_handler;
pub mod quiz_handler;
pub mod terminal;

pub use attempt_handler::take_quiz;
pub use quiz_handler::{list_attempts, list_course_quizzes, list_quizzes, show_result};
