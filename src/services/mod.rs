pub mod attempt_controller;
pub mod countdown;
pub mod navigation_guard;
pub mod notifier;
pub mod quiz_attempt_service;
pub mod quiz_service;

pub use attempt_controller::{AttemptPorts, AttemptStatus, QuizAttemptController, SubmitMode, SubmitOutcome};
pub use countdown::{Clock, ClockHandle, IntervalClock, ManualClock};
pub use navigation_guard::{NavigationGuard, NavigationLease};
pub use notifier::Notifier;
pub use quiz_attempt_service::QuizAttemptService;
pub use quiz_service::{QuizFilter, QuizService};
