use std::sync::Arc;

use crate::{
    errors::AppResult,
    models::domain::{QuizId, SessionContext},
    repositories::{QuizAttemptRepository, QuizRepository},
    services::{
        attempt_controller::{AttemptPorts, QuizAttemptController},
        countdown::Clock,
        navigation_guard::NavigationGuard,
        notifier::Notifier,
    },
};

/// Starts attempts on behalf of the signed-in student.
pub struct QuizAttemptService {
    catalog: Arc<dyn QuizRepository>,
    submissions: Arc<dyn QuizAttemptRepository>,
    context: SessionContext,
    low_time_warning_secs: u32,
}

impl QuizAttemptService {
    pub fn new(
        catalog: Arc<dyn QuizRepository>,
        submissions: Arc<dyn QuizAttemptRepository>,
        context: SessionContext,
        low_time_warning_secs: u32,
    ) -> Self {
        Self {
            catalog,
            submissions,
            context,
            low_time_warning_secs,
        }
    }

    /// Only students may take quizzes; the check happens before anything is fetched.
    pub async fn start(
        &self,
        quiz_id: QuizId,
        notifier: Arc<dyn Notifier>,
        guard: Arc<dyn NavigationGuard>,
        clock: Box<dyn Clock>,
    ) -> AppResult<Arc<QuizAttemptController>> {
        self.context.require_student()?;
        log::info!("'{}' is starting quiz {}", self.context.username, quiz_id);

        let ports = AttemptPorts {
            submissions: Arc::clone(&self.submissions),
            notifier,
            guard,
            clock,
        };

        QuizAttemptController::start(self.catalog.as_ref(), quiz_id, ports, self.low_time_warning_secs)
            .await
    }
}
