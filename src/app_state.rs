use std::sync::Arc;

use crate::{
    api::ApiClient,
    config::Config,
    errors::AppResult,
    models::domain::SessionContext,
    repositories::{HttpQuizAttemptRepository, HttpQuizRepository},
    services::{quiz_attempt_service::QuizAttemptService, quiz_service::QuizService},
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub attempt_service: Arc<QuizAttemptService>,
    pub context: SessionContext,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let context = SessionContext::from_config(&config);
        let client = ApiClient::new(&config, context.clone())?;

        let quiz_repository = Arc::new(HttpQuizRepository::new(client.clone()));
        let attempt_repository = Arc::new(HttpQuizAttemptRepository::new(client));

        let quiz_service = Arc::new(QuizService::new(quiz_repository.clone(), attempt_repository.clone()));
        let attempt_service = Arc::new(QuizAttemptService::new(
            quiz_repository,
            attempt_repository,
            context.clone(),
            config.low_time_warning_secs,
        ));

        Ok(Self {
            quiz_service,
            attempt_service,
            context,
            config: Arc::new(config),
        })
    }
}
