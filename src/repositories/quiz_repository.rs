use async_trait::async_trait;

use crate::{
    api::{ApiClient, RequestKind},
    errors::AppResult,
    models::{
        domain::{Quiz, QuizId, QuizSummary},
        dto::quiz_dto::QuizDto,
    },
};

/// Read side of the quiz catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// `Ok(None)` when the quiz does not exist or is not published for this student.
    async fn find_by_id(&self, id: &QuizId) -> AppResult<Option<Quiz>>;
    async fn list_available(&self) -> AppResult<Vec<QuizSummary>>;
    async fn list_by_course(&self, course_id: i64) -> AppResult<Vec<QuizSummary>>;
}

pub struct HttpQuizRepository {
    client: ApiClient,
}

impl HttpQuizRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    async fn list(&self, path: &str, what: &str) -> AppResult<Vec<QuizSummary>> {
        let dtos: Vec<QuizDto> = self
            .client
            .get_json(path)
            .await
            .map_err(|e| e.into_app_error(RequestKind::Load, what))?;

        log::debug!("Fetched {} {}", dtos.len(), what);
        Ok(dtos.into_iter().map(QuizSummary::from).collect())
    }
}

#[async_trait]
impl QuizRepository for HttpQuizRepository {
    async fn find_by_id(&self, id: &QuizId) -> AppResult<Option<Quiz>> {
        let what = format!("quiz {}", id);
        let dto = match self.client.get_json::<QuizDto>(&format!("/student/quiz/{}", id)).await {
            Ok(dto) => dto,
            Err(failure) if failure.is_not_found() => {
                log::info!("Quiz {} is not available", id);
                return Ok(None);
            }
            Err(failure) => return Err(failure.into_app_error(RequestKind::Load, &what)),
        };

        Quiz::try_from(dto).map(Some)
    }

    async fn list_available(&self) -> AppResult<Vec<QuizSummary>> {
        self.list("/student/quiz", "available quizzes").await
    }

    async fn list_by_course(&self, course_id: i64) -> AppResult<Vec<QuizSummary>> {
        self.list(
            &format!("/student/quiz/course/{}", course_id),
            &format!("quizzes for course {}", course_id),
        )
        .await
    }
}
