use async_trait::async_trait;

use crate::{
    api::{ApiClient, RequestKind},
    errors::AppResult,
    models::{
        domain::{AnswerSheet, GradedResult, QuizId},
        dto::{quiz_attempt_dto::QuizAttemptDto, request::SubmitQuizRequest},
    },
};

/// Grading side of the backend: submissions and past attempts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizAttemptRepository: Send + Sync {
    /// Sends the sheet for grading. Every error is surfaced; nothing is retried here.
    async fn submit(&self, sheet: AnswerSheet) -> AppResult<GradedResult>;
    async fn list_attempts(&self) -> AppResult<Vec<GradedResult>>;
    /// Latest completed attempt for `quiz_id`, `Ok(None)` when there is none.
    async fn latest_result(&self, quiz_id: QuizId) -> AppResult<Option<GradedResult>>;
}

pub struct HttpQuizAttemptRepository {
    client: ApiClient,
}

impl HttpQuizAttemptRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QuizAttemptRepository for HttpQuizAttemptRepository {
    async fn submit(&self, sheet: AnswerSheet) -> AppResult<GradedResult> {
        let request = SubmitQuizRequest::from(&sheet);
        log::info!(
            "Submitting quiz {} with {}/{} answers",
            sheet.quiz.id,
            request.answers.len(),
            sheet.quiz.question_count()
        );

        let dto: QuizAttemptDto = self
            .client
            .post_json(&format!("/student/quiz/{}/submit", sheet.quiz.id), &request)
            .await
            .map_err(|e| e.into_app_error(RequestKind::Submit, &format!("submitting quiz {}", sheet.quiz.id)))?;

        Ok(dto.into_graded_result(Some(&sheet.quiz)))
    }

    async fn list_attempts(&self) -> AppResult<Vec<GradedResult>> {
        let dtos: Vec<QuizAttemptDto> = self
            .client
            .get_json("/student/quiz/attempts")
            .await
            .map_err(|e| e.into_app_error(RequestKind::Load, "quiz attempts"))?;

        Ok(dtos.into_iter().map(|dto| dto.into_graded_result(None)).collect())
    }

    async fn latest_result(&self, quiz_id: QuizId) -> AppResult<Option<GradedResult>> {
        match self
            .client
            .get_json::<QuizAttemptDto>(&format!("/student/quiz/quiz/{}/result", quiz_id))
            .await
        {
            Ok(dto) => Ok(Some(dto.into_graded_result(None))),
            Err(failure)
                if failure.is_not_found()
                    || failure
                        .message()
                        .is_some_and(|m| m.to_lowercase().contains("no completed attempt")) =>
            {
                Ok(None)
            }
            Err(failure) => Err(failure.into_app_error(RequestKind::Load, &format!("result for quiz {}", quiz_id))),
        }
    }
}
