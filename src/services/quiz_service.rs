use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{GradedResult, QuizId, QuizSummary},
    repositories::{QuizAttemptRepository, QuizRepository},
};

/// Which quizzes the list screen shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuizFilter {
    #[default]
    All,
    Attempted,
    NotAttempted,
}

impl QuizFilter {
    pub fn accepts(&self, summary: &QuizSummary) -> bool {
        match self {
            QuizFilter::All => true,
            QuizFilter::Attempted => summary.has_attempted,
            QuizFilter::NotAttempted => !summary.has_attempted,
        }
    }
}

pub struct QuizService {
    catalog: Arc<dyn QuizRepository>,
    attempts: Arc<dyn QuizAttemptRepository>,
}

impl QuizService {
    pub fn new(catalog: Arc<dyn QuizRepository>, attempts: Arc<dyn QuizAttemptRepository>) -> Self {
        Self { catalog, attempts }
    }

    pub async fn list_available(&self, filter: QuizFilter, search: Option<&str>) -> AppResult<Vec<QuizSummary>> {
        let quizzes = self.catalog.list_available().await?;
        Ok(Self::narrow(quizzes, filter, search))
    }

    pub async fn list_by_course(&self, course_id: i64) -> AppResult<Vec<QuizSummary>> {
        self.catalog.list_by_course(course_id).await
    }

    /// Start screen details for one quiz.
    pub async fn get_summary(&self, id: &QuizId) -> AppResult<QuizSummary> {
        let quiz = self
            .catalog
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz {} does not exist or is not available", id)))?;

        Ok(QuizSummary {
            id: quiz.id,
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            course_id: quiz.course_id,
            course_name: quiz.course_name.clone(),
            duration_minutes: Some(quiz.duration_minutes),
            total_marks: quiz.total_marks(),
            question_count: quiz.question_count() as u32,
            has_attempted: false,
            best_score: None,
        })
    }

    /// Past attempts, newest first.
    pub async fn history(&self) -> AppResult<Vec<GradedResult>> {
        let mut attempts = self.attempts.list_attempts().await?;
        attempts.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(attempts)
    }

    pub async fn latest_result(&self, quiz_id: QuizId) -> AppResult<GradedResult> {
        self.attempts
            .latest_result(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No completed attempt for quiz {}", quiz_id)))
    }

    fn narrow(quizzes: Vec<QuizSummary>, filter: QuizFilter, search: Option<&str>) -> Vec<QuizSummary> {
        quizzes
            .into_iter()
            .filter(|q| filter.accepts(q))
            .filter(|q| search.map_or(true, |term| q.matches_search(term)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::{
        repositories::{MockQuizAttemptRepository, MockQuizRepository},
        test_utils::fixtures,
    };

    fn catalog_with_three() -> MockQuizRepository {
        let mut catalog = MockQuizRepository::new();
        catalog.expect_list_available().returning(|| {
            Ok(vec![
                fixtures::quiz_summary(1, "Ownership Basics", Some("Rust 101"), true),
                fixtures::quiz_summary(2, "Traits in Depth", Some("Rust 201"), false),
                fixtures::quiz_summary(3, "Python Warmup", Some("Scripting"), false),
            ])
        });
        catalog
    }

    #[tokio::test]
    async fn list_applies_filter_and_search() {
        let service = QuizService::new(Arc::new(catalog_with_three()), Arc::new(MockQuizAttemptRepository::new()));

        let attempted = service.list_available(QuizFilter::Attempted, None).await.unwrap();
        assert_eq!(attempted.len(), 1);
        assert_eq!(attempted[0].id, QuizId(1));

        let rust_pending = service
            .list_available(QuizFilter::NotAttempted, Some("rust"))
            .await
            .unwrap();
        assert_eq!(rust_pending.iter().map(|q| q.id).collect::<Vec<_>>(), vec![QuizId(2)]);

        let all = service.list_available(QuizFilter::All, Some("")).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn summary_is_derived_from_the_snapshot() {
        let mut catalog = MockQuizRepository::new();
        catalog
            .expect_find_by_id()
            .returning(|_| Ok(Some(fixtures::two_question_quiz())));
        let service = QuizService::new(Arc::new(catalog), Arc::new(MockQuizAttemptRepository::new()));

        let summary = service.get_summary(&QuizId(1)).await.unwrap();

        assert_eq!(summary.total_marks, 3);
        assert_eq!(summary.question_count, 2);
        assert_eq!(summary.duration_minutes, Some(60));
    }

    #[tokio::test]
    async fn missing_result_is_not_found() {
        let mut attempts = MockQuizAttemptRepository::new();
        attempts.expect_latest_result().returning(|_| Ok(None));
        let service = QuizService::new(Arc::new(MockQuizRepository::new()), Arc::new(attempts));

        let err = service.latest_result(QuizId(4)).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn history_is_newest_first() {
        let mut attempts = MockQuizAttemptRepository::new();
        attempts.expect_list_attempts().returning(|| {
            let day = |d| NaiveDate::from_ymd_opt(2026, 3, d).and_then(|date| date.and_hms_opt(9, 0, 0));
            let mut older = fixtures::graded_result_q1_correct();
            older.submitted_at = day(1);
            let mut newer = fixtures::graded_result_q1_correct();
            newer.attempt_id = Some(12);
            newer.submitted_at = day(2);
            Ok(vec![older, newer])
        });
        let service = QuizService::new(Arc::new(MockQuizRepository::new()), Arc::new(attempts));

        let history = service.history().await.unwrap();

        assert_eq!(history[0].attempt_id, Some(12));
    }
}
