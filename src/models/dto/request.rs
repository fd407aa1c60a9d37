use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::domain::{AnswerSheet, OptionKey, QuestionId, QuizId};

/// Body of `POST /student/quiz/{quizId}/submit`. Unanswered questions are left
/// out of `answers` rather than sent as null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    pub quiz_id: QuizId,
    pub answers: BTreeMap<QuestionId, OptionKey>,
}

impl From<&AnswerSheet> for SubmitQuizRequest {
    fn from(sheet: &AnswerSheet) -> Self {
        SubmitQuizRequest {
            quiz_id: sheet.quiz.id,
            answers: sheet.answers.clone(),
        }
    }
}
