use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    errors::AppError,
    models::domain::quiz_question::{Question, QuestionId},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct QuizId(pub i64);

impl fmt::Display for QuizId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QuizId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(QuizId)
            .map_err(|_| AppError::ValidationError(format!("'{}' is not a quiz id", s)))
    }
}

/// Snapshot of a quiz as served for an attempt. Correct answers are withheld.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: QuizId,
    pub title: String,
    pub description: Option<String>,
    pub course_id: Option<i64>,
    pub course_name: Option<String>,
    pub duration_minutes: u32,
    pub questions: Vec<Question>,
}

impl Quiz {
    /// Countdown budget for one attempt.
    pub fn duration_seconds(&self) -> u32 {
        self.duration_minutes.saturating_mul(60)
    }

    pub fn total_marks(&self) -> u32 {
        self.questions.iter().map(|q| q.marks).sum()
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn contains_question(&self, id: QuestionId) -> bool {
        self.question(id).is_some()
    }
}

/// Catalog entry shown on the quiz list and start screens.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizSummary {
    pub id: QuizId,
    pub title: String,
    pub description: Option<String>,
    pub course_id: Option<i64>,
    pub course_name: Option<String>,
    pub duration_minutes: Option<u32>,
    pub total_marks: u32,
    pub question_count: u32,
    pub has_attempted: bool,
    pub best_score: Option<u32>,
}

impl QuizSummary {
    /// Case-insensitive match on title or course name.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }

        self.title.to_lowercase().contains(&term)
            || self
                .course_name
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(&term))
    }
}
