use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::domain::{
    quiz::QuizId,
    quiz_question::{OptionKey, QuestionId, QuestionOptions},
};

/// Percentage at or above which an attempt counts as passed.
pub const PASS_PERCENTAGE: f64 = 50.0;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuestionResult {
    pub question_id: QuestionId,
    pub question_text: String,
    pub options: QuestionOptions,
    pub selected_answer: Option<OptionKey>,
    pub correct_answer: Option<OptionKey>,
    pub is_correct: bool,
    pub marks: u32,
    pub explanation: Option<String>,
}

/// Outcome of backend grading for one submitted attempt.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GradedResult {
    pub attempt_id: Option<i64>,
    pub quiz_id: QuizId,
    pub quiz_title: String,
    pub student_name: Option<String>,
    pub score: u32,
    pub total_marks: u32,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub percentage: f64,
    pub submitted_at: Option<NaiveDateTime>,
    pub question_results: Vec<QuestionResult>,
}

impl GradedResult {
    /// Zero when there is nothing to score against.
    pub fn percentage_of(score: u32, total_marks: u32) -> f64 {
        if total_marks == 0 {
            0.0
        } else {
            f64::from(score) * 100.0 / f64::from(total_marks)
        }
    }

    pub fn grade(&self) -> Grade {
        Grade::from_percentage(self.percentage)
    }

    pub fn passed(&self) -> bool {
        self.percentage >= PASS_PERCENTAGE
    }

    /// One decimal place, e.g. `33.3`.
    pub fn percentage_display(&self) -> String {
        format!("{:.1}", self.percentage)
    }

    pub fn unanswered_count(&self) -> usize {
        self.question_results
            .iter()
            .filter(|r| r.selected_answer.is_none())
            .count()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum Grade {
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            Grade::APlus
        } else if percentage >= 80.0 {
            Grade::A
        } else if percentage >= 70.0 {
            Grade::B
        } else if percentage >= 60.0 {
            Grade::C
        } else if percentage >= PASS_PERCENTAGE {
            Grade::D
        } else {
            Grade::F
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Grade::APlus => "Excellent!",
            Grade::A => "Great job!",
            Grade::B => "Good work!",
            Grade::C => "Not bad!",
            Grade::D => "You passed!",
            Grade::F => "Keep practicing!",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
