use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::domain::quiz_attempt::QuestionResult;
use crate::models::domain::quiz_question::{OptionKey, QuestionId, QuestionOptions};
use crate::models::domain::{GradedResult, Quiz, QuizId};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResultDto {
    pub question_id: i64,
    pub question_text: Option<String>,
    pub option_a: Option<String>,
    pub option_b: Option<String>,
    pub option_c: Option<String>,
    pub option_d: Option<String>,
    pub selected_answer: Option<String>,
    pub correct_answer: Option<String>,
    pub is_correct: Option<bool>,
    pub explanation: Option<String>,
    pub marks: Option<i32>,
}

impl From<QuestionResultDto> for QuestionResult {
    fn from(dto: QuestionResultDto) -> Self {
        let selected_answer = parse_key(dto.selected_answer.as_deref());
        let correct_answer = parse_key(dto.correct_answer.as_deref());
        let is_correct = dto.is_correct.unwrap_or_else(|| {
            selected_answer.is_some() && selected_answer == correct_answer
        });

        QuestionResult {
            question_id: QuestionId(dto.question_id),
            question_text: dto.question_text.unwrap_or_default(),
            options: QuestionOptions {
                a: dto.option_a,
                b: dto.option_b,
                c: dto.option_c,
                d: dto.option_d,
            },
            selected_answer,
            correct_answer,
            is_correct,
            marks: dto.marks.map_or(0, |m| m.max(0) as u32),
            explanation: dto.explanation,
        }
    }
}

fn parse_key(raw: Option<&str>) -> Option<OptionKey> {
    raw.and_then(|k| k.parse().ok())
}

/// Graded attempt as returned by the submit, history and result endpoints.
/// Every field is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttemptDto {
    pub id: Option<i64>,
    pub student_id: Option<i64>,
    pub student_name: Option<String>,
    pub quiz_id: Option<i64>,
    pub quiz_title: Option<String>,
    pub score: Option<i32>,
    pub total_marks: Option<i32>,
    pub correct_answers: Option<i32>,
    pub total_questions: Option<i32>,
    pub percentage: Option<f64>,
    pub started_at: Option<NaiveDateTime>,
    pub submitted_at: Option<NaiveDateTime>,
    pub is_completed: Option<bool>,
    pub question_results: Option<Vec<QuestionResultDto>>,
}

fn non_negative(value: Option<i32>) -> Option<u32> {
    value.map(|v| v.max(0) as u32)
}

impl QuizAttemptDto {
    /// Builds the domain result. Missing fields fall back to what `quiz` (the
    /// snapshot the answers were given against) and the per-question results say.
    pub fn into_graded_result(self, quiz: Option<&Quiz>) -> GradedResult {
        let question_results: Vec<QuestionResult> = self
            .question_results
            .unwrap_or_default()
            .into_iter()
            .map(QuestionResult::from)
            .collect();

        let score = non_negative(self.score).unwrap_or_else(|| {
            question_results
                .iter()
                .filter(|r| r.is_correct)
                .map(|r| r.marks)
                .sum()
        });
        let total_marks = non_negative(self.total_marks).unwrap_or_else(|| match quiz {
            Some(quiz) => quiz.total_marks(),
            None => question_results.iter().map(|r| r.marks).sum(),
        });
        let correct_answers = non_negative(self.correct_answers)
            .unwrap_or_else(|| question_results.iter().filter(|r| r.is_correct).count() as u32);
        let total_questions = non_negative(self.total_questions).unwrap_or_else(|| match quiz {
            Some(quiz) => quiz.question_count() as u32,
            None => question_results.len() as u32,
        });
        let percentage = self
            .percentage
            .filter(|p| p.is_finite())
            .unwrap_or_else(|| GradedResult::percentage_of(score, total_marks));

        GradedResult {
            attempt_id: self.id,
            quiz_id: self
                .quiz_id
                .map(QuizId)
                .or_else(|| quiz.map(|q| q.id))
                .unwrap_or(QuizId(0)),
            quiz_title: self
                .quiz_title
                .or_else(|| quiz.map(|q| q.title.clone()))
                .unwrap_or_default(),
            student_name: self.student_name,
            score,
            total_marks,
            correct_answers,
            total_questions,
            percentage,
            submitted_at: self.submitted_at,
            question_results,
        }
    }
}
