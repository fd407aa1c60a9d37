use serde::Serialize;

use crate::models::domain::{
    quiz_question::QuestionOptions, AttemptSession, OptionKey, QuestionId, QuizId,
    SubmissionState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaletteStatus {
    Current,
    Answered,
    Unanswered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    pub number: usize,
    pub question_id: QuestionId,
    pub status: PaletteStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub number: usize,
    pub question_id: QuestionId,
    pub text: String,
    pub options: QuestionOptions,
    pub marks: u32,
    pub image_url: Option<String>,
    pub selected: Option<OptionKey>,
}

/// Everything a renderer needs to draw the attempt screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptView {
    pub quiz_id: QuizId,
    pub quiz_title: String,
    pub question: Option<QuestionView>,
    pub question_count: usize,
    pub answered_count: usize,
    pub remaining_seconds: u32,
    pub clock: String,
    pub low_time: bool,
    pub is_first: bool,
    pub is_last: bool,
    pub submission_state: SubmissionState,
    pub palette: Vec<PaletteEntry>,
}

impl AttemptView {
    pub fn from_session(session: &AttemptSession, low_time_warning_secs: u32) -> Self {
        let quiz = session.quiz();
        let question = session.current_question().map(|q| QuestionView {
            number: session.current_index() + 1,
            question_id: q.id,
            text: q.text.clone(),
            options: q.options.clone(),
            marks: q.marks,
            image_url: q.image_url.clone(),
            selected: session.answer_for(q.id),
        });

        let palette = quiz
            .questions
            .iter()
            .enumerate()
            .map(|(index, q)| PaletteEntry {
                number: index + 1,
                question_id: q.id,
                status: if index == session.current_index() {
                    PaletteStatus::Current
                } else if session.answer_for(q.id).is_some() {
                    PaletteStatus::Answered
                } else {
                    PaletteStatus::Unanswered
                },
            })
            .collect();

        AttemptView {
            quiz_id: quiz.id,
            quiz_title: quiz.title.clone(),
            question,
            question_count: quiz.question_count(),
            answered_count: session.answered_count(),
            remaining_seconds: session.remaining_seconds(),
            clock: format_clock(session.remaining_seconds()),
            low_time: session.remaining_seconds() < low_time_warning_secs,
            is_first: session.is_first_question(),
            is_last: session.is_last_question(),
            submission_state: session.submission_state(),
            palette,
        }
    }
}

/// `mm:ss`; minutes keep growing past 99 rather than rolling into hours.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
