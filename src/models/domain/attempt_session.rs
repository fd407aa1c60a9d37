use std::{collections::BTreeMap, sync::Arc};

use serde::Serialize;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{
        quiz::Quiz,
        quiz_attempt::GradedResult,
        quiz_question::{OptionKey, Question, QuestionId},
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SubmissionState {
    NotSubmitted,
    Submitting,
    Submitted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Seconds left after this tick.
    Running(u32),
    /// This tick took the countdown to zero; auto-submission is due.
    Expired,
    /// Nothing to count: a submission is in flight or the clock already ran out.
    Idle,
    /// The attempt is graded or abandoned; the clock should stop.
    Stopped,
}

/// Answers frozen at the moment a submission was accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerSheet {
    pub quiz: Arc<Quiz>,
    pub answers: BTreeMap<QuestionId, OptionKey>,
}

/// In-memory state of one attempt. Every mutation either completes or leaves the
/// session untouched.
#[derive(Clone, Debug)]
pub struct AttemptSession {
    quiz: Arc<Quiz>,
    answers: BTreeMap<QuestionId, OptionKey>,
    current_index: usize,
    remaining_seconds: u32,
    submission_state: SubmissionState,
    result: Option<GradedResult>,
    closed: bool,
}

impl AttemptSession {
    pub fn new(quiz: Arc<Quiz>) -> Self {
        let remaining_seconds = quiz.duration_seconds();
        Self {
            quiz,
            answers: BTreeMap::new(),
            current_index: 0,
            remaining_seconds,
            submission_state: SubmissionState::NotSubmitted,
            result: None,
            closed: false,
        }
    }

    pub fn quiz(&self) -> &Arc<Quiz> {
        &self.quiz
    }

    pub fn answers(&self) -> &BTreeMap<QuestionId, OptionKey> {
        &self.answers
    }

    pub fn answer_for(&self, question_id: QuestionId) -> Option<OptionKey> {
        self.answers.get(&question_id).copied()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.questions.get(self.current_index)
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.submission_state
    }

    pub fn result(&self) -> Option<&GradedResult> {
        self.result.as_ref()
    }

    /// True once the student left the attempt.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn unanswered_count(&self) -> usize {
        self.quiz.question_count().saturating_sub(self.answers.len())
    }

    pub fn is_first_question(&self) -> bool {
        self.current_index == 0
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 >= self.quiz.question_count()
    }

    /// Records a selection. Returns `Ok(false)` without touching anything once a
    /// submission has begun.
    pub fn select_answer(&mut self, question_id: QuestionId, key: OptionKey) -> AppResult<bool> {
        if self.closed || self.submission_state != SubmissionState::NotSubmitted {
            return Ok(false);
        }

        if !self.quiz.contains_question(question_id) {
            return Err(AppError::ValidationError(format!(
                "Question {} is not part of quiz {}",
                question_id, self.quiz.id
            )));
        }

        self.answers.insert(question_id, key);
        Ok(true)
    }

    /// Moves to `index` if it exists. Out of range requests are ignored.
    pub fn go_to(&mut self, index: usize) -> bool {
        if self.submission_state == SubmissionState::Submitted
            || index >= self.quiz.question_count()
        {
            return false;
        }

        self.current_index = index;
        true
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.current_index + 1)
    }

    pub fn previous(&mut self) -> bool {
        match self.current_index.checked_sub(1) {
            Some(index) => self.go_to(index),
            None => false,
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.closed {
            return TickOutcome::Stopped;
        }

        match self.submission_state {
            SubmissionState::Submitted => return TickOutcome::Stopped,
            SubmissionState::Submitting => return TickOutcome::Idle,
            SubmissionState::NotSubmitted => {}
        }

        if self.remaining_seconds == 0 {
            return TickOutcome::Idle;
        }

        self.remaining_seconds -= 1;
        if self.remaining_seconds == 0 {
            TickOutcome::Expired
        } else {
            TickOutcome::Running(self.remaining_seconds)
        }
    }

    /// The `NotSubmitted -> Submitting` transition. Only the first caller gets a sheet.
    pub fn begin_submission(&mut self) -> Option<AnswerSheet> {
        if self.closed || self.submission_state != SubmissionState::NotSubmitted {
            return None;
        }

        self.submission_state = SubmissionState::Submitting;
        Some(AnswerSheet {
            quiz: Arc::clone(&self.quiz),
            answers: self.answers.clone(),
        })
    }

    pub fn complete_submission(&mut self, result: GradedResult) {
        if self.submission_state == SubmissionState::Submitting {
            self.submission_state = SubmissionState::Submitted;
            self.result = Some(result);
        }
    }

    pub fn fail_submission(&mut self) {
        if self.submission_state == SubmissionState::Submitting {
            self.submission_state = SubmissionState::NotSubmitted;
        }
    }

    /// Discards the attempt. Answers are dropped and nothing can be submitted
    /// afterwards; a submission already in flight still records its result.
    pub fn close(&mut self) {
        self.closed = true;
        self.answers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;

    fn session() -> AttemptSession {
        AttemptSession::new(Arc::new(fixtures::two_question_quiz()))
    }

    #[test]
    fn new_session_starts_at_first_question_with_full_budget() {
        let session = session();

        assert_eq!(session.current_index(), 0);
        assert!(session.answers().is_empty());
        assert_eq!(session.remaining_seconds(), 3600);
        assert_eq!(session.submission_state(), SubmissionState::NotSubmitted);
        assert!(session.result().is_none());
    }

    #[test]
    fn selecting_the_same_answer_twice_is_idempotent() {
        let mut once = session();
        let mut twice = session();

        once.select_answer(QuestionId(1), OptionKey::B).unwrap();
        twice.select_answer(QuestionId(1), OptionKey::B).unwrap();
        twice.select_answer(QuestionId(1), OptionKey::B).unwrap();

        assert_eq!(twice.answer_for(QuestionId(1)), Some(OptionKey::B));
        assert_eq!(once.answers(), twice.answers());
        assert_eq!(once.current_index(), twice.current_index());
    }

    #[test]
    fn reselecting_overwrites_previous_answer() {
        let mut session = session();

        session.select_answer(QuestionId(1), OptionKey::A).unwrap();
        session.select_answer(QuestionId(1), OptionKey::D).unwrap();

        assert_eq!(session.answer_for(QuestionId(1)), Some(OptionKey::D));
        assert_eq!(session.answered_count(), 1);
        assert_eq!(session.unanswered_count(), 1);
    }

    #[test]
    fn selecting_for_unknown_question_is_rejected() {
        let mut session = session();

        let result = session.select_answer(QuestionId(99), OptionKey::A);

        assert!(matches!(result, Err(AppError::ValidationError(_))));
        assert!(session.answers().is_empty());
    }

    #[test]
    fn navigation_stops_at_both_ends() {
        let mut session = session();

        assert!(!session.previous());
        assert_eq!(session.current_index(), 0);

        assert!(session.next());
        assert_eq!(session.current_index(), 1);
        assert!(session.is_last_question());

        assert!(!session.next());
        assert_eq!(session.current_index(), 1);

        assert!(!session.go_to(2));
        assert!(session.go_to(0));
        assert!(session.is_first_question());
    }

    #[test]
    fn navigation_does_not_touch_answers() {
        let mut session = session();
        session.select_answer(QuestionId(1), OptionKey::C).unwrap();

        session.next();
        session.previous();

        assert_eq!(session.answer_for(QuestionId(1)), Some(OptionKey::C));
        assert_eq!(session.answered_count(), 1);
    }

    #[test]
    fn empty_quiz_navigation_is_a_no_op() {
        let mut session = AttemptSession::new(Arc::new(fixtures::empty_quiz()));

        assert!(session.current_question().is_none());
        assert!(!session.next());
        assert!(!session.previous());
        assert!(!session.go_to(0));
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.unanswered_count(), 0);
    }

    #[test]
    fn countdown_is_monotonic_and_floored_at_zero() {
        let mut session = AttemptSession::new(Arc::new(fixtures::quiz_with_duration(1)));
        let mut previous = session.remaining_seconds();
        let mut expirations = 0;

        for _ in 0..100 {
            if session.tick() == TickOutcome::Expired {
                expirations += 1;
            }
            assert!(session.remaining_seconds() <= previous);
            previous = session.remaining_seconds();
        }

        assert_eq!(session.remaining_seconds(), 0);
        assert_eq!(expirations, 1);
        assert_eq!(session.tick(), TickOutcome::Idle);
    }

    #[test]
    fn tick_reports_expiry_exactly_on_reaching_zero() {
        let mut session = AttemptSession::new(Arc::new(fixtures::quiz_with_duration(1)));

        for expected in (1..60).rev() {
            assert_eq!(session.tick(), TickOutcome::Running(expected));
        }
        assert_eq!(session.tick(), TickOutcome::Expired);
        assert_eq!(session.tick(), TickOutcome::Idle);
    }

    #[test]
    fn only_first_submission_is_accepted() {
        let mut session = session();
        session.select_answer(QuestionId(1), OptionKey::A).unwrap();

        let sheet = session.begin_submission().expect("first caller wins");
        assert_eq!(sheet.answers.len(), 1);
        assert_eq!(sheet.answers.get(&QuestionId(1)), Some(&OptionKey::A));
        assert_eq!(session.submission_state(), SubmissionState::Submitting);

        assert!(session.begin_submission().is_none());
    }

    #[test]
    fn session_is_frozen_while_submitting_and_after_submit() {
        let mut session = session();
        session.begin_submission();

        assert!(!session.select_answer(QuestionId(1), OptionKey::B).unwrap());
        assert_eq!(session.tick(), TickOutcome::Idle);
        assert_eq!(session.remaining_seconds(), 3600);

        session.complete_submission(fixtures::graded_result_q1_correct());
        let snapshot = (session.current_index(), session.answers().clone());

        assert!(!session.select_answer(QuestionId(1), OptionKey::B).unwrap());
        assert!(!session.next());
        assert!(!session.go_to(1));
        assert!(session.begin_submission().is_none());
        assert_eq!(session.tick(), TickOutcome::Stopped);
        assert_eq!((session.current_index(), session.answers().clone()), snapshot);
        assert_eq!(session.submission_state(), SubmissionState::Submitted);
    }

    #[test]
    fn failed_submission_allows_retry_even_after_expiry() {
        let mut session = AttemptSession::new(Arc::new(fixtures::quiz_with_duration(1)));
        while session.tick() != TickOutcome::Expired {}

        session.begin_submission().expect("auto submit accepted");
        session.fail_submission();

        assert_eq!(session.submission_state(), SubmissionState::NotSubmitted);
        assert!(session.begin_submission().is_some());
    }

    #[test]
    fn closed_session_accepts_nothing() {
        let mut session = session();
        session.select_answer(QuestionId(1), OptionKey::A).unwrap();

        session.close();

        assert!(session.is_closed());
        assert!(session.answers().is_empty());
        assert!(!session.select_answer(QuestionId(2), OptionKey::B).unwrap());
        assert!(session.begin_submission().is_none());
        assert_eq!(session.tick(), TickOutcome::Stopped);
        assert_eq!(session.submission_state(), SubmissionState::NotSubmitted);
    }
}
