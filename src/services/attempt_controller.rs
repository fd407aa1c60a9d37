use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::{sync::watch, task::JoinHandle};

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{
            AttemptSession, GradedResult, OptionKey, QuestionId, Quiz, QuizId, SubmissionState,
            TickOutcome,
        },
        dto::response::AttemptView,
    },
    repositories::{QuizAttemptRepository, QuizRepository},
    services::{
        countdown::{self, Clock},
        navigation_guard::{NavigationGuard, NavigationLease},
        notifier::{self, Notifier},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    /// Student pressed submit; needs confirmation first.
    Manual,
    /// Countdown reached zero.
    Auto,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Graded(GradedResult),
    /// The student answered no to the confirmation prompt.
    Declined,
    /// Another submission already holds or finished the attempt. No request was sent.
    Rejected(SubmissionState),
    /// The student left the attempt. No request was sent.
    Abandoned,
}

/// Broadcast to everyone watching the attempt.
#[derive(Debug, Clone)]
pub enum AttemptStatus {
    Active,
    Submitting,
    Graded(Arc<GradedResult>),
    Failed(AppError),
    Abandoned,
}

impl AttemptStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AttemptStatus::Graded(_) | AttemptStatus::Abandoned)
    }
}

/// Collaborators an attempt needs besides the quiz catalog.
pub struct AttemptPorts {
    pub submissions: Arc<dyn QuizAttemptRepository>,
    pub notifier: Arc<dyn Notifier>,
    pub guard: Arc<dyn NavigationGuard>,
    pub clock: Box<dyn Clock>,
}

/// One student's attempt at one quiz, shared between the UI and the countdown task.
///
/// The session lock is never held across an `.await`; the only transition that
/// races is `NotSubmitted -> Submitting`, and it happens under that lock.
pub struct QuizAttemptController {
    me: Weak<QuizAttemptController>,
    session: Mutex<AttemptSession>,
    submissions: Arc<dyn QuizAttemptRepository>,
    notifier: Arc<dyn Notifier>,
    status: watch::Sender<AttemptStatus>,
    remaining: watch::Sender<u32>,
    lease: Mutex<Option<NavigationLease>>,
    countdown: Mutex<Option<JoinHandle<()>>>,
    low_time_warning_secs: u32,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl QuizAttemptController {
    /// Loads `quiz_id` and begins the attempt: guard armed, countdown running.
    pub async fn start(
        catalog: &dyn QuizRepository,
        quiz_id: QuizId,
        ports: AttemptPorts,
        low_time_warning_secs: u32,
    ) -> AppResult<Arc<Self>> {
        let quiz = match catalog.find_by_id(&quiz_id).await {
            Ok(Some(quiz)) => quiz,
            Ok(None) => {
                return Err(AppError::NotFound(format!(
                    "Quiz {} does not exist or is not available",
                    quiz_id
                )))
            }
            Err(AppError::ValidationError(msg)) => {
                log::warn!("Quiz {} failed validation: {}", quiz_id, msg);
                return Err(AppError::LoadError(format!("quiz {} is malformed: {}", quiz_id, msg)));
            }
            Err(err) => return Err(err),
        };

        Ok(Self::from_quiz(quiz, ports, low_time_warning_secs))
    }

    /// Begins an attempt on an already loaded quiz. Must run inside a tokio runtime.
    pub fn from_quiz(quiz: Quiz, ports: AttemptPorts, low_time_warning_secs: u32) -> Arc<Self> {
        let AttemptPorts {
            submissions,
            notifier,
            guard,
            clock,
        } = ports;

        let session = AttemptSession::new(Arc::new(quiz));
        log::info!(
            "Starting attempt on quiz {} '{}': {} question(s), {}s",
            session.quiz().id,
            session.quiz().title,
            session.quiz().question_count(),
            session.remaining_seconds()
        );

        let (status, status_rx) = watch::channel(AttemptStatus::Active);
        let (remaining, _) = watch::channel(session.remaining_seconds());

        let controller = Arc::new_cyclic(|me| Self {
            me: Weak::clone(me),
            session: Mutex::new(session),
            submissions,
            notifier,
            status,
            remaining,
            lease: Mutex::new(Some(NavigationLease::acquire(guard))),
            countdown: Mutex::new(None),
            low_time_warning_secs,
        });

        let handle = countdown::spawn(Arc::downgrade(&controller), clock, status_rx);
        *lock(&controller.countdown) = Some(handle);

        controller
    }

    fn session(&self) -> MutexGuard<'_, AttemptSession> {
        lock(&self.session)
    }

    pub fn quiz(&self) -> Arc<Quiz> {
        Arc::clone(self.session().quiz())
    }

    pub fn view(&self) -> AttemptView {
        AttemptView::from_session(&self.session(), self.low_time_warning_secs)
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.session().submission_state()
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.session().remaining_seconds()
    }

    pub fn result(&self) -> Option<GradedResult> {
        self.session().result().cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<AttemptStatus> {
        self.status.subscribe()
    }

    pub fn subscribe_clock(&self) -> watch::Receiver<u32> {
        self.remaining.subscribe()
    }

    /// Returns `Ok(false)` when the attempt no longer accepts answers.
    pub fn select_answer(&self, question_id: QuestionId, key: OptionKey) -> AppResult<bool> {
        let changed = self.session().select_answer(question_id, key)?;
        if !changed {
            log::debug!("Ignoring answer for question {}: attempt is closed", question_id);
        }
        Ok(changed)
    }

    pub fn go_to(&self, index: usize) -> bool {
        self.session().go_to(index)
    }

    pub fn next(&self) -> bool {
        self.session().next()
    }

    pub fn previous(&self) -> bool {
        self.session().previous()
    }

    /// Counts one second down. `Expired` is returned exactly once per attempt, and
    /// that tick starts the automatic submission on the runtime.
    pub fn tick(&self) -> TickOutcome {
        let outcome = {
            let mut session = self.session();
            let outcome = session.tick();
            match outcome {
                TickOutcome::Running(left) => {
                    self.remaining.send_replace(left);
                }
                TickOutcome::Expired => {
                    self.remaining.send_replace(0);
                    log::info!("Time is up for quiz {}", session.quiz().id);
                }
                TickOutcome::Idle | TickOutcome::Stopped => {}
            }
            outcome
        };

        if outcome == TickOutcome::Expired {
            match self.me.upgrade() {
                Some(controller) => {
                    tokio::spawn(async move { controller.auto_submit().await });
                }
                None => log::debug!("Attempt dropped before it could be auto-submitted"),
            }
        }
        outcome
    }

    pub async fn submit(&self, mode: SubmitMode) -> AppResult<SubmitOutcome> {
        if mode == SubmitMode::Manual {
            let (state, unanswered, closed) = {
                let session = self.session();
                (session.submission_state(), session.unanswered_count(), session.is_closed())
            };
            if closed {
                log::debug!("Manual submission rejected: attempt was abandoned");
                return Ok(SubmitOutcome::Abandoned);
            }
            if state != SubmissionState::NotSubmitted {
                log::debug!("Manual submission rejected: attempt is {:?}", state);
                return Ok(SubmitOutcome::Rejected(state));
            }

            let message = notifier::confirmation_message(unanswered);
            if !self.notifier.confirm(notifier::SUBMIT_TITLE, &message).await {
                log::debug!("Submission declined");
                return Ok(SubmitOutcome::Declined);
            }
        }

        let sheet = {
            let mut session = self.session();
            match session.begin_submission() {
                Some(sheet) => {
                    self.status.send_replace(AttemptStatus::Submitting);
                    sheet
                }
                None if session.is_closed() => {
                    log::debug!("{:?} submission rejected: attempt was abandoned", mode);
                    return Ok(SubmitOutcome::Abandoned);
                }
                None => {
                    let state = session.submission_state();
                    log::debug!("{:?} submission rejected: attempt is {:?}", mode, state);
                    return Ok(SubmitOutcome::Rejected(state));
                }
            }
        };

        let quiz_id = sheet.quiz.id;
        log::info!(
            "{:?} submission of quiz {} accepted with {} answer(s)",
            mode,
            quiz_id,
            sheet.answers.len()
        );

        match self.submissions.submit(sheet).await {
            Ok(result) => {
                {
                    let mut session = self.session();
                    session.complete_submission(result.clone());
                    if !session.is_closed() {
                        self.status
                            .send_replace(AttemptStatus::Graded(Arc::new(result.clone())));
                    }
                }
                self.release();
                log::info!(
                    "Quiz {} graded: {}/{} ({}%)",
                    quiz_id,
                    result.score,
                    result.total_marks,
                    result.percentage_display()
                );
                Ok(SubmitOutcome::Graded(result))
            }
            Err(err) => {
                let err = match err {
                    AppError::SubmitError(_) | AppError::Unauthorized(_) | AppError::Suspended(_) => err,
                    other => AppError::SubmitError(other.to_string()),
                };
                {
                    let mut session = self.session();
                    session.fail_submission();
                    if !session.is_closed() {
                        self.status.send_replace(AttemptStatus::Failed(err.clone()));
                    }
                }
                log::error!("Submission of quiz {} failed: {}", quiz_id, err);
                self.notifier
                    .error(notifier::SUBMIT_FAILED_TITLE, err.user_message())
                    .await;
                Err(err)
            }
        }
    }

    pub(crate) async fn auto_submit(&self) {
        match self.submit(SubmitMode::Auto).await {
            Ok(SubmitOutcome::Graded(result)) => {
                let message = format!(
                    "Your quiz was submitted automatically. Score: {}/{}",
                    result.score, result.total_marks
                );
                self.notifier.success(notifier::TIME_UP_TITLE, &message).await;
            }
            Ok(outcome) => log::debug!("Auto submission skipped: {:?}", outcome),
            // Already reported to the student by `submit`.
            Err(err) => log::warn!("Auto submission failed, manual retry required: {}", err),
        }
    }

    /// Resolves once the attempt is graded, with the shared result or the shared error.
    pub async fn wait_for_result(&self) -> AppResult<GradedResult> {
        let mut status = self.status.subscribe();
        loop {
            match &*status.borrow_and_update() {
                AttemptStatus::Graded(result) => return Ok(GradedResult::clone(result)),
                AttemptStatus::Failed(err) => return Err(err.clone()),
                AttemptStatus::Abandoned => {
                    return Err(AppError::InternalError("attempt was abandoned".to_string()))
                }
                AttemptStatus::Active | AttemptStatus::Submitting => {}
            }

            if status.changed().await.is_err() {
                return Err(AppError::InternalError("attempt was closed".to_string()));
            }
        }
    }

    /// Leaves the attempt without submitting. Answers are discarded.
    pub fn abandon(&self) {
        {
            let mut session = self.session();
            if session.submission_state() != SubmissionState::Submitted {
                session.close();
                log::info!("Attempt on quiz {} abandoned", session.quiz().id);
                self.status.send_replace(AttemptStatus::Abandoned);
            }
        }
        if let Some(handle) = lock(&self.countdown).take() {
            handle.abort();
        }
        self.release();
    }

    /// Drops the guard lease and detaches the countdown, which stops on its own
    /// once it sees a terminal status.
    fn release(&self) {
        lock(&self.lease).take();
        lock(&self.countdown).take();
    }
}

impl Drop for QuizAttemptController {
    fn drop(&mut self) {
        let countdown = self
            .countdown
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = countdown.take() {
            handle.abort();
        }
        let lease = self.lease.get_mut().unwrap_or_else(PoisonError::into_inner);
        if lease.take().is_some() {
            log::debug!("Attempt dropped while still active; navigation guard released");
        }
    }
}
