use std::sync::Arc;

use crate::{
    app_state::AppState,
    errors::{AppError, AppResult},
    handlers::terminal::{self, CtrlCGuard, InputLines, TerminalNotifier},
    models::domain::{OptionKey, QuizId},
    services::{
        attempt_controller::{AttemptStatus, QuizAttemptController, SubmitMode, SubmitOutcome},
        countdown::IntervalClock,
        notifier::Notifier,
    },
};

const HELP: &str = "Commands: a|b|c|d select an option, n(ext), p(rev), g(oto) <number>, s(ubmit), q(uit), h(elp)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptCommand {
    Select(OptionKey),
    Next,
    Previous,
    /// Zero-based question index.
    GoTo(usize),
    Submit,
    Quit,
    Help,
    Show,
}

impl AttemptCommand {
    pub fn parse(line: &str) -> AppResult<Self> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(AttemptCommand::Show);
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "a" | "b" | "c" | "d" => AttemptCommand::Select(head.parse()?),
            "n" | "next" => AttemptCommand::Next,
            "p" | "prev" | "previous" => AttemptCommand::Previous,
            "g" | "goto" => {
                let number = words
                    .next()
                    .and_then(|n| n.parse::<usize>().ok())
                    .filter(|n| *n >= 1)
                    .ok_or_else(|| AppError::ValidationError("goto needs a question number".to_string()))?;
                AttemptCommand::GoTo(number - 1)
            }
            "s" | "submit" => AttemptCommand::Submit,
            "q" | "quit" => AttemptCommand::Quit,
            "h" | "help" | "?" => AttemptCommand::Help,
            "show" => AttemptCommand::Show,
            other => {
                return Err(AppError::ValidationError(format!("unknown command '{}'", other)));
            }
        };
        Ok(command)
    }
}

enum Flow {
    Continue,
    Done,
}

pub async fn take_quiz(state: &AppState, quiz_id: QuizId) -> AppResult<()> {
    let input = terminal::spawn_stdin_reader();
    let notifier: Arc<dyn Notifier> = Arc::new(TerminalNotifier::new(Arc::clone(&input)));

    state.context.require_student()?;
    let summary = state.quiz_service.get_summary(&quiz_id).await?;
    print!("{}", terminal::render_start_screen(&summary));
    if !notifier.confirm("Start Quiz", "Start the timer now?").await {
        return Ok(());
    }

    let guard = Arc::new(CtrlCGuard::default());
    let ctrl_c = terminal::watch_ctrl_c(Arc::clone(&guard));

    let clock = IntervalClock::new(state.config.tick_interval());
    let outcome = match state
        .attempt_service
        .start(quiz_id, Arc::clone(&notifier), guard, Box::new(clock))
        .await
    {
        Ok(controller) => {
            println!("{}", HELP);
            run_attempt(&controller, notifier.as_ref(), &input).await
        }
        Err(err) => Err(err),
    };

    ctrl_c.abort();
    outcome
}

async fn run_attempt(
    controller: &Arc<QuizAttemptController>,
    notifier: &dyn Notifier,
    input: &InputLines,
) -> AppResult<()> {
    let mut status = controller.subscribe();
    let mut remaining = controller.subscribe_clock();
    let mut warned = false;

    print!("{}", terminal::render_view(&controller.view()));

    loop {
        tokio::select! {
            line = terminal::next_line(input) => {
                let Some(line) = line else {
                    log::info!("Input closed; abandoning attempt");
                    controller.abandon();
                    return Ok(());
                };

                match AttemptCommand::parse(&line) {
                    Ok(command) => {
                        if let Flow::Done = handle_command(controller, notifier, command).await? {
                            return Ok(());
                        }
                    }
                    Err(err) => println!("{}. {}", err, HELP),
                }
            }
            changed = status.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let current = status.borrow_and_update().clone();
                match current {
                    AttemptStatus::Graded(result) => {
                        print!("{}", terminal::render_result(&result));
                        return Ok(());
                    }
                    AttemptStatus::Failed(err) if err.is_retryable() => {
                        println!("Type 'submit' to try again.");
                    }
                    AttemptStatus::Failed(err) => return Err(err),
                    AttemptStatus::Abandoned => return Ok(()),
                    AttemptStatus::Active | AttemptStatus::Submitting => {}
                }
            }
            changed = remaining.changed() => {
                if changed.is_ok() && !warned && controller.view().low_time {
                    warned = true;
                    println!("{}", terminal::low_time_warning(*remaining.borrow_and_update()));
                }
            }
        }
    }
}

async fn handle_command(
    controller: &Arc<QuizAttemptController>,
    notifier: &dyn Notifier,
    command: AttemptCommand,
) -> AppResult<Flow> {
    match command {
        AttemptCommand::Select(key) => {
            let Some(question) = controller.view().question else {
                println!("There is no question to answer.");
                return Ok(Flow::Continue);
            };
            if !controller.select_answer(question.question_id, key)? {
                println!("Answers can no longer be changed.");
            }
        }
        AttemptCommand::Next => {
            controller.next();
        }
        AttemptCommand::Previous => {
            controller.previous();
        }
        AttemptCommand::GoTo(index) => {
            if !controller.go_to(index) {
                println!("There is no question {}.", index + 1);
            }
        }
        AttemptCommand::Submit => match controller.submit(SubmitMode::Manual).await {
            Ok(SubmitOutcome::Graded(result)) => {
                print!("{}", terminal::render_result(&result));
                return Ok(Flow::Done);
            }
            Ok(SubmitOutcome::Declined) => {}
            Ok(SubmitOutcome::Rejected(state)) => {
                println!("The quiz is already being submitted ({:?}).", state);
                return Ok(Flow::Continue);
            }
            Ok(SubmitOutcome::Abandoned) => return Ok(Flow::Done),
            Err(err) if err.is_retryable() => return Ok(Flow::Continue),
            Err(err) => return Err(err),
        },
        AttemptCommand::Quit => {
            if notifier
                .confirm("Leave Quiz", "Your answers will be lost. Leave anyway?")
                .await
            {
                controller.abandon();
                return Ok(Flow::Done);
            }
        }
        AttemptCommand::Help => {
            println!("{}", HELP);
            return Ok(Flow::Continue);
        }
        AttemptCommand::Show => {}
    }

    print!("{}", terminal::render_view(&controller.view()));
    Ok(Flow::Continue)
}
