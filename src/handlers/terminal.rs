use std::{
    fmt::Write as _,
    io::Write as _,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::{mpsc, Mutex},
    task::JoinHandle,
};

use crate::{
    models::{
        domain::{GradedResult, QuizSummary},
        dto::response::{format_clock, AttemptView, PaletteStatus},
    },
    services::{navigation_guard::NavigationGuard, notifier::Notifier},
};

/// Lines typed by the student, shared by the command loop and confirmation prompts.
pub type InputLines = Arc<Mutex<mpsc::Receiver<String>>>;

pub fn spawn_stdin_reader() -> InputLines {
    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).await.is_err() {
                break;
            }
        }
        log::debug!("stdin closed");
    });
    Arc::new(Mutex::new(rx))
}

/// `None` once stdin is closed.
pub async fn next_line(input: &InputLines) -> Option<String> {
    input.lock().await.recv().await
}

pub struct TerminalNotifier {
    input: InputLines,
}

impl TerminalNotifier {
    pub fn new(input: InputLines) -> Self {
        Self { input }
    }
}

#[async_trait]
impl Notifier for TerminalNotifier {
    async fn confirm(&self, title: &str, message: &str) -> bool {
        print!("{}: {} [y/N] ", title, message);
        let _ = std::io::stdout().flush();

        match next_line(&self.input).await {
            Some(answer) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            None => false,
        }
    }

    async fn success(&self, title: &str, message: &str) {
        println!("\n[{}] {}", title, message);
    }

    async fn error(&self, title: &str, message: &str) {
        println!("\n[{}] {}", title, message);
    }
}

/// Holds Ctrl-C back while an attempt is running.
#[derive(Default)]
pub struct CtrlCGuard {
    armed: AtomicBool,
}

impl CtrlCGuard {
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }
}

impl NavigationGuard for CtrlCGuard {
    fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    fn disarm(&self) {
        self.armed.store(false, Ordering::SeqCst);
    }
}

pub fn watch_ctrl_c(guard: Arc<CtrlCGuard>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if guard.is_armed() {
                println!("\nA quiz is in progress. Type 'quit' to leave it or 'submit' to finish.");
            } else {
                std::process::exit(130);
            }
        }
    })
}

pub fn render_view(view: &AttemptView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\n{}  [{}]{}  answered {}/{}",
        view.quiz_title,
        view.clock,
        if view.low_time { " LOW TIME" } else { "" },
        view.answered_count,
        view.question_count
    );

    let palette: Vec<String> = view
        .palette
        .iter()
        .map(|entry| match entry.status {
            PaletteStatus::Current => format!("[{}]", entry.number),
            PaletteStatus::Answered => format!("{}*", entry.number),
            PaletteStatus::Unanswered => entry.number.to_string(),
        })
        .collect();
    if !palette.is_empty() {
        let _ = writeln!(out, "{}", palette.join(" "));
    }

    match &view.question {
        Some(question) => {
            let _ = writeln!(
                out,
                "\nQuestion {} of {} ({} mark{})",
                question.number,
                view.question_count,
                question.marks,
                if question.marks == 1 { "" } else { "s" }
            );
            let _ = writeln!(out, "{}", question.text);
            if let Some(url) = &question.image_url {
                let _ = writeln!(out, "(image: {})", url);
            }
            for (key, text) in question.options.iter() {
                let marker = if question.selected == Some(key) { ">" } else { " " };
                let _ = writeln!(out, "{} {}) {}", marker, key, text.unwrap_or(""));
            }
        }
        None => {
            let _ = writeln!(out, "\nThis quiz has no questions. Type 'submit' to finish.");
        }
    }

    out
}

pub fn render_result(result: &GradedResult) -> String {
    let grade = result.grade();
    let mut out = String::new();
    let _ = writeln!(out, "\n{} - result", result.quiz_title);
    let _ = writeln!(
        out,
        "Score {}/{}  {}%  grade {}  {}",
        result.score,
        result.total_marks,
        result.percentage_display(),
        grade,
        if result.passed() { "PASSED" } else { "FAILED" }
    );
    let _ = writeln!(
        out,
        "{} of {} correct, {} unanswered. {}",
        result.correct_answers,
        result.total_questions,
        result.unanswered_count(),
        grade.message()
    );

    for (index, question) in result.question_results.iter().enumerate() {
        let verdict = match (question.selected_answer, question.is_correct) {
            (None, _) => "skipped",
            (Some(_), true) => "correct",
            (Some(_), false) => "wrong",
        };
        let _ = writeln!(
            out,
            "\n{}. {} [{}]",
            index + 1,
            question.question_text,
            verdict
        );
        let _ = writeln!(
            out,
            "   your answer: {}  correct answer: {}",
            question.selected_answer.map_or("-".to_string(), |k| k.to_string()),
            question.correct_answer.map_or("-".to_string(), |k| k.to_string())
        );
        if let Some(explanation) = &question.explanation {
            let _ = writeln!(out, "   {}", explanation);
        }
    }

    out
}

pub fn render_summaries(quizzes: &[QuizSummary]) -> String {
    if quizzes.is_empty() {
        return "No quizzes found.\n".to_string();
    }

    let mut out = String::new();
    for quiz in quizzes {
        let _ = writeln!(
            out,
            "#{:<5} {:<40} {:<20} {:>4} min  {:>3} marks  {}",
            quiz.id.0,
            quiz.title,
            quiz.course_name.as_deref().unwrap_or("-"),
            quiz.duration_minutes.map_or("?".to_string(), |d| d.to_string()),
            quiz.total_marks,
            match (quiz.has_attempted, quiz.best_score) {
                (true, Some(best)) => format!("best {}", best),
                (true, None) => "attempted".to_string(),
                (false, _) => "new".to_string(),
            }
        );
    }
    out
}

const START_RULES: [&str; 4] = [
    "Once started, the timer cannot be paused.",
    "The quiz is submitted automatically when time runs out.",
    "Leaving the quiz discards your answers.",
    "You can change answers until you submit.",
];

/// Details shown before the timer starts.
pub fn render_start_screen(quiz: &QuizSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", quiz.title);
    if let Some(course) = &quiz.course_name {
        let _ = writeln!(out, "Course: {}", course);
    }
    if let Some(description) = quiz.description.as_deref().filter(|d| !d.trim().is_empty()) {
        let _ = writeln!(out, "{}", description.trim());
    }
    let _ = writeln!(
        out,
        "{} question(s), {} marks, {} min",
        quiz.question_count,
        quiz.total_marks,
        quiz.duration_minutes.map_or("?".to_string(), |d| d.to_string())
    );
    for rule in START_RULES {
        let _ = writeln!(out, "  - {}", rule);
    }
    out
}

pub fn render_history(attempts: &[GradedResult]) -> String {
    if attempts.is_empty() {
        return "No attempts yet.\n".to_string();
    }

    let mut out = String::new();
    for attempt in attempts {
        let _ = writeln!(
            out,
            "{:<40} {:>3}/{:<3} {:>5}%  {}  {}",
            attempt.quiz_title,
            attempt.score,
            attempt.total_marks,
            attempt.percentage_display(),
            attempt.grade(),
            attempt
                .submitted_at
                .map_or("-".to_string(), |at| at.format("%Y-%m-%d %H:%M").to_string())
        );
    }
    out
}

/// Remaining time in the form shown next to a low-time warning.
pub fn low_time_warning(remaining_seconds: u32) -> String {
    format!("Hurry up! Only {} left.", format_clock(remaining_seconds))
}
