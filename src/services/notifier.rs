use async_trait::async_trait;

/// User-facing prompts and notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Asks a yes/no question. Anything but an explicit yes counts as no.
    async fn confirm(&self, title: &str, message: &str) -> bool;
    async fn success(&self, title: &str, message: &str);
    async fn error(&self, title: &str, message: &str);
}

pub const SUBMIT_TITLE: &str = "Submit Quiz";
pub const SUBMIT_FAILED_TITLE: &str = "Failed to submit quiz";
pub const TIME_UP_TITLE: &str = "Time is up";

/// Prompt shown before a manual submission.
pub fn confirmation_message(unanswered: usize) -> String {
    if unanswered > 0 {
        format!(
            "You have {} unanswered question(s). Are you sure you want to submit?",
            unanswered
        )
    } else {
        "Are you sure you want to submit the quiz?".to_string()
    }
}
