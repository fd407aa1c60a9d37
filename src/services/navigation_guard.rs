use std::sync::Arc;

/// Blocks attempts to leave the attempt screen while it is armed.
#[cfg_attr(test, mockall::automock)]
pub trait NavigationGuard: Send + Sync {
    fn arm(&self);
    fn disarm(&self);
}

/// Holds a guard armed for as long as it lives.
pub struct NavigationLease {
    guard: Arc<dyn NavigationGuard>,
}

impl NavigationLease {
    pub fn acquire(guard: Arc<dyn NavigationGuard>) -> Self {
        guard.arm();
        Self { guard }
    }
}

impl Drop for NavigationLease {
    fn drop(&mut self) {
        self.guard.disarm();
    }
}
