use std::{sync::Weak, time::Duration};

use async_trait::async_trait;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{interval_at, Instant, Interval, MissedTickBehavior},
};

use crate::{
    models::domain::TickOutcome,
    services::attempt_controller::{AttemptStatus, QuizAttemptController},
};

/// Source of countdown ticks, one per elapsed second of quiz time.
#[async_trait]
pub trait Clock: Send {
    async fn tick(&mut self);
}

/// Wall clock backed by a tokio interval. The first tick fires one period after creation.
pub struct IntervalClock {
    interval: Interval,
}

impl IntervalClock {
    pub fn new(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

#[async_trait]
impl Clock for IntervalClock {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

/// Clock that only moves when its [`ClockHandle`] says so.
pub struct ManualClock {
    ticks: mpsc::UnboundedReceiver<()>,
}

#[derive(Clone)]
pub struct ClockHandle {
    ticks: mpsc::UnboundedSender<()>,
}

impl ManualClock {
    pub fn new() -> (Self, ClockHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { ticks: rx }, ClockHandle { ticks: tx })
    }
}

impl ClockHandle {
    pub fn advance(&self, ticks: u32) {
        for _ in 0..ticks {
            if self.ticks.send(()).is_err() {
                break;
            }
        }
    }
}

#[async_trait]
impl Clock for ManualClock {
    async fn tick(&mut self) {
        // A dropped handle means time stands still.
        if self.ticks.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }
}

/// Drives `controller` from `clock` until the attempt is graded, abandoned or dropped.
pub(crate) fn spawn(
    controller: Weak<QuizAttemptController>,
    mut clock: Box<dyn Clock>,
    mut status: watch::Receiver<AttemptStatus>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = clock.tick() => {}
                changed = status.changed() => {
                    if changed.is_err() || status.borrow_and_update().is_terminal() {
                        break;
                    }
                    continue;
                }
            }

            let Some(controller) = controller.upgrade() else {
                break;
            };

            // The expiring tick hands auto-submission off to its own task.
            match controller.tick() {
                TickOutcome::Running(_) | TickOutcome::Idle => {}
                TickOutcome::Stopped | TickOutcome::Expired => break,
            }
        }

        log::debug!("Countdown stopped");
    })
}
