//! Cancellable session countdown task.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Emits one tick per period until cancelled.
///
/// One timer exists per active session. The engine replaces it whenever the
/// active session changes and cancels it on every exit from the active state,
/// so a stale countdown can never fire into a later session. Dropping the
/// handle aborts the task as well.
pub struct SessionTimer {
    ticks: mpsc::Receiver<()>,
    task: JoinHandle<()>,
}

impl SessionTimer {
    /// Spawn the countdown task.
    pub fn start(period: Duration) -> Self {
        let (tx, ticks) = mpsc::channel(1);
        let task = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first interval tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        });
        Self { ticks, task }
    }

    /// Wait for the next tick. Yields `None` once the timer is cancelled.
    pub async fn tick(&mut self) -> Option<()> {
        self.ticks.recv().await
    }

    /// Stop the countdown task.
    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
