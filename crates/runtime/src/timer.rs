//! Cancellable one-shot timers that post a command back to the worker.
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::worker::Command;

/// Fires `command` into the worker queue after a delay unless dropped first.
///
/// The timer only holds a weak sender, so an armed timer never keeps the
/// worker alive after every handle is gone.
pub(crate) struct Timer {
    task: JoinHandle<()>,
}

impl Timer {
    pub(crate) fn arm(delay: Duration, tx: mpsc::WeakSender<Command>, command: Command) -> Self {
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(tx) = tx.upgrade() else {
                return;
            };
            trace!(target: "arena::timer", ?delay, "timer fired");
            if tx.send(command).await.is_err() {
                trace!(target: "arena::timer", "worker gone before timer delivery");
            }
        });
        Self { task }
    }

    #[cfg(test)]
    pub(crate) fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
