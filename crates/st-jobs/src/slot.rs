//! Generation-counter cancellation for polling loops.
//!
//! A [`PollSlot`] stands for one place in the front end that shows a job
//! (one view, one command). Each new loop takes a [`PollTicket`]; taking a
//! new ticket or calling [`PollSlot::cancel`] bumps the generation and
//! every older ticket becomes stale. Dropping the slot also invalidates its
//! tickets.

use std::time::Duration;

use tokio::sync::watch;

#[derive(Debug)]
pub struct PollSlot {
    generation: watch::Sender<u64>,
}

impl Default for PollSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl PollSlot {
    pub fn new() -> Self {
        let (generation, _) = watch::channel(0);
        Self { generation }
    }

    /// Invalidate any outstanding ticket and hand out a fresh one.
    pub fn begin(&self) -> PollTicket {
        let mut issued = 0;
        self.generation.send_modify(|current| {
            *current += 1;
            issued = *current;
        });
        PollTicket {
            generation: issued,
            watcher: self.generation.subscribe(),
        }
    }

    /// Invalidate the outstanding ticket, if any.
    pub fn cancel(&self) {
        self.generation.send_modify(|current| *current += 1);
        tracing::debug!(generation = *self.generation.borrow(), "poll slot cancelled");
    }

    pub fn generation(&self) -> u64 {
        *self.generation.borrow()
    }
}

/// Proof that a loop is still the current one for its slot.
#[derive(Debug, Clone)]
pub struct PollTicket {
    generation: u64,
    watcher: watch::Receiver<u64>,
}

impl PollTicket {
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// False once the slot moved on or was dropped.
    pub fn is_current(&self) -> bool {
        self.watcher.has_changed().is_ok() && *self.watcher.borrow() == self.generation
    }

    /// Resolves once this ticket is no longer current.
    pub async fn superseded(&mut self) {
        while self.is_current() {
            if self.watcher.changed().await.is_err() {
                return;
            }
        }
    }

    /// Sleep for `delay`, waking early if the ticket goes stale.
    /// Returns whether the ticket is still current.
    pub async fn sleep(&mut self, delay: Duration) -> bool {
        tokio::select! {
            () = tokio::time::sleep(delay) => self.is_current(),
            () = self.superseded() => false,
        }
    }
}
