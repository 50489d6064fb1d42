use std::time::Duration;

use st_core::JobStatus;

/// Progress reported by a running job loop.
#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    /// The server queued the job.
    Submitted { job_id: String },
    /// The server created a task to follow instead of a job.
    TaskCreated { task_id: String },
    /// A poll returned a status.
    Polled { attempt: u32, status: JobStatus },
    /// A transient failure will be retried after `delay`.
    Retrying {
        failures: u32,
        delay: Duration,
        message: String,
    },
}

pub trait PollObserver: Send {
    fn on_event(&mut self, event: &PollEvent);
}

impl<F> PollObserver for F
where
    F: FnMut(&PollEvent) + Send,
{
    fn on_event(&mut self, event: &PollEvent) {
        self(event);
    }
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct Quiet;

impl PollObserver for Quiet {
    fn on_event(&mut self, _event: &PollEvent) {}
}
