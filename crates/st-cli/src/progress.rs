use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use st_jobs::{PollEvent, PollObserver};

use crate::ui;

/// Spinner on stderr. Inert when progress is disabled.
pub struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    #[must_use]
    pub fn spinner(message: &str) -> Self {
        if !ui::prefs().progress {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    pub fn finish_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    pub fn finish_err(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.abandon_with_message(message.to_string());
        }
    }
}

impl PollObserver for Progress {
    fn on_event(&mut self, event: &PollEvent) {
        self.set_message(&describe(event));
    }
}

fn describe(event: &PollEvent) -> String {
    match event {
        PollEvent::Submitted { job_id } => format!("job {job_id} queued"),
        PollEvent::TaskCreated { task_id } => format!("task {task_id} created"),
        PollEvent::Polled { attempt, status } => format!("{status} (poll {attempt})"),
        PollEvent::Retrying {
            failures,
            delay,
            message,
        } => format!(
            "retrying in {:.1}s after error #{failures}: {message}",
            delay.as_secs_f64()
        ),
    }
}

#[cfg(test)]
mod tests {
    use st_core::JobStatus;

    use super::*;

    #[test]
    fn events_read_as_status_lines() {
        assert_eq!(
            describe(&PollEvent::Submitted { job_id: "42".into() }),
            "job 42 queued"
        );
        assert_eq!(
            describe(&PollEvent::Polled {
                attempt: 3,
                status: JobStatus::Processing,
            }),
            "processing (poll 3)"
        );
        assert_eq!(
            describe(&PollEvent::TaskCreated { task_id: "17".into() }),
            "task 17 created"
        );
        assert_eq!(
            describe(&PollEvent::Retrying {
                failures: 2,
                delay: Duration::from_millis(6400),
                message: "API error (502): Bad Gateway".into(),
            }),
            "retrying in 6.4s after error #2: API error (502): Bad Gateway"
        );
    }
}
