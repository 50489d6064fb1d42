//! The submit → poll → terminal state machine.
//!
//! ```text
//! SUBMITTED -> result inline            -> COMPLETED
//! SUBMITTED -> job_id                   -> POLLING
//! SUBMITTED -> task record              -> POLLING /tasks/{id}
//! POLLING   -> pending | processing     -> POLLING (after interval)
//! POLLING   -> completed                -> COMPLETED
//! POLLING   -> failed                   -> FAILED
//! any       -> auth error               -> error, immediately
//! any       -> transient error          -> retry with backoff, bounded
//! any       -> ticket superseded        -> SUPERSEDED, response dropped
//! ```

use std::fmt;

use serde_json::Value;
use st_core::job::{JobSnapshot, Submission};
use st_core::task::TaskDetail;
use st_core::{AnalysisResult, JobStatus};

use crate::backend::{BackendFailure, FailureKind, JobBackend, JobRequest};
use crate::error::JobError;
use crate::observer::{PollEvent, PollObserver};
use crate::policy::PollPolicy;
use crate::slot::PollTicket;

/// How a job loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed {
        job_id: Option<String>,
        result: AnalysisResult,
        polls: u32,
    },
    Failed {
        job_id: Option<String>,
        error: String,
        polls: u32,
    },
    /// The ticket went stale; whatever arrived afterwards was discarded.
    Superseded { job_id: Option<String>, polls: u32 },
    /// The submission created a server task, followed to its end.
    Task(TaskOutcome),
}

impl JobOutcome {
    pub fn job_id(&self) -> Option<&str> {
        match self {
            Self::Completed { job_id, .. }
            | Self::Failed { job_id, .. }
            | Self::Superseded { job_id, .. } => job_id.as_deref(),
            Self::Task(_) => None,
        }
    }

    pub const fn polls(&self) -> u32 {
        match self {
            Self::Completed { polls, .. }
            | Self::Failed { polls, .. }
            | Self::Superseded { polls, .. } => *polls,
            Self::Task(task) => task.polls(),
        }
    }

    pub const fn status(&self) -> Option<JobStatus> {
        match self {
            Self::Completed { .. } => Some(JobStatus::Completed),
            Self::Failed { .. } => Some(JobStatus::Failed),
            Self::Superseded { .. } => None,
            Self::Task(task) => task.status(),
        }
    }
}

/// How a task loop ended. Task results are free-form JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Succeeded {
        task_id: String,
        result: Option<Value>,
        polls: u32,
    },
    Failed {
        task_id: String,
        error: String,
        polls: u32,
    },
    Superseded { task_id: String, polls: u32 },
}

impl TaskOutcome {
    pub fn task_id(&self) -> &str {
        match self {
            Self::Succeeded { task_id, .. }
            | Self::Failed { task_id, .. }
            | Self::Superseded { task_id, .. } => task_id,
        }
    }

    pub const fn polls(&self) -> u32 {
        match self {
            Self::Succeeded { polls, .. }
            | Self::Failed { polls, .. }
            | Self::Superseded { polls, .. } => *polls,
        }
    }

    pub const fn status(&self) -> Option<JobStatus> {
        match self {
            Self::Succeeded { .. } => Some(JobStatus::Completed),
            Self::Failed { .. } => Some(JobStatus::Failed),
            Self::Superseded { .. } => None,
        }
    }
}

/// What a poll loop is following.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollTarget {
    Job(String),
    Task(String),
}

impl fmt::Display for PollTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Job(id) => write!(f, "job {id}"),
            Self::Task(id) => write!(f, "task {id}"),
        }
    }
}

enum LoopEnd<T> {
    Terminal {
        status: JobStatus,
        state: T,
        polls: u32,
    },
    Superseded {
        polls: u32,
    },
}

pub struct JobRunner<B> {
    backend: B,
    policy: PollPolicy,
}

impl<B: JobBackend> JobRunner<B> {
    pub const fn new(backend: B, policy: PollPolicy) -> Self {
        Self { backend, policy }
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    pub const fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Submit once and classify the response. Submissions are not retried so
    /// a flaky network never queues the same document twice.
    ///
    /// # Errors
    ///
    /// Returns [`JobError`] for transport failures and unusable responses.
    pub async fn submit(&self, request: &JobRequest) -> Result<Submission, JobError> {
        let raw = self
            .backend
            .submit(request)
            .await
            .map_err(|failure| abort_error(failure, 1))?;
        Ok(Submission::classify(raw)?)
    }

    /// Fetch the current state of a job once.
    ///
    /// # Errors
    ///
    /// Returns [`JobError`] for transport failures and unusable responses.
    pub async fn poll_once(&self, job_id: &str) -> Result<JobSnapshot, JobError> {
        let raw = self
            .backend
            .fetch_job(job_id)
            .await
            .map_err(|failure| abort_error(failure, 1))?;
        Ok(JobSnapshot::from_value(raw)?)
    }

    /// Submit `request` and follow it to a terminal state, as a job or as a
    /// task depending on what the server created.
    ///
    /// # Errors
    ///
    /// See [`Self::await_job`].
    pub async fn run<O: PollObserver>(
        &self,
        request: &JobRequest,
        ticket: PollTicket,
        observer: &mut O,
    ) -> Result<JobOutcome, JobError> {
        if !ticket.is_current() {
            return Ok(JobOutcome::Superseded {
                job_id: None,
                polls: 0,
            });
        }

        let submission = self.submit(request).await;
        if !ticket.is_current() {
            tracing::debug!("discarding submission response for superseded ticket");
            return Ok(match submission {
                Ok(Submission::Task { task_id, .. }) => {
                    JobOutcome::Task(TaskOutcome::Superseded { task_id, polls: 0 })
                }
                other => JobOutcome::Superseded {
                    job_id: other.ok().and_then(|s| s.job_id().map(str::to_string)),
                    polls: 0,
                },
            });
        }

        match submission? {
            Submission::Completed { job_id, result } => {
                tracing::debug!(?job_id, "result returned inline");
                Ok(JobOutcome::Completed {
                    job_id,
                    result,
                    polls: 0,
                })
            }
            Submission::Failed { job_id, error } => Ok(JobOutcome::Failed {
                job_id,
                error,
                polls: 0,
            }),
            Submission::Pending { job_id, .. } => {
                observer.on_event(&PollEvent::Submitted {
                    job_id: job_id.clone(),
                });
                self.await_job(&job_id, ticket, observer).await
            }
            Submission::Task { task_id, .. } => {
                tracing::info!(task_id = %task_id, "server created a task");
                observer.on_event(&PollEvent::TaskCreated {
                    task_id: task_id.clone(),
                });
                self.await_task(&task_id, ticket, observer)
                    .await
                    .map(JobOutcome::Task)
            }
        }
    }

    /// Poll `job_id` until it reaches a terminal state.
    ///
    /// Polls are strictly sequential. The first poll is immediate; later
    /// ones wait `interval`, or the backoff delay after a transient failure.
    ///
    /// # Errors
    ///
    /// - [`JobError::Auth`] as soon as credentials are rejected
    /// - [`JobError::Rejected`] for other non-retryable failures
    /// - [`JobError::Transport`] once transient failures exceed the budget
    /// - [`JobError::Protocol`] for unusable payloads
    /// - [`JobError::Timeout`] once `max_polls` is reached
    pub async fn await_job<O: PollObserver>(
        &self,
        job_id: &str,
        ticket: PollTicket,
        observer: &mut O,
    ) -> Result<JobOutcome, JobError> {
        let target = PollTarget::Job(job_id.to_string());
        let end = self
            .poll_until(&target, ticket, observer, |raw| {
                let snapshot = JobSnapshot::from_value(raw)?;
                let status = if snapshot.has_result() {
                    JobStatus::Completed
                } else {
                    snapshot.effective_status()
                };
                Ok((status, snapshot))
            })
            .await?;

        let job_id = Some(job_id.to_string());
        Ok(match end {
            LoopEnd::Terminal {
                status: JobStatus::Failed,
                state,
                polls,
            } => JobOutcome::Failed {
                job_id,
                error: state.failure_message(),
                polls,
            },
            LoopEnd::Terminal { state, polls, .. } => JobOutcome::Completed {
                job_id,
                result: state.normalized_result(),
                polls,
            },
            LoopEnd::Superseded { polls } => JobOutcome::Superseded { job_id, polls },
        })
    }

    /// Poll `GET /tasks/{id}` until the task succeeds or fails.
    ///
    /// Same cadence, retry budget and cancellation as [`Self::await_job`].
    ///
    /// # Errors
    ///
    /// See [`Self::await_job`].
    pub async fn await_task<O: PollObserver>(
        &self,
        task_id: &str,
        ticket: PollTicket,
        observer: &mut O,
    ) -> Result<TaskOutcome, JobError> {
        let target = PollTarget::Task(task_id.to_string());
        let end = self
            .poll_until(&target, ticket, observer, |raw| {
                let detail = TaskDetail::from_value(raw)?;
                Ok((detail.status(), detail))
            })
            .await?;

        let task_id = task_id.to_string();
        Ok(match end {
            LoopEnd::Terminal {
                status: JobStatus::Failed,
                state,
                polls,
            } => TaskOutcome::Failed {
                task_id,
                error: state.failure_message(),
                polls,
            },
            LoopEnd::Terminal { state, polls, .. } => TaskOutcome::Succeeded {
                task_id,
                result: state.result_payload,
                polls,
            },
            LoopEnd::Superseded { polls } => TaskOutcome::Superseded { task_id, polls },
        })
    }

    async fn fetch(&self, target: &PollTarget) -> Result<Value, BackendFailure> {
        match target {
            PollTarget::Job(job_id) => self.backend.fetch_job(job_id).await,
            PollTarget::Task(task_id) => self.backend.fetch_task(task_id).await,
        }
    }

    /// The shared poll loop. `read` turns a raw body into its logical status
    /// and whatever the caller needs from it.
    async fn poll_until<T, O, F>(
        &self,
        target: &PollTarget,
        mut ticket: PollTicket,
        observer: &mut O,
        read: F,
    ) -> Result<LoopEnd<T>, JobError>
    where
        O: PollObserver,
        F: Fn(Value) -> Result<(JobStatus, T), JobError>,
    {
        let mut polls = 0_u32;
        let mut failures = 0_u32;

        loop {
            if !ticket.is_current() {
                return Ok(LoopEnd::Superseded { polls });
            }

            polls = polls.saturating_add(1);
            tracing::debug!(subject = %target, attempt = polls, "polling");
            let response = self.fetch(target).await;
            if !ticket.is_current() {
                tracing::debug!(subject = %target, "discarding poll response for superseded ticket");
                return Ok(LoopEnd::Superseded { polls });
            }

            let delay = match response {
                Ok(raw) => {
                    failures = 0;
                    let (status, state) = read(raw)?;
                    observer.on_event(&PollEvent::Polled {
                        attempt: polls,
                        status,
                    });
                    if status.is_terminal() {
                        return Ok(LoopEnd::Terminal {
                            status,
                            state,
                            polls,
                        });
                    }
                    self.policy.interval
                }
                Err(failure) if failure.kind == FailureKind::Transient => {
                    failures = failures.saturating_add(1);
                    if failures > self.policy.max_transient_failures {
                        return Err(JobError::Transport {
                            attempts: failures,
                            message: failure.message,
                        });
                    }
                    let delay = self.policy.retry_delay(failures, failure.retry_after);
                    tracing::warn!(
                        subject = %target,
                        failures,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %failure,
                        "poll failed; retrying"
                    );
                    observer.on_event(&PollEvent::Retrying {
                        failures,
                        delay,
                        message: failure.message,
                    });
                    delay
                }
                Err(failure) => return Err(abort_error(failure, failures.saturating_add(1))),
            };

            if self.policy.exhausted(polls) {
                return Err(JobError::Timeout {
                    target: target.clone(),
                    polls,
                });
            }

            if !ticket.sleep(delay).await {
                return Ok(LoopEnd::Superseded { polls });
            }
        }
    }
}

fn abort_error(failure: BackendFailure, attempts: u32) -> JobError {
    match failure.kind {
        FailureKind::Auth => JobError::Auth(failure.message),
        FailureKind::Transient => JobError::Transport {
            attempts,
            message: failure.message,
        },
        FailureKind::Fatal => JobError::Rejected(failure.message),
    }
}
