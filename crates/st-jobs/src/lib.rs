//! # st-jobs
//!
//! Asynchronous job submission and polling.
//!
//! Every analysis flow submits a document, receives either an inline result,
//! a job id or a task record, and polls `GET /jobs/{id}` (or `/tasks/{id}`)
//! until the work completes or fails.
//! [`JobRunner`] drives that loop over any [`JobBackend`], with bounded
//! retry for transient failures, a poll cap, and [`PollSlot`] cancellation.

pub mod backend;
pub mod error;
pub mod observer;
pub mod policy;
pub mod runner;
pub mod slot;

pub use backend::{BackendFailure, FailureKind, JobBackend, JobPayload, JobRequest};
pub use error::JobError;
pub use observer::{PollEvent, PollObserver, Quiet};
pub use policy::PollPolicy;
pub use runner::{JobOutcome, JobRunner, PollTarget, TaskOutcome};
pub use slot::{PollSlot, PollTicket};
