//! Job loop behaviour against a scripted in-memory backend.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use st_core::{JobStatus, TabId};
use st_jobs::{
    BackendFailure, JobBackend, JobError, JobOutcome, JobRequest, JobRunner, PollEvent, PollPolicy,
    PollSlot, PollTarget, Quiet, TaskOutcome,
};

type Reply = Result<Value, BackendFailure>;

#[derive(Default)]
struct Scripted {
    submit: Mutex<VecDeque<Reply>>,
    polls: Mutex<VecDeque<Reply>>,
    submit_calls: AtomicU32,
    poll_calls: AtomicU32,
    task_calls: AtomicU32,
    on_poll: Mutex<Option<Arc<PollSlot>>>,
    expected: Option<JobRequest>,
}

impl Scripted {
    fn new(submit: Vec<Reply>, polls: Vec<Reply>) -> Self {
        Self {
            submit: Mutex::new(submit.into()),
            polls: Mutex::new(polls.into()),
            ..Default::default()
        }
    }

    /// Accept `request` instead of the default text submission.
    fn expecting(mut self, request: JobRequest) -> Self {
        self.expected = Some(request);
        self
    }

    fn next_poll(&self) -> Reply {
        if let Some(slot) = self.on_poll.lock().expect("lock").take() {
            slot.cancel();
        }
        self.polls
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Ok(json!({ "status": "processing" })))
    }

    /// Cancel `slot` while the next poll is in flight.
    fn cancel_during_poll(self, slot: Arc<PollSlot>) -> Self {
        *self.on_poll.lock().expect("lock") = Some(slot);
        self
    }
}

#[async_trait]
impl JobBackend for Scripted {
    async fn submit(&self, request: &JobRequest) -> Result<Value, BackendFailure> {
        let expected = self.expected.clone().unwrap_or_else(crate::request);
        assert_eq!(request, &expected);
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submit
            .lock()
            .expect("lock")
            .pop_front()
            .expect("unexpected submission")
    }

    async fn fetch_job(&self, job_id: &str) -> Result<Value, BackendFailure> {
        assert_eq!(job_id, "42");
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        self.next_poll()
    }

    async fn fetch_task(&self, task_id: &str) -> Result<Value, BackendFailure> {
        assert_eq!(task_id, "17");
        self.task_calls.fetch_add(1, Ordering::SeqCst);
        self.next_poll()
    }
}

fn fast_policy() -> PollPolicy {
    PollPolicy {
        interval: Duration::from_millis(1),
        max_polls: 20,
        max_transient_failures: 2,
        backoff_multiplier: 2.0,
        max_backoff: Duration::from_millis(4),
    }
}

fn request() -> JobRequest {
    JobRequest::text("tender document")
}

#[tokio::test]
async fn inline_result_never_polls() {
    let runner = JobRunner::new(
        Scripted::new(
            vec![Ok(json!({ "status": "completed", "result": { "summary": "inline" } }))],
            vec![],
        ),
        fast_policy(),
    );
    let slot = PollSlot::new();

    let outcome = runner
        .run(&request(), slot.begin(), &mut Quiet)
        .await
        .expect("run");

    let JobOutcome::Completed { result, polls, .. } = outcome else {
        panic!("expected completion, got {outcome:?}");
    };
    assert_eq!(result.summary, "inline");
    assert_eq!(polls, 0);
    assert_eq!(runner.backend().poll_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn processing_then_completed_yields_all_tabs() {
    let runner = JobRunner::new(
        Scripted::new(
            vec![Ok(json!({ "status": "processing", "job_id": "42" }))],
            vec![
                Ok(json!({ "status": "processing" })),
                Ok(json!({ "status": "completed", "result": { "summary": "ok", "tabs": [] } })),
            ],
        ),
        fast_policy(),
    );
    let slot = PollSlot::new();
    let mut events = Vec::new();
    let mut record = |event: &PollEvent| events.push(event.clone());

    let outcome = runner
        .run(&request(), slot.begin(), &mut record)
        .await
        .expect("run");

    let JobOutcome::Completed {
        job_id,
        result,
        polls,
    } = outcome
    else {
        panic!("expected completion, got {outcome:?}");
    };
    assert_eq!(job_id.as_deref(), Some("42"));
    assert_eq!(polls, 2);
    assert_eq!(result.summary, "ok");
    assert_eq!(
        result.tabs.iter().map(|tab| tab.id).collect::<Vec<_>>(),
        TabId::ALL.to_vec()
    );
    assert!(result.tabs.iter().all(|tab| tab.items.is_empty()));
    assert_eq!(
        events,
        vec![
            PollEvent::Submitted {
                job_id: "42".into()
            },
            PollEvent::Polled {
                attempt: 1,
                status: JobStatus::Processing
            },
            PollEvent::Polled {
                attempt: 2,
                status: JobStatus::Completed
            },
        ]
    );
}

#[tokio::test]
async fn failed_job_surfaces_server_error() {
    let runner = JobRunner::new(
        Scripted::new(
            vec![Ok(json!({ "status": "queued", "job_id": 42 }))],
            vec![Ok(json!({ "status": "failed", "error": "unsupported file type" }))],
        ),
        fast_policy(),
    );
    let slot = PollSlot::new();

    let outcome = runner
        .run(&request(), slot.begin(), &mut Quiet)
        .await
        .expect("run");
    assert_eq!(
        outcome,
        JobOutcome::Failed {
            job_id: Some("42".into()),
            error: "unsupported file type".into(),
            polls: 1,
        }
    );
}

#[tokio::test]
async fn transient_failures_are_retried_then_recover() {
    let runner = JobRunner::new(
        Scripted::new(
            vec![],
            vec![
                Err(BackendFailure::transient("connection reset")),
                Err(BackendFailure::transient("502 bad gateway")),
                Ok(json!({ "status": "processing" })),
                Err(BackendFailure::transient("timeout")),
                Ok(json!({ "status": "succeeded", "result": {} })),
            ],
        ),
        fast_policy(),
    );
    let slot = PollSlot::new();
    let mut retries = 0;
    let mut count = |event: &PollEvent| {
        if matches!(event, PollEvent::Retrying { .. }) {
            retries += 1;
        }
    };

    let outcome = runner
        .await_job("42", slot.begin(), &mut count)
        .await
        .expect("recovers");
    assert_eq!(outcome.status(), Some(JobStatus::Completed));
    assert_eq!(outcome.polls(), 5);
    assert_eq!(retries, 3);
}

#[tokio::test]
async fn transient_budget_is_bounded() {
    let runner = JobRunner::new(
        Scripted::new(
            vec![],
            vec![
                Err(BackendFailure::transient("offline")),
                Err(BackendFailure::transient("offline")),
                Err(BackendFailure::transient("still offline")),
            ],
        ),
        fast_policy(),
    );
    let slot = PollSlot::new();

    let err = runner
        .await_job("42", slot.begin(), &mut Quiet)
        .await
        .expect_err("gives up");
    assert!(matches!(
        err,
        JobError::Transport { attempts: 3, ref message } if message == "still offline"
    ));
    assert_eq!(runner.backend().poll_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn auth_failure_aborts_immediately() {
    let runner = JobRunner::new(
        Scripted::new(vec![], vec![Err(BackendFailure::auth("401 unauthorized"))]),
        fast_policy(),
    );
    let slot = PollSlot::new();

    let err = runner
        .await_job("42", slot.begin(), &mut Quiet)
        .await
        .expect_err("auth aborts");
    assert!(matches!(err, JobError::Auth(_)));
    assert_eq!(runner.backend().poll_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn fatal_failure_is_not_retried() {
    let runner = JobRunner::new(
        Scripted::new(vec![], vec![Err(BackendFailure::fatal("404 job not found"))]),
        fast_policy(),
    );
    let slot = PollSlot::new();

    let err = runner
        .await_job("42", slot.begin(), &mut Quiet)
        .await
        .expect_err("fatal aborts");
    assert!(matches!(err, JobError::Rejected(message) if message == "404 job not found"));
}

#[tokio::test]
async fn stuck_job_times_out_at_poll_cap() {
    let mut policy = fast_policy();
    policy.max_polls = 3;
    let runner = JobRunner::new(Scripted::new(vec![], vec![]), policy);
    let slot = PollSlot::new();

    let err = runner
        .await_job("42", slot.begin(), &mut Quiet)
        .await
        .expect_err("times out");
    assert!(matches!(err, JobError::Timeout { polls: 3, .. }));
    assert_eq!(runner.backend().poll_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn late_response_for_cancelled_ticket_is_discarded() {
    let slot = Arc::new(PollSlot::new());
    let runner = JobRunner::new(
        Scripted::new(
            vec![],
            vec![Ok(json!({ "status": "completed", "result": { "summary": "late" } }))],
        )
        .cancel_during_poll(slot.clone()),
        fast_policy(),
    );

    let outcome = runner
        .await_job("42", slot.begin(), &mut Quiet)
        .await
        .expect("superseded");
    assert_eq!(
        outcome,
        JobOutcome::Superseded {
            job_id: Some("42".into()),
            polls: 1,
        }
    );
}

#[tokio::test]
async fn new_ticket_stops_sleeping_loop() {
    let mut policy = fast_policy();
    policy.interval = Duration::from_secs(60);
    policy.max_backoff = Duration::from_secs(60);
    let runner = JobRunner::new(Scripted::new(vec![], vec![]), policy);
    let slot = PollSlot::new();
    let ticket = slot.begin();
    let mut quiet = Quiet;

    let (outcome, _next) = tokio::time::timeout(Duration::from_secs(5), async {
        tokio::join!(runner.await_job("42", ticket, &mut quiet), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            slot.begin()
        })
    })
    .await
    .expect("loop should wake on supersession");

    let outcome = outcome.expect("superseded");
    assert!(matches!(outcome, JobOutcome::Superseded { polls: 1, .. }));
}

#[tokio::test]
async fn stale_ticket_never_submits() {
    let runner = JobRunner::new(Scripted::new(vec![], vec![]), fast_policy());
    let slot = PollSlot::new();
    let stale = slot.begin();
    slot.cancel();

    let outcome = runner
        .run(&request(), stale, &mut Quiet)
        .await
        .expect("superseded");
    assert!(matches!(outcome, JobOutcome::Superseded { .. }));
    assert_eq!(runner.backend().submit_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn processing_without_job_id_is_a_protocol_error() {
    let runner = JobRunner::new(
        Scripted::new(vec![Ok(json!({ "status": "processing" }))], vec![]),
        fast_policy(),
    );
    let slot = PollSlot::new();

    let err = runner
        .run(&request(), slot.begin(), &mut Quiet)
        .await
        .expect_err("protocol error");
    assert!(matches!(err, JobError::Protocol(_)));
}

#[tokio::test]
async fn unbounded_policy_polls_past_the_usual_cap() {
    let mut policy = fast_policy();
    policy.max_polls = 0;
    let mut replies: Vec<Reply> = (0..30).map(|_| Ok(json!({ "status": "processing" }))).collect();
    replies.push(Ok(json!({ "status": "completed", "result": { "summary": "slow" } })));
    let runner = JobRunner::new(Scripted::new(vec![], replies), policy);
    let slot = PollSlot::new();

    let outcome = runner
        .await_job("42", slot.begin(), &mut Quiet)
        .await
        .expect("finishes");
    assert_eq!(outcome.status(), Some(JobStatus::Completed));
    assert_eq!(outcome.polls(), 31);
}

fn workload_request() -> JobRequest {
    JobRequest::file("features.xlsx")
        .with_endpoint("/workload/analyze")
        .with_config(json!({ "config": { "strategy": "balanced" } }))
}

#[tokio::test]
async fn task_record_is_followed_until_it_succeeds() {
    let runner = JobRunner::new(
        Scripted::new(
            vec![Ok(json!({
                "id": 17,
                "task_type": "workload_analysis",
                "status": "pending",
            }))],
            vec![
                Ok(json!({ "id": 17, "task_type": "workload_analysis", "status": "running" })),
                Ok(json!({
                    "id": 17,
                    "task_type": "workload_analysis",
                    "status": "succeeded",
                    "result_payload": { "sheets": [] },
                })),
            ],
        )
        .expecting(workload_request()),
        fast_policy(),
    );
    let slot = PollSlot::new();
    let mut events = Vec::new();
    let mut record = |event: &PollEvent| events.push(event.clone());

    let outcome = runner
        .run(&workload_request(), slot.begin(), &mut record)
        .await
        .expect("run");

    assert_eq!(
        outcome,
        JobOutcome::Task(TaskOutcome::Succeeded {
            task_id: "17".into(),
            result: Some(json!({ "sheets": [] })),
            polls: 2,
        })
    );
    assert_eq!(outcome.job_id(), None);
    assert_eq!(runner.backend().task_calls.load(Ordering::SeqCst), 2);
    assert_eq!(runner.backend().poll_calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        events,
        vec![
            PollEvent::TaskCreated {
                task_id: "17".into()
            },
            PollEvent::Polled {
                attempt: 1,
                status: JobStatus::Processing
            },
            PollEvent::Polled {
                attempt: 2,
                status: JobStatus::Completed
            },
        ]
    );
}

#[tokio::test]
async fn failed_task_surfaces_its_error_message() {
    let runner = JobRunner::new(
        Scripted::new(
            vec![],
            vec![Ok(json!({
                "id": "17",
                "task_type": "costing_estimate",
                "status": "failed",
                "error_message": "sheet has no requirement column",
            }))],
        ),
        fast_policy(),
    );
    let slot = PollSlot::new();

    let outcome = runner
        .await_task("17", slot.begin(), &mut Quiet)
        .await
        .expect("task ends");
    assert_eq!(
        outcome,
        TaskOutcome::Failed {
            task_id: "17".into(),
            error: "sheet has no requirement column".into(),
            polls: 1,
        }
    );
}

#[tokio::test]
async fn stuck_task_times_out_naming_the_task() {
    let mut policy = fast_policy();
    policy.max_polls = 2;
    let runner = JobRunner::new(
        Scripted::new(
            vec![],
            vec![
                Ok(json!({ "id": 17, "task_type": "workload_analysis", "status": "running" })),
                Ok(json!({ "id": 17, "task_type": "workload_analysis", "status": "running" })),
            ],
        ),
        policy,
    );
    let slot = PollSlot::new();

    let err = runner
        .await_task("17", slot.begin(), &mut Quiet)
        .await
        .expect_err("times out");
    assert!(matches!(
        err,
        JobError::Timeout { target: PollTarget::Task(ref id), polls: 2 } if id == "17"
    ));
    assert_eq!(err.to_string(), "task 17 still running after 2 polls");
}
