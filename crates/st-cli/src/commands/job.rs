use std::future::Future;

use anyhow::Context;
use st_core::excerpt::{Markup, SourceRange, highlight, locate_excerpt};
use st_core::job::{JobRecord, Submission};
use st_core::responses::{JobDeleteResponse, JobResponse, SourceViewResponse};
use st_core::{AnalysisItem, JobStatus};
use st_jobs::{JobError, JobOutcome, JobRunner, PollPolicy, PollSlot};

use crate::cli::subcommands::JobCommands;
use crate::cli::subcommands::job::JobSourceArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::task::{output_task_outcome, task_receipt};
use crate::context::AppContext;
use crate::output::{Rows, output, output_with_rows};
use crate::progress::Progress;
use crate::ui;

/// Handle `savetime job <subcommand>`.
pub async fn handle(action: &JobCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        JobCommands::Status { id } => status(id, ctx, flags).await,
        JobCommands::Wait { id } => wait(id, ctx, flags).await,
        JobCommands::Source(args) => source(args, ctx, flags).await,
        JobCommands::List => {
            let jobs = ctx.client()?.jobs().await?;
            output_with_rows(&jobs, flags.format, || record_rows(&jobs))
        }
        JobCommands::Delete { id } => {
            let deleted = ctx.client()?.delete_job(id).await?;
            tracing::info!(job_id = %id, deleted, "job delete requested");
            let response = JobDeleteResponse {
                job_id: id.clone(),
                deleted,
            };
            output(&response, flags.format)
        }
    }
}

async fn status(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let runner = JobRunner::new(ctx.client()?, PollPolicy::from(&ctx.config.polling));
    let snapshot = runner.poll_once(id).await?;
    let status = if snapshot.has_result() {
        JobStatus::Completed
    } else {
        snapshot.effective_status()
    };
    let response = JobResponse {
        job_id: Some(snapshot.job_id.clone().unwrap_or_else(|| id.to_string())),
        status,
        result: (status == JobStatus::Completed).then(|| snapshot.normalized_result()),
        error: (status == JobStatus::Failed).then(|| snapshot.failure_message()),
        polls: 1,
    };
    print_job(&response, flags)
}

async fn wait(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let runner = JobRunner::new(ctx.client()?, PollPolicy::from(&ctx.config.polling));
    let slot = PollSlot::new();
    let mut progress = Progress::spinner(&format!("waiting for job {id}"));
    let outcome = follow(&slot, runner.await_job(id, slot.begin(), &mut progress)).await;
    match &outcome {
        Ok(_) => progress.finish_clear(),
        Err(error) => progress.finish_err(&error.to_string()),
    }
    output_outcome(outcome?, flags)
}

async fn source(args: &JobSourceArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let range = source_range(args.start, args.end, args.excerpt.as_deref())?;
    let window = args.window.unwrap_or(ctx.config.search.source_window);
    let snippet = ctx.client()?.source_snippet(&args.id, range, window).await?;

    let excerpt = args
        .excerpt
        .clone()
        .unwrap_or_else(|| snippet.excerpt.clone());
    let markup = if args.html {
        Markup::Html
    } else if ui::prefs().ansi_highlight {
        Markup::Ansi
    } else {
        Markup::Brackets
    };

    let response = SourceViewResponse {
        job_id: args.id.clone(),
        located: locate_excerpt(&snippet.context, &excerpt).span().is_some(),
        rendered: highlight(&snippet.context, &excerpt, markup),
        excerpt,
        snippet,
    };

    if flags.format == OutputFormat::Table {
        println!("{}", response.rendered);
        return Ok(());
    }
    output(&response, flags.format)
}

/// Requested range, built the way an analysis item's range is: an explicit
/// end, else the excerpt length, else one char.
fn source_range(start: u64, end: Option<u64>, excerpt: Option<&str>) -> anyhow::Result<SourceRange> {
    if let Some(end) = end.filter(|&end| end <= start) {
        anyhow::bail!("--end ({end}) must be greater than --start ({start})");
    }
    let item = AnalysisItem {
        source_excerpt: excerpt.unwrap_or_default().to_string(),
        source_start: Some(i64::try_from(start).context("--start is out of range")?),
        source_end: end
            .map(i64::try_from)
            .transpose()
            .context("--end is out of range")?,
        ..AnalysisItem::default()
    };
    SourceRange::for_item(&item).context("no usable start offset")
}

/// Drive a job or task loop, cancelling its ticket on Ctrl-C.
pub async fn follow<T, F>(slot: &PollSlot, run: F) -> Result<T, JobError>
where
    F: Future<Output = Result<T, JobError>>,
{
    tokio::pin!(run);
    tokio::select! {
        outcome = &mut run => outcome,
        _ = tokio::signal::ctrl_c() => {
            tracing::debug!("interrupted; cancelling poll loop");
            slot.cancel();
            run.await
        }
    }
}

/// Print an immediate (`--no-wait`) submission: a task receipt when the
/// server created a task, else the job as it stands.
pub fn output_submission(submission: Submission, flags: &GlobalFlags) -> anyhow::Result<()> {
    match job_response(submission) {
        Ok(response) => output(&response, flags.format),
        Err((task_id, status)) => output(&task_receipt(task_id, status), flags.format),
    }
}

/// `Err` carries the task id and status of a task-backed submission.
fn job_response(submission: Submission) -> Result<JobResponse, (String, JobStatus)> {
    Ok(match submission {
        Submission::Completed { job_id, result } => JobResponse {
            job_id,
            status: JobStatus::Completed,
            result: Some(result),
            error: None,
            polls: 0,
        },
        Submission::Failed { job_id, error } => JobResponse {
            job_id,
            status: JobStatus::Failed,
            result: None,
            error: Some(error),
            polls: 0,
        },
        Submission::Pending { job_id, status } => JobResponse {
            job_id: Some(job_id),
            status,
            result: None,
            error: None,
            polls: 0,
        },
        Submission::Task { task_id, status } => return Err((task_id, status)),
    })
}

/// Print a finished job. A failed job is printed, then reported as an error.
pub fn output_outcome(outcome: JobOutcome, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = match outcome {
        JobOutcome::Completed {
            job_id,
            result,
            polls,
        } => JobResponse {
            job_id,
            status: JobStatus::Completed,
            result: Some(result),
            error: None,
            polls,
        },
        JobOutcome::Failed {
            job_id,
            error,
            polls,
        } => JobResponse {
            job_id,
            status: JobStatus::Failed,
            result: None,
            error: Some(error),
            polls,
        },
        JobOutcome::Superseded { job_id, .. } => match job_id {
            Some(job_id) => anyhow::bail!(
                "cancelled; job {job_id} keeps running on the server (see `savetime job wait {job_id}`)"
            ),
            None => anyhow::bail!("cancelled before submission"),
        },
        JobOutcome::Task(task) => return output_task_outcome(task, flags),
    };
    print_job(&response, flags)
}

fn print_job(response: &JobResponse, flags: &GlobalFlags) -> anyhow::Result<()> {
    output_with_rows(response, flags.format, || job_rows(response))?;
    if response.status == JobStatus::Failed {
        anyhow::bail!(
            "analysis failed: {}",
            response.error.as_deref().unwrap_or(st_core::job::DEFAULT_FAILURE_MESSAGE)
        );
    }
    Ok(())
}

fn job_rows(response: &JobResponse) -> Rows {
    let rows = response.result.as_ref().map_or_else(
        || {
            vec![vec![
                response.job_id.clone().unwrap_or_else(|| "-".into()),
                String::from("-"),
                response.status.to_string(),
                response.error.clone().unwrap_or_default(),
            ]]
        },
        |result| {
            result
                .tabs
                .iter()
                .flat_map(|tab| {
                    tab.items.iter().map(|item| {
                        vec![
                            tab.title.clone(),
                            item.priority.label().to_string(),
                            item.title.clone(),
                            item.guidance.clone(),
                        ]
                    })
                })
                .collect()
        },
    );
    Rows {
        headers: vec!["tab", "priority", "title", "guidance"],
        rows,
    }
}

fn record_rows(jobs: &[JobRecord]) -> Rows {
    let or_dash = |value: Option<&str>| value.unwrap_or("-").to_string();
    Rows {
        headers: vec!["id", "status", "source", "file", "error"],
        rows: jobs
            .iter()
            .map(|job| {
                vec![
                    job.job_id.clone(),
                    job.status.map_or_else(|| "-".into(), |status| status.to_string()),
                    or_dash(job.source.as_deref()),
                    or_dash(job.filename.as_deref()),
                    or_dash(job.error.as_deref()),
                ]
            })
            .collect(),
    }
}
