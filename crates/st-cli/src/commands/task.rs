use st_client::tasks::TaskQuery;
use st_core::JobStatus;
use st_core::responses::TaskRunResponse;
use st_core::task::{DEFAULT_TASK_FAILURE, TaskSummary, task_type_label};
use st_jobs::{JobRunner, PollPolicy, PollSlot, TaskOutcome};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TaskCommands;
use crate::commands::job::follow;
use crate::context::AppContext;
use crate::output::{Rows, output, output_with_rows};
use crate::progress::Progress;

/// Handle `savetime task <subcommand>`.
pub async fn handle(action: &TaskCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = ctx.client()?;
    match action {
        TaskCommands::List { status, task_type } => {
            let query = TaskQuery {
                limit: flags.limit,
                task_type: task_type.clone(),
                status: status.clone(),
            };
            let tasks = client.tasks(&query).await?;
            output_with_rows(&tasks, flags.format, || task_rows(&tasks))
        }
        TaskCommands::History { task_type } => {
            let query = TaskQuery {
                limit: flags.limit,
                task_type: task_type.clone(),
                status: None,
            };
            let tasks = client.task_history(&query).await?;
            output_with_rows(&tasks, flags.format, || task_rows(&tasks))
        }
        TaskCommands::Get { id } => output(&client.task(id).await?, flags.format),
        TaskCommands::Wait { id } => {
            let runner = JobRunner::new(client, PollPolicy::from(&ctx.config.polling));
            let slot = PollSlot::new();
            let mut progress = Progress::spinner(&format!("waiting for task {id}"));
            let outcome = follow(&slot, runner.await_task(id, slot.begin(), &mut progress)).await;
            match &outcome {
                Ok(_) => progress.finish_clear(),
                Err(error) => progress.finish_err(&error.to_string()),
            }
            output_task_outcome(outcome?, flags)
        }
    }
}

/// Receipt for a task that was created but not followed.
pub const fn task_receipt(task_id: String, status: JobStatus) -> TaskRunResponse {
    TaskRunResponse {
        task_id,
        status,
        result: None,
        error: None,
        polls: 0,
    }
}

/// Print a finished task. A failed task is printed, then reported as an error.
pub fn output_task_outcome(outcome: TaskOutcome, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = match outcome {
        TaskOutcome::Succeeded {
            task_id,
            result,
            polls,
        } => TaskRunResponse {
            task_id,
            status: JobStatus::Completed,
            result,
            error: None,
            polls,
        },
        TaskOutcome::Failed {
            task_id,
            error,
            polls,
        } => TaskRunResponse {
            task_id,
            status: JobStatus::Failed,
            result: None,
            error: Some(error),
            polls,
        },
        TaskOutcome::Superseded { task_id, .. } => anyhow::bail!(
            "cancelled; task {task_id} keeps running on the server (see `savetime task wait {task_id}`)"
        ),
    };
    output(&response, flags.format)?;
    if response.status == JobStatus::Failed {
        anyhow::bail!(
            "task failed: {}",
            response.error.as_deref().unwrap_or(DEFAULT_TASK_FAILURE)
        );
    }
    Ok(())
}

fn task_rows(tasks: &[TaskSummary]) -> Rows {
    Rows {
        headers: vec!["id", "type", "status", "created", "error"],
        rows: tasks
            .iter()
            .map(|task| {
                vec![
                    task.id.clone(),
                    task_type_label(&task.task_type).to_string(),
                    task.status.clone(),
                    task.created_at.clone().unwrap_or_else(|| "-".into()),
                    task.error_message.clone().unwrap_or_else(|| "-".into()),
                ]
            })
            .collect(),
    }
}
