use std::path::Path;

use st_client::ApiClient;
use st_core::workload::{CostingConfig, WorkloadConfig};
use st_jobs::{JobRequest, JobRunner, PollPolicy, PollSlot};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AnalyzeCommands;
use crate::cli::subcommands::analyze::{AnalyzeCostingArgs, AnalyzeWorkloadArgs};
use crate::commands::job::{follow, output_outcome, output_submission};
use crate::commands::shared::{read_text_arg, require_text};
use crate::context::AppContext;
use crate::progress::Progress;

/// Handle `savetime analyze <subcommand>`.
pub async fn handle(action: &AnalyzeCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let api = &ctx.config.api;
    let (request, no_wait) = match action {
        AnalyzeCommands::Text(args) => {
            let text = read_text_arg(&args.text)?;
            require_text(&text)?;
            (with_endpoint(JobRequest::text(text), args.endpoint.as_deref()), args.no_wait)
        }
        AnalyzeCommands::File(args) => {
            require_file(&args.path)?;
            (
                with_endpoint(JobRequest::file(&args.path), args.endpoint.as_deref()),
                args.no_wait,
            )
        }
        AnalyzeCommands::Workload(args) => (
            workload_request(args, &api.workload_endpoint)?,
            args.no_wait,
        ),
        AnalyzeCommands::Costing(args) => (
            costing_request(args, &api.costing_endpoint)?,
            args.no_wait,
        ),
    };

    let runner = JobRunner::new(ctx.client()?, PollPolicy::from(&ctx.config.polling));
    if no_wait {
        submit_only(&runner, &request, flags).await
    } else {
        submit_and_wait(&runner, &request, flags).await
    }
}

fn require_file(path: &Path) -> anyhow::Result<()> {
    if !path.is_file() {
        anyhow::bail!("no such file: {}", path.display());
    }
    Ok(())
}

fn with_endpoint(request: JobRequest, endpoint: Option<&str>) -> JobRequest {
    match endpoint.map(str::trim).filter(|endpoint| !endpoint.is_empty()) {
        Some(endpoint) => request.with_endpoint(endpoint),
        None => request,
    }
}

/// Upload with options; the server answers with a task.
fn workload_request(args: &AnalyzeWorkloadArgs, default_endpoint: &str) -> anyhow::Result<JobRequest> {
    require_file(&args.path)?;
    let config = WorkloadConfig::new(Some(&args.strategy), args.total_limit)?;
    let endpoint = args.endpoint.as_deref().or(Some(default_endpoint));
    Ok(with_endpoint(JobRequest::file(&args.path), endpoint).with_config(config.form_value()?))
}

fn costing_request(args: &AnalyzeCostingArgs, default_endpoint: &str) -> anyhow::Result<JobRequest> {
    require_file(&args.path)?;
    let mut config = CostingConfig::default();
    for pair in &args.rates {
        config.set_rate_pair(pair)?;
    }
    config.set_ratios(args.architect_ratio, args.pm_ratio)?;
    let endpoint = args.endpoint.as_deref().or(Some(default_endpoint));
    Ok(with_endpoint(JobRequest::file(&args.path), endpoint).with_config(config.form_value()?))
}

async fn submit_only(
    runner: &JobRunner<ApiClient>,
    request: &JobRequest,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    output_submission(runner.submit(request).await?, flags)
}

async fn submit_and_wait(
    runner: &JobRunner<ApiClient>,
    request: &JobRequest,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let slot = PollSlot::new();
    let mut progress = Progress::spinner("submitting document");
    let outcome = follow(&slot, runner.run(request, slot.begin(), &mut progress)).await;
    match &outcome {
        Ok(_) => progress.finish_clear(),
        Err(error) => progress.finish_err(&error.to_string()),
    }
    output_outcome(outcome?, flags)
}
