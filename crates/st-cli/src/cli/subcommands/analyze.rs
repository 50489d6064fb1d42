use std::path::PathBuf;

use clap::{Args, Subcommand};

#[derive(Clone, Debug, Subcommand)]
pub enum AnalyzeCommands {
    /// Analyze text given inline, or `-` for stdin.
    Text(AnalyzeTextArgs),
    /// Upload and analyze a file.
    File(AnalyzeFileArgs),
    /// Split the workload of an Excel feature list across roles.
    Workload(AnalyzeWorkloadArgs),
    /// Estimate the cost of an Excel feature list.
    Costing(AnalyzeCostingArgs),
}

#[derive(Clone, Debug, Args)]
pub struct AnalyzeTextArgs {
    pub text: String,
    /// Submission path for this job, replacing `api.analyze_text_endpoint`
    /// (e.g. `/bidding/analyze/text`).
    #[arg(long)]
    pub endpoint: Option<String>,
    /// Print the job id and return without polling.
    #[arg(long)]
    pub no_wait: bool,
}

#[derive(Clone, Debug, Args)]
pub struct AnalyzeFileArgs {
    pub path: PathBuf,
    /// Upload path for this job, replacing `api.analyze_file_endpoint`.
    #[arg(long)]
    pub endpoint: Option<String>,
    #[arg(long)]
    pub no_wait: bool,
}

#[derive(Clone, Debug, Args)]
pub struct AnalyzeWorkloadArgs {
    /// Excel feature list.
    pub path: PathBuf,
    /// Allocation strategy label.
    #[arg(long, default_value = st_core::workload::DEFAULT_STRATEGY)]
    pub strategy: String,
    /// Cap on total person-months.
    #[arg(long)]
    pub total_limit: Option<f64>,
    /// Upload path, replacing `api.workload_endpoint`.
    #[arg(long)]
    pub endpoint: Option<String>,
    /// Print the task id and return without polling.
    #[arg(long)]
    pub no_wait: bool,
}

#[derive(Clone, Debug, Args)]
pub struct AnalyzeCostingArgs {
    /// Excel feature list.
    pub path: PathBuf,
    /// Monthly rate override as role=amount (repeatable), e.g. `qa=9000`.
    #[arg(long = "rate")]
    pub rates: Vec<String>,
    /// Architect share of the total, 0 to 1.
    #[arg(long)]
    pub architect_ratio: Option<f64>,
    /// Project manager share of the total, 0 to 1.
    #[arg(long)]
    pub pm_ratio: Option<f64>,
    /// Upload path, replacing `api.costing_endpoint`.
    #[arg(long)]
    pub endpoint: Option<String>,
    /// Print the task id and return without polling.
    #[arg(long)]
    pub no_wait: bool,
}
