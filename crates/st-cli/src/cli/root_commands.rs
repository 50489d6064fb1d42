use clap::{Args, Subcommand};
use st_core::SearchEntity;
use st_search::IpKind;

use crate::cli::subcommands::{AnalyzeCommands, AuthCommands, JobCommands, TaskCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Authentication.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Submit a document for analysis.
    Analyze {
        #[command(subcommand)]
        action: AnalyzeCommands,
    },
    /// Inspect submitted analysis jobs.
    Job {
        #[command(subcommand)]
        action: JobCommands,
    },
    /// Search contracts, qualifications, IP, personnel or companies.
    Search(SearchArgs),
    /// Server-side task history.
    Task {
        #[command(subcommand)]
        action: TaskCommands,
    },
    /// Dump JSON schema for a registered type.
    Schema(SchemaArgs),
}

/// Arguments for `savetime search`.
#[derive(Clone, Debug, Args)]
pub struct SearchArgs {
    /// contracts, qualifications, ip, personnel or companies.
    pub entity: SearchEntity,
    /// Free-text query.
    pub query: Option<String>,
    /// Drawer filter as key=value (repeatable).
    #[arg(long)]
    pub filter: Vec<String>,
    /// Fixed-price contracts only.
    #[arg(long)]
    pub fp: bool,
    /// Finished contracts only.
    #[arg(long)]
    pub completed: bool,
    /// Contracts started within the last N years.
    #[arg(long)]
    pub years: Option<u32>,
    /// Minimum contract amount in units of 10 000.
    #[arg(long)]
    pub min_wan: Option<u32>,
    /// Company code.
    #[arg(long)]
    pub group: Option<String>,
    /// Business-type shortcut.
    #[arg(long)]
    pub category: Option<String>,
    /// patent, copyright or trademark.
    #[arg(long)]
    pub ip_kind: Option<IpKind>,
    /// Unexpired qualifications only.
    #[arg(long)]
    pub not_expired: bool,
    /// Zero-based page to show; earlier pages are loaded first.
    #[arg(long, default_value_t = 0)]
    pub page: u32,
    /// Print `Label: value` blocks ready to paste instead of a table.
    #[arg(long)]
    pub copy: bool,
}

/// Arguments for `savetime schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Registered type name (e.g. `analysis_result`).
    pub type_name: String,
}
