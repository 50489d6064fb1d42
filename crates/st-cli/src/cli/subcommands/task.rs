use clap::Subcommand;

#[derive(Clone, Debug, Subcommand)]
pub enum TaskCommands {
    /// Active tasks.
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        task_type: Option<String>,
    },
    /// Finished tasks.
    History {
        #[arg(long)]
        task_type: Option<String>,
    },
    /// One task with its payloads.
    Get { id: String },
    /// Poll a task until it succeeds or fails.
    Wait { id: String },
}
