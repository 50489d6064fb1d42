use clap::{Args, Subcommand};

#[derive(Clone, Debug, Subcommand)]
pub enum JobCommands {
    /// Fetch the current state of a job once.
    Status { id: String },
    /// Poll a job until it completes or fails.
    Wait { id: String },
    /// Show the source text around an analysis item.
    Source(JobSourceArgs),
    /// Jobs you submitted, without their results.
    List,
    /// Delete a job and its stored source text.
    Delete { id: String },
}

#[derive(Clone, Debug, Args)]
pub struct JobSourceArgs {
    pub id: String,
    /// Character offset of the excerpt.
    #[arg(long)]
    pub start: u64,
    /// End offset; defaults to start + excerpt length.
    #[arg(long)]
    pub end: Option<u64>,
    /// Characters of context on each side.
    #[arg(long)]
    pub window: Option<u32>,
    /// Excerpt to highlight inside the context.
    #[arg(long)]
    pub excerpt: Option<String>,
    /// Render highlighted HTML instead of terminal markup.
    #[arg(long)]
    pub html: bool,
}
