pub mod analyze;
pub mod auth;
pub mod job;
pub mod task;

pub use analyze::AnalyzeCommands;
pub use auth::AuthCommands;
pub use job::JobCommands;
pub use task::TaskCommands;
