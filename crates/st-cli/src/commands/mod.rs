pub mod analyze;
pub mod auth;
pub mod dispatch;
pub mod job;
pub mod schema;
pub mod search;
pub mod shared;
pub mod task;
