//! # st-core
//!
//! Core types, normalization, and error types for SaveTime.
//!
//! This crate provides the foundational types shared across all SaveTime crates:
//! - Analysis result schema (fixed tabs of categorized items)
//! - The normalizer that maps loose server payloads onto that schema
//! - Source excerpt location and highlighting
//! - Job, search, task, and identity wire types
//! - Workload and costing upload options
//! - Status and entity enums
//! - Cross-cutting error types
//! - CLI response types

pub mod analysis;
pub mod enums;
pub mod errors;
pub mod excerpt;
pub mod identity;
pub mod job;
pub mod normalize;
pub mod responses;
pub mod search;
pub mod task;
mod wire;
pub mod workload;

pub use analysis::{AnalysisItem, AnalysisResult, AnalysisTab};
pub use enums::{JobStatus, Priority, SearchEntity, TabId};
pub use errors::CoreError;
pub use normalize::{normalize_item, normalize_result};
