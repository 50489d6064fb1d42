//! # st-search
//!
//! Entity search composition for SaveTime.
//!
//! Free text, quick tags and drawer filters are merged into per-entity query
//! parameters ([`build_params`]); a [`SearchSession`] tracks pagination and
//! discards responses that arrive after the search they answer was replaced.

pub mod backend;
pub mod compose;
pub mod display;
pub mod entity;
pub mod error;
pub mod filters;
pub mod paging;
pub mod session;
pub mod tags;

pub use backend::SearchBackend;
pub use compose::{SearchInput, build_params};
pub use entity::{EntityProfile, TagKind, profile};
pub use error::SearchError;
pub use filters::DrawerFilters;
pub use session::{PendingSearch, SearchSession};
pub use tags::{IpKind, QuickTags};
