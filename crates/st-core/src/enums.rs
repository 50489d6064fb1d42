//! Priority levels, analysis tabs, job states, and search entities.
//!
//! All enums serialize as `snake_case`. Values that arrive from the server in
//! a loose vocabulary go through explicit folding constructors
//! (`Priority::from_loose`, `JobStatus::from_wire`) so unknown values map onto
//! a known variant instead of failing the whole payload.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Priority attached to an analysis item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Self; 4] = [Self::Critical, Self::High, Self::Medium, Self::Low];

    /// Fold a server-supplied priority onto a known level.
    ///
    /// Matching is case-insensitive; anything unrecognized becomes `Medium`.
    #[must_use]
    pub fn from_loose(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "critical" => Self::Critical,
            "high" => Self::High,
            "low" => Self::Low,
            _ => Self::Medium,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Human-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TabId
// ---------------------------------------------------------------------------

/// The fixed set of analysis tabs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TabId {
    HardRequirements,
    ScoringItems,
    SubmissionFormat,
    TechnicalRequirements,
    CostItems,
    BidTimeline,
}

impl TabId {
    /// Every tab, in the order the normalizer emits them.
    pub const ALL: [Self; 6] = [
        Self::HardRequirements,
        Self::ScoringItems,
        Self::SubmissionFormat,
        Self::TechnicalRequirements,
        Self::CostItems,
        Self::BidTimeline,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HardRequirements => "hard_requirements",
            Self::ScoringItems => "scoring_items",
            Self::SubmissionFormat => "submission_format",
            Self::TechnicalRequirements => "technical_requirements",
            Self::CostItems => "cost_items",
            Self::BidTimeline => "bid_timeline",
        }
    }

    /// Title used when the server omits one.
    #[must_use]
    pub const fn default_title(self) -> &'static str {
        match self {
            Self::HardRequirements => "Hard requirements",
            Self::ScoringItems => "Scoring items",
            Self::SubmissionFormat => "Submission format",
            Self::TechnicalRequirements => "Technical requirements",
            Self::CostItems => "Cost items",
            Self::BidTimeline => "Bid timeline",
        }
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TabId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tab| tab.as_str() == s.trim())
            .ok_or_else(|| CoreError::Validation(format!("unknown analysis tab '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// JobStatus
// ---------------------------------------------------------------------------

/// Logical state of a server-side analysis job.
///
/// ```text
/// pending → processing → completed
///                      → failed
/// ```
///
/// The wire vocabulary is wider (`queued`, `running`, `retry`, `succeeded`,
/// `cancelled`); [`JobStatus::from_wire`] folds it onto these four states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Fold a wire status onto a logical state. Unknown values are treated as
    /// still processing so the caller keeps polling.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" | "queued" | "retry" => Self::Pending,
            "completed" | "succeeded" | "success" => Self::Completed,
            "failed" | "cancelled" | "canceled" | "error" => Self::Failed,
            _ => Self::Processing,
        }
    }

    /// `completed` and `failed` end the polling loop.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for JobStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&raw))
    }
}

// ---------------------------------------------------------------------------
// SearchEntity
// ---------------------------------------------------------------------------

/// Searchable entity tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SearchEntity {
    Contracts,
    Qualifications,
    IntellectualProperty,
    Personnel,
    Companies,
}

impl SearchEntity {
    pub const ALL: [Self; 5] = [
        Self::Contracts,
        Self::Qualifications,
        Self::IntellectualProperty,
        Self::Personnel,
        Self::Companies,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contracts => "contracts",
            Self::Qualifications => "qualifications",
            Self::IntellectualProperty => "intellectual_property",
            Self::Personnel => "personnel",
            Self::Companies => "companies",
        }
    }

    /// Path segment under `/search/`.
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Contracts => "contracts",
            Self::Qualifications => "qualifications",
            Self::IntellectualProperty => "assets",
            Self::Personnel => "employees",
            Self::Companies => "companies",
        }
    }
}

impl fmt::Display for SearchEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchEntity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "contracts" | "contract" => Ok(Self::Contracts),
            "qualifications" | "qualification" | "quals" => Ok(Self::Qualifications),
            "intellectual_property" | "ip" | "assets" => Ok(Self::IntellectualProperty),
            "personnel" | "employees" | "employee" | "people" => Ok(Self::Personnel),
            "companies" | "company" => Ok(Self::Companies),
            _ => Err(CoreError::Validation(format!("unknown search entity '{s}'"))),
        }
    }
}
