//! Display schema for analysis results.
//!
//! Every result produced by [`crate::normalize_result`] carries exactly the
//! tabs in [`TabId::ALL`], in that order, so renderers never branch on tab
//! existence.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Priority, TabId};

/// A single categorized finding inside an analysis tab.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisItem {
    pub title: String,
    #[serde(default)]
    pub why_important: String,
    #[serde(default)]
    pub guidance: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub milestone: String,
    #[serde(default)]
    pub date: String,
    /// Verbatim text the finding was drawn from.
    #[serde(default)]
    pub source_excerpt: String,
    /// Character offset of the excerpt in the submitted document.
    #[serde(default)]
    pub source_start: Option<i64>,
    #[serde(default)]
    pub source_end: Option<i64>,
    #[serde(default)]
    pub priority: Priority,
}

/// A tab of items sharing a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisTab {
    pub id: TabId,
    pub title: String,
    pub items: Vec<AnalysisItem>,
}

/// Normalized analysis output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResult {
    pub summary: String,
    pub tabs: Vec<AnalysisTab>,
}

impl AnalysisResult {
    /// A result with every tab present and no items.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            summary: String::new(),
            tabs: TabId::ALL
                .into_iter()
                .map(|id| AnalysisTab {
                    id,
                    title: id.default_title().to_string(),
                    items: Vec::new(),
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn tab(&self, id: TabId) -> Option<&AnalysisTab> {
        self.tabs.iter().find(|tab| tab.id == id)
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.tabs.iter().map(|tab| tab.items.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_has_every_tab_in_order() {
        let result = AnalysisResult::empty();
        let ids: Vec<TabId> = result.tabs.iter().map(|tab| tab.id).collect();
        assert_eq!(ids, TabId::ALL.to_vec());
        assert_eq!(result.item_count(), 0);
    }

    #[test]
    fn tab_lookup_finds_items_by_id() {
        let mut result = AnalysisResult::empty();
        result.tabs[3].items.push(AnalysisItem {
            title: "Data sheet".into(),
            ..Default::default()
        });
        assert_eq!(result.item_count(), 1);
        assert_eq!(
            result
                .tab(TabId::TechnicalRequirements)
                .map(|tab| tab.items.len()),
            Some(1)
        );
    }
}
