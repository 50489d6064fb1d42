//! Search configuration.

use serde::{Deserialize, Serialize};
use st_core::SearchEntity;

const fn default_page_size() -> u32 {
    20
}

fn default_empty_query_entities() -> Vec<SearchEntity> {
    vec![SearchEntity::Companies]
}

const fn default_source_window() -> u32 {
    200
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Results per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Entities that may be searched with no text and no filters.
    #[serde(default = "default_empty_query_entities")]
    pub empty_query_entities: Vec<SearchEntity>,

    /// Characters of context requested around a source excerpt.
    #[serde(default = "default_source_window")]
    pub source_window: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            empty_query_entities: default_empty_query_entities(),
            source_window: default_source_window(),
        }
    }
}

impl SearchConfig {
    pub fn allows_empty_query(&self, entity: SearchEntity) -> bool {
        self.empty_query_entities.contains(&entity)
    }
}
