use async_trait::async_trait;
use st_core::SearchEntity;
use st_core::search::SearchPage;

use crate::error::SearchError;

/// Transport for `GET /search/{entity}`.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(
        &self,
        entity: SearchEntity,
        params: &[(String, String)],
    ) -> Result<SearchPage, SearchError>;
}
