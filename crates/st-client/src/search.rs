use st_core::SearchEntity;
use st_core::search::SearchPage;

use crate::http::decode;
use crate::{ApiClient, ClientError};

impl ApiClient {
    /// `GET /search/{entity}` with pre-composed parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, status or decode failures.
    pub async fn search_page(
        &self,
        entity: SearchEntity,
        params: &[(String, String)],
    ) -> Result<SearchPage, ClientError> {
        let path = format!("/search/{}", entity.path_segment());
        let body = self.get_json(&path, params).await?;
        decode(body, "search page")
    }
}
