//! Search state for one entity tab.
//!
//! A [`SearchSession`] owns the query, quick tags, drawer filters and the
//! accumulated result list. Every request carries the generation it was
//! prepared under; a response whose generation is no longer current is
//! dropped.

use chrono::NaiveDate;
use serde_json::Value;
use st_config::SearchConfig;
use st_core::SearchEntity;
use st_core::search::SearchPage;
use tracing::debug;

use crate::backend::SearchBackend;
use crate::compose::{SearchInput, build_params};
use crate::error::SearchError;
use crate::filters::DrawerFilters;
use crate::paging;
use crate::tags::QuickTags;

/// A request prepared by the session, to be answered with
/// [`SearchSession::apply`] or [`SearchSession::fail`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSearch {
    pub generation: u64,
    pub entity: SearchEntity,
    pub page: u32,
    pub params: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct SearchSession {
    config: SearchConfig,
    entity: SearchEntity,
    query: String,
    tags: QuickTags,
    filters: DrawerFilters,
    page: u32,
    results: Vec<Value>,
    total: u64,
    has_more: bool,
    generation: u64,
    in_flight: Option<u64>,
}

impl SearchSession {
    pub fn new(entity: SearchEntity, config: SearchConfig) -> Self {
        Self {
            config,
            entity,
            query: String::new(),
            tags: QuickTags::default(),
            filters: DrawerFilters::new(entity),
            page: 0,
            results: Vec::new(),
            total: 0,
            has_more: false,
            generation: 0,
            in_flight: None,
        }
    }

    pub const fn entity(&self) -> SearchEntity {
        self.entity
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub const fn tags(&self) -> &QuickTags {
        &self.tags
    }

    pub const fn tags_mut(&mut self) -> &mut QuickTags {
        &mut self.tags
    }

    pub const fn filters(&self) -> &DrawerFilters {
        &self.filters
    }

    pub const fn filters_mut(&mut self) -> &mut DrawerFilters {
        &mut self.filters
    }

    pub fn results(&self) -> &[Value] {
        &self.results
    }

    pub const fn total(&self) -> u64 {
        self.total
    }

    pub const fn page(&self) -> u32 {
        self.page
    }

    pub const fn limit(&self) -> u32 {
        self.config.page_size
    }

    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    pub const fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Move to another entity, dropping all state and any request in flight.
    ///
    /// Returns whether the new entity should be searched right away.
    pub fn switch_entity(&mut self, entity: SearchEntity) -> bool {
        debug!(from = %self.entity, to = %entity, "switching search entity");
        *self = Self {
            generation: self.generation + 1,
            ..Self::new(entity, self.config.clone())
        };
        self.config.allows_empty_query(entity)
    }

    /// Prepare page 0 of a new search.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::EmptyQuery`] when the entity needs input and
    /// none is present. Nothing is sent in that case.
    pub fn prepare_fresh(&mut self, today: NaiveDate) -> Result<PendingSearch, SearchError> {
        if !self.config.allows_empty_query(self.entity) && !self.input(0).has_input() {
            return Err(SearchError::EmptyQuery {
                entity: self.entity,
            });
        }
        // A new search owns the list from here on, even if its request fails.
        self.results.clear();
        self.page = 0;
        self.total = 0;
        self.has_more = false;
        Ok(self.issue(0, today))
    }

    /// Prepare the next page, or `None` when there is none or a request is
    /// already in flight.
    pub fn prepare_more(&mut self, today: NaiveDate) -> Option<PendingSearch> {
        if !self.has_more || self.in_flight.is_some() {
            return None;
        }
        Some(self.issue(self.page + 1, today))
    }

    /// Record a response. Page 0 replaces the list; later pages append.
    ///
    /// Returns `false` when the response is stale and was discarded.
    pub fn apply(&mut self, pending: &PendingSearch, page: SearchPage) -> bool {
        if !self.is_current(pending) {
            debug!(
                generation = pending.generation,
                current = self.generation,
                "discarding stale search response"
            );
            return false;
        }

        if pending.page == 0 {
            self.results = page.results;
        } else {
            self.results.extend(page.results);
        }
        self.page = pending.page;
        self.total = page.total;
        self.has_more = paging::has_more(pending.page, self.limit(), page.total);
        self.in_flight = None;
        true
    }

    /// Record a failed request. Returns `false` when it was already stale.
    pub fn fail(&mut self, pending: &PendingSearch) -> bool {
        if !self.is_current(pending) {
            return false;
        }
        self.in_flight = None;
        true
    }

    /// Run page 0 against `backend` and replace the results.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::prepare_fresh`] and backend errors.
    pub async fn fresh_search<B>(
        &mut self,
        backend: &B,
        today: NaiveDate,
    ) -> Result<usize, SearchError>
    where
        B: SearchBackend + ?Sized,
    {
        let pending = self.prepare_fresh(today)?;
        self.execute(backend, pending).await
    }

    /// Fetch and append the next page. Returns the number of new records,
    /// zero when there is nothing more to load.
    ///
    /// # Errors
    ///
    /// Propagates backend errors.
    pub async fn load_more<B>(&mut self, backend: &B, today: NaiveDate) -> Result<usize, SearchError>
    where
        B: SearchBackend + ?Sized,
    {
        match self.prepare_more(today) {
            Some(pending) => self.execute(backend, pending).await,
            None => Ok(0),
        }
    }

    async fn execute<B>(&mut self, backend: &B, pending: PendingSearch) -> Result<usize, SearchError>
    where
        B: SearchBackend + ?Sized,
    {
        match backend.search(pending.entity, &pending.params).await {
            Ok(page) => {
                let received = page.results.len();
                self.apply(&pending, page);
                Ok(received)
            }
            Err(error) => {
                self.fail(&pending);
                Err(error)
            }
        }
    }

    fn issue(&mut self, page: u32, today: NaiveDate) -> PendingSearch {
        self.generation += 1;
        self.in_flight = Some(self.generation);
        PendingSearch {
            generation: self.generation,
            entity: self.entity,
            page,
            params: build_params(&self.input(page), today),
        }
    }

    fn input(&self, page: u32) -> SearchInput<'_> {
        SearchInput {
            entity: self.entity,
            query: self.query.as_str(),
            tags: &self.tags,
            filters: &self.filters,
            page,
            limit: self.config.page_size,
        }
    }

    fn is_current(&self, pending: &PendingSearch) -> bool {
        pending.generation == self.generation && pending.entity == self.entity
    }
}
