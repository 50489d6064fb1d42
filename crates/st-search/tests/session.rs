use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use st_config::SearchConfig;
use st_core::SearchEntity;
use st_core::search::SearchPage;
use st_search::{SearchBackend, SearchError, SearchSession};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date")
}

/// Serves `total` numbered records and records every request.
struct Catalog {
    total: u64,
    requests: Mutex<Vec<Vec<(String, String)>>>,
}

impl Catalog {
    fn new(total: u64) -> Self {
        Self {
            total,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn offsets(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("lock")
            .iter()
            .filter_map(|params| {
                params
                    .iter()
                    .find(|(key, _)| key == "offset")
                    .map(|(_, value)| value.clone())
            })
            .collect()
    }
}

fn param(params: &[(String, String)], key: &str) -> Option<u64> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .and_then(|(_, v)| v.parse().ok())
}

#[async_trait]
impl SearchBackend for Catalog {
    async fn search(
        &self,
        _entity: SearchEntity,
        params: &[(String, String)],
    ) -> Result<SearchPage, SearchError> {
        self.requests.lock().expect("lock").push(params.to_vec());
        let offset = param(params, "offset").unwrap_or(0);
        let limit = param(params, "limit").unwrap_or(20);
        let end = (offset + limit).min(self.total);
        Ok(SearchPage {
            results: (offset..end).map(|n| json!({ "id": n })).collect(),
            total: self.total,
        })
    }
}

struct Failing;

#[async_trait]
impl SearchBackend for Failing {
    async fn search(
        &self,
        _entity: SearchEntity,
        _params: &[(String, String)],
    ) -> Result<SearchPage, SearchError> {
        Err(SearchError::Request("connection reset".into()))
    }
}

fn ids(results: &[Value]) -> Vec<u64> {
    results
        .iter()
        .filter_map(|record| record.get("id").and_then(Value::as_u64))
        .collect()
}

#[tokio::test]
async fn pages_append_until_total_is_reached() {
    let catalog = Catalog::new(45);
    let mut session = SearchSession::new(SearchEntity::Contracts, SearchConfig::default());
    session.set_query("substation");

    assert_eq!(session.fresh_search(&catalog, today()).await.expect("page 0"), 20);
    assert!(session.has_more());

    assert_eq!(session.load_more(&catalog, today()).await.expect("page 1"), 20);
    assert!(session.has_more());
    assert_eq!(session.page(), 1);

    assert_eq!(session.load_more(&catalog, today()).await.expect("page 2"), 5);
    assert!(!session.has_more());

    assert_eq!(session.load_more(&catalog, today()).await.expect("no page 3"), 0);
    assert_eq!(catalog.offsets(), vec!["0", "20", "40"]);
    assert_eq!(ids(session.results()), (0..45).collect::<Vec<_>>());
    assert_eq!(session.total(), 45);
}

#[tokio::test]
async fn fresh_search_replaces_accumulated_results() {
    let catalog = Catalog::new(45);
    let mut session = SearchSession::new(SearchEntity::Contracts, SearchConfig::default());
    session.set_query("grid");
    session.fresh_search(&catalog, today()).await.expect("page 0");
    session.load_more(&catalog, today()).await.expect("page 1");
    assert_eq!(session.results().len(), 40);

    session.set_query("grid upgrade");
    session.fresh_search(&catalog, today()).await.expect("new search");
    assert_eq!(session.results().len(), 20);
    assert_eq!(session.page(), 0);
}

#[tokio::test]
async fn empty_input_is_rejected_without_a_request() {
    let catalog = Catalog::new(3);
    let mut session = SearchSession::new(SearchEntity::Personnel, SearchConfig::default());

    let error = session
        .fresh_search(&catalog, today())
        .await
        .expect_err("needs input");
    assert!(matches!(
        error,
        SearchError::EmptyQuery {
            entity: SearchEntity::Personnel
        }
    ));
    assert!(catalog.offsets().is_empty());
    assert!(!session.is_loading());

    session.tags_mut().toggle_group("1100");
    session.fresh_search(&catalog, today()).await.expect("tag counts as input");
    assert_eq!(catalog.offsets().len(), 1);
}

#[tokio::test]
async fn companies_search_with_nothing_entered() {
    let catalog = Catalog::new(3);
    let mut session = SearchSession::new(SearchEntity::Contracts, SearchConfig::default());

    assert!(session.switch_entity(SearchEntity::Companies));
    session.fresh_search(&catalog, today()).await.expect("empty allowed");
    assert_eq!(session.results().len(), 3);
}

#[test]
fn empty_query_policy_is_configurable() {
    let config = SearchConfig {
        empty_query_entities: vec![SearchEntity::Personnel],
        ..SearchConfig::default()
    };
    let mut session = SearchSession::new(SearchEntity::Companies, config);
    assert!(session.prepare_fresh(today()).is_err());
    assert!(session.switch_entity(SearchEntity::Personnel));
    assert!(session.prepare_fresh(today()).is_ok());
}

#[test]
fn response_for_a_replaced_search_is_discarded() {
    let mut session = SearchSession::new(SearchEntity::Contracts, SearchConfig::default());
    session.set_query("first");
    let first = session.prepare_fresh(today()).expect("first");
    session.set_query("second");
    let second = session.prepare_fresh(today()).expect("second");

    let late = SearchPage {
        results: vec![json!({ "id": 1 })],
        total: 1,
    };
    assert!(!session.apply(&first, late));
    assert!(session.results().is_empty());
    assert!(session.is_loading());

    let fresh = SearchPage {
        results: vec![json!({ "id": 2 })],
        total: 1,
    };
    assert!(session.apply(&second, fresh));
    assert_eq!(ids(session.results()), vec![2]);
    assert!(!session.is_loading());
}

#[test]
fn switching_entity_resets_state_and_orphans_requests() {
    let mut session = SearchSession::new(SearchEntity::Contracts, SearchConfig::default());
    session.set_query("pipeline");
    session.tags_mut().toggle_fixed_price();
    session
        .filters_mut()
        .set("industry", "energy")
        .expect("accepted key");
    let pending = session.prepare_fresh(today()).expect("pending");

    assert!(!session.switch_entity(SearchEntity::Qualifications));
    assert_eq!(session.entity(), SearchEntity::Qualifications);
    assert_eq!(session.query(), "");
    assert_eq!(session.tags(), &st_search::QuickTags::default());
    assert!(session.filters().is_empty());
    assert_eq!(session.filters().entity(), SearchEntity::Qualifications);
    assert!(!session.is_loading());

    let late = SearchPage {
        results: vec![json!({ "id": 9 })],
        total: 1,
    };
    assert!(!session.apply(&pending, late));
    assert!(session.results().is_empty());
}

#[tokio::test]
async fn failed_request_clears_loading_and_keeps_results() {
    let catalog = Catalog::new(45);
    let mut session = SearchSession::new(SearchEntity::Contracts, SearchConfig::default());
    session.set_query("grid");
    session.fresh_search(&catalog, today()).await.expect("page 0");

    let error = session
        .load_more(&Failing, today())
        .await
        .expect_err("backend fails");
    assert!(error.to_string().contains("connection reset"));
    assert!(!session.is_loading());
    assert_eq!(session.results().len(), 20);
    assert!(session.has_more());
}

#[tokio::test]
async fn failed_fresh_search_drops_the_previous_query_results() {
    let catalog = Catalog::new(45);
    let mut session = SearchSession::new(SearchEntity::Contracts, SearchConfig::default());
    session.set_query("alpha");
    session.fresh_search(&catalog, today()).await.expect("alpha page 0");
    assert!(session.has_more());

    session.set_query("beta");
    session
        .fresh_search(&Failing, today())
        .await
        .expect_err("beta fails");
    assert!(session.results().is_empty());
    assert_eq!(session.total(), 0);
    assert_eq!(session.page(), 0);
    assert!(!session.has_more());

    assert_eq!(session.load_more(&catalog, today()).await.expect("nothing to load"), 0);
    assert_eq!(catalog.offsets(), vec!["0"]);
    assert!(session.results().is_empty());
}
