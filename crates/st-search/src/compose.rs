//! Query parameter composition.
//!
//! Order of application: free text, fixed entity parameters, drawer values,
//! then quick-tag values for keys the drawer left unset, then paging.

use chrono::{Months, NaiveDate};
use st_core::SearchEntity;

use crate::entity::{TagKind, profile};
use crate::filters::DrawerFilters;
use crate::paging;
use crate::tags::QuickTags;

/// Status value the server uses for finished contracts.
pub const COMPLETED_STATUS: &str = "已完结";

/// Everything needed to build one request.
#[derive(Debug, Clone, Copy)]
pub struct SearchInput<'a> {
    pub entity: SearchEntity,
    pub query: &'a str,
    pub tags: &'a QuickTags,
    pub filters: &'a DrawerFilters,
    pub page: u32,
    pub limit: u32,
}

impl SearchInput<'_> {
    /// Whether the user supplied text, a drawer filter, or a relevant tag.
    pub fn has_input(&self) -> bool {
        !self.query.trim().is_empty()
            || self
                .filters
                .iter()
                .any(|(key, _)| profile(self.entity).accepts(key))
            || self.tags.is_active_for(self.entity)
    }
}

/// Compose the query string pairs for `GET /search/{entity}`.
///
/// `today` anchors the "last N years" tag.
pub fn build_params(input: &SearchInput<'_>, today: NaiveDate) -> Vec<(String, String)> {
    let vocabulary = profile(input.entity);
    let mut params: Vec<(String, String)> = Vec::new();

    let mut query = input.query.trim().to_string();
    if vocabulary.supports(TagKind::IpKind)
        && let Some(kind) = input.tags.ip_kind
    {
        if !query.is_empty() {
            query.push(' ');
        }
        query.push_str(kind.search_term());
    }
    if !query.is_empty() {
        params.push(("q".into(), query));
    }

    for (key, value) in vocabulary.fixed_params {
        params.push(((*key).into(), (*value).into()));
    }

    for (key, value) in input.filters.iter() {
        if vocabulary.accepts(key) {
            params.push((key.into(), value.into()));
        }
    }

    for (key, value) in tag_params(input.entity, input.tags, today) {
        if !params.iter().any(|(existing, _)| existing == key) {
            params.push((key.into(), value));
        }
    }

    params.push(("limit".into(), input.limit.to_string()));
    params.push((
        "offset".into(),
        paging::offset(input.page, input.limit).to_string(),
    ));
    params
}

fn tag_params(entity: SearchEntity, tags: &QuickTags, today: NaiveDate) -> Vec<(&'static str, String)> {
    let vocabulary = profile(entity);
    let mut out = Vec::new();
    for kind in vocabulary.tags {
        if !tags.is_set(*kind) {
            continue;
        }
        match kind {
            TagKind::FixedPrice => out.push(("is_fp", "true".to_string())),
            TagKind::Completed => out.push(("status", COMPLETED_STATUS.to_string())),
            TagKind::Years => {
                if let Some(start) = tags.years.and_then(|years| years_before(today, years)) {
                    out.push(("start_date", start.format("%Y-%m-%d").to_string()));
                }
            }
            TagKind::MinAmount => {
                if let Some(wan) = tags.min_wan {
                    out.push(("min_amount", (u64::from(wan) * 10_000).to_string()));
                }
            }
            TagKind::Group => {
                if let Some(code) = tags.group.as_deref() {
                    out.push(("company", code.trim().to_string()));
                }
            }
            TagKind::Category => {
                if let Some(category) = tags.category.as_deref() {
                    out.push(("business_type", category.trim().to_string()));
                }
            }
            TagKind::NotExpired => out.push(("is_expired", "false".to_string())),
            // Folded into `q`.
            TagKind::IpKind => {}
        }
    }
    out
}

/// `today` minus whole years; Feb 29 lands on Feb 28.
fn years_before(today: NaiveDate, years: u32) -> Option<NaiveDate> {
    today.checked_sub_months(Months::new(years.checked_mul(12)?))
}
