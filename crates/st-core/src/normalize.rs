//! Mapping of loosely-typed analysis payloads onto [`AnalysisResult`].
//!
//! Each logical item field resolves through an ordered list of candidate
//! keys; the first non-blank string wins. Resolution happens once, here, so
//! renderers only ever see the canonical field names.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::analysis::{AnalysisItem, AnalysisResult, AnalysisTab};
use crate::enums::{Priority, TabId};

pub const TITLE_KEYS: &[&str] = &["title", "milestone", "event"];
pub const WHY_IMPORTANT_KEYS: &[&str] = &["why_important", "reason", "summary"];
pub const GUIDANCE_KEYS: &[&str] = &["guidance", "action", "recommendation"];
pub const DETAILS_KEYS: &[&str] = &["details", "notes", "impact"];
pub const MILESTONE_KEYS: &[&str] = &["milestone"];
pub const DATE_KEYS: &[&str] = &["date", "deadline"];
pub const EXCERPT_KEYS: &[&str] = &["source_excerpt"];

const TAB_TITLE_KEYS: &[&str] = &["title", "name"];

/// Title given to items that carry none of the title synonyms.
pub const DEFAULT_ITEM_TITLE: &str = "Key point";

/// Normalize a raw analysis payload.
///
/// Raw tabs are matched by `id`; when the same id appears twice the later
/// one wins. Tabs outside [`TabId::ALL`] and non-object items are dropped.
#[must_use]
pub fn normalize_result(raw: &Value) -> AnalysisResult {
    let incoming: HashMap<&str, &Map<String, Value>> = raw
        .get("tabs")
        .and_then(Value::as_array)
        .map(|tabs| {
            tabs.iter()
                .filter_map(Value::as_object)
                .filter_map(|tab| {
                    tab.get("id")
                        .and_then(Value::as_str)
                        .map(|id| (id.trim(), tab))
                })
                .collect()
        })
        .unwrap_or_default();

    let tabs = TabId::ALL
        .into_iter()
        .map(|id| {
            let source = incoming.get(id.as_str()).copied();
            let title = source
                .and_then(|tab| first_text(tab, TAB_TITLE_KEYS))
                .unwrap_or_else(|| id.default_title().to_string());
            let items = source
                .and_then(|tab| tab.get("items"))
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter(|item| item.is_object())
                        .map(normalize_item)
                        .collect()
                })
                .unwrap_or_default();
            AnalysisTab { id, title, items }
        })
        .collect();

    let summary = raw
        .as_object()
        .and_then(|map| first_text(map, &["summary"]))
        .unwrap_or_default();

    AnalysisResult { summary, tabs }
}

/// Normalize a single raw item. Non-object input yields a default item.
#[must_use]
pub fn normalize_item(raw: &Value) -> AnalysisItem {
    let empty = Map::new();
    let map = raw.as_object().unwrap_or(&empty);
    let text = |keys: &[&str]| first_text(map, keys).unwrap_or_default();

    AnalysisItem {
        title: first_text(map, TITLE_KEYS).unwrap_or_else(|| DEFAULT_ITEM_TITLE.to_string()),
        why_important: text(WHY_IMPORTANT_KEYS),
        guidance: text(GUIDANCE_KEYS),
        details: text(DETAILS_KEYS),
        milestone: text(MILESTONE_KEYS),
        date: text(DATE_KEYS),
        source_excerpt: text(EXCERPT_KEYS),
        source_start: coerce_offset(map.get("source_start")),
        source_end: coerce_offset(map.get("source_end")),
        priority: map
            .get("priority")
            .and_then(Value::as_str)
            .map_or(Priority::Medium, Priority::from_loose),
    }
}

/// First candidate whose value is a string with visible content.
fn first_text(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| map.get(*key).and_then(Value::as_str))
        .find(|value| !value.trim().is_empty())
        .map(str::to_string)
}

/// Offsets arrive as numbers or numeric strings. Anything non-finite is `None`.
#[allow(clippy::cast_possible_truncation)]
fn coerce_offset(value: Option<&Value>) -> Option<i64> {
    let number = match value? {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) if !text.trim().is_empty() => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then(|| number.trunc() as i64)
}
