use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use st_core::excerpt::{NOT_LOCATED_NOTE, highlight_html};
use st_core::{AnalysisResult, Priority, TabId, normalize_item, normalize_result};

fn tab_ids(result: &AnalysisResult) -> Vec<TabId> {
    result.tabs.iter().map(|tab| tab.id).collect()
}

#[rstest]
#[case(json!({}))]
#[case(json!({ "tabs": [] }))]
#[case(json!({ "tabs": [{ "id": "bid_timeline", "items": [] }] }))]
#[case(json!({ "tabs": [
    { "id": "cost_items", "items": [{}] },
    { "id": "hard_requirements", "items": [{ "title": "License" }] },
    { "id": "unknown", "items": [{}] },
] }))]
#[case(json!({ "tabs": [{ "items": [{ "title": "no id" }] }, 7, null] }))]
fn every_result_has_the_fixed_tabs_in_order(#[case] raw: Value) {
    let result = normalize_result(&raw);
    assert_eq!(tab_ids(&result), TabId::ALL.to_vec());
}

#[rstest]
#[case(json!("critical"))]
#[case(json!("Medium"))]
#[case(json!("severe"))]
#[case(json!(3))]
#[case(json!(null))]
#[case(json!(["high"]))]
fn priority_is_always_in_the_known_set(#[case] priority: Value) {
    let item = normalize_item(&json!({ "title": "x", "priority": priority }));
    assert!(Priority::ALL.contains(&item.priority));
}

#[test]
fn renormalizing_a_normalized_item_is_a_no_op() {
    let raw = json!({
        "tabs": [{
            "id": "scoring_items",
            "items": [
                {
                    "event": "Technical score",
                    "reason": "Weighted 60%",
                    "action": "Attach case studies",
                    "notes": "Three references required",
                    "deadline": "2024-07-01",
                    "source_excerpt": "技术分60分",
                    "source_start": "120",
                    "source_end": 126.0,
                    "priority": "HIGH",
                },
                {},
            ],
        }],
    });

    let once = normalize_result(&raw);
    for tab in &once.tabs {
        for item in &tab.items {
            let serialized = serde_json::to_value(item).expect("serialize item");
            assert_eq!(&normalize_item(&serialized), item);
        }
    }

    let serialized = serde_json::to_value(&once).expect("serialize result");
    assert_eq!(normalize_result(&serialized), once);
}

#[test]
fn excerpt_highlight_marks_only_the_excerpt() {
    assert_eq!(
        highlight_html("ABCexcerptXYZ", "excerpt"),
        "ABC<mark>excerpt</mark>XYZ"
    );
    assert_eq!(
        highlight_html("A&B<tag>", "missing"),
        format!("A&amp;B&lt;tag&gt;\n\n{NOT_LOCATED_NOTE}")
    );
}

#[test]
fn completed_job_payload_yields_all_default_tabs() {
    let result = normalize_result(&json!({ "summary": "ok", "tabs": [] }));
    assert_eq!(result.summary, "ok");
    assert_eq!(tab_ids(&result), TabId::ALL.to_vec());
    for tab in &result.tabs {
        assert_eq!(tab.title, tab.id.default_title());
        assert!(tab.items.is_empty());
    }
}
