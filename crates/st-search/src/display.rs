//! Record summaries for table output and copy text.
//!
//! Records are untyped; each displayed field resolves through an ordered
//! list of candidate keys, first non-blank value wins.

use std::fmt::Write as _;

use serde_json::Value;
use st_core::SearchEntity;

/// One displayed field: label and candidate keys.
pub type Field = (&'static str, &'static [&'static str]);

const CONTRACT_FIELDS: &[Field] = &[
    ("Number", &["contract_number", "contract_no"]),
    ("Title", &["contract_title", "project_name"]),
    ("Customer", &["customer_name", "client_name", "customer"]),
    ("Amount", &["contract_amount", "amount"]),
    ("Signed", &["sign_date", "start_date"]),
];

const ASSET_FIELDS: &[Field] = &[
    ("Name", &["qualification_name", "name"]),
    ("Company", &["company_name", "company"]),
    ("Type", &["business_type"]),
    ("Level", &["qualification_level"]),
    ("Expires", &["expire_date"]),
];

const PERSONNEL_FIELDS: &[Field] = &[
    ("Name", &["name", "employee_name"]),
    ("Employee no", &["employee_no"]),
    ("Company", &["company", "company_name"]),
    ("Degree", &["degree"]),
    ("Status", &["status"]),
];

const COMPANY_FIELDS: &[Field] = &[
    ("Name", &["name", "company_name"]),
    ("Code", &["code", "company_number"]),
    ("Type", &["business_type", "company_type"]),
    ("Legal person", &["legal_person"]),
    ("State", &["operating_state", "status"]),
];

pub const fn fields(entity: SearchEntity) -> &'static [Field] {
    match entity {
        SearchEntity::Contracts => CONTRACT_FIELDS,
        SearchEntity::Qualifications | SearchEntity::IntellectualProperty => ASSET_FIELDS,
        SearchEntity::Personnel => PERSONNEL_FIELDS,
        SearchEntity::Companies => COMPANY_FIELDS,
    }
}

/// First candidate with a visible value, rendered as text.
pub fn pick(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find_map(|value| match value {
            Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            _ => None,
        })
}

/// Field values in display order, `-` where nothing resolved.
pub fn summarize(entity: SearchEntity, record: &Value) -> Vec<(&'static str, String)> {
    fields(entity)
        .iter()
        .map(|(label, keys)| (*label, pick(record, keys).unwrap_or_else(|| "-".into())))
        .collect()
}

/// `Label: value` lines for the clipboard.
pub fn copy_text(entity: SearchEntity, record: &Value) -> String {
    let mut out = String::new();
    for (label, value) in summarize(entity, record) {
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = write!(out, "{label}: {value}");
    }
    out
}
