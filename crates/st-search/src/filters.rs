//! Drawer filters: explicit key/value filters restricted to an entity's
//! vocabulary.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use st_core::SearchEntity;

use crate::entity::profile;
use crate::error::SearchError;

const DATE_KEYS: &[&str] = &["start_date", "end_date"];
const AMOUNT_KEYS: &[&str] = &["min_amount", "max_amount"];
const FLAG_KEYS: &[&str] = &["is_fp", "is_expired"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawerFilters {
    entity: SearchEntity,
    values: BTreeMap<String, String>,
}

impl DrawerFilters {
    pub const fn new(entity: SearchEntity) -> Self {
        Self {
            entity,
            values: BTreeMap::new(),
        }
    }

    pub const fn entity(&self) -> SearchEntity {
        self.entity
    }

    /// Set `key` to `value`. An empty value clears the key.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::UnknownFilter`] for keys outside the entity
    /// vocabulary and [`SearchError::InvalidFilter`] for malformed dates,
    /// amounts and flags.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SearchError> {
        let key = key.trim();
        let vocabulary = profile(self.entity);
        if !vocabulary.accepts(key) {
            return Err(SearchError::UnknownFilter {
                entity: self.entity,
                key: key.to_string(),
                accepted: vocabulary.filter_keys.join(", "),
            });
        }

        let value = value.trim();
        if value.is_empty() {
            self.values.remove(key);
            return Ok(());
        }

        let value = canonical_value(key, value)?;
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    /// Parse `key=value`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::set`], plus [`SearchError::InvalidFilter`] when the
    /// `=` is missing.
    pub fn set_pair(&mut self, pair: &str) -> Result<(), SearchError> {
        let (key, value) = pair.split_once('=').ok_or_else(|| SearchError::InvalidFilter {
            key: pair.to_string(),
            reason: "expected key=value".into(),
        })?;
        self.set(key, value)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

fn canonical_value(key: &str, value: &str) -> Result<String, SearchError> {
    let invalid = |reason: String| SearchError::InvalidFilter {
        key: key.to_string(),
        reason,
    };

    if DATE_KEYS.contains(&key) {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(|date| date.format("%Y-%m-%d").to_string())
            .map_err(|_| invalid(format!("'{value}' is not a YYYY-MM-DD date")))
    } else if AMOUNT_KEYS.contains(&key) {
        value
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite() && *amount >= 0.0)
            .map(|_| value.to_string())
            .ok_or_else(|| invalid(format!("'{value}' is not a non-negative amount")))
    } else if FLAG_KEYS.contains(&key) {
        match value.to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok("true".into()),
            "false" | "no" | "0" => Ok("false".into()),
            _ => Err(invalid(format!("'{value}' is not true or false"))),
        }
    } else {
        Ok(value.to_string())
    }
}
