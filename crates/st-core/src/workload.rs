//! Options sent with workload-split and cost-estimate uploads.
//!
//! Both uploads carry a multipart `config` field holding
//! `{"config": {...}}` as JSON text. The server answers with a task record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::errors::CoreError;

/// Default rates per role, in yuan per person-month.
pub const DEFAULT_COST_RATES: &[(&str, f64)] = &[
    ("architect", 18_000.0),
    ("project_manager", 16_000.0),
    ("product_design", 12_000.0),
    ("backend_dev", 15_000.0),
    ("frontend_dev", 14_000.0),
    ("qa", 11_000.0),
    ("implementation", 10_000.0),
];

pub const DEFAULT_STRATEGY: &str = "balanced";

/// Wrap an options struct the way the upload endpoints expect it.
fn wrap<T: Serialize>(config: &T) -> Result<Value, CoreError> {
    let inner = serde_json::to_value(config)
        .map_err(|error| CoreError::Validation(format!("unserializable config: {error}")))?;
    Ok(json!({ "config": inner }))
}

/// Workload split options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadConfig {
    pub strategy: String,
    /// Cap on the total person-months; absent lets the server decide.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_limit: Option<f64>,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            strategy: DEFAULT_STRATEGY.to_string(),
            total_limit: None,
        }
    }
}

impl WorkloadConfig {
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] for an empty strategy or a limit
    /// that is not a positive finite number.
    pub fn new(strategy: Option<&str>, total_limit: Option<f64>) -> Result<Self, CoreError> {
        let strategy = strategy.map_or(DEFAULT_STRATEGY, str::trim);
        if strategy.is_empty() {
            return Err(CoreError::Validation("strategy must not be empty".into()));
        }
        if total_limit.is_some_and(|limit| !(limit.is_finite() && limit > 0.0)) {
            let limit = total_limit.unwrap_or_default();
            return Err(CoreError::Validation(format!(
                "total limit must be a positive number, got {limit}"
            )));
        }
        Ok(Self {
            strategy: strategy.to_string(),
            total_limit,
        })
    }

    /// `{"config": {...}}` for the multipart `config` field.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if serialization fails.
    pub fn form_value(&self) -> Result<Value, CoreError> {
        wrap(self)
    }
}

/// Cost estimate options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostingConfig {
    pub rates: BTreeMap<String, f64>,
    pub architect_ratio: f64,
    pub project_manager_ratio: f64,
}

impl Default for CostingConfig {
    fn default() -> Self {
        Self {
            rates: DEFAULT_COST_RATES
                .iter()
                .map(|&(role, rate)| (role.to_string(), rate))
                .collect(),
            architect_ratio: 0.12,
            project_manager_ratio: 0.15,
        }
    }
}

impl CostingConfig {
    /// Override one role's rate.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] for an unknown role or a rate that
    /// is not a positive finite number.
    pub fn set_rate(&mut self, role: &str, rate: f64) -> Result<(), CoreError> {
        let role = role.trim();
        if !DEFAULT_COST_RATES.iter().any(|(known, _)| *known == role) {
            let known: Vec<&str> = DEFAULT_COST_RATES.iter().map(|(known, _)| *known).collect();
            return Err(CoreError::Validation(format!(
                "unknown role '{role}' (expected one of: {})",
                known.join(", ")
            )));
        }
        if !(rate.is_finite() && rate > 0.0) {
            return Err(CoreError::Validation(format!(
                "rate for {role} must be a positive number, got {rate}"
            )));
        }
        self.rates.insert(role.to_string(), rate);
        Ok(())
    }

    /// Parse and apply a `role=rate` pair.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] for a malformed pair, and whatever
    /// [`Self::set_rate`] rejects.
    pub fn set_rate_pair(&mut self, pair: &str) -> Result<(), CoreError> {
        let (role, rate) = pair
            .split_once('=')
            .ok_or_else(|| CoreError::Validation(format!("expected role=rate, got '{pair}'")))?;
        let rate: f64 = rate
            .trim()
            .parse()
            .map_err(|_| CoreError::Validation(format!("'{}' is not a number", rate.trim())))?;
        self.set_rate(role, rate)
    }

    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] unless both ratios are within 0..=1.
    pub fn set_ratios(
        &mut self,
        architect: Option<f64>,
        project_manager: Option<f64>,
    ) -> Result<(), CoreError> {
        for (name, value) in [("architect", architect), ("project manager", project_manager)] {
            if let Some(value) = value.filter(|value| !(0.0..=1.0).contains(value)) {
                return Err(CoreError::Validation(format!(
                    "{name} ratio must be between 0 and 1, got {value}"
                )));
            }
        }
        self.architect_ratio = architect.unwrap_or(self.architect_ratio);
        self.project_manager_ratio = project_manager.unwrap_or(self.project_manager_ratio);
        Ok(())
    }

    /// `{"config": {...}}` for the multipart `config` field.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if serialization fails.
    pub fn form_value(&self) -> Result<Value, CoreError> {
        wrap(self)
    }
}
