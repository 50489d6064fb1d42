use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of `GET /search/{entity}`. Records stay untyped; each entity
/// has its own shape and display code picks fields by synonym.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct SearchPage {
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub total: u64,
}
