use anyhow::bail;
use schemars::schema_for;
use serde_json::Value;
use st_core::excerpt::SourceSnippet;
use st_core::identity::LoginGrant;
use st_core::responses::{
    JobDeleteResponse, LogoutResponse, PasswordResponse, SearchResponse, SourceViewResponse,
};
use st_core::search::SearchPage;
use st_core::{AnalysisItem, AnalysisResult};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Names accepted by `savetime schema`.
pub const SCHEMA_NAMES: &[&str] = &[
    "analysis_result",
    "analysis_item",
    "source_snippet",
    "search_page",
    "login_grant",
    "logout_response",
    "source_view_response",
    "search_response",
    "job_delete_response",
    "password_response",
];

/// Handle `savetime schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&schema(&args.type_name)?, flags.format)
}

fn schema(name: &str) -> anyhow::Result<Value> {
    let schema = match name {
        "analysis_result" => schema_for!(AnalysisResult),
        "analysis_item" => schema_for!(AnalysisItem),
        "source_snippet" => schema_for!(SourceSnippet),
        "search_page" => schema_for!(SearchPage),
        "login_grant" => schema_for!(LoginGrant),
        "logout_response" => schema_for!(LogoutResponse),
        "source_view_response" => schema_for!(SourceViewResponse),
        "search_response" => schema_for!(SearchResponse),
        "job_delete_response" => schema_for!(JobDeleteResponse),
        "password_response" => schema_for!(PasswordResponse),
        other => bail!(
            "unknown schema type '{other}'; expected one of: {}",
            SCHEMA_NAMES.join(", ")
        ),
    };
    Ok(serde_json::to_value(schema)?)
}
