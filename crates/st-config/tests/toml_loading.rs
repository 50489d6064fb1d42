//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for sandboxed files, env vars and working directory.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use st_config::SaveTimeConfig;
use st_core::SearchEntity;

#[test]
fn loads_every_section_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[api]
base_url = "https://api.example.com/api"
timeout_secs = 15
analyze_text_endpoint = "/bidding/analyze/text"
jobs_endpoint = "/bidding/jobs"

[polling]
interval_ms = 2500
max_polls = 0
max_transient_failures = 3

[search]
page_size = 10
empty_query_entities = ["companies", "personnel"]

[auth]
credentials_dir = "/tmp/st-creds"
default_expires_in_secs = 7200
"#,
        )?;

        let config: SaveTimeConfig = Figment::from(Serialized::defaults(SaveTimeConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.api.base_url, "https://api.example.com/api");
        assert_eq!(config.api.timeout_secs, 15);
        assert_eq!(config.api.analyze_text_endpoint, "/bidding/analyze/text");
        assert_eq!(config.api.analyze_file_endpoint, "/analyze/file");
        assert_eq!(config.api.jobs_endpoint, "/bidding/jobs");
        assert_eq!(config.api.workload_endpoint, "/workload/analyze");
        assert_eq!(config.polling.interval_ms, 2500);
        assert_eq!(config.polling.max_polls, 0);
        assert_eq!(config.polling.max_transient_failures, 3);
        assert_eq!(config.polling.max_backoff_ms, 30_000);
        assert_eq!(config.search.page_size, 10);
        assert_eq!(
            config.search.empty_query_entities,
            vec![SearchEntity::Companies, SearchEntity::Personnel]
        );
        assert_eq!(config.auth.credentials_dir, "/tmp/st-creds");
        assert_eq!(config.auth.default_expires_in_secs, 7200);
        Ok(())
    });
}

#[test]
fn project_file_is_picked_up_by_load() {
    Jail::expect_with(|jail| {
        jail.create_dir(".savetime")?;
        jail.create_file(
            ".savetime/config.toml",
            r#"
[api]
base_url = "http://localhost:8000"

[search]
page_size = 50
"#,
        )?;

        let config = SaveTimeConfig::load().expect("config loads");
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.search.page_size, 50);
        assert_eq!(config.polling.interval_ms, 1600);
        Ok(())
    });
}

#[test]
fn invalid_values_fail_load() {
    Jail::expect_with(|jail| {
        jail.create_dir(".savetime")?;
        jail.create_file(
            ".savetime/config.toml",
            r#"
[polling]
interval_ms = 0
"#,
        )?;

        let err = SaveTimeConfig::load().expect_err("zero interval rejected");
        assert!(err.to_string().contains("polling.interval_ms"));
        Ok(())
    });
}

#[test]
fn unknown_entity_in_empty_query_list_is_an_error() {
    Jail::expect_with(|jail| {
        jail.create_dir(".savetime")?;
        jail.create_file(
            ".savetime/config.toml",
            r#"
[search]
empty_query_entities = ["vendors"]
"#,
        )?;

        assert!(SaveTimeConfig::load().is_err());
        Ok(())
    });
}
