use chrono::Local;
use serde_json::Value;
use st_core::SearchEntity;
use st_core::responses::SearchResponse;
use st_search::display;
use st_search::{QuickTags, SearchSession, TagKind, profile};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SearchArgs;
use crate::commands::shared::effective_limit;
use crate::context::AppContext;
use crate::output::{Rows, output_with_rows};

/// Handle `savetime search`.
pub async fn handle(args: &SearchArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut config = ctx.config.search.clone();
    config.page_size = effective_limit(None, flags.limit, config.page_size).max(1);
    let limit = config.page_size;

    let mut session = SearchSession::new(args.entity, config);
    session.set_query(args.query.clone().unwrap_or_default());
    for pair in &args.filter {
        session.filters_mut().set_pair(pair)?;
    }
    *session.tags_mut() = quick_tags(args)?;

    let client = ctx.client()?;
    let today = Local::now().date_naive();
    session.fresh_search(&client, today).await?;
    while session.page() < args.page {
        if session.load_more(&client, today).await? == 0 {
            break;
        }
    }

    let reached = session.page() >= args.page;
    let offset = args.page.saturating_mul(limit);
    let results: Vec<Value> = if reached {
        session.results().iter().skip(offset as usize).cloned().collect()
    } else {
        Vec::new()
    };
    tracing::debug!(
        entity = %args.entity,
        total = session.total(),
        shown = results.len(),
        "search finished"
    );

    if args.copy {
        println!("{}", copy_blocks(args.entity, &results));
        return Ok(());
    }

    let response = SearchResponse {
        entity: args.entity,
        query: session.query().to_string(),
        page: args.page,
        offset,
        limit,
        total: session.total(),
        has_more: reached && session.has_more(),
        results,
    };
    output_with_rows(&response, flags.format, || result_rows(args.entity, &response.results))
}

/// Quick tags from flags, refusing tags the entity has no use for.
fn quick_tags(args: &SearchArgs) -> anyhow::Result<QuickTags> {
    let tags = QuickTags {
        fixed_price: args.fp,
        completed: args.completed,
        years: args.years,
        min_wan: args.min_wan,
        group: args.group.clone().filter(|value| !value.trim().is_empty()),
        category: args.category.clone().filter(|value| !value.trim().is_empty()),
        not_expired: args.not_expired,
        ip_kind: args.ip_kind,
    };

    let vocabulary = profile(args.entity);
    for (kind, flag) in [
        (TagKind::FixedPrice, "--fp"),
        (TagKind::Completed, "--completed"),
        (TagKind::Years, "--years"),
        (TagKind::MinAmount, "--min-wan"),
        (TagKind::Group, "--group"),
        (TagKind::Category, "--category"),
        (TagKind::NotExpired, "--not-expired"),
        (TagKind::IpKind, "--ip-kind"),
    ] {
        if tags.is_set(kind) && !vocabulary.supports(kind) {
            anyhow::bail!("{flag} does not apply to {} search", args.entity);
        }
    }
    Ok(tags)
}

/// One clipboard block per record, separated by a blank line.
fn copy_blocks(entity: SearchEntity, results: &[Value]) -> String {
    results
        .iter()
        .map(|record| display::copy_text(entity, record))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn result_rows(entity: SearchEntity, results: &[Value]) -> Rows {
    Rows {
        headers: display::fields(entity).iter().map(|(label, _)| *label).collect(),
        rows: results
            .iter()
            .map(|record| {
                display::summarize(entity, record)
                    .into_iter()
                    .map(|(_, value)| value)
                    .collect()
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::cli::{Cli, Commands};

    fn args(argv: &[&str]) -> SearchArgs {
        let cli = Cli::try_parse_from(argv).expect("cli should parse");
        let Commands::Search(args) = cli.command else {
            panic!("expected search");
        };
        args
    }

    #[test]
    fn contract_tags_are_accepted_for_contracts() {
        let tags = quick_tags(&args(&[
            "savetime", "search", "contracts", "--fp", "--years", "3", "--min-wan", "500",
        ]))
        .expect("tags");
        assert!(tags.fixed_price);
        assert_eq!(tags.years, Some(3));
        assert_eq!(tags.min_wan, Some(500));
    }

    #[test]
    fn tags_outside_the_entity_vocabulary_are_refused() {
        let error = quick_tags(&args(&["savetime", "search", "personnel", "--fp"]))
            .expect_err("personnel has no fixed-price tag");
        assert!(error.to_string().contains("--fp"));
    }

    #[test]
    fn rows_follow_entity_fields() {
        let rows = result_rows(
            SearchEntity::Contracts,
            &[json!({
                "contract_number": "HT-001",
                "project_name": "Metro line 4",
                "amount": 1_200_000,
            })],
        );
        assert_eq!(rows.headers, vec!["Number", "Title", "Customer", "Amount", "Signed"]);
        assert_eq!(
            rows.rows[0],
            vec!["HT-001", "Metro line 4", "-", "1200000", "-"]
        );
    }

    #[test]
    fn copy_blocks_are_separated_by_blank_lines() {
        let text = copy_blocks(
            SearchEntity::Personnel,
            &[json!({ "name": "Li Lei" }), json!({ "name": "Han Meimei" })],
        );
        let blocks: Vec<&str> = text.split("\n\n").collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("Name: Li Lei\n"));
        assert!(blocks[1].starts_with("Name: Han Meimei\n"));
    }
}
