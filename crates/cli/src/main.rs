//! `m2go-suggest <snapshot.json> [cycle] [as_of]`
//!
//! Loads a stock snapshot into an in-memory store, computes order
//! suggestions and prints them as JSON on stdout.

mod seed;

use std::path::PathBuf;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::Parser;

use m2go_infra::{AppConfig, InMemoryStockStore, SuggestionService};
use m2go_observability::LogFormat;

#[derive(Debug, Parser)]
#[command(
    name = "m2go-suggest",
    version,
    about = "Compute order suggestions from a stock snapshot file"
)]
struct Args {
    /// JSON file with `products`, `counts` and `settings`.
    snapshot: PathBuf,

    /// Ordering cycle, e.g. `monday` (defaults to the configured cycle).
    cycle: Option<String>,

    /// Evaluation date, YYYY-MM-DD (defaults to today, UTC).
    #[arg(value_parser = parse_date)]
    as_of: Option<NaiveDate>,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = AppConfig::load().context("loading configuration")?;
    m2go_observability::tracing::init(LogFormat::from_name(&config.log_format));
    tracing::info!(environment = %config.environment, pools = config.pools.pools().len(), "configuration loaded");

    let raw = std::fs::read_to_string(&args.snapshot)
        .with_context(|| format!("reading {}", args.snapshot.display()))?;
    let file: seed::SeedFile = serde_json::from_str(&raw).context("parsing snapshot file")?;

    let store = InMemoryStockStore::new();
    let recorded = seed::load(&store, file)?;
    tracing::info!(counts = recorded, "snapshot loaded");

    let cycle = args.cycle.unwrap_or(config.default_cycle);
    let as_of = args.as_of.unwrap_or_else(|| Utc::now().date_naive());

    let service = SuggestionService::new(store, config.pools);
    let suggestions = service.suggest(&cycle, as_of)?;

    println!("{}", serde_json::to_string_pretty(&suggestions)?);
    Ok(())
}
