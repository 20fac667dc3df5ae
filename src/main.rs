//! SIMS analytics CLI entrypoint.
//! Reads a dashboard feed dump, applies the UI filters and prints the
//! dashboard report as JSON on stdout. Logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sims_analytics::table::{SortDir, SortKey, DEFAULT_PAGE_SIZE};
use sims_analytics::{build_report, AnalyticsConfig, DashboardFeed, FilterCriteria, ReportOptions};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Date,
    Headline,
    Source,
}

impl From<SortArg> for SortKey {
    fn from(s: SortArg) -> Self {
        match s {
            SortArg::Date => SortKey::Date,
            SortArg::Headline => SortKey::Headline,
            SortArg::Source => SortKey::Source,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Path to a saved `/api/dashboard` response
    #[arg(short, long)]
    feed: PathBuf,

    /// Analytics config (TOML or JSON); defaults to $SIMS_ANALYTICS_CONFIG or config/analytics.*
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only articles mentioning this entity
    #[arg(long)]
    entity: Option<String>,

    /// Only articles with this sentiment (Positive, Negative, Neutral, Cautious)
    #[arg(long)]
    sentiment: Option<String>,

    /// Only articles in this category
    #[arg(long)]
    category: Option<String>,

    /// Case-insensitive headline substring
    #[arg(long)]
    keyword: Option<String>,

    #[arg(long, value_enum, default_value = "date")]
    sort: SortArg,

    /// Sort descending
    #[arg(long)]
    desc: bool,

    #[arg(long, default_value_t = 1)]
    page: usize,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Return every row instead of one page
    #[arg(long)]
    all: bool,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

/// Logs on stderr; `SIMS_LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sims_analytics=info,warn"));

    let json = std::env::var("SIMS_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(p) => AnalyticsConfig::load_from(p)?,
        None => AnalyticsConfig::load_default()?,
    };
    let feed = DashboardFeed::load_from(&cli.feed)?;

    let options = ReportOptions {
        criteria: FilterCriteria {
            entity: cli.entity,
            sentiment: cli.sentiment,
            category: cli.category,
            keyword: cli.keyword,
        },
        sort_key: cli.sort.into(),
        sort_dir: if cli.desc { SortDir::Desc } else { SortDir::Asc },
        page: cli.page,
        page_size: cli.page_size,
        show_all: cli.all,
    };

    let report = build_report(&feed, &options, &config);
    info!(
        visible = report.visible_total,
        charted = report.chart_total,
        rows = report.rows.len(),
        "report built"
    );

    let out = if cli.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("serializing report")?;
    println!("{out}");
    Ok(())
}
