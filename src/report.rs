// src/report.rs
//! One-shot dashboard report: the visible table page plus chart aggregates.

use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, top_weighted_keywords, DashboardAggregates, KeywordCount};
use crate::config::AnalyticsConfig;
use crate::domain::{format_score, source_label};
use crate::feed::DashboardFeed;
use crate::record::{ArticleId, RawArticleRecord};
use crate::resolve::{CategoryDefault, ResolvedArticle};
use crate::screen::{chart_view, table_view, FilterCriteria};
use crate::table::{page_count, paginate, sort_records, SortDir, SortKey, DEFAULT_PAGE_SIZE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    #[serde(default)]
    pub criteria: FilterCriteria,
    #[serde(default)]
    pub sort_key: SortKey,
    #[serde(default)]
    pub sort_dir: SortDir,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub show_all: bool,
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            criteria: FilterCriteria::default(),
            sort_key: SortKey::default(),
            sort_dir: SortDir::default(),
            page: default_page(),
            page_size: default_page_size(),
            show_all: false,
        }
    }
}

/// One table row as handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ArticleId>,
    pub headline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub source: String,
    pub score: String,
    pub keywords: Vec<KeywordCount>,
    #[serde(flatten)]
    pub resolved: ResolvedArticle,
}

impl ArticleRow {
    pub fn from_record(record: &RawArticleRecord, keyword_limit: usize) -> Self {
        Self {
            id: record.id.clone(),
            headline: record.headline().to_string(),
            date: record.date.clone(),
            url: record.url.clone(),
            source: source_label(record),
            score: format_score(record.score),
            keywords: top_weighted_keywords(record, keyword_limit),
            resolved: ResolvedArticle::from_record(record, CategoryDefault::Dashboard),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    /// Rows passing the screen and criteria, before paging.
    pub visible_total: usize,
    /// Rows passing the criteria only (chart basis).
    pub chart_total: usize,
    pub page: usize,
    pub page_count: usize,
    pub rows: Vec<ArticleRow>,
    pub aggregates: DashboardAggregates,
}

/// Build the report for one render of the dashboard.
pub fn build_report(
    feed: &DashboardFeed,
    options: &ReportOptions,
    config: &AnalyticsConfig,
) -> DashboardReport {
    let records = feed.latest_indian_news.as_slice();
    let mut visible = table_view(records, &options.criteria, &config.quality);
    let charted = chart_view(records, &options.criteria);

    let aggregates = aggregate(
        &charted,
        &visible,
        feed.total_articles_in_db,
        options.criteria.entity(),
        &config.aggregate,
    );

    sort_records(&mut visible, options.sort_key, options.sort_dir);
    let page_rows = paginate(&visible, options.page, options.page_size, options.show_all);
    let rows = page_rows
        .into_iter()
        .map(|r| ArticleRow::from_record(r, config.aggregate.keyword_limit))
        .collect();

    DashboardReport {
        visible_total: visible.len(),
        chart_total: charted.len(),
        page: if options.show_all { 1 } else { options.page },
        page_count: if options.show_all {
            1
        } else {
            page_count(visible.len(), options.page_size)
        },
        rows,
        aggregates,
    }
}
