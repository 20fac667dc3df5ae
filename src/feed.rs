// src/feed.rs
//! Backend response envelopes.
//!
//! Responses are fetched by a collaborator; this module only decodes JSON that
//! is already in memory or on disk. Malformed list elements are dropped with a
//! warning instead of failing the whole feed.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::record::{lenient, RawArticleRecord};

/// `GET /api/dashboard`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DashboardFeed {
    #[serde(
        rename = "latestIndianNews",
        default,
        deserialize_with = "records_lenient"
    )]
    pub latest_indian_news: Vec<RawArticleRecord>,
    #[serde(
        rename = "totalArticlesInDB",
        default,
        deserialize_with = "lenient::opt"
    )]
    pub total_articles_in_db: Option<usize>,
}

/// `GET /api/articles/<id>`.
pub type ArticleDetail = RawArticleRecord;

/// One entry of the sources list used to populate filter drop-downs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    #[serde(default, deserialize_with = "lenient::text")]
    pub domain: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
}

fn records_lenient<'de, D>(d: D) -> Result<Vec<RawArticleRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(d)? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            warn!(kind = json_kind(&other), "latestIndianNews is not a list");
            return Ok(Vec::new());
        }
    };
    let total = items.len();
    let records: Vec<RawArticleRecord> = items
        .into_iter()
        .filter(Value::is_object)
        .map(RawArticleRecord::from_value)
        .collect();
    if records.len() < total {
        warn!(
            dropped = total - records.len(),
            "non-object entries in latestIndianNews"
        );
    }
    Ok(records)
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl DashboardFeed {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let feed: Self = serde_json::from_str(s).context("decoding dashboard feed")?;
        info!(
            records = feed.latest_indian_news.len(),
            total_in_db = ?feed.total_articles_in_db,
            "dashboard feed decoded"
        );
        Ok(feed)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading dashboard feed from {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("in dashboard feed {}", path.display()))
    }
}

/// Decode a single article detail response.
pub fn article_detail_from_json_str(s: &str) -> Result<ArticleDetail> {
    let v: Value = serde_json::from_str(s).context("decoding article detail")?;
    Ok(RawArticleRecord::from_value(v))
}

/// Decode the sources list; entries that are not objects are skipped.
pub fn sources_from_json_str(s: &str) -> Result<Vec<SourceEntry>> {
    let v: Value = serde_json::from_str(s).context("decoding sources list")?;
    let Value::Array(items) = v else {
        anyhow::bail!("sources list is not a JSON array");
    };
    Ok(items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_tolerates_junk_entries() {
        let feed = DashboardFeed::from_json_str(
            r#"{"latestIndianNews": [{"headline": "a"}, 3, "x", {"headline": "b"}], "totalArticlesInDB": 120}"#,
        )
        .unwrap();
        assert_eq!(feed.latest_indian_news.len(), 2);
        assert_eq!(feed.total_articles_in_db, Some(120));
    }

    #[test]
    fn feed_without_news_is_empty() {
        let feed = DashboardFeed::from_json_str(r#"{"totalArticlesInDB": "many"}"#).unwrap();
        assert!(feed.latest_indian_news.is_empty());
        assert_eq!(feed.total_articles_in_db, None);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(DashboardFeed::from_json_str("{").is_err());
        assert!(article_detail_from_json_str("nope").is_err());
    }

    #[test]
    fn sources_list() {
        let s = sources_from_json_str(
            r#"[{"domain": "thedailystar.net", "name": "The Daily Star"}, 1, {"domain": 5}]"#,
        )
        .unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s[0].name, "The Daily Star");
        assert_eq!(s[1].domain, "");
        assert!(sources_from_json_str("{}").is_err());
    }
}
