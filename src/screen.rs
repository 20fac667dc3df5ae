// src/screen.rs
//! Article screen: de-duplication, quality heuristics and UI filter criteria.
//!
//! Two entry points intentionally diverge:
//! - [`table_view`] runs dedupe + quality before the criteria (visible table, timeline),
//! - [`chart_view`] applies the criteria only, so chart totals are not skewed by the
//!   heuristics.

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

use crate::config::QualityRules;
use crate::record::RawArticleRecord;
use crate::resolve::{resolve_category, resolve_entities, resolve_sentiment, CategoryDefault};

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("screen_kept_total", "Records kept by dedupe + quality screen.");
        describe_counter!(
            "screen_bogus_total",
            "Records dropped by the quality heuristics."
        );
        describe_counter!(
            "screen_dedup_total",
            "Records dropped as empty or repeated headlines."
        );
    });
}

/// Short, stable id for a headline so logs never carry raw text.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Why a record is not a real article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BogusReason {
    /// Headline looks like a listing or landing page.
    TitlePhrase,
    /// Body missing or short, and the headline lacks the required keyword.
    ShortOffTopic,
    /// Body is long enough but never mentions the required keyword.
    OffTopic,
}

impl BogusReason {
    pub fn as_str(self) -> &'static str {
        match self {
            BogusReason::TitlePhrase => "title_phrase",
            BogusReason::ShortOffTopic => "short_off_topic",
            BogusReason::OffTopic => "off_topic",
        }
    }
}

/// Quality heuristic. The title check short-circuits the body checks.
pub fn bogus_reason(record: &RawArticleRecord, rules: &QualityRules) -> Option<BogusReason> {
    let title = record.headline().to_lowercase();
    let body = record.body().to_lowercase();

    if rules
        .bogus_title_phrases
        .iter()
        .any(|p| title.contains(p.as_str()))
    {
        return Some(BogusReason::TitlePhrase);
    }
    let keyword = rules.required_keyword.as_str();
    let long_body = body.chars().count() >= rules.min_body_chars;
    if !long_body && !title.contains(keyword) {
        return Some(BogusReason::ShortOffTopic);
    }
    if long_body && !body.contains(keyword) {
        return Some(BogusReason::OffTopic);
    }
    None
}

pub fn is_bogus(record: &RawArticleRecord, rules: &QualityRules) -> bool {
    bogus_reason(record, rules).is_some()
}

/// Dedup key: trimmed, lower-cased headline.
pub fn headline_key(record: &RawArticleRecord) -> String {
    record.headline().trim().to_lowercase()
}

/// Drop empty/repeated headlines and bogus records, keeping input order.
///
/// The first record with a given headline wins. Bogus records do not claim
/// their headline, so a later genuine article with the same title survives.
/// Returns `(kept, bogus_count, dedup_count)`.
pub fn dedupe_quality_filter<'a, I>(
    records: I,
    rules: &QualityRules,
) -> (Vec<&'a RawArticleRecord>, usize, usize)
where
    I: IntoIterator<Item = &'a RawArticleRecord>,
{
    ensure_metrics_described();

    let mut seen: HashSet<String> = HashSet::new();
    let mut kept = Vec::new();
    let mut bogus = 0usize;
    let mut dedup = 0usize;

    for record in records {
        let key = headline_key(record);
        if key.is_empty() || seen.contains(&key) {
            dedup += 1;
            debug!(target: "screen", id = %anon_hash(&key), "duplicate or empty headline");
            continue;
        }
        if let Some(reason) = bogus_reason(record, rules) {
            bogus += 1;
            debug!(target: "screen", id = %anon_hash(&key), reason = reason.as_str(), "bogus article");
            continue;
        }
        seen.insert(key);
        kept.push(record);
    }

    counter!("screen_kept_total").increment(kept.len() as u64);
    counter!("screen_bogus_total").increment(bogus as u64);
    counter!("screen_dedup_total").increment(dedup as u64);
    info!(target: "screen", kept = kept.len(), bogus, dedup, "screen finished");

    (kept, bogus, dedup)
}

/// Active UI filters. Empty strings count as "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub keyword: Option<String>,
}

impl FilterCriteria {
    fn active(v: &Option<String>) -> Option<&str> {
        v.as_deref().filter(|s| !s.is_empty())
    }

    pub fn entity(&self) -> Option<&str> {
        Self::active(&self.entity)
    }

    pub fn is_empty(&self) -> bool {
        Self::active(&self.entity).is_none()
            && Self::active(&self.sentiment).is_none()
            && Self::active(&self.category).is_none()
            && Self::active(&self.keyword).is_none()
    }

    /// Whether one record passes every active criterion.
    pub fn matches(&self, record: &RawArticleRecord) -> bool {
        if let Some(entity) = Self::active(&self.entity) {
            if !resolve_entities(record).iter().any(|e| e == entity) {
                return false;
            }
        }
        if let Some(sentiment) = Self::active(&self.sentiment) {
            if resolve_sentiment(record) != sentiment {
                return false;
            }
        }
        if let Some(category) = Self::active(&self.category) {
            if resolve_category(record, CategoryDefault::Dashboard) != category {
                return false;
            }
        }
        if let Some(keyword) = Self::active(&self.keyword) {
            if !record
                .headline()
                .to_lowercase()
                .contains(&keyword.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}

/// Keep records passing every active criterion, in input order.
pub fn apply_criteria<'a, I>(records: I, criteria: &FilterCriteria) -> Vec<&'a RawArticleRecord>
where
    I: IntoIterator<Item = &'a RawArticleRecord>,
{
    records.into_iter().filter(|r| criteria.matches(r)).collect()
}

/// Records for the visible table: dedupe + quality, then criteria.
pub fn table_view<'a>(
    records: &'a [RawArticleRecord],
    criteria: &FilterCriteria,
    rules: &QualityRules,
) -> Vec<&'a RawArticleRecord> {
    let (kept, _bogus, _dedup) = dedupe_quality_filter(records, rules);
    apply_criteria(kept, criteria)
}

/// Records for global charts: criteria only.
pub fn chart_view<'a>(
    records: &'a [RawArticleRecord],
    criteria: &FilterCriteria,
) -> Vec<&'a RawArticleRecord> {
    apply_criteria(records, criteria)
}
