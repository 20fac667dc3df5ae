// src/resolve.rs
//! Field resolver: one raw record in, one canonical view out.
//!
//! Every function here is total. Missing keys, wrong types and malformed
//! summary JSON all land on a documented default. Nothing is cached; a
//! [`ResolvedArticle`] is rebuilt whenever it is needed.
//!
//! Precedence chains (first non-empty value wins):
//!
//! | field              | chain                                                                   |
//! |--------------------|-------------------------------------------------------------------------|
//! | category           | `summary.category` → `category` → caller default                        |
//! | sentiment          | `summary.sentiment` → `sentiment` → `"Neutral"`                          |
//! | fact-check status  | report `status` → `summary.fact_check_results.status` → bare string → `"unverified"` |
//! | fact-check sources | `summary.fact_check.sources` → `summary.fact_check_results.sources` → `fact_check_sources` |
//! | entities           | `summary.extras.entities` → `summary.entities` → `entities`              |

use serde::Serialize;
use serde_json::Value;

use crate::domain::capitalize;
use crate::record::{
    non_empty, CoverageMatch, FactCheckField, FactCheckSource, RawArticleRecord, SummaryField,
    SummaryPayload,
};
use crate::summary_text;

pub const DEFAULT_SENTIMENT: &str = "Neutral";
pub const DEFAULT_FACT_CHECK_STATUS: &str = "unverified";
pub const UNKNOWN_SOURCE: &str = "Unknown Source";
pub const MISSING_URL: &str = "#";

/// The dashboard table and the article page disagree on the category fallback;
/// both are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryDefault {
    /// `"Unknown"`, used by the dashboard table and charts.
    #[default]
    Dashboard,
    /// `"Other"`, used by the article detail page.
    Detail,
}

impl CategoryDefault {
    pub fn label(self) -> &'static str {
        match self {
            CategoryDefault::Dashboard => "Unknown",
            CategoryDefault::Detail => "Other",
        }
    }
}

/// Summary rule per caller. The table shows only analysis text; the article
/// page falls back through raw fields and the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryDefault {
    /// `summary_text` → `summary` → `"No summary available."`.
    #[default]
    Dashboard,
    /// Tiered chain ending in `"Summary not available for this article."`.
    Detail,
}

impl From<CategoryDefault> for SummaryDefault {
    fn from(c: CategoryDefault) -> Self {
        match c {
            CategoryDefault::Dashboard => SummaryDefault::Dashboard,
            CategoryDefault::Detail => SummaryDefault::Detail,
        }
    }
}

/// Media region of a coverage match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageSide {
    Bangladeshi,
    International,
}

impl CoverageSide {
    fn is_bangladeshi_country(country: &str) -> bool {
        let c = country.to_lowercase();
        c == "bd" || c == "bangladesh"
    }

    /// Which bucket a fact-check source with this `source_country` falls into.
    /// Sources without a country are in neither.
    pub fn of_country(country: Option<&str>) -> Option<Self> {
        match country {
            Some(c) if !c.is_empty() => Some(if Self::is_bangladeshi_country(c) {
                CoverageSide::Bangladeshi
            } else {
                CoverageSide::International
            }),
            _ => None,
        }
    }
}

/// Canonical view of a raw record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedArticle {
    pub category: String,
    pub sentiment: String,
    pub fact_check_status: String,
    pub summary_text: String,
    pub entities: Vec<String>,
    pub fact_check_sources: Vec<FactCheckSource>,
    pub bangladeshi_matches: Vec<CoverageMatch>,
    pub international_matches: Vec<CoverageMatch>,
}

impl ResolvedArticle {
    pub fn from_record(record: &RawArticleRecord, category_default: CategoryDefault) -> Self {
        Self {
            category: resolve_category(record, category_default),
            sentiment: resolve_sentiment(record),
            fact_check_status: resolve_fact_check_status(record),
            summary_text: resolve_summary_text(record, category_default.into()),
            entities: resolve_entities(record),
            fact_check_sources: resolve_fact_check_sources(record),
            bangladeshi_matches: resolve_matches(record, CoverageSide::Bangladeshi),
            international_matches: resolve_matches(record, CoverageSide::International),
        }
    }

    pub fn is_covered(&self) -> bool {
        !self.bangladeshi_matches.is_empty() || !self.international_matches.is_empty()
    }
}

/// The analysis payload of a record. Malformed JSON yields an empty payload.
pub fn parse_summary(record: &RawArticleRecord) -> SummaryPayload {
    match &record.summary {
        SummaryField::Parsed(p) => (**p).clone(),
        SummaryField::Encoded(s) => serde_json::from_str::<Value>(s)
            .ok()
            .filter(Value::is_object)
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default(),
        SummaryField::Absent => SummaryPayload::default(),
    }
}

pub fn resolve_category(record: &RawArticleRecord, default: CategoryDefault) -> String {
    let summary = parse_summary(record);
    let raw = non_empty(&summary.category)
        .or_else(|| non_empty(&record.category))
        .unwrap_or(default.label());
    capitalize(raw)
}

pub fn resolve_sentiment(record: &RawArticleRecord) -> String {
    let summary = parse_summary(record);
    let raw = non_empty(&summary.sentiment)
        .or_else(|| non_empty(&record.sentiment))
        .unwrap_or(DEFAULT_SENTIMENT);
    capitalize(raw)
}

/// Lower-cased fact-check verdict bridging both analysis schemas.
pub fn resolve_fact_check_status(record: &RawArticleRecord) -> String {
    let summary = parse_summary(record);
    let fact_check = summary.fact_check.as_ref().or(record.fact_check.as_ref());

    if let Some(status) = fact_check
        .and_then(FactCheckField::report)
        .and_then(|r| non_empty(&r.status))
    {
        return status.to_lowercase();
    }
    if let Some(status) = summary
        .fact_check_results
        .as_ref()
        .and_then(|r| non_empty(&r.status))
    {
        return status.to_lowercase();
    }
    if let Some(FactCheckField::Bare(s)) = fact_check {
        if !s.is_empty() {
            return s.to_lowercase();
        }
    }
    DEFAULT_FACT_CHECK_STATUS.to_string()
}

pub fn resolve_summary_text(record: &RawArticleRecord, rule: SummaryDefault) -> String {
    let summary = parse_summary(record);
    match rule {
        SummaryDefault::Dashboard => summary_text::resolve_short(&summary),
        SummaryDefault::Detail => summary_text::resolve(record, &summary),
    }
}

pub fn resolve_fact_check_sources(record: &RawArticleRecord) -> Vec<FactCheckSource> {
    let summary = parse_summary(record);
    summary
        .fact_check
        .as_ref()
        .and_then(FactCheckField::report)
        .and_then(|r| r.sources.clone())
        .or_else(|| {
            summary
                .fact_check_results
                .as_ref()
                .and_then(|r| r.sources.clone())
        })
        .or_else(|| record.fact_check_sources.clone())
        .unwrap_or_default()
}

pub fn resolve_entities(record: &RawArticleRecord) -> Vec<String> {
    let summary = parse_summary(record);
    summary
        .extras
        .and_then(|e| e.entities)
        .or(summary.entities)
        .or_else(|| record.entities.clone())
        .unwrap_or_default()
}

/// Backend-supplied matches for `side`, or matches derived from the
/// fact-check sources when the backend sent none.
pub fn resolve_matches(record: &RawArticleRecord, side: CoverageSide) -> Vec<CoverageMatch> {
    let supplied = match side {
        CoverageSide::Bangladeshi => record.bangladeshi_matches.as_ref(),
        CoverageSide::International => record.international_matches.as_ref(),
    };
    if let Some(m) = supplied.filter(|m| !m.is_empty()) {
        return m.clone();
    }

    resolve_fact_check_sources(record)
        .into_iter()
        .filter(|s| CoverageSide::of_country(s.source_country.as_deref()) == Some(side))
        .map(|s| {
            let name = non_empty(&s.source_name).unwrap_or(UNKNOWN_SOURCE);
            CoverageMatch {
                title: name.to_string(),
                source: name.to_string(),
                url: non_empty(&s.source_url).unwrap_or(MISSING_URL).to_string(),
            }
        })
        .collect()
}

/// Covered by at least one Bangladeshi or international outlet.
pub fn is_covered(record: &RawArticleRecord) -> bool {
    !resolve_matches(record, CoverageSide::Bangladeshi).is_empty()
        || !resolve_matches(record, CoverageSide::International).is_empty()
}

/// Opaque `summary.gemma_sources` list, passed through for display.
pub fn gemma_sources(record: &RawArticleRecord) -> Vec<Value> {
    parse_summary(record).gemma_sources.unwrap_or_default()
}
