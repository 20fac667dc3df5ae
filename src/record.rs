// src/record.rs
//! Raw article records as delivered by the analysis backend.
//!
//! Nothing in a record is guaranteed: keys go missing, values arrive with the
//! wrong JSON type, and `summary` is either an object or that same object
//! encoded as a string. Two analysis schemas are in circulation:
//!
//! - the older one keeps `fact_check` as `{status, sources}` or as a bare string,
//! - the newer one adds `fact_check_results` next to it, inside the summary.
//!
//! Every field here decodes leniently so one bad value never rejects the whole
//! record. The resolver in [`crate::resolve`] bridges the schemas.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Lenient field decoders: a value of the wrong JSON type decodes as absent.
pub(crate) mod lenient {
    use super::*;

    pub fn opt<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let v = Value::deserialize(d)?;
        Ok(serde_json::from_value(v).ok())
    }

    /// Like [`opt`], but only JSON objects are accepted (structs would
    /// otherwise also decode from arrays).
    pub fn object<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        match Value::deserialize(d)? {
            v @ Value::Object(_) => Ok(serde_json::from_value(v).ok()),
            _ => Ok(None),
        }
    }

    /// Arrays decode element by element; elements of the wrong shape are dropped.
    pub fn seq<'de, D, T>(d: D) -> Result<Option<Vec<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        match Value::deserialize(d)? {
            Value::Array(items) => Ok(Some(
                items
                    .into_iter()
                    .filter_map(|v| serde_json::from_value(v).ok())
                    .collect(),
            )),
            _ => Ok(None),
        }
    }

    pub fn text<'de, D>(d: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(d)? {
            Value::String(s) => Ok(s),
            _ => Ok(String::new()),
        }
    }

    pub fn float<'de, D>(d: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Value::deserialize(d)?.as_f64().unwrap_or(0.0))
    }
}

/// Returns the string only if it is present and not empty.
pub(crate) fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

/// Backend ids are integers today; older exports used strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArticleId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArticleId::Number(n) => write!(f, "{n}"),
            ArticleId::Text(s) => f.write_str(s),
        }
    }
}

/// One fact-check source as produced by the analysis pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactCheckSource {
    #[serde(default, deserialize_with = "lenient::opt")]
    pub source_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub source_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub source_country: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub verification_status: Option<String>,
}

/// A cross-referenced article from Bangladeshi or international media.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageMatch {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub source: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub url: String,
}

/// `{status, sources}` block shared by `fact_check` and `fact_check_results`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FactCheckReport {
    #[serde(default, deserialize_with = "lenient::opt")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub sources: Option<Vec<FactCheckSource>>,
}

/// `fact_check` is either a report object or, in the legacy schema, a bare
/// verdict string such as `"true"` or `"mixed"`.
#[derive(Debug, Clone, PartialEq)]
pub enum FactCheckField {
    Report(FactCheckReport),
    Bare(String),
}

impl<'de> Deserialize<'de> for FactCheckField {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        match Value::deserialize(d)? {
            Value::String(s) => Ok(FactCheckField::Bare(s)),
            v @ Value::Object(_) => serde_json::from_value(v)
                .map(FactCheckField::Report)
                .map_err(serde::de::Error::custom),
            other => Err(serde::de::Error::custom(format!(
                "unsupported fact_check value: {other}"
            ))),
        }
    }
}

impl FactCheckField {
    pub fn report(&self) -> Option<&FactCheckReport> {
        match self {
            FactCheckField::Report(r) => Some(r),
            FactCheckField::Bare(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SummaryExtras {
    #[serde(default, deserialize_with = "lenient::seq")]
    pub entities: Option<Vec<String>>,
}

/// The analysis payload stored under `summary`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SummaryPayload {
    #[serde(default, deserialize_with = "lenient::opt")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub sentiment: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub summary_text: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub summary: Option<String>,
    #[serde(default, rename = "extractSummary", deserialize_with = "lenient::opt")]
    pub extract_summary: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub fact_check: Option<FactCheckField>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub fact_check_results: Option<FactCheckReport>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub extras: Option<SummaryExtras>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub entities: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub gemma_sources: Option<Vec<Value>>,
}

/// `summary` as found on the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SummaryField {
    #[default]
    Absent,
    /// JSON-encoded payload (or, occasionally, plain prose).
    Encoded(String),
    Parsed(Box<SummaryPayload>),
}

impl<'de> Deserialize<'de> for SummaryField {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => SummaryField::Encoded(s),
            v @ Value::Object(_) => serde_json::from_value::<SummaryPayload>(v)
                .map(|p| SummaryField::Parsed(Box::new(p)))
                .unwrap_or_default(),
            _ => SummaryField::Absent,
        })
    }
}

/// Local sentiment breakdown attached to article details (0.0..=1.0 shares).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    #[serde(default, deserialize_with = "lenient::float")]
    pub positive: f64,
    #[serde(default, deserialize_with = "lenient::float")]
    pub negative: f64,
    #[serde(default, deserialize_with = "lenient::float")]
    pub neutral: f64,
    #[serde(default, deserialize_with = "lenient::float")]
    pub cautious: f64,
}

impl SentimentBreakdown {
    /// Share of `label` as a whole percentage; unknown labels yield 0.
    pub fn percent(&self, label: &str) -> u32 {
        let share = match label.to_ascii_lowercase().as_str() {
            "positive" => self.positive,
            "negative" => self.negative,
            "neutral" => self.neutral,
            "cautious" => self.cautious,
            _ => 0.0,
        };
        (share.clamp(0.0, 1.0) * 100.0).round() as u32
    }

    /// Label with the largest share; ties resolve in Positive/Negative/Neutral/Cautious order.
    pub fn dominant(&self) -> &'static str {
        let mut best = ("Positive", self.positive);
        for (label, v) in [
            ("Negative", self.negative),
            ("Neutral", self.neutral),
            ("Cautious", self.cautious),
        ] {
            if v > best.1 {
                best = (label, v);
            }
        }
        best.0
    }
}

/// One article record as returned by the dashboard or detail endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawArticleRecord {
    #[serde(default, deserialize_with = "lenient::opt")]
    pub id: Option<ArticleId>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub headline: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub source_domain: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub article_text: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub full_text: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub sentiment: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub summary_text: Option<String>,
    #[serde(default)]
    pub summary: SummaryField,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub fact_check: Option<FactCheckField>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub fact_check_sources: Option<Vec<FactCheckSource>>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub entities: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub bangladeshi_matches: Option<Vec<CoverageMatch>>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub international_matches: Option<Vec<CoverageMatch>>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub sentiment_analysis: Option<SentimentBreakdown>,
}

impl RawArticleRecord {
    /// Decode any JSON value; non-objects become an empty record.
    pub fn from_value(value: Value) -> Self {
        match value {
            v @ Value::Object(_) => serde_json::from_value(v).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    /// `headline`, falling back to `title`.
    pub fn headline(&self) -> &str {
        non_empty(&self.headline)
            .or_else(|| non_empty(&self.title))
            .unwrap_or("")
    }

    /// Article body: `text`, then `article_text`, then `full_text`.
    pub fn body(&self) -> &str {
        non_empty(&self.text)
            .or_else(|| non_empty(&self.article_text))
            .or_else(|| non_empty(&self.full_text))
            .unwrap_or("")
    }

    /// Hostname-ish source: `source_domain`, falling back to `source`.
    pub fn source_host(&self) -> &str {
        non_empty(&self.source_domain)
            .or_else(|| non_empty(&self.source))
            .unwrap_or("")
    }
}
