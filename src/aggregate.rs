// src/aggregate.rs
//! Chart and table statistics over a (filtered) list of records.
//!
//! All functions are pure and recomputed from scratch; lists are hundreds of
//! records, not millions. Label tables keep first-seen order so chart labels
//! stay stable between renders.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

use crate::config::AggregateLimits;
use crate::record::RawArticleRecord;
use crate::resolve::{
    resolve_category, resolve_entities, resolve_fact_check_status, resolve_matches,
    resolve_sentiment, CategoryDefault, CoverageSide,
};

/// Label → count, in first-seen order.
pub type LabelCounts = IndexMap<String, usize>;

static RE_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?-u:\b)[a-z]{3,}(?-u:\b)").expect("keyword regex"));

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
        "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does",
        "did", "will", "would", "could", "should", "may", "might", "must", "can", "this", "that",
        "these", "those", "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us",
        "them", "my", "your", "his", "its", "our", "their", "said", "says", "also", "more",
        "very", "what", "when", "where", "who", "why", "how", "all", "any", "both", "each", "few",
        "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
        "too", "from", "up", "out", "down", "off", "over", "under", "again", "further", "then",
        "once",
    ]
    .into_iter()
    .collect()
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordCount {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityCount {
    pub entity: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FactCheckBuckets {
    pub verified: usize,
    pub unverified: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CoveragePercentages {
    pub bd: f64,
    pub intl: f64,
    pub both: f64,
    pub total: f64,
}

/// Media coverage over a list. BD and international counts overlap: an
/// article in `both_covered` is also in `total_bd` and `total_intl`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageSummary {
    pub total_news: usize,
    #[serde(rename = "totalBD")]
    pub total_bd: usize,
    pub total_intl: usize,
    pub both_covered: usize,
    pub total_covered_articles: usize,
    pub percentages: CoveragePercentages,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentimentStat {
    pub label: &'static str,
    pub value: usize,
}

/// Everything the dashboard charts need.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardAggregates {
    pub categories: LabelCounts,
    pub sentiments: LabelCounts,
    pub sentiment_stats: Vec<SentimentStat>,
    pub fact_checks: FactCheckBuckets,
    pub top_terms: Vec<EntityCount>,
    pub coverage: CoverageSummary,
}

/// Bucket records by `key`, keeping first-seen label order.
pub fn count_by<'a, I, F>(records: I, key: F) -> LabelCounts
where
    I: IntoIterator<Item = &'a RawArticleRecord>,
    F: Fn(&RawArticleRecord) -> String,
{
    let mut counts = LabelCounts::new();
    for r in records {
        *counts.entry(key(r)).or_insert(0) += 1;
    }
    counts
}

pub fn category_counts<'a, I>(records: I) -> LabelCounts
where
    I: IntoIterator<Item = &'a RawArticleRecord>,
{
    count_by(records, |r| resolve_category(r, CategoryDefault::Dashboard))
}

pub fn sentiment_counts<'a, I>(records: I) -> LabelCounts
where
    I: IntoIterator<Item = &'a RawArticleRecord>,
{
    count_by(records, resolve_sentiment)
}

/// Fixed-order Positive/Negative/Neutral/Cautious counts for the stat cards.
pub fn sentiment_stats(sentiments: &LabelCounts) -> Vec<SentimentStat> {
    ["Positive", "Negative", "Neutral", "Cautious"]
        .into_iter()
        .map(|label| SentimentStat {
            label,
            value: sentiments.get(label).copied().unwrap_or(0),
        })
        .collect()
}

/// Exactly `"verified"` is verified; everything else, unknown included, is not.
pub fn fact_check_buckets<'a, I>(records: I) -> FactCheckBuckets
where
    I: IntoIterator<Item = &'a RawArticleRecord>,
{
    let mut b = FactCheckBuckets::default();
    for r in records {
        if resolve_fact_check_status(r) == "verified" {
            b.verified += 1;
        } else {
            b.unverified += 1;
        }
    }
    b
}

/// Most frequent words and entities of one article.
///
/// Words are lower-case runs of 3+ ASCII letters minus stop words. Each
/// resolved entity is weighted by its literal, case-insensitive occurrence
/// count in the same text and stored under its original spelling. An entity
/// such as `"India"` therefore sits next to the token `"india"` with its own
/// count; the two are not merged.
pub fn top_weighted_keywords(record: &RawArticleRecord, limit: usize) -> Vec<KeywordCount> {
    let text = format!("{} {}", record.headline(), record.body()).to_lowercase();

    let mut freq: IndexMap<String, usize> = IndexMap::new();
    for m in RE_WORD.find_iter(&text) {
        let w = m.as_str();
        if !STOP_WORDS.contains(w) {
            *freq.entry(w.to_string()).or_insert(0) += 1;
        }
    }
    for entity in resolve_entities(record) {
        let needle = entity.to_lowercase();
        if needle.is_empty() {
            continue;
        }
        let n = text.matches(needle.as_str()).count();
        if n > 0 {
            freq.insert(entity, n);
        }
    }

    let mut ranked: Vec<(String, usize)> = freq.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(limit)
        .map(|(word, count)| KeywordCount { word, count })
        .collect()
}

fn rank(freq: IndexMap<String, usize>, limit: usize) -> Vec<EntityCount> {
    let mut ranked: Vec<(String, usize)> = freq.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(limit)
        .map(|(entity, count)| EntityCount { entity, count })
        .collect()
}

/// Cross-article entity frequency.
///
/// With an entity selected the table collapses to that entity alone.
pub fn entity_frequency<'a, I>(
    records: I,
    selected_entity: Option<&str>,
    limits: &AggregateLimits,
) -> Vec<EntityCount>
where
    I: IntoIterator<Item = &'a RawArticleRecord>,
{
    if let Some(e) = selected_entity.filter(|e| !e.is_empty()) {
        return vec![EntityCount {
            entity: e.to_string(),
            count: 1,
        }];
    }
    let mut freq: IndexMap<String, usize> = IndexMap::new();
    for r in records {
        for e in resolve_entities(r) {
            if e.chars().count() >= limits.min_entity_chars {
                *freq.entry(e).or_insert(0) += 1;
            }
        }
    }
    rank(freq, limits.entity_limit)
}

/// Entity table for the keyword cloud, falling back to summed per-article
/// keywords when no record carries entities.
pub fn top_terms(
    records: &[&RawArticleRecord],
    selected_entity: Option<&str>,
    limits: &AggregateLimits,
) -> Vec<EntityCount> {
    let entities = entity_frequency(records.iter().copied(), selected_entity, limits);
    if !entities.is_empty() {
        return entities;
    }
    let mut freq: IndexMap<String, usize> = IndexMap::new();
    for r in records {
        for kw in top_weighted_keywords(r, limits.keyword_limit) {
            *freq.entry(kw.word).or_insert(0) += kw.count;
        }
    }
    rank(freq, limits.entity_limit)
}

fn percent_of(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}

/// Coverage counts; percentages are shares of `total_known` (the backend's
/// article count) or, when that is missing or zero, of the list itself.
pub fn media_coverage_breakdown(
    records: &[&RawArticleRecord],
    total_known: Option<usize>,
) -> CoverageSummary {
    let mut s = CoverageSummary::default();
    for r in records {
        let has_bd = !resolve_matches(r, CoverageSide::Bangladeshi).is_empty();
        let has_intl = !resolve_matches(r, CoverageSide::International).is_empty();
        if has_bd || has_intl {
            s.total_covered_articles += 1;
        }
        if has_bd {
            s.total_bd += 1;
        }
        if has_intl {
            s.total_intl += 1;
        }
        if has_bd && has_intl {
            s.both_covered += 1;
        }
    }
    s.total_news = total_known.filter(|n| *n > 0).unwrap_or(records.len());
    s.percentages = CoveragePercentages {
        bd: percent_of(s.total_bd, s.total_news),
        intl: percent_of(s.total_intl, s.total_news),
        both: percent_of(s.both_covered, s.total_news),
        total: 100.0,
    };
    s
}

/// Chart aggregates.
///
/// `chart_records` drive the category, sentiment, fact-check and coverage
/// charts; `table_records` drive the entity/keyword cloud, which follows the
/// visible table.
pub fn aggregate(
    chart_records: &[&RawArticleRecord],
    table_records: &[&RawArticleRecord],
    total_known: Option<usize>,
    selected_entity: Option<&str>,
    limits: &AggregateLimits,
) -> DashboardAggregates {
    let sentiments = sentiment_counts(chart_records.iter().copied());
    DashboardAggregates {
        categories: category_counts(chart_records.iter().copied()),
        sentiment_stats: sentiment_stats(&sentiments),
        sentiments,
        fact_checks: fact_check_buckets(chart_records.iter().copied()),
        top_terms: top_terms(table_records, selected_entity, limits),
        coverage: media_coverage_breakdown(chart_records, total_known),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rec(v: serde_json::Value) -> RawArticleRecord {
        RawArticleRecord::from_value(v)
    }

    #[test]
    fn count_by_keeps_first_seen_order() {
        let rs = [
            rec(json!({"sentiment": "negative"})),
            rec(json!({"sentiment": "positive"})),
            rec(json!({"sentiment": "NEGATIVE"})),
            rec(json!({})),
        ];
        let c = sentiment_counts(rs.iter());
        let labels: Vec<&str> = c.keys().map(String::as_str).collect();
        assert_eq!(labels, vec!["Negative", "Positive", "Neutral"]);
        assert_eq!(c["Negative"], 2);
    }

    #[test]
    fn stat_cards_fill_missing_with_zero() {
        let mut c = LabelCounts::new();
        c.insert("Neutral".into(), 4);
        let stats = sentiment_stats(&c);
        assert_eq!(stats.len(), 4);
        assert_eq!(stats[0], SentimentStat { label: "Positive", value: 0 });
        assert_eq!(stats[2].value, 4);
    }

    #[test]
    fn keywords_skip_stop_words_and_short_tokens() {
        let r = rec(json!({
            "headline": "The flood and the river",
            "text": "River flood flood at an old dam"
        }));
        let kw = top_weighted_keywords(&r, 5);
        assert_eq!(kw[0], KeywordCount { word: "flood".into(), count: 3 });
        assert_eq!(kw[1], KeywordCount { word: "river".into(), count: 2 });
        assert!(kw.iter().all(|k| k.word != "the" && k.word != "at"));
    }

    #[test]
    fn multi_word_entity_is_a_keyword() {
        let r = rec(json!({
            "headline": "Sheikh Hasina meets officials",
            "text": "Talks with sheikh hasina continued.",
            "entities": ["Sheikh Hasina", "Absent Entity", ""]
        }));
        let kw = top_weighted_keywords(&r, 10);
        assert!(kw.contains(&KeywordCount { word: "Sheikh Hasina".into(), count: 2 }));
        assert!(kw.iter().all(|k| k.word != "Absent Entity" && !k.word.is_empty()));
    }

    #[test]
    fn entity_frequency_filters_short_and_caps() {
        let rs = [
            rec(json!({"entities": ["Dhaka", "UN", "India"]})),
            rec(json!({"entities": ["India"]})),
        ];
        let limits = AggregateLimits {
            entity_limit: 1,
            ..Default::default()
        };
        let f = entity_frequency(rs.iter(), None, &limits);
        assert_eq!(f, vec![EntityCount { entity: "India".into(), count: 2 }]);

        let sel = entity_frequency(rs.iter(), Some("Dhaka"), &limits);
        assert_eq!(sel, vec![EntityCount { entity: "Dhaka".into(), count: 1 }]);
    }

    #[test]
    fn top_terms_falls_back_to_keywords() {
        let r = rec(json!({"headline": "Padma bridge", "text": "padma toll"}));
        let terms = top_terms(&[&r], None, &AggregateLimits::default());
        assert_eq!(terms[0], EntityCount { entity: "padma".into(), count: 2 });
    }

    #[test]
    fn percentages_use_known_total() {
        let rs = [
            rec(json!({"bangladeshi_matches": [{"title": "a"}], "international_matches": [{"title": "b"}]})),
            rec(json!({"bangladeshi_matches": [{"title": "c"}]})),
            rec(json!({})),
        ];
        let refs: Vec<&RawArticleRecord> = rs.iter().collect();
        let s = media_coverage_breakdown(&refs, Some(8));
        assert_eq!(s.total_bd, 2);
        assert_eq!(s.total_intl, 1);
        assert_eq!(s.both_covered, 1);
        assert_eq!(s.total_covered_articles, 2);
        assert_eq!(s.total_news, 8);
        assert_eq!(s.percentages.bd, 25.0);
        assert_eq!(s.percentages.intl, 12.5);
        assert_eq!(s.percentages.total, 100.0);

        let s = media_coverage_breakdown(&refs, Some(0));
        assert_eq!(s.total_news, 3);
        assert_eq!(s.percentages.bd, 66.7);
    }
}
