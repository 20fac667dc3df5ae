// tests/aggregate_coverage.rs
// Aggregator invariants and keyword/entity weighting.

use serde_json::json;
use sims_analytics::aggregate::{
    category_counts, fact_check_buckets, media_coverage_breakdown, top_weighted_keywords,
    FactCheckBuckets, KeywordCount,
};
use sims_analytics::record::RawArticleRecord;

fn rec(v: serde_json::Value) -> RawArticleRecord {
    RawArticleRecord::from_value(v)
}

#[test]
fn entity_and_token_are_separate_keys() {
    let r = rec(json!({
        "headline": "",
        "text": "India india INDIA trade trade",
        "entities": ["India"]
    }));
    let kw = top_weighted_keywords(&r, 5);
    assert_eq!(
        kw,
        vec![
            KeywordCount { word: "india".into(), count: 3 },
            KeywordCount { word: "India".into(), count: 3 },
            KeywordCount { word: "trade".into(), count: 2 },
        ]
    );
}

#[test]
fn keyword_limit_applies() {
    let r = rec(json!({"text": "alpha beta gamma delta epsilon zeta theta"}));
    assert_eq!(top_weighted_keywords(&r, 3).len(), 3);
    assert!(top_weighted_keywords(&r, 0).is_empty());
}

#[test]
fn both_covered_never_exceeds_either_side() {
    let shapes = [
        json!({}),
        json!({"bangladeshi_matches": [{"title": "a"}]}),
        json!({"international_matches": [{"title": "b"}]}),
        json!({"bangladeshi_matches": [{"title": "a"}], "international_matches": [{"title": "b"}]}),
        json!({"fact_check_sources": [{"source_country": "BD"}, {"source_country": "us"}]}),
        json!({"fact_check_sources": [{"source_name": "no country"}]}),
    ];
    // every subset of the shapes
    for mask in 0u32..(1 << shapes.len()) {
        let records: Vec<RawArticleRecord> = shapes
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, v)| rec(v.clone()))
            .collect();
        let refs: Vec<&RawArticleRecord> = records.iter().collect();
        let s = media_coverage_breakdown(&refs, None);
        assert!(s.both_covered <= s.total_bd.min(s.total_intl), "mask {mask}");
        assert!(s.total_covered_articles <= refs.len());
        assert_eq!(s.total_news, refs.len());
    }
}

#[test]
fn fact_check_buckets_are_binary() {
    let rs = [
        rec(json!({"fact_check": {"status": "VERIFIED"}})),
        rec(json!({"fact_check": "true"})),
        rec(json!({"summary": {"fact_check_results": {"status": "partially_verified"}}})),
        rec(json!({})),
    ];
    assert_eq!(
        fact_check_buckets(rs.iter()),
        FactCheckBuckets { verified: 1, unverified: 3 }
    );
}

#[test]
fn category_labels_are_capitalized() {
    let rs = [
        rec(json!({"category": "politics"})),
        rec(json!({"summary": "{\"category\": \"POLITICS\"}"})),
        rec(json!({})),
    ];
    let c = category_counts(rs.iter());
    assert_eq!(c.get("Politics"), Some(&2));
    assert_eq!(c.get("Unknown"), Some(&1));
}
