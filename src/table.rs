// src/table.rs
//! Sorting and paging of the visible article table.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::record::RawArticleRecord;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Date,
    Headline,
    Source,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

/// Unix millis of an ISO-8601 date; anything unparseable counts as the epoch.
pub fn date_millis(raw: Option<&str>) -> i64 {
    let Some(s) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return 0;
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.timestamp_millis();
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return dt.and_utc().timestamp_millis();
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or(0)
}

fn compare(a: &RawArticleRecord, b: &RawArticleRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => date_millis(a.date.as_deref()).cmp(&date_millis(b.date.as_deref())),
        SortKey::Headline => a.headline().cmp(b.headline()),
        SortKey::Source => a.source.as_deref().unwrap_or("").cmp(b.source.as_deref().unwrap_or("")),
    }
}

/// Stable sort; equal keys keep their input order in both directions.
pub fn sort_records(records: &mut [&RawArticleRecord], key: SortKey, dir: SortDir) {
    records.sort_by(|a, b| {
        let ord = compare(a, b, key);
        match dir {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    });
}

/// Number of pages needed for `total` rows (at least 1).
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size).max(1)
}

/// One 1-based page of `items`, or all of them when `show_all` is set.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize, show_all: bool) -> Vec<T> {
    if show_all {
        return items.to_vec();
    }
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if page == 0 || start >= items.len() {
        return Vec::new();
    }
    let end = start.saturating_add(page_size).min(items.len());
    items[start..end].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn date_formats() {
        assert_eq!(date_millis(Some("1970-01-01T00:00:01Z")), 1_000);
        assert_eq!(date_millis(Some("1970-01-01T00:00:02")), 2_000);
        assert_eq!(date_millis(Some("1970-01-02")), 86_400_000);
        assert_eq!(date_millis(Some("yesterday")), 0);
        assert_eq!(date_millis(None), 0);
    }

    #[test]
    fn sort_by_date_desc_keeps_ties_stable() {
        let rs = [
            RawArticleRecord::from_value(json!({"headline": "a", "date": "2024-01-01"})),
            RawArticleRecord::from_value(json!({"headline": "b", "date": "2024-03-01"})),
            RawArticleRecord::from_value(json!({"headline": "c", "date": "2024-01-01"})),
        ];
        let mut v: Vec<&RawArticleRecord> = rs.iter().collect();
        sort_records(&mut v, SortKey::Date, SortDir::Desc);
        let order: Vec<&str> = v.iter().map(|r| r.headline()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn pages() {
        let items: Vec<u32> = (1..=25).collect();
        assert_eq!(paginate(&items, 1, 10, false), (1..=10).collect::<Vec<_>>());
        assert_eq!(paginate(&items, 3, 10, false), (21..=25).collect::<Vec<_>>());
        assert!(paginate(&items, 4, 10, false).is_empty());
        assert!(paginate(&items, 0, 10, false).is_empty());
        assert_eq!(paginate(&items, 9, 10, true).len(), 25);
        assert_eq!(page_count(25, 10), 3);
        assert_eq!(page_count(0, 10), 1);
    }
}
