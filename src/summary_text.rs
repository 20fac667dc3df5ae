// src/summary_text.rs
//! Summary text with tiered fallback.
//!
//! The article page tries analysis output first; when the pipeline produced
//! nothing usable a short extract is synthesized from the article body. The
//! dashboard table only looks at the parsed summary.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::{RawArticleRecord, SummaryField, SummaryPayload};

pub const SUMMARY_NOT_AVAILABLE: &str = "Summary not available for this article.";
pub const NO_SUMMARY_AVAILABLE: &str = "No summary available.";

const MAX_EXTRACT_SUMMARY_CHARS: usize = 600;
const MIN_BODY_CHARS: usize = 100;
const SENTENCE_BUDGET_CHARS: usize = 300;
const MIN_SENTENCE_SUMMARY_CHARS: usize = 50;
const VERBATIM_BODY_CHARS: usize = 400;
const PREFIX_CHARS: usize = 300;
const MIN_PREFIX_CUT: usize = 100;

static RE_SENTENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^.!?]+[.!?]+").expect("sentence regex"));

fn filled(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.trim().is_empty())
}

/// Dashboard rule: `summary_text`, then `summary`, of the parsed payload.
pub(crate) fn resolve_short(summary: &SummaryPayload) -> String {
    filled(&summary.summary_text)
        .or_else(|| filled(&summary.summary))
        .unwrap_or(NO_SUMMARY_AVAILABLE)
        .to_string()
}

pub(crate) fn resolve(record: &RawArticleRecord, summary: &SummaryPayload) -> String {
    if let Some(s) = filled(&summary.summary_text)
        .or_else(|| filled(&summary.summary))
        .or_else(|| filled(&record.summary_text))
    {
        return s.to_string();
    }
    if let SummaryField::Encoded(raw) = &record.summary {
        if !raw.trim().is_empty() {
            return raw.clone();
        }
    }
    if let Some(s) = filled(&summary.extract_summary) {
        if s.chars().count() < MAX_EXTRACT_SUMMARY_CHARS {
            return s.to_string();
        }
    }
    from_body(record.body()).unwrap_or_else(|| SUMMARY_NOT_AVAILABLE.to_string())
}

/// Lead sentences of the body, or a sentence-aligned prefix of it.
pub fn from_body(body: &str) -> Option<String> {
    if body.trim().chars().count() <= MIN_BODY_CHARS {
        return None;
    }

    // Matches keep their leading whitespace; only the joined lead is trimmed.
    let sentences: Vec<&str> = RE_SENTENCE.find_iter(body).map(|m| m.as_str()).collect();
    if !sentences.is_empty() {
        let mut lead = join_lead(&sentences, 3);
        if lead.chars().count() > SENTENCE_BUDGET_CHARS {
            lead = join_lead(&sentences, 2);
        }
        if lead.chars().count() > MIN_SENTENCE_SUMMARY_CHARS {
            return Some(lead);
        }
    }

    if body.chars().count() < VERBATIM_BODY_CHARS {
        return Some(body.trim().to_string());
    }

    let prefix: String = body.chars().take(PREFIX_CHARS).collect();
    let cut = prefix.rfind('.')?;
    if prefix[..cut].chars().count() > MIN_PREFIX_CUT {
        Some(prefix[..=cut].trim().to_string())
    } else {
        None
    }
}

fn join_lead(sentences: &[&str], n: usize) -> String {
    sentences
        .iter()
        .take(n)
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}
