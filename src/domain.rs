// src/domain.rs
//! Small string helpers shared by the resolver, screen and aggregator.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::record::RawArticleRecord;

static RE_SCHEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://").expect("scheme regex"));
static RE_WWW: Lazy<Regex> = Lazy::new(|| Regex::new(r"^www\.").expect("www regex"));

// Generic, country-code and legacy suffixes, optionally followed by one more label
// (covers `co.uk`, `com.bd`, ...).
static RE_TLD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\.(com|in|org|net|co|info|gov|edu|int|mil|biz|io|ai|news|tv|me|us|uk|bd|au|ca|pk|lk|np|my|sg|ph|id|cn|jp|kr|ru|fr|de|es|it|nl|se|no|fi|dk|pl|cz|tr|ir|sa|ae|qa|kw|om|bh|jo|lb|sy|iq|ye|il|za|ng|ke|gh|tz|ug|zm|zw|mu|mg|ma|dz|tn|ly|eg|sd|et|sn|cm|ci|sl|gm|lr|bw|na|mz|ao|cd|cg|ga|gq|gw|st|cv|sc|km|eh|so|ss|cf|td|ne|ml|bf|bj|tg|gn|mr|sm|va|mc|ad|li|gi|je|gg|im|fo|gl|sj|ax|eu|asia|cat|arpa|pro|museum|coop|aero|xxx|idv|mobi|name|jobs|travel|post|geo|tel|root|test|example|invalid|localhost)",
        r"(\.[a-z]{2,})?$"
    ))
    .expect("tld regex")
});

/// Strip scheme, `www.` and the top-level-domain suffix from a source hostname.
///
/// `https://www.thedailystar.net` → `thedailystar`, `bbc.co.uk` → `bbc`.
pub fn strip_tld(domain: &str) -> String {
    if domain.is_empty() {
        return String::new();
    }
    let d = RE_SCHEME.replace(domain, "");
    let d = RE_WWW.replace(&d, "");
    RE_TLD.replace(&d, "").into_owned()
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Hostname for a link shown next to a source or match.
///
/// `"No URL"` when there is no link; the raw string when it does not parse.
pub fn display_host(url: Option<&str>) -> String {
    let raw = match url.map(str::trim) {
        Some(u) if !u.is_empty() => u,
        _ => return "No URL".to_string(),
    };
    match Url::parse(raw) {
        Ok(parsed) => match parsed.host_str() {
            Some(h) => h.to_string(),
            None => raw.to_string(),
        },
        Err(_) => raw.to_string(),
    }
}

/// Source column label: `source_domain` (or `source`) without its TLD.
pub fn source_label(record: &RawArticleRecord) -> String {
    strip_tld(record.source_host())
}

/// Relevance score as shown in the table.
pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(s) if s != 0.0 && s.is_finite() => format!("{s:.3}"),
        Some(s) if !s.is_finite() => "-".to_string(),
        _ => "Not Available".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_tld_handles_common_shapes() {
        assert_eq!(strip_tld("https://www.thedailystar.net"), "thedailystar");
        assert_eq!(strip_tld("bbc.co.uk"), "bbc");
        assert_eq!(strip_tld("prothomalo.com"), "prothomalo");
        assert_eq!(strip_tld("news.google.com"), "news.google");
        assert_eq!(strip_tld("localhost-only"), "localhost-only");
        assert_eq!(strip_tld(""), "");
    }

    #[test]
    fn capitalize_lowers_the_tail() {
        assert_eq!(capitalize("pOSITIVE"), "Positive");
        assert_eq!(capitalize("b"), "B");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn display_host_never_fails() {
        assert_eq!(
            display_host(Some("https://www.bbc.com/news/1")),
            "www.bbc.com"
        );
        assert_eq!(display_host(Some("not a url")), "not a url");
        assert_eq!(display_host(Some("  ")), "No URL");
        assert_eq!(display_host(None), "No URL");
    }

    #[test]
    fn score_formatting() {
        assert_eq!(format_score(None), "Not Available");
        assert_eq!(format_score(Some(0.0)), "Not Available");
        assert_eq!(format_score(Some(0.12345)), "0.123");
    }
}
