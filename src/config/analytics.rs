// src/config/analytics.rs
//! Tunables for the quality screen and the aggregator.
//!
//! Lookup order:
//! 1) `$SIMS_ANALYTICS_CONFIG` (must exist when set)
//! 2) `config/analytics.toml`
//! 3) `config/analytics.json`
//! 4) built-in defaults
//!
//! TOML shape:
//! ```toml
//! [quality]
//! bogus_title_phrases = ["latest news", "live"]
//! required_keyword = "bangladesh"
//! min_body_chars = 100
//!
//! [aggregate]
//! keyword_limit = 5
//! entity_limit = 35
//! min_entity_chars = 3
//! ```

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const ENV_CONFIG_PATH: &str = "SIMS_ANALYTICS_CONFIG";
pub const DEFAULT_TOML_PATH: &str = "config/analytics.toml";
pub const DEFAULT_JSON_PATH: &str = "config/analytics.json";

const DEFAULT_BOGUS_TITLE_PHRASES: [&str; 9] = [
    "latest news",
    "breaking news",
    "top headlines",
    "home",
    "update",
    "today",
    "live",
    "videos",
    "photos",
];

/// Heuristics that decide whether a record is a real article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityRules {
    /// Lower-case phrases that mark listing/landing pages when found in a headline.
    pub bogus_title_phrases: Vec<String>,
    /// Keyword an article must mention (body, or headline when the body is short).
    pub required_keyword: String,
    /// Bodies shorter than this are judged by their headline.
    pub min_body_chars: usize,
}

impl Default for QualityRules {
    fn default() -> Self {
        Self {
            bogus_title_phrases: DEFAULT_BOGUS_TITLE_PHRASES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            required_keyword: "bangladesh".to_string(),
            min_body_chars: 100,
        }
    }
}

/// Caps for frequency tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateLimits {
    pub keyword_limit: usize,
    pub entity_limit: usize,
    /// Entities shorter than this are ignored by the cross-article table.
    pub min_entity_chars: usize,
}

impl Default for AggregateLimits {
    fn default() -> Self {
        Self {
            keyword_limit: 5,
            entity_limit: 35,
            min_entity_chars: 3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub quality: QualityRules,
    pub aggregate: AggregateLimits,
}

impl AnalyticsConfig {
    /// Load from an explicit path. TOML or JSON, chosen by extension.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading analytics config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = Self::parse(&content, &ext)
            .with_context(|| format!("parsing analytics config {}", path.display()))?;
        info!(path = %path.display(), "analytics config loaded");
        Ok(cfg)
    }

    /// Load using the env var and default paths, else built-in defaults.
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!(
                "{ENV_CONFIG_PATH} points to non-existent path {}",
                pb.display()
            ));
        }
        for p in [DEFAULT_TOML_PATH, DEFAULT_JSON_PATH] {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
        }
        Ok(Self::default())
    }

    /// Parse TOML or JSON. Without a usable extension hint both are tried.
    pub fn parse(s: &str, hint_ext: &str) -> Result<Self> {
        let cfg: Self = match hint_ext {
            "toml" => toml::from_str(s)?,
            "json" => serde_json::from_str(s)?,
            _ => match toml::from_str(s) {
                Ok(c) => c,
                Err(_) => serde_json::from_str(s)
                    .map_err(|_| anyhow!("unsupported analytics config format"))?,
            },
        };
        Ok(cfg.sanitized())
    }

    fn sanitized(mut self) -> Self {
        self.quality.bogus_title_phrases = clean_list(self.quality.bogus_title_phrases);
        self.quality.required_keyword = self.quality.required_keyword.trim().to_lowercase();
        self
    }
}

/// Trim, lower-case, drop empties and duplicates (first occurrence wins).
fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim().to_lowercase();
        if !t.is_empty() && !out.contains(&t) {
            out.push(t);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_heuristics() {
        let c = AnalyticsConfig::default();
        assert_eq!(c.quality.bogus_title_phrases.len(), 9);
        assert_eq!(c.quality.required_keyword, "bangladesh");
        assert_eq!(c.quality.min_body_chars, 100);
        assert_eq!(c.aggregate.keyword_limit, 5);
        assert_eq!(c.aggregate.entity_limit, 35);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let toml = r#"
            [quality]
            bogus_title_phrases = [" LIVE ", "", "live", "Photos"]

            [aggregate]
            entity_limit = 10
        "#;
        let c = AnalyticsConfig::parse(toml, "toml").unwrap();
        assert_eq!(
            c.quality.bogus_title_phrases,
            vec!["live".to_string(), "photos".to_string()]
        );
        assert_eq!(c.quality.required_keyword, "bangladesh");
        assert_eq!(c.aggregate.entity_limit, 10);
        assert_eq!(c.aggregate.keyword_limit, 5);
    }

    #[test]
    fn json_without_hint_is_detected() {
        let json = r#"{"quality": {"required_keyword": " Dhaka "}}"#;
        let c = AnalyticsConfig::parse(json, "").unwrap();
        assert_eq!(c.quality.required_keyword, "dhaka");
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(AnalyticsConfig::parse("{{ nope", "").is_err());
    }
}
