// src/config/mod.rs
pub mod analytics;

pub use analytics::{AggregateLimits, AnalyticsConfig, QualityRules};
