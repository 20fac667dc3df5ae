// src/lib.rs
// Public library surface for the dashboard and for integration tests.

pub mod aggregate;
pub mod config;
pub mod domain;
pub mod feed;
pub mod record;
pub mod report;
pub mod resolve;
pub mod screen;
pub mod summary_text;
pub mod table;

// ---- Re-exports for stable public API ----
pub use crate::config::AnalyticsConfig;
pub use crate::feed::DashboardFeed;
pub use crate::record::RawArticleRecord;
pub use crate::report::{build_report, DashboardReport, ReportOptions};
pub use crate::resolve::{CategoryDefault, ResolvedArticle, SummaryDefault};
pub use crate::screen::FilterCriteria;
