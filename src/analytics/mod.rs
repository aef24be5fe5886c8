//! # Analytics
//!
//! On-demand aggregate statistics over a form's submission history.
//!
//! A report is rebuilt from scratch on every request with a single
//! forward scan. PII fields are excluded from every output structure.

mod aggregator;
mod report;

pub use aggregator::{aggregate, Aggregator, TREND_DAYS};
pub use report::{AnalyticsReport, FieldDistribution, SkippedField, TrendPoint};
