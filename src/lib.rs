//! Week-over-week supplier onboarding metrics.
//!
//! Loads onboarding cases from a CSV file, buckets them by ISO week and
//! compares the current week against the previous one, overall and per
//! supplier. The `api` module serves the results as JSON.

pub mod api;
pub mod config;
pub mod dataset;
pub mod metrics;
pub mod models;
pub mod weeks;
