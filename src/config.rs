use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;

use crate::weeks::RollbackRule;

/// Where the dataset lives and how periods are resolved.
///
/// Shared by the server and the report binary.
#[derive(Debug, Clone, Args)]
pub struct ServiceConfig {
    /// CSV file with one row per onboarding case
    #[arg(long, env = "ONBOARDING_DATA_PATH", default_value = "data/onboarding.csv")]
    pub data_path: PathBuf,

    /// Pin "today" instead of reading the local clock
    #[arg(long, env = "ONBOARDING_AS_OF", value_name = "YYYY-MM-DD")]
    pub as_of: Option<NaiveDate>,

    /// How the previous week is derived from the current one
    #[arg(long, value_enum, default_value_t = RollbackRule::Fixed52)]
    pub rollback: RollbackRule,
}

impl ServiceConfig {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            as_of: None,
            rollback: RollbackRule::default(),
        }
    }

    pub fn with_as_of(mut self, date: NaiveDate) -> Self {
        self.as_of = Some(date);
        self
    }

    pub fn with_rollback(mut self, rule: RollbackRule) -> Self {
        self.rollback = rule;
        self
    }

    /// Reference date for week resolution
    pub fn today(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Local::now().date_naive())
    }
}
