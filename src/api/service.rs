//! Shared business logic for the dashboard API
//!
//! Every call reloads the dataset from disk and recomputes from scratch.

use anyhow::{Context, Result};
use std::collections::HashSet;
use tracing::{debug, info};

use crate::config::ServiceConfig;
use crate::dataset;
use crate::metrics::{aggregate, compare, Comparison};
use crate::models::{OnboardingRecord, Period};
use crate::weeks::{resolve_with, WeekInfo};

// ============================================================================
// Data Structures
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SupplierComparison {
    pub supplier: String,
    /// Distinct cases in the current week
    pub total_onboarding: usize,
    pub comparison: Comparison,
}

// ============================================================================
// Pure computations over a loaded dataset
// ============================================================================

/// Distinct supplier names in first-appearance order
pub fn supplier_names(records: &[OnboardingRecord]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.supplier_name.as_str()))
        .map(|r| r.supplier_name.clone())
        .collect()
}

fn in_period(records: &[OnboardingRecord], period: Period) -> Vec<&OnboardingRecord> {
    records.iter().filter(|r| r.in_period(period)).collect()
}

/// Whole-dataset comparison, `None` when either week has no records
pub fn overall_comparison(records: &[OnboardingRecord], weeks: &WeekInfo) -> Option<Comparison> {
    let current = in_period(records, weeks.current());
    let previous = in_period(records, weeks.previous());

    if current.is_empty() || previous.is_empty() {
        debug!(
            "Not enough data: {} current / {} previous records",
            current.len(),
            previous.len()
        );
        return None;
    }

    Some(compare(aggregate(current), aggregate(previous)))
}

/// One row per supplier active in the current week, busiest first
pub fn supplier_table(records: &[OnboardingRecord], weeks: &WeekInfo) -> Vec<SupplierComparison> {
    let current_period = weeks.current();
    let previous_period = weeks.previous();

    let mut rows: Vec<SupplierComparison> = supplier_names(records)
        .into_iter()
        .filter_map(|supplier| {
            let of_supplier = |period: Period| {
                records
                    .iter()
                    .filter(|r| r.supplier_name == supplier && r.in_period(period))
                    .collect::<Vec<_>>()
            };

            let current = of_supplier(current_period);
            if current.is_empty() {
                return None;
            }
            let previous = of_supplier(previous_period);

            let current = aggregate(current);
            let total_onboarding = current.total_onboarding;
            let comparison = compare(current, aggregate(previous));

            Some(SupplierComparison {
                supplier,
                total_onboarding,
                comparison,
            })
        })
        .collect();

    rows.sort_by(|a, b| b.total_onboarding.cmp(&a.total_onboarding));
    rows
}

// ============================================================================
// Onboarding Service
// ============================================================================

pub struct OnboardingService {
    config: ServiceConfig,
}

impl OnboardingService {
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }

    pub fn week_info(&self) -> WeekInfo {
        resolve_with(self.config.today(), self.config.rollback)
    }

    /// Read the backing file on the blocking pool
    async fn load_records(&self) -> Result<Vec<OnboardingRecord>> {
        let path = self.config.data_path.clone();
        let records = tokio::task::spawn_blocking(move || dataset::load(&path))
            .await
            .context("dataset load task failed")?;
        Ok(records)
    }

    pub async fn get_suppliers(&self) -> Result<Vec<String>> {
        let records = self.load_records().await?;
        Ok(supplier_names(&records))
    }

    pub async fn get_overall_metrics(&self) -> Result<Option<Comparison>> {
        let records = self.load_records().await?;
        let weeks = self.week_info();
        info!(
            "Overall comparison for week {}/{} vs {}/{}",
            weeks.current_week, weeks.current_year, weeks.previous_week, weeks.previous_year
        );
        Ok(overall_comparison(&records, &weeks))
    }

    pub async fn get_all_suppliers_data(&self) -> Result<Vec<SupplierComparison>> {
        let records = self.load_records().await?;
        let weeks = self.week_info();
        let rows = supplier_table(&records, &weeks);
        info!(
            "Supplier table for week {}/{}: {} suppliers",
            weeks.current_week,
            weeks.current_year,
            rows.len()
        );
        Ok(rows)
    }
}
