//! CSV loading for onboarding cases.
//!
//! The file is read in full on every call; nothing is cached between calls.

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::Path;
use tracing::{debug, error, info};

use crate::models::{CsvRecord, Indicator, OnboardingRecord};

const SUPPLIER_COLUMN: &str = "supplier_name";
const DATE_COLUMNS: [&str; 2] = ["onboard_date", "onboard_date_v2"];

/// Load the dataset, logging and swallowing any failure.
///
/// A missing or corrupt file yields an empty dataset. Use [`try_load`] to tell
/// the two apart.
pub fn load(path: &Path) -> Vec<OnboardingRecord> {
    match try_load(path) {
        Ok(records) => records,
        Err(e) => {
            error!("Error loading data from {}: {:#}", path.display(), e);
            Vec::new()
        }
    }
}

/// Load the dataset, failing on unreadable files, missing columns or overlong rows.
///
/// Rows shorter than the header are padded with empty cells.
pub fn try_load(path: &Path) -> Result<Vec<OnboardingRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let headers = reader.headers()?.clone();
    check_columns(&headers)?;

    let mut records = Vec::new();
    let mut dropped = 0usize;
    let mut padded = 0usize;

    for (i, row) in reader.records().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let line = i + 2;
        let mut row = row.with_context(|| format!("malformed row at line {}", line))?;
        if row.len() > headers.len() {
            bail!(
                "row at line {} has {} fields, header has {}",
                line,
                row.len(),
                headers.len()
            );
        }
        if row.len() < headers.len() {
            padded += 1;
            while row.len() < headers.len() {
                row.push_field("");
            }
        }

        let raw: CsvRecord = row
            .deserialize(Some(&headers))
            .with_context(|| format!("malformed row at line {}", line))?;
        match raw.into_record() {
            Some(record) => records.push(record),
            None => dropped += 1,
        }
    }

    let undated = records.iter().filter(|r| r.period().is_none()).count();
    if padded > 0 {
        debug!("Padded {} short rows with empty cells", padded);
    }
    if dropped > 0 {
        debug!("Dropped {} rows without a supplier name", dropped);
    }
    info!(
        "Loaded {} onboarding records from {} ({} without a usable date)",
        records.len(),
        path.display(),
        undated
    );

    Ok(records)
}

fn check_columns(headers: &StringRecord) -> Result<()> {
    let has = |name: &str| headers.iter().any(|h| h == name);

    let mut missing: Vec<&str> = Vec::new();
    if !has(SUPPLIER_COLUMN) {
        missing.push(SUPPLIER_COLUMN);
    }
    if !DATE_COLUMNS.iter().any(|c| has(c)) {
        missing.push(DATE_COLUMNS[0]);
    }
    missing.extend(Indicator::ALL.iter().map(|i| i.column()).filter(|c| !has(c)));

    if !missing.is_empty() {
        bail!("missing required columns: {}", missing.join(", "));
    }
    Ok(())
}
