//! Per-period aggregation and week-over-week comparison.
//!
//! Means are `Option<f64>` throughout: a period with no usable values has no
//! mean, which is different from a mean of zero.

use serde::Serialize;
use std::collections::HashSet;

use crate::models::{Indicator, IndicatorValues, OnboardingRecord};

/// Indicator means plus the number of distinct cases for one record subset
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregate {
    pub means: IndicatorValues,
    pub total_onboarding: usize,
}

/// Current and previous aggregates with `current - previous` per indicator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub current: Aggregate,
    pub previous: Aggregate,
    pub differences: IndicatorValues,
}

/// Arithmetic mean of the present values, `None` when there are none.
pub fn mean(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count > 0 {
        Some(sum / count as f64)
    } else {
        None
    }
}

pub fn aggregate<'a, I>(records: I) -> Aggregate
where
    I: IntoIterator<Item = &'a OnboardingRecord>,
{
    let records: Vec<&OnboardingRecord> = records.into_iter().collect();

    let means = IndicatorValues::from_fn(|indicator| {
        mean(records.iter().map(|r| r.indicators.get(indicator)))
    });

    let total_onboarding = records
        .iter()
        .filter_map(|r| r.case_id.as_deref())
        .collect::<HashSet<_>>()
        .len();

    Aggregate {
        means,
        total_onboarding,
    }
}

/// `current - previous` for every indicator present on both sides
pub fn difference(current: &IndicatorValues, previous: &IndicatorValues) -> IndicatorValues {
    IndicatorValues::from_fn(|indicator: Indicator| {
        match (current.get(indicator), previous.get(indicator)) {
            (Some(c), Some(p)) => Some(c - p),
            _ => None,
        }
    })
}

pub fn compare(current: Aggregate, previous: Aggregate) -> Comparison {
    let differences = difference(&current.means, &previous.means);
    Comparison {
        current,
        previous,
        differences,
    }
}
