//! Current / previous ISO week resolution.

use chrono::{Duration, NaiveDate};

use crate::models::Period;

/// How the previous week is derived from the current one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum RollbackRule {
    /// Week 1 rolls back to week 52 of the prior year, even in 53-week years
    #[default]
    Fixed52,
    /// ISO week of the date seven days earlier
    IsoCalendar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekInfo {
    pub current_week: u32,
    pub current_year: i32,
    pub previous_week: u32,
    pub previous_year: i32,
}

impl WeekInfo {
    pub fn current(&self) -> Period {
        Period::new(self.current_week, self.current_year)
    }

    pub fn previous(&self) -> Period {
        Period::new(self.previous_week, self.previous_year)
    }
}

/// Resolve the current and previous periods for `today` using the fixed-52 rule.
pub fn resolve(today: NaiveDate) -> WeekInfo {
    resolve_with(today, RollbackRule::Fixed52)
}

pub fn resolve_with(today: NaiveDate, rule: RollbackRule) -> WeekInfo {
    let current = Period::of(today);

    let previous = match rule {
        RollbackRule::Fixed52 if current.week > 1 => Period::new(current.week - 1, current.year),
        RollbackRule::Fixed52 => Period::new(52, current.year - 1),
        RollbackRule::IsoCalendar => Period::of(today - Duration::days(7)),
    };

    WeekInfo {
        current_week: current.week,
        current_year: current.year,
        previous_week: previous.week,
        previous_year: previous.year,
    }
}
