//! Time Window Resolver and the clock seam.

use std::fmt::Debug;

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

/// Source of "now" for an analysis run.
///
/// Analyses never read the wall clock directly; tests inject a [`FixedClock`].
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time (UTC).
#[derive(Debug, Default, Copy, Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Frozen at midnight UTC of `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        Self(date.and_time(chrono::NaiveTime::MIN).and_utc())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Half-open calendar window `[start, end)`, both bounds at midnight.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl QuarterWindow {
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        let day = at.date();
        day >= self.start && day < self.end
    }

    /// Calendar quarter (1..=4) this window covers.
    pub fn quarter(&self) -> u32 {
        quarter_of(self.start.month())
    }
}

/// Calendar quarter (1..=4) for a month (1..=12).
pub fn quarter_of(month: u32) -> u32 {
    (month.saturating_sub(1)) / 3 + 1
}

/// The calendar quarter containing `now`.
pub fn current_quarter(now: DateTime<Utc>) -> AnalysisResult<QuarterWindow> {
    let today = now.date_naive();
    let start_month = (quarter_of(today.month()) - 1) * 3 + 1;

    let start = NaiveDate::from_ymd_opt(today.year(), start_month, 1).ok_or_else(|| {
        AnalysisError::TimeWindow(format!("no quarter start for {today}"))
    })?;
    let end = start.checked_add_months(Months::new(3)).ok_or_else(|| {
        AnalysisError::TimeWindow(format!("quarter starting {start} ends out of range"))
    })?;

    Ok(QuarterWindow { start, end })
}
