//! Survey dates
//!
//! 3D files store dates either as Unix timestamps (versions 4 to 6) or as day
//! counts from 1900-01-01 (version 7 onwards). Both become a calendar day.

use chrono::{DateTime, Days, NaiveDate};
use std::fmt;

/// A calendar day on which survey data was collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurveyDate(pub NaiveDate);

impl SurveyDate {
    /// Day 0 of the day-count encoding.
    pub fn day_zero() -> Self {
        SurveyDate(NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN))
    }

    /// `None` when the count runs past the last representable day.
    pub fn from_days_since_1900(days: u32) -> Option<Self> {
        Self::day_zero()
            .0
            .checked_add_days(Days::new(u64::from(days)))
            .map(SurveyDate)
    }

    /// Day containing a Unix timestamp, in UTC.
    pub fn from_unix_seconds(seconds: u32) -> Option<Self> {
        DateTime::from_timestamp(i64::from(seconds), 0).map(|t| SurveyDate(t.date_naive()))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Days from 1900-01-01.
    pub fn days_since_1900(&self) -> i64 {
        self.0.signed_duration_since(Self::day_zero().0).num_days()
    }
}

impl From<NaiveDate> for SurveyDate {
    fn from(date: NaiveDate) -> Self {
        SurveyDate(date)
    }
}

impl fmt::Display for SurveyDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Inclusive date range of a leg; single dates have `first == last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub first: SurveyDate,
    pub last: SurveyDate,
}

impl DateRange {
    pub fn single(date: SurveyDate) -> Self {
        DateRange {
            first: date,
            last: date,
        }
    }

    pub fn new(first: SurveyDate, last: SurveyDate) -> Self {
        DateRange { first, last }
    }

    /// Number of days covered, counting both ends.
    pub fn days(&self) -> i64 {
        self.last.0.signed_duration_since(self.first.0).num_days() + 1
    }
}
