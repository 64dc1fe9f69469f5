//! Aggregation cadence: the fixed period width used to bucket timestamps.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use std::fmt;
use std::str::FromStr;

/// Fixed-width period used to bin observations.
///
/// Periods are labelled by their closing day at midnight UTC. A weekly
/// period ending on Sunday covers Monday 00:00 through Sunday 23:59:59 and
/// carries Sunday's date; a daily period carries its own date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// One calendar day.
    Daily,
    /// One calendar week closing on the given weekday.
    Weekly { week_ends_on: Weekday },
}

impl Default for Cadence {
    fn default() -> Self {
        Cadence::weekly()
    }
}

impl Cadence {
    /// Calendar week ending on Sunday.
    pub fn weekly() -> Self {
        Cadence::Weekly {
            week_ends_on: Weekday::Sun,
        }
    }

    /// Calendar week ending on the given weekday.
    pub fn weekly_ending(week_ends_on: Weekday) -> Self {
        Cadence::Weekly { week_ends_on }
    }

    /// Width of one period.
    pub fn step(&self) -> Duration {
        match self {
            Cadence::Daily => Duration::days(1),
            Cadence::Weekly { .. } => Duration::weeks(1),
        }
    }

    /// Width of one period in days.
    pub fn step_days(&self) -> f64 {
        self.step().num_seconds() as f64 / 86_400.0
    }

    /// Label of the period containing `timestamp`.
    pub fn period_label(&self, timestamp: DateTime<Utc>) -> DateTime<Utc> {
        let date = timestamp.date_naive();
        let closing = match self {
            Cadence::Daily => date,
            Cadence::Weekly { week_ends_on } => {
                let current = date.weekday().num_days_from_monday() as i64;
                let target = week_ends_on.num_days_from_monday() as i64;
                date + Duration::days((target - current).rem_euclid(7))
            }
        };
        midnight(closing)
    }

    /// Label `periods` steps after `label`.
    ///
    /// Fails when the result falls outside the representable calendar.
    pub fn advance(&self, label: DateTime<Utc>, periods: i64) -> Result<DateTime<Utc>> {
        let offset = match self {
            Cadence::Daily => Duration::try_days(periods),
            Cadence::Weekly { .. } => Duration::try_weeks(periods),
        };
        offset
            .and_then(|offset| label.checked_add_signed(offset))
            .ok_or_else(|| {
                ForecastError::Configuration(format!(
                    "{} periods of {} after {} is outside the supported date range",
                    periods, self, label
                ))
            })
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

fn weekday_from_code(code: &str) -> Option<Weekday> {
    match code {
        "MON" => Some(Weekday::Mon),
        "TUE" => Some(Weekday::Tue),
        "WED" => Some(Weekday::Wed),
        "THU" => Some(Weekday::Thu),
        "FRI" => Some(Weekday::Fri),
        "SAT" => Some(Weekday::Sat),
        "SUN" => Some(Weekday::Sun),
        _ => None,
    }
}

fn weekday_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MON",
        Weekday::Tue => "TUE",
        Weekday::Wed => "WED",
        Weekday::Thu => "THU",
        Weekday::Fri => "FRI",
        Weekday::Sat => "SAT",
        Weekday::Sun => "SUN",
    }
}

impl FromStr for Cadence {
    type Err = ForecastError;

    /// Accepts `D`, `daily`, `W`, `weekly` and anchored weeks `W-MON` … `W-SUN`.
    fn from_str(text: &str) -> Result<Self> {
        let normalized = text.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "D" | "DAILY" => Ok(Cadence::Daily),
            "W" | "WEEKLY" => Ok(Cadence::weekly()),
            other => other
                .strip_prefix("W-")
                .and_then(weekday_from_code)
                .map(Cadence::weekly_ending)
                .ok_or_else(|| {
                    ForecastError::Configuration(format!(
                        "unknown aggregation cadence '{}': expected D, W or W-MON..W-SUN",
                        text
                    ))
                }),
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cadence::Daily => f.write_str("D"),
            Cadence::Weekly { week_ends_on } => write!(f, "W-{}", weekday_code(*week_ends_on)),
        }
    }
}
