//! Named calendar periods and their UTC ranges.
//!
//! The asymmetry here is deliberate and load-bearing: THIS_WEEK and
//! THIS_MONTH are to-date windows ending at `now` exactly, while LAST_WEEK
//! and LAST_MONTH span the full prior calendar unit with both endpoints
//! fixed at day boundaries. Do not "fix" one to match the other.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// A named, resolvable calendar window. Wire-stable string set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "TODAY")]
    Today,
    #[serde(rename = "YESTERDAY")]
    Yesterday,
    #[serde(rename = "THIS_WEEK")]
    ThisWeek,
    #[serde(rename = "LAST_WEEK")]
    LastWeek,
    #[serde(rename = "THIS_MONTH")]
    ThisMonth,
    #[serde(rename = "LAST_MONTH")]
    LastMonth,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Period::Today => "TODAY",
            Period::Yesterday => "YESTERDAY",
            Period::ThisWeek => "THIS_WEEK",
            Period::LastWeek => "LAST_WEEK",
            Period::ThisMonth => "THIS_MONTH",
            Period::LastMonth => "LAST_MONTH",
        };
        f.write_str(s)
    }
}

impl FromStr for Period {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TODAY" => Ok(Period::Today),
            "YESTERDAY" => Ok(Period::Yesterday),
            "THIS_WEEK" => Ok(Period::ThisWeek),
            "LAST_WEEK" => Ok(Period::LastWeek),
            "THIS_MONTH" => Ok(Period::ThisMonth),
            "LAST_MONTH" => Ok(Period::LastMonth),
            other => Err(QueryError::InvalidPeriod(other.to_string())),
        }
    }
}

fn day_start(d: NaiveDate) -> DateTime<Utc> {
    d.and_time(NaiveTime::MIN).and_utc()
}

fn day_end(d: NaiveDate) -> DateTime<Utc> {
    d.and_hms_nano_opt(23, 59, 59, 999_999_999)
        .expect("in-range wall-clock time")
        .and_utc()
}

fn first_of_month(d: NaiveDate) -> NaiveDate {
    d.with_day(1).expect("day 1 exists in every month")
}

impl Period {
    /// Resolve against the server clock.
    pub fn resolve(self) -> (DateTime<Utc>, DateTime<Utc>) {
        self.resolve_at(Utc::now())
    }

    /// Resolve this period into an inclusive `(start, end)` UTC range
    /// relative to the given instant.
    pub fn resolve_at(self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let today = now.date_naive();
        match self {
            Period::Today => (day_start(today), day_end(today)),

            Period::Yesterday => {
                let d = today - Duration::days(1);
                (day_start(d), day_end(d))
            }

            Period::ThisWeek => {
                // ISO 8601: week starts Monday
                let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
                (day_start(monday), now)
            }

            Period::LastWeek => {
                let this_monday =
                    today - Duration::days(today.weekday().num_days_from_monday() as i64);
                let start = this_monday - Duration::days(7);
                let end = this_monday - Duration::days(1);
                (day_start(start), day_end(end))
            }

            Period::ThisMonth => (day_start(first_of_month(today)), now),

            Period::LastMonth => {
                let last_of_prev = first_of_month(today)
                    .pred_opt()
                    .expect("a day precedes the first of the month");
                (day_start(first_of_month(last_of_prev)), day_end(last_of_prev))
            }
        }
    }
}
