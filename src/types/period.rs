//! Time windowing: which entries count toward the current total, and how
//! entries are bucketed for historical breakdowns.
//!
//! All boundaries are computed on the caller's calendar (the CLI passes
//! `Local::now()`, tests pin a fixed offset). Weeks start on Monday.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::Entry;

/// Rolling time window selecting which entries count toward the current
/// total for a quantity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AggregationPeriod {
    AllTime,
    Daily,
    Weekly,
    Monthly,
}

impl AggregationPeriod {
    pub fn display_name(&self) -> &'static str {
        match self {
            AggregationPeriod::AllTime => "All Time",
            AggregationPeriod::Daily => "Daily",
            AggregationPeriod::Weekly => "Weekly",
            AggregationPeriod::Monthly => "Monthly",
        }
    }

    pub fn short_display_name(&self) -> &'static str {
        match self {
            AggregationPeriod::AllTime => "All",
            AggregationPeriod::Daily => "Day",
            AggregationPeriod::Weekly => "Week",
            AggregationPeriod::Monthly => "Month",
        }
    }

    /// Start of the window containing `reference`, or `None` when the
    /// window has no lower bound (all-time).
    ///
    /// A calendar failure for a degenerate date also yields `None`, which
    /// callers treat as unfiltered rather than failing the computation.
    pub fn window_start<Tz: TimeZone>(&self, reference: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let date = reference.date_naive();
        let start_date = match self {
            AggregationPeriod::AllTime => return None,
            AggregationPeriod::Daily => date,
            AggregationPeriod::Weekly => date.week(Weekday::Mon).first_day(),
            AggregationPeriod::Monthly => date.with_day(1)?,
        };
        start_of_day(start_date, &reference.timezone())
    }

    /// Entries with timestamp ≥ the window start (inclusive), or all
    /// entries when the window has no lower bound.
    pub fn filter_entries<Tz: TimeZone>(
        &self,
        entries: &[Entry],
        reference: &DateTime<Tz>,
    ) -> Vec<Entry> {
        match self.window_start(reference) {
            Some(start) => {
                let start = start.with_timezone(&Utc);
                entries
                    .iter()
                    .filter(|entry| entry.timestamp >= start)
                    .cloned()
                    .collect()
            }
            None => entries.to_vec(),
        }
    }
}

impl FromStr for AggregationPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alltime" | "all-time" | "all" => Ok(AggregationPeriod::AllTime),
            "daily" | "day" => Ok(AggregationPeriod::Daily),
            "weekly" | "week" => Ok(AggregationPeriod::Weekly),
            "monthly" | "month" => Ok(AggregationPeriod::Monthly),
            other => Err(format!(
                "unknown aggregation period '{}', expected all-time, daily, weekly, or monthly",
                other
            )),
        }
    }
}

impl fmt::Display for AggregationPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Display-time bucketing for historical breakdowns, independent of a
/// quantity type's own [`AggregationPeriod`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingPeriod {
    Day,
    Week,
    Month,
    Year,
    All,
}

impl GroupingPeriod {
    pub fn display_name(&self) -> &'static str {
        match self {
            GroupingPeriod::Day => "Day",
            GroupingPeriod::Week => "Week",
            GroupingPeriod::Month => "Month",
            GroupingPeriod::Year => "Year",
            GroupingPeriod::All => "All Time",
        }
    }

    /// Start of the bucket containing `timestamp`. `None` for [`All`]
    /// (one unbounded bucket) and on calendar failure.
    ///
    /// [`All`]: GroupingPeriod::All
    pub fn bucket_start<Tz: TimeZone>(&self, timestamp: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let date = timestamp.date_naive();
        let start_date = match self {
            GroupingPeriod::All => return None,
            GroupingPeriod::Day => date,
            GroupingPeriod::Week => date.week(Weekday::Mon).first_day(),
            GroupingPeriod::Month => date.with_day(1)?,
            GroupingPeriod::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1)?,
        };
        start_of_day(start_date, &timestamp.timezone())
    }

    /// Human label for the bucket starting at `start`.
    ///
    /// day → "Jan 5, 2026"; week → "Jan 5 - Jan 11"; month → "January 2026";
    /// year → "2026"; all → "All Time".
    pub fn label<Tz: TimeZone>(&self, start: &DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        match self {
            GroupingPeriod::Day => start.format("%b %-d, %Y").to_string(),
            GroupingPeriod::Week => {
                let end = start.date_naive() + Days::new(6);
                format!("{} - {}", start.format("%b %-d"), end.format("%b %-d"))
            }
            GroupingPeriod::Month => start.format("%B %Y").to_string(),
            GroupingPeriod::Year => start.format("%Y").to_string(),
            GroupingPeriod::All => "All Time".to_string(),
        }
    }
}

impl FromStr for GroupingPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(GroupingPeriod::Day),
            "week" => Ok(GroupingPeriod::Week),
            "month" => Ok(GroupingPeriod::Month),
            "year" => Ok(GroupingPeriod::Year),
            "all" => Ok(GroupingPeriod::All),
            other => Err(format!(
                "unknown grouping period '{}', expected day, week, month, year, or all",
                other
            )),
        }
    }
}

fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<DateTime<Tz>> {
    // earliest() handles DST gaps where midnight does not exist
    tz.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).earliest()
}
