//! Typed value formats: how a raw stored number is parsed and displayed.
//!
//! Every entry value is stored as a plain `f64`. Durations are stored as
//! total minutes, never as a clock string — the format layer owns the
//! H:MM rendering and the strict text grammar.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic type of a quantity's numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    Integer,
    Decimal,
    /// Stored as minutes, displayed as H:MM or "M min"
    Duration,
}

impl ValueFormat {
    pub fn display_name(&self) -> &'static str {
        match self {
            ValueFormat::Integer => "Integer",
            ValueFormat::Decimal => "Decimal",
            ValueFormat::Duration => "Duration (H:MM)",
        }
    }

    /// Format a raw value for display.
    ///
    /// Integer rounds to zero decimal places, decimal renders exactly two,
    /// duration renders whole minutes as H:MM (hours present) or "M min".
    pub fn format(&self, value: f64) -> String {
        match self {
            ValueFormat::Integer => format!("{:.0}", value),
            ValueFormat::Decimal => format!("{:.2}", value),
            ValueFormat::Duration => format_duration(value),
        }
    }

    /// Parse a string to a raw value. Returns `None` on any non-numeric
    /// remainder.
    ///
    /// Integer/decimal accept thousands separators ("1,250"). Duration
    /// accepts "HH:MM" (both components integers) or a bare number of
    /// minutes; for the looser voice-style grammar see
    /// [`crate::parsers::parse_duration_text`].
    pub fn parse(&self, input: &str) -> Option<f64> {
        let trimmed = input.trim();
        match self {
            ValueFormat::Integer | ValueFormat::Decimal => parse_number(trimmed),
            ValueFormat::Duration => parse_duration(trimmed),
        }
    }
}

impl FromStr for ValueFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "integer" | "int" => Ok(ValueFormat::Integer),
            "decimal" => Ok(ValueFormat::Decimal),
            "duration" => Ok(ValueFormat::Duration),
            other => Err(format!(
                "unknown value format '{}', expected integer, decimal, or duration",
                other
            )),
        }
    }
}

impl fmt::Display for ValueFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

fn parse_number(input: &str) -> Option<f64> {
    let cleaned = input.replace(',', "");
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_duration(input: &str) -> Option<f64> {
    if input.contains(':') {
        let parts: Vec<&str> = input.split(':').collect();
        if parts.len() != 2 {
            return None;
        }
        let hours: i64 = parts[0].parse().ok()?;
        let minutes: i64 = parts[1].parse().ok()?;
        return Some((hours * 60 + minutes) as f64);
    }
    input.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn format_duration(minutes: f64) -> String {
    let total = minutes as i64;
    let hours = total / 60;
    let mins = total % 60;

    if hours > 0 {
        format!("{}:{:02}", hours, mins)
    } else {
        format!("{} min", total)
    }
}
