//! Compound inputs: a quantity whose logged value is derived from two
//! sub-inputs combined by one operation.
//!
//! Only the derived number is ever stored; the configuration travels with
//! the quantity type as a JSON blob so older records with malformed config
//! degrade to plain entries instead of blocking logging.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::ValueFormat;

/// Operation combining the two sub-inputs of a compound quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompoundOperation {
    Divide,
    Multiply,
    Add,
    Subtract,
    /// Both sub-inputs are instants; the result is minutes between them.
    TimeDifference,
}

impl CompoundOperation {
    pub fn display_name(&self) -> &'static str {
        match self {
            CompoundOperation::Divide => "Divide",
            CompoundOperation::Multiply => "Multiply",
            CompoundOperation::Add => "Add",
            CompoundOperation::Subtract => "Subtract",
            CompoundOperation::TimeDifference => "Time Difference",
        }
    }

    /// Combine the two raw sub-values.
    ///
    /// Returns `None` only for division by zero; a missing result is
    /// distinct from a zero result. For [`TimeDifference`] the inputs are
    /// Unix timestamps in seconds and the result is signed minutes
    /// (`value2 - value1`), not clamped.
    ///
    /// [`TimeDifference`]: CompoundOperation::TimeDifference
    pub fn calculate(&self, value1: f64, value2: f64) -> Option<f64> {
        match self {
            CompoundOperation::Divide => {
                if value2 == 0.0 {
                    None
                } else {
                    Some(value1 / value2)
                }
            }
            CompoundOperation::Multiply => Some(value1 * value2),
            CompoundOperation::Add => Some(value1 + value2),
            CompoundOperation::Subtract => Some(value1 - value2),
            CompoundOperation::TimeDifference => Some((value2 - value1) / 60.0),
        }
    }

    /// Signed minutes from `start` to `end`. Negative when `start` is later.
    pub fn time_difference<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> f64 {
        end.clone().signed_duration_since(start.clone()).num_seconds() as f64 / 60.0
    }

    /// Display format for the derived value: duration for time differences,
    /// decimal otherwise.
    pub fn result_format(&self) -> ValueFormat {
        match self {
            CompoundOperation::TimeDifference => ValueFormat::Duration,
            _ => ValueFormat::Decimal,
        }
    }
}

impl FromStr for CompoundOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "divide" | "div" => Ok(CompoundOperation::Divide),
            "multiply" | "mul" => Ok(CompoundOperation::Multiply),
            "add" => Ok(CompoundOperation::Add),
            "subtract" | "sub" => Ok(CompoundOperation::Subtract),
            "timedifference" | "time-difference" | "time-diff" => {
                Ok(CompoundOperation::TimeDifference)
            }
            other => Err(format!(
                "unknown compound operation '{}', expected divide, multiply, add, subtract, or time-difference",
                other
            )),
        }
    }
}

impl fmt::Display for CompoundOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Configuration of a compound quantity's two labeled sub-inputs.
///
/// Round-trips through JSON without loss; serialized field names are part
/// of the stored-record contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundConfig {
    pub input1_label: String,
    pub input1_format: ValueFormat,
    pub input2_label: String,
    pub input2_format: ValueFormat,
    pub operation: CompoundOperation,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    // ========== calculate() ==========

    #[test]
    fn test_divide() {
        assert_eq!(CompoundOperation::Divide.calculate(10.0, 4.0), Some(2.5));
    }

    #[test]
    fn test_divide_by_zero_is_none_for_any_numerator() {
        for x in [-3.0, 0.0, 1.0, 1e9] {
            assert_eq!(CompoundOperation::Divide.calculate(x, 0.0), None);
        }
    }

    #[test]
    fn test_arithmetic_never_none() {
        assert_eq!(CompoundOperation::Multiply.calculate(3.0, 0.0), Some(0.0));
        assert_eq!(CompoundOperation::Add.calculate(2.0, -5.0), Some(-3.0));
        assert_eq!(CompoundOperation::Subtract.calculate(2.0, 5.0), Some(-3.0));
    }

    #[test]
    fn test_time_difference_in_minutes() {
        // instants 90 minutes apart, expressed as unix seconds
        let t1 = 1_000_000.0;
        let t2 = 1_000_000.0 + 90.0 * 60.0;
        assert_eq!(
            CompoundOperation::TimeDifference.calculate(t1, t2),
            Some(90.0)
        );
    }

    #[test]
    fn test_time_difference_is_antisymmetric() {
        let t1 = 5_000.0;
        let t2 = 12_345.0;
        let forward = CompoundOperation::TimeDifference.calculate(t1, t2).unwrap();
        let backward = CompoundOperation::TimeDifference.calculate(t2, t1).unwrap();
        assert_eq!(forward, -backward);
    }

    #[test]
    fn test_time_difference_instants() {
        let start = Utc.with_ymd_and_hms(2026, 3, 15, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 15, 10, 30, 0).unwrap();
        assert_eq!(CompoundOperation::time_difference(&start, &end), 90.0);
        // signed, not clamped
        assert_eq!(CompoundOperation::time_difference(&end, &start), -90.0);
    }

    // ========== result format convention ==========

    #[test]
    fn test_result_format() {
        assert_eq!(
            CompoundOperation::TimeDifference.result_format(),
            ValueFormat::Duration
        );
        assert_eq!(CompoundOperation::Divide.result_format(), ValueFormat::Decimal);
    }

    // ========== config serialization ==========

    fn pace_config() -> CompoundConfig {
        CompoundConfig {
            input1_label: "Distance".into(),
            input1_format: ValueFormat::Decimal,
            input2_label: "Time".into(),
            input2_format: ValueFormat::Duration,
            operation: CompoundOperation::Divide,
        }
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = pace_config();
        let json = serde_json::to_string(&config).unwrap();
        let back: CompoundConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_config_serialized_field_names() {
        let json = serde_json::to_string(&pace_config()).unwrap();
        assert!(json.contains("\"input1Label\""));
        assert!(json.contains("\"input2Format\""));
        assert!(json.contains("\"operation\":\"divide\""));
    }

    #[test]
    fn test_time_difference_serde_name() {
        let json = serde_json::to_string(&CompoundOperation::TimeDifference).unwrap();
        assert_eq!(json, "\"timeDifference\"");
    }
}
