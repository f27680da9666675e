//! Aggregation reductions over a quantity's logged values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reduction applied to a set of entry values to produce the displayed total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationType {
    Sum,
    Average,
    Median,
    Min,
    Max,
    Count,
}

impl AggregationType {
    pub fn display_name(&self) -> &'static str {
        match self {
            AggregationType::Sum => "Sum",
            AggregationType::Average => "Average",
            AggregationType::Median => "Median",
            AggregationType::Min => "Minimum",
            AggregationType::Max => "Maximum",
            AggregationType::Count => "Count",
        }
    }

    pub fn short_display_name(&self) -> &'static str {
        match self {
            AggregationType::Sum => "Sum",
            AggregationType::Average => "Avg",
            AggregationType::Median => "Median",
            AggregationType::Min => "Min",
            AggregationType::Max => "Max",
            AggregationType::Count => "Count",
        }
    }

    /// Reduce a sequence of values to a single number.
    ///
    /// Empty input returns 0 for every variant, not an error.
    pub fn aggregate(&self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }

        match self {
            AggregationType::Sum => values.iter().sum(),
            AggregationType::Average => values.iter().sum::<f64>() / values.len() as f64,
            AggregationType::Median => median(values),
            AggregationType::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            AggregationType::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            AggregationType::Count => values.len() as f64,
        }
    }
}

/// Sort ascending; even count averages the two middle elements.
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let count = sorted.len();
    if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    }
}

impl FromStr for AggregationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sum" => Ok(AggregationType::Sum),
            "average" | "avg" => Ok(AggregationType::Average),
            "median" => Ok(AggregationType::Median),
            "min" | "minimum" => Ok(AggregationType::Min),
            "max" | "maximum" => Ok(AggregationType::Max),
            "count" => Ok(AggregationType::Count),
            other => Err(format!(
                "unknown aggregation type '{}', expected sum, average, median, min, max, or count",
                other
            )),
        }
    }
}

impl fmt::Display for AggregationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [AggregationType; 6] = [
        AggregationType::Sum,
        AggregationType::Average,
        AggregationType::Median,
        AggregationType::Min,
        AggregationType::Max,
        AggregationType::Count,
    ];

    #[test]
    fn test_empty_input_is_zero_for_all_variants() {
        for agg in ALL {
            assert_eq!(agg.aggregate(&[]), 0.0, "{:?}", agg);
        }
    }

    #[test]
    fn test_sum() {
        assert_eq!(AggregationType::Sum.aggregate(&[1.0, 2.0, 3.5]), 6.5);
    }

    #[test]
    fn test_average() {
        assert_eq!(
            AggregationType::Average.aggregate(&[100.0, 200.0, 300.0]),
            200.0
        );
    }

    #[test]
    fn test_median_even_count() {
        assert_eq!(AggregationType::Median.aggregate(&[1.0, 2.0, 3.0, 4.0]), 2.5);
    }

    #[test]
    fn test_median_odd_count() {
        assert_eq!(AggregationType::Median.aggregate(&[1.0, 2.0, 3.0]), 2.0);
    }

    #[test]
    fn test_median_unsorted_input() {
        assert_eq!(AggregationType::Median.aggregate(&[9.0, 1.0, 5.0]), 5.0);
    }

    #[test]
    fn test_min_max() {
        let values = [4.0, -2.0, 7.5];
        assert_eq!(AggregationType::Min.aggregate(&values), -2.0);
        assert_eq!(AggregationType::Max.aggregate(&values), 7.5);
    }

    #[test]
    fn test_count_is_length_not_sum() {
        assert_eq!(AggregationType::Count.aggregate(&[10.0, 20.0, 30.0]), 3.0);
    }

    #[test]
    fn test_single_value() {
        for agg in ALL {
            let expected = if agg == AggregationType::Count { 1.0 } else { 42.0 };
            assert_eq!(agg.aggregate(&[42.0]), expected, "{:?}", agg);
        }
    }
}
