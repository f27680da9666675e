//! User-defined quantity types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{AggregationPeriod, AggregationType, CompoundConfig, ValueFormat};

pub const DEFAULT_ICON: &str = "number";
pub const DEFAULT_COLOR_HEX: &str = "#007AFF";

/// A user-defined trackable metric (Steps, Water, Reading Time) with a
/// value format, an aggregation rule, and a time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityType {
    pub id: Uuid,
    pub name: String,
    pub value_format: ValueFormat,
    pub aggregation_type: AggregationType,
    pub aggregation_period: AggregationPeriod,
    pub icon: String,
    pub color_hex: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: DateTime<Utc>,
    pub sort_order: i32,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub is_compound: bool,
    /// Raw compound configuration, decoded lazily by [`compound_config`].
    ///
    /// [`compound_config`]: QuantityType::compound_config
    #[serde(default)]
    pub compound_config_json: Option<String>,
}

impl QuantityType {
    pub fn new(name: impl Into<String>, value_format: ValueFormat) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            value_format,
            aggregation_type: AggregationType::Sum,
            aggregation_period: AggregationPeriod::AllTime,
            icon: DEFAULT_ICON.to_string(),
            color_hex: DEFAULT_COLOR_HEX.to_string(),
            created_at: now,
            last_used_at: now,
            sort_order: 0,
            is_hidden: false,
            is_compound: false,
            compound_config_json: None,
        }
    }

    /// Decode the stored compound configuration.
    ///
    /// Returns `None` for non-compound types and for malformed JSON —
    /// a decode failure degrades the type to plain entry logging rather
    /// than blocking it.
    pub fn compound_config(&self) -> Option<CompoundConfig> {
        if !self.is_compound {
            return None;
        }
        let raw = self.compound_config_json.as_deref()?;
        serde_json::from_str(raw).ok()
    }

    pub fn set_compound_config(&mut self, config: &CompoundConfig) {
        self.is_compound = true;
        self.compound_config_json = serde_json::to_string(config).ok();
    }

    /// Bump `last_used_at`; called on every logged entry.
    pub fn touch(&mut self) {
        self.last_used_at = Utc::now();
    }
}
