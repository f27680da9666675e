//! Logged data points and derived analytics rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::ValueFormat;

/// One logged data point against a quantity type.
///
/// The value is always a plain number; durations are total minutes, never
/// a clock string. Entries are owned by their quantity type and cascade
/// with it on delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Uuid,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
    pub quantity_type_id: Uuid,
}

impl Entry {
    /// Create an entry timestamped now.
    pub fn new(value: f64, quantity_type_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            value,
            timestamp: Utc::now(),
            notes: String::new(),
            quantity_type_id,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn formatted_value(&self, format: ValueFormat) -> String {
        format.format(self.value)
    }
}

/// One bucket of a grouped-analytics breakdown. Derived on every query,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedTotal {
    pub period_label: String,
    pub total: f64,
    pub count: usize,
    pub bucket_start: DateTime<Utc>,
}
