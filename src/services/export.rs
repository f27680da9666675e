//! CSV export of the full entry history.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::types::{Entry, QuantityType, Result, TallyError};

#[derive(Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Timestamp")]
    timestamp: String,
    #[serde(rename = "Quantity Name")]
    quantity_name: &'a str,
    #[serde(rename = "Value")]
    value: f64,
    #[serde(rename = "Formatted Value")]
    formatted_value: String,
    #[serde(rename = "Notes")]
    notes: &'a str,
    #[serde(rename = "Aggregation Type")]
    aggregation_type: &'a str,
    #[serde(rename = "Icon")]
    icon: &'a str,
    #[serde(rename = "Color")]
    color: &'a str,
}

/// Render every entry as CSV, newest first.
///
/// Entries whose quantity type is missing are skipped. Field quoting and
/// escaping are the csv writer's job.
pub fn export_csv(quantity_types: &[QuantityType], entries: &[Entry]) -> Result<String> {
    let by_id: HashMap<Uuid, &QuantityType> =
        quantity_types.iter().map(|qt| (qt.id, qt)).collect();

    let mut sorted: Vec<&Entry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let mut writer = csv::Writer::from_writer(Vec::new());
    for entry in sorted {
        let Some(quantity_type) = by_id.get(&entry.quantity_type_id) else {
            continue;
        };
        writer
            .serialize(ExportRow {
                timestamp: entry.timestamp.to_rfc3339(),
                quantity_name: &quantity_type.name,
                value: entry.value,
                formatted_value: quantity_type.value_format.format(entry.value),
                notes: &entry.notes,
                aggregation_type: quantity_type.aggregation_type.display_name(),
                icon: &quantity_type.icon,
                color: &quantity_type.color_hex,
            })
            .map_err(|e| TallyError::Export(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| TallyError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| TallyError::Export(e.to_string()))
}
