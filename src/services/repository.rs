//! Narrow data-access boundary between the aggregation core and storage.
//!
//! The core never talks to a concrete persistence technology; it consumes
//! this trait. Any backend works (the flat-file store in
//! [`crate::services::store`], the in-memory implementation below, an
//! embedded database) as long as the `since` bound it applies at query
//! level agrees with in-memory window filtering.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::types::{Entry, QuantityType};

/// Read access to quantity types and their entries.
pub trait QuantityRepository {
    /// All quantity types, in manual sort order.
    fn quantity_types(&self) -> Vec<QuantityType>;

    /// Entries belonging to one quantity type. When `since` is given the
    /// backend returns only entries with `timestamp >= since` (inclusive);
    /// `None` means no lower bound. Result order is unspecified.
    fn entries(&self, quantity_type_id: Uuid, since: Option<DateTime<Utc>>) -> Vec<Entry>;
}

/// Simple vector-backed repository; the reference backend for tests and
/// the pushdown-equivalence property.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    quantity_types: Vec<QuantityType>,
    entries: Vec<Entry>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_quantity_type(&mut self, quantity_type: QuantityType) {
        self.quantity_types.push(quantity_type);
    }

    pub fn insert_entry(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Delete a quantity type and cascade to its entries.
    pub fn delete_quantity_type(&mut self, quantity_type_id: Uuid) {
        self.quantity_types.retain(|qt| qt.id != quantity_type_id);
        self.entries
            .retain(|entry| entry.quantity_type_id != quantity_type_id);
    }

    pub fn all_entries(&self) -> &[Entry] {
        &self.entries
    }
}

impl QuantityRepository for InMemoryRepository {
    fn quantity_types(&self) -> Vec<QuantityType> {
        let mut types = self.quantity_types.clone();
        types.sort_by_key(|qt| qt.sort_order);
        types
    }

    fn entries(&self, quantity_type_id: Uuid, since: Option<DateTime<Utc>>) -> Vec<Entry> {
        self.entries
            .iter()
            .filter(|entry| entry.quantity_type_id == quantity_type_id)
            .filter(|entry| match since {
                Some(bound) => entry.timestamp >= bound,
                None => true,
            })
            .cloned()
            .collect()
    }
}
