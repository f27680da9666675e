//! Memoized totals with explicit invalidation.
//!
//! The aggregator itself is pure; this is the caller-side memo the UI
//! layer keys its refresh on. A cached total stays valid for the window
//! bucket it was computed in and never expires on its own within it:
//! any entry or settings mutation must call [`invalidate`] so the next
//! read recomputes.
//!
//! [`invalidate`]: TotalsCache::invalidate

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use crate::types::{AggregationPeriod, QuantityType};

#[derive(Debug, Clone, Copy, PartialEq)]
struct CachedTotal {
    /// Window start the total was computed in; `None` for all-time.
    bucket: Option<DateTime<Utc>>,
    total: f64,
}

/// Last computed total per (quantity type, period).
#[derive(Debug, Default)]
pub struct TotalsCache {
    cached: HashMap<(Uuid, AggregationPeriod), CachedTotal>,
}

impl TotalsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached total if it was computed in the same window
    /// bucket as `now`, otherwise run `compute` and cache its result.
    pub fn total_or_compute<F>(
        &mut self,
        quantity_type: &QuantityType,
        now: &DateTime<Utc>,
        compute: F,
    ) -> f64
    where
        F: FnOnce() -> f64,
    {
        let bucket = quantity_type.aggregation_period.window_start(now);
        let key = (quantity_type.id, quantity_type.aggregation_period);

        if let Some(hit) = self.cached.get(&key) {
            if hit.bucket == bucket {
                return hit.total;
            }
        }

        let total = compute();
        self.cached.insert(key, CachedTotal { bucket, total });
        total
    }

    /// Drop all cached totals for one quantity type. Call after any entry
    /// mutation or settings change for that type.
    pub fn invalidate(&mut self, quantity_type_id: Uuid) {
        self.cached.retain(|(id, _), _| *id != quantity_type_id);
    }

    pub fn clear(&mut self) {
        self.cached.clear();
    }
}
