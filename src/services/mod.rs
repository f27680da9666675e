//! Services composing the core: aggregation, compound calculation,
//! caching, storage, and export.

pub mod aggregator;
pub mod cache;
pub mod calculator;
pub mod export;
pub mod repository;
pub mod store;

pub use aggregator::QuantityAggregator;
pub use cache::TotalsCache;
pub use calculator::{CalculationOutcome, CompoundCalculator};
pub use export::export_csv;
pub use repository::{InMemoryRepository, QuantityRepository};
pub use store::JsonStore;
