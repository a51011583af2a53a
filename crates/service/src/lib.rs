//! Dexquote Service
//!
//! The aggregation core: provider registry snapshots, the concurrent
//! fan-out with its progressive time window, composite scoring, and the
//! per-request orchestrator that ties them to the response cache.

pub mod aggregator;
pub mod orchestrator;
pub mod registry;
pub mod scoring;

#[cfg(test)]
mod testutil;

pub use aggregator::{AggregationRun, ConcurrentAggregator};
pub use orchestrator::QuoteOrchestrator;
pub use registry::ProviderRegistry;
pub use scoring::{ScoringEngine, Selection};
