//! Dexquote Cache
//!
//! Short-lived response cache keyed by a normalized request fingerprint,
//! plus the single-flight guard that collapses concurrent identical
//! requests into one upstream fan-out.

pub mod fingerprint;
pub mod memory;
pub mod single_flight;
pub mod traits;

pub use fingerprint::{fingerprint, bucket_amount};
pub use memory::MemoryResponseCache;
pub use single_flight::SingleFlight;
pub use traits::{CacheConfig, CacheError, CacheResult, CacheStats, ResponseCache};
