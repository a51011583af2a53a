//! Cache trait and configuration

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use dexquote_types::AggregatedQuote;

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache backend failures
///
/// The orchestrator treats every variant as a miss; a broken cache
/// degrades latency, never correctness.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
	#[error("cache backend unavailable: {reason}")]
	Unavailable { reason: String },
}

/// Tunables for the response cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
	/// How long an entry stays servable
	#[serde(alias = "default_ttl")]
	pub default_ttl_ms: u64,

	/// Upper bound on stored entries; exceeding it evicts the entry
	/// closest to expiry
	pub max_entries: usize,

	/// How often the background sweep removes expired entries
	#[serde(alias = "cleanup_interval")]
	pub cleanup_interval_ms: u64,

	/// Prefix prepended to every fingerprint key
	pub key_prefix: String,

	/// Significant digits kept when bucketing the input amount for the
	/// fingerprint; see `fingerprint::bucket_amount`
	pub amount_bucket_digits: usize,
}

impl Default for CacheConfig {
	fn default() -> Self {
		Self {
			default_ttl_ms: 3_000,
			max_entries: 10_000,
			cleanup_interval_ms: 30_000,
			key_prefix: "dexquote".to_string(),
			amount_bucket_digits: 2,
		}
	}
}

/// Counters exposed on the health surface
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
	pub entries: usize,
	pub hits: u64,
	pub misses: u64,
	pub evictions: u64,
}

/// Storage contract for aggregated quote results
///
/// Implementations must be safe under concurrent access; the cache is
/// the only state shared across in-flight requests.
#[async_trait]
pub trait ResponseCache: Send + Sync {
	/// Look up a non-expired entry
	async fn get(&self, key: &str) -> CacheResult<Option<AggregatedQuote>>;

	/// Store an entry under the configured TTL
	async fn put(&self, key: &str, quote: AggregatedQuote) -> CacheResult<()>;

	/// Remove expired entries; returns how many were dropped
	async fn purge_expired(&self) -> CacheResult<usize>;

	/// Current counters
	async fn stats(&self) -> CacheStats;
}
