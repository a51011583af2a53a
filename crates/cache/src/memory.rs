//! In-memory response cache backed by DashMap with TTL support

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::time::interval;
use tracing::debug;

use dexquote_types::AggregatedQuote;

use crate::traits::{CacheConfig, CacheResult, CacheStats, ResponseCache};

/// One cached aggregation result
#[derive(Debug, Clone)]
struct CacheEntry {
	quote: AggregatedQuote,
	expires_at: DateTime<Utc>,
}

/// DashMap-backed cache with TTL, bounded size and a background sweep
#[derive(Clone)]
pub struct MemoryResponseCache {
	entries: Arc<DashMap<String, CacheEntry>>,
	config: CacheConfig,
	hits: Arc<AtomicU64>,
	misses: Arc<AtomicU64>,
	evictions: Arc<AtomicU64>,
}

impl MemoryResponseCache {
	pub fn new(config: CacheConfig) -> Self {
		Self {
			entries: Arc::new(DashMap::new()),
			config,
			hits: Arc::new(AtomicU64::new(0)),
			misses: Arc::new(AtomicU64::new(0)),
			evictions: Arc::new(AtomicU64::new(0)),
		}
	}

	pub fn config(&self) -> &CacheConfig {
		&self.config
	}

	/// Spawn the periodic sweep that drops expired entries
	pub fn start_sweeper(&self) -> tokio::task::JoinHandle<()> {
		let cache = self.clone();
		let period = std::time::Duration::from_millis(self.config.cleanup_interval_ms);

		tokio::spawn(async move {
			let mut ticker = interval(period);
			loop {
				ticker.tick().await;
				if let Ok(removed) = cache.purge_expired().await {
					if removed > 0 {
						debug!(removed, "cache sweep removed expired entries");
					}
				}
			}
		})
	}

	/// Evict entries closest to expiry until the size bound holds
	fn evict_to_bound(&self) {
		while self.entries.len() > self.config.max_entries {
			let oldest = self
				.entries
				.iter()
				.min_by_key(|entry| entry.value().expires_at)
				.map(|entry| entry.key().clone());

			match oldest {
				Some(key) => {
					self.entries.remove(&key);
					self.evictions.fetch_add(1, Ordering::Relaxed);
				},
				None => break,
			}
		}
	}
}

#[async_trait]
impl ResponseCache for MemoryResponseCache {
	async fn get(&self, key: &str) -> CacheResult<Option<AggregatedQuote>> {
		let now = Utc::now();

		if let Some(entry) = self.entries.get(key) {
			if entry.expires_at > now {
				self.hits.fetch_add(1, Ordering::Relaxed);
				return Ok(Some(entry.quote.clone()));
			}
		}

		// Expired entries are dropped lazily on lookup; the sweep covers
		// keys that are never asked for again.
		self.entries
			.remove_if(key, |_, entry| entry.expires_at <= now);
		self.misses.fetch_add(1, Ordering::Relaxed);
		Ok(None)
	}

	async fn put(&self, key: &str, quote: AggregatedQuote) -> CacheResult<()> {
		let expires_at = Utc::now() + Duration::milliseconds(self.config.default_ttl_ms as i64);
		self.entries
			.insert(key.to_string(), CacheEntry { quote, expires_at });
		self.evict_to_bound();
		Ok(())
	}

	async fn purge_expired(&self) -> CacheResult<usize> {
		let now = Utc::now();
		let before = self.entries.len();
		self.entries.retain(|_, entry| entry.expires_at > now);
		Ok(before - self.entries.len())
	}

	async fn stats(&self) -> CacheStats {
		CacheStats {
			entries: self.entries.len(),
			hits: self.hits.load(Ordering::Relaxed),
			misses: self.misses.load(Ordering::Relaxed),
			evictions: self.evictions.load(Ordering::Relaxed),
		}
	}
}
