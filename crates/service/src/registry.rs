//! Provider registry with copy-on-write snapshots
//!
//! Readers grab the current snapshot without locking; a reload builds a
//! whole new snapshot and swaps it in atomically, so an aggregation run
//! that started before the reload keeps the provider set it began with.
//! Live performance counters sit outside the snapshot in a concurrent
//! map and feed each provider's reputation weight at read time.

use arc_swap::ArcSwap;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info};

use dexquote_types::{ProviderConfig, ProviderMetrics};

#[derive(Default)]
struct RegistrySnapshot {
	providers: Vec<ProviderConfig>,
}

/// Holds the configured provider set and their live metrics
pub struct ProviderRegistry {
	snapshot: ArcSwap<RegistrySnapshot>,
	metrics: DashMap<String, ProviderMetrics>,
}

impl ProviderRegistry {
	pub fn new(providers: Vec<ProviderConfig>) -> Self {
		Self {
			snapshot: ArcSwap::from_pointee(Self::build_snapshot(providers)),
			metrics: DashMap::new(),
		}
	}

	fn build_snapshot(mut providers: Vec<ProviderConfig>) -> RegistrySnapshot {
		providers.sort_by_key(|p| p.priority);
		RegistrySnapshot { providers }
	}

	/// Install a new provider set. Metrics for providers that survive
	/// the reload are kept; metrics for removed providers are dropped.
	pub fn reload(&self, providers: Vec<ProviderConfig>) {
		let next = Self::build_snapshot(providers);
		self.metrics
			.retain(|name, _| next.providers.iter().any(|p| &p.name == name));
		info!(providers = next.providers.len(), "provider registry reloaded");
		self.snapshot.store(Arc::new(next));
	}

	/// Providers eligible for a fan-out on `chain_id`, in priority
	/// order, each carrying its current reputation weight
	pub fn active_providers(&self, chain_id: u64) -> Vec<ProviderConfig> {
		let snapshot = self.snapshot.load();
		snapshot
			.providers
			.iter()
			.filter(|p| p.enabled && !p.is_degraded() && p.supports_chain(chain_id))
			.map(|p| self.with_live_weight(p))
			.collect()
	}

	/// Every configured provider with its current weight, for the
	/// health surface
	pub fn all_providers(&self) -> Vec<ProviderConfig> {
		let snapshot = self.snapshot.load();
		snapshot
			.providers
			.iter()
			.map(|p| self.with_live_weight(p))
			.collect()
	}

	fn with_live_weight(&self, provider: &ProviderConfig) -> ProviderConfig {
		let weight = self
			.metrics
			.get(&provider.name)
			.map(|m| m.reputation_weight())
			.unwrap_or(1.0);
		provider.clone().with_weight(weight)
	}

	/// Record a successful provider call. Called off the request path.
	pub fn record_success(&self, provider: &str, latency_ms: u64) {
		self.metrics
			.entry(provider.to_string())
			.or_default()
			.record_success(latency_ms);
		debug!(provider, latency_ms, "recorded provider success");
	}

	/// Record a failed provider call that counts against reputation
	pub fn record_failure(&self, provider: &str, is_timeout: bool) {
		self.metrics
			.entry(provider.to_string())
			.or_default()
			.record_failure(is_timeout);
		debug!(provider, is_timeout, "recorded provider failure");
	}

	pub fn metrics_for(&self, provider: &str) -> Option<ProviderMetrics> {
		self.metrics.get(provider).map(|m| m.clone())
	}

	pub fn len(&self) -> usize {
		self.snapshot.load().providers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.snapshot.load().providers.is_empty()
	}
}
