//! Provider domain model
//!
//! `ProviderConfig` describes one upstream DEX aggregator as the registry
//! sees it. Configs are immutable once published in a registry snapshot;
//! a reload swaps in a whole new snapshot instead of mutating in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::SecretString;

pub mod errors;

pub use errors::{AdapterError, AdapterResult};

/// Number of recorded calls required before measured performance
/// replaces the optimistic default reputation weight
pub const REPUTATION_MIN_SAMPLES: u64 = 5;

/// Configuration for a single quote provider
#[derive(Debug, Clone)]
pub struct ProviderConfig {
	/// Unique registry key, e.g. "zeroex"
	pub name: String,

	/// Adapter implementation this provider speaks through
	pub adapter_id: String,

	/// Human-readable name for logs and health output
	pub display_name: String,

	/// Base URL of the provider API
	pub base_url: String,

	/// API credential; `None` leaves the provider degraded when its
	/// adapter requires a key
	pub api_key: Option<SecretString>,

	/// Whether the adapter refuses to call upstream without a credential
	pub api_key_required: bool,

	/// Per-call timeout for this provider
	pub timeout_ms: u64,

	/// Transient-failure retries within one aggregation run
	pub retry_count: u32,

	/// Tie-break order; lower value wins
	pub priority: u32,

	/// Reputation weight in [0.1, 1.0], derived from live metrics at
	/// snapshot time
	pub weight: f64,

	/// Whether the provider participates in fan-outs at all
	pub enabled: bool,

	/// Chains this provider can quote on
	pub supported_chains: Vec<u64>,

	/// Extra HTTP headers for the adapter to attach
	pub headers: Option<HashMap<String, String>>,
}

impl ProviderConfig {
	pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
		let name = name.into();
		Self {
			adapter_id: name.clone(),
			display_name: name.clone(),
			name,
			base_url: base_url.into(),
			api_key: None,
			api_key_required: false,
			timeout_ms: 2_000,
			retry_count: 0,
			priority: 100,
			weight: 1.0,
			enabled: true,
			supported_chains: Vec::new(),
			headers: None,
		}
	}

	/// A provider without a required credential never joins a fan-out
	pub fn is_degraded(&self) -> bool {
		self.api_key_required && self.api_key.as_ref().map_or(true, |key| key.is_empty())
	}

	pub fn supports_chain(&self, chain_id: u64) -> bool {
		self.supported_chains.contains(&chain_id)
	}

	pub fn with_adapter_id(mut self, adapter_id: impl Into<String>) -> Self {
		self.adapter_id = adapter_id.into();
		self
	}

	pub fn with_api_key(mut self, key: SecretString) -> Self {
		self.api_key = Some(key);
		self
	}

	pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
		self.timeout_ms = timeout_ms;
		self
	}

	pub fn with_priority(mut self, priority: u32) -> Self {
		self.priority = priority;
		self
	}

	pub fn with_weight(mut self, weight: f64) -> Self {
		self.weight = weight.clamp(0.1, 1.0);
		self
	}

	pub fn with_retry_count(mut self, retries: u32) -> Self {
		self.retry_count = retries;
		self
	}

	pub fn with_chains(mut self, chains: Vec<u64>) -> Self {
		self.supported_chains = chains;
		self
	}
}

/// The slice of provider configuration an adapter needs for one call
#[derive(Debug, Clone)]
pub struct ProviderRuntimeConfig {
	pub name: String,
	pub base_url: String,
	pub api_key: Option<SecretString>,
	pub timeout_ms: u64,
	pub headers: Option<HashMap<String, String>>,
}

impl From<&ProviderConfig> for ProviderRuntimeConfig {
	fn from(config: &ProviderConfig) -> Self {
		Self {
			name: config.name.clone(),
			base_url: config.base_url.clone(),
			api_key: config.api_key.clone(),
			timeout_ms: config.timeout_ms,
			headers: config.headers.clone(),
		}
	}
}

/// Live performance counters for one provider
///
/// Updated asynchronously after each aggregation run; never read or
/// written on the request's hot path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderMetrics {
	pub total_requests: u64,
	pub successful_requests: u64,
	pub failed_requests: u64,
	pub timeout_requests: u64,

	/// Rolling average response time in milliseconds
	pub avg_response_time_ms: f64,

	/// successful / total
	pub success_rate: f64,

	pub last_updated: DateTime<Utc>,
}

impl ProviderMetrics {
	pub fn new() -> Self {
		Self {
			total_requests: 0,
			successful_requests: 0,
			failed_requests: 0,
			timeout_requests: 0,
			avg_response_time_ms: 0.0,
			success_rate: 0.0,
			last_updated: Utc::now(),
		}
	}

	pub fn record_success(&mut self, response_time_ms: u64) {
		self.total_requests += 1;
		self.successful_requests += 1;

		let total_time = self.avg_response_time_ms * (self.total_requests - 1) as f64;
		self.avg_response_time_ms =
			(total_time + response_time_ms as f64) / self.total_requests as f64;

		self.success_rate = self.successful_requests as f64 / self.total_requests as f64;
		self.last_updated = Utc::now();
	}

	pub fn record_failure(&mut self, is_timeout: bool) {
		self.total_requests += 1;
		self.failed_requests += 1;
		if is_timeout {
			self.timeout_requests += 1;
		}

		self.success_rate = self.successful_requests as f64 / self.total_requests as f64;
		self.last_updated = Utc::now();
	}

	/// Reputation weight: `clamp(0.1, 1.0, 0.6·successRate + 0.4·timeFactor)`.
	///
	/// The time factor is a step function of average response time:
	/// 1.0 up to 500ms, 0.9 up to 1s, 0.8 up to 2s, 0.7 beyond. Providers
	/// with fewer than [`REPUTATION_MIN_SAMPLES`] recorded calls keep the
	/// optimistic default of 1.0 so new providers are not starved.
	pub fn reputation_weight(&self) -> f64 {
		if self.total_requests < REPUTATION_MIN_SAMPLES {
			return 1.0;
		}

		let time_factor = match self.avg_response_time_ms {
			t if t <= 500.0 => 1.0,
			t if t <= 1_000.0 => 0.9,
			t if t <= 2_000.0 => 0.8,
			_ => 0.7,
		};

		(0.6 * self.success_rate + 0.4 * time_factor).clamp(0.1, 1.0)
	}
}

impl Default for ProviderMetrics {
	fn default() -> Self {
		Self::new()
	}
}
