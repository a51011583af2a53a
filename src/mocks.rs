//! Mock adapters and providers for examples and end-to-end tests
//!
//! These live in the library (not behind `cfg(test)`) so integration
//! tests and downstream consumers can drive the full stack without
//! real upstream credentials.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dexquote_types::{
	AdapterError, AdapterInfo, AdapterResult, ProviderAdapter, ProviderConfig, ProviderQuote,
	ProviderRuntimeConfig, SwapQuoteRequest, U256,
};

/// How a [`MockQuoteAdapter`] answers
#[derive(Debug, Clone)]
pub enum MockBehavior {
	/// Respond with the given amount after the delay
	Respond { delay_ms: u64, amount_out: String },
	/// Fail with an upstream status after the delay
	Fail { delay_ms: u64, status: u16 },
	/// Never respond within any realistic window
	Hang,
}

/// Scriptable adapter with controllable timing
#[derive(Debug)]
pub struct MockQuoteAdapter {
	info: AdapterInfo,
	behavior: MockBehavior,
	confidence: f64,
	calls: Arc<AtomicUsize>,
}

impl MockQuoteAdapter {
	pub fn new(adapter_id: &str, behavior: MockBehavior) -> Self {
		Self {
			info: AdapterInfo::new(adapter_id, "mock quote adapter", "0.0.0"),
			behavior,
			confidence: 0.95,
			calls: Arc::new(AtomicUsize::new(0)),
		}
	}

	/// Fast healthy provider: 50ms, slightly below-market price
	pub fn fast(adapter_id: &str) -> Self {
		Self::new(
			adapter_id,
			MockBehavior::Respond {
				delay_ms: 50,
				amount_out: "995000000".to_string(),
			},
		)
	}

	/// Slow healthy provider: answers late with the best price
	pub fn slow(adapter_id: &str) -> Self {
		Self::new(
			adapter_id,
			MockBehavior::Respond {
				delay_ms: 1_500,
				amount_out: "1000000000".to_string(),
			},
		)
	}

	/// Provider that never answers in time
	pub fn hung(adapter_id: &str) -> Self {
		Self::new(adapter_id, MockBehavior::Hang)
	}

	/// Provider that always fails upstream
	pub fn failing(adapter_id: &str) -> Self {
		Self::new(
			adapter_id,
			MockBehavior::Fail {
				delay_ms: 20,
				status: 502,
			},
		)
	}

	pub fn with_confidence(mut self, confidence: f64) -> Self {
		self.confidence = confidence;
		self
	}

	/// Shared counter of upstream calls, for single-flight assertions
	pub fn call_counter(&self) -> Arc<AtomicUsize> {
		Arc::clone(&self.calls)
	}
}

#[async_trait]
impl ProviderAdapter for MockQuoteAdapter {
	fn adapter_info(&self) -> &AdapterInfo {
		&self.info
	}

	async fn fetch_quote(
		&self,
		_request: &SwapQuoteRequest,
		config: &ProviderRuntimeConfig,
	) -> AdapterResult<ProviderQuote> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		match &self.behavior {
			MockBehavior::Respond {
				delay_ms,
				amount_out,
			} => {
				tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
				Ok(
					ProviderQuote::new(config.name.clone(), U256::from(amount_out.as_str()))
						.with_gas_estimate(180_000)
						.with_confidence(self.confidence),
				)
			},
			MockBehavior::Fail { delay_ms, status } => {
				tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
				Err(AdapterError::from_status(&config.name, *status))
			},
			MockBehavior::Hang => {
				tokio::time::sleep(Duration::from_secs(3_600)).await;
				Err(AdapterError::Timeout {
					timeout_ms: config.timeout_ms,
				})
			},
		}
	}
}

/// Provider config pointing at a mock adapter
pub fn mock_provider(name: &str, adapter_id: &str, priority: u32) -> ProviderConfig {
	ProviderConfig::new(name, format!("https://{name}.invalid"))
		.with_adapter_id(adapter_id)
		.with_priority(priority)
		.with_chains(vec![1])
		.with_timeout_ms(2_000)
}
