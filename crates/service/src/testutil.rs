//! Hand-written adapters with controllable timing for service tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dexquote_types::{
	AdapterError, AdapterInfo, AdapterResult, ProviderAdapter, ProviderQuote,
	ProviderRuntimeConfig, SwapQuoteRequest, U256,
};

/// Answers with a fixed quote after a fixed delay
#[derive(Debug)]
pub struct DelayedAdapter {
	info: AdapterInfo,
	delay_ms: u64,
	amount_out: String,
	calls: Arc<AtomicUsize>,
}

impl DelayedAdapter {
	pub fn new(adapter_id: &str, delay_ms: u64, amount_out: &str) -> Self {
		Self {
			info: AdapterInfo::new(adapter_id, "delayed test adapter", "0.0.0"),
			delay_ms,
			amount_out: amount_out.to_string(),
			calls: Arc::new(AtomicUsize::new(0)),
		}
	}

	/// Shared call counter, for asserting fan-out collapse
	pub fn call_counter(&self) -> Arc<AtomicUsize> {
		Arc::clone(&self.calls)
	}
}

#[async_trait]
impl ProviderAdapter for DelayedAdapter {
	fn adapter_info(&self) -> &AdapterInfo {
		&self.info
	}

	async fn fetch_quote(
		&self,
		_request: &SwapQuoteRequest,
		config: &ProviderRuntimeConfig,
	) -> AdapterResult<ProviderQuote> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
		Ok(
			ProviderQuote::new(config.name.clone(), U256::from(self.amount_out.as_str()))
				.with_confidence(0.95),
		)
	}
}

/// Always fails with an upstream status
#[derive(Debug)]
pub struct FailingAdapter {
	info: AdapterInfo,
	status: u16,
}

impl FailingAdapter {
	pub fn new(adapter_id: &str, status: u16) -> Self {
		Self {
			info: AdapterInfo::new(adapter_id, "failing test adapter", "0.0.0"),
			status,
		}
	}
}

#[async_trait]
impl ProviderAdapter for FailingAdapter {
	fn adapter_info(&self) -> &AdapterInfo {
		&self.info
	}

	async fn fetch_quote(
		&self,
		_request: &SwapQuoteRequest,
		config: &ProviderRuntimeConfig,
	) -> AdapterResult<ProviderQuote> {
		Err(AdapterError::from_status(&config.name, self.status))
	}
}
