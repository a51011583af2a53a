//! Per-request wiring: cache lookup, fan-out, scoring, cache store
//!
//! The orchestrator is the only component that sees a request end to
//! end. Cache failures degrade to a miss and never fail the request;
//! concurrent identical requests collapse into one upstream fan-out.

use std::sync::Arc;
use tracing::{debug, info, warn};

use dexquote_cache::{fingerprint, CacheConfig, ResponseCache, SingleFlight};
use dexquote_types::{
	AggregatedQuote, AggregationError, AggregationResult, SwapQuoteRequest,
};

use crate::aggregator::ConcurrentAggregator;
use crate::scoring::ScoringEngine;

pub struct QuoteOrchestrator {
	aggregator: Arc<ConcurrentAggregator>,
	scoring: ScoringEngine,
	cache: Arc<dyn ResponseCache>,
	cache_config: CacheConfig,
	single_flight: SingleFlight,
}

impl QuoteOrchestrator {
	pub fn new(
		aggregator: Arc<ConcurrentAggregator>,
		cache: Arc<dyn ResponseCache>,
		cache_config: CacheConfig,
	) -> Self {
		let scoring = ScoringEngine::new(aggregator.strategy().clone());
		Self {
			aggregator,
			scoring,
			cache,
			cache_config,
			single_flight: SingleFlight::new(),
		}
	}

	/// Serve one swap quote request end to end
	pub async fn get_quote(
		&self,
		request: SwapQuoteRequest,
	) -> AggregationResult<AggregatedQuote> {
		request.validate()?;

		let key = fingerprint(
			&self.cache_config.key_prefix,
			&request,
			self.cache_config.amount_bucket_digits,
		);

		match self.cache.get(&key).await {
			Ok(Some(cached)) => {
				debug!(request_id = %request.request_id, key = %key, "cache hit");
				return Ok(cached.as_cache_hit(request.request_id));
			},
			Ok(None) => {},
			Err(e) => {
				// a broken cache costs latency, never the request
				warn!(error = %e, "cache lookup failed, treating as miss");
			},
		}

		let request_id = request.request_id.clone();
		let mut result = self
			.single_flight
			.run(&key, || self.run_aggregation(request, key.clone()))
			.await?;

		// concurrent duplicates share the leader's run; each response
		// still echoes its own request id
		result.request_id = request_id;
		Ok(result)
	}

	async fn run_aggregation(
		&self,
		request: SwapQuoteRequest,
		key: String,
	) -> AggregationResult<AggregatedQuote> {
		let run = self.aggregator.aggregate(&request).await?;

		let selection = self
			.scoring
			.select(&run.quotes, &run.providers)
			.ok_or_else(|| AggregationError::InsufficientProviders {
				received: 0,
				required: self.aggregator.strategy().min_providers,
			})?;

		info!(
			request_id = %request.request_id,
			best = %selection.best.provider,
			score = selection.composite_score,
			below_threshold = selection.below_threshold,
			duration_ms = run.duration_ms,
			"aggregation complete"
		);

		let quote = AggregatedQuote {
			request_id: request.request_id,
			best: selection.best,
			composite_score: selection.composite_score,
			below_threshold: selection.below_threshold,
			quotes: run.quotes,
			total_duration_ms: run.duration_ms,
			cache_hit: false,
			metadata: run.metadata,
		};

		// failures are never cached; only this success path writes
		if let Err(e) = self.cache.put(&key, quote.clone()).await {
			warn!(error = %e, "cache store failed, continuing without");
		}

		Ok(quote)
	}

	pub fn cache(&self) -> &Arc<dyn ResponseCache> {
		&self.cache
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::aggregator::ConcurrentAggregator;
	use crate::registry::ProviderRegistry;
	use crate::testutil::{DelayedAdapter, FailingAdapter};
	use async_trait::async_trait;
	use dexquote_adapters::AdapterRegistry;
	use dexquote_cache::{CacheError, CacheResult, CacheStats, MemoryResponseCache};
	use dexquote_types::{
		AggregationStrategy, ProviderAdapter, ProviderConfig, QuoteValidationError, U256,
	};
	use mockall::mock;

	mock! {
		Cache {}

		#[async_trait]
		impl ResponseCache for Cache {
			async fn get(&self, key: &str) -> CacheResult<Option<AggregatedQuote>>;
			async fn put(&self, key: &str, quote: AggregatedQuote) -> CacheResult<()>;
			async fn purge_expired(&self) -> CacheResult<usize>;
			async fn stats(&self) -> CacheStats;
		}
	}

	fn request() -> SwapQuoteRequest {
		SwapQuoteRequest::new(1, "0xaaa", "0xbbb", U256::from("1000000"), 0.005)
	}

	fn strategy() -> AggregationStrategy {
		AggregationStrategy {
			min_wait_ms: 50,
			max_wait_ms: 1_000,
			emergency_timeout_ms: 3_000,
			min_providers: 1,
			preferred_providers: 1,
			optimal_providers: 1,
			..AggregationStrategy::default()
		}
	}

	fn orchestrator_with(
		adapters: Vec<Arc<dyn ProviderAdapter>>,
		providers: Vec<ProviderConfig>,
		cache: Arc<dyn ResponseCache>,
	) -> QuoteOrchestrator {
		let mut adapter_registry = AdapterRegistry::new();
		for adapter in adapters {
			adapter_registry.register(adapter);
		}
		let aggregator = Arc::new(ConcurrentAggregator::new(
			Arc::new(ProviderRegistry::new(providers)),
			Arc::new(adapter_registry),
			strategy(),
		));
		QuoteOrchestrator::new(aggregator, cache, CacheConfig::default())
	}

	fn provider(name: &str, adapter_id: &str) -> ProviderConfig {
		ProviderConfig::new(name, format!("https://{name}.example.com"))
			.with_adapter_id(adapter_id)
			.with_chains(vec![1])
			.with_timeout_ms(1_000)
	}

	#[tokio::test(start_paused = true)]
	async fn test_invalid_request_rejected_before_fanout() {
		let adapter = Arc::new(DelayedAdapter::new("fast", 10, "995"));
		let calls = adapter.call_counter();
		let orchestrator = orchestrator_with(
			vec![adapter],
			vec![provider("p1", "fast")],
			Arc::new(MemoryResponseCache::new(CacheConfig::default())),
		);

		let mut bad = request();
		bad.slippage = 0.9;
		let err = orchestrator.get_quote(bad).await.unwrap_err();
		assert!(matches!(
			err,
			AggregationError::InvalidRequest(QuoteValidationError::InvalidSlippage { .. })
		));
		assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
	}

	#[tokio::test(start_paused = true)]
	async fn test_cache_round_trip() {
		let adapter = Arc::new(DelayedAdapter::new("fast", 10, "995"));
		let calls = adapter.call_counter();
		let orchestrator = orchestrator_with(
			vec![adapter],
			vec![provider("p1", "fast")],
			Arc::new(MemoryResponseCache::new(CacheConfig::default())),
		);

		let first = orchestrator.get_quote(request()).await.unwrap();
		assert!(!first.cache_hit);

		// same logical swap, new request id
		let second = orchestrator.get_quote(request()).await.unwrap();
		assert!(second.cache_hit);
		assert_eq!(second.best.amount_out, first.best.amount_out);
		assert_ne!(second.request_id, first.request_id);
		assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn test_broken_cache_degrades_to_miss() {
		let mut cache = MockCache::new();
		cache
			.expect_get()
			.returning(|_| Err(CacheError::Unavailable {
				reason: "backend down".to_string(),
			}));
		cache
			.expect_put()
			.returning(|_, _| Err(CacheError::Unavailable {
				reason: "backend down".to_string(),
			}));

		let orchestrator = orchestrator_with(
			vec![Arc::new(DelayedAdapter::new("fast", 10, "995"))],
			vec![provider("p1", "fast")],
			Arc::new(cache),
		);

		let quote = orchestrator.get_quote(request()).await.unwrap();
		assert_eq!(quote.best.amount_out.to_string(), "995");
		assert!(!quote.cache_hit);
	}

	#[tokio::test(start_paused = true)]
	async fn test_failure_writes_no_cache_entry() {
		let cache = Arc::new(MemoryResponseCache::new(CacheConfig::default()));
		let orchestrator = orchestrator_with(
			vec![Arc::new(FailingAdapter::new("broken", 502))],
			vec![provider("p1", "broken")],
			cache.clone(),
		);

		let err = orchestrator.get_quote(request()).await.unwrap_err();
		assert!(matches!(err, AggregationError::InsufficientProviders { .. }));

		let stats = cache.stats().await;
		assert_eq!(stats.entries, 0);
	}

	#[tokio::test(start_paused = true)]
	async fn test_concurrent_duplicates_share_one_fanout() {
		let adapter = Arc::new(DelayedAdapter::new("fast", 200, "995"));
		let calls = adapter.call_counter();
		let orchestrator = Arc::new(orchestrator_with(
			vec![adapter],
			vec![provider("p1", "fast")],
			Arc::new(MemoryResponseCache::new(CacheConfig::default())),
		));

		let mut handles = Vec::new();
		for _ in 0..4 {
			let orchestrator = Arc::clone(&orchestrator);
			handles.push(tokio::spawn(async move {
				orchestrator.get_quote(request()).await
			}));
		}

		for handle in handles {
			let quote = handle.await.unwrap().unwrap();
			assert_eq!(quote.best.amount_out.to_string(), "995");
		}
		assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
	}
}
