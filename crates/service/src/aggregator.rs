//! Concurrent provider fan-out under a progressive time window
//!
//! One aggregation run spawns one task per eligible provider and
//! collects results over a channel. The decision loop enforces the
//! window: nothing returns before the minimum wait, a fast quorum exits
//! early, and the emergency ceiling always fires. Provider tasks that
//! outlive the decision are aborted; their results are dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, timeout, Instant};
use tracing::{debug, warn};

use dexquote_adapters::AdapterRegistry;
use dexquote_types::{
	AdapterError, AdapterResult, AggregationError, AggregationMetadata, AggregationResult,
	AggregationStrategy, ProviderAdapter, ProviderConfig, ProviderQuote, ProviderRuntimeConfig,
	QuoteValidationError, SwapQuoteRequest,
};

use crate::registry::ProviderRegistry;

/// Everything one fan-out produced, before scoring
#[derive(Debug)]
pub struct AggregationRun {
	/// Successful quotes in arrival order
	pub quotes: Vec<ProviderQuote>,

	/// Snapshot the run used, for weight and priority lookups
	pub providers: Vec<ProviderConfig>,

	pub metadata: AggregationMetadata,

	/// Wall-clock duration of the collection loop
	pub duration_ms: u64,
}

enum Outcome {
	Success(ProviderQuote),
	Failure {
		provider: String,
		error: AdapterError,
	},
}

pub struct ConcurrentAggregator {
	registry: Arc<ProviderRegistry>,
	adapters: Arc<AdapterRegistry>,
	strategy: AggregationStrategy,
}

impl ConcurrentAggregator {
	pub fn new(
		registry: Arc<ProviderRegistry>,
		adapters: Arc<AdapterRegistry>,
		strategy: AggregationStrategy,
	) -> Self {
		Self {
			registry,
			adapters,
			strategy,
		}
	}

	pub fn strategy(&self) -> &AggregationStrategy {
		&self.strategy
	}

	/// Fan out to every eligible provider and collect quotes under the
	/// progressive window.
	pub async fn aggregate(
		&self,
		request: &SwapQuoteRequest,
	) -> AggregationResult<AggregationRun> {
		let providers = self.registry.active_providers(request.chain_id);
		if providers.is_empty() {
			return Err(AggregationError::InvalidRequest(
				QuoteValidationError::UnsupportedChain {
					chain_id: request.chain_id,
				},
			));
		}

		let started = Instant::now();
		let (tx, mut rx) = mpsc::channel::<Outcome>(providers.len());
		let handles = self.spawn_provider_calls(request, &providers, tx);

		let mut metadata = AggregationMetadata {
			providers_queried: providers.len(),
			..Default::default()
		};
		let mut quotes: Vec<ProviderQuote> = Vec::new();

		let min_deadline = started + Duration::from_millis(self.strategy.min_wait_ms);
		let max_deadline = started + Duration::from_millis(self.strategy.max_wait_ms);
		let emergency_deadline =
			started + Duration::from_millis(self.strategy.emergency_timeout_ms);

		let mut received = 0usize;
		loop {
			tokio::select! {
				maybe = rx.recv() => {
					match maybe {
						Some(Outcome::Success(quote)) => {
							received += 1;
							metadata.responded_success += 1;
							debug!(
								provider = %quote.provider,
								latency_ms = quote.latency_ms,
								"collected provider quote"
							);
							quotes.push(quote);
						},
						Some(Outcome::Failure { provider, error }) => {
							received += 1;
							if error.is_timeout() {
								metadata.timed_out += 1;
							} else {
								metadata.responded_error += 1;
							}
							warn!(provider = %provider, error = %error, "provider call failed");
							self.record_failure(&provider, &error);
						},
						None => break,
					}

					if received == metadata.providers_queried {
						// everyone answered; still honor the floor
						if Instant::now() < min_deadline {
							sleep_until(min_deadline).await;
						}
						break;
					}
					if Instant::now() >= min_deadline {
						if quotes.len() >= self.strategy.optimal_providers {
							metadata.early_exit = true;
							break;
						}
						if self.fast_quorum(&quotes) {
							metadata.early_exit = true;
							break;
						}
						if Instant::now() >= max_deadline
							&& quotes.len() >= self.strategy.min_providers
						{
							break;
						}
					}
				},
				_ = sleep_until(min_deadline), if Instant::now() < min_deadline => {
					// the floor just elapsed; re-evaluate what already arrived
					if quotes.len() >= self.strategy.optimal_providers || self.fast_quorum(&quotes) {
						metadata.early_exit = true;
						break;
					}
				},
				_ = sleep_until(max_deadline), if Instant::now() < max_deadline => {
					if quotes.len() >= self.strategy.min_providers {
						break;
					}
					// below the minimum: hold on until the hard ceiling
				},
				_ = sleep_until(emergency_deadline) => {
					warn!(
						elapsed_ms = started.elapsed().as_millis() as u64,
						"emergency timeout reached"
					);
					break;
				},
			}
		}

		// late finishers are discarded, not awaited
		for handle in &handles {
			handle.abort();
		}
		drop(rx);

		let duration_ms = started.elapsed().as_millis() as u64;
		self.record_successes(&quotes);

		if quotes.len() < self.strategy.min_providers {
			return Err(AggregationError::InsufficientProviders {
				received: quotes.len(),
				required: self.strategy.min_providers,
			});
		}

		Ok(AggregationRun {
			quotes,
			providers,
			metadata,
			duration_ms,
		})
	}

	/// Fast path quorum: enough successes and the quickest of them came
	/// back under the fast-response bar
	fn fast_quorum(&self, quotes: &[ProviderQuote]) -> bool {
		quotes.len() >= self.strategy.preferred_providers
			&& quotes
				.iter()
				.map(|q| q.latency_ms)
				.min()
				.is_some_and(|fastest| fastest < self.strategy.fast_response_ms)
	}

	fn spawn_provider_calls(
		&self,
		request: &SwapQuoteRequest,
		providers: &[ProviderConfig],
		tx: mpsc::Sender<Outcome>,
	) -> Vec<JoinHandle<()>> {
		providers
			.iter()
			.map(|provider| {
				let adapter = self.adapters.get(&provider.adapter_id);
				let runtime = ProviderRuntimeConfig::from(provider);
				let retry_count = provider.retry_count;
				let name = provider.name.clone();
				let request = request.clone();
				let tx = tx.clone();
				let call_timeout_ms = provider
					.timeout_ms
					.min(self.strategy.emergency_timeout_ms);

				tokio::spawn(async move {
					let Some(adapter) = adapter else {
						warn!(provider = %name, "no adapter registered for provider");
						let _ = tx
							.send(Outcome::Failure {
								provider: name.clone(),
								error: AdapterError::InvalidRequest {
									reason: format!("unknown adapter for provider {name}"),
								},
							})
							.await;
						return;
					};

					let outcome =
						call_provider(adapter, &request, &runtime, retry_count, call_timeout_ms)
							.await;

					let _ = tx
						.send(match outcome {
							Ok(quote) => Outcome::Success(quote),
							Err(error) => Outcome::Failure {
								provider: name,
								error,
							},
						})
						.await;
				})
			})
			.collect()
	}

	fn record_failure(&self, provider: &str, error: &AdapterError) {
		if error.counts_against_reputation() {
			let registry = Arc::clone(&self.registry);
			let provider = provider.to_string();
			let is_timeout = error.is_timeout();
			tokio::spawn(async move {
				registry.record_failure(&provider, is_timeout);
			});
		}
	}

	fn record_successes(&self, quotes: &[ProviderQuote]) {
		let registry = Arc::clone(&self.registry);
		let observed: Vec<(String, u64)> = quotes
			.iter()
			.map(|q| (q.provider.clone(), q.latency_ms))
			.collect();
		tokio::spawn(async move {
			for (provider, latency_ms) in observed {
				registry.record_success(&provider, latency_ms);
			}
		});
	}
}

/// One provider call with retries, each attempt bounded by the
/// provider's own deadline
async fn call_provider(
	adapter: Arc<dyn ProviderAdapter>,
	request: &SwapQuoteRequest,
	runtime: &ProviderRuntimeConfig,
	retry_count: u32,
	call_timeout_ms: u64,
) -> AdapterResult<ProviderQuote> {
	let mut attempt = 0;
	loop {
		let attempt_started = Instant::now();
		let result = timeout(
			Duration::from_millis(call_timeout_ms),
			adapter.fetch_quote(request, runtime),
		)
		.await;

		let latency_ms = attempt_started.elapsed().as_millis() as u64;
		match result {
			Ok(Ok(quote)) => return Ok(quote.with_latency(latency_ms)),
			Ok(Err(error)) if error.is_retryable() && attempt < retry_count => {
				debug!(
					provider = %runtime.name,
					attempt,
					error = %error,
					"retrying provider call"
				);
				attempt += 1;
			},
			Ok(Err(error)) => return Err(error),
			Err(_) => {
				return Err(AdapterError::Timeout {
					timeout_ms: call_timeout_ms,
				})
			},
		}
	}
}
