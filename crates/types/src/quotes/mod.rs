//! Quote domain models
//!
//! `ProviderQuote` is the normalized shape every adapter produces for one
//! provider response; it lives only for the duration of a single
//! aggregation run. `AggregatedQuote` is the run's outcome: the winning
//! quote plus everything collected along the way, kept for observability.

use serde::{Deserialize, Serialize};

use crate::models::U256;

pub mod errors;
pub mod request;
pub mod response;

pub use errors::{AggregationError, QuoteValidationError};
pub use request::SwapQuoteRequest;
pub use response::{ApiResponse, ErrorBody, QuoteData};

/// Result type for aggregation operations
pub type AggregationResult<T> = Result<T, AggregationError>;

/// A single provider's normalized quote for a swap request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderQuote {
	/// Provider that produced this quote (registry key)
	pub provider: String,

	/// Output amount in smallest units of the destination token
	pub amount_out: U256,

	/// Estimated gas cost of executing the swap
	pub gas_estimate: u64,

	/// Price impact of the trade as a fraction in [0, 1]
	pub price_impact: f64,

	/// Provider-reported confidence in [0, 1]
	pub confidence: f64,

	/// Observed round-trip latency for the provider call
	pub latency_ms: u64,
}

impl ProviderQuote {
	pub fn new(provider: impl Into<String>, amount_out: U256) -> Self {
		Self {
			provider: provider.into(),
			amount_out,
			gas_estimate: 0,
			price_impact: 0.0,
			confidence: 1.0,
			latency_ms: 0,
		}
	}

	pub fn with_gas_estimate(mut self, gas: u64) -> Self {
		self.gas_estimate = gas;
		self
	}

	pub fn with_price_impact(mut self, impact: f64) -> Self {
		self.price_impact = impact.clamp(0.0, 1.0);
		self
	}

	pub fn with_confidence(mut self, confidence: f64) -> Self {
		self.confidence = confidence.clamp(0.0, 1.0);
		self
	}

	pub fn with_latency(mut self, latency_ms: u64) -> Self {
		self.latency_ms = latency_ms;
		self
	}
}

/// Counters describing how one aggregation run unfolded
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregationMetadata {
	/// Providers the fan-out was issued to
	pub providers_queried: usize,

	/// Providers that returned a usable quote in time
	pub responded_success: usize,

	/// Providers that returned an error
	pub responded_error: usize,

	/// Providers that hit their call deadline
	pub timed_out: usize,

	/// Whether the progressive fast path returned before the full window
	pub early_exit: bool,
}

/// Outcome of one aggregation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedQuote {
	/// Request this quote answers
	pub request_id: String,

	/// The winning quote
	pub best: ProviderQuote,

	/// Composite score of the winning quote
	pub composite_score: f64,

	/// Set when the best score fell under the configured threshold.
	/// The quote is still returned; the caller decides whether to warn.
	pub below_threshold: bool,

	/// Every successful quote collected during the run
	pub quotes: Vec<ProviderQuote>,

	/// Wall-clock duration of the whole run
	pub total_duration_ms: u64,

	/// Whether this result was served from the response cache
	pub cache_hit: bool,

	/// Run counters
	pub metadata: AggregationMetadata,
}

impl AggregatedQuote {
	/// Re-label a cached result for a new logical request
	pub fn as_cache_hit(mut self, request_id: String) -> Self {
		self.request_id = request_id;
		self.cache_hit = true;
		self.total_duration_ms = 0;
		self
	}
}
