//! Aggregation strategy: the tunable knobs of the progressive window
//! and the composite scoring weights.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tolerance when checking that the four weights sum to 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Timing, quorum and scoring parameters for one aggregation run
///
/// Validated once at load time; an invalid strategy never reaches the
/// aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationStrategy {
	/// Floor: never decide before this much time has passed, even with
	/// enough responses in hand. Guards against a single fast but
	/// unrepresentative provider dominating.
	#[serde(alias = "min_wait")]
	pub min_wait_ms: u64,

	/// Soft ceiling for the collection window
	#[serde(alias = "max_wait")]
	pub max_wait_ms: u64,

	/// Latency under which a response classifies as "fast" for the
	/// early-exit path
	#[serde(alias = "fast_response_threshold")]
	pub fast_response_ms: u64,

	/// Hard ceiling; always triggers an immediate decision
	#[serde(alias = "emergency_timeout")]
	pub emergency_timeout_ms: u64,

	/// Quotes below this confidence are discarded before scoring
	pub min_confidence: f64,

	/// Fewer successes than this at the final ceiling fails the run
	pub min_providers: usize,

	/// Enough successes for the early-exit path after the floor
	pub preferred_providers: usize,

	/// Stop collecting once this many successes are in hand
	pub optimal_providers: usize,

	/// Weight of the latency factor
	pub time_weight: f64,

	/// Weight of the provider-reported confidence factor
	pub confidence_weight: f64,

	/// Weight of the provider reputation factor
	pub provider_weight: f64,

	/// Weight of the output-amount (market) factor
	pub market_weight: f64,

	/// Best scores under this value are flagged, not rejected
	pub composite_score_threshold: f64,
}

impl Default for AggregationStrategy {
	fn default() -> Self {
		Self {
			min_wait_ms: 200,
			max_wait_ms: 2_000,
			fast_response_ms: 500,
			emergency_timeout_ms: 5_000,
			min_confidence: 0.3,
			min_providers: 1,
			preferred_providers: 2,
			optimal_providers: 3,
			time_weight: 0.3,
			confidence_weight: 0.4,
			provider_weight: 0.2,
			market_weight: 0.1,
			composite_score_threshold: 0.7,
		}
	}
}

/// Strategy validation failures, rejected at configuration time
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrategyError {
	#[error("scoring weights must sum to 1.0, got {sum}")]
	WeightSumInvalid { sum: f64 },

	#[error("scoring weight {name} must be non-negative, got {value}")]
	NegativeWeight { name: &'static str, value: f64 },

	#[error("min_wait_ms ({min}) must not exceed max_wait_ms ({max})")]
	WaitWindowInverted { min: u64, max: u64 },

	#[error("max_wait_ms ({max}) must not exceed emergency_timeout_ms ({emergency})")]
	EmergencyBelowMax { max: u64, emergency: u64 },

	#[error("provider counts must be non-decreasing: min {min} <= preferred {preferred} <= optimal {optimal}")]
	ProviderCountsInvalid {
		min: usize,
		preferred: usize,
		optimal: usize,
	},

	#[error("min_providers must be at least 1")]
	MinProvidersZero,

	#[error("{name} must lie within [0, 1], got {value}")]
	FractionOutOfRange { name: &'static str, value: f64 },
}

impl AggregationStrategy {
	/// Validate all strategy invariants
	pub fn validate(&self) -> Result<(), StrategyError> {
		for (name, value) in [
			("time_weight", self.time_weight),
			("confidence_weight", self.confidence_weight),
			("provider_weight", self.provider_weight),
			("market_weight", self.market_weight),
		] {
			if !value.is_finite() || value < 0.0 {
				return Err(StrategyError::NegativeWeight { name, value });
			}
		}

		let sum =
			self.time_weight + self.confidence_weight + self.provider_weight + self.market_weight;
		if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
			return Err(StrategyError::WeightSumInvalid { sum });
		}

		if self.min_wait_ms > self.max_wait_ms {
			return Err(StrategyError::WaitWindowInverted {
				min: self.min_wait_ms,
				max: self.max_wait_ms,
			});
		}

		if self.max_wait_ms > self.emergency_timeout_ms {
			return Err(StrategyError::EmergencyBelowMax {
				max: self.max_wait_ms,
				emergency: self.emergency_timeout_ms,
			});
		}

		if self.min_providers == 0 {
			return Err(StrategyError::MinProvidersZero);
		}

		if self.min_providers > self.preferred_providers
			|| self.preferred_providers > self.optimal_providers
		{
			return Err(StrategyError::ProviderCountsInvalid {
				min: self.min_providers,
				preferred: self.preferred_providers,
				optimal: self.optimal_providers,
			});
		}

		for (name, value) in [
			("min_confidence", self.min_confidence),
			("composite_score_threshold", self.composite_score_threshold),
		] {
			if !value.is_finite() || !(0.0..=1.0).contains(&value) {
				return Err(StrategyError::FractionOutOfRange { name, value });
			}
		}

		Ok(())
	}
}
