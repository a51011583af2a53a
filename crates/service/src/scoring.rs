//! Composite scoring and winner selection
//!
//! Every surviving quote gets a score in [0, 1] built from four
//! components: inverse-normalized latency, reported confidence, the
//! provider's reputation weight, and a market component that compares
//! output amounts discounted by price impact. The weights come from the
//! aggregation strategy and sum to 1.0, which keeps the composite in
//! the unit interval.

use std::collections::HashMap;
use tracing::debug;

use dexquote_types::{AggregationStrategy, ProviderConfig, ProviderQuote};

/// Scores within this distance are treated as tied and fall through to
/// the priority tie-break
const SCORE_EPSILON: f64 = 1e-9;

/// The winning quote with its score
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
	pub best: ProviderQuote,
	pub composite_score: f64,
	pub below_threshold: bool,
}

/// Reputation weight and priority as the scorer needs them
struct ProviderRank {
	weight: f64,
	priority: u32,
}

pub struct ScoringEngine {
	strategy: AggregationStrategy,
}

impl ScoringEngine {
	pub fn new(strategy: AggregationStrategy) -> Self {
		Self { strategy }
	}

	/// Pick the best quote among the collected set, or `None` when no
	/// quote survives the confidence discard.
	pub fn select(
		&self,
		quotes: &[ProviderQuote],
		providers: &[ProviderConfig],
	) -> Option<Selection> {
		let ranks: HashMap<&str, ProviderRank> = providers
			.iter()
			.map(|p| {
				(
					p.name.as_str(),
					ProviderRank {
						weight: p.weight,
						priority: p.priority,
					},
				)
			})
			.collect();

		let eligible: Vec<&ProviderQuote> = quotes
			.iter()
			.filter(|q| q.confidence >= self.strategy.min_confidence)
			.collect();

		if eligible.is_empty() {
			return None;
		}

		let min_latency = eligible.iter().map(|q| q.latency_ms).min().unwrap_or(0);
		let max_latency = eligible.iter().map(|q| q.latency_ms).max().unwrap_or(0);
		let best_out = eligible
			.iter()
			.filter_map(|q| q.amount_out.as_f64())
			.fold(0.0_f64, f64::max);

		let mut winner: Option<(&ProviderQuote, f64, u32)> = None;
		for quote in &eligible {
			let rank = ranks.get(quote.provider.as_str());
			let score = self.composite_score(quote, min_latency, max_latency, best_out, rank);
			let priority = rank.map_or(u32::MAX, |r| r.priority);
			debug!(provider = %quote.provider, score, "scored quote");

			let replaces = match winner {
				None => true,
				Some((current, current_score, current_priority)) => {
					if score > current_score + SCORE_EPSILON {
						true
					} else if (score - current_score).abs() <= SCORE_EPSILON {
						priority < current_priority
							|| (priority == current_priority
								&& quote.latency_ms < current.latency_ms)
					} else {
						false
					}
				},
			};

			if replaces {
				winner = Some((quote, score, priority));
			}
		}

		winner.map(|(best, composite_score, _)| Selection {
			best: best.clone(),
			composite_score,
			below_threshold: composite_score < self.strategy.composite_score_threshold,
		})
	}

	fn composite_score(
		&self,
		quote: &ProviderQuote,
		min_latency: u64,
		max_latency: u64,
		best_out: f64,
		rank: Option<&ProviderRank>,
	) -> f64 {
		let time_score = if max_latency == min_latency {
			1.0
		} else {
			(max_latency - quote.latency_ms) as f64 / (max_latency - min_latency) as f64
		};

		let confidence_score = quote.confidence;

		// unknown providers are scored pessimistically at the weight floor
		let provider_score = rank.map_or(0.1, |r| r.weight);

		let market_score = if best_out > 0.0 {
			let output_ratio = quote.amount_out.as_f64().unwrap_or(0.0) / best_out;
			(output_ratio * (1.0 - quote.price_impact)).clamp(0.0, 1.0)
		} else {
			0.0
		};

		self.strategy.time_weight * time_score
			+ self.strategy.confidence_weight * confidence_score
			+ self.strategy.provider_weight * provider_score
			+ self.strategy.market_weight * market_score
	}
}
