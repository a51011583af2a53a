//! Wire shapes for the /quote endpoint
//!
//! The engine answers with a `{success, data | error}` envelope; amounts
//! stay decimal strings end to end.

use serde::{Deserialize, Serialize};

use super::AggregatedQuote;
use crate::models::U256;

/// Response envelope shared by success and failure paths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
	pub success: bool,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<ErrorBody>,
}

/// Structured error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
	pub code: String,
	pub message: String,
}

impl<T> ApiResponse<T> {
	pub fn ok(data: T) -> Self {
		Self {
			success: true,
			data: Some(data),
			error: None,
		}
	}

	pub fn err(code: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			success: false,
			data: None,
			error: Some(ErrorBody {
				code: code.into(),
				message: message.into(),
			}),
		}
	}
}

/// Success payload for POST /quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteData {
	pub request_id: String,
	pub amount_out: U256,
	pub best_aggregator: String,
	pub gas_estimate: u64,
	/// Price impact as a decimal string fraction, e.g. "0.0125"
	pub price_impact: String,
	pub total_duration_ms: u64,
	pub cache_hit: bool,
	/// Set when the winning composite score was under the configured
	/// threshold; surfaced so callers can warn their users
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	pub below_score_threshold: bool,
}

impl From<&AggregatedQuote> for QuoteData {
	fn from(quote: &AggregatedQuote) -> Self {
		Self {
			request_id: quote.request_id.clone(),
			amount_out: quote.best.amount_out.clone(),
			best_aggregator: quote.best.provider.clone(),
			gas_estimate: quote.best.gas_estimate,
			price_impact: format!("{}", quote.best.price_impact),
			total_duration_ms: quote.total_duration_ms,
			cache_hit: quote.cache_hit,
			below_score_threshold: quote.below_threshold,
		}
	}
}
