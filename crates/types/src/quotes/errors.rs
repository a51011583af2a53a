//! Error types for quote aggregation
//!
//! Provider-level failures are classified in `providers::errors` and are
//! isolated inside the aggregator; only the request-validation and
//! aggregation-level errors here ever reach the caller.

use thiserror::Error;

/// Validation errors for swap quote requests
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteValidationError {
	#[error("missing required field: {field}")]
	MissingRequiredField { field: String },

	#[error("invalid amount in {field}: {reason}")]
	InvalidAmount { field: String, reason: String },

	#[error("invalid chain id: {chain_id}")]
	InvalidChainId { chain_id: u64 },

	#[error("invalid slippage tolerance: {value} (must be within [0, 0.5])")]
	InvalidSlippage { value: f64 },

	#[error("source and destination token are the same: {token}")]
	SameTokenPair { token: String },

	#[error("no configured provider supports chain {chain_id}")]
	UnsupportedChain { chain_id: u64 },
}

/// Aggregation-level errors surfaced to the caller
#[derive(Error, Debug)]
pub enum AggregationError {
	#[error("invalid request: {0}")]
	InvalidRequest(#[from] QuoteValidationError),

	#[error("insufficient providers responded: {received} succeeded, {required} required")]
	InsufficientProviders { received: usize, required: usize },

	#[error("aggregation internal error: {reason}")]
	Internal { reason: String },
}

impl AggregationError {
	/// Stable machine-readable code for the API error envelope
	pub fn code(&self) -> &'static str {
		match self {
			Self::InvalidRequest(_) => "INVALID_REQUEST",
			Self::InsufficientProviders { .. } => "INSUFFICIENT_PROVIDERS",
			Self::Internal { .. } => "INTERNAL_ERROR",
		}
	}
}
