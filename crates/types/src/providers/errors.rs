//! Provider-level error classification
//!
//! Adapters classify every failure so the aggregator can decide whether
//! to retry the call, whether the failure counts against the provider's
//! reputation, and how to bucket it in the run metadata. These errors
//! never unwind past the aggregator.

use thiserror::Error;

/// Result type for adapter operations
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Classified failure of a single provider call
#[derive(Error, Debug)]
pub enum AdapterError {
	#[error("provider rejected the request: {reason}")]
	InvalidRequest { reason: String },

	#[error("provider call timed out after {timeout_ms}ms")]
	Timeout { timeout_ms: u64 },

	#[error("upstream error from {provider}: status {status}")]
	Upstream { provider: String, status: u16 },

	#[error("provider rate limited the request")]
	RateLimited,

	#[error("provider does not support pair {from_token}/{to_token}")]
	UnsupportedPair {
		from_token: String,
		to_token: String,
	},

	#[error("malformed provider response: {reason}")]
	InvalidResponse { reason: String },

	#[error("missing credential for provider {provider}")]
	MissingCredential { provider: String },

	#[error("http transport error: {0}")]
	Http(#[from] reqwest::Error),
}

impl AdapterError {
	/// Whether this failure should count as an attempt against the
	/// provider's reputation. Failures caused by the request itself
	/// (invalid input, unsupported pair) say nothing about the provider.
	pub fn counts_against_reputation(&self) -> bool {
		!matches!(
			self,
			Self::InvalidRequest { .. }
				| Self::UnsupportedPair { .. }
				| Self::MissingCredential { .. }
		)
	}

	/// Whether a retry within the same aggregation run can help
	pub fn is_retryable(&self) -> bool {
		matches!(self, Self::Upstream { .. } | Self::Http(_))
	}

	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Timeout { .. })
	}

	/// Map an upstream HTTP status to the taxonomy
	pub fn from_status(provider: &str, status: u16) -> Self {
		match status {
			429 => Self::RateLimited,
			400 | 422 => Self::InvalidRequest {
				reason: format!("upstream returned status {status}"),
			},
			_ => Self::Upstream {
				provider: provider.to_string(),
				status,
			},
		}
	}
}
