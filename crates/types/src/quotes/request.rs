//! Swap quote request model and validation

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::QuoteValidationError;
use crate::models::U256;

/// Maximum accepted slippage tolerance (50%)
pub const MAX_SLIPPAGE: f64 = 0.5;

/// A request for the best swap quote across all providers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapQuoteRequest {
	/// Caller-supplied idempotency identifier; generated when absent
	#[serde(default = "generate_request_id")]
	pub request_id: String,

	/// Chain the swap executes on
	pub chain_id: u64,

	/// Source token contract address
	pub from_token: String,

	/// Destination token contract address
	pub to_token: String,

	/// Input amount in smallest units
	pub amount_in: U256,

	/// Slippage tolerance as a fraction in [0, 0.5]. Accepted on the
	/// wire as either a JSON number or a decimal string.
	#[serde(deserialize_with = "deserialize_slippage")]
	pub slippage: f64,

	/// Optional requester wallet address, forwarded to providers that
	/// price differently per taker
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub requester: Option<String>,
}

fn deserialize_slippage<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
	D: serde::Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum NumberOrString {
		Number(f64),
		String(String),
	}

	match NumberOrString::deserialize(deserializer)? {
		NumberOrString::Number(value) => Ok(value),
		NumberOrString::String(raw) => raw.trim().parse().map_err(serde::de::Error::custom),
	}
}

fn generate_request_id() -> String {
	Uuid::new_v4().to_string()
}

impl SwapQuoteRequest {
	pub fn new(
		chain_id: u64,
		from_token: impl Into<String>,
		to_token: impl Into<String>,
		amount_in: U256,
		slippage: f64,
	) -> Self {
		Self {
			request_id: generate_request_id(),
			chain_id,
			from_token: from_token.into(),
			to_token: to_token.into(),
			amount_in,
			slippage,
			requester: None,
		}
	}

	/// Validate the request before any fan-out happens.
	/// Rejected requests are never retried and never reach a provider.
	pub fn validate(&self) -> Result<(), QuoteValidationError> {
		if self.from_token.trim().is_empty() {
			return Err(QuoteValidationError::MissingRequiredField {
				field: "from_token".to_string(),
			});
		}

		if self.to_token.trim().is_empty() {
			return Err(QuoteValidationError::MissingRequiredField {
				field: "to_token".to_string(),
			});
		}

		if self.from_token.eq_ignore_ascii_case(&self.to_token) {
			return Err(QuoteValidationError::SameTokenPair {
				token: self.from_token.clone(),
			});
		}

		if self.chain_id == 0 {
			return Err(QuoteValidationError::InvalidChainId {
				chain_id: self.chain_id,
			});
		}

		self.amount_in
			.validate()
			.map_err(|reason| QuoteValidationError::InvalidAmount {
				field: "amount_in".to_string(),
				reason,
			})?;

		if self.amount_in.is_zero() {
			return Err(QuoteValidationError::InvalidAmount {
				field: "amount_in".to_string(),
				reason: "amount must be greater than zero".to_string(),
			});
		}

		if !(0.0..=MAX_SLIPPAGE).contains(&self.slippage) || !self.slippage.is_finite() {
			return Err(QuoteValidationError::InvalidSlippage {
				value: self.slippage,
			});
		}

		Ok(())
	}
}
