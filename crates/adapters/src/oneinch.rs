//! 1inch Swap API v6 adapter
//!
//! Uses the classic-swap quote endpoint. 1inch does not report price
//! impact on this endpoint, so quotes carry a flat confidence slightly
//! under the 0x baseline.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use dexquote_types::{
	AdapterError, AdapterInfo, AdapterResult, ProviderAdapter, ProviderQuote,
	ProviderRuntimeConfig, SwapQuoteRequest, U256,
};

use crate::util::{build_client, classify_transport_error, join_url, runtime_headers};

const ADAPTER_ID: &str = "oneinch-v6";
const QUOTE_CONFIDENCE: f64 = 0.9;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OneInchQuoteResponse {
	dst_amount: String,
	#[serde(default)]
	gas: Option<u64>,
}

#[derive(Debug)]
pub struct OneInchAdapter {
	info: AdapterInfo,
	client: Client,
}

impl OneInchAdapter {
	pub fn new() -> Self {
		let mut headers = HeaderMap::new();
		headers.insert("Accept", HeaderValue::from_static("application/json"));

		Self {
			info: AdapterInfo::new(ADAPTER_ID, "1inch Swap API v6", "6.0.0")
				.with_required_api_key(),
			client: build_client(headers),
		}
	}

	fn build_request(
		&self,
		request: &SwapQuoteRequest,
		config: &ProviderRuntimeConfig,
	) -> AdapterResult<reqwest::RequestBuilder> {
		let api_key = config
			.api_key
			.as_ref()
			.filter(|key| !key.is_empty())
			.ok_or_else(|| AdapterError::MissingCredential {
				provider: config.name.clone(),
			})?;

		let url = join_url(
			&config.base_url,
			&format!("swap/v6.0/{}/quote", request.chain_id),
		)?;

		Ok(self
			.client
			.get(url)
			.query(&[
				("src", request.from_token.as_str()),
				("dst", request.to_token.as_str()),
				("amount", request.amount_in.as_str()),
				("includeGas", "true"),
			])
			.bearer_auth(api_key.expose_secret())
			.headers(runtime_headers(config))
			.timeout(Duration::from_millis(config.timeout_ms)))
	}

	fn map_response(
		&self,
		config: &ProviderRuntimeConfig,
		request: &SwapQuoteRequest,
		response: OneInchQuoteResponse,
	) -> AdapterResult<ProviderQuote> {
		let amount_out = U256::from(response.dst_amount);
		amount_out
			.validate()
			.map_err(|reason| AdapterError::InvalidResponse { reason })?;
		if amount_out.is_zero() {
			return Err(AdapterError::UnsupportedPair {
				from_token: request.from_token.clone(),
				to_token: request.to_token.clone(),
			});
		}

		Ok(ProviderQuote::new(config.name.clone(), amount_out)
			.with_gas_estimate(response.gas.unwrap_or(0))
			.with_confidence(QUOTE_CONFIDENCE))
	}
}

impl Default for OneInchAdapter {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl ProviderAdapter for OneInchAdapter {
	fn adapter_info(&self) -> &AdapterInfo {
		&self.info
	}

	async fn fetch_quote(
		&self,
		request: &SwapQuoteRequest,
		config: &ProviderRuntimeConfig,
	) -> AdapterResult<ProviderQuote> {
		debug!(
			provider = %config.name,
			chain_id = request.chain_id,
			"fetching 1inch quote"
		);

		let response = self
			.build_request(request, config)?
			.send()
			.await
			.map_err(|e| classify_transport_error(e, config.timeout_ms))?;

		let status = response.status();
		if !status.is_success() {
			return Err(AdapterError::from_status(&config.name, status.as_u16()));
		}

		let body: OneInchQuoteResponse =
			response
				.json()
				.await
				.map_err(|e| AdapterError::InvalidResponse {
					reason: format!("1inch quote body: {}", e),
				})?;

		self.map_response(config, request, body)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn runtime_config() -> ProviderRuntimeConfig {
		ProviderRuntimeConfig {
			name: "oneinch".to_string(),
			base_url: "https://api.1inch.dev".to_string(),
			api_key: Some("test-key".into()),
			timeout_ms: 2_000,
			headers: None,
		}
	}

	fn request() -> SwapQuoteRequest {
		SwapQuoteRequest::new(1, "0xa0b8", "0x6b17", U256::from("1000000"), 0.01)
	}

	#[test]
	fn test_map_response_success() {
		let adapter = OneInchAdapter::new();
		let body: OneInchQuoteResponse =
			serde_json::from_str(r#"{"dstAmount": "998000", "gas": 185000}"#).unwrap();

		let quote = adapter
			.map_response(&runtime_config(), &request(), body)
			.unwrap();
		assert_eq!(quote.provider, "oneinch");
		assert_eq!(quote.amount_out.to_string(), "998000");
		assert_eq!(quote.gas_estimate, 185_000);
		assert!((quote.confidence - QUOTE_CONFIDENCE).abs() < 1e-9);
	}

	#[test]
	fn test_zero_output_maps_to_unsupported_pair() {
		let adapter = OneInchAdapter::new();
		let body: OneInchQuoteResponse =
			serde_json::from_str(r#"{"dstAmount": "0"}"#).unwrap();

		let err = adapter
			.map_response(&runtime_config(), &request(), body)
			.unwrap_err();
		assert!(matches!(err, AdapterError::UnsupportedPair { .. }));
	}

	#[test]
	fn test_missing_credential_rejected_before_send() {
		let adapter = OneInchAdapter::new();
		let mut config = runtime_config();
		config.api_key = None;

		let err = adapter.build_request(&request(), &config).unwrap_err();
		assert!(matches!(err, AdapterError::MissingCredential { .. }));
	}
}
