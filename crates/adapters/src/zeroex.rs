//! 0x Swap API v2 adapter
//!
//! Calls the permit2 price endpoint, which returns an indicative quote
//! without committing allowances. The 0x API requires an API key on
//! every call, so providers wired to this adapter run degraded until a
//! credential is configured.

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

use crate::util::{
	build_client, classify_transport_error, join_url, runtime_headers, slippage_bps,
};

const ADAPTER_ID: &str = "zeroex-v2";

/// Confidence starts here and degrades with reported price impact
const BASE_CONFIDENCE: f64 = 0.95;

/// Indicative price response from `/swap/permit2/price`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ZeroExPriceResponse {
	buy_amount: String,
	#[serde(default)]
	gas: Option<String>,
	#[serde(default)]
	estimated_price_impact: Option<String>,
	#[serde(default)]
	liquidity_available: Option<bool>,
}

#[derive(Debug)]
pub struct ZeroExAdapter {
	info: AdapterInfo,
	client: Client,
}

impl ZeroExAdapter {
	pub fn new() -> Self {
		let mut headers = HeaderMap::new();
		headers.insert("Accept", HeaderValue::from_static("application/json"));
		headers.insert("0x-version", HeaderValue::from_static("v2"));

		Self {
			info: AdapterInfo::new(ADAPTER_ID, "0x Swap API v2", "2.0.0")
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

		let url = join_url(&config.base_url, "swap/permit2/price")?;

		Ok(self
			.client
			.get(url)
			.query(&[
				("chainId", request.chain_id.to_string()),
				("sellToken", request.from_token.clone()),
				("buyToken", request.to_token.clone()),
				("sellAmount", request.amount_in.to_string()),
				("slippageBps", slippage_bps(request.slippage).to_string()),
			])
			.header("0x-api-key", api_key.expose_secret())
			.headers(runtime_headers(config))
			.timeout(Duration::from_millis(config.timeout_ms)))
	}

	fn map_response(
		&self,
		config: &ProviderRuntimeConfig,
		request: &SwapQuoteRequest,
		response: ZeroExPriceResponse,
	) -> AdapterResult<ProviderQuote> {
		if response.liquidity_available == Some(false) {
			return Err(AdapterError::UnsupportedPair {
				from_token: request.from_token.clone(),
				to_token: request.to_token.clone(),
			});
		}

		let amount_out = U256::from(response.buy_amount);
		amount_out
			.validate()
			.map_err(|reason| AdapterError::InvalidResponse { reason })?;
		if amount_out.is_zero() {
			return Err(AdapterError::UnsupportedPair {
				from_token: request.from_token.clone(),
				to_token: request.to_token.clone(),
			});
		}

		let gas_estimate = response
			.gas
			.as_deref()
			.and_then(|gas| gas.parse::<u64>().ok())
			.unwrap_or(0);

		let price_impact = response
			.estimated_price_impact
			.as_deref()
			.and_then(|impact| impact.parse::<f64>().ok())
			.unwrap_or(0.0);

		Ok(ProviderQuote::new(config.name.clone(), amount_out)
			.with_gas_estimate(gas_estimate)
			.with_price_impact(price_impact)
			.with_confidence(BASE_CONFIDENCE - price_impact))
	}
}

impl Default for ZeroExAdapter {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl ProviderAdapter for ZeroExAdapter {
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
			"fetching 0x price"
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

		let body: ZeroExPriceResponse =
			response
				.json()
				.await
				.map_err(|e| AdapterError::InvalidResponse {
					reason: format!("0x price body: {}", e),
				})?;

		self.map_response(config, request, body)
	}
}
