//! Shared helpers for HTTP adapters

use std::str::FromStr;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use url::Url;

use dexquote_types::{AdapterError, AdapterResult, ProviderRuntimeConfig};

/// Build a pooled HTTP client with the adapter's static headers
pub fn build_client(static_headers: HeaderMap) -> Client {
	Client::builder()
		.default_headers(static_headers)
		.pool_idle_timeout(Duration::from_secs(90))
		.build()
		// builder only fails on invalid static configuration
		.unwrap_or_default()
}

/// Join a path onto a provider base URL, treating the base as a directory
pub fn join_url(base_url: &str, path: &str) -> AdapterResult<Url> {
	let mut base = Url::parse(base_url).map_err(|e| AdapterError::InvalidResponse {
		reason: format!("invalid base URL '{}': {}", base_url, e),
	})?;

	if !base.path().ends_with('/') {
		base.set_path(&format!("{}/", base.path()));
	}

	base.join(path.trim_start_matches('/'))
		.map_err(|e| AdapterError::InvalidResponse {
			reason: format!("cannot join '{}' onto '{}': {}", path, base_url, e),
		})
}

/// Per-provider extra headers from configuration, skipping entries that
/// do not form valid header name/value pairs
pub fn runtime_headers(config: &ProviderRuntimeConfig) -> HeaderMap {
	let mut headers = HeaderMap::new();
	if let Some(extra) = &config.headers {
		for (key, value) in extra {
			if let (Ok(name), Ok(value)) =
				(HeaderName::from_str(key), HeaderValue::from_str(value))
			{
				headers.insert(name, value);
			}
		}
	}
	headers
}

/// Normalize a transport error, recovering the timeout classification
/// that reqwest buries inside its error type
pub fn classify_transport_error(err: reqwest::Error, timeout_ms: u64) -> AdapterError {
	if err.is_timeout() {
		AdapterError::Timeout { timeout_ms }
	} else {
		AdapterError::Http(err)
	}
}

/// Slippage fraction to basis points, e.g. 0.005 -> 50
pub fn slippage_bps(slippage: f64) -> u32 {
	(slippage * 10_000.0).round() as u32
}
