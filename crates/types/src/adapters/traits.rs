//! Core adapter trait for provider implementations

use async_trait::async_trait;
use std::fmt::Debug;

use crate::providers::{AdapterResult, ProviderRuntimeConfig};
use crate::quotes::{ProviderQuote, SwapQuoteRequest};

/// Static metadata describing an adapter implementation
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterInfo {
	/// Identifier providers reference from configuration, e.g. "zeroex-v2"
	pub adapter_id: String,

	/// Human-readable name
	pub name: String,

	/// Adapter implementation version
	pub version: String,

	/// Whether calls require an API credential
	pub requires_api_key: bool,
}

impl AdapterInfo {
	pub fn new(
		adapter_id: impl Into<String>,
		name: impl Into<String>,
		version: impl Into<String>,
	) -> Self {
		Self {
			adapter_id: adapter_id.into(),
			name: name.into(),
			version: version.into(),
			requires_api_key: false,
		}
	}

	pub fn with_required_api_key(mut self) -> Self {
		self.requires_api_key = true;
		self
	}
}

/// Contract every provider adapter implements
///
/// An adapter translates a [`SwapQuoteRequest`] into one provider-specific
/// upstream call and normalizes the raw response into a [`ProviderQuote`].
/// Implementations hold no mutable state and perform no side effects
/// beyond the outbound call.
///
/// Cancellation: the aggregator bounds every call with
/// `tokio::time::timeout` and drops or aborts the task once it has
/// decided. Implementations must be cancel-safe at every await point,
/// which in practice means doing nothing but the HTTP round trip and
/// pure response mapping.
#[async_trait]
pub trait ProviderAdapter: Send + Sync + Debug {
	/// Adapter metadata; the only required accessor
	fn adapter_info(&self) -> &AdapterInfo;

	/// Adapter ID used for registration and provider matching
	fn id(&self) -> &str {
		&self.adapter_info().adapter_id
	}

	/// Fetch one quote from the provider described by `config`
	async fn fetch_quote(
		&self,
		request: &SwapQuoteRequest,
		config: &ProviderRuntimeConfig,
	) -> AdapterResult<ProviderQuote>;
}
