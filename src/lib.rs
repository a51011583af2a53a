//! Dexquote Aggregator Library
//!
//! A concurrent multi-provider quote aggregation engine for token
//! swaps: fans out to DEX aggregator APIs, collects answers under a
//! progressive time window, scores them on a weighted composite and
//! returns the best single quote.

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

// Core domain types - the most commonly used types
pub use dexquote_types::{
	chrono,
	// External dependencies for convenience
	serde_json,
	AdapterError,
	AdapterInfo,
	AggregatedQuote,
	AggregationError,
	AggregationStrategy,
	ApiResponse,
	ProviderAdapter,
	ProviderConfig,
	ProviderMetrics,
	ProviderQuote,
	QuoteData,
	SecretString,
	SwapQuoteRequest,
	U256,
};

// Service layer
pub use dexquote_service::{ConcurrentAggregator, ProviderRegistry, QuoteOrchestrator, ScoringEngine};

// Cache layer
pub use dexquote_cache::{CacheConfig, MemoryResponseCache, ResponseCache, SingleFlight};

// API layer
pub use dexquote_api::{create_router, AppState};

// Adapters
pub use dexquote_adapters::{AdapterRegistry, OneInchAdapter, ZeroExAdapter};

// Config
pub use dexquote_config::{load_config, Settings};

// Module aliases for library consumers
pub mod models {
	pub use dexquote_types::*;
}

pub mod cache {
	pub use dexquote_cache::*;
}

pub mod config {
	pub use dexquote_config::*;
}

pub mod adapters {
	pub use dexquote_adapters::*;
}

pub mod api {
	pub use dexquote_api::*;
	pub mod routes {
		pub use dexquote_api::{create_router, AppState};
	}
}

pub mod service {
	pub use dexquote_service::*;
}

pub mod mocks;

// Re-export external dependencies for examples
pub use async_trait;

/// Builder pattern for configuring the aggregator
pub struct AggregatorBuilder {
	settings: Option<Settings>,
	adapter_registry: Option<AdapterRegistry>,
	providers: Vec<ProviderConfig>,
}

impl AggregatorBuilder {
	pub fn new() -> Self {
		Self {
			settings: None,
			adapter_registry: None,
			providers: Vec::new(),
		}
	}

	/// Set custom settings
	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	/// Get the current settings
	pub fn settings(&self) -> Option<&Settings> {
		self.settings.as_ref()
	}

	/// Register a custom adapter (uses adapter's own ID)
	pub fn with_adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
		let mut registry = self
			.adapter_registry
			.unwrap_or_else(AdapterRegistry::with_defaults);
		registry.register(adapter);
		self.adapter_registry = Some(registry);
		self
	}

	/// Add a provider on top of whatever the settings define
	pub fn with_provider(mut self, provider: ProviderConfig) -> Self {
		self.providers.push(provider);
		self
	}

	/// Wire everything and return the router plus its state
	pub async fn start(self) -> Result<(axum::Router, AppState), Box<dyn std::error::Error>> {
		let settings = self.settings.clone().unwrap_or_default();
		settings.strategy.validate()?;

		let mut providers = settings.provider_configs();
		providers.extend(self.providers.iter().cloned());

		let adapter_registry = Arc::new(
			self.adapter_registry
				.unwrap_or_else(AdapterRegistry::with_defaults),
		);

		// every provider must reference a registered adapter; the
		// adapter also decides whether a missing key degrades it
		for provider in &mut providers {
			match adapter_registry.get(&provider.adapter_id) {
				Some(adapter) => {
					provider.api_key_required = adapter.adapter_info().requires_api_key;
				},
				None => {
					return Err(format!(
						"provider '{}' references unknown adapter '{}'",
						provider.name, provider.adapter_id
					)
					.into());
				},
			}
		}

		info!(providers = providers.len(), "initializing provider registry");
		let registry = Arc::new(ProviderRegistry::new(providers));

		let cache_config = CacheConfig {
			default_ttl_ms: settings.cache.default_ttl_ms,
			max_entries: settings.cache.max_entries,
			cleanup_interval_ms: settings.cache.cleanup_interval_ms,
			key_prefix: settings.cache.key_prefix.clone(),
			amount_bucket_digits: settings.cache.amount_bucket_digits,
		};
		let cache = Arc::new(MemoryResponseCache::new(cache_config.clone()));
		let _ = cache.start_sweeper();

		let aggregator = Arc::new(ConcurrentAggregator::new(
			Arc::clone(&registry),
			Arc::clone(&adapter_registry),
			settings.strategy.clone(),
		));

		let orchestrator = Arc::new(QuoteOrchestrator::new(
			aggregator,
			cache as Arc<dyn ResponseCache>,
			cache_config,
		));

		let app_state = AppState {
			orchestrator,
			registry,
		};

		let router = create_router().with_state(app_state.clone());
		Ok((router, app_state))
	}

	/// Initialize tracing with configuration-based settings
	fn init_tracing_from_settings(
		&self,
		settings: &Settings,
	) -> Result<(), Box<dyn std::error::Error>> {
		use dexquote_config::LogFormat;

		let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
			.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.logging.level));

		match settings.logging.format {
			LogFormat::Json => tracing_subscriber::fmt()
				.json()
				.with_env_filter(env_filter)
				.init(),
			LogFormat::Pretty => tracing_subscriber::fmt()
				.pretty()
				.with_env_filter(env_filter)
				.init(),
			LogFormat::Compact => tracing_subscriber::fmt()
				.compact()
				.with_env_filter(env_filter)
				.init(),
		}

		info!(
			level = %settings.logging.level,
			format = ?settings.logging.format,
			"logging configuration applied"
		);
		Ok(())
	}

	/// Start the complete server: .env, config with defaults, tracing,
	/// cache sweeper, bind and serve.
	pub async fn start_server(mut self) -> Result<(), Box<dyn std::error::Error>> {
		dotenvy::dotenv().ok();

		let using_provided_settings = self.settings.is_some();
		let settings = match self.settings.take() {
			Some(settings) => settings,
			None => load_config()?,
		};

		self.init_tracing_from_settings(&settings)?;

		info!(
			"using configuration from {}",
			if using_provided_settings {
				"provided settings"
			} else {
				"config file or defaults"
			}
		);

		for (name, provider) in settings.providers.iter().filter(|(_, p)| p.enabled) {
			info!(
				provider = %name,
				base_url = %provider.base_url,
				timeout_ms = provider.timeout_ms,
				"provider enabled"
			);
		}

		let bind_addr = settings.bind_address();
		let addr: SocketAddr = bind_addr
			.parse()
			.map_err(|e| format!("invalid bind address '{}': {}", bind_addr, e))?;

		self.settings = Some(settings);
		let (app, _) = self.start().await?;

		let listener = tokio::net::TcpListener::bind(addr).await?;
		info!(address = %bind_addr, "dexquote aggregator listening");
		info!("API endpoints available:");
		info!("  GET  /health");
		info!("  POST /quote");

		axum::serve(listener, app).await?;
		Ok(())
	}
}

impl Default for AggregatorBuilder {
	fn default() -> Self {
		Self::new()
	}
}
