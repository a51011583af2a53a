//! Configuration settings structures

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use dexquote_types::{AggregationStrategy, ProviderConfig, SecretString};

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	pub server: ServerSettings,
	pub providers: HashMap<String, ProviderSettings>,
	pub strategy: AggregationStrategy,
	pub cache: CacheSettings,
	pub environment: EnvironmentProfile,
	pub logging: LoggingSettings,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
	pub host: String,
	pub port: u16,
}

/// Individual provider configuration as persisted in the config file.
/// Credentials may appear here for local development, but the
/// environment override in `loader` takes precedence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
	/// Adapter implementation id; defaults to the provider key
	#[serde(default)]
	pub adapter: Option<String>,

	#[serde(default)]
	pub display_name: Option<String>,

	pub base_url: String,

	#[serde(default)]
	pub api_key: Option<String>,

	#[serde(default)]
	pub timeout_ms: u64,

	#[serde(default)]
	pub retry_count: u32,

	#[serde(default = "default_priority")]
	pub priority: u32,

	#[serde(default = "default_enabled")]
	pub enabled: bool,

	#[serde(default)]
	pub supported_chains: Vec<u64>,

	#[serde(default)]
	pub headers: Option<HashMap<String, String>>,
}

fn default_priority() -> u32 {
	100
}

fn default_enabled() -> bool {
	true
}

/// Cache tunables; mirrors `dexquote_cache::CacheConfig` to keep this
/// crate free of a cache dependency
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
	#[serde(alias = "default_ttl")]
	pub default_ttl_ms: u64,
	pub max_entries: usize,
	#[serde(alias = "cleanup_interval")]
	pub cleanup_interval_ms: u64,
	pub key_prefix: String,
	pub amount_bucket_digits: usize,
}

impl Default for CacheSettings {
	fn default() -> Self {
		Self {
			default_ttl_ms: 3_000,
			max_entries: 10_000,
			cleanup_interval_ms: 30_000,
			key_prefix: "dexquote".to_string(),
			amount_bucket_digits: 2,
		}
	}
}

/// Environment profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentProfile {
	Development,
	Staging,
	Production,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
}

/// Log format options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			server: ServerSettings {
				host: "0.0.0.0".to_string(),
				port: 3000,
			},
			providers: HashMap::new(),
			strategy: AggregationStrategy::default(),
			cache: CacheSettings::default(),
			environment: EnvironmentProfile::Development,
			logging: LoggingSettings {
				level: "info".to_string(),
				format: LogFormat::Pretty,
			},
		}
	}
}

impl Settings {
	/// Get server bind address
	pub fn bind_address(&self) -> String {
		format!("{}:{}", self.server.host, self.server.port)
	}

	/// Check if running in production
	pub fn is_production(&self) -> bool {
		self.environment == EnvironmentProfile::Production
	}

	/// Build domain provider configs for the enabled providers,
	/// clamping per-provider timeouts to the strategy's hard ceiling.
	pub fn provider_configs(&self) -> Vec<ProviderConfig> {
		self.providers
			.iter()
			.filter(|(_, settings)| settings.enabled)
			.map(|(name, settings)| {
				let timeout_ms = if settings.timeout_ms == 0 {
					self.strategy.emergency_timeout_ms
				} else {
					settings.timeout_ms.min(self.strategy.emergency_timeout_ms)
				};

				let mut config = ProviderConfig::new(name.clone(), settings.base_url.clone())
					.with_adapter_id(settings.adapter.clone().unwrap_or_else(|| name.clone()))
					.with_timeout_ms(timeout_ms)
					.with_retry_count(settings.retry_count)
					.with_priority(settings.priority)
					.with_chains(settings.supported_chains.clone());

				config.display_name = settings
					.display_name
					.clone()
					.unwrap_or_else(|| name.clone());
				config.headers = settings.headers.clone();
				config.api_key = settings
					.api_key
					.as_ref()
					.filter(|key| !key.is_empty())
					.map(|key| SecretString::from(key.as_str()));
				config
			})
			.collect()
	}
}
