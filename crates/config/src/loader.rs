//! Configuration loading utilities
//!
//! Loading is a three-step pipeline: read the file, overlay credentials
//! from the environment, then validate the strategy invariants. An
//! invalid strategy aborts startup; it never reaches the aggregator.

use config::{Config, File};
use thiserror::Error;
use tracing::{debug, warn};

use crate::Settings;
use dexquote_types::{SecretString, StrategyError};

/// Environment variable pattern for provider credentials:
/// `DEXQUOTE_PROVIDER_<NAME>_API_KEY` (name uppercased, `-` becomes `_`)
const PROVIDER_KEY_PREFIX: &str = "DEXQUOTE_PROVIDER_";
const PROVIDER_KEY_SUFFIX: &str = "_API_KEY";

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigLoadError {
	#[error("failed to read configuration: {0}")]
	Read(#[from] config::ConfigError),

	#[error("invalid aggregation strategy: {0}")]
	Strategy(#[from] StrategyError),
}

/// Load settings from `config/config.{json,toml,yaml}`, overlay secrets
/// from the environment and validate. A missing file yields defaults.
pub fn load_config() -> Result<Settings, ConfigLoadError> {
	let raw = Config::builder()
		.add_source(File::with_name("config/config").required(false))
		.build()?;

	let mut settings: Settings = raw.try_deserialize()?;
	apply_env_secrets(&mut settings);
	settings.strategy.validate()?;

	Ok(settings)
}

/// Overlay provider credentials from the environment.
///
/// Override order is fixed: a key from the environment always replaces
/// whatever the file carried. The file only controls topology: enable
/// flags, priorities, URLs, timeouts.
pub fn apply_env_secrets(settings: &mut Settings) {
	for (name, provider) in settings.providers.iter_mut() {
		let var = format!(
			"{}{}{}",
			PROVIDER_KEY_PREFIX,
			name.to_uppercase().replace('-', "_"),
			PROVIDER_KEY_SUFFIX
		);

		match std::env::var(&var) {
			Ok(key) if !key.is_empty() => {
				if provider.api_key.is_some() {
					debug!(provider = %name, "environment credential overrides file credential");
				}
				provider.api_key = Some(key);
			},
			_ => {
				if provider.api_key.is_some() {
					warn!(
						provider = %name,
						"using credential from config file; prefer the {} environment variable",
						var
					);
				}
			},
		}
	}
}

/// Convenience wrapper exposing the resolved credential as a
/// [`SecretString`] for a single provider
pub fn provider_secret(settings: &Settings, provider: &str) -> Option<SecretString> {
	settings
		.providers
		.get(provider)
		.and_then(|p| p.api_key.as_deref())
		.filter(|key| !key.is_empty())
		.map(SecretString::from)
}
