//! Dexquote Config
//!
//! Settings structures, file loading and the two-source secret merge:
//! the persisted file controls enable/priority/topology (low trust), the
//! process environment controls credentials (high trust) and always wins
//! on a conflict.

pub mod loader;
pub mod settings;

pub use loader::{load_config, ConfigLoadError};
pub use settings::{
	CacheSettings, EnvironmentProfile, LogFormat, LoggingSettings, ProviderSettings,
	ServerSettings, Settings,
};
