//! Dexquote Adapters
//!
//! Provider-specific adapters that translate a swap quote request into
//! one upstream HTTP call and normalize the response. Each adapter owns
//! a pooled [`reqwest::Client`] built once at construction; per-call
//! timeouts come from the provider runtime config.

use std::collections::HashMap;
use std::sync::Arc;

use dexquote_types::ProviderAdapter;

pub mod oneinch;
pub mod util;
pub mod zeroex;

pub use oneinch::OneInchAdapter;
pub use zeroex::ZeroExAdapter;

/// Registry of adapter implementations keyed by adapter id
///
/// Providers reference adapters by id from configuration; the registry
/// resolves that id to a shared implementation at startup. Adapters are
/// stateless between calls, so one instance serves any number of
/// providers.
pub struct AdapterRegistry {
	adapters: HashMap<String, Arc<dyn ProviderAdapter>>,
}

impl AdapterRegistry {
	pub fn new() -> Self {
		Self {
			adapters: HashMap::new(),
		}
	}

	/// Registry preloaded with the built-in adapters
	pub fn with_defaults() -> Self {
		let mut registry = Self::new();
		registry.register(Arc::new(ZeroExAdapter::new()));
		registry.register(Arc::new(OneInchAdapter::new()));
		registry
	}

	/// Register an adapter under its own id, replacing any previous
	/// registration for that id
	pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) {
		self.adapters.insert(adapter.id().to_string(), adapter);
	}

	pub fn get(&self, adapter_id: &str) -> Option<Arc<dyn ProviderAdapter>> {
		self.adapters.get(adapter_id).cloned()
	}

	pub fn ids(&self) -> Vec<&str> {
		self.adapters.keys().map(String::as_str).collect()
	}

	pub fn len(&self) -> usize {
		self.adapters.len()
	}

	pub fn is_empty(&self) -> bool {
		self.adapters.is_empty()
	}
}

impl Default for AdapterRegistry {
	fn default() -> Self {
		Self::with_defaults()
	}
}
