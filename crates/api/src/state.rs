use std::sync::Arc;

use dexquote_service::{ProviderRegistry, QuoteOrchestrator};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
	pub orchestrator: Arc<QuoteOrchestrator>,
	pub registry: Arc<ProviderRegistry>,
}
