use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::state::AppState;
use dexquote_cache::{CacheStats, ResponseCache};

/// Per-provider view on the health surface
#[derive(Debug, Serialize)]
pub struct ProviderHealth {
	pub name: String,
	pub enabled: bool,
	pub degraded: bool,
	pub weight: f64,
	pub success_rate: f64,
	pub avg_response_time_ms: f64,
	pub total_requests: u64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: String,
	pub providers: Vec<ProviderHealth>,
	pub cache: CacheStats,
}

/// GET /health - provider metrics and cache counters
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
	let providers = state
		.registry
		.all_providers()
		.into_iter()
		.map(|p| {
			let metrics = state.registry.metrics_for(&p.name).unwrap_or_default();
			ProviderHealth {
				degraded: p.is_degraded(),
				name: p.name,
				enabled: p.enabled,
				weight: p.weight,
				success_rate: metrics.success_rate,
				avg_response_time_ms: metrics.avg_response_time_ms,
				total_requests: metrics.total_requests,
			}
		})
		.collect();

	let cache = state.orchestrator.cache().stats().await;

	Json(HealthResponse {
		status: "ok".to_string(),
		providers,
		cache,
	})
}
