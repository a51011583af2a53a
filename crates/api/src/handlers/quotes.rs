use axum::{extract::State, http::StatusCode, response::Json};
use tracing::info;

use crate::handlers::common::error_response;
use crate::state::AppState;
use dexquote_types::{ApiResponse, QuoteData, SwapQuoteRequest};

/// POST /quote - aggregate and return the best swap quote
pub async fn post_quote(
	State(state): State<AppState>,
	Json(request): Json<SwapQuoteRequest>,
) -> Result<Json<ApiResponse<QuoteData>>, (StatusCode, Json<ApiResponse<QuoteData>>)> {
	info!(
		request_id = %request.request_id,
		chain_id = request.chain_id,
		from = %request.from_token,
		to = %request.to_token,
		"received quote request"
	);

	match state.orchestrator.get_quote(request).await {
		Ok(quote) => Ok(Json(ApiResponse::ok(QuoteData::from(&quote)))),
		Err(error) => Err(error_response(&error)),
	}
}
