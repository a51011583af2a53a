//! Error-to-status mapping shared by handlers

use axum::http::StatusCode;
use axum::response::Json;

use dexquote_types::{AggregationError, ApiResponse, QuoteData};

/// Map an aggregation failure to its HTTP status and error envelope
pub fn error_response(error: &AggregationError) -> (StatusCode, Json<ApiResponse<QuoteData>>) {
	let status = match error {
		AggregationError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
		AggregationError::InsufficientProviders { .. } => StatusCode::SERVICE_UNAVAILABLE,
		AggregationError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
	};

	(
		status,
		Json(ApiResponse::err(error.code(), error.to_string())),
	)
}
