//! Dexquote Types
//!
//! Domain models, errors and the adapter trait for the dexquote
//! aggregation engine. Every other crate in the workspace builds on these.

pub mod adapters;
pub mod models;
pub mod providers;
pub mod quotes;
pub mod strategy;

// Re-export external dependencies used in public signatures
pub use chrono;
pub use serde_json;

pub use adapters::{AdapterInfo, ProviderAdapter};
pub use models::{SecretString, U256};
pub use providers::{
	AdapterError, AdapterResult, ProviderConfig, ProviderMetrics, ProviderRuntimeConfig,
};
pub use quotes::{
	AggregatedQuote, AggregationError, AggregationMetadata, AggregationResult, ApiResponse,
	ErrorBody, ProviderQuote, QuoteData, QuoteValidationError, SwapQuoteRequest,
};
pub use strategy::{AggregationStrategy, StrategyError};
