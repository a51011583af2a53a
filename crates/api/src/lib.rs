//! Dexquote API
//!
//! Axum router, handlers and shared state for the quote and health
//! endpoints.

pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
