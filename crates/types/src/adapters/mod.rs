//! Adapter trait and metadata

pub mod traits;

pub use traits::{AdapterInfo, ProviderAdapter};
