//! Shared value types

pub mod secret_string;
pub mod u256;

pub use secret_string::SecretString;
pub use u256::U256;
