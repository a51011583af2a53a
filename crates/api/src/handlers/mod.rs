pub mod common;
pub mod health;
pub mod quotes;

pub use health::get_health;
pub use quotes::post_quote;
