//! HTTP request handlers.

pub mod health;
pub mod upstream;

pub use health::health_handler;
pub use upstream::upstream_handler;
