//! Domain layer: client identity and window accounting primitives.
//!
//! Nothing here performs I/O. The counter protocol that uses these types lives
//! in [`crate::application::services::RateLimiter`], the store behind it in
//! [`crate::infrastructure::store`].
//!
//! - [`client_addr`] - Client identity resolution from proxy headers
//! - [`window`] - Window keys, decisions and store failure policy

pub mod client_addr;
pub mod window;

pub use client_addr::{CF_CONNECTING_IP, X_FORWARDED_FOR, X_REQUEST_ID, client_addr, request_id};
pub use window::{DEFAULT_KEY_PREFIX, Decision, FailurePolicy, WindowKey};
