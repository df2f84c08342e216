//! Application layer: the admission algorithm and its observability hooks.
//!
//! - [`services`] - [`services::RateLimiter`], the fixed-window admission decision
//! - [`diagnostics`] - Pluggable sinks notified at every decision and store failure

pub mod diagnostics;
pub mod services;
