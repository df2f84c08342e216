//! HTTP layer: the rate limiting middleware and the routes it guards.
//!
//! # Modules
//!
//! - [`dto`] - Response bodies
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Rate limiting and request tracing middleware
//! - [`routes`] - Routes placed behind the limiter

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
