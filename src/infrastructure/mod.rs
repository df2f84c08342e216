//! Infrastructure layer for external integrations.
//!
//! # Modules
//!
//! - [`store`] - Window counter stores (Redis and in-memory implementations)

pub mod store;
