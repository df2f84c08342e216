//! Shared state injected into handlers.

use crate::application::services::RateLimiter;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        Self { limiter }
    }
}
