//! Diagnostic sinks for the rate limiter.
//!
//! The limiter runs one algorithm and reports what happened to a
//! [`Diagnostics`] implementation. Sinks observe; they never change the
//! decision.
//!
//! - [`SilentDiagnostics`] - Discards everything
//! - [`TracingDiagnostics`] - Structured `tracing` events plus `metrics` counters

mod logging;
mod silent;

pub use logging::TracingDiagnostics;
pub use silent::SilentDiagnostics;

use crate::domain::WindowKey;
use crate::infrastructure::store::StoreError;
use std::fmt;

/// Per-request data attached to every diagnostic event.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    pub key: &'a WindowKey,
    /// Inbound `X-Request-Id`, if the client or proxy sent one.
    pub request_id: Option<&'a str>,
}

/// Which store round trip failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStage {
    /// Reading the current window count.
    Read,
    /// The increment / expire batch.
    Write,
}

impl StoreStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

impl fmt::Display for StoreStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives notifications from [`crate::application::services::RateLimiter`].
pub trait Diagnostics: Send + Sync {
    /// No client identity could be derived; the request is admitted unlimited.
    fn unresolved(&self, request_id: Option<&str>);

    /// The request was admitted and counted. `count` is the window count the
    /// request observed before its own increment.
    fn admitted(&self, ctx: &RequestContext<'_>, count: u64);

    /// The window is full and the request was rejected.
    fn rejected(&self, ctx: &RequestContext<'_>, count: u64);

    /// A store call failed or timed out.
    fn store_error(&self, ctx: &RequestContext<'_>, stage: StoreStage, error: &StoreError);
}
