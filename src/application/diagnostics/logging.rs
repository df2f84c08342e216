//! `tracing`-based diagnostic sink.

use super::{Diagnostics, RequestContext, StoreStage};
use crate::infrastructure::store::StoreError;
use metrics::counter;
use tracing::{debug, error, warn};

/// Emits a structured event for every limiter outcome.
///
/// Events carry the window `key` and the inbound `request_id` (empty when
/// absent). Store failures are logged at `ERROR`, rejections at `WARN`,
/// admissions at `DEBUG`.
///
/// # Metrics
///
/// - `httprate_decisions_total{outcome="admitted|rejected|unresolved"}`
/// - `httprate_store_errors_total{stage="read|write"}`
///
/// Counters are no-ops unless the binary installs a `metrics` recorder.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn unresolved(&self, request_id: Option<&str>) {
        warn!(
            request_id = request_id.unwrap_or_default(),
            "Failed to extract client IP"
        );
        counter!("httprate_decisions_total", "outcome" => "unresolved").increment(1);
    }

    fn admitted(&self, ctx: &RequestContext<'_>, count: u64) {
        debug!(
            request_id = ctx.request_id.unwrap_or_default(),
            key = %ctx.key,
            count,
            "Request admitted"
        );
        counter!("httprate_decisions_total", "outcome" => "admitted").increment(1);
    }

    fn rejected(&self, ctx: &RequestContext<'_>, count: u64) {
        warn!(
            request_id = ctx.request_id.unwrap_or_default(),
            key = %ctx.key,
            count,
            "Rate limit exceeded"
        );
        counter!("httprate_decisions_total", "outcome" => "rejected").increment(1);
    }

    fn store_error(&self, ctx: &RequestContext<'_>, stage: StoreStage, error: &StoreError) {
        match stage {
            StoreStage::Read => error!(
                request_id = ctx.request_id.unwrap_or_default(),
                key = %ctx.key,
                error = %error,
                "Failed to read window count"
            ),
            StoreStage::Write => error!(
                request_id = ctx.request_id.unwrap_or_default(),
                key = %ctx.key,
                error = %error,
                "Failed to record window hit"
            ),
        }
        counter!("httprate_store_errors_total", "stage" => stage.as_str()).increment(1);
    }
}
