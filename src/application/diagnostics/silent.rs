//! No-op diagnostic sink.

use super::{Diagnostics, RequestContext, StoreStage};
use crate::infrastructure::store::StoreError;

/// Diagnostic sink that reports nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentDiagnostics;

impl Diagnostics for SilentDiagnostics {
    fn unresolved(&self, _request_id: Option<&str>) {}

    fn admitted(&self, _ctx: &RequestContext<'_>, _count: u64) {}

    fn rejected(&self, _ctx: &RequestContext<'_>, _count: u64) {}

    fn store_error(&self, _ctx: &RequestContext<'_>, _stage: StoreStage, _error: &StoreError) {}
}
