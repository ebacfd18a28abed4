use super::{AppState, BatchSize};
use crate::server::{
    error::Result,
    telemetry::{
        increment_ids_generated, increment_requests, record_ids_per_request,
        record_request_duration,
    },
};
use axum::{Json, extract::State};
use flakebatch::IdSource;
use std::time::Instant;

/// Calls `source` exactly `count` times, in order.
///
/// The first failure aborts the whole batch; a short batch is never
/// returned. This may block while the generator backs off, so async callers
/// must run it off the runtime workers.
///
/// # Errors
///
/// Returns the source's error unchanged.
pub fn issue_batch(source: &dyn IdSource, count: usize) -> flakebatch::Result<Vec<String>> {
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        ids.push(source.try_next_id()?);
    }
    Ok(ids)
}

/// `GET /ids?count=<int>`
///
/// The whole batch is generated on the blocking pool before anything is
/// written, so a backing-off generator never stalls other requests and the
/// status line always reflects the outcome: 200 with a JSON array of exactly
/// `count` strings, or a JSON error body.
#[tracing::instrument(skip_all, fields(count = batch.get()))]
pub async fn list_ids(
    State(state): State<AppState>,
    batch: BatchSize,
) -> Result<Json<Vec<String>>> {
    let start = Instant::now();
    let count = batch.get();

    increment_requests();
    #[allow(clippy::cast_precision_loss)]
    record_ids_per_request(count as f64);

    let source = state.shared_source();
    let ids = tokio::task::spawn_blocking(move || issue_batch(source.as_ref(), count)).await??;

    increment_ids_generated(ids.len() as u64);
    record_request_duration(start.elapsed().as_secs_f64() * 1000.0);
    tracing::debug!(issued = ids.len(), "batch issued");

    Ok(Json(ids))
}
