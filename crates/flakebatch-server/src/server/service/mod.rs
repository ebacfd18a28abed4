//! HTTP routes and the request pipeline around identifier issuance.
//!
//! Every route is wrapped in a [`MethodGuardLayer`], so a request flows
//! through: method guard, `count` validation ([`BatchSize`]), batch issuance
//! ([`ids::list_ids`]), response encoding.
//!
//! ## Structure
//!
//! - [`guard`] - Rejects unexpected HTTP methods with a JSON 405.
//! - [`count`] - Parses and bounds-checks the `count` query parameter.
//! - [`ids`] - Issues the batch of identifiers.
//! - [`health`] - Static liveness probe.

pub mod count;
pub mod guard;
pub mod health;
pub mod ids;

pub use count::BatchSize;
pub use guard::MethodGuardLayer;

use axum::{Router, http::Method, routing::any};
use flakebatch::IdSource;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// State shared by every request.
///
/// Holds the single identifier source constructed at startup. Cloning is
/// cheap and never creates a new source.
#[derive(Clone)]
pub struct AppState {
    source: Arc<dyn IdSource>,
    max_count: usize,
}

impl AppState {
    pub fn new(source: Arc<dyn IdSource>, max_count: usize) -> Self {
        Self { source, max_count }
    }

    /// A new handle to the same source, for work moved off the request task.
    pub fn shared_source(&self) -> Arc<dyn IdSource> {
        Arc::clone(&self.source)
    }

    pub const fn max_count(&self) -> usize {
        self.max_count
    }
}

/// Builds the service router.
///
/// Routes accept any method at the routing layer; the method guard decides,
/// so non-GET requests get the JSON error body instead of axum's empty 405.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/ids",
            any(ids::list_ids).layer(MethodGuardLayer::new(Method::GET)),
        )
        .route(
            "/health",
            any(health::health).layer(MethodGuardLayer::new(Method::GET)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
