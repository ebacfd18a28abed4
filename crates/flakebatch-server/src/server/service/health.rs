use axum::{http::header, response::IntoResponse};

pub const HEALTH_BODY: &str = "I'm okay.\n";

/// Liveness probe. Static, never touches the identifier source, never fails.
pub async fn health() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/plain"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        HEALTH_BODY,
    )
}
