pub mod auth_context;

pub use auth_context::AuthContext;

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tower_http::cors::{AllowHeaders, Any, CorsLayer};

/// Any origin, method and header. Browser clients are served from other
/// ports than the API.
///
/// Requested headers are echoed back rather than answered with `*`, which
/// browsers never apply to `Authorization`.
pub fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(AllowHeaders::mirror_request())
}

/// Request timing middleware
pub async fn request_timing_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let elapsed = start.elapsed();

    tracing::info!(
        method = %method,
        uri = %uri,
        duration_ms = elapsed.as_millis(),
        status = response.status().as_u16(),
        "Request processed"
    );

    response
}
