use crate::server::PrescriptionServer;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`
    pub status: String,
    /// RFC3339
    pub timestamp: String,
    pub version: String,
    pub uptime: u64,
    pub checks: HashMap<String, String>,
}

/// Health check handler
///
/// Answers 503 while the record store is unreachable.
pub async fn health_check(
    State(server): State<PrescriptionServer>,
) -> (StatusCode, Json<HealthResponse>) {
    let store_ok = server.store.is_healthy().await;

    let mut checks = HashMap::new();
    checks.insert(
        "store".to_string(),
        if store_ok { "healthy" } else { "unreachable" }.to_string(),
    );

    let (status_code, status) = if store_ok {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let response = HealthResponse {
        status: status.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: server.uptime_seconds(),
        checks,
    };

    (status_code, Json(response))
}
