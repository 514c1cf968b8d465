//! Prescription Desk server
//!
//! HTTP API for pharmacist accounts and the prescriptions their OCR uploads
//! produce. Records live behind [`database_layer::PrescriptionStore`];
//! sessions are bearer tokens from [`auth_identity::TokenService`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod telemetry;
pub mod utils;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use server::PrescriptionServer;

use axum::{middleware::from_fn, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the main application router with all routes and middleware
pub fn create_app(server: PrescriptionServer) -> Router {
    routes::create_routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::create_cors_layer())
                .layer(from_fn(middleware::request_timing_middleware)),
        )
        .with_state(server)
}
