//! Session extraction.
//!
//! Protected handlers take an [`AuthContext`] argument; axum runs this
//! extractor before the handler body and rejects the request with 401 when
//! the bearer token is missing, malformed, forged or expired.

use crate::error::ApiError;
use crate::server::PrescriptionServer;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};

/// Identity of the caller, taken from a verified session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub pharmacist_id: i32,
    pub email: String,
}

impl AuthContext {
    /// Reject requests that act on another pharmacist's records.
    pub fn ensure_owner(&self, pharmacist_id: i32) -> Result<(), ApiError> {
        if self.pharmacist_id == pharmacist_id {
            Ok(())
        } else {
            Err(ApiError::authorization("Access denied."))
        }
    }
}

/// Extract the bearer token from the Authorization header
fn extract_token(parts: &Parts) -> Result<&str, ApiError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::authentication("Missing Authorization header"))?;

    auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::authentication("Invalid Authorization header format. Expected: Bearer <token>")
    })
}

#[async_trait]
impl FromRequestParts<PrescriptionServer> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &PrescriptionServer,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)?;
        let claims = state.tokens.verify(token)?;

        Ok(Self {
            pharmacist_id: claims.pharmacist_id()?,
            email: claims.email,
        })
    }
}
