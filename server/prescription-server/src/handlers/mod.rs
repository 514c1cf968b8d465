pub mod health;
pub mod pharmacists;
pub mod prescriptions;

use crate::error::ApiError;
use axum::extract::FromRequest;

/// JSON body extractor whose rejections are plain-text 400s like every other
/// client error.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
