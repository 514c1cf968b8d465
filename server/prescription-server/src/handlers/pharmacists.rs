use super::ApiJson;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthContext;
use crate::server::PrescriptionServer;
use crate::utils::{dates::deserialize_calendar_date, mask_email};
use axum::{extract::State, Json};
use chrono::{DateTime, NaiveDate, Utc};
use database_layer::{DatabaseError, NewPharmacist, ProfileUpdate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

const EMAIL_TAKEN: &str = "this is email already exist";
const PROFILE_NOT_FOUND: &str = "You can not change email or this is information missing ";

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Register Pharmacist Request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPharmacistRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(length(min = 1))]
    pub full_name: String,
    #[serde(alias = "hight")]
    pub height: Decimal,
    pub weight: Decimal,
    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub birth_of_date: NaiveDate,
}

/// Login Request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login Response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub pharmacist_id: i32,
    pub full_name: String,
    pub email: String,
    /// Bearer token for every later call
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Update Profile Request
///
/// `email` locates the account and is written back unchanged.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub full_name: String,
    #[serde(alias = "hight")]
    pub height: Decimal,
    pub weight: Decimal,
    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub birth_of_date: NaiveDate,
}

// ============================================================================
// HANDLERS
// ============================================================================

/// `POST /RegisterPharmacist`
pub async fn register_pharmacist(
    State(server): State<PrescriptionServer>,
    ApiJson(req): ApiJson<RegisterPharmacistRequest>,
) -> ApiResult<String> {
    req.validate()?;

    // Fast path; the unique index below is what actually guarantees it.
    if server.store.find_pharmacist_by_email(&req.email).await?.is_some() {
        return Err(ApiError::bad_request(EMAIL_TAKEN));
    }

    let password_hash = server.passwords.hash(&req.password).await?;
    let pharmacist = NewPharmacist {
        email: req.email,
        password_hash,
        full_name: req.full_name,
        height: req.height,
        weight: req.weight,
        birth_of_date: req.birth_of_date,
    };

    let pharmacist_id = match server.store.insert_pharmacist(&pharmacist).await {
        Ok(id) => id,
        Err(DatabaseError::DuplicateEmail) => return Err(ApiError::bad_request(EMAIL_TAKEN)),
        Err(e) => return Err(e.into()),
    };

    info!(
        pharmacist_id,
        email = %mask_email(&pharmacist.email),
        "Registered pharmacist"
    );

    Ok("Add new Pharmacist successfully".to_string())
}

/// `POST /api/Handler/LoginPharmacist`
pub async fn login_pharmacist(
    State(server): State<PrescriptionServer>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let invalid = || ApiError::bad_request("Invalid email or password.");

    let Some(pharmacist) = server.store.find_pharmacist_by_email(&req.email).await? else {
        server.passwords.verify_unknown(&req.password).await?;
        info!(email = %mask_email(&req.email), "Rejected login for unknown email");
        return Err(invalid());
    };

    if !server.passwords.verify(&req.password, &pharmacist.password_hash).await? {
        info!(email = %mask_email(&req.email), "Rejected login");
        return Err(invalid());
    }

    let issued = server.tokens.issue(pharmacist.id, &pharmacist.email)?;
    info!(pharmacist_id = pharmacist.id, "Pharmacist logged in");

    Ok(Json(LoginResponse {
        pharmacist_id: pharmacist.id,
        full_name: pharmacist.full_name,
        email: pharmacist.email,
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}

/// `PUT /UpdateProfile`
pub async fn update_profile(
    State(server): State<PrescriptionServer>,
    auth: AuthContext,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> ApiResult<String> {
    req.validate().map_err(|_| ApiError::bad_request(PROFILE_NOT_FOUND))?;

    let existing = server
        .store
        .find_pharmacist_by_email(&req.email)
        .await?
        .ok_or_else(|| ApiError::bad_request(PROFILE_NOT_FOUND))?;

    auth.ensure_owner(existing.id)?;

    let update = ProfileUpdate {
        email: req.email,
        full_name: req.full_name,
        height: req.height,
        weight: req.weight,
        birth_of_date: req.birth_of_date,
    };
    server.store.update_pharmacist(&existing, &update).await?;

    info!(pharmacist_id = existing.id, "Updated pharmacist profile");

    Ok("Update new Pharmacist successfully".to_string())
}
