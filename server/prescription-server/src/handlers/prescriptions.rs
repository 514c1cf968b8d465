use super::ApiJson;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthContext;
use crate::server::PrescriptionServer;
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use database_layer::{NewPrescription, Prescription};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Add Prescription Request
///
/// The OCR uploader posts PascalCase keys, the web client camelCase.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddPrescriptionRequest {
    #[serde(alias = "ImageName")]
    #[validate(length(min = 1))]
    pub image_name: String,
    #[serde(alias = "PredictedText", default)]
    pub predicted_text: String,
    /// Defaults to the caller; naming anyone else is refused.
    #[serde(alias = "PharmacistId", default)]
    pub pharmacist_id: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// Prescription as listed to its owner
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionDto {
    pub id: i32,
    pub image_name: String,
    pub predicted_text: String,
    pub created_at: DateTime<Utc>,
}

impl From<Prescription> for PrescriptionDto {
    fn from(p: Prescription) -> Self {
        Self {
            id: p.id,
            image_name: p.image_name,
            predicted_text: p.predicted_text,
            created_at: p.created_at,
        }
    }
}

/// A bare array when there are rows, an explanatory object when there are none.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PrescriptionListResponse {
    Found(Vec<PrescriptionDto>),
    Empty {
        message: String,
        prescriptions: Vec<PrescriptionDto>,
    },
}

// ============================================================================
// HANDLERS
// ============================================================================

/// `POST /api/Handler/AddPrescription`
pub async fn add_prescription(
    State(server): State<PrescriptionServer>,
    auth: AuthContext,
    ApiJson(req): ApiJson<AddPrescriptionRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate()?;

    let pharmacist_id = req.pharmacist_id.unwrap_or(auth.pharmacist_id);
    auth.ensure_owner(pharmacist_id)?;

    if server.store.find_pharmacist_by_id(pharmacist_id).await?.is_none() {
        return Err(ApiError::not_found(format!(
            "Pharmacist with ID {pharmacist_id} not found."
        )));
    }

    let id = server
        .store
        .insert_prescription(&NewPrescription {
            image_name: req.image_name,
            predicted_text: req.predicted_text,
            pharmacist_id,
        })
        .await?;

    info!(prescription_id = id, pharmacist_id, "Saved prescription");

    Ok(MessageResponse::new("Prescription saved successfully!"))
}

/// `GET /api/Handler/GetPrescriptions/{pharmacistId}`
pub async fn get_prescriptions(
    State(server): State<PrescriptionServer>,
    auth: AuthContext,
    Path(pharmacist_id): Path<i32>,
) -> ApiResult<Json<PrescriptionListResponse>> {
    auth.ensure_owner(pharmacist_id)?;

    let prescriptions = server
        .store
        .list_prescriptions_by_pharmacist(pharmacist_id)
        .await?;

    if prescriptions.is_empty() {
        return Ok(Json(PrescriptionListResponse::Empty {
            message: "No prescriptions found for this pharmacist.".to_string(),
            prescriptions: Vec::new(),
        }));
    }

    Ok(Json(PrescriptionListResponse::Found(
        prescriptions.into_iter().map(PrescriptionDto::from).collect(),
    )))
}

/// `DELETE /api/Handler/DeletePrescription/{id}`
///
/// Someone else's prescription looks exactly like a missing one.
pub async fn delete_prescription(
    State(server): State<PrescriptionServer>,
    auth: AuthContext,
    Path(id): Path<i32>,
) -> ApiResult<Json<MessageResponse>> {
    let not_found = || ApiError::not_found("Prescription not found.");

    let prescription = server
        .store
        .find_prescription_by_id(id)
        .await?
        .filter(|p| p.pharmacist_id == auth.pharmacist_id)
        .ok_or_else(not_found)?;

    if !server.store.delete_prescription_by_id(prescription.id).await? {
        return Err(not_found());
    }

    info!(prescription_id = id, pharmacist_id = auth.pharmacist_id, "Deleted prescription");

    Ok(MessageResponse::new("Prescription deleted successfully!"))
}
