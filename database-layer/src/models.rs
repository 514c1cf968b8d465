//! Row types for the `pharmacists` and `prescriptions` tables.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered pharmacist.
///
/// `password_hash` holds an Argon2 PHC string, never the raw password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Pharmacist {
    pub id: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub height: Decimal,
    pub weight: Decimal,
    pub birth_of_date: NaiveDate,
}

/// Values for a pharmacist row that does not exist yet.
#[derive(Debug, Clone)]
pub struct NewPharmacist {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub height: Decimal,
    pub weight: Decimal,
    pub birth_of_date: NaiveDate,
}

/// Mutable profile fields. Every field is overwritten on update.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub email: String,
    pub full_name: String,
    pub height: Decimal,
    pub weight: Decimal,
    pub birth_of_date: NaiveDate,
}

impl ProfileUpdate {
    pub(crate) fn apply_to(&self, pharmacist: &mut Pharmacist) {
        pharmacist.email.clone_from(&self.email);
        pharmacist.full_name.clone_from(&self.full_name);
        pharmacist.height = self.height;
        pharmacist.weight = self.weight;
        pharmacist.birth_of_date = self.birth_of_date;
    }
}

/// One uploaded prescription image and the text predicted for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Prescription {
    pub id: i32,
    /// Image reference, in practice a base64 payload or generated file name.
    pub image_name: String,
    pub predicted_text: String,
    pub created_at: DateTime<Utc>,
    pub pharmacist_id: i32,
}

/// Values for a prescription row. `created_at` is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewPrescription {
    pub image_name: String,
    pub predicted_text: String,
    pub pharmacist_id: i32,
}
