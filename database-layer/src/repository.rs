//! Record access layer.
//!
//! `PrescriptionStore` is the only path that writes pharmacists or
//! prescriptions. Handlers hold an `Arc<dyn PrescriptionStore>` and never see
//! the pool directly.

use crate::connection::DatabasePool;
use crate::error::{DatabaseError, DatabaseResult};
use crate::models::{NewPharmacist, NewPrescription, Pharmacist, Prescription, ProfileUpdate};
use async_trait::async_trait;
use tracing::debug;

#[async_trait]
pub trait PrescriptionStore: Send + Sync {
    /// Exact-string lookup, no case folding.
    async fn find_pharmacist_by_email(&self, email: &str) -> DatabaseResult<Option<Pharmacist>>;

    async fn find_pharmacist_by_id(&self, id: i32) -> DatabaseResult<Option<Pharmacist>>;

    /// Returns the generated id, or `DuplicateEmail` when the email is taken.
    async fn insert_pharmacist(&self, pharmacist: &NewPharmacist) -> DatabaseResult<i32>;

    /// Overwrites every mutable field of an already-located pharmacist.
    async fn update_pharmacist(
        &self,
        existing: &Pharmacist,
        update: &ProfileUpdate,
    ) -> DatabaseResult<()>;

    /// Removes a pharmacist and, through the cascade, their prescriptions.
    async fn delete_pharmacist(&self, id: i32) -> DatabaseResult<bool>;

    /// Returns the generated id. `created_at` is stamped at insert time.
    async fn insert_prescription(&self, prescription: &NewPrescription) -> DatabaseResult<i32>;

    /// Prescriptions owned by `pharmacist_id`, in insertion order.
    async fn list_prescriptions_by_pharmacist(
        &self,
        pharmacist_id: i32,
    ) -> DatabaseResult<Vec<Prescription>>;

    async fn find_prescription_by_id(&self, id: i32) -> DatabaseResult<Option<Prescription>>;

    /// `true` when a row was removed, `false` when none matched.
    async fn delete_prescription_by_id(&self, id: i32) -> DatabaseResult<bool>;

    async fn is_healthy(&self) -> bool;
}

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgPrescriptionStore {
    pool: DatabasePool,
}

impl PgPrescriptionStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

const PHARMACIST_COLUMNS: &str =
    "id, email, password_hash, full_name, height, weight, birth_of_date";

const PRESCRIPTION_COLUMNS: &str = "id, image_name, predicted_text, created_at, pharmacist_id";

#[async_trait]
impl PrescriptionStore for PgPrescriptionStore {
    async fn find_pharmacist_by_email(&self, email: &str) -> DatabaseResult<Option<Pharmacist>> {
        let pharmacist = sqlx::query_as::<_, Pharmacist>(&format!(
            "SELECT {PHARMACIST_COLUMNS} FROM pharmacists WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool.pool())
        .await?;

        Ok(pharmacist)
    }

    async fn find_pharmacist_by_id(&self, id: i32) -> DatabaseResult<Option<Pharmacist>> {
        let pharmacist = sqlx::query_as::<_, Pharmacist>(&format!(
            "SELECT {PHARMACIST_COLUMNS} FROM pharmacists WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;

        Ok(pharmacist)
    }

    async fn insert_pharmacist(&self, pharmacist: &NewPharmacist) -> DatabaseResult<i32> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO pharmacists (email, password_hash, full_name, height, weight, birth_of_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&pharmacist.email)
        .bind(&pharmacist.password_hash)
        .bind(&pharmacist.full_name)
        .bind(pharmacist.height)
        .bind(pharmacist.weight)
        .bind(pharmacist.birth_of_date)
        .fetch_one(self.pool.pool())
        .await
        .map_err(DatabaseError::from_write)?;

        debug!(pharmacist_id = id, "Inserted pharmacist");
        Ok(id)
    }

    async fn update_pharmacist(
        &self,
        existing: &Pharmacist,
        update: &ProfileUpdate,
    ) -> DatabaseResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE pharmacists
            SET email = $2, full_name = $3, height = $4, weight = $5, birth_of_date = $6
            WHERE id = $1
            "#,
        )
        .bind(existing.id)
        .bind(&update.email)
        .bind(&update.full_name)
        .bind(update.height)
        .bind(update.weight)
        .bind(update.birth_of_date)
        .execute(self.pool.pool())
        .await
        .map_err(DatabaseError::from_write)?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::QueryFailed(format!(
                "pharmacist {} disappeared before update",
                existing.id
            )));
        }

        Ok(())
    }

    async fn delete_pharmacist(&self, id: i32) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM pharmacists WHERE id = $1")
            .bind(id)
            .execute(self.pool.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_prescription(&self, prescription: &NewPrescription) -> DatabaseResult<i32> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO prescriptions (image_name, predicted_text, created_at, pharmacist_id)
            VALUES ($1, $2, NOW(), $3)
            RETURNING id
            "#,
        )
        .bind(&prescription.image_name)
        .bind(&prescription.predicted_text)
        .bind(prescription.pharmacist_id)
        .fetch_one(self.pool.pool())
        .await?;

        debug!(
            prescription_id = id,
            pharmacist_id = prescription.pharmacist_id,
            "Inserted prescription"
        );
        Ok(id)
    }

    async fn list_prescriptions_by_pharmacist(
        &self,
        pharmacist_id: i32,
    ) -> DatabaseResult<Vec<Prescription>> {
        let prescriptions = sqlx::query_as::<_, Prescription>(&format!(
            "SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions WHERE pharmacist_id = $1 ORDER BY id"
        ))
        .bind(pharmacist_id)
        .fetch_all(self.pool.pool())
        .await?;

        Ok(prescriptions)
    }

    async fn find_prescription_by_id(&self, id: i32) -> DatabaseResult<Option<Prescription>> {
        let prescription = sqlx::query_as::<_, Prescription>(&format!(
            "SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;

        Ok(prescription)
    }

    async fn delete_prescription_by_id(&self, id: i32) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM prescriptions WHERE id = $1")
            .bind(id)
            .execute(self.pool.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn is_healthy(&self) -> bool {
        self.pool.is_healthy().await
    }
}
