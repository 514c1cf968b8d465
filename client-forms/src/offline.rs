//! Local offline prescription notes.
//!
//! A small SQLite table of `{name, dosage, frequency}` entries kept on the
//! device. It is independent of the server's prescriptions and is never
//! synchronized.

use crate::config::is_known_medication;
use crate::error::{ClientError, ClientResult};
use crate::forms::check;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::str::FromStr;
use tracing::debug;
use validator::{Validate, ValidationError};

fn validate_medication(name: &str) -> Result<(), ValidationError> {
    if is_known_medication(name) {
        Ok(())
    } else {
        let mut err = ValidationError::new("name");
        err.message = Some("Please select a medication from the list".into());
        Err(err)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct OfflinePrescription {
    /// One of [`MEDICATION_OPTIONS`](crate::config::MEDICATION_OPTIONS)
    #[validate(custom(function = "validate_medication"))]
    pub name: String,
    pub dosage: String,
    pub frequency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct StoredOfflinePrescription {
    pub id: i64,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
}

pub struct OfflinePrescriptionStore {
    pool: SqlitePool,
}

impl OfflinePrescriptionStore {
    /// Open (creating if needed) the store at `url`, e.g. `sqlite:notes.db`.
    pub async fn open(url: &str) -> ClientResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        // Every connection to `:memory:` is its own database, so keep one.
        let in_memory = url.contains(":memory:");
        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS offline_prescriptions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                dosage TEXT NOT NULL,
                frequency TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    pub async fn in_memory() -> ClientResult<Self> {
        Self::open("sqlite::memory:").await
    }

    /// Store an entry and return its generated id. Names outside the
    /// medication list are rejected before touching the database.
    pub async fn add(&self, prescription: &OfflinePrescription) -> ClientResult<i64> {
        check(prescription).map_err(ClientError::Validation)?;

        let result = sqlx::query(
            "INSERT INTO offline_prescriptions (name, dosage, frequency) VALUES (?, ?, ?)",
        )
        .bind(&prescription.name)
        .bind(&prescription.dosage)
        .bind(&prescription.frequency)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, "Saved offline prescription");
        Ok(id)
    }

    pub async fn list(&self) -> ClientResult<Vec<StoredOfflinePrescription>> {
        let rows = sqlx::query_as::<_, StoredOfflinePrescription>(
            "SELECT id, name, dosage, frequency FROM offline_prescriptions ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> OfflinePrescription {
        OfflinePrescription {
            name: name.to_string(),
            dosage: "500mg".to_string(),
            frequency: "twice daily".to_string(),
        }
    }

    #[tokio::test]
    async fn test_ids_increase_and_list_is_ordered() {
        let store = OfflinePrescriptionStore::in_memory().await.unwrap();

        let first = store.add(&entry("Amoxicillin")).await.unwrap();
        let second = store.add(&entry("Ibuprofen")).await.unwrap();
        assert!(second > first);

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, first);
        assert_eq!(listed[0].name, "Amoxicillin");
        assert_eq!(listed[1].name, "Ibuprofen");
        assert_eq!(listed[1].frequency, "twice daily");
    }

    #[tokio::test]
    async fn test_unknown_medication_is_rejected() {
        let store = OfflinePrescriptionStore::in_memory().await.unwrap();

        let err = store.add(&entry("Snake oil")).await.unwrap_err();
        match err {
            ClientError::Validation(errors) => assert_eq!(
                errors.messages("name"),
                ["Please select a medication from the list"]
            ),
            other => panic!("expected a validation error, got {other:?}"),
        }
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let store = OfflinePrescriptionStore::in_memory().await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }
}
