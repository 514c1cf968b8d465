//! Persistence for Prescription Desk.
//!
//! Two tables, `pharmacists` and `prescriptions`, linked one-to-many by the
//! generated pharmacist id. The schema lives in `migrations/` and is applied
//! with [`DatabasePool::migrate`].
//!
//! All reads and writes go through the [`PrescriptionStore`] trait:
//!
//! - [`PgPrescriptionStore`] talks to Postgres through `sqlx`.
//! - [`InMemoryPrescriptionStore`] keeps rows in `DashMap`s with the same
//!   id, uniqueness and cascade rules, for tests and database-less runs.
//!
//! Email uniqueness is enforced by the store itself (a unique index in
//! Postgres), so two concurrent registrations with the same email cannot
//! both succeed.
//!
//! # Example
//!
//! ```rust,no_run
//! use database_layer::{DatabasePool, PgPrescriptionStore, PrescriptionStore};
//!
//! # async fn run() -> Result<(), database_layer::DatabaseError> {
//! let pool = DatabasePool::new("postgresql://localhost/prescriptions", 10).await?;
//! pool.migrate().await?;
//!
//! let store = PgPrescriptionStore::new(pool);
//! let owned = store.list_prescriptions_by_pharmacist(7).await?;
//! println!("{} prescriptions", owned.len());
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod error;
pub mod memory;
pub mod models;
pub mod repository;

pub use connection::DatabasePool;
pub use error::{DatabaseError, DatabaseResult};
pub use memory::InMemoryPrescriptionStore;
pub use models::*;
pub use repository::{PgPrescriptionStore, PrescriptionStore};
