//! Prescription Desk client
//!
//! Everything a front end needs to talk to the prescription server:
//! - form models with the same validation rules the web pages enforce
//! - a multi-step registration wizard
//! - a session object that lives from login to logout
//! - an HTTP client for the server's endpoints
//! - a local SQLite store for offline notes
//!
//! # Example
//!
//! ```rust,no_run
//! use client_forms::{ClientConfig, LoginForm, PrescriptionClient};
//!
//! # async fn run() -> Result<(), client_forms::ClientError> {
//! let client = PrescriptionClient::new(&ClientConfig::default())?;
//! let session = client
//!     .login(&LoginForm {
//!         email: "nora@rx.test".to_string(),
//!         password: "longenough".to_string(),
//!         user_type: "pharmacist".to_string(),
//!         remember_me: false,
//!     })
//!     .await?;
//!
//! for entry in client.list_prescriptions(&session).await? {
//!     println!("{}: {}", entry.image_name, entry.predicted_text);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod forms;
pub mod offline;
pub mod session;

pub use client::{PrescriptionClient, PrescriptionEntry};
pub use config::{is_known_medication, ocr_frame_url, ClientConfig, MEDICATION_OPTIONS};
pub use error::{ClientError, ClientResult};
pub use forms::{
    check, FieldErrors, LoginForm, ProfileForm, RegisterForm, RegistrationWizard, WizardStep,
};
pub use offline::{OfflinePrescription, OfflinePrescriptionStore, StoredOfflinePrescription};
pub use session::{ClientSession, LoginData, SessionSlot};
