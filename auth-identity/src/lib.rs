//! Pharmacist credentials and sessions for Prescription Desk
//!
//! This module provides:
//! - Argon2id password hashing and verification
//! - Signed, expiring session tokens issued at login
//!
//! # Example
//!
//! ```rust
//! use auth_identity::{IdentityConfig, PasswordHasher, TokenService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let hasher = PasswordHasher::new();
//!     let hash = hasher.hash("password123").await?;
//!     assert!(hasher.verify("password123", &hash).await?);
//!
//!     let tokens = TokenService::new(&IdentityConfig::default());
//!     let issued = tokens.issue(1, "user@example.com")?;
//!     let claims = tokens.verify(&issued.token)?;
//!     assert_eq!(claims.pharmacist_id()?, 1);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod password;
pub mod tokens;

pub use config::*;
pub use error::*;
pub use password::PasswordHasher;
pub use tokens::*;
