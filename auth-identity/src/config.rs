use secrecy::SecretString;
use serde::Deserialize;

/// Placeholder signing secret; the server warns when it is still in use.
pub const DEFAULT_JWT_SECRET: &str = "change-me-before-deploying";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// HMAC key for session tokens
    pub jwt_secret: SecretString,
    /// Session token lifetime
    pub token_ttl_minutes: i64,
    /// `iss` claim written into and required on every token
    pub issuer: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: SecretString::new(DEFAULT_JWT_SECRET.to_string()),
            token_ttl_minutes: 8 * 60,
            issuer: "prescription-desk".to_string(),
        }
    }
}
