//! Logged-in client state.
//!
//! A [`ClientSession`] exists from a successful login until logout or token
//! expiry. [`SessionSlot`] holds at most one of them for an application.

use crate::forms::ProfileForm;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock};
use tracing::info;

/// Body of a successful login response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub pharmacist_id: i32,
    pub full_name: String,
    pub email: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ClientSession {
    pub pharmacist_id: i32,
    pub full_name: String,
    pub email: String,
    token: String,
    pub expires_at: DateTime<Utc>,
    profile: Option<ProfileForm>,
}

impl From<LoginData> for ClientSession {
    fn from(data: LoginData) -> Self {
        Self {
            pharmacist_id: data.pharmacist_id,
            full_name: data.full_name,
            email: data.email,
            token: data.token,
            expires_at: data.expires_at,
            profile: None,
        }
    }
}

impl ClientSession {
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Last profile values the user saved or registered with
    pub fn profile(&self) -> Option<&ProfileForm> {
        self.profile.as_ref()
    }

    pub fn cache_profile(&mut self, profile: ProfileForm) {
        self.full_name.clone_from(&profile.full_name);
        self.profile = Some(profile);
    }
}

/// Holder for the current session.
#[derive(Debug, Default)]
pub struct SessionSlot {
    current: RwLock<Option<ClientSession>>,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self, session: ClientSession) {
        info!(pharmacist_id = session.pharmacist_id, "Session started");
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    /// The live session; an expired one is dropped on access.
    pub fn current(&self) -> Option<ClientSession> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if guard.as_ref().is_some_and(ClientSession::is_expired) {
            info!("Session expired");
            *guard = None;
        }
        guard.clone()
    }

    /// Replace the cached profile on the live session.
    pub fn cache_profile(&self, profile: ProfileForm) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(session) = guard.as_mut() {
            session.cache_profile(profile);
        }
    }

    pub fn logout(&self) {
        let previous = self.current.write().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(session) = previous {
            info!(pharmacist_id = session.pharmacist_id, "Logged out");
        }
    }
}
