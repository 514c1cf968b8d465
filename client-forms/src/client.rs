//! HTTP client for the prescription server.
//!
//! Every call is a single request with no retry. Non-2xx answers become
//! [`ClientError::Api`] carrying the server's plain-text message.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::forms::{check, LoginForm, ProfileForm, RegisterForm};
use crate::session::{ClientSession, LoginData};
use chrono::{DateTime, Utc};
use reqwest::{RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

/// A prescription as listed by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionEntry {
    pub id: i32,
    pub image_name: String,
    pub predicted_text: String,
    pub created_at: DateTime<Utc>,
}

/// The list endpoint answers a bare array, or an object with a message when
/// there is nothing to show.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListBody {
    Entries(Vec<PrescriptionEntry>),
    Empty {
        #[allow(dead_code)]
        message: String,
        prescriptions: Vec<PrescriptionEntry>,
    },
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

pub struct PrescriptionClient {
    http: reqwest::Client,
    base_url: String,
}

impl PrescriptionClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(
        &self,
        builder: RequestBuilder,
        session: &ClientSession,
    ) -> ClientResult<RequestBuilder> {
        if session.is_expired() {
            return Err(ClientError::SessionExpired);
        }
        Ok(builder.bearer_auth(session.token()))
    }

    /// Send and turn non-2xx answers into [`ClientError::Api`].
    async fn send(builder: RequestBuilder) -> ClientResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), %message, "Request rejected by server");
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Create an account. Returns the server's confirmation text.
    pub async fn register(&self, form: &RegisterForm) -> ClientResult<String> {
        check(form).map_err(ClientError::Validation)?;

        let body = json!({
            "email": form.email,
            "password": form.password,
            "fullName": form.full_name,
            "height": form.height.trim(),
            "weight": form.weight.trim(),
            "birthOfDate": form.dob,
        });
        let builder = self.http.post(self.url("/RegisterPharmacist")).json(&body);
        let response = Self::send(builder).await?;
        Ok(response.text().await?)
    }

    pub async fn login(&self, form: &LoginForm) -> ClientResult<ClientSession> {
        check(form).map_err(ClientError::Validation)?;

        let response = Self::send(
            self.http
                .post(self.url("/api/Handler/LoginPharmacist"))
                .json(&json!({ "email": form.email, "password": form.password })),
        )
        .await?;

        let data: LoginData = response.json().await?;
        debug!(pharmacist_id = data.pharmacist_id, "Logged in");
        Ok(ClientSession::from(data))
    }

    /// File an OCR result under the session's pharmacist.
    pub async fn add_prescription(
        &self,
        session: &ClientSession,
        image_name: &str,
        predicted_text: &str,
    ) -> ClientResult<String> {
        let body = json!({
            "imageName": image_name,
            "predictedText": predicted_text,
            "pharmacistId": session.pharmacist_id,
        });
        let url = self.url("/api/Handler/AddPrescription");
        let builder = self.authorized(self.http.post(url), session)?;
        let response = Self::send(builder.json(&body)).await?;
        let body: MessageBody = response.json().await?;
        Ok(body.message)
    }

    /// The session's prescriptions; empty when there are none.
    pub async fn list_prescriptions(
        &self,
        session: &ClientSession,
    ) -> ClientResult<Vec<PrescriptionEntry>> {
        let path = format!("/api/Handler/GetPrescriptions/{}", session.pharmacist_id);
        let builder = self.authorized(self.http.get(self.url(&path)), session)?;
        let response = Self::send(builder).await?;

        Ok(match response.json::<ListBody>().await? {
            ListBody::Entries(entries) => entries,
            ListBody::Empty { prescriptions, .. } => prescriptions,
        })
    }

    pub async fn delete_prescription(
        &self,
        session: &ClientSession,
        id: i32,
    ) -> ClientResult<String> {
        let path = format!("/api/Handler/DeletePrescription/{id}");
        let builder = self.authorized(self.http.delete(self.url(&path)), session)?;
        let response = Self::send(builder).await?;
        let body: MessageBody = response.json().await?;
        Ok(body.message)
    }

    /// Save profile changes and cache them on the session.
    pub async fn update_profile(
        &self,
        session: &mut ClientSession,
        form: &ProfileForm,
    ) -> ClientResult<String> {
        check(form).map_err(ClientError::Validation)?;

        let body = json!({
            "email": form.email,
            "fullName": form.full_name,
            "height": form.height.trim(),
            "weight": form.weight.trim(),
            "birthOfDate": form.dob,
        });
        let builder = self.authorized(self.http.put(self.url("/UpdateProfile")), session)?;
        let response = Self::send(builder.json(&body)).await?;
        let message = response.text().await?;

        session.cache_profile(form.clone());
        Ok(message)
    }
}
