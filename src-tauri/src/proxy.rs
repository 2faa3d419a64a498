//! One-hop relay to the inference backend.
//!
//! Failures never surface as Rust errors here: like an HTTP route, every call
//! ends in a status plus a JSON body, with `{ "detail": ... }` on failure.

use crate::config::AppConfig;
use crate::types::{ErrorBody, HealthResponse};
use crate::upload::SelectedFile;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;

pub const NO_FILE_DETAIL: &str = "No file provided. Please upload a document.";
pub const UNAVAILABLE_DETAIL: &str =
    "Unable to process document right now. The processing service may be starting up — please try again in a moment.";
const UNPARSEABLE_ERROR_DETAIL: &str = "Backend error";

/// What the page sees: a status code and the JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    pub status: u16,
    pub body: Value,
}

impl ProxyResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn error(status: u16, detail: impl Into<String>) -> Self {
        let body = serde_json::to_value(ErrorBody {
            detail: detail.into(),
        })
        .unwrap_or(Value::Null);
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "status", rename_all = "snake_case")]
pub enum BackendStatus {
    Ready,
    /// Reachable, but models are still loading.
    Loading,
    Unreachable,
    Error(u16),
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    config: AppConfig,
}

impl BackendClient {
    pub fn new(config: AppConfig) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| e.to_string())?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Forward the upload to `${BACKEND_URL}/process` and normalize the outcome.
    pub async fn relay(&self, file: Option<&SelectedFile>) -> ProxyResponse {
        let Some(file) = file else {
            return ProxyResponse::error(400, NO_FILE_DETAIL);
        };

        let url = self.config.process_url();
        tracing::info!(file = %file.name, bytes = file.bytes.len(), "Forwarding document to {}", url);

        let response = match self
            .client
            .post(&url)
            .multipart(upload_form(file))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("API proxy error: {}", e);
                return ProxyResponse::error(502, UNAVAILABLE_DETAIL);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<Value>().await.ok();
            let detail = error_detail(status, body.as_ref());
            tracing::warn!("Backend returned {}: {}", status.as_u16(), detail);
            return ProxyResponse::error(status.as_u16(), detail);
        }

        match response.json::<Value>().await {
            Ok(body) => ProxyResponse::ok(body),
            Err(e) => {
                tracing::error!("API proxy error: invalid backend JSON: {}", e);
                ProxyResponse::error(502, UNAVAILABLE_DETAIL)
            }
        }
    }

    pub async fn health(&self) -> BackendStatus {
        let response = match self.client.get(self.config.health_url()).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("Health check failed: {}", e);
                return BackendStatus::Unreachable;
            }
        };
        let status = response.status();
        if !status.is_success() {
            return BackendStatus::Error(status.as_u16());
        }
        match response.json::<HealthResponse>().await {
            Ok(h) if h.models_loaded => BackendStatus::Ready,
            Ok(_) => BackendStatus::Loading,
            Err(_) => BackendStatus::Error(status.as_u16()),
        }
    }
}

fn upload_form(file: &SelectedFile) -> Form {
    let part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
    let part = match part.mime_str(&file.mime) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!("Invalid MIME type {:?}: {}", file.mime, e);
            Part::bytes(file.bytes.clone()).file_name(file.name.clone())
        }
    };
    Form::new().part("file", part)
}

/// Pick the message for a failed backend call; `body` is `None` when it was not JSON.
pub fn error_detail(status: StatusCode, body: Option<&Value>) -> String {
    let Some(body) = body else {
        return UNPARSEABLE_ERROR_DETAIL.to_string();
    };
    match body.get("detail") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Null) | Some(Value::String(_)) | Some(Value::Bool(false)) | None => {
            format!("Backend returned {}", status.as_u16())
        }
        Some(other) => other.to_string(),
    }
}
