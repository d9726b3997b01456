//! Synchronous HTTP implementation of [`Backend`] using `ureq`.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::Backend;
use super::error::{ApiError, extract_error_message};
use super::multipart::MultipartBody;
use super::types::{
    EmotionResult, Features, HealthInfo, ImageUpload, ModelDescriptor, PredictionRequest,
    PredictionResult, ServiceStatus, VoiceCommandRequest, VoiceCommandResult,
};
use crate::config::schema::ApiConfig;

/// Upper bound on connection setup, regardless of the configured timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the prediction backend.
///
/// One agent is shared by every call so connections are pooled across the
/// startup checks.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpBackend {
    /// Build a client from the `[api]` config section.
    pub fn from_config(config: &ApiConfig) -> Self {
        let timeout = Duration::from_millis(config.timeout_ms);
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT.min(timeout))
            .timeout_read(timeout)
            .timeout_write(timeout)
            .build();

        Self {
            base_url: normalize_base_url(&config.base_url),
            agent,
        }
    }

    /// The backend base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| map_ureq_error(&url, e))?;
        read_json(&url, response)
    }

    fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(%url, "POST");
        let response = self
            .agent
            .post(&url)
            .send_json(body)
            .map_err(|e| map_ureq_error(&url, e))?;
        read_json(&url, response)
    }
}

impl Backend for HttpBackend {
    fn health(&self) -> Result<HealthInfo, ApiError> {
        self.get_json("/health")
    }

    fn voice_status(&self) -> Result<ServiceStatus, ApiError> {
        self.get_json("/voice/status")
    }

    fn face_status(&self) -> Result<ServiceStatus, ApiError> {
        self.get_json("/face/status")
    }

    fn list_models(&self) -> Result<Vec<ModelDescriptor>, ApiError> {
        let url = self.url("/predictions/datasets");
        let body: Value = self.get_json("/predictions/datasets")?;
        parse_model_list(&url, body)
    }

    fn model_info(&self, key: &str) -> Result<ModelDescriptor, ApiError> {
        self.get_json(&format!("/predictions/{key}/info"))
    }

    fn predict(&self, key: &str, features: &Features) -> Result<PredictionResult, ApiError> {
        debug!(
            model = key,
            fields = features.len(),
            "sending prediction request"
        );
        self.post_json(
            &format!("/predictions/{key}"),
            &PredictionRequest { features },
        )
    }

    fn voice_command(
        &self,
        audio_base64: &str,
        language_code: &str,
    ) -> Result<VoiceCommandResult, ApiError> {
        self.post_json(
            "/voice/command",
            &VoiceCommandRequest {
                audio_base64,
                language_code,
            },
        )
    }

    fn parse_voice_text(&self, text: &str) -> Result<VoiceCommandResult, ApiError> {
        let url = self.url("/voice/parse");
        debug!(%url, "POST");
        let response = self
            .agent
            .post(&url)
            .query("text", text)
            .call()
            .map_err(|e| map_ureq_error(&url, e))?;
        read_json(&url, response)
    }

    fn emotion_upload(&self, image: &ImageUpload) -> Result<EmotionResult, ApiError> {
        let url = self.url("/face/emotion/upload");
        debug!(%url, bytes = image.bytes.len(), content_type = %image.content_type, "POST");

        let multipart = MultipartBody::new();
        let content_type = multipart.content_type();
        let body = multipart
            .file("file", &image.filename, &image.content_type, &image.bytes)
            .finish();

        let response = self
            .agent
            .post(&url)
            .set("Content-Type", &content_type)
            .send_bytes(&body)
            .map_err(|e| map_ureq_error(&url, e))?;
        read_json(&url, response)
    }
}

/// Strip trailing slashes so paths can be appended verbatim.
fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn read_json<T: DeserializeOwned>(url: &str, response: ureq::Response) -> Result<T, ApiError> {
    response.into_json::<T>().map_err(|e| ApiError::Malformed {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Validate that the catalog body is an array before decoding its entries.
fn parse_model_list(url: &str, body: Value) -> Result<Vec<ModelDescriptor>, ApiError> {
    if !body.is_array() {
        return Err(ApiError::Malformed {
            url: url.to_string(),
            reason: "model list is not an array".to_string(),
        });
    }

    serde_json::from_value(body).map_err(|e| ApiError::Malformed {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

fn map_ureq_error(url: &str, error: ureq::Error) -> ApiError {
    match error {
        ureq::Error::Status(status, response) => {
            let body = response.into_json::<Value>().ok();
            let message = body.as_ref().and_then(extract_error_message);
            warn!(%url, status, detail = message.as_deref().unwrap_or(""), "backend error");
            ApiError::Backend { status, message }
        }
        ureq::Error::Transport(transport) => {
            warn!(%url, error = %transport, "backend unreachable");
            ApiError::Network {
                url: url.to_string(),
                reason: transport.to_string(),
            }
        }
    }
}
