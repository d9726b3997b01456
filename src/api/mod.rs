//! Backend API access.
//!
//! The dashboard talks to the prediction backend only through the
//! [`Backend`] trait. [`HttpBackend`] is the production implementation on
//! top of a synchronous `ureq` agent; tests substitute an in-memory one.
//!
//! | Call | Endpoint |
//! |------|----------|
//! | [`Backend::health`] | `GET /health` |
//! | [`Backend::list_models`] | `GET /predictions/datasets` |
//! | [`Backend::model_info`] | `GET /predictions/{key}/info` |
//! | [`Backend::predict`] | `POST /predictions/{key}` |
//! | [`Backend::voice_status`] | `GET /voice/status` |
//! | [`Backend::voice_command`] | `POST /voice/command` |
//! | [`Backend::parse_voice_text`] | `POST /voice/parse?text=` |
//! | [`Backend::face_status`] | `GET /face/status` |
//! | [`Backend::emotion_upload`] | `POST /face/emotion/upload` |

pub mod error;
pub mod http;
pub mod multipart;
pub mod types;

pub use error::{ApiError, extract_error_message};
pub use http::HttpBackend;
pub use types::{
    EmotionResult, Features, HealthInfo, ImageUpload, ModelDescriptor, PredictionResult,
    ServiceStatus, VoiceCommandResult,
};

/// Operations the dashboard needs from the prediction backend.
///
/// `Sync` so the startup checks can share one backend across scoped threads.
pub trait Backend: Sync {
    fn health(&self) -> Result<HealthInfo, ApiError>;

    fn voice_status(&self) -> Result<ServiceStatus, ApiError>;

    fn face_status(&self) -> Result<ServiceStatus, ApiError>;

    /// Fetch the model catalog. A body that is not a JSON array is a
    /// [`ApiError::Malformed`] error.
    fn list_models(&self) -> Result<Vec<ModelDescriptor>, ApiError>;

    fn model_info(&self, key: &str) -> Result<ModelDescriptor, ApiError>;

    fn predict(&self, key: &str, features: &Features) -> Result<PredictionResult, ApiError>;

    fn voice_command(
        &self,
        audio_base64: &str,
        language_code: &str,
    ) -> Result<VoiceCommandResult, ApiError>;

    /// Run command recognition on already-transcribed text.
    fn parse_voice_text(&self, text: &str) -> Result<VoiceCommandResult, ApiError>;

    fn emotion_upload(&self, image: &ImageUpload) -> Result<EmotionResult, ApiError>;
}
