//! Wire types for the backend API.
//!
//! Response types are lenient: every field the dashboard can live without
//! carries `#[serde(default)]`, so an older or newer backend that omits it
//! still deserializes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::ModelKey;

/// Flat feature mapping sent to `POST /predictions/{key}`.
pub type Features = Map<String, Value>;

/// Response of `GET /health`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthInfo {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub models_loaded: Option<u32>,
}

/// Response of `GET /voice/status` and `GET /face/status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Backend metadata for one prediction model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub voice_commands: Vec<String>,
}

impl ModelDescriptor {
    /// Resolve the descriptor's key against the models this client knows.
    pub fn model_key(&self) -> Option<ModelKey> {
        ModelKey::parse(&self.key)
    }
}

/// Request body for `POST /predictions/{key}`.
#[derive(Debug, Serialize)]
pub struct PredictionRequest<'a> {
    pub features: &'a Features,
}

/// Response of `POST /predictions/{key}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(default)]
    pub dataset: String,
    pub prediction: Value,
    #[serde(default)]
    pub task_type: String,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Request body for `POST /voice/command`.
#[derive(Debug, Serialize)]
pub struct VoiceCommandRequest<'a> {
    pub audio_base64: &'a str,
    pub language_code: &'a str,
}

/// Response of `POST /voice/command` and `POST /voice/parse`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceCommandResult {
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub command_recognized: bool,
    #[serde(default)]
    pub dataset_key: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Response of `POST /face/emotion/upload`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionResult {
    #[serde(default)]
    pub face_detected: Option<bool>,
    #[serde(default)]
    pub num_faces: u32,
    #[serde(default)]
    pub emotions: BTreeMap<String, f64>,
    #[serde(default)]
    pub emotions_es: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub dominant_emotion: Option<String>,
    #[serde(default)]
    pub dominant_emotion_es: Option<String>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub message: Option<String>,
}

/// An image file ready to be posted as the `file` part of a multipart form.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}
