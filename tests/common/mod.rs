//! Shared fixtures: an in-memory backend that records every call, and fake
//! capture devices that count their open tracks.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use jarvis::api::{
    ApiError, Backend, EmotionResult, Features, HealthInfo, ImageUpload, ModelDescriptor,
    PredictionResult, ServiceStatus, VoiceCommandResult,
};
use jarvis::app::{Dashboard, DashboardSettings};
use jarvis::face::{Camera, FrameStream};
use jarvis::media::{MediaError, MediaStream};
use jarvis::voice::{AudioFormat, AudioStream, CaptureSettings, Microphone};

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Health,
    VoiceStatus,
    FaceStatus,
    ListModels,
    ModelInfo(String),
    Predict(String, Features),
    VoiceCommand { audio_base64: String, language: String },
    ParseVoiceText(String),
    EmotionUpload { filename: String, content_type: String, len: usize },
}

/// Backend with fixed responses per endpoint.
pub struct ScriptedBackend {
    pub health: Result<HealthInfo, ApiError>,
    pub voice_status: Result<ServiceStatus, ApiError>,
    pub face_status: Result<ServiceStatus, ApiError>,
    pub models: Result<Vec<ModelDescriptor>, ApiError>,
    pub model_info: Result<ModelDescriptor, ApiError>,
    pub prediction: Result<PredictionResult, ApiError>,
    pub voice: Result<VoiceCommandResult, ApiError>,
    pub emotion: Result<EmotionResult, ApiError>,
    pub calls: Mutex<Vec<Call>>,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self {
            health: Ok(HealthInfo {
                status: Some("healthy".to_string()),
                version: Some("1.2.0".to_string()),
                models_loaded: Some(9),
            }),
            voice_status: Ok(ServiceStatus {
                available: true,
                message: None,
            }),
            face_status: Ok(ServiceStatus {
                available: false,
                message: Some("Azure Face not configured".to_string()),
            }),
            models: Ok(vec![
                descriptor("car_prices", "Car Prices", "regression"),
                descriptor("telco_churn", "Telco Churn", "classification"),
                descriptor("iris", "Iris", "classification"),
            ]),
            model_info: Err(backend_error(404, "Model not found")),
            prediction: Ok(PredictionResult {
                dataset: "car_prices".to_string(),
                prediction: serde_json::json!(5.59),
                task_type: "regression".to_string(),
                confidence: None,
            }),
            voice: Ok(VoiceCommandResult {
                transcript: "predict car price".to_string(),
                command_recognized: true,
                dataset_key: Some("car_prices".to_string()),
                confidence: Some(0.93),
            }),
            emotion: Ok(EmotionResult {
                face_detected: Some(true),
                num_faces: 1,
                emotions: [("happiness".to_string(), 0.9), ("neutral".to_string(), 0.1)]
                    .into_iter()
                    .collect(),
                dominant_emotion: Some("happiness".to_string()),
                confidence: 0.9,
                ..EmotionResult::default()
            }),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedBackend {
    pub fn offline() -> Self {
        Self {
            health: Err(network_error()),
            voice_status: Err(network_error()),
            face_status: Err(network_error()),
            models: Err(network_error()),
            model_info: Err(network_error()),
            prediction: Err(network_error()),
            voice: Err(network_error()),
            emotion: Err(network_error()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matches(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Backend for ScriptedBackend {
    fn health(&self) -> Result<HealthInfo, ApiError> {
        self.record(Call::Health);
        self.health.clone()
    }

    fn voice_status(&self) -> Result<ServiceStatus, ApiError> {
        self.record(Call::VoiceStatus);
        self.voice_status.clone()
    }

    fn face_status(&self) -> Result<ServiceStatus, ApiError> {
        self.record(Call::FaceStatus);
        self.face_status.clone()
    }

    fn list_models(&self) -> Result<Vec<ModelDescriptor>, ApiError> {
        self.record(Call::ListModels);
        self.models.clone()
    }

    fn model_info(&self, key: &str) -> Result<ModelDescriptor, ApiError> {
        self.record(Call::ModelInfo(key.to_string()));
        self.model_info.clone()
    }

    fn predict(&self, key: &str, features: &Features) -> Result<PredictionResult, ApiError> {
        self.record(Call::Predict(key.to_string(), features.clone()));
        self.prediction.clone()
    }

    fn voice_command(
        &self,
        audio_base64: &str,
        language_code: &str,
    ) -> Result<VoiceCommandResult, ApiError> {
        self.record(Call::VoiceCommand {
            audio_base64: audio_base64.to_string(),
            language: language_code.to_string(),
        });
        self.voice.clone()
    }

    fn parse_voice_text(&self, text: &str) -> Result<VoiceCommandResult, ApiError> {
        self.record(Call::ParseVoiceText(text.to_string()));
        self.voice.clone()
    }

    fn emotion_upload(&self, image: &ImageUpload) -> Result<EmotionResult, ApiError> {
        self.record(Call::EmotionUpload {
            filename: image.filename.clone(),
            content_type: image.content_type.clone(),
            len: image.bytes.len(),
        });
        self.emotion.clone()
    }
}

pub fn descriptor(key: &str, name: &str, task: &str) -> ModelDescriptor {
    ModelDescriptor {
        key: key.to_string(),
        name: name.to_string(),
        task: task.to_string(),
        description: format!("{name} model"),
        target: "target".to_string(),
        voice_commands: Vec::new(),
    }
}

pub fn network_error() -> ApiError {
    ApiError::Network {
        url: "http://localhost:8000".to_string(),
        reason: "connection refused".to_string(),
    }
}

pub fn backend_error(status: u16, message: &str) -> ApiError {
    ApiError::Backend {
        status,
        message: Some(message.to_string()),
    }
}

pub fn dashboard(backend: ScriptedBackend) -> Dashboard<ScriptedBackend> {
    Dashboard::new(backend, DashboardSettings::default())
}

// ---------------------------------------------------------------------------
// Devices
// ---------------------------------------------------------------------------

/// A stream whose live track count is shared with the test.
pub struct FakeTracks {
    live: Arc<AtomicUsize>,
}

impl FakeTracks {
    fn open(live: &Arc<AtomicUsize>, tracks: usize) -> Self {
        live.store(tracks, Ordering::SeqCst);
        Self { live: live.clone() }
    }
}

impl MediaStream for FakeTracks {
    fn active_tracks(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    fn stop_all(&mut self) {
        self.live.store(0, Ordering::SeqCst);
    }
}

/// Delivers `chunks` as soon as it is opened.
pub struct FakeMicrophone {
    pub chunks: Vec<Vec<u8>>,
    pub live: Arc<AtomicUsize>,
    pub fail: Option<MediaError>,
}

impl FakeMicrophone {
    /// A microphone that records `total` bytes in 100-byte chunks.
    pub fn recording(total: usize) -> Self {
        let chunks = vec![0u8; total].chunks(100).map(<[u8]>::to_vec).collect();
        Self {
            chunks,
            live: Arc::new(AtomicUsize::new(0)),
            fail: None,
        }
    }

    pub fn denied() -> Self {
        Self {
            fail: Some(MediaError::PermissionDenied("microphone")),
            ..Self::recording(0)
        }
    }

    pub fn live_tracks(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

struct FakeAudio(FakeTracks);

impl MediaStream for FakeAudio {
    fn active_tracks(&self) -> usize {
        self.0.active_tracks()
    }

    fn stop_all(&mut self) {
        self.0.stop_all();
    }
}

impl AudioStream for FakeAudio {
    fn format(&self) -> AudioFormat {
        AudioFormat::Encoded {
            mime: "audio/webm".to_string(),
        }
    }
}

impl Microphone for FakeMicrophone {
    fn open(
        &mut self,
        _settings: &CaptureSettings,
        chunks: Sender<Vec<u8>>,
    ) -> Result<Box<dyn AudioStream>, MediaError> {
        if let Some(err) = self.fail.clone() {
            return Err(err);
        }
        for chunk in &self.chunks {
            chunks.send(chunk.clone()).unwrap();
        }
        Ok(Box::new(FakeAudio(FakeTracks::open(&self.live, 1))))
    }
}

/// A camera whose frames are a fixed byte string, or an error.
pub struct FakeCamera {
    pub frame: Result<Vec<u8>, MediaError>,
    pub live: Arc<AtomicUsize>,
    pub opened_index: Option<u32>,
}

impl FakeCamera {
    pub fn new() -> Self {
        Self {
            frame: Ok(vec![0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10]),
            live: Arc::new(AtomicUsize::new(0)),
            opened_index: None,
        }
    }

    pub fn failing() -> Self {
        Self {
            frame: Err(MediaError::Device {
                device: "camera",
                reason: "frame timeout".to_string(),
            }),
            ..Self::new()
        }
    }

    pub fn live_tracks(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

struct FakeVideo {
    tracks: FakeTracks,
    frame: Result<Vec<u8>, MediaError>,
}

impl MediaStream for FakeVideo {
    fn active_tracks(&self) -> usize {
        self.tracks.active_tracks()
    }

    fn stop_all(&mut self) {
        self.tracks.stop_all();
    }
}

impl FrameStream for FakeVideo {
    fn capture_jpeg(&mut self, _quality: u8) -> Result<Vec<u8>, MediaError> {
        self.frame.clone()
    }
}

impl Camera for FakeCamera {
    fn open(&mut self, index: u32) -> Result<Box<dyn FrameStream>, MediaError> {
        self.opened_index = Some(index);
        Ok(Box::new(FakeVideo {
            tracks: FakeTracks::open(&self.live, 1),
            frame: self.frame.clone(),
        }))
    }
}
