//! Voice command capture.
//!
//! A [`VoiceSession`] moves `idle → recording → processing → idle`. While
//! recording, the open [`Microphone`] stream pushes encoded chunks into a
//! channel; stopping releases the device and assembles the chunks into one
//! [`AudioBlob`]. [`process_blob`] applies the minimum-size gate and sends
//! the blob to the backend for transcription and command matching.

#[cfg(feature = "microphone")]
pub mod mic;

use std::io::Cursor;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::{ApiError, Backend, VoiceCommandResult};
use crate::config::schema::VoiceConfig;
use crate::media::{MediaError, MediaStream, StreamGuard};

/// Blobs smaller than this are rejected without calling the backend.
pub const MIN_AUDIO_BYTES: usize = 1000;

/// Encoding of the chunks a stream produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioFormat {
    /// Interleaved signed 16-bit little-endian PCM.
    Pcm16 { sample_rate: u32, channels: u16 },
    /// Chunks of an already-encoded container, concatenated as-is.
    Encoded { mime: String },
}

/// Requested capture parameters.
///
/// The processing hints are honored by browser capture; native capture
/// records the raw device signal.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureSettings {
    pub sample_rate: u32,
    pub chunk_interval: Duration,
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
    pub auto_gain_control: bool,
}

impl CaptureSettings {
    pub fn from_config(config: &VoiceConfig) -> Self {
        Self {
            sample_rate: config.sample_rate,
            chunk_interval: Duration::from_millis(config.chunk_ms),
            ..Self::default()
        }
    }
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            chunk_interval: Duration::from_millis(100),
            echo_cancellation: true,
            noise_suppression: true,
            auto_gain_control: true,
        }
    }
}

/// An open audio input stream.
pub trait AudioStream: MediaStream {
    fn format(&self) -> AudioFormat;
}

/// An audio input device.
pub trait Microphone {
    /// Open the device and start delivering chunks to `chunks` roughly
    /// every `settings.chunk_interval`.
    fn open(
        &mut self,
        settings: &CaptureSettings,
        chunks: Sender<Vec<u8>>,
    ) -> Result<Box<dyn AudioStream>, MediaError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoicePhase {
    Idle,
    Recording,
    Processing,
}

struct Recording {
    guard: StreamGuard<Box<dyn AudioStream>>,
    chunks: Receiver<Vec<u8>>,
    format: AudioFormat,
}

/// Recorder state for one dashboard.
pub struct VoiceSession {
    phase: VoicePhase,
    recording: Option<Recording>,
}

impl Default for VoiceSession {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceSession {
    pub fn new() -> Self {
        Self {
            phase: VoicePhase::Idle,
            recording: None,
        }
    }

    pub fn phase(&self) -> VoicePhase {
        self.phase
    }

    pub fn is_recording(&self) -> bool {
        self.phase == VoicePhase::Recording
    }

    /// Tracks held open by the current recording.
    pub fn active_tracks(&self) -> usize {
        self.recording
            .as_ref()
            .map_or(0, |recording| recording.guard.active_tracks())
    }

    /// Open the microphone and start buffering chunks.
    ///
    /// Rejected with [`MediaError::Busy`] while already recording. A device
    /// failure leaves the session idle.
    pub fn start(
        &mut self,
        microphone: &mut dyn Microphone,
        settings: &CaptureSettings,
    ) -> Result<(), MediaError> {
        if self.phase != VoicePhase::Idle {
            return Err(MediaError::Busy);
        }

        let (tx, rx) = mpsc::channel();
        let stream = microphone.open(settings, tx)?;
        let format = stream.format();
        info!(?format, "recording started");

        self.recording = Some(Recording {
            guard: StreamGuard::new(stream),
            chunks: rx,
            format,
        });
        self.phase = VoicePhase::Recording;
        Ok(())
    }

    /// Stop recording, release the device, and assemble the buffered chunks.
    ///
    /// On success the session is left in `processing`; call
    /// [`VoiceSession::finish`] once the blob has been handled.
    pub fn stop(&mut self) -> Result<AudioBlob, MediaError> {
        let Some(mut recording) = self.recording.take() else {
            return Err(MediaError::NotRecording);
        };
        recording.guard.release();

        let chunks: Vec<Vec<u8>> = recording.chunks.try_iter().collect();
        debug!(chunks = chunks.len(), "recording stopped");

        match AudioBlob::assemble(&recording.format, chunks) {
            Ok(blob) => {
                self.phase = VoicePhase::Processing;
                Ok(blob)
            }
            Err(err) => {
                self.phase = VoicePhase::Idle;
                Err(err)
            }
        }
    }

    /// Return to idle.
    pub fn finish(&mut self) {
        self.recording = None;
        self.phase = VoicePhase::Idle;
    }
}

impl std::fmt::Debug for VoiceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceSession")
            .field("phase", &self.phase)
            .field("active_tracks", &self.active_tracks())
            .finish()
    }
}

/// A complete recording ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBlob {
    pub bytes: Vec<u8>,
    pub mime: String,
    /// Number of chunks the blob was assembled from.
    pub chunks: usize,
}

impl AudioBlob {
    pub fn new(bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            bytes,
            mime: mime.into(),
            chunks: 1,
        }
    }

    /// Join recorded chunks. PCM chunks are wrapped in a WAV container.
    pub fn assemble(format: &AudioFormat, chunks: Vec<Vec<u8>>) -> Result<Self, MediaError> {
        let count = chunks.len();
        let bytes = match format {
            AudioFormat::Pcm16 {
                sample_rate,
                channels,
            } => encode_wav(*sample_rate, *channels, &chunks)?,
            AudioFormat::Encoded { .. } => chunks.concat(),
        };
        let mime = match format {
            AudioFormat::Pcm16 { .. } => "audio/wav".to_string(),
            AudioFormat::Encoded { mime } => mime.clone(),
        };
        Ok(Self {
            bytes,
            mime,
            chunks: count,
        })
    }

    /// Use a pre-recorded file as the blob.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::new(bytes, mime_for_path(path)))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("wav") => "audio/wav",
        Some("webm") => "audio/webm",
        Some("ogg" | "opus") => "audio/ogg",
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        Some("m4a") => "audio/mp4",
        _ => "application/octet-stream",
    }
}

fn encode_wav(sample_rate: u32, channels: u16, chunks: &[Vec<u8>]) -> Result<Vec<u8>, MediaError> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let encode_err = |e: hound::Error| MediaError::Encode(e.to_string());

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).map_err(encode_err)?;
        for chunk in chunks {
            for pair in chunk.chunks_exact(2) {
                writer
                    .write_sample(i16::from_le_bytes([pair[0], pair[1]]))
                    .map_err(encode_err)?;
            }
        }
        writer.finalize().map_err(encode_err)?;
    }
    Ok(cursor.into_inner())
}

/// Result of handing one blob to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum VoiceOutcome {
    /// Below the minimum size; the backend was not called.
    TooShort { bytes: usize },
    /// Transcribed and matched to a model.
    Recognized(VoiceCommandResult),
    /// Transcribed, but no command matched.
    Unrecognized(VoiceCommandResult),
    Failed(ApiError),
}

/// Gate, encode and send a blob to `POST /voice/command`.
pub fn process_blob<B: Backend + ?Sized>(
    backend: &B,
    blob: &AudioBlob,
    language_code: &str,
    min_bytes: usize,
) -> VoiceOutcome {
    info!(bytes = blob.len(), mime = %blob.mime, chunks = blob.chunks, "audio captured");
    if blob.len() < min_bytes {
        warn!(bytes = blob.len(), min_bytes, "audio too short, not sent");
        return VoiceOutcome::TooShort { bytes: blob.len() };
    }

    let encoded = STANDARD.encode(&blob.bytes);
    classify(backend.voice_command(&encoded, language_code))
}

/// Send already-transcribed text to `POST /voice/parse`.
pub fn process_text<B: Backend + ?Sized>(backend: &B, text: &str) -> VoiceOutcome {
    classify(backend.parse_voice_text(text))
}

fn classify(result: Result<VoiceCommandResult, ApiError>) -> VoiceOutcome {
    match result {
        Ok(result) if result.command_recognized && result.dataset_key.is_some() => {
            VoiceOutcome::Recognized(result)
        }
        Ok(result) => VoiceOutcome::Unrecognized(result),
        Err(err) => VoiceOutcome::Failed(err),
    }
}

/// The voice panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceView {
    pub phase: VoicePhase,
    /// `None` hides the transcript box.
    pub transcript: Option<String>,
    /// Set only for a recognized command.
    pub detected_model: Option<String>,
}

impl Default for VoiceView {
    fn default() -> Self {
        Self::idle()
    }
}

impl VoiceView {
    pub fn idle() -> Self {
        Self {
            phase: VoicePhase::Idle,
            transcript: None,
            detected_model: None,
        }
    }

    pub fn from_outcome(outcome: &VoiceOutcome) -> Self {
        match outcome {
            VoiceOutcome::Recognized(result) => Self {
                phase: VoicePhase::Idle,
                transcript: Some(result.transcript.clone()),
                detected_model: result.dataset_key.clone(),
            },
            VoiceOutcome::Unrecognized(result) => Self {
                phase: VoicePhase::Idle,
                transcript: Some(result.transcript.clone()),
                detected_model: None,
            },
            VoiceOutcome::TooShort { .. } | VoiceOutcome::Failed(_) => Self::idle(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_assembly_concatenates_pcm_chunks() {
        let format = AudioFormat::Pcm16 {
            sample_rate: 16_000,
            channels: 1,
        };
        let chunk: Vec<u8> = [100i16, -100, 200]
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect();
        let blob = AudioBlob::assemble(&format, vec![chunk.clone(), chunk]).unwrap();

        assert_eq!(blob.mime, "audio/wav");
        assert_eq!(blob.chunks, 2);

        let reader = hound::WavReader::new(Cursor::new(blob.bytes)).unwrap();
        assert_eq!(reader.spec().sample_rate, 16_000);
        let samples: Vec<i16> = reader.into_samples().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![100, -100, 200, 100, -100, 200]);
    }

    #[test]
    fn encoded_chunks_are_joined_verbatim() {
        let format = AudioFormat::Encoded {
            mime: "audio/webm".to_string(),
        };
        let blob = AudioBlob::assemble(&format, vec![vec![1, 2], vec![3]]).unwrap();
        assert_eq!(blob.bytes, vec![1, 2, 3]);
        assert_eq!(blob.mime, "audio/webm");
    }

    #[test]
    fn empty_pcm_recording_is_only_a_header() {
        let format = AudioFormat::Pcm16 {
            sample_rate: 48_000,
            channels: 1,
        };
        let blob = AudioBlob::assemble(&format, Vec::new()).unwrap();
        assert!(blob.len() < MIN_AUDIO_BYTES);
    }

    #[test]
    fn mime_follows_extension() {
        assert_eq!(mime_for_path(Path::new("a/cmd.WAV")), "audio/wav");
        assert_eq!(mime_for_path(Path::new("cmd.webm")), "audio/webm");
        assert_eq!(mime_for_path(Path::new("cmd")), "application/octet-stream");
    }

    #[test]
    fn recognition_requires_a_dataset_key() {
        let result = VoiceCommandResult {
            transcript: "predict".to_string(),
            command_recognized: true,
            dataset_key: None,
            confidence: None,
        };
        assert!(matches!(
            classify(Ok(result)),
            VoiceOutcome::Unrecognized(_)
        ));
    }

    #[test]
    fn view_shows_detected_model_only_when_recognized() {
        let result = VoiceCommandResult {
            transcript: "predice grasa corporal".to_string(),
            command_recognized: true,
            dataset_key: Some("body_fat".to_string()),
            confidence: Some(0.9),
        };
        let view = VoiceView::from_outcome(&VoiceOutcome::Recognized(result.clone()));
        assert_eq!(view.detected_model.as_deref(), Some("body_fat"));
        assert_eq!(view.transcript.as_deref(), Some("predice grasa corporal"));

        let view = VoiceView::from_outcome(&VoiceOutcome::Unrecognized(result));
        assert_eq!(view.detected_model, None);
    }
}
