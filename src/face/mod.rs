//! Emotion capture: camera frames and uploaded images funnel into one
//! `POST /face/emotion/upload` and one rendered result.

#[cfg(feature = "webcam")]
pub mod webcam;

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::api::{ApiError, Backend, EmotionResult, ImageUpload};
use crate::format::to_fixed;
use crate::media::{MediaError, MediaStream, StreamGuard};

const OCTET_STREAM: &str = "application/octet-stream";

/// Build an upload from raw image bytes, sniffing the content type.
///
/// Unrecognized data is still sent (as `application/octet-stream`); the
/// backend decides whether it can read it.
pub fn upload_from_bytes(bytes: Vec<u8>, filename: Option<&str>) -> ImageUpload {
    let format = image::guess_format(&bytes).ok();
    let content_type = format
        .map(|f| f.to_mime_type().to_string())
        .unwrap_or_else(|| OCTET_STREAM.to_string());
    let filename = match filename {
        Some(name) => name.to_string(),
        None => {
            let ext = format
                .and_then(|f| f.extensions_str().first().copied())
                .unwrap_or("bin");
            format!("upload.{ext}")
        }
    };
    ImageUpload {
        bytes,
        filename,
        content_type,
    }
}

pub fn upload_from_path(path: &Path) -> std::io::Result<ImageUpload> {
    let bytes = std::fs::read(path)?;
    let filename = path.file_name().and_then(|n| n.to_str());
    Ok(upload_from_bytes(bytes, filename))
}

/// Encode an RGB8 frame as JPEG.
pub fn encode_jpeg(
    rgb: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, MediaError> {
    let mut out = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality);
    encoder
        .encode(rgb, width, height, image::ExtendedColorType::Rgb8)
        .map_err(|e| MediaError::Encode(e.to_string()))?;
    Ok(out)
}

/// A captured camera frame, as the upload the backend receives.
pub fn frame_upload(jpeg: Vec<u8>) -> ImageUpload {
    ImageUpload {
        bytes: jpeg,
        filename: "capture.jpg".to_string(),
        content_type: "image/jpeg".to_string(),
    }
}

/// Send an image for emotion analysis.
pub fn analyze<B: Backend + ?Sized>(
    backend: &B,
    upload: &ImageUpload,
) -> Result<EmotionResult, ApiError> {
    info!(bytes = upload.bytes.len(), content_type = %upload.content_type, "analyzing emotions");
    backend.emotion_upload(upload)
}

/// Icon shown next to the dominant emotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionIcon {
    Happiness,
    Sadness,
    Anger,
    Surprise,
    Fear,
    Disgust,
    Neutral,
    Contempt,
    /// Anything else, including a missing emotion.
    Other,
}

impl EmotionIcon {
    /// Resolve a Spanish or English emotion name, case-insensitively.
    pub fn for_emotion(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "felicidad" | "happiness" | "happy" => Self::Happiness,
            "tristeza" | "sadness" | "sad" => Self::Sadness,
            "enojo" | "anger" | "angry" => Self::Anger,
            "sorpresa" | "surprise" | "surprised" => Self::Surprise,
            "miedo" | "fear" | "fearful" => Self::Fear,
            "disgusto" | "disgust" | "disgusted" => Self::Disgust,
            "neutral" => Self::Neutral,
            "desprecio" | "contempt" => Self::Contempt,
            _ => Self::Other,
        }
    }

    /// Font Awesome class used by the web dashboard.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Happiness => "fa-smile-beam",
            Self::Sadness => "fa-sad-tear",
            Self::Anger => "fa-angry",
            Self::Surprise => "fa-surprise",
            Self::Fear => "fa-flushed",
            Self::Disgust => "fa-grimace",
            Self::Neutral => "fa-meh",
            Self::Contempt => "fa-meh-rolling-eyes",
            Self::Other => "fa-smile",
        }
    }

    /// Terminal glyph.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Happiness => "😄",
            Self::Sadness => "😢",
            Self::Anger => "😠",
            Self::Surprise => "😮",
            Self::Fear => "😳",
            Self::Disgust => "😬",
            Self::Neutral => "😐",
            Self::Contempt => "🙄",
            Self::Other => "🙂",
        }
    }
}

/// One bar of the emotion chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionBar {
    pub emotion: String,
    pub score: f64,
    /// One decimal, e.g. `"91.2%"`.
    pub label: String,
    /// Rounded, e.g. `"91%"`.
    pub fill: String,
    /// Bar width in percent, clamped to `0..=100`.
    pub width: f64,
}

impl EmotionBar {
    fn new(emotion: String, score: f64) -> Self {
        let percent = score * 100.0;
        Self {
            emotion,
            score,
            label: format!("{}%", to_fixed(percent, 1)),
            fill: format!("{}%", to_fixed(percent, 0)),
            width: percent.clamp(0.0, 100.0),
        }
    }
}

/// The rendered emotion result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionView {
    pub dominant: String,
    pub icon: EmotionIcon,
    pub icon_class: &'static str,
    pub confidence: String,
    pub num_faces: u32,
    /// Sorted by score, highest first.
    pub bars: Vec<EmotionBar>,
    pub message: Option<String>,
}

impl EmotionView {
    /// Localized (`_es`) fields win over the English ones when present.
    pub fn new(result: &EmotionResult) -> Self {
        let dominant = result
            .dominant_emotion_es
            .clone()
            .or_else(|| result.dominant_emotion.clone())
            .unwrap_or_else(|| "unknown".to_string());
        let icon = EmotionIcon::for_emotion(&dominant);

        let scores = result.emotions_es.as_ref().unwrap_or(&result.emotions);
        let mut bars: Vec<EmotionBar> = scores
            .iter()
            .map(|(emotion, score)| EmotionBar::new(emotion.clone(), *score))
            .collect();
        // Stable: equal scores keep the map's alphabetical order.
        bars.sort_by(|a, b| b.score.total_cmp(&a.score));

        Self {
            dominant,
            icon,
            icon_class: icon.css_class(),
            confidence: format!("{}%", to_fixed(result.confidence * 100.0, 1)),
            num_faces: result.num_faces,
            bars,
            message: result.message.clone(),
        }
    }
}

/// An open camera that can produce JPEG frames.
pub trait FrameStream: MediaStream {
    fn capture_jpeg(&mut self, quality: u8) -> Result<Vec<u8>, MediaError>;
}

/// A video input device.
pub trait Camera {
    fn open(&mut self, index: u32) -> Result<Box<dyn FrameStream>, MediaError>;
}

/// Webcam state for one dashboard. The stream is released on
/// [`CameraSession::stop`], on a capture error, and on drop.
#[derive(Debug, Default)]
pub struct CameraSession {
    stream: Option<StreamGuard<Box<dyn FrameStream>>>,
}

impl CameraSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    pub fn active_tracks(&self) -> usize {
        self.stream.as_ref().map_or(0, StreamGuard::active_tracks)
    }

    /// Open the camera. Starting an already running session is a no-op.
    pub fn start(&mut self, camera: &mut dyn Camera, index: u32) -> Result<(), MediaError> {
        if self.is_active() {
            return Ok(());
        }
        let stream = camera.open(index)?;
        info!(index, "camera started");
        self.stream = Some(StreamGuard::new(stream));
        Ok(())
    }

    /// Stop every track. Safe to call when nothing is running.
    pub fn stop(&mut self) {
        if let Some(mut guard) = self.stream.take() {
            guard.release();
            debug!("camera stopped");
        }
    }

    /// Grab one frame as JPEG. A failed capture releases the camera.
    pub fn capture(&mut self, quality: u8) -> Result<Vec<u8>, MediaError> {
        let Some(stream) = self.stream.as_mut().and_then(StreamGuard::stream_mut) else {
            return Err(MediaError::NotRecording);
        };
        match stream.capture_jpeg(quality) {
            Ok(jpeg) => Ok(jpeg),
            Err(err) => {
                self.stop();
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn result(emotions: &[(&str, f64)]) -> EmotionResult {
        EmotionResult {
            face_detected: Some(true),
            num_faces: 1,
            emotions: emotions
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
            confidence: 0.912,
            dominant_emotion: Some("happiness".to_string()),
            ..EmotionResult::default()
        }
    }

    #[test]
    fn icons_resolve_both_languages() {
        assert_eq!(
            EmotionIcon::for_emotion("Felicidad").css_class(),
            "fa-smile-beam"
        );
        assert_eq!(
            EmotionIcon::for_emotion("happiness").css_class(),
            "fa-smile-beam"
        );
        assert_eq!(
            EmotionIcon::for_emotion("desprecio").css_class(),
            "fa-meh-rolling-eyes"
        );
        assert_eq!(
            EmotionIcon::for_emotion("confusion").css_class(),
            "fa-smile"
        );
    }

    #[test]
    fn bars_sorted_descending_with_labels() {
        let view = EmotionView::new(&result(&[
            ("anger", 0.05),
            ("happiness", 0.912),
            ("neutral", 0.038),
        ]));
        let order: Vec<&str> = view.bars.iter().map(|b| b.emotion.as_str()).collect();
        assert_eq!(order, vec!["happiness", "anger", "neutral"]);
        assert_eq!(view.bars[0].label, "91.2%");
        assert_eq!(view.bars[0].fill, "91%");
        assert_eq!(view.confidence, "91.2%");
    }

    #[test]
    fn half_percent_fills_round_up() {
        let mut r = result(&[("anger", 0.125), ("surprise", 0.625)]);
        r.confidence = 0.0025;
        let view = EmotionView::new(&r);
        assert_eq!(view.bars[0].fill, "63%");
        assert_eq!(view.bars[1].label, "12.5%");
        assert_eq!(view.bars[1].fill, "13%");
        assert_eq!(view.confidence, "0.3%");
    }

    #[test]
    fn ties_keep_alphabetical_order() {
        let view = EmotionView::new(&result(&[("sadness", 0.5), ("anger", 0.5)]));
        let order: Vec<&str> = view.bars.iter().map(|b| b.emotion.as_str()).collect();
        assert_eq!(order, vec!["anger", "sadness"]);
    }

    #[test]
    fn localized_fields_win() {
        let mut r = result(&[("happiness", 0.9)]);
        r.dominant_emotion_es = Some("felicidad".to_string());
        r.emotions_es = Some([("felicidad".to_string(), 0.9)].into_iter().collect());
        let view = EmotionView::new(&r);
        assert_eq!(view.dominant, "felicidad");
        assert_eq!(view.bars[0].emotion, "felicidad");
    }

    #[test]
    fn missing_dominant_uses_default_icon() {
        let view = EmotionView::new(&EmotionResult::default());
        assert_eq!(view.icon, EmotionIcon::Other);
        assert!(view.bars.is_empty());
    }

    #[test]
    fn uploads_sniff_png_and_jpeg() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        let upload = upload_from_bytes(png.to_vec(), None);
        assert_eq!(upload.content_type, "image/png");
        assert_eq!(upload.filename, "upload.png");

        let pixels = [255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];
        let jpeg = encode_jpeg(&pixels, 2, 2, 90).unwrap();
        let upload = upload_from_bytes(jpeg, Some("me.jpg"));
        assert_eq!(upload.content_type, "image/jpeg");
        assert_eq!(upload.filename, "me.jpg");
    }

    #[test]
    fn unknown_bytes_are_sent_as_octet_stream() {
        let upload = upload_from_bytes(b"not an image".to_vec(), None);
        assert_eq!(upload.content_type, OCTET_STREAM);
        assert_eq!(upload.filename, "upload.bin");
    }
}
