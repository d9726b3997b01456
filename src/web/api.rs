//! JSON API handlers for the web dashboard.
//!
//! Every handler runs one dashboard action and answers with the same
//! envelope: the full [`DashboardView`] plus the notifications the action
//! queued, so the page can re-render from a single response.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::Backend;
use crate::app::{Dashboard, DashboardView, Notification, Tab};
use crate::face;
use crate::voice::AudioBlob;

/// Used when the browser posts audio without a `Content-Type`.
const DEFAULT_AUDIO_MIME: &str = "audio/webm";

// ---------------------------------------------------------------------------
// JSON request / response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct Envelope {
    view: DashboardView,
    notifications: Vec<Notification>,
}

/// Body of `POST /api/predict`: the form values by field name.
#[derive(Debug, Default, Deserialize)]
struct PredictRequest {
    #[serde(default)]
    values: serde_json::Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct VoiceTextRequest {
    text: String,
}

fn envelope<B: Backend>(dashboard: &mut Dashboard<B>) -> Value {
    let envelope = Envelope {
        view: dashboard.view(),
        notifications: dashboard.drain_notifications(),
    };
    serde_json::to_value(envelope).unwrap_or_else(|e| {
        serde_json::json!({ "error": format!("failed to serialize dashboard: {e}") })
    })
}

/// Parse a JSON body, treating an empty body as `{}`.
fn parse_body<T: for<'de> Deserialize<'de>>(body: &[u8]) -> Result<T> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}".as_slice()
    } else {
        body
    };
    serde_json::from_slice(body).context("invalid JSON body")
}

// ---------------------------------------------------------------------------
// GET /api/state, POST /api/startup, POST /api/status
// ---------------------------------------------------------------------------

pub(super) fn state<B: Backend>(dashboard: &mut Dashboard<B>) -> Value {
    envelope(dashboard)
}

pub(super) fn startup<B: Backend>(dashboard: &mut Dashboard<B>) -> Value {
    dashboard.startup();
    envelope(dashboard)
}

pub(super) fn refresh_status<B: Backend>(dashboard: &mut Dashboard<B>) -> Value {
    dashboard.refresh_status();
    envelope(dashboard)
}

// ---------------------------------------------------------------------------
// Models and predictions
// ---------------------------------------------------------------------------

pub(super) fn reload_models<B: Backend>(dashboard: &mut Dashboard<B>) -> Value {
    dashboard.load_catalog();
    envelope(dashboard)
}

pub(super) fn select_model<B: Backend>(dashboard: &mut Dashboard<B>, key: &str) -> Value {
    dashboard.select_key(key);
    envelope(dashboard)
}

/// Apply the posted values to the current form, then submit it.
pub(super) fn predict<B: Backend>(dashboard: &mut Dashboard<B>, body: &[u8]) -> Result<Value> {
    let request: PredictRequest = parse_body(body)?;

    let values: Vec<(&str, String)> = request
        .values
        .iter()
        .map(|(name, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (name.as_str(), value)
        })
        .collect();
    dashboard.set_fields(values.iter().map(|(name, value)| (*name, value.as_str())))?;

    dashboard.submit_prediction();
    Ok(envelope(dashboard))
}

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

pub(super) fn switch_tab<B: Backend>(dashboard: &mut Dashboard<B>, name: &str) -> Result<Value> {
    let tab = Tab::parse(name).with_context(|| format!("unknown tab '{name}'"))?;
    dashboard.switch_tab(tab);
    Ok(envelope(dashboard))
}

// ---------------------------------------------------------------------------
// Voice
// ---------------------------------------------------------------------------

/// Raw recorded audio; the request's `Content-Type` is its MIME type.
pub(super) fn voice_audio<B: Backend>(
    dashboard: &mut Dashboard<B>,
    body: &[u8],
    content_type: Option<&str>,
) -> Value {
    let mime = content_type
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim())
        .filter(|ct| !ct.is_empty())
        .unwrap_or(DEFAULT_AUDIO_MIME);
    let blob = AudioBlob::new(body.to_vec(), mime);
    dashboard.process_audio(&blob);
    envelope(dashboard)
}

pub(super) fn voice_text<B: Backend>(dashboard: &mut Dashboard<B>, body: &[u8]) -> Result<Value> {
    let request: VoiceTextRequest = parse_body(body)?;
    dashboard.parse_voice_text(&request.text);
    Ok(envelope(dashboard))
}

// ---------------------------------------------------------------------------
// Face
// ---------------------------------------------------------------------------

/// Raw image bytes, from a camera frame or an uploaded file.
pub(super) fn emotion<B: Backend>(dashboard: &mut Dashboard<B>, body: &[u8]) -> Value {
    let upload = face::upload_from_bytes(body.to_vec(), None);
    dashboard.analyze_emotion(&upload);
    envelope(dashboard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_parses_as_empty_object() {
        let request: PredictRequest = parse_body(b"  ").unwrap();
        assert!(request.values.is_empty());
    }

    #[test]
    fn invalid_body_is_an_error() {
        let err = parse_body::<VoiceTextRequest>(b"{not json").unwrap_err();
        assert!(format!("{err:#}").contains("invalid JSON body"));
    }
}
