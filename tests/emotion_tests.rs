/// Emotion capture tests.
///
/// Checks that the camera is released on every exit path and that camera
/// frames and uploaded files reach `POST /face/emotion/upload` the same way.
mod common;

use common::{Call, FakeCamera, ScriptedBackend, backend_error, dashboard, network_error};
use jarvis::app::{Level, Tab};
use jarvis::face::{self, EmotionIcon};

const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

// ---------------------------------------------------------------------------
// Camera lifecycle
// ---------------------------------------------------------------------------

#[test]
fn capture_sends_jpeg_frame_and_renders_result() {
    let mut dash = dashboard(ScriptedBackend::default());
    let mut camera = FakeCamera::new();
    dash.switch_tab(Tab::Face);

    assert!(dash.start_camera(&mut camera));
    assert_eq!(camera.opened_index, Some(0));
    assert!(dash.view().camera_active);

    let view = dash.capture_photo().expect("analysis succeeds");
    assert_eq!(
        dash.backend().calls(),
        vec![Call::EmotionUpload {
            filename: "capture.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            len: 6,
        }]
    );
    assert_eq!(view.dominant, "happiness");
    assert_eq!(view.icon, EmotionIcon::Happiness);
    assert_eq!(view.bars[0].label, "90.0%");
    assert_eq!(camera.live_tracks(), 1, "capturing keeps the camera open");

    let messages: Vec<String> = dash
        .drain_notifications()
        .into_iter()
        .map(|n| n.message)
        .collect();
    assert_eq!(
        messages,
        vec!["Analyzing emotions...", "Analysis completed successfully!"]
    );
}

#[test]
fn leaving_face_tab_stops_camera() {
    let mut dash = dashboard(ScriptedBackend::default());
    let mut camera = FakeCamera::new();
    dash.switch_tab(Tab::Face);
    dash.start_camera(&mut camera);

    dash.switch_tab(Tab::Models);
    assert_eq!(camera.live_tracks(), 0);
    assert!(!dash.view().camera_active);
}

#[test]
fn switching_between_other_tabs_leaves_camera_alone() {
    let mut dash = dashboard(ScriptedBackend::default());
    let mut camera = FakeCamera::new();
    dash.switch_tab(Tab::Face);
    dash.start_camera(&mut camera);
    dash.switch_tab(Tab::Face);

    assert_eq!(camera.live_tracks(), 1);
}

#[test]
fn stop_camera_releases_tracks_and_is_repeatable() {
    let mut dash = dashboard(ScriptedBackend::default());
    let mut camera = FakeCamera::new();
    dash.start_camera(&mut camera);

    dash.stop_camera();
    dash.stop_camera();
    assert_eq!(camera.live_tracks(), 0);
    assert!(dash.capture_photo().is_none());
}

#[test]
fn failed_capture_releases_camera() {
    let mut dash = dashboard(ScriptedBackend::default());
    let mut camera = FakeCamera::failing();
    dash.start_camera(&mut camera);

    assert!(dash.capture_photo().is_none());
    assert_eq!(camera.live_tracks(), 0);
    assert_eq!(dash.backend().calls(), Vec::new());

    let notes = dash.drain_notifications();
    assert_eq!(notes[0].level, Level::Error);
    assert_eq!(notes[0].message, "Could not access the camera");
}

#[test]
fn dropping_the_dashboard_releases_camera() {
    let mut camera = FakeCamera::new();
    {
        let mut dash = dashboard(ScriptedBackend::default());
        dash.start_camera(&mut camera);
    }
    assert_eq!(camera.live_tracks(), 0);
}

// ---------------------------------------------------------------------------
// Uploads
// ---------------------------------------------------------------------------

#[test]
fn uploaded_file_keeps_sniffed_type() {
    let mut dash = dashboard(ScriptedBackend::default());
    let upload = face::upload_from_bytes(PNG_HEADER.to_vec(), Some("me.png"));

    dash.analyze_emotion(&upload).expect("analysis succeeds");
    assert_eq!(
        dash.backend().calls(),
        vec![Call::EmotionUpload {
            filename: "me.png".to_string(),
            content_type: "image/png".to_string(),
            len: 8,
        }]
    );
}

#[test]
fn backend_error_message_is_shown() {
    let mut dash = dashboard(ScriptedBackend {
        emotion: Err(backend_error(400, "No face detected in the image")),
        ..ScriptedBackend::default()
    });
    let upload = face::upload_from_bytes(PNG_HEADER.to_vec(), None);

    assert!(dash.analyze_emotion(&upload).is_none());
    let notes = dash.drain_notifications();
    assert_eq!(notes[1].level, Level::Error);
    assert_eq!(notes[1].message, "Error: No face detected in the image");
    assert!(dash.view().emotion.is_none());
}

#[test]
fn network_failure_has_generic_message() {
    let mut dash = dashboard(ScriptedBackend {
        emotion: Err(network_error()),
        ..ScriptedBackend::default()
    });
    let upload = face::upload_from_bytes(PNG_HEADER.to_vec(), None);

    assert!(dash.analyze_emotion(&upload).is_none());
    assert_eq!(
        dash.drain_notifications()[1].message,
        "Error analyzing emotions"
    );
}
