/// Voice pipeline tests.
///
/// Exercises the recorder state machine with a fake microphone and checks
/// the minimum-size gate in front of `POST /voice/command`.
mod common;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use common::{Call, FakeMicrophone, ScriptedBackend, dashboard, network_error};
use jarvis::api::VoiceCommandResult;
use jarvis::app::Level;
use jarvis::voice::{AudioBlob, VoicePhase};

fn voice_calls(backend: &ScriptedBackend) -> usize {
    backend.count(|c| matches!(c, Call::VoiceCommand { .. }))
}

// ---------------------------------------------------------------------------
// Size gate
// ---------------------------------------------------------------------------

#[test]
fn blob_below_minimum_is_not_sent() {
    let mut dash = dashboard(ScriptedBackend::default());
    let view = dash.process_audio(&AudioBlob::new(vec![0; 999], "audio/webm"));

    assert_eq!(voice_calls(dash.backend()), 0);
    assert_eq!(view.phase, VoicePhase::Idle);
    assert!(view.transcript.is_none());

    let notes = dash.drain_notifications();
    assert_eq!(notes[0].level, Level::Warning);
    assert_eq!(
        notes[0].message,
        "Audio too short. Try recording for longer."
    );
}

#[test]
fn blob_at_minimum_is_sent_base64_encoded() {
    let mut dash = dashboard(ScriptedBackend::default());
    dash.process_audio(&AudioBlob::new(vec![7; 1000], "audio/webm"));

    let calls = dash.backend().calls();
    assert_eq!(calls.len(), 1);
    let Call::VoiceCommand {
        audio_base64,
        language,
    } = &calls[0]
    else {
        panic!("expected a voice command, got {calls:?}");
    };
    assert_eq!(STANDARD.decode(audio_base64).unwrap(), vec![7; 1000]);
    assert_eq!(language, "es-ES");
}

// ---------------------------------------------------------------------------
// Recorder
// ---------------------------------------------------------------------------

#[test]
fn recording_round_trip_releases_microphone() {
    let mut dash = dashboard(ScriptedBackend::default());
    let mut mic = FakeMicrophone::recording(1500);

    assert!(dash.start_recording(&mut mic));
    assert_eq!(mic.live_tracks(), 1);
    assert_eq!(dash.state().voice.phase(), VoicePhase::Recording);
    assert_eq!(dash.view().voice.phase, VoicePhase::Recording);

    let view = dash.stop_recording();
    assert_eq!(mic.live_tracks(), 0);
    assert_eq!(dash.state().voice.phase(), VoicePhase::Idle);
    assert_eq!(view.transcript.as_deref(), Some("predict car price"));
    assert_eq!(view.detected_model.as_deref(), Some("car_prices"));
    assert_eq!(voice_calls(dash.backend()), 1);

    let notes = dash.drain_notifications();
    assert_eq!(notes[0].level, Level::Success);
    assert_eq!(
        notes[0].message,
        "Command recognized! Open the Models tab to run it."
    );
}

#[test]
fn short_recording_releases_microphone_without_request() {
    let mut dash = dashboard(ScriptedBackend::default());
    let mut mic = FakeMicrophone::recording(300);

    dash.start_recording(&mut mic);
    dash.stop_recording();

    assert_eq!(mic.live_tracks(), 0);
    assert_eq!(voice_calls(dash.backend()), 0);
    assert_eq!(dash.state().voice.phase(), VoicePhase::Idle);
}

#[test]
fn second_start_while_recording_is_rejected() {
    let mut dash = dashboard(ScriptedBackend::default());
    let mut mic = FakeMicrophone::recording(1500);
    let mut other = FakeMicrophone::recording(1500);

    assert!(dash.start_recording(&mut mic));
    assert!(!dash.start_recording(&mut other));
    assert_eq!(other.live_tracks(), 0);
    assert_eq!(dash.state().voice.active_tracks(), 1);

    let notes = dash.drain_notifications();
    assert_eq!(notes[0].level, Level::Warning);
}

#[test]
fn denied_microphone_stays_idle() {
    let mut dash = dashboard(ScriptedBackend::default());
    let mut mic = FakeMicrophone::denied();

    assert!(!dash.start_recording(&mut mic));
    assert_eq!(dash.state().voice.phase(), VoicePhase::Idle);

    let notes = dash.drain_notifications();
    assert_eq!(notes[0].level, Level::Error);
    assert_eq!(notes[0].message, "Could not access the microphone");
}

#[test]
fn stop_without_recording_warns() {
    let mut dash = dashboard(ScriptedBackend::default());
    let view = dash.stop_recording();

    assert_eq!(view.phase, VoicePhase::Idle);
    assert_eq!(dash.drain_notifications()[0].level, Level::Warning);
}

#[test]
fn dropping_the_dashboard_releases_an_open_recording() {
    let mut mic = FakeMicrophone::recording(1500);
    {
        let mut dash = dashboard(ScriptedBackend::default());
        dash.start_recording(&mut mic);
        assert_eq!(mic.live_tracks(), 1);
    }
    assert_eq!(mic.live_tracks(), 0);
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[test]
fn unrecognized_command_shows_transcript_only() {
    let mut dash = dashboard(ScriptedBackend {
        voice: Ok(VoiceCommandResult {
            transcript: "what time is it".to_string(),
            command_recognized: false,
            dataset_key: None,
            confidence: None,
        }),
        ..ScriptedBackend::default()
    });

    let view = dash.process_audio(&AudioBlob::new(vec![1; 2048], "audio/webm"));
    assert_eq!(view.transcript.as_deref(), Some("what time is it"));
    assert!(view.detected_model.is_none());
    assert_eq!(
        dash.drain_notifications()[0].message,
        "Command not recognized. Try again with a valid command."
    );
}

#[test]
fn recognized_without_key_counts_as_unrecognized() {
    let mut dash = dashboard(ScriptedBackend {
        voice: Ok(VoiceCommandResult {
            transcript: "predict".to_string(),
            command_recognized: true,
            dataset_key: None,
            confidence: None,
        }),
        ..ScriptedBackend::default()
    });

    let view = dash.parse_voice_text("predict");
    assert!(view.detected_model.is_none());
    assert_eq!(dash.drain_notifications()[0].level, Level::Warning);
}

#[test]
fn typed_text_goes_to_parser() {
    let mut dash = dashboard(ScriptedBackend::default());
    let view = dash.parse_voice_text("predice el precio del coche");

    assert_eq!(
        dash.backend().calls(),
        vec![Call::ParseVoiceText("predice el precio del coche".to_string())]
    );
    assert_eq!(view.detected_model.as_deref(), Some("car_prices"));
}

#[test]
fn network_failure_returns_to_idle() {
    let mut dash = dashboard(ScriptedBackend {
        voice: Err(network_error()),
        ..ScriptedBackend::default()
    });
    let mut mic = FakeMicrophone::recording(1500);

    dash.start_recording(&mut mic);
    let view = dash.stop_recording();

    assert_eq!(view.phase, VoicePhase::Idle);
    assert!(view.transcript.is_none());
    assert_eq!(mic.live_tracks(), 0);
    assert_eq!(
        dash.drain_notifications()[0].message,
        "Could not process the audio"
    );
}
