//! The dashboard shell.
//!
//! [`Dashboard`] owns an explicit [`AppState`] and a [`Backend`], and exposes
//! one method per user action. Every method updates the state, queues
//! [`Notification`]s, and returns the view the renderer should show; none of
//! them fail. The CLI and the web server are thin renderers over it.

mod notify;
mod status;
mod tab;

pub use notify::{Level, Notification};
pub use status::{ApiBadge, ServiceBadge, StatusBoard, StatusChecks, poll_status, startup_checks};
pub use tab::Tab;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::{ApiError, Backend, ImageUpload, ModelDescriptor};
use crate::catalog::{Catalog, CatalogOutcome, CatalogView, ModelInfoView};
use crate::config::JarvisConfig;
use crate::face::{self, Camera, CameraSession, EmotionView};
use crate::format::PredictionView;
use crate::forms::{FormError, FormState, FormView};
use crate::media::MediaError;
use crate::voice::{self, AudioBlob, CaptureSettings, Microphone, VoiceOutcome, VoiceView};

/// Runtime knobs the dashboard needs from the config.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSettings {
    pub language_code: String,
    pub min_audio_bytes: usize,
    pub capture: CaptureSettings,
    pub camera_index: u32,
    pub jpeg_quality: u8,
}

impl DashboardSettings {
    pub fn from_config(config: &JarvisConfig) -> Self {
        Self {
            language_code: config.voice.language_code.clone(),
            min_audio_bytes: config.voice.min_audio_bytes,
            capture: CaptureSettings::from_config(&config.voice),
            camera_index: config.face.camera_index,
            jpeg_quality: config.face.jpeg_quality,
        }
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self::from_config(&JarvisConfig::default())
    }
}

/// Everything the dashboard shows or holds open.
#[derive(Debug, Default)]
pub struct AppState {
    pub tab: Tab,
    pub status: StatusBoard,
    pub catalog: Catalog,
    /// Form of the selected model; `None` when nothing is selected or the
    /// model has no schema.
    pub form: Option<FormState>,
    /// Hidden on every model selection.
    pub prediction: Option<PredictionView>,
    pub voice: voice::VoiceSession,
    pub voice_view: VoiceView,
    pub camera: CameraSession,
    pub emotion: Option<EmotionView>,
}

/// The info panel and form for the selected model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelPanel {
    pub info: ModelInfoView,
    pub form: FormView,
}

/// Full render of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub tab: Tab,
    pub status: StatusBoard,
    pub catalog: CatalogView,
    pub model: Option<ModelPanel>,
    pub prediction: Option<PredictionView>,
    pub voice: VoiceView,
    pub camera_active: bool,
    pub emotion: Option<EmotionView>,
}

pub struct Dashboard<B> {
    backend: B,
    settings: DashboardSettings,
    state: AppState,
    notifications: Vec<Notification>,
}

impl<B: Backend> Dashboard<B> {
    pub fn new(backend: B, settings: DashboardSettings) -> Self {
        Self::with_state(backend, settings, AppState::default())
    }

    pub fn with_state(backend: B, settings: DashboardSettings, state: AppState) -> Self {
        Self {
            backend,
            settings,
            state,
            notifications: Vec::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    // -- notifications ----------------------------------------------------

    fn notify(&mut self, level: Level, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, message));
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Take every queued notification.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    // -- startup / status -------------------------------------------------

    /// Run the status checks and load the catalog, concurrently.
    pub fn startup(&mut self) -> CatalogOutcome {
        let (checks, models) = startup_checks(&self.backend);
        self.apply_status(&checks);
        self.apply_catalog(models)
    }

    pub fn refresh_status(&mut self) -> &StatusBoard {
        let checks = poll_status(&self.backend);
        self.apply_status(&checks);
        &self.state.status
    }

    fn apply_status(&mut self, checks: &StatusChecks) {
        self.state.status.apply(checks);
        if checks.health.is_err() {
            self.notify(
                Level::Error,
                "Could not connect to the backend. Make sure the server is running.",
            );
        }
    }

    // -- catalog ----------------------------------------------------------

    /// Fetch the catalog and select its first model.
    pub fn load_catalog(&mut self) -> CatalogOutcome {
        let models = self.backend.list_models();
        self.apply_catalog(models)
    }

    fn apply_catalog(&mut self, models: Result<Vec<ModelDescriptor>, ApiError>) -> CatalogOutcome {
        self.state.form = None;
        self.state.prediction = None;

        let outcome = self.state.catalog.apply(models);
        match &outcome {
            CatalogOutcome::Loaded(count) => {
                info!(count, "models loaded");
                self.select_index(0);
            }
            CatalogOutcome::Empty => self.notify(Level::Warning, "No models available"),
            CatalogOutcome::Failed(err) => warn!("could not load models: {err}"),
        }
        outcome
    }

    /// Select the catalog entry at `index`.
    pub fn select_index(&mut self, index: usize) -> Option<ModelPanel> {
        let key = self.state.catalog.select(index)?.model_key();
        self.state.form = key.map(FormState::new);
        self.state.prediction = None;
        debug!(index, "model selected");
        self.model_panel()
    }

    /// Select a model by key. A key missing from the catalog is fetched on
    /// its own from `/predictions/{key}/info`.
    pub fn select_key(&mut self, key: &str) -> Option<ModelPanel> {
        if let Some(index) = self.state.catalog.position(key) {
            return self.select_index(index);
        }
        match self.backend.model_info(key) {
            Ok(descriptor) => {
                self.state.catalog.set_single(descriptor);
                self.select_index(0)
            }
            Err(err) => {
                let message = err.user_message("Unknown model");
                self.notify(
                    Level::Error,
                    format!("Could not load model '{key}': {message}"),
                );
                None
            }
        }
    }

    pub fn model_panel(&self) -> Option<ModelPanel> {
        let selected = self.state.catalog.selected()?;
        let form = match &self.state.form {
            Some(form) => form.view(),
            None => FormView::Unavailable,
        };
        Some(ModelPanel {
            info: ModelInfoView::from(selected),
            form,
        })
    }

    // -- predictions ------------------------------------------------------

    /// Edit one field of the current form.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        self.state.form.as_mut().ok_or(FormError::NoForm)?.set(name, value)
    }

    /// Edit several fields at once. Either every value is applied or, on
    /// the first bad field, none is.
    pub fn set_fields<'a>(
        &mut self,
        values: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<(), FormError> {
        let mut form = self.state.form.clone().ok_or(FormError::NoForm)?;
        for (name, value) in values {
            form.set(name, value)?;
        }
        self.state.form = Some(form);
        Ok(())
    }

    /// Serialize the current form and request a prediction.
    ///
    /// Without a selected model no request is made.
    pub fn submit_prediction(&mut self) -> Option<PredictionView> {
        let selected = self
            .state
            .catalog
            .selected()
            .map(|model| (model.key.clone(), model.model_key()));
        let Some((key, model_key)) = selected else {
            self.notify(Level::Error, "Select a model first");
            return None;
        };

        let features = self
            .state
            .form
            .as_ref()
            .map(FormState::to_features)
            .unwrap_or_default();
        debug!(model = %key, ?features, "prediction request");

        match self.backend.predict(&key, &features) {
            Ok(result) => {
                let view = PredictionView::new(model_key, &result);
                info!(model = %key, value = %view.value, "prediction received");
                self.state.prediction = Some(view.clone());
                Some(view)
            }
            Err(err) => {
                let message = match &err {
                    ApiError::Network { .. } => "Could not complete the prediction".to_string(),
                    other => format!("Error: {}", other.user_message("Unknown error")),
                };
                self.notify(Level::Error, message);
                None
            }
        }
    }

    // -- tabs -------------------------------------------------------------

    /// Activate a tab. Leaving the face tab releases the camera.
    pub fn switch_tab(&mut self, tab: Tab) -> Tab {
        if self.state.tab == Tab::Face && tab != Tab::Face {
            self.state.camera.stop();
        }
        self.state.tab = tab;
        tab
    }

    // -- voice ------------------------------------------------------------

    /// Open the microphone and start recording.
    pub fn start_recording(&mut self, microphone: &mut dyn Microphone) -> bool {
        let settings = self.settings.capture.clone();
        match self.state.voice.start(microphone, &settings) {
            Ok(()) => {
                self.state.voice_view = VoiceView {
                    phase: voice::VoicePhase::Recording,
                    ..VoiceView::idle()
                };
                true
            }
            Err(MediaError::Busy) => {
                self.notify(Level::Warning, MediaError::Busy.user_message());
                false
            }
            Err(err) => {
                self.notify(Level::Error, err.user_message());
                false
            }
        }
    }

    /// Stop recording and send the captured audio.
    pub fn stop_recording(&mut self) -> VoiceView {
        match self.state.voice.stop() {
            Ok(blob) => self.process_audio(&blob),
            Err(err) => {
                self.state.voice.finish();
                let level = match err {
                    MediaError::NotRecording => Level::Warning,
                    _ => Level::Error,
                };
                self.notify(level, err.user_message());
                self.state.voice_view = VoiceView::idle();
                self.state.voice_view.clone()
            }
        }
    }

    /// Gate and send an assembled blob, then return to idle.
    pub fn process_audio(&mut self, blob: &AudioBlob) -> VoiceView {
        let outcome = voice::process_blob(
            &self.backend,
            blob,
            &self.settings.language_code,
            self.settings.min_audio_bytes,
        );
        self.finish_voice(outcome)
    }

    /// Send a typed command to the backend's text parser.
    pub fn parse_voice_text(&mut self, text: &str) -> VoiceView {
        let outcome = voice::process_text(&self.backend, text);
        self.finish_voice(outcome)
    }

    fn finish_voice(&mut self, outcome: VoiceOutcome) -> VoiceView {
        match &outcome {
            VoiceOutcome::TooShort { .. } => {
                self.notify(Level::Warning, "Audio too short. Try recording for longer.")
            }
            VoiceOutcome::Recognized(_) => self.notify(
                Level::Success,
                "Command recognized! Open the Models tab to run it.",
            ),
            VoiceOutcome::Unrecognized(_) => self.notify(
                Level::Warning,
                "Command not recognized. Try again with a valid command.",
            ),
            VoiceOutcome::Failed(ApiError::Network { .. }) => {
                self.notify(Level::Error, "Could not process the audio")
            }
            VoiceOutcome::Failed(err) => self.notify(
                Level::Error,
                format!("Error: {}", err.user_message("Error processing voice")),
            ),
        }
        self.state.voice.finish();
        self.state.voice_view = VoiceView::from_outcome(&outcome);
        self.state.voice_view.clone()
    }

    // -- camera / emotions ------------------------------------------------

    pub fn start_camera(&mut self, camera: &mut dyn Camera) -> bool {
        match self.state.camera.start(camera, self.settings.camera_index) {
            Ok(()) => true,
            Err(err) => {
                self.notify(Level::Error, err.user_message());
                false
            }
        }
    }

    pub fn stop_camera(&mut self) {
        self.state.camera.stop();
    }

    /// Capture a frame from the running camera and analyze it.
    pub fn capture_photo(&mut self) -> Option<EmotionView> {
        match self.state.camera.capture(self.settings.jpeg_quality) {
            Ok(jpeg) => self.analyze_emotion(&face::frame_upload(jpeg)),
            Err(err) => {
                self.notify(Level::Error, err.user_message());
                None
            }
        }
    }

    /// Send an image (camera frame or uploaded file) for emotion analysis.
    pub fn analyze_emotion(&mut self, upload: &ImageUpload) -> Option<EmotionView> {
        self.notify(Level::Info, "Analyzing emotions...");
        match face::analyze(&self.backend, upload) {
            Ok(result) => {
                let view = EmotionView::new(&result);
                self.state.emotion = Some(view.clone());
                self.notify(Level::Success, "Analysis completed successfully!");
                Some(view)
            }
            Err(ApiError::Network { .. }) => {
                self.notify(Level::Error, "Error analyzing emotions");
                None
            }
            Err(err) => {
                self.notify(
                    Level::Error,
                    format!("Error: {}", err.user_message("Error analyzing emotions")),
                );
                None
            }
        }
    }

    // -- render -----------------------------------------------------------

    pub fn view(&self) -> DashboardView {
        DashboardView {
            tab: self.state.tab,
            status: self.state.status.clone(),
            catalog: self.state.catalog.view(),
            model: self.model_panel(),
            prediction: self.state.prediction.clone(),
            voice: self.state.voice_view.clone(),
            camera_active: self.state.camera.is_active(),
            emotion: self.state.emotion.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_follow_config() {
        let mut config = JarvisConfig::default();
        config.voice.language_code = "en-US".to_string();
        config.face.camera_index = 2;
        let settings = DashboardSettings::from_config(&config);
        assert_eq!(settings.language_code, "en-US");
        assert_eq!(settings.camera_index, 2);
        assert_eq!(settings.min_audio_bytes, voice::MIN_AUDIO_BYTES);
    }
}
