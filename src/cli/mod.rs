//! CLI command implementations.
//!
//! Provides subcommand handlers for:
//! - `jarvis status`: backend, voice and face service status
//! - `jarvis models`: list the prediction models
//! - `jarvis form <key>`: show a model's input form with example values
//! - `jarvis predict <key> --set name=value`: request a prediction
//! - `jarvis voice`: send a voice command (file, text, or microphone)
//! - `jarvis emotion`: analyze emotions in an image or a webcam frame
//! - `jarvis config show|init|set|reset`: configuration management

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::api::HttpBackend;
use crate::app::{
    ApiBadge, Dashboard, DashboardSettings, Level, Notification, ServiceBadge, StatusBoard,
};
use crate::catalog::{CatalogNotice, CatalogOutcome, CatalogView, ModelKey};
use crate::config::{self, JarvisConfig};
use crate::face::{self, EmotionView};
use crate::format::PredictionView;
use crate::forms::{self, Control, FormView};
use crate::voice::{AudioBlob, VoiceView};

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

/// Where `jarvis voice` takes its command from.
#[derive(Debug, Clone, PartialEq)]
pub enum VoiceSource {
    File(PathBuf),
    Text(String),
    Microphone { seconds: u64 },
}

/// Where `jarvis emotion` takes its image from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    File(PathBuf),
    Camera { index: Option<u32> },
}

fn dashboard(config: &JarvisConfig) -> Dashboard<HttpBackend> {
    Dashboard::new(
        HttpBackend::from_config(&config.api),
        DashboardSettings::from_config(config),
    )
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("failed to serialize output")?
    );
    Ok(())
}

/// Notifications go to stderr so JSON output stays parseable.
fn print_notifications(notifications: &[Notification]) {
    for n in notifications {
        let tag = match n.level {
            Level::Success => "✓".green().bold(),
            Level::Error => "✗".red().bold(),
            Level::Warning => "!".yellow().bold(),
            Level::Info => "·".cyan().bold(),
        };
        eprintln!("{tag} {}", n.message);
    }
}

// ---------------------------------------------------------------------------
// jarvis status
// ---------------------------------------------------------------------------

pub fn run_status(config: &JarvisConfig, format: OutputFormat) -> Result<()> {
    let mut dash = dashboard(config);
    let board = dash.refresh_status().clone();
    print_notifications(&dash.drain_notifications());

    match format {
        OutputFormat::Json => print_json(&board)?,
        OutputFormat::Table => print_status_table(&board, &config.api.base_url),
    }
    Ok(())
}

fn print_status_table(board: &StatusBoard, base_url: &str) {
    println!("{}", "Jarvis Status".bold().cyan());
    println!("{}", "=".repeat(40));

    match &board.api {
        ApiBadge::Connected {
            model_count,
            version,
        } => {
            print_status_item("API", true, &format!("connected at {base_url}"));
            print_status_item("Models loaded", true, model_count);
            print_status_item("API version", true, version);
        }
        ApiBadge::Disconnected | ApiBadge::Unknown => {
            print_status_item("API", false, &format!("not reachable at {base_url}"));
        }
    }

    for (name, badge) in [("Voice service", board.voice), ("Face service", board.face)] {
        print_status_item(
            name,
            badge == ServiceBadge::Available,
            badge.label(),
        );
    }
}

fn print_status_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<16} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// jarvis models
// ---------------------------------------------------------------------------

pub fn run_models(config: &JarvisConfig, format: OutputFormat) -> Result<()> {
    let mut dash = dashboard(config);
    let outcome = dash.load_catalog();
    print_notifications(&dash.drain_notifications());
    let view = dash.state().catalog.view();

    match format {
        OutputFormat::Json => print_json(&view)?,
        OutputFormat::Table => print_models_table(&view),
    }

    if let CatalogOutcome::Failed(err) = outcome {
        return Err(err).context("could not load models");
    }
    Ok(())
}

fn print_models_table(view: &CatalogView) {
    println!("{}", "Prediction Models".bold().cyan());
    println!("{}", "=".repeat(60));

    match &view.notice {
        Some(CatalogNotice::Empty) => {
            println!("{}", "No models available.".yellow());
            return;
        }
        Some(CatalogNotice::Error(message)) => {
            println!("{}", message.red());
            return;
        }
        None => {}
    }

    println!("  {:<3} {:<18} {:<28} Task", "#", "Key", "Name");
    println!("  {}", "-".repeat(58));
    for (i, entry) in view.entries.iter().enumerate() {
        let marker = if entry.active { "›" } else { " " };
        let line = format!(
            "{marker} {:<3} {:<18} {:<28} {}",
            entry.index,
            truncate(&entry.key, 18),
            truncate(&entry.name, 28),
            entry.task,
        );
        if i % 2 == 0 {
            println!("{}", line);
        } else {
            println!("{}", line.dimmed());
        }
    }
}

// ---------------------------------------------------------------------------
// jarvis form
// ---------------------------------------------------------------------------

/// Show the input form for a model. Needs no backend.
pub fn run_form(key: &str, format: OutputFormat) -> Result<()> {
    let form = forms::build_form(ModelKey::parse(key));
    match format {
        OutputFormat::Json => print_json(&form)?,
        OutputFormat::Table => print_form_table(key, &form),
    }
    Ok(())
}

fn print_form_table(key: &str, form: &FormView) {
    println!("{} {}", "Input form:".bold().cyan(), key.bold());
    println!("{}", "=".repeat(60));

    let FormView::Fields(fields) = form else {
        println!("{}", "Form not available for this model.".yellow());
        return;
    };

    for field in fields {
        let detail = match &field.control {
            Control::Select { options, value } => {
                format!("{value}  {}", format!("[{}]", options.join(" | ")).dimmed())
            }
            Control::Number { value, step, .. } => {
                format!("{value}  {}", format!("(number, step {step})").dimmed())
            }
            Control::Text { value, .. } => format!("{value}  {}", "(text)".dimmed()),
        };
        println!("  {:<22} {}", field.name.bold(), detail);
        println!("  {:<22} {}", "", field.label.dimmed());
    }
}

// ---------------------------------------------------------------------------
// jarvis predict
// ---------------------------------------------------------------------------

pub fn run_predict(
    config: &JarvisConfig,
    key: &str,
    assignments: &[String],
    format: OutputFormat,
) -> Result<()> {
    let mut dash = dashboard(config);
    if let CatalogOutcome::Failed(err) = dash.load_catalog() {
        tracing::debug!("catalog unavailable, fetching model info directly: {err}");
    }
    if dash.select_key(key).is_none() {
        print_notifications(&dash.drain_notifications());
        anyhow::bail!("model '{key}' is not available");
    }

    let values = assignments
        .iter()
        .map(|assignment| {
            assignment
                .split_once('=')
                .map(|(name, value)| (name.trim(), value))
                .with_context(|| format!("expected name=value, got '{assignment}'"))
        })
        .collect::<Result<Vec<_>>>()?;
    dash.set_fields(values)?;

    let prediction = dash.submit_prediction();
    print_notifications(&dash.drain_notifications());
    let prediction = prediction.context("prediction failed")?;

    match format {
        OutputFormat::Json => print_json(&prediction)?,
        OutputFormat::Table => print_prediction(&prediction),
    }
    Ok(())
}

fn print_prediction(view: &PredictionView) {
    println!("{}", "Prediction Result".bold().cyan());
    println!("{}", "=".repeat(40));
    println!("  {} {}", "Model:     ".bold(), view.dataset);
    println!("  {} {}", "Label:     ".bold(), view.label.dimmed());
    println!("  {} {}", "Value:     ".bold(), view.value.green().bold());
    if let Some(confidence) = &view.confidence {
        println!(
            "  {} {} {}",
            "Confidence:".bold(),
            bar(confidence.width, 20),
            confidence.label
        );
    }
    println!("  {} {}", "Task type: ".bold(), view.task_type);
}

// ---------------------------------------------------------------------------
// jarvis voice
// ---------------------------------------------------------------------------

pub fn run_voice(config: &JarvisConfig, source: VoiceSource, format: OutputFormat) -> Result<()> {
    let mut dash = dashboard(config);

    let view = match source {
        VoiceSource::Text(text) => dash.parse_voice_text(&text),
        VoiceSource::File(path) => {
            let blob = AudioBlob::from_file(&path)
                .with_context(|| format!("failed to read audio file {}", path.display()))?;
            dash.process_audio(&blob)
        }
        VoiceSource::Microphone { seconds } => record_voice(&mut dash, seconds)?,
    };
    print_notifications(&dash.drain_notifications());

    match format {
        OutputFormat::Json => print_json(&view)?,
        OutputFormat::Table => print_voice(&view),
    }
    Ok(())
}

#[cfg(feature = "microphone")]
fn record_voice(dash: &mut Dashboard<HttpBackend>, seconds: u64) -> Result<VoiceView> {
    let mut microphone = crate::voice::mic::CpalMicrophone;
    if !dash.start_recording(&mut microphone) {
        print_notifications(&dash.drain_notifications());
        anyhow::bail!("could not start recording");
    }
    eprintln!(
        "{} Recording for {seconds}s... say your command now",
        "●".red().bold()
    );
    std::thread::sleep(std::time::Duration::from_secs(seconds));
    eprintln!("{}", "Processing audio...".dimmed());
    Ok(dash.stop_recording())
}

#[cfg(not(feature = "microphone"))]
fn record_voice(_dash: &mut Dashboard<HttpBackend>, _seconds: u64) -> Result<VoiceView> {
    anyhow::bail!(
        "microphone capture is not available in this build (enable the `microphone` feature), use --file or --text"
    )
}

fn print_voice(view: &VoiceView) {
    let Some(transcript) = &view.transcript else {
        return;
    };
    println!("{}", "Voice Command".bold().cyan());
    println!("{}", "=".repeat(40));
    println!("  {} \"{}\"", "Transcript:".bold(), transcript);
    if let Some(model) = &view.detected_model {
        println!("  {} {}", "Model:     ".bold(), model.green().bold());
    }
}

// ---------------------------------------------------------------------------
// jarvis emotion
// ---------------------------------------------------------------------------

pub fn run_emotion(config: &JarvisConfig, source: ImageSource, format: OutputFormat) -> Result<()> {
    let mut config = config.clone();
    if let ImageSource::Camera { index: Some(index) } = source {
        config.face.camera_index = index;
    }
    let mut dash = dashboard(&config);

    let view = match source {
        ImageSource::File(path) => {
            let upload = face::upload_from_path(&path)
                .with_context(|| format!("failed to read image {}", path.display()))?;
            dash.analyze_emotion(&upload)
        }
        ImageSource::Camera { .. } => capture_emotion(&mut dash)?,
    };
    print_notifications(&dash.drain_notifications());
    let view = view.context("emotion analysis failed")?;

    match format {
        OutputFormat::Json => print_json(&view)?,
        OutputFormat::Table => print_emotion(&view),
    }
    Ok(())
}

#[cfg(feature = "webcam")]
fn capture_emotion(dash: &mut Dashboard<HttpBackend>) -> Result<Option<EmotionView>> {
    let mut camera = crate::face::webcam::NokhwaCamera;
    dash.switch_tab(crate::app::Tab::Face);
    if !dash.start_camera(&mut camera) {
        print_notifications(&dash.drain_notifications());
        anyhow::bail!("could not start the camera");
    }
    let view = dash.capture_photo();
    dash.stop_camera();
    Ok(view)
}

#[cfg(not(feature = "webcam"))]
fn capture_emotion(_dash: &mut Dashboard<HttpBackend>) -> Result<Option<EmotionView>> {
    anyhow::bail!(
        "webcam capture is not available in this build (enable the `webcam` feature), use --file"
    )
}

fn print_emotion(view: &EmotionView) {
    println!("{}", "Emotion Analysis".bold().cyan());
    println!("{}", "=".repeat(50));
    println!(
        "  {} {} {}",
        "Dominant:  ".bold(),
        view.icon.glyph(),
        view.dominant.bold()
    );
    println!("  {} {}", "Confidence:".bold(), view.confidence);
    println!("  {} {}", "Faces:     ".bold(), view.num_faces);
    if let Some(message) = &view.message {
        println!("  {} {}", "Message:   ".bold(), message.dimmed());
    }
    println!();
    for b in &view.bars {
        let name = if b.emotion == view.dominant {
            b.emotion.bold()
        } else {
            b.emotion.normal()
        };
        println!("  {:<12} {} {:>6}", name, bar(b.width, 30), b.label);
    }
}

// ---------------------------------------------------------------------------
// jarvis config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective Jarvis Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    if global_exists {
        println!("  {} {}", "✓".green(), "~/.jarvis/config.toml".dimmed());
    } else {
        println!(
            "  {} {}",
            "·".dimmed(),
            "~/.jarvis/config.toml (not found)".dimmed()
        );
    }
    if project_exists {
        println!("  {} {}", "✓".green(), ".jarvis.toml".dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), ".jarvis.toml (not found)".dimmed());
    }
    println!(
        "  {} {}",
        "·".dimmed(),
        "JARVIS_* environment variables".dimmed()
    );

    Ok(())
}

/// Initialize a default config file at `~/.jarvis/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A horizontal bar `width` percent full, `cells` characters long.
fn bar(width: f64, cells: usize) -> String {
    let filled = ((width.clamp(0.0, 100.0) / 100.0) * cells as f64).round() as usize;
    format!(
        "{}{}",
        "█".repeat(filled).cyan(),
        "░".repeat(cells - filled).dimmed()
    )
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
