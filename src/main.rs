use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use jarvis::api::HttpBackend;
use jarvis::app::{Dashboard, DashboardSettings};
use jarvis::cli::{self, ImageSource, OutputFormat, VoiceSource};
use jarvis::{config, logging, web};

#[derive(Debug, Parser)]
#[command(name = "jarvis")]
#[command(about = "Client for the JARVIS machine-learning prediction backend")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check the prediction API and the voice and face services
    Status {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// List the available prediction models
    Models {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show the input form of a model with its example values
    Form {
        /// Model key, e.g. car_prices
        key: String,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Request a prediction, starting from the form's example values
    Predict {
        /// Model key, e.g. car_prices
        key: String,
        /// Override a form field (repeatable)
        #[arg(long = "set", value_name = "NAME=VALUE")]
        sets: Vec<String>,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Send a voice command from an audio file, typed text, or the microphone
    Voice {
        /// Audio file to send (wav, webm, ogg, mp3)
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Already-transcribed command text
        #[arg(long)]
        text: Option<String>,
        /// Seconds to record from the microphone
        #[arg(long)]
        seconds: Option<u64>,
        /// Speech recognition language, e.g. es-ES
        #[arg(long)]
        language: Option<String>,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Analyze emotions in an image file or a webcam frame
    Emotion {
        /// Image file to analyze
        #[arg(long, required_unless_present = "camera")]
        file: Option<PathBuf>,
        /// Capture one frame from the webcam instead
        #[arg(long, conflicts_with = "file")]
        camera: bool,
        /// Webcam index
        #[arg(long)]
        index: Option<u32>,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Launch the browser dashboard
    Web {
        /// Listen address (default from config: 127.0.0.1:9800)
        #[arg(long)]
        addr: Option<String>,
        /// Do not open a browser window
        #[arg(long)]
        no_open: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default config file to ~/.jarvis/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a single value, e.g. `api.base_url http://localhost:8000`
    Set { key: String, value: String },
    /// Reset the config file to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();
    let mut config = config::load();
    // Logging problems never stop a command.
    let _log_guard = logging::init(&config.logging).unwrap_or_else(|e| {
        eprintln!("warning: {e}");
        None
    });

    match app.command {
        Commands::Status { format } => cli::run_status(&config, fmt(&format)),
        Commands::Models { format } => cli::run_models(&config, fmt(&format)),
        Commands::Form { key, format } => cli::run_form(&key, fmt(&format)),
        Commands::Predict { key, sets, format } => {
            cli::run_predict(&config, &key, &sets, fmt(&format))
        }
        Commands::Voice {
            file,
            text,
            seconds,
            language,
            format,
        } => {
            if let Some(language) = language {
                config.voice.language_code = language;
            }
            let source = match (file, text) {
                (Some(path), _) => VoiceSource::File(path),
                (None, Some(text)) => VoiceSource::Text(text),
                (None, None) => VoiceSource::Microphone {
                    seconds: seconds.unwrap_or(config.voice.max_seconds),
                },
            };
            cli::run_voice(&config, source, fmt(&format))
        }
        Commands::Emotion {
            file,
            camera,
            index,
            format,
        } => {
            let source = match file {
                Some(path) if !camera => ImageSource::File(path),
                _ => ImageSource::Camera { index },
            };
            cli::run_emotion(&config, source, fmt(&format))
        }
        Commands::Web { addr, no_open } => {
            let addr = addr.unwrap_or_else(|| config.web.addr.clone());
            let dashboard = Dashboard::new(
                HttpBackend::from_config(&config.api),
                DashboardSettings::from_config(&config),
            );
            web::serve(&addr, config.web.open_browser && !no_open, dashboard)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}

fn fmt(format: &str) -> OutputFormat {
    OutputFormat::from_str_opt(Some(format))
}
