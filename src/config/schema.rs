/// Configuration schema and defaults for jarvis.
///
/// Sections: `[api]`, `[voice]`, `[face]`, `[web]` and `[logging]`. Every
/// field has a built-in default; config files only need the values they
/// change.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level jarvis configuration.
///
/// Maps directly to `~/.jarvis/config.toml` and `.jarvis.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JarvisConfig {
    pub api: ApiConfig,
    pub voice: VoiceConfig,
    pub face: FaceConfig,
    pub web: WebConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [api]
// ---------------------------------------------------------------------------

/// Prediction backend connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend base URL, e.g. `http://localhost:8000`.
    pub base_url: String,
    /// Read/write timeout for every backend call (milliseconds).
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_ms: 30_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [voice]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// BCP-47 language sent with every voice command.
    pub language_code: String,
    /// Recordings smaller than this are not sent.
    pub min_audio_bytes: usize,
    /// Recorder chunk interval (milliseconds).
    pub chunk_ms: u64,
    /// Requested capture sample rate (Hz).
    pub sample_rate: u32,
    /// Default length of a `jarvis voice` microphone recording (seconds).
    pub max_seconds: u64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            language_code: "es-ES".to_string(),
            min_audio_bytes: crate::voice::MIN_AUDIO_BYTES,
            chunk_ms: 100,
            sample_rate: 48_000,
            max_seconds: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// [face]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceConfig {
    /// Index of the webcam used by `jarvis emotion --camera`.
    pub camera_index: u32,
    /// JPEG quality for captured frames (1-100).
    pub jpeg_quality: u8,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            camera_index: 0,
            jpeg_quality: 90,
        }
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

/// Local dashboard server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Listen address for `jarvis web`.
    pub addr: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:9800".to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether to also write logs to `path`.
    pub enabled: bool,
    /// Log file. `~` is expanded to the home directory.
    pub path: String,
    /// Filter directive: `"error"`, `"warn"`, `"info"`, `"debug"`, or any
    /// `tracing` filter. `RUST_LOG` takes precedence.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.jarvis/jarvis.log".to_string(),
            level: "warn".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML
// ---------------------------------------------------------------------------

impl JarvisConfig {
    /// Annotated default config written by `jarvis config init`.
    pub fn default_toml() -> String {
        r#"# jarvis configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (JARVIS_*)
#   2. Project config (.jarvis.toml in current directory)
#   3. User global config (~/.jarvis/config.toml)
#   4. Built-in defaults

[api]
base_url = "http://localhost:8000"    # JARVIS_API_URL
timeout_ms = 30000                    # JARVIS_API_TIMEOUT_MS

[voice]
language_code = "es-ES"               # JARVIS_LANGUAGE
min_audio_bytes = 1000                # Shorter recordings are not sent
chunk_ms = 100
sample_rate = 48000
max_seconds = 10                      # Default `jarvis voice` recording length

[face]
camera_index = 0
jpeg_quality = 90

[web]
addr = "127.0.0.1:9800"               # JARVIS_WEB_ADDR
open_browser = true

[logging]
enabled = true
path = "~/.jarvis/jarvis.log"
level = "warn"                        # JARVIS_LOG_LEVEL; RUST_LOG wins
"#
        .to_string()
    }
}
