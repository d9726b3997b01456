//! Startup status checks.

use std::thread;

use serde::Serialize;
use tracing::debug;

use crate::api::{ApiError, Backend, HealthInfo, ModelDescriptor, ServiceStatus};

/// Shown when `/health` omits the loaded-model count.
const DEFAULT_MODEL_COUNT: &str = "9";
/// Shown when `/health` omits the version.
const DEFAULT_API_VERSION: &str = "v1.0";

/// Raw results of the three one-shot status checks.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChecks {
    pub health: Result<HealthInfo, ApiError>,
    pub voice: Result<ServiceStatus, ApiError>,
    pub face: Result<ServiceStatus, ApiError>,
}

/// Run the API, voice and face checks concurrently.
///
/// No ordering between them; each result is independent.
pub fn poll_status<B: Backend + ?Sized>(backend: &B) -> StatusChecks {
    thread::scope(|s| {
        let health = s.spawn(|| backend.health());
        let voice = s.spawn(|| backend.voice_status());
        let face = s.spawn(|| backend.face_status());
        StatusChecks {
            health: join(health),
            voice: join(voice),
            face: join(face),
        }
    })
}

/// Run the status checks and the catalog fetch together.
pub fn startup_checks<B: Backend + ?Sized>(
    backend: &B,
) -> (StatusChecks, Result<Vec<ModelDescriptor>, ApiError>) {
    thread::scope(|s| {
        let models = s.spawn(|| backend.list_models());
        let checks = poll_status(backend);
        (checks, join(models))
    })
}

/// A panicked check is reported like an unreachable backend.
fn join<T>(handle: thread::ScopedJoinHandle<'_, Result<T, ApiError>>) -> Result<T, ApiError> {
    handle.join().unwrap_or_else(|_| {
        Err(ApiError::Network {
            url: String::new(),
            reason: "status check panicked".to_string(),
        })
    })
}

/// Connection badge for the prediction API.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ApiBadge {
    /// Not checked yet.
    #[default]
    Unknown,
    Connected {
        model_count: String,
        version: String,
    },
    Disconnected,
}

/// Badge for an optional backend service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceBadge {
    /// Not checked yet, or the check failed.
    #[default]
    Unknown,
    Available,
    NotConfigured,
}

impl ServiceBadge {
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "?",
            Self::Available => "✓ Available",
            Self::NotConfigured => "✗ Not configured",
        }
    }
}

/// The dashboard's status indicators.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusBoard {
    pub api: ApiBadge,
    pub voice: ServiceBadge,
    pub face: ServiceBadge,
}

impl StatusBoard {
    /// Paint the badges from a round of checks.
    ///
    /// A failed service check leaves that badge untouched; only the API
    /// check flips to disconnected.
    pub fn apply(&mut self, checks: &StatusChecks) {
        self.api = match &checks.health {
            Ok(info) => ApiBadge::Connected {
                model_count: info
                    .models_loaded
                    .filter(|n| *n > 0)
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| DEFAULT_MODEL_COUNT.to_string()),
                version: info
                    .version
                    .clone()
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            },
            Err(_) => ApiBadge::Disconnected,
        };
        Self::paint(&mut self.voice, &checks.voice, "voice");
        Self::paint(&mut self.face, &checks.face, "face");
    }

    fn paint(badge: &mut ServiceBadge, result: &Result<ServiceStatus, ApiError>, name: &str) {
        match result {
            Ok(status) if status.available => *badge = ServiceBadge::Available,
            Ok(_) => *badge = ServiceBadge::NotConfigured,
            Err(err) => debug!(service = name, "status check failed: {err}"),
        }
    }

    pub fn api_online(&self) -> bool {
        matches!(self.api, ApiBadge::Connected { .. })
    }
}
