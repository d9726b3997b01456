//! Embedded browser dashboard for jarvis.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A single-page dashboard with the four tabs (dashboard, models, voice,
//!   face)
//! - JSON endpoints that drive the [`Dashboard`] state machine
//!
//! The browser owns the microphone and the camera: it records or captures
//! locally and posts the raw bytes here, where they go through the same
//! gates and formatting as the CLI.
//!
//! Launched via `jarvis web` (default: `http://127.0.0.1:9800`).

mod api;
mod frontend;

use std::io::{Cursor, Read};

use anyhow::{Context, Result};
use serde_json::Value;
use tiny_http::{Header, Method, Response, Server, StatusCode};
use tracing::{debug, warn};

use crate::api::Backend;
use crate::app::Dashboard;

pub use frontend::INDEX_HTML;

/// Request bodies are read up to this many bytes.
const MAX_BODY_BYTES: u64 = 16 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the web dashboard server on the given address.
///
/// Blocks the current thread. Requests are handled one at a time by the
/// loop that owns `dashboard`, so every action sees the state left by the
/// previous one.
pub fn serve<B: Backend>(addr: &str, open: bool, mut dashboard: Dashboard<B>) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("jarvis dashboard running at http://{addr}");
    println!("Press Ctrl+C to stop.\n");

    if open && let Err(e) = open_browser(&format!("http://{addr}")) {
        debug!("could not open browser: {e:#}");
    }

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();
        let content_type = request
            .headers()
            .iter()
            .find(|h| h.field.equiv("Content-Type"))
            .map(|h| h.value.as_str().to_string());

        let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
            read_body(request.as_reader(), MAX_BODY_BYTES)
        } else {
            Ok(Vec::new())
        };

        let reply = match body {
            Ok(body) => route(
                &mut dashboard,
                &method,
                &url,
                &body,
                content_type.as_deref(),
            ),
            Err(reply) => reply,
        };
        let status = reply.status();
        if let Err(e) = request.respond(reply.into_response()) {
            debug!("failed to send response: {e}");
        }

        // Brief access log
        println!(
            "{} {} {} {}",
            method,
            url,
            status,
            chrono::Local::now().format("%H:%M:%S")
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// What a route produced, before it becomes an HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Html(&'static str),
    Json(u16, Value),
}

impl Reply {
    pub fn status(&self) -> u16 {
        match self {
            Self::Html(_) => 200,
            Self::Json(status, _) => *status,
        }
    }

    fn into_response(self) -> Response<Cursor<Vec<u8>>> {
        match self {
            Self::Html(html) => Response::from_data(html.as_bytes().to_vec())
                .with_header(content_type_html())
                .with_status_code(StatusCode(200)),
            Self::Json(status, value) => Response::from_data(value.to_string().into_bytes())
                .with_header(content_type_json())
                .with_status_code(StatusCode(status)),
        }
    }
}

/// Dispatch one request against the dashboard.
pub fn route<B: Backend>(
    dashboard: &mut Dashboard<B>,
    method: &Method,
    url: &str,
    body: &[u8],
    content_type: Option<&str>,
) -> Reply {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);

    let result = match (method, path) {
        // Frontend
        (&Method::Get, "/") | (&Method::Get, "/index.html") => return Reply::Html(INDEX_HTML),

        // Dashboard state
        (&Method::Get, "/api/state") => Ok(api::state(dashboard)),
        (&Method::Post, "/api/startup") => Ok(api::startup(dashboard)),
        (&Method::Post, "/api/status") => Ok(api::refresh_status(dashboard)),

        // Models and predictions
        (&Method::Post, "/api/models/reload") => Ok(api::reload_models(dashboard)),
        (&Method::Post, "/api/predict") => api::predict(dashboard, body),

        // Voice
        (&Method::Post, "/api/voice") => Ok(api::voice_audio(dashboard, body, content_type)),
        (&Method::Post, "/api/voice/text") => api::voice_text(dashboard, body),

        // Face
        (&Method::Post, "/api/emotion") => Ok(api::emotion(dashboard, body)),

        (&Method::Post, p) => {
            if let Some(key) = p
                .strip_prefix("/api/models/")
                .and_then(|rest| rest.strip_suffix("/select"))
            {
                Ok(api::select_model(dashboard, key))
            } else if let Some(name) = p.strip_prefix("/api/tab/") {
                api::switch_tab(dashboard, name)
            } else {
                return not_found();
            }
        }

        _ => return not_found(),
    };

    match result {
        Ok(value) => Reply::Json(200, value),
        Err(e) => error_reply(400, format!("{e:#}")),
    }
}

/// Read a request body of at most `limit` bytes. Oversized or unreadable
/// bodies become an error reply instead of a truncated payload.
pub fn read_body(reader: impl Read, limit: u64) -> Result<Vec<u8>, Reply> {
    let mut body = Vec::new();
    if let Err(e) = reader.take(limit + 1).read_to_end(&mut body) {
        warn!("failed to read request body: {e}");
        return Err(error_reply(400, format!("could not read request body: {e}")));
    }
    if body.len() as u64 > limit {
        warn!(limit, "request body too large");
        return Err(error_reply(413, format!("request body exceeds {limit} bytes")));
    }
    Ok(body)
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn error_reply(status: u16, message: String) -> Reply {
    Reply::Json(status, serde_json::json!({ "error": message }))
}

fn not_found() -> Reply {
    Reply::Json(404, serde_json::json!({ "error": "not found" }))
}

/// JSON content type header.
fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8")
        .expect("static header is valid")
}

/// HTML content type header.
fn content_type_html() -> Header {
    Header::from_bytes("Content-Type", "text/html; charset=utf-8")
        .expect("static header is valid")
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}
