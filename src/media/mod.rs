//! Device stream ownership shared by the voice and camera pipelines.
//!
//! Capture devices are exclusive. Every open stream lives inside a
//! [`StreamGuard`]; dropping the guard stops all of the stream's tracks, so
//! the device is released on every exit path including early returns and
//! errors.

use thiserror::Error;

/// Failures acquiring or using a capture device.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    #[error("permission to use the {0} was denied")]
    PermissionDenied(&'static str),
    #[error("no {0} device found")]
    NoDevice(&'static str),
    #[error("{device} error: {reason}")]
    Device { device: &'static str, reason: String },
    #[error("a recording is already in progress")]
    Busy,
    #[error("no recording in progress")]
    NotRecording,
    #[error("could not encode captured media: {0}")]
    Encode(String),
    #[error("{0} capture is not available in this build")]
    Unsupported(&'static str),
}

impl MediaError {
    /// The notification shown for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::PermissionDenied(device) | Self::NoDevice(device) => {
                format!("Could not access the {device}")
            }
            Self::Device { device, .. } => format!("Could not access the {device}"),
            other => capitalize(&other.to_string()),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A live capture stream made of one or more tracks.
pub trait MediaStream {
    /// Tracks still delivering data.
    fn active_tracks(&self) -> usize;

    /// Stop every track. Must be idempotent.
    fn stop_all(&mut self);
}

impl<S: MediaStream + ?Sized> MediaStream for Box<S> {
    fn active_tracks(&self) -> usize {
        (**self).active_tracks()
    }

    fn stop_all(&mut self) {
        (**self).stop_all();
    }
}

/// Owns a stream and stops it on drop.
pub struct StreamGuard<S: MediaStream> {
    stream: Option<S>,
}

impl<S: MediaStream> StreamGuard<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream: Some(stream),
        }
    }

    pub fn stream(&self) -> Option<&S> {
        self.stream.as_ref()
    }

    pub fn stream_mut(&mut self) -> Option<&mut S> {
        self.stream.as_mut()
    }

    pub fn active_tracks(&self) -> usize {
        self.stream.as_ref().map_or(0, MediaStream::active_tracks)
    }

    /// Stop the stream now. Later calls and the eventual drop are no-ops.
    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop_all();
            tracing::debug!("media stream released");
        }
    }
}

impl<S: MediaStream> Drop for StreamGuard<S> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<S: MediaStream> std::fmt::Debug for StreamGuard<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamGuard")
            .field("active_tracks", &self.active_tracks())
            .finish()
    }
}
