//! Native webcam capture through `nokhwa`.

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use tracing::warn;

use super::{Camera, FrameStream, encode_jpeg};
use crate::media::{MediaError, MediaStream};

const DEVICE: &str = "camera";

#[derive(Debug, Default)]
pub struct NokhwaCamera;

impl Camera for NokhwaCamera {
    fn open(&mut self, index: u32) -> Result<Box<dyn FrameStream>, MediaError> {
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera = nokhwa::Camera::new(CameraIndex::Index(index), requested)
            .map_err(|e| map_error(&e))?;
        camera.open_stream().map_err(|e| map_error(&e))?;
        Ok(Box::new(NokhwaStream {
            camera: Some(camera),
        }))
    }
}

fn map_error(err: &nokhwa::NokhwaError) -> MediaError {
    let reason = err.to_string();
    if reason.to_lowercase().contains("permission") {
        MediaError::PermissionDenied(DEVICE)
    } else {
        MediaError::Device {
            device: DEVICE,
            reason,
        }
    }
}

struct NokhwaStream {
    camera: Option<nokhwa::Camera>,
}

impl MediaStream for NokhwaStream {
    fn active_tracks(&self) -> usize {
        usize::from(self.camera.is_some())
    }

    fn stop_all(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(err) = camera.stop_stream() {
                warn!("failed to stop camera stream: {err}");
            }
        }
    }
}

impl FrameStream for NokhwaStream {
    fn capture_jpeg(&mut self, quality: u8) -> Result<Vec<u8>, MediaError> {
        let camera = self.camera.as_mut().ok_or(MediaError::NotRecording)?;
        let frame = camera.frame().map_err(|e| map_error(&e))?;
        let decoded = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| MediaError::Encode(e.to_string()))?;
        let (width, height) = (decoded.width(), decoded.height());
        encode_jpeg(&decoded.into_raw(), width, height, quality)
    }
}
