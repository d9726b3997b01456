//! Native microphone capture through `cpal`.

use std::sync::mpsc::Sender;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::warn;

use super::{AudioFormat, AudioStream, CaptureSettings, Microphone};
use crate::media::{MediaError, MediaStream};

const DEVICE: &str = "microphone";

/// The host's default input device.
#[derive(Debug, Default)]
pub struct CpalMicrophone;

impl Microphone for CpalMicrophone {
    fn open(
        &mut self,
        settings: &CaptureSettings,
        chunks: Sender<Vec<u8>>,
    ) -> Result<Box<dyn AudioStream>, MediaError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(MediaError::NoDevice(DEVICE))?;
        let (config, sample_format) = pick_config(&device, settings.sample_rate)?;

        let sample_rate = config.sample_rate.0;
        let channels = config.channels;
        let chunk_samples = (sample_rate as u128 * channels as u128
            * settings.chunk_interval.as_millis()
            / 1000)
            .max(1) as usize;
        let mut writer = ChunkWriter::new(chunks, chunk_samples);

        let err_fn = |err: cpal::StreamError| warn!("microphone stream error: {err}");
        let stream = match sample_format {
            cpal::SampleFormat::I16 => device.build_input_stream(
                &config,
                move |data: &[i16], _| writer.push(data.iter().copied()),
                err_fn,
                None,
            ),
            cpal::SampleFormat::F32 => device.build_input_stream(
                &config,
                move |data: &[f32], _| writer.push(data.iter().map(|s| f32_to_i16(*s))),
                err_fn,
                None,
            ),
            cpal::SampleFormat::U16 => device.build_input_stream(
                &config,
                move |data: &[u16], _| {
                    writer.push(data.iter().map(|s| (*s as i32 - 32_768) as i16))
                },
                err_fn,
                None,
            ),
            other => {
                return Err(MediaError::Device {
                    device: DEVICE,
                    reason: format!("unsupported sample format {other:?}"),
                });
            }
        }
        .map_err(map_build_error)?;

        stream.play().map_err(|e| MediaError::Device {
            device: DEVICE,
            reason: e.to_string(),
        })?;

        Ok(Box::new(CpalStream {
            stream: Some(stream),
            format: AudioFormat::Pcm16 {
                sample_rate,
                channels,
            },
        }))
    }
}

/// Prefer a config at the requested rate, else the device default.
fn pick_config(
    device: &cpal::Device,
    requested_rate: u32,
) -> Result<(cpal::StreamConfig, cpal::SampleFormat), MediaError> {
    let rate = cpal::SampleRate(requested_rate);
    if let Ok(mut ranges) = device.supported_input_configs() {
        if let Some(range) =
            ranges.find(|r| r.min_sample_rate() <= rate && rate <= r.max_sample_rate())
        {
            let supported = range.with_sample_rate(rate);
            return Ok((supported.config(), supported.sample_format()));
        }
    }

    let supported = device.default_input_config().map_err(|e| MediaError::Device {
        device: DEVICE,
        reason: e.to_string(),
    })?;
    Ok((supported.config(), supported.sample_format()))
}

fn map_build_error(err: cpal::BuildStreamError) -> MediaError {
    match err {
        cpal::BuildStreamError::DeviceNotAvailable => MediaError::NoDevice(DEVICE),
        other => MediaError::Device {
            device: DEVICE,
            reason: other.to_string(),
        },
    }
}

fn f32_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

/// Buffers PCM samples and sends them as little-endian chunks of a fixed
/// sample count. The tail is flushed on drop, which happens when the
/// stream and its callback are dropped.
struct ChunkWriter {
    tx: Sender<Vec<u8>>,
    buffer: Vec<u8>,
    chunk_bytes: usize,
}

impl ChunkWriter {
    fn new(tx: Sender<Vec<u8>>, chunk_samples: usize) -> Self {
        let chunk_bytes = chunk_samples * 2;
        Self {
            tx,
            buffer: Vec::with_capacity(chunk_bytes),
            chunk_bytes,
        }
    }

    fn push(&mut self, samples: impl Iterator<Item = i16>) {
        for sample in samples {
            self.buffer.extend_from_slice(&sample.to_le_bytes());
            if self.buffer.len() >= self.chunk_bytes {
                self.flush();
            }
        }
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let chunk = std::mem::replace(&mut self.buffer, Vec::with_capacity(self.chunk_bytes));
        // The receiver is gone once the session has been dropped.
        let _ = self.tx.send(chunk);
    }
}

impl Drop for ChunkWriter {
    fn drop(&mut self) {
        self.flush();
    }
}

struct CpalStream {
    stream: Option<cpal::Stream>,
    format: AudioFormat,
}

impl MediaStream for CpalStream {
    fn active_tracks(&self) -> usize {
        usize::from(self.stream.is_some())
    }

    fn stop_all(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(err) = stream.pause() {
                warn!("failed to pause microphone stream: {err}");
            }
        }
    }
}

impl AudioStream for CpalStream {
    fn format(&self) -> AudioFormat {
        self.format.clone()
    }
}
