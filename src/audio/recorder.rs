//! System microphone recording via CPAL.
//!
//! Handles device enumeration and format conversion. All supported sample
//! formats are converted to mono f32 at the device rate; fragments flow to
//! the caller through a bounded channel fed by the device callback.

use super::dispatch::FragmentDispatcher;
use super::meter::{rms_db, LiveMeter, METER_FLOOR_DB};
use super::session::{CaptureMetrics, CaptureResult, CaptureSession, StopReason};
use crate::config::CaptureConfig;
use crate::log_debug;
use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use crossbeam_channel::{bounded, RecvTimeoutError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Audio input device wrapper.
///
/// Abstracts CPAL device handling so the rest of the crate only deals with
/// mono f32 fragments.
pub struct Recorder {
    device: cpal::Device,
}

impl Recorder {
    /// List microphone names so the CLI can expose a human-friendly selector.
    pub fn list_devices() -> Result<Vec<String>> {
        let host = cpal::default_host();
        let devices = host.input_devices().context("no input devices available")?;
        let mut names = Vec::new();
        for device in devices {
            if let Ok(name) = device.name() {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Create a recorder, optionally forcing a specific device so users can
    /// pick the right microphone when a machine exposes multiple inputs.
    pub fn new(preferred_device: Option<&str>) -> Result<Self> {
        let host = cpal::default_host();
        let device = match preferred_device {
            Some(name) => {
                let mut devices = host.input_devices().context("no input devices available")?;
                devices
                    .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                    .ok_or_else(|| anyhow!("input device '{name}' not found"))?
            }
            None => host
                .default_input_device()
                .context("no default input device available")?,
        };
        Ok(Self { device })
    }

    /// Get the name of the active recording device.
    pub fn device_name(&self) -> String {
        self.device
            .name()
            .unwrap_or_else(|_| "Unknown Device".to_string())
    }

    /// Record fragments into a fresh session until `stop_flag` is set, then
    /// return the concatenated mono audio at the device rate.
    ///
    /// The stream is built and torn down inside this call; CPAL streams are
    /// not `Send`, so the caller runs this on the thread that owns capture.
    pub fn record_fragments(
        &self,
        cfg: &CaptureConfig,
        stop_flag: Arc<AtomicBool>,
        meter: Option<LiveMeter>,
    ) -> Result<CaptureResult> {
        let default_config = self.device.default_input_config()?;
        let format = default_config.sample_format();
        let device_config: StreamConfig = default_config.into();
        let sample_rate = device_config.sample_rate.0;
        let channels = usize::from(device_config.channels.max(1));
        let device_name = self.device_name();

        let frame_ms = cfg.frame_ms.clamp(5, 120);
        let fragment_samples = ((u64::from(sample_rate) * frame_ms) / 1000).max(1) as usize;
        let (sender, receiver) = bounded::<Vec<f32>>(cfg.channel_capacity.max(1));
        let dropped = Arc::new(AtomicUsize::new(0));
        let dispatcher = Arc::new(Mutex::new(FragmentDispatcher::new(
            fragment_samples,
            sender,
            dropped.clone(),
        )));

        log_debug(&format!(
            "Recorder config: format={format:?} sample_rate={sample_rate}Hz channels={channels}"
        ));

        // Keep the error callback quiet in the UI and mirror issues into the log.
        let err_fn = |err| log_debug(&format!("audio_stream_error: {err}"));

        let stream = match format {
            SampleFormat::F32 => {
                let dispatcher = dispatcher.clone();
                let dropped = dropped.clone();
                self.device.build_input_stream(
                    &device_config,
                    move |data: &[f32], _| {
                        if let Ok(mut pump) = dispatcher.try_lock() {
                            pump.push(data, channels, |sample| sample);
                        } else {
                            dropped.fetch_add(1, Ordering::Relaxed);
                        }
                    },
                    err_fn,
                    None,
                )?
            }
            SampleFormat::I16 => {
                let dispatcher = dispatcher.clone();
                let dropped = dropped.clone();
                self.device.build_input_stream(
                    &device_config,
                    move |data: &[i16], _| {
                        if let Ok(mut pump) = dispatcher.try_lock() {
                            pump.push(data, channels, |sample| sample as f32 / 32_768.0);
                        } else {
                            dropped.fetch_add(1, Ordering::Relaxed);
                        }
                    },
                    err_fn,
                    None,
                )?
            }
            SampleFormat::U16 => {
                let dispatcher = dispatcher.clone();
                let dropped = dropped.clone();
                self.device.build_input_stream(
                    &device_config,
                    move |data: &[u16], _| {
                        if let Ok(mut pump) = dispatcher.try_lock() {
                            pump.push(data, channels, |sample| {
                                (sample as f32 - 32_768.0) / 32_768.0
                            });
                        } else {
                            dropped.fetch_add(1, Ordering::Relaxed);
                        }
                    },
                    err_fn,
                    None,
                )?
            }
            other => return Err(anyhow!("unsupported sample format: {other:?}")),
        };

        stream.play()?;

        let mut session = CaptureSession::new(sample_rate, cfg.buffer_ms);
        let mut metrics = CaptureMetrics::default();
        let started = Instant::now();
        let wait_time = Duration::from_millis(frame_ms);

        let stop_reason = loop {
            if stop_flag.load(Ordering::Relaxed) {
                break StopReason::ManualStop;
            }
            match receiver.recv_timeout(wait_time) {
                Ok(fragment) => {
                    if let Some(ref meter) = meter {
                        meter.set_db(rms_db(&fragment));
                    }
                    metrics.fragments_collected += 1;
                    session.push_fragment(fragment);
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break StopReason::StreamClosed,
            }
        };

        if let Err(err) = stream.pause() {
            log_debug(&format!("failed to pause audio stream: {err}"));
        }
        drop(stream);
        if let Some(ref meter) = meter {
            meter.set_db(METER_FLOOR_DB);
        }

        // Drain fragments still queued, plus the partial tail, so short
        // recordings keep their last word.
        while let Ok(fragment) = receiver.try_recv() {
            metrics.fragments_collected += 1;
            session.push_fragment(fragment);
        }
        let tail = dispatcher
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take_pending();
        if !tail.is_empty() {
            session.push_fragment(tail);
        }

        metrics.capture_ms = started.elapsed().as_millis() as u64;
        metrics.fragments_dropped = dropped.load(Ordering::Relaxed);
        metrics.stop_reason = stop_reason;

        if matches!(stop_reason, StopReason::StreamClosed) {
            return Err(anyhow!(
                "audio stream from '{device_name}' disconnected; check microphone permissions and availability. {}",
                mic_permission_hint()
            ));
        }

        Ok(CaptureResult {
            samples: session.into_samples(),
            sample_rate,
            metrics,
        })
    }
}

fn mic_permission_hint() -> &'static str {
    #[cfg(target_os = "macos")]
    {
        "macOS: System Settings > Privacy & Security > Microphone (enable your terminal)."
    }
    #[cfg(target_os = "linux")]
    {
        "Linux: check PipeWire/PulseAudio permissions and ensure the device is not muted."
    }
    #[cfg(target_os = "windows")]
    {
        "Windows: Settings > Privacy & Security > Microphone (allow access for your terminal)."
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        "Check OS microphone permissions."
    }
}
