//! Microphone capture pipeline.
//!
//! Audio arrives from CPAL in device-format callbacks, is downmixed to mono
//! f32, and is chunked into fixed-size fragments that the capture worker
//! drains into the active session. The backend accepts any sample rate, so
//! samples stay at the device rate until WAV encoding.

mod dispatch;
mod encode;
mod meter;
mod recorder;
mod session;

pub use encode::wav_payload;
pub use meter::LiveMeter;
pub use recorder::Recorder;
pub use session::{CaptureMetrics, CaptureResult, CaptureSession, StopReason};
