//! Synthesized reply playback.
//!
//! At most one playback handle exists at a time; the widget stops and drops
//! the previous one before starting a new capture or a new reply. Playback
//! is fire-and-forget: nothing waits for the sink to drain.

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rodio::{OutputStream, OutputStreamBuilder, Sink};
use std::io::Cursor;

/// Replies are never time-stretched.
const PLAYBACK_SPEED: f32 = 1.0;

/// Decode the backend's base64 WAV payload into raw bytes.
pub fn decode_reply_audio(encoded: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(encoded.trim())
        .context("reply audio was not valid base64")
}

/// Live audio output for one synthesized reply.
///
/// Dropping the handle tears down the stream, which also silences the sink.
pub struct PlaybackHandle {
    _stream: OutputStream,
    sink: Sink,
}

impl PlaybackHandle {
    /// Start playing WAV bytes on the default output device.
    pub fn start(wav_bytes: Vec<u8>) -> Result<Self> {
        let stream = OutputStreamBuilder::from_default_device()
            .context("no audio output device available")?
            .open_stream()
            .context("failed to open audio output stream")?;
        let sink = rodio::play(stream.mixer(), Cursor::new(wav_bytes))
            .context("failed to decode reply audio")?;
        sink.set_speed(PLAYBACK_SPEED);
        Ok(Self {
            _stream: stream,
            sink,
        })
    }

    /// Stop and silence this handle immediately.
    pub fn stop(&self) {
        self.sink.stop();
    }

    /// Whether the sink still has audio queued.
    pub fn is_active(&self) -> bool {
        !self.sink.empty()
    }
}
