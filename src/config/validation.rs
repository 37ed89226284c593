use super::defaults::{MAX_CAPTURE_BUFFER_MS, MIN_CAPTURE_BUFFER_MS};
use super::{AppConfig, CaptureConfig};
use anyhow::{bail, Result};
use clap::Parser;

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values and normalize the server URL.
    pub fn validate(&mut self) -> Result<()> {
        let trimmed = self.server_url.trim().trim_end_matches('/').to_string();
        if trimmed.is_empty() {
            bail!("--server-url must not be empty");
        }
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            bail!("--server-url must start with http:// or https://, got '{trimmed}'");
        }
        self.server_url = trimmed;

        if !(5..=120).contains(&self.capture_frame_ms) {
            bail!(
                "--capture-frame-ms must be between 5 and 120, got {}",
                self.capture_frame_ms
            );
        }
        if !(MIN_CAPTURE_BUFFER_MS..=MAX_CAPTURE_BUFFER_MS).contains(&self.capture_buffer_ms) {
            bail!(
                "--capture-buffer-ms must be between {MIN_CAPTURE_BUFFER_MS} and {MAX_CAPTURE_BUFFER_MS} ms, got {}",
                self.capture_buffer_ms
            );
        }
        if !(8..=1024).contains(&self.capture_channel_capacity) {
            bail!(
                "--capture-channel-capacity must be between 8 and 1024, got {}",
                self.capture_channel_capacity
            );
        }

        if let Some(device) = &self.input_device {
            if device.trim().is_empty() {
                bail!("--input-device must not be blank");
            }
            if device.len() > 256 || device.chars().any(|ch| matches!(ch, '\n' | '\r')) {
                bail!("--input-device must be <=256 characters with no control characters");
            }
        }

        Ok(())
    }

    /// Snapshot the CLI-controlled capture settings for the exchange worker.
    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            frame_ms: self.capture_frame_ms,
            buffer_ms: self.capture_buffer_ms,
            channel_capacity: self.capture_channel_capacity,
        }
    }
}
