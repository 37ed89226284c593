//! Command-line parsing and validation helpers.

mod defaults;
#[cfg(test)]
mod tests;
mod validation;

use clap::Parser;

pub use defaults::{
    DEFAULT_CAPTURE_BUFFER_MS, DEFAULT_CAPTURE_CHANNEL_CAPACITY, DEFAULT_CAPTURE_FRAME_MS,
    DEFAULT_SERVER_URL, MAX_CAPTURE_BUFFER_MS, MIN_CAPTURE_BUFFER_MS,
};

/// CLI options for the VoxChat TUI. Validated values keep the capture and
/// upload pipeline within sane bounds.
#[derive(Debug, Parser, Clone)]
#[command(about = "VoxChat TUI", author, version)]
pub struct AppConfig {
    /// Base URL of the voice chat backend
    #[arg(long = "server-url", env = "VOXCHAT_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,

    /// Preferred audio input device name
    #[arg(long)]
    pub input_device: Option<String>,

    /// Print detected audio input devices and exit
    #[arg(long = "list-input-devices", default_value_t = false)]
    pub list_input_devices: bool,

    /// Disable playback of synthesized replies
    #[arg(long = "no-playback", default_value_t = false)]
    pub no_playback: bool,

    /// Enable file logging (debug)
    #[arg(long = "logs", env = "VOXCHAT_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", env = "VOXCHAT_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Allow logging transcript/content snippets (debug log only)
    #[arg(
        long = "log-content",
        env = "VOXCHAT_LOG_CONTENT",
        default_value_t = false
    )]
    pub log_content: bool,

    /// Enable verbose timing logs
    #[arg(long)]
    pub log_timings: bool,

    /// Capture fragment size (milliseconds)
    #[arg(long = "capture-frame-ms", default_value_t = DEFAULT_CAPTURE_FRAME_MS)]
    pub capture_frame_ms: u64,

    /// Buffered audio budget while recording (milliseconds); oldest audio is
    /// dropped beyond this
    #[arg(long = "capture-buffer-ms", default_value_t = DEFAULT_CAPTURE_BUFFER_MS)]
    pub capture_buffer_ms: u64,

    /// Fragment channel capacity between the device callback and the capture
    /// worker
    #[arg(
        long = "capture-channel-capacity",
        default_value_t = DEFAULT_CAPTURE_CHANNEL_CAPACITY
    )]
    pub capture_channel_capacity: usize,
}

/// Tunable parameters for one capture session.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub frame_ms: u64,
    pub buffer_ms: u64,
    pub channel_capacity: usize,
}
