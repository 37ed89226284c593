//! Default values shared by CLI parsing and validation.

/// Backend the original deployment runs on when developing locally.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Fragment size delivered to the capture worker.
pub const DEFAULT_CAPTURE_FRAME_MS: u64 = 20;

/// Recording buffer budget. Five minutes of audio is far more than a spoken
/// question needs while still bounding memory if the mic is left open.
pub const DEFAULT_CAPTURE_BUFFER_MS: u64 = 300_000;

/// Fragment channel slots between the device callback and the worker.
pub const DEFAULT_CAPTURE_CHANNEL_CAPACITY: usize = 64;

pub const MIN_CAPTURE_BUFFER_MS: u64 = 1_000;
pub const MAX_CAPTURE_BUFFER_MS: u64 = 600_000;
