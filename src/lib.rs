pub mod audio;
pub mod chat;
pub mod client;
pub mod config;
pub mod exchange;
pub mod playback;
mod telemetry;
pub mod terminal_restore;

mod app;

pub use app::{
    crash_log_path, init_logging, log_debug, log_debug_content, log_file_path, log_panic, App,
    WidgetState,
};
pub use exchange::{ExchangeJob, ExchangeMessage};
