//! VoxChat entrypoint: a push-to-talk voice chat TUI over a speech backend.
//!
//! # Architecture
//!
//! - UI thread: key events, the widget state machine, ratatui rendering
//! - Exchange worker: background audio capture, upload, and reply delivery
//! - Device callback: feeds mono fragments to the worker over a bounded
//!   channel

mod event_loop;
mod ui;

use std::io;

use anyhow::Result;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use voxchat::audio::Recorder;
use voxchat::config::AppConfig;
use voxchat::terminal_restore::TerminalRestoreGuard;
use voxchat::{init_logging, log_debug, App};

fn main() -> Result<()> {
    let config = AppConfig::parse_args()?;
    init_logging(&config);

    if config.list_input_devices {
        list_input_devices();
        return Ok(());
    }

    let mut app = App::new(config)?;

    let guard = TerminalRestoreGuard::new();
    guard.enable_raw_mode()?;
    let mut stdout = io::stdout();
    guard.enter_alt_screen(&mut stdout)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    log_debug("voxchat started");
    let result = event_loop::run(&mut terminal, &mut app);
    guard.restore();
    log_debug("voxchat exited");
    result
}

fn list_input_devices() {
    match Recorder::list_devices() {
        Ok(devices) if devices.is_empty() => {
            println!("No audio input devices detected.");
        }
        Ok(devices) => {
            println!("Detected audio input devices:");
            for name in devices {
                println!("  {name}");
            }
        }
        Err(err) => println!("Failed to list audio input devices: {err:#}"),
    }
}
