//! Core runtime loop coordinating key events, worker polling, and rendering.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::Backend;
use ratatui::Terminal;
use voxchat::{App, WidgetState};

use crate::ui;

/// How long to wait for a key event before running periodic work.
const EVENT_POLL_MS: u64 = 50;

pub(crate) fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.poll_exchange_job();
        if app.take_redraw_request() {
            terminal.draw(|frame| ui::draw(frame, app))?;
        }

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if handle_key(app, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => app.request_redraw(),
                _ => {}
            }
        } else if app.state() != WidgetState::Idle {
            // Drive the level meter and processing spinner between events.
            app.advance_animation();
        }
    }
    Ok(())
}

/// Returns true when the app should exit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return true,
            KeyCode::Char('r') => app.toggle_capture(),
            _ => {}
        }
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_capture(),
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::PageDown => app.page_down(),
        _ => {}
    }
    false
}
