//! Full-screen rendering: transcript pane on top, status bar below.

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use unicode_width::UnicodeWidthChar;
use voxchat::chat::Sender;
use voxchat::{App, WidgetState};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const METER_SEGMENTS: usize = 12;
const METER_FLOOR_DB: f32 = -60.0;
const KEY_HINTS: &str = "Space: talk  ↑/↓: scroll  q: quit";

pub(crate) fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(4)])
        .split(frame.size());

    draw_transcript(frame, app, chunks[0]);
    draw_status(frame, app, chunks[1]);
}

fn draw_transcript(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let lines: Vec<Line> = app
        .messages()
        .iter()
        .map(|message| {
            let (tag_style, text_style) = match message.sender {
                Sender::User => (
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                    Style::default().fg(Color::Cyan),
                ),
                Sender::Bot => (
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                    Style::default(),
                ),
            };
            Line::from(vec![
                Span::styled(format!("{:>3} ", message.sender.label()), tag_style),
                Span::styled(message.text.clone(), text_style),
            ])
        })
        .collect();

    let transcript = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" VoxChat "))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset(), 0));
    frame.render_widget(transcript, area);
}

fn draw_status(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let width = area.width.saturating_sub(2) as usize;
    let mut first_line = vec![Span::styled(
        app.status_text().to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    match app.state() {
        WidgetState::Recording => {
            first_line.push(Span::raw("  "));
            first_line.push(Span::styled(
                meter_bar(app.meter_db()),
                Style::default().fg(Color::Yellow),
            ));
        }
        WidgetState::Processing => {
            first_line.push(Span::raw("  "));
            first_line.push(Span::raw(
                SPINNER_FRAMES[app.spinner_tick() % SPINNER_FRAMES.len()],
            ));
        }
        WidgetState::Idle => {}
    }

    let second_line = match app.alert_text() {
        Some(alert) => Line::from(Span::styled(
            fit_to_width(alert, width),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(
            fit_to_width(KEY_HINTS, width),
            Style::default().fg(Color::DarkGray),
        )),
    };

    let status = Paragraph::new(vec![Line::from(first_line), second_line])
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, area);
}

/// Render the live microphone level as a fixed-width bar.
fn meter_bar(level_db: f32) -> String {
    let level = level_db.max(METER_FLOOR_DB);
    let filled = (((level - METER_FLOOR_DB) / -METER_FLOOR_DB) * METER_SEGMENTS as f32)
        .round()
        .clamp(0.0, METER_SEGMENTS as f32) as usize;
    let mut bar = String::with_capacity(METER_SEGMENTS * 3);
    for i in 0..METER_SEGMENTS {
        bar.push_str(if i < filled { "▮" } else { "▯" });
    }
    bar
}

/// Truncate to the terminal width by display columns, not bytes.
fn fit_to_width(text: &str, max_cols: usize) -> String {
    let mut cols = 0usize;
    let mut out = String::new();
    for ch in text.chars() {
        let ch_cols = ch.width().unwrap_or(0);
        if cols + ch_cols > max_cols {
            break;
        }
        cols += ch_cols;
        out.push(ch);
    }
    out
}
