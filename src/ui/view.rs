use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::{
    message::AGENT_LABEL, message_input_state::MessageInputState, shell_state::ShellState,
    transcript::TranscriptEntry,
};

use super::{message_input::render_message_input, styles};

/// Rows of a single-line entry: header, body and a spacer. Used to size the
/// scroll page; taller entries are handled when laying out rows.
const ENTRY_ROWS: u16 = 3;

const BODY_INDENT: &str = "  ";

const KEY_HINTS: &str = "Enter send · PgUp/PgDn scroll · Esc quit";

pub fn render(frame: &mut Frame<'_>, state: &ShellState, input: &MessageInputState) {
    let [transcript_area, input_area, status_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(frame.area());

    render_transcript(frame, transcript_area, state);
    render_message_input(frame, input_area, input);
    frame.render_widget(Paragraph::new(status_line(state)), status_area);
}

fn render_transcript(frame: &mut Frame<'_>, area: Rect, state: &ShellState) {
    let block = Block::default()
        .title(format!("Chat with {AGENT_LABEL}"))
        .borders(Borders::ALL);

    let mut transcript = state.transcript().borrow_mut();
    let inner_height = area.height.saturating_sub(2);
    transcript.set_viewport(usize::from((inner_height / ENTRY_ROWS).max(1)));

    if transcript.is_empty() {
        let placeholder = Paragraph::new(Span::styled(
            "No messages yet.",
            styles::empty_transcript_style(),
        ))
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let lines = bottom_aligned_lines(transcript.visible(), inner_height);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Lays out `entries` top to bottom and keeps the last `height` rows, so the
/// last entry of the window is always on screen whatever its height.
fn bottom_aligned_lines(entries: &[TranscriptEntry], height: u16) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = entries.iter().flat_map(entry_lines).collect();
    let overflow = lines.len().saturating_sub(usize::from(height));
    lines.split_off(overflow)
}

fn entry_lines(entry: &TranscriptEntry) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(entry.time.clone(), styles::message_time_style()),
        Span::raw("  "),
        Span::styled(entry.author.label(), styles::sender_style(entry.author)),
    ])];

    lines.extend(entry.body.lines().map(|text| {
        Line::from(Span::styled(
            format!("{BODY_INDENT}{text}"),
            styles::message_text_style(),
        ))
    }));
    lines.push(Line::default());
    lines
}

fn status_line(state: &ShellState) -> Line<'static> {
    let connection = state.connection_state();
    let mut spans = vec![Span::styled(
        format!("● {}", connection.label()),
        styles::connection_style(connection),
    )];

    if let Some(notice) = state.last_notice() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(notice.to_owned(), styles::notice_style()));
    }

    spans.push(Span::raw(format!("  {KEY_HINTS}")));
    Line::from(spans)
}
