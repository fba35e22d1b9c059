//! Style definitions for the UI components.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::{events::ConnectionState, message::MessageAuthor};

// =============================================================================
// Transcript styles
// =============================================================================

/// Sender label style; the viewer and the agent get different colors.
pub fn sender_style(author: MessageAuthor) -> Style {
    let color = match author {
        MessageAuthor::User => Color::Cyan,
        MessageAuthor::Agent => Color::Green,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Style for message time.
pub fn message_time_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Style for message text content.
pub fn message_text_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn empty_transcript_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

// =============================================================================
// Input and status styles
// =============================================================================

pub fn input_prompt_style() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn input_text_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn input_placeholder_style() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC)
}

pub fn connection_style(state: ConnectionState) -> Style {
    let color = match state {
        ConnectionState::Open => Color::Green,
        ConnectionState::Connecting => Color::Yellow,
        ConnectionState::Closed => Color::Red,
    };
    Style::default().fg(color)
}

pub fn notice_style() -> Style {
    Style::default().fg(Color::Yellow)
}
