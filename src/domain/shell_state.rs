use std::{cell::RefCell, rc::Rc};

use super::{events::ConnectionState, transcript::Transcript};

/// Transcript handle shared between the shell view and the rendering subscriber.
pub type SharedTranscript = Rc<RefCell<Transcript>>;

#[derive(Debug, Clone)]
pub struct ShellState {
    running: bool,
    connection_state: ConnectionState,
    transcript: SharedTranscript,
    last_notice: Option<String>,
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new(SharedTranscript::default())
    }
}

impl ShellState {
    pub fn new(transcript: SharedTranscript) -> Self {
        Self {
            running: true,
            connection_state: ConnectionState::Connecting,
            transcript,
            last_notice: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection_state
    }

    pub fn set_connection_state(&mut self, state: ConnectionState) {
        self.connection_state = state;
    }

    pub fn transcript(&self) -> &SharedTranscript {
        &self.transcript
    }

    /// Short status-bar notice, e.g. why the last send did not go out.
    pub fn last_notice(&self) -> Option<&str> {
        self.last_notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.last_notice = Some(notice.into());
    }

    pub fn clear_notice(&mut self) {
        self.last_notice = None;
    }
}
