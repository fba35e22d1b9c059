use anyhow::Result;

use crate::domain::{
    events::{AppEvent, KeyInput},
    message_input_state::MessageInputState,
    shell_state::{ShellState, SharedTranscript},
};

use super::{
    chat_transport::{ChatTransport, DuplexChannel, SendOutcome},
    contracts::ShellOrchestrator,
    transcript_renderer::TranscriptRenderer,
};

const CHAT_SEND_REFUSED: &str = "CHAT_SEND_REFUSED";

pub struct DefaultShellOrchestrator<C: DuplexChannel> {
    state: ShellState,
    transport: ChatTransport<C>,
}

impl<C: DuplexChannel> DefaultShellOrchestrator<C> {
    /// Wires the transcript renderer into `transport` and takes ownership of it.
    pub fn new(mut transport: ChatTransport<C>) -> Self {
        let transcript = SharedTranscript::default();
        transport.subscribe(Box::new(TranscriptRenderer::new(transcript.clone())));

        let mut state = ShellState::new(transcript);
        state.set_connection_state(transport.state());

        Self { state, transport }
    }

    fn handle_key(&mut self, key: KeyInput) {
        if key.ctrl {
            return;
        }

        match key.key.as_str() {
            "enter" => self.submit(),
            "backspace" => self.transport.input_mut().backspace(),
            "delete" => self.transport.input_mut().delete(),
            "left" => self.transport.input_mut().move_left(),
            "right" => self.transport.input_mut().move_right(),
            "home" => self.transport.input_mut().move_home(),
            "end" => self.transport.input_mut().move_end(),
            "pageup" => {
                let mut transcript = self.state.transcript().borrow_mut();
                let page = transcript.viewport().max(1);
                transcript.scroll_up(page);
            }
            "pagedown" => {
                let mut transcript = self.state.transcript().borrow_mut();
                let page = transcript.viewport().max(1);
                transcript.scroll_down(page);
            }
            text => {
                let mut chars = text.chars();
                if let (Some(ch), None) = (chars.next(), chars.next()) {
                    self.transport.input_mut().insert_char(ch);
                }
            }
        }
    }

    fn submit(&mut self) {
        match self.transport.submit() {
            Ok(SendOutcome::Sent) => self.state.clear_notice(),
            Ok(SendOutcome::Skipped) => {}
            Err(error) => {
                tracing::warn!(
                    code = CHAT_SEND_REFUSED,
                    error = %error,
                    "chat message was not sent"
                );
                self.state.set_notice(error.to_string());
            }
        }
    }
}

impl<C: DuplexChannel> ShellOrchestrator for DefaultShellOrchestrator<C> {
    fn state(&self) -> &ShellState {
        &self.state
    }

    fn input(&self) -> &MessageInputState {
        self.transport.input()
    }

    fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Tick => {}
            AppEvent::QuitRequested => self.state.stop(),
            AppEvent::InputKey(key) => self.handle_key(key),
            AppEvent::Channel(event) => {
                self.transport.handle_channel_event(event);
                self.state.set_connection_state(self.transport.state());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            events::{ChannelEvent, ConnectionState},
            message::MessageAuthor,
        },
        usecases::chat_transport::{
            tests::{transport_with, StubChannel},
            ChannelSendError,
        },
    };

    fn orchestrator(channel: StubChannel) -> DefaultShellOrchestrator<StubChannel> {
        DefaultShellOrchestrator::new(transport_with(channel))
    }

    fn type_text(orchestrator: &mut DefaultShellOrchestrator<StubChannel>, text: &str) {
        for ch in text.chars() {
            orchestrator
                .handle_event(AppEvent::InputKey(KeyInput::new(ch.to_string(), false)))
                .expect("key must be handled");
        }
    }

    fn key(orchestrator: &mut DefaultShellOrchestrator<StubChannel>, name: &str) {
        orchestrator
            .handle_event(AppEvent::InputKey(KeyInput::new(name, false)))
            .expect("key must be handled");
    }

    fn frame(message: &str, from_user: bool) -> AppEvent {
        AppEvent::Channel(ChannelEvent::Frame(
            serde_json::json!({
                "message": message,
                "is_message_from_user": from_user,
                "datetime": "2024-05-01T15:05:00+00:00",
            })
            .to_string(),
        ))
    }

    #[test]
    fn stops_on_quit_event() {
        let mut orchestrator = orchestrator(StubChannel::open());

        orchestrator
            .handle_event(AppEvent::QuitRequested)
            .expect("event must be handled");

        assert!(!orchestrator.state().is_running());
    }

    #[test]
    fn typing_then_enter_sends_and_clears_input() {
        let channel = StubChannel::open();
        let mut orchestrator = orchestrator(channel.clone());

        type_text(&mut orchestrator, "moscow");
        assert_eq!(orchestrator.input().text(), "moscow");

        key(&mut orchestrator, "enter");

        assert!(orchestrator.input().is_empty());
        assert_eq!(channel.frames.borrow().len(), 1);
    }

    #[test]
    fn enter_on_blank_input_sends_nothing() {
        let channel = StubChannel::open();
        let mut orchestrator = orchestrator(channel.clone());

        type_text(&mut orchestrator, "  ");
        key(&mut orchestrator, "enter");

        assert!(channel.frames.borrow().is_empty());
        assert_eq!(orchestrator.state().last_notice(), None);
    }

    #[test]
    fn refused_send_sets_notice_and_keeps_text() {
        let mut orchestrator = orchestrator(StubChannel::refusing(ChannelSendError::NotOpen));

        type_text(&mut orchestrator, "sochi");
        key(&mut orchestrator, "enter");

        assert_eq!(orchestrator.input().text(), "sochi");
        assert_eq!(orchestrator.state().last_notice(), Some("chat is not connected"));
    }

    #[test]
    fn editing_keys_reach_input() {
        let mut orchestrator = orchestrator(StubChannel::open());

        type_text(&mut orchestrator, "kazn");
        key(&mut orchestrator, "left");
        type_text(&mut orchestrator, "a");
        key(&mut orchestrator, "end");
        key(&mut orchestrator, "backspace");

        assert_eq!(orchestrator.input().text(), "kaza");
    }

    #[test]
    fn inbound_frames_render_into_transcript() {
        let mut orchestrator = orchestrator(StubChannel::open());

        orchestrator
            .handle_event(frame("moscow", true))
            .expect("frame must be handled");
        orchestrator
            .handle_event(frame("There are no available places in Moscow.", false))
            .expect("frame must be handled");
        orchestrator
            .handle_event(AppEvent::Channel(ChannelEvent::Frame("garbage".to_owned())))
            .expect("malformed frame must not fail the shell");

        let transcript = orchestrator.state().transcript().borrow();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.entries()[0].author, MessageAuthor::User);
        assert_eq!(transcript.entries()[1].author, MessageAuthor::Agent);
        assert_eq!(transcript.scroll_top(), transcript.max_scroll_top());
    }

    #[test]
    fn channel_lifecycle_updates_status() {
        let mut orchestrator = orchestrator(StubChannel::open());
        assert_eq!(
            orchestrator.state().connection_state(),
            ConnectionState::Connecting
        );

        orchestrator
            .handle_event(AppEvent::Channel(ChannelEvent::Opened))
            .expect("event must be handled");
        assert_eq!(orchestrator.state().connection_state(), ConnectionState::Open);

        orchestrator
            .handle_event(AppEvent::Channel(ChannelEvent::Closed {
                reason: "reset".to_owned(),
            }))
            .expect("event must be handled");
        assert_eq!(
            orchestrator.state().connection_state(),
            ConnectionState::Closed
        );
    }

    #[test]
    fn page_keys_scroll_transcript_within_bounds() {
        let mut orchestrator = orchestrator(StubChannel::open());
        orchestrator.state().transcript().borrow_mut().set_viewport(2);
        for index in 0..6 {
            orchestrator
                .handle_event(frame(&format!("m{index}"), false))
                .expect("frame must be handled");
        }

        key(&mut orchestrator, "pageup");
        assert_eq!(orchestrator.state().transcript().borrow().scroll_top(), 2);

        key(&mut orchestrator, "pagedown");
        key(&mut orchestrator, "pagedown");
        assert_eq!(orchestrator.state().transcript().borrow().scroll_top(), 4);
    }
}
