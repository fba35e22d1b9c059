//! Chat transport: mediates all traffic between the input field, the duplex
//! channel and whoever renders inbound messages.
//!
//! The transport owns the channel handle and the input field. Rendering is
//! not its concern: inbound messages are handed to registered
//! `MessageSubscriber`s in subscription order.

use chrono::Local;
use thiserror::Error;

use crate::{
    channel::{
        address::{derive_channel_address, AddressError, ChannelAddress, PageOrigin},
        wire::{decode_inbound, encode_outbound, MalformedPayload},
    },
    domain::{
        events::{ChannelEvent, ConnectionState},
        message::ChatMessage,
        message_input_state::MessageInputState,
    },
};

const CHAT_SOCKET_CLOSED: &str = "CHAT_SOCKET_CLOSED";
const CHAT_SOCKET_OPENED: &str = "CHAT_SOCKET_OPENED";
const CHAT_FRAME_MALFORMED: &str = "CHAT_FRAME_MALFORMED";

/// Errors a channel reports when it cannot take an outbound frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelSendError {
    #[error("channel is not open")]
    NotOpen,
    #[error("channel worker has stopped")]
    Stopped,
}

/// A bidirectional text channel. Inbound traffic and lifecycle changes arrive
/// separately as `ChannelEvent`s.
pub trait DuplexChannel {
    /// Queues one text frame. Must not block.
    fn send_frame(&self, frame: String) -> Result<(), ChannelSendError>;
}

/// Receives every successfully decoded inbound message.
pub trait MessageSubscriber {
    fn on_message(&mut self, message: &ChatMessage);
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("chat is not connected")]
    NotConnected,
    #[error("chat channel has shut down")]
    ChannelStopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    /// Blank text; nothing was sent and the input was left alone.
    Skipped,
}

pub struct ChatTransport<C: DuplexChannel> {
    channel: C,
    address: ChannelAddress,
    state: ConnectionState,
    input: MessageInputState,
    subscribers: Vec<Box<dyn MessageSubscriber>>,
}

impl<C: DuplexChannel> ChatTransport<C> {
    /// Derives the socket address for `endpoint_path` on `origin` and starts
    /// the channel with `open`. Connection progress shows up later as events.
    pub fn connect<F>(origin: &PageOrigin, endpoint_path: &str, open: F) -> Result<Self, AddressError>
    where
        F: FnOnce(&ChannelAddress) -> C,
    {
        let address = derive_channel_address(origin, endpoint_path)?;
        let channel = open(&address);

        tracing::info!(address = %address, "chat transport connecting");

        Ok(Self {
            channel,
            address,
            state: ConnectionState::Connecting,
            input: MessageInputState::default(),
            subscribers: Vec::new(),
        })
    }

    pub fn address(&self) -> &ChannelAddress {
        &self.address
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn input(&self) -> &MessageInputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut MessageInputState {
        &mut self.input
    }

    pub fn subscribe(&mut self, subscriber: Box<dyn MessageSubscriber>) {
        self.subscribers.push(subscriber);
    }

    /// Sends `text` verbatim as one frame and clears the input.
    ///
    /// Blank text is skipped silently. A refused frame is reported and the
    /// input is kept; nothing is buffered for later.
    pub fn send(&mut self, text: &str) -> Result<SendOutcome, SendMessageError> {
        if text.trim().is_empty() {
            return Ok(SendOutcome::Skipped);
        }

        self.channel
            .send_frame(encode_outbound(text))
            .map_err(map_channel_error)?;
        self.input.clear();

        tracing::debug!(chars = text.chars().count(), "chat message sent");
        Ok(SendOutcome::Sent)
    }

    /// Sends whatever the input field currently holds.
    pub fn submit(&mut self) -> Result<SendOutcome, SendMessageError> {
        let text = self.input.text().to_owned();
        self.send(&text)
    }

    pub fn handle_channel_event(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::Connecting => self.state = ConnectionState::Connecting,
            ChannelEvent::Opened => {
                self.state = ConnectionState::Open;
                tracing::info!(
                    code = CHAT_SOCKET_OPENED,
                    address = %self.address,
                    "chat socket opened"
                );
            }
            ChannelEvent::Frame(payload) => {
                if let Err(error) = self.on_message(&payload) {
                    tracing::warn!(
                        code = CHAT_FRAME_MALFORMED,
                        error = %error,
                        "dropping malformed chat frame"
                    );
                }
            }
            ChannelEvent::Closed { reason } => self.on_close(&reason),
            ChannelEvent::RetryFailed { reason } => {
                self.state = ConnectionState::Closed;
                tracing::debug!(reason = %reason, "chat socket still unreachable");
            }
        }
    }

    /// Decodes one inbound frame and fans it out to the subscribers.
    pub fn on_message(&mut self, payload: &str) -> Result<(), MalformedPayload> {
        let message = decode_inbound(payload, Local::now().fixed_offset())?;

        for subscriber in &mut self.subscribers {
            subscriber.on_message(&message);
        }

        Ok(())
    }

    /// Records an unexpected close. Reconnecting is the channel's job.
    pub fn on_close(&mut self, reason: &str) {
        self.state = ConnectionState::Closed;
        tracing::error!(
            code = CHAT_SOCKET_CLOSED,
            reason,
            "chat socket closed unexpectedly"
        );
    }
}

fn map_channel_error(error: ChannelSendError) -> SendMessageError {
    match error {
        ChannelSendError::NotOpen => SendMessageError::NotConnected,
        ChannelSendError::Stopped => SendMessageError::ChannelStopped,
    }
}
