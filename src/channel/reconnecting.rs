//! WebSocket channel that reconnects on its own with exponential backoff.
//!
//! The socket lives on a tokio runtime. The owner talks to it through a
//! `DuplexChannel` handle and receives `ChannelEvent`s on a std mpsc channel,
//! so the UI thread never blocks on network I/O.

use std::{sync::mpsc::Sender, time::Duration};

use futures::{SinkExt, StreamExt};
use tokio::{
    net::TcpStream,
    runtime::Runtime,
    sync::{mpsc, watch},
};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use crate::{
    channel::address::ChannelAddress,
    domain::events::{ChannelEvent, ConnectionState},
    infra::config::ReconnectConfig,
    usecases::chat_transport::{ChannelSendError, DuplexChannel},
};

const CHANNEL_STARTED: &str = "CHAT_CHANNEL_STARTED";
const CHANNEL_OPENED: &str = "CHAT_CHANNEL_OPENED";
const CHANNEL_LOST: &str = "CHAT_CHANNEL_LOST";
const CHANNEL_RETRY_FAILED: &str = "CHAT_CHANNEL_RETRY_FAILED";
const CHANNEL_STOPPED: &str = "CHAT_CHANNEL_STOPPED";
const CHANNEL_STALE_FRAMES_DROPPED: &str = "CHAT_CHANNEL_STALE_FRAMES_DROPPED";
const CHANNEL_OWNER_GONE: &str = "CHAT_CHANNEL_OWNER_GONE";

type SocketStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Retry timing: `min(initial_delay * decay^attempt, max_delay)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconnectPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub decay: f64,
    pub connect_timeout: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::from(&ReconnectConfig::default())
    }
}

impl From<&ReconnectConfig> for ReconnectPolicy {
    fn from(config: &ReconnectConfig) -> Self {
        Self {
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            decay: config.decay,
            connect_timeout: Duration::from_millis(config.connect_timeout_ms),
        }
    }
}

impl ReconnectPolicy {
    /// Delay before the retry following `attempt` consecutive failures.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let initial_ms = self.initial_delay.as_millis() as f64;
        let max_ms = self.max_delay.as_millis() as f64;
        let delay_ms = (initial_ms * self.decay.powi(exponent)).min(max_ms);

        Duration::from_millis(delay_ms as u64)
    }
}

#[derive(Debug)]
pub struct ReconnectingChannel {
    outbound_tx: mpsc::UnboundedSender<String>,
    state_rx: watch::Receiver<ConnectionState>,
    stop_tx: Option<watch::Sender<bool>>,
}

impl ReconnectingChannel {
    pub fn start(
        runtime: &Runtime,
        address: ChannelAddress,
        policy: ReconnectPolicy,
        event_tx: Sender<ChannelEvent>,
    ) -> Self {
        install_tls_provider();

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);
        let (stop_tx, stop_rx) = watch::channel(false);

        tracing::info!(
            code = CHANNEL_STARTED,
            address = %address,
            "chat channel worker started"
        );

        runtime.spawn(run_worker(Worker {
            address,
            policy,
            event_tx,
            outbound_rx,
            state_tx,
            stop_rx,
        }));

        Self {
            outbound_tx,
            state_rx,
            stop_tx: Some(stop_tx),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }
}

impl DuplexChannel for ReconnectingChannel {
    fn send_frame(&self, frame: String) -> Result<(), ChannelSendError> {
        if self.state() != ConnectionState::Open {
            return Err(ChannelSendError::NotOpen);
        }

        self.outbound_tx
            .send(frame)
            .map_err(|_| ChannelSendError::Stopped)
    }
}

impl Drop for ReconnectingChannel {
    fn drop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
        }
    }
}

/// `wss://` handshakes need a process-wide rustls provider. Installing twice
/// is harmless; the first one stays.
fn install_tls_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

struct Worker {
    address: ChannelAddress,
    policy: ReconnectPolicy,
    event_tx: Sender<ChannelEvent>,
    outbound_rx: mpsc::UnboundedReceiver<String>,
    state_tx: watch::Sender<ConnectionState>,
    stop_rx: watch::Receiver<bool>,
}

enum SessionEnd {
    Lost(String),
    Stopped,
}

async fn run_worker(mut worker: Worker) {
    let mut attempt: u32 = 0;
    let mut outage_reported = false;

    loop {
        if !worker.publish(ConnectionState::Connecting, ChannelEvent::Connecting) {
            return;
        }

        let connect = tokio::time::timeout(
            worker.policy.connect_timeout,
            connect_async(worker.address.as_str()),
        );

        let outcome = tokio::select! {
            _ = stop_requested(&mut worker.stop_rx) => {
                tracing::info!(code = CHANNEL_STOPPED, "chat channel worker stopped");
                return;
            }
            outcome = connect => outcome,
        };

        let reason = match outcome {
            Ok(Ok((socket, _response))) => {
                attempt = 0;
                outage_reported = false;
                worker.discard_stale_frames();

                if !worker.publish(ConnectionState::Open, ChannelEvent::Opened) {
                    return;
                }
                tracing::info!(
                    code = CHANNEL_OPENED,
                    address = %worker.address,
                    "chat channel opened"
                );

                match worker.pump(socket).await {
                    SessionEnd::Stopped => {
                        tracing::info!(code = CHANNEL_STOPPED, "chat channel worker stopped");
                        return;
                    }
                    SessionEnd::Lost(reason) => reason,
                }
            }
            Ok(Err(error)) => error.to_string(),
            Err(_) => format!(
                "connect timed out after {} ms",
                worker.policy.connect_timeout.as_millis()
            ),
        };

        if outage_reported {
            tracing::debug!(
                code = CHANNEL_RETRY_FAILED,
                attempt,
                reason = %reason,
                "chat channel retry failed"
            );
            if !worker.publish(ConnectionState::Closed, ChannelEvent::RetryFailed { reason }) {
                return;
            }
        } else {
            outage_reported = true;
            tracing::warn!(code = CHANNEL_LOST, reason = %reason, "chat channel closed");
            if !worker.publish(ConnectionState::Closed, ChannelEvent::Closed { reason }) {
                return;
            }
        }

        let delay = worker.policy.delay_for(attempt);
        attempt = attempt.saturating_add(1);

        tokio::select! {
            _ = stop_requested(&mut worker.stop_rx) => {
                tracing::info!(code = CHANNEL_STOPPED, "chat channel worker stopped");
                return;
            }
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

impl Worker {
    /// Returns false once the owner stopped listening.
    fn publish(&self, state: ConnectionState, event: ChannelEvent) -> bool {
        self.state_tx.send_replace(state);
        if self.event_tx.send(event).is_err() {
            tracing::info!(
                code = CHANNEL_OWNER_GONE,
                "chat channel owner dropped its event receiver"
            );
            return false;
        }
        true
    }

    /// Frames accepted during a previous session are not carried into a new one.
    fn discard_stale_frames(&mut self) {
        let mut dropped = 0_usize;
        while self.outbound_rx.try_recv().is_ok() {
            dropped += 1;
        }

        if dropped > 0 {
            tracing::warn!(
                code = CHANNEL_STALE_FRAMES_DROPPED,
                dropped,
                "discarded frames queued before reconnect"
            );
        }
    }

    async fn pump(&mut self, socket: SocketStream) -> SessionEnd {
        let (mut sink, mut source) = socket.split();

        loop {
            tokio::select! {
                _ = stop_requested(&mut self.stop_rx) => {
                    let _ = sink.close().await;
                    return SessionEnd::Stopped;
                }
                frame = self.outbound_rx.recv() => match frame {
                    Some(frame) => {
                        if let Err(error) = sink.send(Message::text(frame)).await {
                            return SessionEnd::Lost(error.to_string());
                        }
                    }
                    None => {
                        let _ = sink.close().await;
                        return SessionEnd::Stopped;
                    }
                },
                inbound = source.next() => match inbound {
                    Some(Ok(Message::Text(text))) => {
                        let text: &str = &text;
                        if self.event_tx.send(ChannelEvent::Frame(text.to_owned())).is_err() {
                            let _ = sink.close().await;
                            return SessionEnd::Stopped;
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let reason = frame
                            .map(|frame| {
                                let reason: &str = &frame.reason;
                                format!("closed by server ({}): {reason}", frame.code)
                            })
                            .unwrap_or_else(|| "closed by server".to_owned());
                        return SessionEnd::Lost(reason);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(error)) => return SessionEnd::Lost(error.to_string()),
                    None => return SessionEnd::Lost("connection ended".to_owned()),
                },
            }
        }
    }
}

/// Resolves when a stop was signalled or the owner handle is gone.
async fn stop_requested(stop_rx: &mut watch::Receiver<bool>) {
    loop {
        if *stop_rx.borrow_and_update() {
            return;
        }
        if stop_rx.changed().await.is_err() {
            return;
        }
    }
}
