//! Line-oriented chat over stdin/stdout for scripts and non-interactive use.
//!
//! Each stdin line is sent as one message once the socket is open. Every
//! inbound message is printed as soon as it is rendered. After stdin closes
//! and all lines are sent, the run ends once the socket has been quiet for
//! the linger period.

use std::{
    collections::VecDeque,
    io::{self, BufRead, Write},
    sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError},
    thread,
    time::{Duration, Instant},
};

use anyhow::{bail, Result};
use clap::ValueEnum;

use crate::{
    domain::{
        events::{ChannelEvent, ConnectionState},
        shell_state::SharedTranscript,
        transcript::TranscriptEntry,
    },
    usecases::{
        chat_transport::{ChatTransport, DuplexChannel, SendMessageError},
        transcript_renderer::TranscriptRenderer,
    },
};

use super::html::render_entry_html;

const CHANNEL_POLL_INTERVAL: Duration = Duration::from_millis(50);
const PIPE_INPUT_FAILED: &str = "PIPE_INPUT_FAILED";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// `[3:05 PM] Air Helper: text`
    #[default]
    Text,
    /// The site's chat message markup, one fragment per message.
    Html,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipeOptions {
    pub format: OutputFormat,
    pub linger: Duration,
}

/// Reads stdin lines on a helper thread. The receiver disconnects at EOF.
pub fn spawn_stdin_reader() -> Receiver<String> {
    let (line_tx, line_rx) = mpsc::channel();

    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if line_tx.send(line).is_err() {
                        return;
                    }
                }
                Err(error) => {
                    tracing::warn!(code = PIPE_INPUT_FAILED, error = %error, "stdin read failed");
                    return;
                }
            }
        }
    });

    line_rx
}

pub fn run<C: DuplexChannel>(
    mut transport: ChatTransport<C>,
    channel_events: &Receiver<ChannelEvent>,
    lines: &Receiver<String>,
    out: &mut dyn Write,
    options: PipeOptions,
) -> Result<()> {
    let transcript = SharedTranscript::default();
    transport.subscribe(Box::new(TranscriptRenderer::new(transcript.clone())));

    let mut pending = VecDeque::new();
    let mut input_closed = false;
    let mut printed = 0;
    let mut quiet_since: Option<Instant> = None;

    loop {
        if !input_closed {
            input_closed = drain_lines(lines, &mut pending);
        }

        flush_pending(&mut transport, &mut pending)?;

        match channel_events.recv_timeout(CHANNEL_POLL_INTERVAL) {
            Ok(event) => {
                transport.handle_channel_event(event);
                quiet_since = None;
            }
            Err(RecvTimeoutError::Timeout) => {
                if input_closed && pending.is_empty() {
                    let since = *quiet_since.get_or_insert_with(Instant::now);
                    if since.elapsed() >= options.linger {
                        break;
                    }
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                print_new_entries(&transcript, &mut printed, out, options.format)?;
                if pending.is_empty() {
                    break;
                }
                bail!("chat channel stopped with {} unsent line(s)", pending.len());
            }
        }

        print_new_entries(&transcript, &mut printed, out, options.format)?;
    }

    out.flush()?;
    Ok(())
}

/// Moves every available line into `pending`. Returns true once input is closed.
fn drain_lines(lines: &Receiver<String>, pending: &mut VecDeque<String>) -> bool {
    loop {
        match lines.try_recv() {
            Ok(line) => pending.push_back(line),
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => return true,
        }
    }
}

fn flush_pending<C: DuplexChannel>(
    transport: &mut ChatTransport<C>,
    pending: &mut VecDeque<String>,
) -> Result<()> {
    while transport.state() == ConnectionState::Open {
        let Some(line) = pending.front() else {
            break;
        };

        match transport.send(line) {
            Ok(_) => {
                pending.pop_front();
            }
            Err(SendMessageError::NotConnected) => break,
            Err(error @ SendMessageError::ChannelStopped) => return Err(error.into()),
        }
    }

    Ok(())
}

fn print_new_entries(
    transcript: &SharedTranscript,
    printed: &mut usize,
    out: &mut dyn Write,
    format: OutputFormat,
) -> Result<()> {
    let transcript = transcript.borrow();
    for entry in &transcript.entries()[*printed..] {
        writeln!(out, "{}", format_entry(entry, format))?;
    }
    *printed = transcript.len();
    out.flush()?;

    Ok(())
}

pub fn format_entry(entry: &TranscriptEntry, format: OutputFormat) -> String {
    match format {
        OutputFormat::Html => render_entry_html(entry),
        OutputFormat::Text => format!("[{}] {}: {}", entry.time, entry.author.label(), entry.body),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::Sender;

    use super::*;
    use crate::{
        domain::message::MessageAuthor,
        usecases::chat_transport::tests::{transport_with, StubChannel},
    };

    const NO_LINGER: PipeOptions = PipeOptions {
        format: OutputFormat::Text,
        linger: Duration::ZERO,
    };

    fn frame(message: &str, from_user: bool) -> ChannelEvent {
        ChannelEvent::Frame(
            serde_json::json!({
                "message": message,
                "is_message_from_user": from_user,
                "datetime": "2024-05-01T15:05:00+00:00",
            })
            .to_string(),
        )
    }

    fn lines_of(input: &[&str]) -> Receiver<String> {
        let (tx, rx) = mpsc::channel();
        for line in input {
            tx.send((*line).to_owned()).expect("line should queue");
        }
        rx
    }

    fn events_of(events: Vec<ChannelEvent>) -> (Sender<ChannelEvent>, Receiver<ChannelEvent>) {
        let (tx, rx) = mpsc::channel();
        for event in events {
            tx.send(event).expect("event should queue");
        }
        (tx, rx)
    }

    fn run_to_string(
        channel: StubChannel,
        events: &Receiver<ChannelEvent>,
        lines: &Receiver<String>,
        options: PipeOptions,
    ) -> String {
        let mut out = Vec::new();
        run(transport_with(channel), events, lines, &mut out, options).expect("pipe should finish");
        String::from_utf8(out).expect("output should be UTF-8")
    }

    #[test]
    fn lines_wait_for_open_socket_then_send_in_order() {
        let channel = StubChannel::open();
        let (_keep, events) = events_of(vec![ChannelEvent::Connecting, ChannelEvent::Opened]);
        let lines = lines_of(&["moscow", "   ", "sochi"]);

        run_to_string(channel.clone(), &events, &lines, NO_LINGER);

        let frames = channel.frames.borrow();
        assert_eq!(frames.len(), 2);
        assert!(frames[0].contains("moscow"));
        assert!(frames[1].contains("sochi"));
    }

    #[test]
    fn inbound_messages_print_with_sender_labels() {
        let (_keep, events) = events_of(vec![
            ChannelEvent::Opened,
            frame("moscow", true),
            ChannelEvent::Frame("not json".to_owned()),
            frame("There are no available places in Moscow.", false),
        ]);
        let lines = lines_of(&[]);

        let output = run_to_string(StubChannel::open(), &events, &lines, NO_LINGER);

        let printed: Vec<_> = output.lines().collect();
        assert_eq!(printed.len(), 2);
        assert!(printed[0].ends_with("] You: moscow"));
        assert!(printed[1].ends_with("] Air Helper: There are no available places in Moscow."));
    }

    #[test]
    fn html_format_prints_escaped_fragments() {
        let (_keep, events) = events_of(vec![frame("<b>Sochi</b>", false)]);
        let lines = lines_of(&[]);
        let options = PipeOptions {
            format: OutputFormat::Html,
            ..NO_LINGER
        };

        let output = run_to_string(StubChannel::open(), &events, &lines, options);

        assert!(output.contains(r#"<div class="chat-message message-bot">"#));
        assert!(output.contains("<p>&lt;b&gt;Sochi&lt;/b&gt;</p>"));
    }

    #[test]
    fn stopped_channel_with_unsent_lines_is_an_error() {
        let (tx, events) = events_of(vec![ChannelEvent::Closed {
            reason: "refused".to_owned(),
        }]);
        drop(tx);
        let lines = lines_of(&["moscow"]);
        let mut out = Vec::new();

        let result = run(
            transport_with(StubChannel::open()),
            &events,
            &lines,
            &mut out,
            NO_LINGER,
        );

        assert!(result.is_err());
    }

    #[test]
    fn text_format_uses_fixed_labels() {
        let entry = TranscriptEntry {
            author: MessageAuthor::Agent,
            time: "9:30 AM".to_owned(),
            body: "There is 1 available place in Sochi.".to_owned(),
        };

        assert_eq!(
            format_entry(&entry, OutputFormat::Text),
            "[9:30 AM] Air Helper: There is 1 available place in Sochi."
        );
    }
}
