//! Turns inbound chat messages into transcript entries.

use std::fmt::Display;

use chrono::{DateTime, FixedOffset, Local, TimeZone};

use crate::domain::{
    message::ChatMessage, shell_state::SharedTranscript, transcript::TranscriptEntry,
};

use super::chat_transport::MessageSubscriber;

/// Hour and minute on a 12-hour clock, e.g. `3:05 PM`.
const CLOCK_FORMAT: &str = "%-I:%M %p";

pub fn format_clock_time<Tz>(at: &DateTime<FixedOffset>, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.with_timezone(zone).format(CLOCK_FORMAT).to_string()
}

pub fn render_entry<Tz>(message: &ChatMessage, zone: &Tz) -> TranscriptEntry
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    TranscriptEntry {
        author: message.author,
        time: format_clock_time(&message.datetime, zone),
        body: message.message.clone(),
    }
}

/// Appends every message to the transcript and keeps the newest one in view.
pub struct TranscriptRenderer<Tz: TimeZone = Local> {
    transcript: SharedTranscript,
    zone: Tz,
}

impl TranscriptRenderer<Local> {
    pub fn new(transcript: SharedTranscript) -> Self {
        Self::with_zone(transcript, Local)
    }
}

impl<Tz: TimeZone> TranscriptRenderer<Tz> {
    pub fn with_zone(transcript: SharedTranscript, zone: Tz) -> Self {
        Self { transcript, zone }
    }
}

impl<Tz> MessageSubscriber for TranscriptRenderer<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    fn on_message(&mut self, message: &ChatMessage) {
        let entry = render_entry(message, &self.zone);
        let mut transcript = self.transcript.borrow_mut();
        transcript.append(entry);
        transcript.scroll_to_newest();
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use chrono::Utc;

    use super::*;
    use crate::domain::message::MessageAuthor;

    fn message(text: &str, at: &str, author: MessageAuthor) -> ChatMessage {
        ChatMessage {
            message: text.to_owned(),
            datetime: DateTime::parse_from_rfc3339(at).expect("fixture timestamp should parse"),
            author,
        }
    }

    #[test]
    fn clock_time_uses_twelve_hour_hour_and_minute() {
        let afternoon = DateTime::parse_from_rfc3339("2024-05-01T15:05:42+00:00").expect("parse");
        let morning = DateTime::parse_from_rfc3339("2024-05-01T09:30:00+00:00").expect("parse");
        let midnight = DateTime::parse_from_rfc3339("2024-05-01T00:07:00+00:00").expect("parse");

        assert_eq!(format_clock_time(&afternoon, &Utc), "3:05 PM");
        assert_eq!(format_clock_time(&morning, &Utc), "9:30 AM");
        assert_eq!(format_clock_time(&midnight, &Utc), "12:07 AM");
    }

    #[test]
    fn clock_time_is_shown_in_viewer_zone() {
        let at = DateTime::parse_from_rfc3339("2024-05-01T15:05:00+00:00").expect("parse");
        let moscow = FixedOffset::east_opt(3 * 3600).expect("offset");

        assert_eq!(format_clock_time(&at, &moscow), "6:05 PM");
    }

    #[test]
    fn user_message_renders_verbatim_with_user_author() {
        let entry = render_entry(
            &message("  <moscow> ", "2024-05-01T15:05:00+00:00", MessageAuthor::User),
            &Utc,
        );

        assert_eq!(entry.author, MessageAuthor::User);
        assert_eq!(entry.body, "  <moscow> ");
        assert_eq!(entry.time, "3:05 PM");
    }

    #[test]
    fn renderer_appends_in_arrival_order_and_scrolls_to_newest() {
        let transcript = SharedTranscript::default();
        transcript.borrow_mut().set_viewport(2);
        let mut renderer = TranscriptRenderer::with_zone(Rc::clone(&transcript), Utc);

        for index in 0..5 {
            let author = if index % 2 == 0 {
                MessageAuthor::User
            } else {
                MessageAuthor::Agent
            };
            renderer.on_message(&message(
                &format!("m{index}"),
                "2024-05-01T15:05:00+00:00",
                author,
            ));
        }

        let transcript = transcript.borrow();
        let bodies: Vec<_> = transcript.entries().iter().map(|e| e.body.as_str()).collect();
        assert_eq!(bodies, vec!["m0", "m1", "m2", "m3", "m4"]);
        assert_eq!(transcript.scroll_top(), transcript.max_scroll_top());
        assert_eq!(transcript.scroll_top(), 3);
    }
}
