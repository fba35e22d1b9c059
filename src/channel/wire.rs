//! JSON text frames exchanged with the chat bot.
//!
//! Outbound: `{"message": "..."}`.
//! Inbound: `{"message": "...", "datetime": "<ISO-8601>", "is_message_from_user": bool}`.
//! Unknown inbound fields are ignored.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::message::{ChatMessage, MessageAuthor};

const NAIVE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[derive(Debug, Error)]
pub enum MalformedPayload {
    #[error("frame is not a chat message object: {0}")]
    Json(#[from] serde_json::Error),
    #[error("frame datetime `{value}` is not a timestamp")]
    Datetime { value: String },
}

#[derive(Debug, Deserialize)]
struct InboundFrame {
    message: String,
    #[serde(default)]
    datetime: Option<String>,
    #[serde(default)]
    is_message_from_user: Option<bool>,
}

pub fn encode_outbound(text: &str) -> String {
    serde_json::json!({ "message": text }).to_string()
}

/// Decodes an inbound frame. `received_at` stands in for a missing `datetime`.
pub fn decode_inbound(
    payload: &str,
    received_at: DateTime<FixedOffset>,
) -> Result<ChatMessage, MalformedPayload> {
    let frame: InboundFrame = serde_json::from_str(payload)?;

    let datetime = match frame.datetime.as_deref() {
        Some(value) => parse_datetime(value)?,
        None => received_at,
    };

    Ok(ChatMessage {
        message: frame.message,
        datetime,
        author: MessageAuthor::from_user_flag(frame.is_message_from_user.unwrap_or(false)),
    })
}

/// Offset timestamps are kept as sent; naive ones are read as local time.
fn parse_datetime(value: &str) -> Result<DateTime<FixedOffset>, MalformedPayload> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Ok(datetime);
    }

    NaiveDateTime::parse_from_str(value, NAIVE_DATETIME_FORMAT)
        .ok()
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|local| local.fixed_offset())
        .ok_or_else(|| MalformedPayload::Datetime {
            value: value.to_owned(),
        })
}
