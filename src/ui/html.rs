//! HTML fragments for transcript entries, matching the site's chat markup.
//!
//! Message text comes from the network and is always escaped.

use crate::domain::{
    message::{MessageAuthor, AGENT_LABEL},
    transcript::TranscriptEntry,
};

pub fn render_entry_html(entry: &TranscriptEntry) -> String {
    let time = escape_html(&entry.time);
    let body = escape_html(&entry.body);

    match entry.author {
        MessageAuthor::User => format!(
            r#"<div class="chat-message message-user">
    <div class="chat-message-content">
        <span class="chat-time">{time}</span>
        <p>{body}</p>
    </div>
</div>"#
        ),
        MessageAuthor::Agent => format!(
            r#"<div class="chat-message message-bot">
    <div class="chat-message-content">
        <span class="chat-time">{time}</span>
        <h5>{AGENT_LABEL}</h5>
        <p>{body}</p>
    </div>
</div>"#
        ),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
