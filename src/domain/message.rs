use chrono::{DateTime, FixedOffset};

/// Sender label shown on every agent message.
pub const AGENT_LABEL: &str = "Air Helper";

/// Sender label shown on the viewer's own messages.
pub const USER_LABEL: &str = "You";

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageAuthor {
    /// The person at the keyboard.
    User,
    /// The automated helper on the other end of the channel.
    #[default]
    Agent,
}

impl MessageAuthor {
    pub fn from_user_flag(is_from_user: bool) -> Self {
        if is_from_user {
            Self::User
        } else {
            Self::Agent
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::User => USER_LABEL,
            Self::Agent => AGENT_LABEL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub message: String,
    pub datetime: DateTime<FixedOffset>,
    pub author: MessageAuthor,
}

impl ChatMessage {
    pub fn is_from_user(&self) -> bool {
        self.author == MessageAuthor::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(author: MessageAuthor) -> ChatMessage {
        ChatMessage {
            message: "hello".to_owned(),
            datetime: DateTime::parse_from_rfc3339("2024-05-01T15:05:00+00:00")
                .expect("fixture timestamp should parse"),
            author,
        }
    }

    #[test]
    fn user_flag_maps_to_author() {
        assert_eq!(MessageAuthor::from_user_flag(true), MessageAuthor::User);
        assert_eq!(MessageAuthor::from_user_flag(false), MessageAuthor::Agent);
    }

    #[test]
    fn is_from_user_follows_author() {
        assert!(message(MessageAuthor::User).is_from_user());
        assert!(!message(MessageAuthor::Agent).is_from_user());
    }

    #[test]
    fn labels_are_fixed_per_author() {
        assert_eq!(MessageAuthor::Agent.label(), "Air Helper");
        assert_eq!(MessageAuthor::User.label(), "You");
    }

    #[test]
    fn default_author_is_agent() {
        assert_eq!(MessageAuthor::default(), MessageAuthor::Agent);
    }
}
