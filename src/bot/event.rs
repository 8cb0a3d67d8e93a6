use super::session::ChatId;

/// Who sent an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub username: Option<String>,
    pub first_name: String,
}

impl Author {
    /// Handle if the user has one, else their first name
    pub fn display_name(&self) -> &str {
        match self.username.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.first_name,
        }
    }
}

/// What happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// The `/start` command
    Start,
    /// A free-text message
    Text(String),
    /// A button press. `message_id` is the message carrying the keyboard,
    /// when Telegram still lets us touch it.
    Action {
        data: String,
        message_id: Option<i64>,
    },
}

/// A transport-neutral inbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub chat_id: ChatId,
    pub author: Author,
    pub kind: EventKind,
}
