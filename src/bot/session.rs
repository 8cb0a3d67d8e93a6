use std::collections::HashMap;

/// Telegram chat identifier
pub type ChatId = i64;

/// What the next free-text message in a conversation means.
///
/// A draft only exists while a priority is pending, so an abandoned draft
/// cannot leak into a later wish.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Idle,
    /// Next text is a new wishlist item
    AwaitingWishText,
    /// Wish text captured; waiting for a priority button
    AwaitingPriority { draft: String },
    /// Next text is a letter body
    AwaitingLetterText,
}

/// In-memory per-chat sessions. Lost on restart.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<ChatId, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, chat_id: ChatId, session: Session) {
        self.sessions.insert(chat_id, session);
    }

    /// Reset to `Idle`, returning the previous state
    pub fn clear(&mut self, chat_id: ChatId) -> Session {
        self.sessions.remove(&chat_id).unwrap_or_default()
    }

    /// Read-only view; `Idle` for chats never seen
    pub fn peek(&self, chat_id: ChatId) -> &Session {
        static IDLE: Session = Session::Idle;
        self.sessions.get(&chat_id).unwrap_or(&IDLE)
    }
}
