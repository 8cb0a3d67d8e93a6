//! The subset of the Telegram Bot API the bot speaks.

use serde::{Deserialize, Serialize};

use crate::bot::{Author, Event, EventKind, Screen};

/// Envelope of every Bot API response
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    /// Absent for buttons on inline-mode messages; may be an inaccessible
    /// (very old) message, which still carries chat and message id.
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

#[derive(Debug, Serialize)]
pub struct GetUpdates<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    pub timeout: u64,
    pub allowed_updates: &'a [&'a str],
}

#[derive(Debug, Serialize)]
pub struct SendMessage<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
pub struct EditMessageText<'a> {
    pub chat_id: i64,
    pub message_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
pub struct AnswerCallbackQuery<'a> {
    pub callback_query_id: &'a str,
}

/// Inline keyboard for a screen, `None` for a bare-text screen
pub fn keyboard_markup(screen: &Screen) -> Option<InlineKeyboardMarkup> {
    let rows = screen.keyboard.as_ref()?;
    Some(InlineKeyboardMarkup {
        inline_keyboard: rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|b| InlineKeyboardButton {
                        text: b.label.clone(),
                        callback_data: b.action.callback_data(),
                    })
                    .collect()
            })
            .collect(),
    })
}

/// An update the bot understands, with the callback id still to be answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub event: Event,
    pub callback_id: Option<String>,
}

impl Update {
    /// Convert to a transport-neutral event. Updates the bot does not handle
    /// (edits, stickers, channel posts, inline-mode buttons) yield `None`.
    pub fn into_inbound(self) -> Option<Inbound> {
        if let Some(query) = self.callback_query {
            let message = query.message?;
            return Some(Inbound {
                event: Event {
                    chat_id: message.chat.id,
                    author: query.from.into(),
                    kind: EventKind::Action {
                        data: query.data.unwrap_or_default(),
                        message_id: Some(message.message_id),
                    },
                },
                callback_id: Some(query.id),
            });
        }

        let message = self.message?;
        let text = message.text?;
        let author: Author = message.from?.into();
        let kind = if is_start_command(&text) {
            EventKind::Start
        } else {
            EventKind::Text(text)
        };
        Some(Inbound {
            event: Event {
                chat_id: message.chat.id,
                author,
                kind,
            },
            callback_id: None,
        })
    }
}

impl From<User> for Author {
    fn from(user: User) -> Self {
        Author {
            username: user.username,
            first_name: user.first_name,
        }
    }
}

/// `/start`, `/start@SomeBot` and `/start <payload>` all count
fn is_start_command(text: &str) -> bool {
    let command = text.split_whitespace().next().unwrap_or("");
    command == "/start" || command.starts_with("/start@")
}
