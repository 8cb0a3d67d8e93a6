use crate::io::store_io::StoreError;
use crate::model::config::UiConfig;
use crate::model::store::Store;

use super::action::Action;
use super::event::{Author, Event, EventKind};
use super::session::{ChatId, SessionStore};
use super::screen::{self, Screen};
use super::{input, menu};

/// Caption shown in place of the usual one when a change could not be written
pub const SAVE_FAILED: &str = "⚠️ Не удалось сохранить изменения.";

/// How a screen reaches the chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Post a new message
    Send,
    /// Replace an existing message's text and keyboard
    Edit { message_id: i64 },
}

/// A screen addressed to a chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub chat_id: ChatId,
    pub screen: Screen,
    pub delivery: Delivery,
}

impl Outbound {
    pub fn send(chat_id: ChatId, screen: Screen) -> Self {
        Outbound {
            chat_id,
            screen,
            delivery: Delivery::Send,
        }
    }

    /// Update the pressed message in place, or post anew when it is unknown
    pub fn replace(chat_id: ChatId, message_id: Option<i64>, screen: Screen) -> Self {
        let delivery = match message_id {
            Some(message_id) => Delivery::Edit { message_id },
            None => Delivery::Send,
        };
        Outbound {
            chat_id,
            screen,
            delivery,
        }
    }
}

/// Bot state: the shared store and per-chat sessions
pub struct App {
    pub store: Store,
    pub sessions: SessionStore,
    /// Longest picker summary, in grapheme clusters
    pub label_max: usize,
}

impl App {
    pub fn new(store: Store, ui: &UiConfig) -> Self {
        App {
            store,
            sessions: SessionStore::new(),
            label_max: ui.label_max_graphemes,
        }
    }

    /// Route one inbound event. `None` means no reply.
    pub fn handle(&mut self, event: Event) -> Option<Outbound> {
        let Event {
            chat_id,
            author,
            kind,
        } = event;
        match kind {
            EventKind::Start => Some(self.start(chat_id, &author)),
            EventKind::Text(text) => input::handle_text(self, chat_id, &author, &text),
            EventKind::Action { data, message_id } => match Action::parse(&data) {
                Some(action) => {
                    log::debug!("chat {}: action {}", chat_id, action);
                    Some(menu::handle_action(self, chat_id, action, message_id))
                }
                None => {
                    log::debug!("chat {}: ignoring unknown callback data {:?}", chat_id, data);
                    None
                }
            },
        }
    }

    fn start(&mut self, chat_id: ChatId, author: &Author) -> Outbound {
        self.sessions.clear(chat_id);
        let greeting = format!(
            "Привет, {}! Это ваш общий вишлист 💑",
            author.first_name
        );
        Outbound::send(chat_id, screen::main_menu(greeting))
    }
}

/// Log a failed save and return the warning caption
pub(super) fn save_failed(err: StoreError) -> String {
    log::error!("{}", err);
    SAVE_FAILED.to_string()
}
