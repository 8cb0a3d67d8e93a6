use crate::ops::letter_ops;

use super::app::{App, Outbound, save_failed};
use super::event::Author;
use super::screen;
use super::session::{ChatId, Session};

/// Interpret free text according to the chat's session.
/// Text that no session is waiting for is dropped without a reply.
pub fn handle_text(
    app: &mut App,
    chat_id: ChatId,
    author: &Author,
    text: &str,
) -> Option<Outbound> {
    match app.sessions.peek(chat_id) {
        Session::AwaitingWishText => {
            let draft = text.trim().to_string();
            app.sessions.set(chat_id, Session::AwaitingPriority { draft });
            Some(Outbound::send(chat_id, screen::priority_picker()))
        }
        Session::AwaitingLetterText => {
            let body = text.trim().to_string();
            let from = author.display_name().to_string();
            app.sessions.clear(chat_id);
            let caption = match letter_ops::add_letter(&mut app.store, body, from) {
                Ok(_) => "✅ Письмо сохранено!".to_string(),
                Err(e) => save_failed(e),
            };
            Some(Outbound::send(chat_id, screen::main_menu(caption)))
        }
        Session::AwaitingPriority { .. } | Session::Idle => {
            log::debug!("chat {}: ignoring free text", chat_id);
            None
        }
    }
}
