use crate::ops::{letter_ops, wish_ops};

use super::action::Action;
use super::app::{App, Outbound, save_failed};
use super::screen::{self, Screen};
use super::session::{ChatId, Session};

pub const MAIN_CAPTION: &str = "📋 Главное меню:";
pub const WISHLIST_CAPTION: &str = "🎁 Общее меню вишлиста:";
pub const LETTERS_CAPTION: &str = "💌 Меню примирительных писем:";
pub const WISH_NOT_FOUND: &str = "❗️ Пункт не найден.";

/// Apply a button press and produce the next screen.
pub fn handle_action(
    app: &mut App,
    chat_id: ChatId,
    action: Action,
    message_id: Option<i64>,
) -> Outbound {
    let screen = match action {
        Action::BackMain => screen::main_menu(MAIN_CAPTION),

        // Wishlist
        Action::WishlistMenu => screen::wishlist_menu(WISHLIST_CAPTION),
        Action::AddWish => {
            app.sessions.set(chat_id, Session::AwaitingWishText);
            Screen::text("✏️ Что добавить в общий вишлист?")
        }
        Action::ViewWishlist => screen::wishlist_menu(wish_ops::view_wishlist(&app.store)),
        Action::StartRemoveWish => {
            if app.store.wishes.is_empty() {
                screen::wishlist_menu("Пусто. Нечего удалять.")
            } else {
                screen::wish_remove_picker(&app.store, app.label_max)
            }
        }
        Action::RemoveWish(id) => {
            let caption = match wish_ops::remove_wish_by_id(&mut app.store, id) {
                Ok(Some(_)) => "🎁 Меню вишлиста:".to_string(),
                Ok(None) => WISH_NOT_FOUND.to_string(),
                Err(e) => save_failed(e),
            };
            screen::wishlist_menu(caption)
        }
        Action::SetPriority(priority) => match app.sessions.clear(chat_id) {
            Session::AwaitingPriority { draft } => {
                let caption = match wish_ops::add_wish(&mut app.store, draft.clone(), priority) {
                    Ok(_) => format!("✅ Добавлено: {} — {}", priority.label(), draft),
                    Err(e) => save_failed(e),
                };
                screen::wishlist_menu(caption)
            }
            other => {
                // A priority button from an old picker: nothing is pending
                app.sessions.set(chat_id, other);
                screen::wishlist_menu(WISHLIST_CAPTION)
            }
        },

        // Letters
        Action::LetterMenu => screen::letters_menu(LETTERS_CAPTION),
        Action::AddLetter => {
            app.sessions.set(chat_id, Session::AwaitingLetterText);
            return Outbound::send(
                chat_id,
                Screen::text("✏️ Напиши своё примирительное письмо:"),
            );
        }
        Action::ViewLetters => {
            if app.store.letters.is_empty() {
                screen::letters_menu("📭 Писем пока нет.")
            } else {
                screen::letter_list(&app.store, app.label_max)
            }
        }
        Action::ViewLetter(id) => {
            let caption = match app.store.letter_position(id) {
                Some(index) => letter_ops::view_letter_detail(&app.store, index),
                None => letter_ops::LETTER_NOT_FOUND.to_string(),
            };
            screen::letters_menu(caption)
        }
        Action::DeleteLettersMenu => {
            if app.store.letters.is_empty() {
                screen::letters_menu("📭 Нет писем для удаления.")
            } else {
                screen::letter_delete_picker(&app.store, app.label_max)
            }
        }
        Action::DeleteLetter(id) => {
            let caption = match letter_ops::remove_letter_by_id(&mut app.store, id) {
                Ok(Some(_)) => "✅ Письмо удалено.".to_string(),
                Ok(None) => letter_ops::LETTER_NOT_FOUND.to_string(),
                Err(e) => save_failed(e),
            };
            screen::letters_menu(caption)
        }
    };
    Outbound::replace(chat_id, message_id, screen)
}
