use std::fmt;

use crate::model::store::ItemId;
use crate::model::wish::Priority;

/// Every button the bot can render. Encoded into Telegram callback data with
/// the same identifiers the buttons have always used, so keyboards already
/// sitting in the chat keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    BackMain,
    WishlistMenu,
    AddWish,
    ViewWishlist,
    StartRemoveWish,
    RemoveWish(ItemId),
    SetPriority(Priority),
    LetterMenu,
    AddLetter,
    ViewLetters,
    ViewLetter(ItemId),
    DeleteLettersMenu,
    DeleteLetter(ItemId),
}

impl Action {
    /// Decode callback data. Unknown or malformed data yields `None`.
    pub fn parse(data: &str) -> Option<Action> {
        let fixed = match data {
            "BACK_MAIN" => Some(Action::BackMain),
            "WISHLIST_MENU" => Some(Action::WishlistMenu),
            "ADD_WISH" => Some(Action::AddWish),
            "VIEW_WISH" => Some(Action::ViewWishlist),
            "START_REMOVE" => Some(Action::StartRemoveWish),
            "LETTER_MENU" => Some(Action::LetterMenu),
            "ADD_LETTER" => Some(Action::AddLetter),
            "VIEW_LETTERS" => Some(Action::ViewLetters),
            "DELETE_LETTERS_MENU" => Some(Action::DeleteLettersMenu),
            _ => None,
        };
        if fixed.is_some() {
            return fixed;
        }

        if let Some(rest) = data.strip_prefix("SET_PRIORITY_") {
            return rest
                .parse()
                .ok()
                .and_then(Priority::from_picker_id)
                .map(Action::SetPriority);
        }
        if let Some(rest) = data.strip_prefix("REMOVE_") {
            return rest.parse().ok().map(Action::RemoveWish);
        }
        if let Some(rest) = data.strip_prefix("VIEW_LETTER_") {
            return rest.parse().ok().map(Action::ViewLetter);
        }
        if let Some(rest) = data.strip_prefix("DELETE_LETTER_") {
            return rest.parse().ok().map(Action::DeleteLetter);
        }
        None
    }

    /// Encode as callback data (at most 64 bytes; ids keep it far below)
    pub fn callback_data(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::BackMain => write!(f, "BACK_MAIN"),
            Action::WishlistMenu => write!(f, "WISHLIST_MENU"),
            Action::AddWish => write!(f, "ADD_WISH"),
            Action::ViewWishlist => write!(f, "VIEW_WISH"),
            Action::StartRemoveWish => write!(f, "START_REMOVE"),
            Action::RemoveWish(id) => write!(f, "REMOVE_{}", id),
            Action::SetPriority(p) => write!(f, "SET_PRIORITY_{}", p.picker_id()),
            Action::LetterMenu => write!(f, "LETTER_MENU"),
            Action::AddLetter => write!(f, "ADD_LETTER"),
            Action::ViewLetters => write!(f, "VIEW_LETTERS"),
            Action::ViewLetter(id) => write!(f, "VIEW_LETTER_{}", id),
            Action::DeleteLettersMenu => write!(f, "DELETE_LETTERS_MENU"),
            Action::DeleteLetter(id) => write!(f, "DELETE_LETTER_{}", id),
        }
    }
}
