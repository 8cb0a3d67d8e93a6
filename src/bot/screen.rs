use std::fmt;

use unicode_segmentation::UnicodeSegmentation;

use super::action::Action;
use crate::model::store::Store;
use crate::model::wish::Priority;
use crate::ops::letter_ops;

/// A labeled, selectable button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: Action,
}

impl Button {
    pub fn new(label: impl Into<String>, action: Action) -> Self {
        Button {
            label: label.into(),
            action,
        }
    }
}

/// A caption plus rows of buttons. `keyboard: None` renders bare text and,
/// on an in-place update, removes the previous keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub caption: String,
    pub keyboard: Option<Vec<Vec<Button>>>,
}

impl Screen {
    /// Caption only
    pub fn text(caption: impl Into<String>) -> Self {
        Screen {
            caption: caption.into(),
            keyboard: None,
        }
    }

    /// One button per row
    pub fn column(caption: impl Into<String>, buttons: Vec<Button>) -> Self {
        Screen {
            caption: caption.into(),
            keyboard: Some(buttons.into_iter().map(|b| vec![b]).collect()),
        }
    }

    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.keyboard.iter().flatten().flatten()
    }
}

/// Plain-text rendering for logs and tests: caption, then one line per row.
impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.caption)?;
        for row in self.keyboard.iter().flatten() {
            let labels: Vec<String> = row.iter().map(|b| format!("[{}]", b.label)).collect();
            write!(f, "\n{}", labels.join(" "))?;
        }
        Ok(())
    }
}

pub fn main_menu(caption: impl Into<String>) -> Screen {
    Screen::column(
        caption,
        vec![
            Button::new("🎁 Вишлист", Action::WishlistMenu),
            Button::new("💌 Примирительные письма", Action::LetterMenu),
        ],
    )
}

pub fn wishlist_menu(caption: impl Into<String>) -> Screen {
    Screen::column(
        caption,
        vec![
            Button::new("➕ Добавить пункт", Action::AddWish),
            Button::new("📜 Показать вишлист", Action::ViewWishlist),
            Button::new("🗑️ Удалить пункт", Action::StartRemoveWish),
            Button::new("🔙 Назад", Action::BackMain),
        ],
    )
}

pub fn letters_menu(caption: impl Into<String>) -> Screen {
    Screen::column(
        caption,
        vec![
            Button::new("✍️ Написать письмо", Action::AddLetter),
            Button::new("📬 Просмотреть письма", Action::ViewLetters),
            Button::new("🗑️ Удалить письмо", Action::DeleteLettersMenu),
            Button::new("🔙 Назад", Action::BackMain),
        ],
    )
}

pub fn priority_picker() -> Screen {
    Screen::column(
        "Выбери приоритет:",
        Priority::ALL
            .into_iter()
            .map(|p| Button::new(p.label(), Action::SetPriority(p)))
            .collect(),
    )
}

/// One button per wish, labelled with its current position.
/// Callers handle the empty list.
pub fn wish_remove_picker(store: &Store, label_max: usize) -> Screen {
    let mut buttons: Vec<Button> = store
        .wishes
        .iter()
        .enumerate()
        .map(|(i, e)| {
            Button::new(
                picker_label(i, &e.item.summary(), label_max),
                Action::RemoveWish(e.id),
            )
        })
        .collect();
    buttons.push(Button::new("❌ Отмена", Action::WishlistMenu));
    Screen::column("Выбери пункт для удаления:", buttons)
}

pub fn letter_list(store: &Store, label_max: usize) -> Screen {
    let mut buttons: Vec<Button> = store
        .letters
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let summary = format!(
                "от {} ({})",
                e.item.from,
                letter_ops::format_date(&e.item.at)
            );
            Button::new(picker_label(i, &summary, label_max), Action::ViewLetter(e.id))
        })
        .collect();
    buttons.push(Button::new("🔙 Назад", Action::LetterMenu));
    Screen::column("📬 Выберите письмо:", buttons)
}

pub fn letter_delete_picker(store: &Store, label_max: usize) -> Screen {
    let mut buttons: Vec<Button> = store
        .letters
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let summary = format!("от {}", e.item.from);
            Button::new(
                picker_label(i, &summary, label_max),
                Action::DeleteLetter(e.id),
            )
        })
        .collect();
    buttons.push(Button::new("❌ Отмена", Action::LetterMenu));
    Screen::column("🗑️ Выберите письмо для удаления:", buttons)
}

/// `"<1-based position>. <summary>"`, summary cut to `max` grapheme clusters
fn picker_label(index: usize, summary: &str, max: usize) -> String {
    format!("{}. {}", index + 1, truncate_graphemes(summary, max))
}

pub fn truncate_graphemes(s: &str, max: usize) -> String {
    let mut graphemes = s.graphemes(true);
    let head: String = graphemes.by_ref().take(max).collect();
    if graphemes.next().is_some() {
        format!("{}…", head.trim_end())
    } else {
        head
    }
}
