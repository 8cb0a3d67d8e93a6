use chrono::{DateTime, Utc};

use crate::io::store_io::{self, StoreError};
use crate::model::store::{ItemId, Store};
use crate::model::wish::{Priority, WishItem};

/// Shown instead of the list when the wishlist is empty
pub const EMPTY_WISHLIST: &str = "🏷️ Вишлист пуст.";

/// Append a wish stamped with the current time and persist.
/// Duplicates are allowed.
pub fn add_wish(store: &mut Store, text: String, priority: Priority) -> Result<ItemId, StoreError> {
    add_wish_at(store, text, priority, Utc::now())
}

/// Append a wish with an explicit timestamp and persist.
pub fn add_wish_at(
    store: &mut Store,
    text: String,
    priority: Priority,
    at: DateTime<Utc>,
) -> Result<ItemId, StoreError> {
    let id = store.push_wish(WishItem::new(text, priority, at));
    store_io::persist_wishlist(store)?;
    Ok(id)
}

/// Remove the wish at `index` (0-based) and persist.
/// Out of range is a no-op returning `None`; nothing is written.
pub fn remove_wish(store: &mut Store, index: usize) -> Result<Option<WishItem>, StoreError> {
    if index >= store.wishes.len() {
        return Ok(None);
    }
    let removed = store.wishes.remove(index);
    store_io::persist_wishlist(store)?;
    Ok(Some(removed.item))
}

/// Remove the wish carrying `id`, wherever it sits now.
pub fn remove_wish_by_id(store: &mut Store, id: ItemId) -> Result<Option<WishItem>, StoreError> {
    match store.wish_position(id) {
        Some(index) => remove_wish(store, index),
        None => Ok(None),
    }
}

/// Render the wishlist as `"<pos>. <priority> — <text>"` lines under a header.
pub fn view_wishlist(store: &Store) -> String {
    if store.wishes.is_empty() {
        return EMPTY_WISHLIST.to_string();
    }
    let lines: Vec<String> = store
        .wishes
        .iter()
        .enumerate()
        .map(|(i, e)| format!("{}. {}", i + 1, e.item.summary()))
        .collect();
    format!("📜 Общий вишлист:\n{}", lines.join("\n"))
}
