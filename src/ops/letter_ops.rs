use chrono::{DateTime, Local, Utc};

use crate::io::store_io::{self, StoreError};
use crate::model::letter::Letter;
use crate::model::store::{ItemId, Store};

/// Shown when a letter index or id no longer resolves
pub const LETTER_NOT_FOUND: &str = "❗️ Письмо не найдено.";

/// Append a letter stamped with the current time and persist.
pub fn add_letter(store: &mut Store, text: String, author: String) -> Result<ItemId, StoreError> {
    add_letter_at(store, text, author, Utc::now())
}

/// Append a letter with an explicit timestamp and persist.
pub fn add_letter_at(
    store: &mut Store,
    text: String,
    author: String,
    at: DateTime<Utc>,
) -> Result<ItemId, StoreError> {
    let id = store.push_letter(Letter::new(text, author, at));
    store_io::persist_letters(store)?;
    Ok(id)
}

/// Remove the letter at `index` (0-based) and persist. Out of range is a no-op.
pub fn remove_letter(store: &mut Store, index: usize) -> Result<Option<Letter>, StoreError> {
    if index >= store.letters.len() {
        return Ok(None);
    }
    let removed = store.letters.remove(index);
    store_io::persist_letters(store)?;
    Ok(Some(removed.item))
}

/// Remove the letter carrying `id`, wherever it sits now.
pub fn remove_letter_by_id(store: &mut Store, id: ItemId) -> Result<Option<Letter>, StoreError> {
    match store.letter_position(id) {
        Some(index) => remove_letter(store, index),
        None => Ok(None),
    }
}

/// Full letter: author, local timestamp, body.
pub fn view_letter_detail(store: &Store, index: usize) -> String {
    match store.letters.get(index) {
        Some(entry) => {
            let l = &entry.item;
            format!(
                "✉️ Письмо от {} ({}):\n\n{}",
                l.from,
                format_date_time(&l.at),
                l.text
            )
        }
        None => LETTER_NOT_FOUND.to_string(),
    }
}

/// Day-level date in the host's local time zone
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%d.%m.%Y").to_string()
}

pub fn format_date_time(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%d.%m.%Y, %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store_io::load_letters;
    use crate::model::config::StorageConfig;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn temp_store(dir: &TempDir) -> Store {
        Store::new(&StorageConfig::in_dir(dir.path()))
    }

    #[test]
    fn test_add_then_view_detail() {
        let tmp = TempDir::new().unwrap();
        let mut store = temp_store(&tmp);
        add_letter(&mut store, "Прости меня".into(), "alex".into()).unwrap();

        let detail = view_letter_detail(&store, 0);
        assert!(detail.starts_with("✉️ Письмо от alex ("));
        assert!(detail.ends_with("):\n\nПрости меня"));
    }

    #[test]
    fn test_view_missing_letter() {
        let tmp = TempDir::new().unwrap();
        let store = temp_store(&tmp);
        assert_eq!(view_letter_detail(&store, 0), "❗️ Письмо не найдено.");
    }

    #[test]
    fn test_add_persists_with_timestamp() {
        let tmp = TempDir::new().unwrap();
        let mut store = temp_store(&tmp);
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        add_letter_at(&mut store, "hi".into(), "sam".into(), at).unwrap();

        let letters = load_letters(&store.letters_path).unwrap();
        assert_eq!(letters, vec![Letter::new("hi".into(), "sam".into(), at)]);
    }

    #[test]
    fn test_remove_in_and_out_of_range() {
        let tmp = TempDir::new().unwrap();
        let mut store = temp_store(&tmp);
        add_letter(&mut store, "one".into(), "a".into()).unwrap();
        add_letter(&mut store, "two".into(), "b".into()).unwrap();

        assert_eq!(remove_letter(&mut store, 2).unwrap(), None);
        assert_eq!(store.letters.len(), 2);

        let removed = remove_letter(&mut store, 0).unwrap().unwrap();
        assert_eq!(removed.text, "one");
        assert_eq!(store.letters[0].item.text, "two");
        assert_eq!(load_letters(&store.letters_path).unwrap().len(), 1);
    }

    #[test]
    fn test_remove_by_stale_id() {
        let tmp = TempDir::new().unwrap();
        let mut store = temp_store(&tmp);
        let id = add_letter(&mut store, "one".into(), "a".into()).unwrap();
        assert!(remove_letter_by_id(&mut store, id).unwrap().is_some());
        assert!(remove_letter_by_id(&mut store, id).unwrap().is_none());
    }
}
