use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::io::recovery::{self, RecoveryEntry};
use crate::model::config::StorageConfig;
use crate::model::letter::Letter;
use crate::model::store::Store;
use crate::model::wish::WishItem;

/// Error type for data file I/O
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not create data directory {path}: {source}")]
    CreateDirError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed JSON in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not serialize: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// On-disk shape of the wishlist file: wishes keyed by partition. The pair
/// shares the single `shared` partition; any other key is carried through
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WishlistDoc {
    #[serde(default)]
    pub shared: Vec<WishItem>,
    #[serde(flatten)]
    pub others: IndexMap<String, serde_json::Value>,
}

/// Read the wishlist document. A missing file is an empty wishlist.
pub fn load_wishlist(path: &Path) -> Result<WishlistDoc, StoreError> {
    match read_if_exists(path)? {
        Some(text) => serde_json::from_str(&text).map_err(|e| StoreError::ParseError {
            path: path.to_path_buf(),
            source: e,
        }),
        None => Ok(WishlistDoc::default()),
    }
}

/// Read the letters document. A missing file is an empty list.
pub fn load_letters(path: &Path) -> Result<Vec<Letter>, StoreError> {
    match read_if_exists(path)? {
        Some(text) => serde_json::from_str(&text).map_err(|e| StoreError::ParseError {
            path: path.to_path_buf(),
            source: e,
        }),
        None => Ok(Vec::new()),
    }
}

/// Overwrite the wishlist file with a pretty-printed document. A failed
/// write is kept in `data_dir`'s recovery log.
pub fn save_wishlist(data_dir: &Path, path: &Path, doc: &WishlistDoc) -> Result<(), StoreError> {
    let content = serde_json::to_string_pretty(doc)?;
    write_document(data_dir, path, content)
}

/// Overwrite the letters file with a pretty-printed document
pub fn save_letters(data_dir: &Path, path: &Path, letters: &[Letter]) -> Result<(), StoreError> {
    let content = serde_json::to_string_pretty(letters)?;
    write_document(data_dir, path, content)
}

/// Load both documents into a fresh `Store`, creating the data directory if needed.
pub fn open_store(storage: &StorageConfig) -> Result<Store, StoreError> {
    fs::create_dir_all(&storage.data_dir).map_err(|e| StoreError::CreateDirError {
        path: storage.data_dir.clone(),
        source: e,
    })?;

    let doc = load_wishlist(&storage.wishlist_path())?;
    let letters = load_letters(&storage.letters_path())?;

    let mut store = Store::new(storage);
    for item in doc.shared {
        store.push_wish(item);
    }
    store.other_partitions = doc.others;
    for letter in letters {
        store.push_letter(letter);
    }
    Ok(store)
}

/// Write the store's current wishlist to disk
pub fn persist_wishlist(store: &Store) -> Result<(), StoreError> {
    let doc = WishlistDoc {
        shared: store.wish_items(),
        others: store.other_partitions.clone(),
    };
    save_wishlist(&store.data_dir, &store.wishlist_path, &doc)
}

/// Write the store's current letters to disk
pub fn persist_letters(store: &Store) -> Result<(), StoreError> {
    save_letters(&store.data_dir, &store.letters_path, &store.letter_items())
}

fn read_if_exists(path: &Path) -> Result<Option<String>, StoreError> {
    if !path.exists() {
        return Ok(None);
    }
    fs::read_to_string(path)
        .map(Some)
        .map_err(|e| StoreError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Atomic write; on failure the payload goes to the recovery log in `data_dir`.
fn write_document(data_dir: &Path, path: &Path, content: String) -> Result<(), StoreError> {
    if let Err(e) = recovery::atomic_write(path, content.as_bytes()) {
        let entry = RecoveryEntry::new(path, &e, content);
        recovery::log_recovery(data_dir, &entry);
        return Err(StoreError::WriteError {
            path: path.to_path_buf(),
            source: e,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::wish::Priority;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn storage(dir: &Path) -> StorageConfig {
        StorageConfig::in_dir(dir)
    }

    #[test]
    fn test_missing_files_load_empty() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&storage(tmp.path())).unwrap();
        assert!(store.wishes.is_empty());
        assert!(store.letters.is_empty());
        assert!(store.other_partitions.is_empty());
    }

    #[test]
    fn test_open_store_creates_data_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested/data");
        open_store(&storage(&dir)).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_empty_object_is_empty_wishlist() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("wishlist.json");
        fs::write(&path, "{}").unwrap();
        assert_eq!(load_wishlist(&path).unwrap(), WishlistDoc::default());
    }

    #[test]
    fn test_malformed_wishlist_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("wishlist.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_wishlist(&path).unwrap_err();
        assert!(matches!(err, StoreError::ParseError { .. }));
        assert!(err.to_string().contains("wishlist.json"));
    }

    #[test]
    fn test_malformed_letters_fail_open_store() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("letters.json"), r#"{"text": "not a list"}"#).unwrap();
        assert!(matches!(
            open_store(&storage(tmp.path())),
            Err(StoreError::ParseError { .. })
        ));
    }

    #[test]
    fn test_save_is_pretty_printed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("letters.json");
        let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        save_letters(tmp.path(), &path, &[Letter::new("Прости".into(), "alex".into(), at)]).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "[\n  {\n    \"text\": \"Прости\",\n    \"from\": \"alex\",\n    \"at\": \"2025-01-02T03:04:05Z\"\n  }\n]"
        );
    }

    #[test]
    fn test_unknown_partitions_survive_persist() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("wishlist.json"),
            r#"{
  "12345": [{"text": "old", "priority": "🔥 Очень хочу", "addedAt": "2024-12-01T00:00:00.000Z"}],
  "shared": [],
  "zzz": {"note": "kept"}
}"#,
        )
        .unwrap();

        let mut store = open_store(&storage(tmp.path())).unwrap();
        store.push_wish(WishItem::new("new".into(), Priority::Later, Utc::now()));
        persist_wishlist(&store).unwrap();

        let doc = load_wishlist(&tmp.path().join("wishlist.json")).unwrap();
        assert_eq!(doc.shared.len(), 1);
        assert_eq!(doc.shared[0].text, "new");
        let keys: Vec<&str> = doc.others.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["12345", "zzz"]);
        assert_eq!(doc.others["zzz"]["note"], "kept");
    }

    #[test]
    fn test_failed_write_goes_to_recovery_log() {
        let tmp = TempDir::new().unwrap();
        // A directory at the target path makes the rename fail
        let path = tmp.path().join("letters.json");
        fs::create_dir_all(path.join("occupied")).unwrap();

        let err = save_letters(tmp.path(), &path, &[]).unwrap_err();
        assert!(matches!(err, StoreError::WriteError { .. }));
        assert_eq!(recovery::recovery_entry_count(tmp.path()), 1);
    }

    #[test]
    fn test_failed_write_in_subdirectory_logs_to_data_dir() {
        let tmp = TempDir::new().unwrap();
        let storage = StorageConfig {
            letters_file: "archive/letters.json".into(),
            ..storage(tmp.path())
        };
        let store = open_store(&storage).unwrap();
        fs::create_dir_all(storage.letters_path().join("occupied")).unwrap();

        assert!(persist_letters(&store).is_err());
        assert_eq!(recovery::recovery_entry_count(tmp.path()), 1);
        assert_eq!(recovery::recovery_entry_count(&tmp.path().join("archive")), 0);
    }
}
