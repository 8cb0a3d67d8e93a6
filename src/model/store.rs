use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use indexmap::IndexMap;

use super::config::StorageConfig;
use super::letter::Letter;
use super::wish::WishItem;

/// Stable in-memory identifier for a stored record.
///
/// Ids are not persisted. Each store hands them out from a counter whose base
/// is its opening time in milliseconds shifted above `ID_SEQUENCE_BITS`, so
/// ids from an earlier run (including plain indices from older versions of
/// the bot) never resolve to a record of a later one.
pub type ItemId = u64;

/// Low bits of an id, counting records within one opened store
const ID_SEQUENCE_BITS: u32 = 20;

/// Highest base handed out so far in this process
static LAST_ID_BASE: AtomicU64 = AtomicU64::new(0);

/// First id for a newly opened store. Strictly above every base already used
/// in this process, even when two stores open within the same millisecond.
fn fresh_id_base() -> ItemId {
    let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
    let now = millis << ID_SEQUENCE_BITS;
    let step: u64 = 1 << ID_SEQUENCE_BITS;
    let next = |last: u64| now.max(last + step);
    match LAST_ID_BASE.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(next(last))) {
        Ok(prev) | Err(prev) => next(prev),
    }
}

/// A record together with its stable id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<T> {
    pub id: ItemId,
    pub item: T,
}

/// The pair's shared data, fully loaded in memory
#[derive(Debug)]
pub struct Store {
    /// Directory holding the recovery log
    pub data_dir: PathBuf,
    /// Path to the wishlist document
    pub wishlist_path: PathBuf,
    /// Path to the letters document
    pub letters_path: PathBuf,
    /// Wishes under the shared partition, in insertion order
    pub wishes: Vec<Entry<WishItem>>,
    /// Other partitions found in the wishlist document, kept verbatim
    pub other_partitions: IndexMap<String, serde_json::Value>,
    /// Letters in insertion order
    pub letters: Vec<Entry<Letter>>,
    next_id: ItemId,
}

impl Store {
    /// An empty store writing to the files named by `storage`
    pub fn new(storage: &StorageConfig) -> Self {
        Store {
            data_dir: storage.data_dir.clone(),
            wishlist_path: storage.wishlist_path(),
            letters_path: storage.letters_path(),
            wishes: Vec::new(),
            other_partitions: IndexMap::new(),
            letters: Vec::new(),
            next_id: fresh_id_base(),
        }
    }

    /// Hand out the next unused id
    pub fn next_id(&mut self) -> ItemId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append a wish, assigning it a fresh id
    pub fn push_wish(&mut self, item: WishItem) -> ItemId {
        let id = self.next_id();
        self.wishes.push(Entry { id, item });
        id
    }

    /// Append a letter, assigning it a fresh id
    pub fn push_letter(&mut self, item: Letter) -> ItemId {
        let id = self.next_id();
        self.letters.push(Entry { id, item });
        id
    }

    /// Current position of the wish with this id
    pub fn wish_position(&self, id: ItemId) -> Option<usize> {
        self.wishes.iter().position(|e| e.id == id)
    }

    /// Current position of the letter with this id
    pub fn letter_position(&self, id: ItemId) -> Option<usize> {
        self.letters.iter().position(|e| e.id == id)
    }

    pub fn wish_items(&self) -> Vec<WishItem> {
        self.wishes.iter().map(|e| e.item.clone()).collect()
    }

    pub fn letter_items(&self) -> Vec<Letter> {
        self.letters.iter().map(|e| e.item.clone()).collect()
    }
}
