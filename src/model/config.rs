use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration from pairbox.toml. Every field has a default, so an absent
/// or empty file is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the data files, the lock and the recovery log
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_wishlist_file")]
    pub wishlist_file: String,
    #[serde(default = "default_letters_file")]
    pub letters_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            data_dir: default_data_dir(),
            wishlist_file: default_wishlist_file(),
            letters_file: default_letters_file(),
        }
    }
}

impl StorageConfig {
    /// Default file names under `data_dir`
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        StorageConfig {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    pub fn wishlist_path(&self) -> PathBuf {
        self.data_dir.join(&self.wishlist_file)
    }

    pub fn letters_path(&self) -> PathBuf {
        self.data_dir.join(&self.letters_file)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API base URL, without the `/bot<token>` suffix
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Long-poll timeout passed to getUpdates
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        TelegramConfig {
            api_url: default_api_url(),
            poll_timeout_secs: default_poll_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Longest summary shown on a picker button, in grapheme clusters
    #[serde(default = "default_label_max")]
    pub label_max_graphemes: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            label_max_graphemes: default_label_max(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// env_logger filter used when RUST_LOG is unset (e.g. "info", "pairbox=debug")
    #[serde(default)]
    pub level: Option<String>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_wishlist_file() -> String {
    "wishlist.json".to_string()
}

fn default_letters_file() -> String {
    "letters.json".to_string()
}

fn default_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout() -> u64 {
    30
}

fn default_label_max() -> usize {
    48
}
