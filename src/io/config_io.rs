use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::BotConfig;

/// Error type for config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Read the config file. A missing file yields the defaults unless
/// `required` is set (the user named the file explicitly).
pub fn read_config(path: &Path, required: bool) -> Result<BotConfig, ConfigError> {
    if !required && !path.exists() {
        return Ok(BotConfig::default());
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_optional_config_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = read_config(&tmp.path().join("pairbox.toml"), false).unwrap();
        assert_eq!(config.storage.wishlist_file, "wishlist.json");
        assert_eq!(config.storage.letters_file, "letters.json");
        assert_eq!(config.telegram.api_url, "https://api.telegram.org");
        assert_eq!(config.telegram.poll_timeout_secs, 30);
        assert_eq!(config.ui.label_max_graphemes, 48);
        assert!(config.log.level.is_none());
    }

    #[test]
    fn test_missing_required_config_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = read_config(&tmp.path().join("nope.toml"), true);
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pairbox.toml");
        fs::write(
            &path,
            r#"
[storage]
data_dir = "/var/lib/pairbox"

[telegram]
poll_timeout_secs = 5

[log]
level = "pairbox=debug"
"#,
        )
        .unwrap();

        let config = read_config(&path, false).unwrap();
        assert_eq!(
            config.storage.wishlist_path(),
            PathBuf::from("/var/lib/pairbox/wishlist.json")
        );
        assert_eq!(config.telegram.poll_timeout_secs, 5);
        assert_eq!(config.telegram.api_url, "https://api.telegram.org");
        assert_eq!(config.log.level.as_deref(), Some("pairbox=debug"));
    }

    #[test]
    fn test_bad_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pairbox.toml");
        fs::write(&path, "[storage\n").unwrap();
        assert!(matches!(
            read_config(&path, false),
            Err(ConfigError::ParseError { .. })
        ));
    }
}
