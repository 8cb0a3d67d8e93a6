use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reconciliation letter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Letter {
    /// Letter body (trimmed user text)
    pub text: String,
    /// Author display name (username, else first name)
    pub from: String,
    /// When the letter was written
    pub at: DateTime<Utc>,
}

impl Letter {
    pub fn new(text: String, from: String, at: DateTime<Utc>) -> Self {
        Letter { text, from, at }
    }
}
