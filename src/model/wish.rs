use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How badly a wish is wanted. Persisted as its display label so that
/// files written by earlier versions of the bot stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "🔥 Очень хочу")]
    Urgent,
    #[serde(rename = "🕒 Нужно скоро")]
    Soon,
    #[serde(rename = "🌿 Можно подождать")]
    Later,
}

impl Priority {
    /// All priorities in picker order
    pub const ALL: [Priority; 3] = [Priority::Urgent, Priority::Soon, Priority::Later];

    /// The label shown on buttons and stored on disk
    pub fn label(self) -> &'static str {
        match self {
            Priority::Urgent => "🔥 Очень хочу",
            Priority::Soon => "🕒 Нужно скоро",
            Priority::Later => "🌿 Можно подождать",
        }
    }

    /// Numeric id carried in `SET_PRIORITY_<id>` callback data
    pub fn picker_id(self) -> u8 {
        match self {
            Priority::Urgent => 1,
            Priority::Soon => 2,
            Priority::Later => 3,
        }
    }

    pub fn from_picker_id(id: u8) -> Option<Priority> {
        Priority::ALL.into_iter().find(|p| p.picker_id() == id)
    }
}

/// A single wishlist entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishItem {
    /// What is wished for (trimmed user text)
    pub text: String,
    pub priority: Priority,
    /// When the wish was added
    #[serde(rename = "addedAt")]
    pub added_at: DateTime<Utc>,
}

impl WishItem {
    pub fn new(text: String, priority: Priority, added_at: DateTime<Utc>) -> Self {
        WishItem {
            text,
            priority,
            added_at,
        }
    }

    /// `"<priority> — <text>"`, used in list views and picker labels
    pub fn summary(&self) -> String {
        format!("{} — {}", self.priority.label(), self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn priority_serializes_as_label() {
        let json = serde_json::to_string(&Priority::Soon).unwrap();
        assert_eq!(json, "\"🕒 Нужно скоро\"");
        let back: Priority = serde_json::from_str("\"🌿 Можно подождать\"").unwrap();
        assert_eq!(back, Priority::Later);
    }

    #[test]
    fn unknown_priority_label_is_rejected() {
        assert!(serde_json::from_str::<Priority>("\"someday\"").is_err());
    }

    #[test]
    fn picker_ids_round_trip() {
        for p in Priority::ALL {
            assert_eq!(Priority::from_picker_id(p.picker_id()), Some(p));
        }
        assert_eq!(Priority::from_picker_id(0), None);
        assert_eq!(Priority::from_picker_id(4), None);
    }

    #[test]
    fn wish_uses_added_at_field_name() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let item = WishItem::new("Socks".into(), Priority::Urgent, at);
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["text"], "Socks");
        assert_eq!(value["priority"], "🔥 Очень хочу");
        assert!(value.get("addedAt").is_some());
        assert!(value.get("added_at").is_none());
    }

    #[test]
    fn wish_reads_javascript_iso_timestamps() {
        let item: WishItem = serde_json::from_str(
            r#"{"text":"Book","priority":"🕒 Нужно скоро","addedAt":"2025-02-14T09:30:00.000Z"}"#,
        )
        .unwrap();
        assert_eq!(
            item.added_at,
            Utc.with_ymd_and_hms(2025, 2, 14, 9, 30, 0).unwrap()
        );
        assert_eq!(item.summary(), "🕒 Нужно скоро — Book");
    }
}
