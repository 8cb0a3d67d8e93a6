use std::path::PathBuf;

use serde::Serialize;

/// Result of `pairbox check`
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub data_dir: PathBuf,
    pub wishlist_file: PathBuf,
    pub wishes: usize,
    /// Partitions other than the shared one, carried through untouched
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub other_partitions: Vec<String>,
    pub letters_file: PathBuf,
    pub letters: usize,
    pub recovery_entries: usize,
}

impl CheckReport {
    pub fn to_text(&self) -> String {
        let mut out = format!(
            "data dir: {}\nwishlist: {} item(s) in {}\n",
            self.data_dir.display(),
            self.wishes,
            self.wishlist_file.display()
        );
        if !self.other_partitions.is_empty() {
            out.push_str(&format!(
                "  other partitions: {}\n",
                self.other_partitions.join(", ")
            ));
        }
        out.push_str(&format!(
            "letters: {} letter(s) in {}\n",
            self.letters,
            self.letters_file.display()
        ));
        if self.recovery_entries > 0 {
            out.push_str(&format!(
                "recovery log: {} unsaved write(s), see {}\n",
                self.recovery_entries,
                self.data_dir.join(".recovery.log").display()
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_omits_empty_sections() {
        let report = CheckReport {
            data_dir: "/d".into(),
            wishlist_file: "/d/wishlist.json".into(),
            wishes: 2,
            other_partitions: vec![],
            letters_file: "/d/letters.json".into(),
            letters: 0,
            recovery_entries: 0,
        };
        assert_eq!(
            report.to_text(),
            "data dir: /d\nwishlist: 2 item(s) in /d/wishlist.json\nletters: 0 letter(s) in /d/letters.json\n"
        );
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("other_partitions").is_none());
        assert_eq!(json["wishes"], 2);
    }
}
