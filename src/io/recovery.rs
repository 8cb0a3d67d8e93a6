use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

/// Size above which the oldest entries are dropped before the next append
const MAX_LOG_SIZE: u64 = 1_048_576;

/// Entries kept after a trim, in bytes (the newest ones that fit)
const TRIM_TARGET: usize = (MAX_LOG_SIZE / 2) as usize;

/// Header written at the top of a new recovery log.
const FILE_HEADER: &str = "\
<!-- pairbox recovery log: data that could not be saved normally.
     Copy an entry's JSON back into the named file to restore it.
     Safe to delete once reviewed. -->

---
";

/// A payload that failed to reach its file.
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    /// File the payload was meant for
    pub target: String,
    /// The write error
    pub error: String,
    /// The full serialized document
    pub body: String,
}

impl RecoveryEntry {
    pub fn new(target: &Path, error: &io::Error, body: String) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            target: target.display().to_string(),
            error: error.to_string(),
            body,
        }
    }

    fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {} write failed\n\nTarget: {}\nError: {}\n\n```json\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.target,
            self.error,
        );
        out.push_str(&self.body);
        if !self.body.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("```\n\n---\n");
        out
    }
}

/// Return the path to the recovery log file.
pub fn recovery_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(".recovery.log")
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut tmp = NamedTempFile::new_in(parent_dir(path))?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Directory a temp file for `path` must live in (same filesystem as the target).
pub(crate) fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Append an entry to the recovery log. Failures are logged, never returned.
pub fn log_recovery(data_dir: &Path, entry: &RecoveryEntry) {
    if let Err(e) = append_entry(data_dir, entry) {
        log::error!("could not write to recovery log: {}", e);
    }
}

fn append_entry(data_dir: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    let path = recovery_log_path(data_dir);

    if let Ok(meta) = std::fs::metadata(&path)
        && meta.len() > MAX_LOG_SIZE
        && let Err(e) = trim_log(&path, TRIM_TARGET)
    {
        log::warn!("could not trim recovery log {}: {}", path.display(), e);
    }

    let needs_header = std::fs::metadata(&path).map_or(true, |m| m.len() == 0);

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())
}

/// Drop the oldest entries so at most `budget` bytes of entries remain.
/// The header is kept.
fn trim_log(path: &Path, budget: usize) -> io::Result<()> {
    let content = std::fs::read_to_string(path)?;
    let starts = entry_starts(&content);
    let Some(&first) = starts.first() else {
        return Ok(());
    };
    let keep_from = starts
        .iter()
        .copied()
        .find(|&start| content.len() - start <= budget)
        .unwrap_or(content.len());

    let mut trimmed = String::with_capacity(first + content.len() - keep_from);
    trimmed.push_str(&content[..first]);
    trimmed.push_str(&content[keep_from..]);
    atomic_write(path, trimmed.as_bytes())
}

/// Byte offsets of entry headings. JSON bodies are indented or start with a
/// bracket, so no body line can look like a heading.
fn entry_starts(content: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if line.starts_with("## ") && line.trim_end().ends_with(" write failed") {
            starts.push(offset);
        }
        offset += line.len();
    }
    starts
}

/// Number of entries in the recovery log (0 when there is no log).
pub fn recovery_entry_count(data_dir: &Path) -> usize {
    std::fs::read_to_string(recovery_log_path(data_dir))
        .map(|content| entry_starts(&content).len())
        .unwrap_or(0)
}
