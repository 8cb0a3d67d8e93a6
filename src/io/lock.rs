use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

/// Advisory lock held for the lifetime of a running bot.
///
/// The store has no coordination between writers, so only one process may
/// serve a data directory at a time. Uses flock (Unix); the lock is released
/// when the file handle drops, including on crash.
pub struct InstanceLock {
    _file: File,
    path: PathBuf,
}

/// Error type for lock operations
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} is locked: another pairbox instance is serving this data directory")]
    Held { path: PathBuf },
}

impl InstanceLock {
    /// Take the lock on `data_dir` without waiting.
    pub fn acquire(data_dir: &Path) -> Result<Self, LockError> {
        let lock_path = data_dir.join(".lock");
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| LockError::CreateError {
                path: lock_path.clone(),
                source: e,
            })?;

        match try_lock(&file) {
            Ok(()) => Ok(InstanceLock {
                _file: file,
                path: lock_path,
            }),
            Err(_) => Err(LockError::Held { path: lock_path }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// Try to acquire an exclusive flock on the file (non-blocking)
#[cfg(unix)]
fn try_lock(file: &File) -> Result<(), std::io::Error> {
    use std::os::unix::io::AsRawFd;
    let fd = file.as_raw_fd();
    let result = unsafe { libc::flock(fd, libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> Result<(), std::io::Error> {
    Ok(())
}
