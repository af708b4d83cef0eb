//! Advisory locking of a store directory through its `.lock` file.
//!
//! Writers take the lock exclusively and readers share it. Acquisition
//! retries every [`POLL_INTERVAL`] until the caller's timeout runs out.

use crate::error::ErrorCode;
use fs2::FileExt;
use std::{
    fs::{self, File, OpenOptions},
    io,
    path::{Path, PathBuf},
    thread,
    time::{Duration, Instant},
};

pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("lock timed out after {waited:?} at {}", path.display())]
    Timeout { path: PathBuf, waited: Duration },

    #[error("lock file error: {0}")]
    IoError(#[from] io::Error),
}

impl LockError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Timeout { .. } => ErrorCode::LockContention,
            Self::IoError(_) => ErrorCode::TicketWriteFailed,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Mode {
    Shared,
    Exclusive,
}

/// The open lock file; unlocked on drop.
#[derive(Debug)]
struct Held {
    file: File,
    path: PathBuf,
}

impl Held {
    fn take(path: &Path, timeout: Duration, mode: Mode) -> Result<Self, LockError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)?;

        let deadline = Instant::now() + timeout;
        loop {
            let attempt = match mode {
                Mode::Shared => FileExt::try_lock_shared(&file),
                Mode::Exclusive => FileExt::try_lock_exclusive(&file),
            };
            if attempt.is_ok() {
                tracing::trace!(path = %path.display(), ?mode, "lock taken");
                return Ok(Self {
                    file,
                    path: path.to_path_buf(),
                });
            }
            if Instant::now() >= deadline {
                return Err(LockError::Timeout {
                    path: path.to_path_buf(),
                    waited: timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Drop for Held {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Held for the whole of a mutating store operation.
#[derive(Debug)]
pub struct StoreWriteLock {
    held: Held,
}

impl StoreWriteLock {
    /// Acquire an exclusive advisory lock on the lock path.
    ///
    /// # Errors
    ///
    /// [`LockError::Timeout`] if another holder keeps the lock past `timeout`,
    /// [`LockError::IoError`] if the lock file cannot be opened.
    pub fn acquire(path: &Path, timeout: Duration) -> Result<Self, LockError> {
        Ok(Self {
            held: Held::take(path, timeout, Mode::Exclusive)?,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.held.path
    }
}

/// Held while tickets are read.
#[derive(Debug)]
pub struct StoreReadLock {
    held: Held,
}

impl StoreReadLock {
    /// Acquire a shared advisory lock on the lock path.
    ///
    /// # Errors
    ///
    /// [`LockError::Timeout`] while a writer holds the lock past `timeout`,
    /// [`LockError::IoError`] if the lock file cannot be opened.
    pub fn acquire(path: &Path, timeout: Duration) -> Result<Self, LockError> {
        Ok(Self {
            held: Held::take(path, timeout, Mode::Shared)?,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.held.path
    }
}
