//! Advisory lock over a data directory.
//!
//! Held across read position → select → advance → persist so two processes
//! cannot both draw from the same position and append diverging history.

use crate::Result;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::Path;

const LOCK_FILE: &str = ".stalot.lock";

/// Exclusive lock on a data directory, released on drop
#[derive(Debug)]
pub struct DataDirLock {
    file: File,
}

impl DataDirLock {
    /// Block until the directory's lock is ours
    pub fn acquire(data_dir: &Path) -> Result<Self> {
        let file = open_lock_file(data_dir)?;

        file.lock_exclusive()?;
        tracing::debug!("Locked data directory {:?}", data_dir);
        Ok(Self { file })
    }

    /// Take the lock only if nobody else holds it
    pub fn try_acquire(data_dir: &Path) -> Result<Option<Self>> {
        let file = open_lock_file(data_dir)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self { file })),
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn open_lock_file(data_dir: &Path) -> Result<File> {
    std::fs::create_dir_all(data_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(data_dir.join(LOCK_FILE))?;
    Ok(file)
}

impl Drop for DataDirLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            tracing::warn!("Failed to release data directory lock: {}", e);
        }
    }
}
