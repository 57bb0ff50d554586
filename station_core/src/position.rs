//! Current-position persistence with file locking.
//!
//! The position file holds a single station index as decimal text.

use crate::{Error, Result};
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Durable storage for the current station index
pub trait PositionStore {
    /// `None` when nothing has been stored yet
    fn read(&self) -> Result<Option<usize>>;
    fn write(&mut self, index: usize) -> Result<()>;
}

/// Position stored in a plain text file
pub struct FilePositionStore {
    path: PathBuf,
}

impl FilePositionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PositionStore for FilePositionStore {
    /// Read the index under a shared lock
    ///
    /// Unlike history lines, a corrupt position cannot be skipped, so it is
    /// an error rather than a default.
    fn read(&self) -> Result<Option<usize>> {
        if !self.path.exists() {
            tracing::debug!("No position file at {:?}", self.path);
            return Ok(None);
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        let index = contents.trim().parse::<usize>().map_err(|e| {
            Error::State(format!(
                "position file {:?} holds '{}': {}",
                self.path,
                contents.trim(),
                e
            ))
        })?;

        tracing::debug!("Loaded position {} from {:?}", index, self.path);
        Ok(Some(index))
    }

    /// Save the index atomically
    ///
    /// Writes to a temp file in the same directory, syncs it, then renames
    /// it over the original. A reader holding the old file keeps reading the
    /// old inode, so it sees the previous index or the new one, never a mix.
    /// Writers are serialized by [`DataDirLock`](crate::DataDirLock).
    fn write(&mut self, index: usize) -> Result<()> {
        let parent = self.path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "position path missing parent")
        })?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            write!(writer, "{}", index)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved position {} to {:?}", index, self.path);
        Ok(())
    }
}

/// In-memory position, for tests and embedding
#[derive(Clone, Debug, Default)]
pub struct MemoryPositionStore {
    index: Option<usize>,
}

impl MemoryPositionStore {
    pub fn new(index: Option<usize>) -> Self {
        Self { index }
    }
}

impl PositionStore for MemoryPositionStore {
    fn read(&self) -> Result<Option<usize>> {
        Ok(self.index)
    }

    fn write(&mut self, index: usize) -> Result<()> {
        self.index = Some(index);
        Ok(())
    }
}
