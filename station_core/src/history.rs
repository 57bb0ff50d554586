//! Visit history log.
//!
//! Visits are appended one per line as
//! `{index}, {name}, {latitude}, {longitude}, {address}`, with file locking
//! to ensure safe concurrent access.

use crate::{Result, VisitRecord};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Field separator in a history line; station names may not contain it
pub(crate) const SEPARATOR: &str = ", ";

/// Append-only storage for visit records
pub trait HistoryStore {
    fn append(&mut self, record: &VisitRecord) -> Result<()>;
    fn read_all(&self) -> Result<Vec<VisitRecord>>;
    /// Drop every record; only a trip reset calls this
    fn clear(&mut self) -> Result<()>;
}

/// Render a record as one history line (without the newline)
///
/// Coordinates always carry a decimal point (`121.0`, not `121`).
pub fn format_line(record: &VisitRecord) -> String {
    format!(
        "{}{sep}{}{sep}{:?}{sep}{:?}{sep}{}",
        record.station_index,
        record.name,
        record.latitude,
        record.longitude,
        record.address.as_deref().unwrap_or(""),
        sep = SEPARATOR
    )
}

/// Parse one history line
///
/// Accepts the older four-field form without an address. The address is
/// the remainder of the line, so it may itself contain the separator.
pub fn parse_line(line: &str) -> std::result::Result<VisitRecord, String> {
    let fields: Vec<&str> = line.splitn(5, SEPARATOR).collect();
    if fields.len() < 4 {
        return Err(format!("expected at least 4 fields, found {}", fields.len()));
    }

    let station_index = fields[0]
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("bad index '{}': {}", fields[0], e))?;
    let latitude = fields[2]
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad latitude '{}': {}", fields[2], e))?;
    let longitude = fields[3]
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad longitude '{}': {}", fields[3], e))?;
    let address = fields
        .get(4)
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .map(str::to_string);

    Ok(VisitRecord {
        station_index,
        name: fields[1].trim().to_string(),
        latitude,
        longitude,
        address,
    })
}

/// Line-oriented text history with file locking
pub struct TextHistoryLog {
    path: PathBuf,
}

impl TextHistoryLog {
    /// Create a new history log for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl HistoryStore for TextHistoryLog {
    fn append(&mut self, record: &VisitRecord) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        writer.write_all(format_line(record).as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.sync_data()?;
        file.unlock()?;

        tracing::debug!("Appended station {} to history", record.station_index);
        Ok(())
    }

    /// Read every record, skipping lines that do not parse
    fn read_all(&self) -> Result<Vec<VisitRecord>> {
        read_history(&self.path)
    }

    fn clear(&mut self) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        file.sync_all()?;

        tracing::info!("Cleared history at {:?}", self.path);
        Ok(())
    }
}

/// Read all visit records from a history file
pub fn read_history(path: &Path) -> Result<Vec<VisitRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    // Acquire shared lock for reading
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Failed to parse history at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} visits from history", records.len());
    Ok(records)
}

/// In-memory history, for tests and embedding
#[derive(Clone, Debug, Default)]
pub struct MemoryHistoryStore {
    records: Vec<VisitRecord>,
}

impl MemoryHistoryStore {
    pub fn new(records: Vec<VisitRecord>) -> Self {
        Self { records }
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn append(&mut self, record: &VisitRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<VisitRecord>> {
        Ok(self.records.clone())
    }

    fn clear(&mut self) -> Result<()> {
        self.records.clear();
        Ok(())
    }
}
