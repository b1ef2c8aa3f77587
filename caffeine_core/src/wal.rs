//! Consumption log (write-ahead log) for drink records.
//!
//! Records are appended to a JSONL (JSON Lines) file with file locking
//! so several processes can log drinks at once.

use crate::{ConsumptionRecord, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Sink for persisting consumption records
pub trait RecordSink {
    fn append(&mut self, record: &ConsumptionRecord) -> Result<()>;
}

/// JSONL-based record sink with file locking
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    /// Create a new JSONL sink for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl RecordSink for JsonlSink {
    fn append(&mut self, record: &ConsumptionRecord) -> Result<()> {
        record.validate()?;
        self.ensure_parent_dir()?;

        let file = lock_exclusive_current(
            &self.path,
            OpenOptions::new().create(true).read(true).append(true),
        )?;

        // A torn last line (crash mid-write) must not swallow this record
        let mut line = String::new();
        if ends_without_newline(&file)? {
            tracing::warn!("WAL {:?} ends with a partial line", self.path);
            line.push('\n');
        }
        line.push_str(&serde_json::to_string(record)?);
        line.push('\n');
        let mut writer = std::io::BufWriter::new(&file);
        writer.write_all(line.as_bytes())?;
        writer.flush()?;

        file.unlock()?;

        tracing::debug!("Appended record {} ({}) to WAL", record.id, record.name);
        Ok(())
    }
}

/// Open `path` and take an exclusive lock on the file it names
///
/// A rollup renames the WAL while holding its lock. A caller that was
/// waiting on the old file reopens the path instead of writing into the
/// archived one.
pub(crate) fn lock_exclusive_current(
    path: &Path,
    options: &OpenOptions,
) -> std::io::Result<File> {
    loop {
        let file = options.open(path)?;
        file.lock_exclusive()?;
        if still_at_path(&file, path)? {
            return Ok(file);
        }
        tracing::debug!("WAL {:?} was archived while waiting for the lock, reopening", path);
        file.unlock()?;
    }
}

#[cfg(unix)]
fn still_at_path(file: &File, path: &Path) -> std::io::Result<bool> {
    use std::os::unix::fs::MetadataExt;

    let held = file.metadata()?;
    match std::fs::metadata(path) {
        Ok(current) => Ok(held.dev() == current.dev() && held.ino() == current.ino()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(not(unix))]
fn still_at_path(_file: &File, path: &Path) -> std::io::Result<bool> {
    Ok(path.exists())
}

fn ends_without_newline(mut file: &File) -> Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Read all records from a WAL file
///
/// Lines that fail to parse are skipped with a warning.
pub fn read_records(path: &Path) -> Result<Vec<ConsumptionRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;
    let records = parse_records(&file)?;
    file.unlock()?;

    tracing::debug!("Read {} records from WAL", records.len());
    Ok(records)
}

/// Parse every record in an already-locked WAL file
pub(crate) fn parse_records(file: &File) -> Result<Vec<ConsumptionRecord>> {
    let reader = BufReader::new(file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<ConsumptionRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Failed to parse record at line {}: {}", line_num + 1, e);
            }
        }
    }

    Ok(records)
}
