//! CSV archive of the consumption log.
//!
//! Rolling up moves every WAL record into `history.csv` and renames the WAL
//! so nothing is lost if the process dies halfway.

use crate::wal::{lock_exclusive_current, parse_records};
use crate::{ConsumptionRecord, Result};
use fs2::FileExt;
use std::fs::OpenOptions;
use std::path::Path;

/// A row in the CSV archive
///
/// Shared with the history loader, which reads the same layout back.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub(crate) struct CsvRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub caffeine_mg: Option<f64>,
    pub cost: f64,
    pub consumed_at: String,
}

impl From<&ConsumptionRecord> for CsvRow {
    fn from(record: &ConsumptionRecord) -> Self {
        CsvRow {
            id: record.id.to_string(),
            user_id: record.user_id.clone(),
            name: record.name.clone(),
            caffeine_mg: record.caffeine_mg,
            cost: record.cost,
            consumed_at: record.consumed_at.to_rfc3339(),
        }
    }
}

/// Roll up WAL records into CSV and archive the WAL
///
/// This function:
/// 1. Takes an exclusive lock on the WAL, held until the rename
/// 2. Reads all records from the WAL
/// 3. Appends them to the CSV file (writing headers for a new file)
/// 4. Syncs the CSV to disk
/// 5. Renames the WAL to `.wal.processed`
/// 6. Returns the number of records processed
///
/// Appends that race with the rollup wait on the lock and then land in a
/// fresh WAL, so they are never archived unread.
pub fn wal_to_csv_and_archive(wal_path: &Path, csv_path: &Path) -> Result<usize> {
    let wal = match lock_exclusive_current(wal_path, OpenOptions::new().read(true)) {
        Ok(wal) => wal,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("No WAL at {:?} to roll up", wal_path);
            return Ok(0);
        }
        Err(e) => return Err(e.into()),
    };

    let records = parse_records(&wal)?;

    if records.is_empty() {
        tracing::info!("No records in WAL to roll up");
        wal.unlock()?;
        return Ok(0);
    }

    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    for record in &records {
        writer.serialize(CsvRow::from(record))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Wrote {} records to CSV", records.len());

    let processed_path = wal_path.with_extension("wal.processed");
    std::fs::rename(wal_path, &processed_path)?;
    wal.unlock()?;

    tracing::info!("Archived WAL to {:?}", processed_path);

    Ok(records.len())
}

/// Remove archived `.processed` WAL files from `dir`
pub fn cleanup_processed_wals(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();

        if path.extension().map_or(false, |ext| ext == "processed") {
            std::fs::remove_file(&path)?;
            tracing::debug!("Removed processed WAL: {:?}", path);
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Cleaned up {} processed WAL files", count);
    }

    Ok(count)
}
