//! Consumption history loading.
//!
//! History is the union of the live WAL and the CSV archive. It is loaded
//! once at start-up and handed to the analytics as a plain slice.

use crate::csv_rollup::CsvRow;
use crate::{ConsumptionRecord, Error, Result};
use chrono::{DateTime, Utc};
use csv::ReaderBuilder;
use std::collections::HashSet;
use std::path::Path;
use uuid::Uuid;

impl TryFrom<CsvRow> for ConsumptionRecord {
    type Error = Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| Error::Other(format!("Invalid UUID: {}", e)))?;

        let consumed_at = DateTime::parse_from_rfc3339(&row.consumed_at)
            .map_err(|e| Error::Other(format!("Invalid date: {}", e)))?
            .with_timezone(&Utc);

        Ok(ConsumptionRecord {
            id,
            user_id: row.user_id,
            name: row.name,
            caffeine_mg: row.caffeine_mg,
            cost: row.cost,
            consumed_at,
        })
    }
}

/// Load the full history from the WAL and the CSV archive
///
/// Records present in both are kept once. The result is sorted by
/// `consumed_at`, oldest first.
pub fn load_history(wal_path: &Path, csv_path: &Path) -> Result<Vec<ConsumptionRecord>> {
    let mut records = Vec::new();
    let mut seen_ids = HashSet::new();

    if wal_path.exists() {
        for record in crate::wal::read_records(wal_path)? {
            if seen_ids.insert(record.id) {
                records.push(record);
            }
        }
        tracing::debug!("Loaded {} records from WAL", records.len());
    }

    if csv_path.exists() {
        let mut csv_count = 0;
        for record in load_records_from_csv(csv_path)? {
            if seen_ids.insert(record.id) {
                records.push(record);
                csv_count += 1;
            }
        }
        tracing::debug!("Loaded {} records from CSV", csv_count);
    }

    records.sort_by(|a, b| a.consumed_at.cmp(&b.consumed_at));

    tracing::info!("Loaded {} records of history", records.len());
    Ok(records)
}

/// Only the records belonging to `user_id`
pub fn for_user<'a>(
    records: &'a [ConsumptionRecord],
    user_id: &'a str,
) -> impl Iterator<Item = &'a ConsumptionRecord> + 'a {
    records.iter().filter(move |r| r.user_id == user_id)
}

fn load_records_from_csv(path: &Path) -> Result<Vec<ConsumptionRecord>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut records = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        match result {
            Ok(row) => match ConsumptionRecord::try_from(row) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Failed to parse CSV row: {}", e),
            },
            Err(e) => tracing::warn!("Failed to deserialize CSV row: {}", e),
        }
    }

    Ok(records)
}
