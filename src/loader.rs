//! Loads sales records from a JSON export.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

use crate::records::CarRecord;

/// Reads a JSON array of [`CarRecord`]s from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is not a valid record array.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_records(path: &Path) -> Result<Vec<CarRecord>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let records = read_records(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;

    info!(records = records.len(), "Sales records loaded");
    Ok(records)
}

pub fn read_records<R: Read>(reader: R) -> Result<Vec<CarRecord>> {
    Ok(serde_json::from_reader(reader)?)
}
