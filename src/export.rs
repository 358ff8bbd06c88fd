//! Spreadsheet export of the full transaction history.
//!
//! Exports always cover every fetched record, regardless of the table's
//! active filter or page.

use std::io;
use std::path::Path;

use csv::WriterBuilder;

use crate::error::{BankViewError, Result};
use crate::models::TransactionRecord;

/// Writes `records` as CSV with a header row, returning the row count.
///
/// # Errors
///
/// Returns [`BankViewError::NothingToExport`] if `records` is empty, or
/// [`BankViewError::Export`] if writing fails.
#[inline]
pub fn write_csv<W: io::Write>(records: &[TransactionRecord], writer: W) -> Result<usize> {
    if records.is_empty() {
        return Err(BankViewError::NothingToExport);
    }

    let mut csv_writer = WriterBuilder::new().has_headers(true).from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    tracing::debug!(rows = records.len(), "exported transactions");
    Ok(records.len())
}

/// Writes `records` as CSV to the file at `path`, replacing it.
///
/// Nothing is created when `records` is empty.
///
/// # Errors
///
/// Same as [`write_csv`], plus [`BankViewError::Io`] if the file cannot be
/// created.
#[inline]
pub fn export_to_path<P: AsRef<Path>>(records: &[TransactionRecord], path: P) -> Result<usize> {
    if records.is_empty() {
        return Err(BankViewError::NothingToExport);
    }
    let file = std::fs::File::create(path.as_ref())?;
    write_csv(records, io::BufWriter::new(file))
}
