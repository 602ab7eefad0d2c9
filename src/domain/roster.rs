//! Roster records and ledger rows.
//!
//! A roster row pairs an employee identifier (`MATRICULA`) with a display
//! name (`NOME`). Identifiers are kept as literal strings: registration
//! numbers with leading zeros must match exactly as written.

use crate::error::{SplitError, SplitResult};
use serde::{Deserialize, Serialize};
use std::io::Read;

/// One roster entry: employee identifier plus display name.
///
/// Identifier uniqueness is not required; duplicate identifiers produce
/// independent outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Matching key, e.g. a registration number. Matched literally.
    #[serde(rename = "MATRICULA")]
    pub identifier: String,

    /// Used to name the per-employee output file.
    #[serde(rename = "NOME")]
    pub display_name: String,
}

impl Record {
    pub fn new(identifier: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            display_name: display_name.into(),
        }
    }
}

/// One ledger entry, emitted only for records that produced output pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    #[serde(rename = "MATRICULA")]
    pub identifier: String,

    #[serde(rename = "NOME")]
    pub display_name: String,
}

impl From<&Record> for LedgerRow {
    fn from(record: &Record) -> Self {
        Self {
            identifier: record.identifier.clone(),
            display_name: record.display_name.clone(),
        }
    }
}

/// Reads roster records from CSV input with `NOME` and `MATRICULA` columns.
///
/// Headers are whitespace-trimmed (roster exports routinely carry stray
/// padding around column names). A missing column or unreadable row is a
/// [`SplitError::Schema`]; column order is not significant.
pub fn read_roster<R: Read>(reader: R) -> SplitResult<Vec<Record>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in csv_reader.deserialize() {
        let record: Record = row?;
        records.push(record);
    }
    Ok(records)
}

/// Loads a roster from a CSV file on disk.
pub fn load_roster(path: &std::path::Path) -> SplitResult<Vec<Record>> {
    let file = std::fs::File::open(path).map_err(|e| SplitError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    read_roster(file)
}
