//! Archive packaging.
//!
//! Bundles every per-record output plus the summary ledger into one ZIP
//! blob. Member names and bytes are preserved exactly; members appear in
//! roster input order with the ledger last, matching the order the batch
//! produced them. Packaging failures are fatal: the caller gets a complete
//! archive or no archive at all, never a truncated one.

use crate::batch::BatchOutcome;
use crate::domain::LedgerRow;
use crate::error::{SplitError, SplitResult};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Ledger member name inside the archive.
pub const LEDGER_MEMBER_NAME: &str = "dados_selecionados.csv";

/// Packages a finished batch into a single archive blob.
pub fn package(outcome: &BatchOutcome) -> SplitResult<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for output in &outcome.outputs {
        writer.start_file(output.file_name.as_str(), options)?;
        writer
            .write_all(&output.bytes)
            .map_err(|e| SplitError::Packaging {
                message: format!("failed to write member '{}': {}", output.file_name, e),
                source: Some(Box::new(e)),
            })?;
    }

    let ledger_bytes = serialize_ledger(&outcome.ledger)?;
    writer.start_file(LEDGER_MEMBER_NAME, options)?;
    writer
        .write_all(&ledger_bytes)
        .map_err(|e| SplitError::Packaging {
            message: format!("failed to write member '{}': {}", LEDGER_MEMBER_NAME, e),
            source: Some(Box::new(e)),
        })?;

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

/// Serializes ledger rows as the two-column `MATRICULA`/`NOME` table.
///
/// The ledger is written even when empty so a batch with no matched records
/// still yields a well-formed archive.
pub fn serialize_ledger(rows: &[LedgerRow]) -> SplitResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if rows.is_empty() {
        // serde-driven headers only appear with at least one row
        writer.write_record(["MATRICULA", "NOME"])?;
    }
    for row in rows {
        writer.serialize(row)?;
    }

    writer.into_inner().map_err(|e| SplitError::Packaging {
        message: format!("failed to serialize ledger: {}", e),
        source: Some(Box::new(e)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OutputSuffix;
    use crate::domain::Record;
    use crate::redaction::RecordOutput;
    use std::io::Read;

    fn outcome_with(outputs: Vec<RecordOutput>, ledger: Vec<LedgerRow>) -> BatchOutcome {
        BatchOutcome {
            outputs,
            ledger,
            failures: vec![],
            suffix: OutputSuffix::Standard,
        }
    }

    fn output(name: &str, bytes: &[u8]) -> RecordOutput {
        RecordOutput {
            record: Record::new("123", "Ana"),
            file_name: name.to_string(),
            page_indices: vec![0],
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_members_preserved_exactly() {
        let outcome = outcome_with(
            vec![
                output("Ana_AL.pdf", b"%PDF-fake-ana"),
                output("Bea_AL.pdf", b"%PDF-fake-bea"),
            ],
            vec![
                LedgerRow {
                    identifier: "123".to_string(),
                    display_name: "Ana".to_string(),
                },
                LedgerRow {
                    identifier: "456".to_string(),
                    display_name: "Bea".to_string(),
                },
            ],
        );

        let blob = package(&outcome).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(blob)).unwrap();

        assert_eq!(archive.len(), 3);
        assert_eq!(archive.by_index(0).unwrap().name(), "Ana_AL.pdf");
        assert_eq!(archive.by_index(1).unwrap().name(), "Bea_AL.pdf");
        assert_eq!(archive.by_index(2).unwrap().name(), LEDGER_MEMBER_NAME);

        let mut bytes = Vec::new();
        archive
            .by_name("Ana_AL.pdf")
            .unwrap()
            .read_to_end(&mut bytes)
            .unwrap();
        assert_eq!(bytes, b"%PDF-fake-ana");
    }

    #[test]
    fn test_ledger_columns() {
        let rows = vec![LedgerRow {
            identifier: "123".to_string(),
            display_name: "Ana".to_string(),
        }];
        let bytes = serialize_ledger(&rows).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "MATRICULA,NOME\n123,Ana\n");
    }

    #[test]
    fn test_empty_ledger_still_has_headers() {
        let bytes = serialize_ledger(&[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "MATRICULA,NOME\n");
    }

    #[test]
    fn test_archive_without_outputs_contains_ledger() {
        let outcome = outcome_with(vec![], vec![]);
        let blob = package(&outcome).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(blob)).unwrap();
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.by_index(0).unwrap().name(), LEDGER_MEMBER_NAME);
    }
}
