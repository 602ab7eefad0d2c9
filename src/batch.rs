//! Batch orchestration.
//!
//! A batch runs every roster record against one immutable snapshot of the
//! source document: validate inputs, build the shared text index once,
//! process records in input order, collect per-record failures without
//! aborting, and hand the surviving outputs plus the ledger to the archive
//! packager. A fresh [`BatchProcessor`] is constructed per run and discarded
//! with its result; no state survives between batches.

use crate::domain::{LedgerRow, OutputSuffix, ProtectedFieldSet, Record};
use crate::error::{SplitError, SplitResult};
use crate::index::DocumentIndex;
use crate::redaction::{ProtectionConfig, RecordOutput, RecordProcessor};

/// Batch-wide configuration.
#[derive(Debug, Clone, Default)]
pub struct BatchConfig {
    /// Labels exempt from redaction
    pub protected_fields: ProtectedFieldSet,

    /// Output encryption; `None` leaves outputs unprotected
    pub protection: Option<ProtectionConfig>,

    /// Source file name, used as a fallback for suffix detection
    pub source_name: Option<String>,
}

/// A per-record failure recorded during processing.
#[derive(Debug)]
pub struct RecordFailure {
    pub record: Record,
    pub error: SplitError,
}

/// Everything a finished batch produced, prior to packaging.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Successful outputs, in roster input order
    pub outputs: Vec<RecordOutput>,

    /// One row per record with a non-empty output, in roster input order
    pub ledger: Vec<LedgerRow>,

    /// Records that failed without aborting the batch
    pub failures: Vec<RecordFailure>,

    /// Batch-wide output name suffix that was detected
    pub suffix: OutputSuffix,
}

/// Orchestrates one batch run over a shared source document.
pub struct BatchProcessor {
    source: Vec<u8>,
    records: Vec<Record>,
    config: BatchConfig,
}

impl BatchProcessor {
    pub fn new(source: Vec<u8>, records: Vec<Record>, config: BatchConfig) -> Self {
        Self {
            source,
            records,
            config,
        }
    }

    /// Runs validation, indexing, and per-record processing.
    ///
    /// Fatal errors (empty inputs, unreadable document) abort immediately;
    /// per-record errors land in [`BatchOutcome::failures`] and processing
    /// continues with the next record. Packaging is a separate step
    /// ([`crate::archive::package`]), so an aborted run never leaves a
    /// partial archive behind.
    pub fn run(&self) -> SplitResult<BatchOutcome> {
        self.validate()?;

        // Shared read-only snapshot; per-record mutation happens on private
        // lopdf copies inside the processor
        let index = DocumentIndex::from_bytes(&self.source)?;
        let suffix = OutputSuffix::detect(&index.full_text()?, self.config.source_name.as_deref());

        let processor = RecordProcessor::new(
            &self.config.protected_fields,
            self.config.protection.as_ref(),
        );

        let mut outputs = Vec::new();
        let mut ledger = Vec::new();
        let mut failures = Vec::new();

        for record in &self.records {
            match processor.process(&index, &self.source, record, suffix) {
                Ok(Some(output)) => {
                    ledger.push(LedgerRow::from(record));
                    outputs.push(output);
                }
                Ok(None) => {
                    // No page matched: nothing for the archive or ledger
                }
                Err(error) if error.is_fatal() => return Err(error),
                Err(error) => {
                    failures.push(RecordFailure {
                        record: record.clone(),
                        error,
                    });
                }
            }
        }

        Ok(BatchOutcome {
            outputs,
            ledger,
            failures,
            suffix,
        })
    }

    fn validate(&self) -> SplitResult<()> {
        if self.records.is_empty() {
            return Err(SplitError::MissingInput {
                what: "roster records".to_string(),
            });
        }
        if self.source.is_empty() {
            return Err(SplitError::EmptyDocument);
        }
        Ok(())
    }
}
