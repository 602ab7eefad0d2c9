//! Per-employee redaction and splitting of voucher PDFs.
//!
//! Given a multi-page voucher document and a roster of (identifier, name)
//! records, this library locates the pages that mention each identifier as a
//! whole token, highlights the matches, blacks out every other non-protected
//! text block, extracts only the matched pages into a per-employee PDF,
//! optionally encrypts it (AES-256, owner password, print-only), and bundles
//! all outputs plus a summary ledger into a single ZIP archive.
//!
//! # Architecture
//!
//! - [`domain`]: roster records, whole-token matching, protected fields,
//!   output naming
//! - [`index`]: read-only page text and geometry view over the source
//!   document (MuPDF)
//! - [`redaction`]: per-record annotate/extract/protect pipeline (lopdf
//!   working copies)
//! - [`batch`]: orchestration of a whole roster against one shared snapshot
//! - [`archive`]: ZIP packaging of outputs and the ledger
//! - [`error`]: batch-fatal vs per-record error taxonomy
//!
//! # Quick Start
//!
//! ```no_run
//! use vouchsplit::{archive, BatchConfig, BatchProcessor, Record};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = std::fs::read("vouchers.pdf")?;
//! let records = vec![Record::new("123", "Ana"), Record::new("456", "Bea")];
//!
//! let batch = BatchProcessor::new(source, records, BatchConfig::default());
//! let outcome = batch.run()?;
//! let blob = archive::package(&outcome)?;
//!
//! std::fs::write("processed.zip", blob)?;
//! # Ok(())
//! # }
//! ```

// Public API
pub mod archive;
pub mod batch;
pub mod domain;
pub mod error;
pub mod index;
pub mod redaction;

// Re-exports for convenient access
pub use batch::{BatchConfig, BatchOutcome, BatchProcessor, RecordFailure};
pub use domain::{LedgerRow, OutputSuffix, ProtectedFieldSet, Record, TokenMatcher};
pub use error::{SplitError, SplitResult};
pub use index::{DocumentIndex, PageBlock, Region};
pub use redaction::{ProtectionConfig, RecordOutput, RecordProcessor};
