//! Per-record redaction pipeline.
//!
//! For one roster record this module runs match → annotate → extract →
//! protect against a fresh working copy of the shared source bytes: decide
//! which pages mention the identifier as a whole token, highlight the
//! matches, black out every other non-protected block, copy out exactly the
//! matched pages, and optionally encrypt the result.

pub mod annotate;
pub mod extract;
pub mod protect;

pub use annotate::{classify, BlockState};
pub use protect::{OutputProtector, ProtectionConfig};

use crate::domain::{OutputSuffix, ProtectedFieldSet, Record, TokenMatcher};
use crate::error::{SplitError, SplitResult};
use crate::index::{DocumentIndex, Region};

/// The finished output for one record.
#[derive(Debug, Clone)]
pub struct RecordOutput {
    pub record: Record,
    /// Archive member name, `{display_name}{suffix}.pdf`
    pub file_name: String,
    /// 0-based source page indices included, ascending
    pub page_indices: Vec<usize>,
    /// Serialized (and possibly encrypted) output document
    pub bytes: Vec<u8>,
}

/// Processes individual records against the shared document snapshot.
///
/// The processor holds only configuration; every call to [`process`] is a
/// pure function of the index, the source bytes, and the record; no state
/// is carried between records, so duplicate identifiers yield independent
/// outputs.
///
/// [`process`]: RecordProcessor::process
pub struct RecordProcessor<'a> {
    fields: &'a ProtectedFieldSet,
    protection: Option<&'a ProtectionConfig>,
}

impl<'a> RecordProcessor<'a> {
    pub fn new(fields: &'a ProtectedFieldSet, protection: Option<&'a ProtectionConfig>) -> Self {
        Self { fields, protection }
    }

    /// Runs the full pipeline for one record.
    ///
    /// Returns `Ok(None)` when no page matched: the record contributes
    /// nothing to the archive or ledger. Annotation and extraction failures
    /// surface as [`SplitError::RecordProcessing`]; a failed protection step
    /// is [`SplitError::Protection`] and drops the output rather than
    /// emitting it unprotected.
    pub fn process(
        &self,
        index: &DocumentIndex,
        source: &[u8],
        record: &Record,
        suffix: OutputSuffix,
    ) -> SplitResult<Option<RecordOutput>> {
        let matcher = TokenMatcher::new(&record.identifier)?;

        // Independent working copy; the shared source is never mutated
        let mut working =
            lopdf::Document::load_mem(source).map_err(|e| SplitError::CorruptDocument {
                message: format!("Failed to open working copy: {}", e),
                page: None,
                source: Some(Box::new(e)),
            })?;

        let record_error = |message: String, source_err: lopdf::Error| SplitError::RecordProcessing {
            identifier: record.identifier.clone(),
            message,
            source: Some(Box::new(source_err)),
        };

        let mut matched_pages = Vec::new();
        for page_index in 0..index.page_count() {
            let page_text = index.page_text(page_index)?;
            if !matcher.is_match(&page_text) {
                continue;
            }

            // Highlight regions: direct search hits plus the full bounds of
            // every block holding the identifier as a whole token (marking
            // the whole line shields adjacent data in the same row)
            let mut highlights = index.search(page_index, &record.identifier)?;
            let blocks = index.blocks(page_index)?;
            for block in &blocks {
                if matcher.is_match(&block.text) {
                    highlights.push(block.region);
                }
            }

            let states = classify(&blocks, &highlights, self.fields);
            let redactions: Vec<Region> = blocks
                .iter()
                .zip(states.iter())
                .filter(|(_, state)| **state == BlockState::Redacted)
                .map(|(block, _)| block.region)
                .collect();

            annotate::apply_marks(&mut working, page_index as u32 + 1, &highlights, &redactions)
                .map_err(|e| {
                    record_error(format!("annotation failed on page {}", page_index + 1), e)
                })?;

            matched_pages.push(page_index);
        }

        if matched_pages.is_empty() {
            return Ok(None);
        }

        let bytes = extract::extract_pages(&working, &matched_pages)
            .map_err(|e| record_error("page extraction failed".to_string(), e))?;

        let bytes = match self.protection {
            Some(config) => OutputProtector::new(config).protect(&record.identifier, &bytes)?,
            None => bytes,
        };

        Ok(Some(RecordOutput {
            record: record.clone(),
            file_name: suffix.member_name(&record.display_name),
            page_indices: matched_pages,
            bytes,
        }))
    }
}
