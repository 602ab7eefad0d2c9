//! Shared test utilities.

pub mod fixtures;

use anyhow::Result;
use std::io::{Cursor, Read};

/// Member names of a ZIP archive blob, in stored order.
pub fn archive_member_names(blob: &[u8]) -> Result<Vec<String>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(blob.to_vec()))?;
    let mut names = Vec::new();
    for i in 0..archive.len() {
        names.push(archive.by_index(i)?.name().to_string());
    }
    Ok(names)
}

/// Reads one member of a ZIP archive blob.
pub fn archive_member(blob: &[u8], name: &str) -> Result<Vec<u8>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(blob.to_vec()))?;
    let mut bytes = Vec::new();
    archive.by_name(name)?.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Page count of a PDF blob.
pub fn pdf_page_count(bytes: &[u8]) -> Result<usize> {
    let doc = lopdf::Document::load_mem(bytes)?;
    Ok(doc.get_pages().len())
}
