//! Read-only page text and geometry index over the source document.
//!
//! The index is built once per batch from the shared source bytes and is the
//! only component that parses the PDF for matching purposes. It exposes
//! per-page plain text, per-page text-block geometry, and literal search
//! hits via MuPDF. All operations are read-only and deterministic for a
//! fixed document; the working copies that receive marks are separate lopdf
//! documents.

use crate::error::{SplitError, SplitResult};
use mupdf::{Document, Page, Quad, TextPageOptions};

/// Maximum geometric search hits per identifier per page.
const MAX_SEARCH_HITS: u32 = 100;

/// An axis-aligned rectangular region on a page, in MuPDF page coordinates
/// (origin top-left, y growing downwards).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Region {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Whether two regions overlap. Any overlap counts, not containment;
    /// touching edges do not.
    pub fn intersects(&self, other: &Region) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

impl From<Quad> for Region {
    fn from(quad: Quad) -> Self {
        // Collapse the quad to its axis-aligned bounding rectangle
        Self {
            x0: quad.ul.x.min(quad.ll.x).min(quad.ur.x).min(quad.lr.x),
            y0: quad.ul.y.min(quad.ll.y).min(quad.ur.y).min(quad.lr.y),
            x1: quad.ul.x.max(quad.ll.x).max(quad.ur.x).max(quad.lr.x),
            y1: quad.ul.y.max(quad.ll.y).max(quad.ur.y).max(quad.lr.y),
        }
    }
}

/// A rectangular text block and its content, as laid out on the page.
///
/// Blocks are disjoint in content, but their rectangles may geometrically
/// overlap.
#[derive(Debug, Clone)]
pub struct PageBlock {
    pub region: Region,
    pub text: String,
}

/// Immutable text/geometry view over the shared source document.
#[derive(Debug)]
pub struct DocumentIndex {
    document: Document,
    page_count: usize,
}

impl DocumentIndex {
    /// Opens the source bytes for indexing.
    ///
    /// An unparseable document is fatal for the whole batch: the document is
    /// shared across all records, so there is no record-scoped recovery.
    pub fn from_bytes(bytes: &[u8]) -> SplitResult<Self> {
        if bytes.is_empty() {
            return Err(SplitError::EmptyDocument);
        }

        let document =
            Document::from_bytes(bytes, "pdf").map_err(|e| SplitError::CorruptDocument {
                message: format!("Failed to open document: {}", e),
                page: None,
                source: Some(Box::new(e)),
            })?;

        let page_count = document
            .page_count()
            .map_err(|e| SplitError::CorruptDocument {
                message: format!("Failed to get page count: {}", e),
                page: None,
                source: Some(Box::new(e)),
            })? as usize;

        Ok(Self {
            document,
            page_count,
        })
    }

    /// Number of pages in the source document.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    fn load_page(&self, page_index: usize) -> SplitResult<Page> {
        self.document
            .load_page(page_index as i32)
            .map_err(|e| SplitError::CorruptDocument {
                message: format!("Failed to load page {}", page_index + 1),
                page: Some(page_index),
                source: Some(Box::new(e)),
            })
    }

    /// Plain text of one page, assembled from its text blocks in layout
    /// order.
    pub fn page_text(&self, page_index: usize) -> SplitResult<String> {
        let blocks = self.blocks(page_index)?;
        let mut text = String::new();
        for block in blocks {
            text.push_str(&block.text);
            text.push('\n');
        }
        Ok(text)
    }

    /// Ordered text blocks of one page, with their bounding rectangles.
    pub fn blocks(&self, page_index: usize) -> SplitResult<Vec<PageBlock>> {
        let page = self.load_page(page_index)?;
        let text_page = page
            .to_text_page(TextPageOptions::empty())
            .map_err(|e| SplitError::CorruptDocument {
                message: format!("Failed to read text on page {}", page_index + 1),
                page: Some(page_index),
                source: Some(Box::new(e)),
            })?;

        let mut blocks = Vec::new();
        for block in text_page.blocks() {
            let bounds = block.bounds();
            let mut text = String::new();
            for line in block.lines() {
                for ch in line.chars() {
                    if let Some(c) = ch.char() {
                        text.push(c);
                    }
                }
                text.push('\n');
            }

            blocks.push(PageBlock {
                region: Region::new(bounds.x0, bounds.y0, bounds.x1, bounds.y1),
                text,
            });
        }

        Ok(blocks)
    }

    /// Geometric occurrences of a literal string on one page.
    ///
    /// This is a plain substring search: hits inside longer tokens are
    /// returned too. Callers gate on whole-token matching against the page
    /// text before collecting hit geometry.
    pub fn search(&self, page_index: usize, literal: &str) -> SplitResult<Vec<Region>> {
        let page = self.load_page(page_index)?;
        let hits = page
            .search(literal, MAX_SEARCH_HITS)
            .map_err(|e| SplitError::CorruptDocument {
                message: format!("Search failed on page {}", page_index + 1),
                page: Some(page_index),
                source: Some(Box::new(e)),
            })?;

        Ok(hits.into_iter().map(Region::from).collect())
    }

    /// Text of the whole document, page texts joined. Used for the one-shot
    /// output suffix detection.
    pub fn full_text(&self) -> SplitResult<String> {
        let mut text = String::new();
        for page_index in 0..self.page_count {
            text.push_str(&self.page_text(page_index)?);
            text.push('\n');
        }
        Ok(text)
    }
}
