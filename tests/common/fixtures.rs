//! Test fixtures and PDF builders.
//!
//! Provides a builder for creating multi-page voucher PDFs with specific
//! content, following the Builder pattern for clean test setup.

use anyhow::Result;
use printpdf::*;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Builder for creating multi-page test voucher PDFs.
///
/// Each page is a list of text lines drawn top to bottom, mimicking the
/// row-per-employee layout of the analytic voucher report.
#[derive(Debug, Clone)]
pub struct VoucherPdfBuilder {
    title: String,
    pages: Vec<Vec<String>>,
    page_width: Mm,
    page_height: Mm,
}

impl VoucherPdfBuilder {
    /// Creates a new builder with A4 pages.
    pub fn new() -> Self {
        Self {
            title: "Voucher Report".to_string(),
            pages: Vec::new(),
            page_width: Mm(210.0),
            page_height: Mm(297.0),
        }
    }

    /// Sets the document title.
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Adds a page with arbitrary text lines.
    pub fn with_page(mut self, lines: &[&str]) -> Self {
        self.pages.push(lines.iter().map(|l| l.to_string()).collect());
        self
    }

    /// Adds a report-style page: fixed header lines plus one row per
    /// (name, identifier) pair.
    pub fn with_report_page(mut self, rows: &[(&str, &str)]) -> Self {
        let mut lines = vec![
            "PROGEN S.A.".to_string(),
            "NOME  CPF  MATRICULA  VL BENEFICIO".to_string(),
        ];
        for (name, identifier) in rows {
            lines.push(format!("{}  111.222.333-44  {}  R$ 300,00", name, identifier));
        }
        self.pages.push(lines);
        self
    }

    /// Builds the PDF and writes it to the specified path.
    pub fn build(self, output_path: &Path) -> Result<PathBuf> {
        let (doc, first_page, first_layer) = PdfDocument::new(
            &self.title,
            self.page_width,
            self.page_height,
            "Layer 1",
        );
        let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

        let mut page_refs = vec![(first_page, first_layer)];
        for _ in 1..self.pages.len().max(1) {
            page_refs.push(doc.add_page(self.page_width, self.page_height, "Layer 1"));
        }

        for (lines, (page_index, layer_index)) in self.pages.iter().zip(page_refs) {
            let layer = doc.get_page(page_index).get_layer(layer_index);
            let mut y = 270.0;
            for line in lines {
                layer.use_text(line, 12.0, Mm(20.0), Mm(y), &font);
                y -= 10.0;
            }
        }

        doc.save(&mut BufWriter::new(fs::File::create(output_path)?))?;
        Ok(output_path.to_path_buf())
    }
}

impl Default for VoucherPdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a voucher PDF in a temp dir and returns its bytes.
pub fn voucher_pdf_bytes(builder: VoucherPdfBuilder) -> Result<Vec<u8>> {
    let dir = tempfile::tempdir()?;
    let path = builder.build(&dir.path().join("voucher.pdf"))?;
    Ok(fs::read(path)?)
}
