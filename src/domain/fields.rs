//! Protected header and label fields.
//!
//! Voucher report pages carry fixed header/label lines (company name, report
//! title, column labels) that must stay readable in every output. A text
//! block containing any of these labels is exempt from redaction regardless
//! of whether it overlaps a highlighted region.

use once_cell::sync::Lazy;

/// Labels exempt from redaction in the stock voucher layout.
static DEFAULT_LABELS: Lazy<Vec<String>> = Lazy::new(|| {
    [
        "PROGEN S.A.",
        "PRODUTO",
        "DATA DE ENVIO:",
        "RELATÓRIO ANALÍTICO",
        "NOME",
        "LOCAL DE ENTREGA:",
        "CPF",
        "MATRICULA",
        "VL BENEFICIO",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
});

/// Fixed set of label strings that exempt a text block from redaction.
///
/// This is process-wide static configuration, not derived from input. The
/// check is a case-sensitive substring test, matching how the labels appear
/// verbatim in the report layout.
#[derive(Debug, Clone)]
pub struct ProtectedFieldSet {
    labels: Vec<String>,
}

impl ProtectedFieldSet {
    /// Creates a set from custom labels (for non-stock report layouts).
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Whether a block's text contains any protected label.
    pub fn is_protected(&self, block_text: &str) -> bool {
        self.labels.iter().any(|label| block_text.contains(label))
    }

    /// The configured labels.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl Default for ProtectedFieldSet {
    fn default() -> Self {
        Self {
            labels: DEFAULT_LABELS.clone(),
        }
    }
}
