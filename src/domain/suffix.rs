//! Output file name suffix selection.
//!
//! Voucher batches come in two flavours: the regular meal/food benefit and
//! the home-office variant. The variant is decided once per batch by looking
//! for a case-insensitive "home" indicator in the document text or in the
//! source file name, and every output name in the batch carries the matching
//! suffix.

use once_cell::sync::Lazy;
use regex::Regex;

static HOME_INDICATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)home").expect("Valid home indicator regex"));

/// Batch-wide output name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSuffix {
    /// Regular benefit batch (`_AL`)
    Standard,
    /// Home-office benefit batch (`_VRHO`)
    Home,
}

impl OutputSuffix {
    /// Detects the suffix from the full document text and, as a fallback,
    /// the source file name.
    pub fn detect(document_text: &str, source_name: Option<&str>) -> Self {
        if HOME_INDICATOR.is_match(document_text)
            || source_name.is_some_and(|name| HOME_INDICATOR.is_match(name))
        {
            Self::Home
        } else {
            Self::Standard
        }
    }

    /// The literal suffix appended to each output name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "_AL",
            Self::Home => "_VRHO",
        }
    }

    /// Builds the archive member name for one record.
    pub fn member_name(&self, display_name: &str) -> String {
        format!("{}{}.pdf", display_name, self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_home_any_case() {
        assert_eq!(
            OutputSuffix::detect("Benefício VR HOME OFFICE", None),
            OutputSuffix::Home
        );
        assert_eq!(
            OutputSuffix::detect("works from Home Office", None),
            OutputSuffix::Home
        );
        assert_eq!(
            OutputSuffix::detect("texto do home office", None),
            OutputSuffix::Home
        );
    }

    #[test]
    fn test_detect_default() {
        assert_eq!(
            OutputSuffix::detect("RELATÓRIO ANALÍTICO", None),
            OutputSuffix::Standard
        );
    }

    #[test]
    fn test_detect_from_file_name() {
        assert_eq!(
            OutputSuffix::detect("plain text", Some("VR_HOME_2026.pdf")),
            OutputSuffix::Home
        );
        assert_eq!(
            OutputSuffix::detect("plain text", Some("VR_2026.pdf")),
            OutputSuffix::Standard
        );
    }

    #[test]
    fn test_member_name() {
        assert_eq!(OutputSuffix::Standard.member_name("Ana"), "Ana_AL.pdf");
        assert_eq!(OutputSuffix::Home.member_name("Ana"), "Ana_VRHO.pdf");
    }
}
