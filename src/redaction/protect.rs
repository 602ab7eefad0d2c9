//! Output document protection.
//!
//! Applies AES-256 encryption with an owner password and a print-only
//! permission set to an extracted output document, via MuPDF's save
//! options. Protection is uniform across a batch: one configured owner
//! password, the same permissions for every output. When protection is
//! requested and fails, the record's output is dropped rather than emitted
//! unprotected; an encryption failure never silently produces a readable
//! file.

use crate::error::{SplitError, SplitResult};
use mupdf::pdf::PdfDocument;

/// Protection settings for a batch.
///
/// The owner password is deployment configuration (flag or environment),
/// never a constant baked into the binary.
#[derive(Debug, Clone)]
pub struct ProtectionConfig {
    pub owner_password: String,
}

/// Applies access restrictions to extracted output documents.
pub struct OutputProtector {
    owner_password: String,
}

impl OutputProtector {
    pub fn new(config: &ProtectionConfig) -> Self {
        Self {
            owner_password: config.owner_password.clone(),
        }
    }

    /// Encrypts the output bytes, returning the protected document.
    ///
    /// `identifier` scopes any failure to the record being processed.
    pub fn protect(&self, identifier: &str, pdf_bytes: &[u8]) -> SplitResult<Vec<u8>> {
        let protection_error = |message: String| SplitError::Protection {
            identifier: identifier.to_string(),
            message,
        };

        // MuPDF saves to paths, so round-trip through a scratch directory
        let scratch = tempfile::tempdir()
            .map_err(|e| protection_error(format!("scratch dir unavailable: {}", e)))?;
        let input_path = scratch.path().join("unprotected.pdf");
        let output_path = scratch.path().join("protected.pdf");

        std::fs::write(&input_path, pdf_bytes)
            .map_err(|e| protection_error(format!("failed to stage output: {}", e)))?;

        let input_str = input_path
            .to_str()
            .ok_or_else(|| protection_error("scratch path is not valid UTF-8".to_string()))?;
        let output_str = output_path
            .to_str()
            .ok_or_else(|| protection_error("scratch path is not valid UTF-8".to_string()))?;

        let document = PdfDocument::open(input_str)
            .map_err(|e| protection_error(format!("failed to reopen output: {}", e)))?;

        unsafe {
            ffi::save_encrypted(&document, output_str, &self.owner_password)
                .map_err(protection_error)?;
        }

        let protected = std::fs::read(&output_path)
            .map_err(|e| protection_error(format!("failed to read protected output: {}", e)))?;

        // The save call reports success even when options were ignored, so
        // verify the encryption dictionary is actually present
        if !contains_encrypt_dict(&protected) {
            return Err(protection_error(
                "encryption was not applied to the output".to_string(),
            ));
        }

        Ok(protected)
    }
}

fn contains_encrypt_dict(bytes: &[u8]) -> bool {
    bytes.windows(8).any(|window| window == b"/Encrypt")
}

/// FFI helpers for MuPDF save operations.
mod ffi {
    use mupdf::pdf::PdfDocument;
    use std::ffi::CString;

    /// Saves a PDF with AES-256 encryption, owner password, and print-only
    /// permissions via MuPDF's C API.
    ///
    /// # Safety
    /// This function uses unsafe FFI calls to access MuPDF's C API.
    /// The document must be valid and the context properly initialized.
    pub unsafe fn save_encrypted(
        document: &PdfDocument,
        output_path: &str,
        owner_password: &str,
    ) -> Result<(), String> {
        #[repr(C)]
        struct PdfDocumentRaw {
            inner: *mut mupdf_sys::pdf_document,
        }

        let path = CString::new(output_path).map_err(|e| e.to_string())?;

        let document_raw = std::mem::transmute::<&PdfDocument, &PdfDocumentRaw>(document);
        let ctx = mupdf_sys::mupdf_new_base_context();
        if ctx.is_null() {
            return Err("failed to create MuPDF context".to_string());
        }

        let mut options: mupdf_sys::pdf_write_options = std::mem::zeroed();
        options.do_encrypt = mupdf_sys::PDF_ENCRYPT_AES_256 as _;
        options.permissions = mupdf_sys::PDF_PERM_PRINT as _;
        copy_password(&mut options.opwd_utf8, owner_password);

        mupdf_sys::pdf_save_document(
            ctx,
            document_raw.inner,
            path.as_ptr(),
            std::ptr::addr_of_mut!(options).cast(),
        );
        mupdf_sys::mupdf_drop_base_context(ctx);

        Ok(())
    }

    /// Copies a UTF-8 password into a fixed-size C buffer, NUL-terminated.
    fn copy_password(buffer: &mut [std::os::raw::c_char], password: &str) {
        let bytes = password.as_bytes();
        let len = bytes.len().min(buffer.len() - 1);
        for (slot, &byte) in buffer.iter_mut().zip(bytes[..len].iter()) {
            *slot = byte as std::os::raw::c_char;
        }
        buffer[len] = 0;
    }
}
