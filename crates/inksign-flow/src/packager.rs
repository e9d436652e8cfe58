//! Turns local attachments into validated upload payloads.
//!
//! All checks run locally, before any network call, so a corrupt file
//! never wastes a remote upload slot.

use deunicode::deunicode;
use tracing::{error, info};

use inksign_core::Attachment;

use crate::error::FlowError;

/// Remote service rejects filenames of 128 characters or more.
const MAX_FILENAME_LEN: usize = 128;
const TRUNCATED_LEN: usize = 118;
const TRUNCATION_MARKER: &str = "[...].pdf";

const SIGNED_SUFFIX: &str = "_signed.pdf";

/// A document ready for upload.
#[derive(Debug, Clone)]
pub struct UploadDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
    /// Signature fields are anchored on the last page.
    pub page_count: u32,
}

/// Transliterate a filename to ASCII and enforce the remote length limit.
///
/// Names of 128 characters or more are cut at 118 and marked truncated.
pub fn normalize_filename(name: &str) -> String {
    let ascii = deunicode(name);
    if ascii.len() >= MAX_FILENAME_LEN {
        format!("{}{}", &ascii[..TRUNCATED_LEN], TRUNCATION_MARKER)
    } else {
        ascii
    }
}

/// Validate an attachment as a structurally sound PDF and count its pages.
pub fn prepare_document(attachment: &Attachment) -> Result<UploadDocument, FlowError> {
    let filename = normalize_filename(&attachment.filename);
    let pdf = lopdf::Document::load_mem(&attachment.bytes).map_err(|e| {
        error!(filename = %filename, error = %e, "attachment is not a parseable PDF");
        FlowError::InvalidPdf(filename.clone())
    })?;
    let page_count = pdf.get_pages().len() as u32;
    info!(filename = %filename, pages = page_count, "validated PDF for upload");
    Ok(UploadDocument {
        filename,
        bytes: attachment.bytes.clone(),
        page_count,
    })
}

/// Derive the archived filename for a signed artifact.
///
/// A trailing `.pdf` (any case) is replaced by `_signed.pdf`; a name
/// without the extension gets the suffix appended. Deduplication during
/// archival is keyed on this derived name.
pub fn signed_filename(original: &str) -> String {
    let bytes = original.as_bytes();
    let stem = if bytes.len() >= 4 && bytes[bytes.len() - 4..].eq_ignore_ascii_case(b".pdf") {
        // The suffix is pure ASCII, so the cut lands on a char boundary.
        &original[..original.len() - 4]
    } else {
        original
    };
    format!("{stem}{SIGNED_SUFFIX}")
}
