//! Document loading and validation
//!
//! Loads source bytes into a `lopdf::Document`, separating password-protected
//! files from files that are simply broken.

use lopdf::Document;
use serde::Serialize;

use crate::error::PdfMateError;

/// PDF file information extracted during validation
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct PdfInfo {
    /// Number of pages in the document
    pub page_count: u32,
    /// PDF version string (e.g., "1.7")
    pub version: String,
    /// Whether the document is encrypted
    pub encrypted: bool,
    /// File size in bytes
    pub size_bytes: usize,
    /// Document title from metadata (if available)
    pub title: Option<String>,
    /// Document author from metadata (if available)
    pub author: Option<String>,
}

/// Load a document, naming it in any error message.
///
/// Encrypted documents are refused with `PasswordProtected` whether or not
/// the PDF library managed to open them.
pub fn load_named(name: &str, bytes: &[u8]) -> Result<Document, PdfMateError> {
    match Document::load_mem(bytes) {
        Ok(doc) if doc.is_encrypted() => Err(PdfMateError::PasswordProtected(name.to_string())),
        Ok(doc) => Ok(doc),
        Err(e) if has_encrypt_entry(bytes) => {
            tracing::debug!("load of encrypted {} failed: {}", name, e);
            Err(PdfMateError::PasswordProtected(name.to_string()))
        }
        Err(e) => Err(PdfMateError::ParseError(format!(
            "Unable to load {}: {}",
            name, e
        ))),
    }
}

/// Load a single source document
pub fn load_document(bytes: &[u8]) -> Result<Document, PdfMateError> {
    load_named("This PDF", bytes)
}

/// Parse PDF bytes and return page count
pub fn page_count(bytes: &[u8]) -> Result<u32, PdfMateError> {
    let doc = load_document(bytes)?;
    Ok(doc.get_pages().len() as u32)
}

/// Validate a PDF file and extract basic info
pub fn validate_pdf(bytes: &[u8]) -> Result<PdfInfo, PdfMateError> {
    if bytes.len() < 8 {
        return Err(PdfMateError::ParseError(
            "File too small to be a valid PDF".into(),
        ));
    }

    if !bytes.starts_with(b"%PDF-") {
        return Err(PdfMateError::ParseError(
            "Not a valid PDF file (missing %PDF- header)".into(),
        ));
    }

    let document = load_document(bytes)?;

    let page_count = document.get_pages().len() as u32;
    if page_count == 0 {
        return Err(PdfMateError::ParseError("PDF has no pages".into()));
    }

    let (title, author) = extract_metadata(&document);

    Ok(PdfInfo {
        page_count,
        version: extract_version(bytes),
        encrypted: false,
        size_bytes: bytes.len(),
        title,
        author,
    })
}

/// Extract PDF version from header ("%PDF-1.7")
fn extract_version(bytes: &[u8]) -> String {
    bytes
        .get(5..8)
        .and_then(|v| std::str::from_utf8(v).ok())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| "1.4".to_string())
}

fn extract_metadata(document: &Document) -> (Option<String>, Option<String>) {
    let Ok(info_dict) = document
        .trailer
        .get(b"Info")
        .and_then(|info| info.as_reference())
        .and_then(|id| document.get_dictionary(id))
    else {
        return (None, None);
    };

    let text = |key: &[u8]| {
        info_dict
            .get(key)
            .and_then(|obj| obj.as_str())
            .ok()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .filter(|s| !s.is_empty())
    };

    (text(b"Title"), text(b"Author"))
}

/// Cheap check for an /Encrypt entry when the library could not load the file
fn has_encrypt_entry(bytes: &[u8]) -> bool {
    bytes.windows(8).any(|w| w == b"/Encrypt")
}
