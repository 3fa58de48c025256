//! Page extraction
//!
//! Builds a new document from an ordered list of source page indices.
//! Order is preserved exactly and repeated indices produce repeated pages.

use std::collections::HashSet;

use lopdf::{Document, Object, ObjectId};

use crate::document::load_document;
use crate::error::PdfMateError;
use crate::page_tree::{drop_page_bound_entries, finish, flatten_inherited, rebuild_page_tree};
use crate::range::parse_page_range;

/// Default file name for range extraction output
pub const EXTRACTED_FILENAME: &str = "extracted_pages.pdf";

/// Extract pages by a user-entered range string ("1-3, 5", 1-based).
///
/// Malformed tokens are dropped by the range parser; if nothing valid is
/// left the request is rejected rather than producing an empty document.
pub fn extract_range(bytes: &[u8], range: &str) -> Result<Vec<u8>, PdfMateError> {
    let doc = load_document(bytes)?;
    let total = doc.get_pages().len() as u32;

    let indices = parse_page_range(range, total);
    if indices.is_empty() {
        return Err(PdfMateError::InvalidRange(
            "No valid pages selected. Please check your page range.".into(),
        ));
    }

    finish(extract_from_document(&doc, &indices)?)
}

/// Extract pages by 0-based index, in the given order
pub fn extract_pages(bytes: &[u8], indices: &[u32]) -> Result<Vec<u8>, PdfMateError> {
    if indices.is_empty() {
        return Err(PdfMateError::InvalidRange("No pages specified".into()));
    }

    let doc = load_document(bytes)?;
    finish(extract_from_document(&doc, indices)?)
}

/// Copy the selected pages of `source` into a new document.
///
/// The first occurrence of a page reuses its object; each repeat gets a
/// fresh page object that shares the original's contents and resources.
pub fn extract_from_document(source: &Document, indices: &[u32]) -> Result<Document, PdfMateError> {
    if indices.is_empty() {
        return Err(PdfMateError::InvalidRange("No pages specified".into()));
    }

    let page_ids: Vec<ObjectId> = source.get_pages().values().copied().collect();
    let page_count = page_ids.len();

    if let Some(&bad) = indices.iter().find(|&&i| i as usize >= page_count) {
        return Err(PdfMateError::InvalidRange(format!(
            "Page {} does not exist (document has {} pages)",
            u64::from(bad) + 1,
            page_count
        )));
    }

    let mut doc = source.clone();
    flatten_inherited(&mut doc);

    let mut placed: HashSet<ObjectId> = HashSet::new();
    let mut kids = Vec::with_capacity(indices.len());

    for &index in indices {
        let page_id = page_ids[index as usize];
        if placed.insert(page_id) {
            kids.push(page_id);
            continue;
        }

        let page = doc
            .get_dictionary(page_id)
            .map_err(|_| PdfMateError::OperationError(format!("Page {} is invalid", index + 1)))?
            .clone();
        kids.push(doc.add_object(Object::Dictionary(page)));
    }

    rebuild_page_tree(&mut doc, &kids)?;
    drop_page_bound_entries(&mut doc)?;

    tracing::debug!(
        "extracted {} pages from a {}-page document",
        kids.len(),
        page_count
    );

    Ok(doc)
}
