//! PDF merge, split and page range handling
//!
//! This crate provides local PDF manipulation using lopdf:
//! - `range`: parse "1-3, 5" into 0-based indices and back
//! - `selection`: keep a range string and a page grid in sync
//! - `extract` / `split` / `merge`: build output documents
//! - `limits`: free plan gating

pub mod document;
pub mod error;
pub mod extract;
pub mod limits;
pub mod merge;
pub mod page_tree;
pub mod range;
pub mod selection;
pub mod split;

#[cfg(test)]
pub(crate) mod test_pdf;

pub use document::{load_document, page_count, validate_pdf, PdfInfo};
pub use error::PdfMateError;
pub use extract::{extract_pages, extract_range, EXTRACTED_FILENAME};
pub use limits::{LimitConfig, FREE_LIMITS};
pub use merge::{merge_documents, total_page_count, PdfSource, MERGED_FILENAME};
pub use range::{format_page_selection, parse_page_range};
pub use selection::PageSelection;
pub use split::{split_all, split_all_archive, SplitPart, SPLIT_ARCHIVE_FILENAME};
