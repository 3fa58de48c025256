//! Split-all mode
//!
//! Breaks a document into one single-page document per source page and
//! optionally packages them into a zip archive.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::document::load_document;
use crate::error::PdfMateError;
use crate::extract::extract_from_document;
use crate::page_tree::finish;

/// Default file name for the split-all archive
pub const SPLIT_ARCHIVE_FILENAME: &str = "split_all_pages.zip";

/// Minimum width of the page number in part file names
const MIN_PAD_WIDTH: usize = 3;

/// One single-page output document
#[derive(Debug, Clone)]
pub struct SplitPart {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// File name for a 1-based page number, zero-padded so that lexicographic
/// order matches numeric order: `page_001.pdf`, or wider for long documents.
pub fn part_filename(page_number: u32, total_pages: u32) -> String {
    let width = total_pages.to_string().len().max(MIN_PAD_WIDTH);
    format!("page_{:0width$}.pdf", page_number, width = width)
}

/// Split every page into its own document
pub fn split_all(bytes: &[u8]) -> Result<Vec<SplitPart>, PdfMateError> {
    let doc = load_document(bytes)?;
    let total = doc.get_pages().len() as u32;

    let mut parts = Vec::with_capacity(total as usize);
    for index in 0..total {
        let page_doc = extract_from_document(&doc, &[index])?;
        parts.push(SplitPart {
            filename: part_filename(index + 1, total),
            bytes: finish(page_doc)?,
        });
    }

    tracing::info!("split document into {} parts", parts.len());
    Ok(parts)
}

/// Split every page and package the parts into a zip archive
pub fn split_all_archive(bytes: &[u8]) -> Result<Vec<u8>, PdfMateError> {
    let parts = split_all(bytes)?;
    write_archive(&parts)
}

/// Package parts into a deflated zip archive, in part order
pub fn write_archive(parts: &[SplitPart]) -> Result<Vec<u8>, PdfMateError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for part in parts {
        zip.start_file(part.filename.as_str(), options)
            .map_err(|e| PdfMateError::ArchiveError(format!("{}: {}", part.filename, e)))?;
        zip.write_all(&part.bytes)
            .map_err(|e| PdfMateError::ArchiveError(format!("{}: {}", part.filename, e)))?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| PdfMateError::ArchiveError(e.to_string()))?;
    Ok(cursor.into_inner())
}
