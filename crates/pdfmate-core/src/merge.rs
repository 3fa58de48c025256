//! PDF Merge algorithm
//!
//! Combines multiple PDFs into a single document, all pages of each source
//! in source order.

use lopdf::{Document, Object, ObjectId};

use crate::document::load_named;
use crate::error::PdfMateError;
use crate::page_tree::{drop_page_bound_entries, finish, flatten_inherited, rebuild_page_tree};

/// Default file name for merge output
pub const MERGED_FILENAME: &str = "merged.pdf";

/// A named input document
#[derive(Debug, Clone)]
pub struct PdfSource {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl PdfSource {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Merge multiple PDFs into one
///
/// The algorithm:
/// 1. If empty, return error
/// 2. Load every source (a failing source is reported by name)
/// 3. Use the first document as the destination
/// 4. For each remaining source:
///    a. Offset its object IDs past the destination's highest ID
///    b. Import all objects with remapped references
///    c. Append its pages to the destination page list
/// 5. Rebuild a flat page tree, prune and serialize
pub fn merge_documents(sources: &[PdfSource]) -> Result<Vec<u8>, PdfMateError> {
    if sources.is_empty() {
        return Err(PdfMateError::OperationError("No documents to merge".into()));
    }

    let mut loaded = Vec::with_capacity(sources.len());
    for source in sources {
        let mut doc = load_named(&source.name, &source.bytes)?;
        flatten_inherited(&mut doc);
        loaded.push(doc);
    }

    let mut loaded = loaded.into_iter();
    let Some(mut dest) = loaded.next() else {
        return Err(PdfMateError::OperationError("No documents to merge".into()));
    };
    let mut dest_max_id = dest.max_id;
    let mut dest_page_refs: Vec<ObjectId> = dest.get_pages().values().copied().collect();

    for source in loaded {
        let source_pages: Vec<ObjectId> = source.get_pages().values().copied().collect();
        let source_max_id = source.max_id;
        let id_offset = dest_max_id;

        for (old_id, object) in source.objects {
            let new_id = (old_id.0 + id_offset, old_id.1);
            dest.objects.insert(new_id, remap_object_refs(object, id_offset));
        }

        dest_page_refs.extend(
            source_pages
                .into_iter()
                .map(|(num, gen)| (num + id_offset, gen)),
        );

        dest_max_id = (source_max_id + id_offset).max(dest_max_id);
    }

    dest.max_id = dest_max_id;
    rebuild_page_tree(&mut dest, &dest_page_refs)?;
    drop_page_bound_entries(&mut dest)?;

    tracing::info!(
        "merged {} documents into {} pages",
        sources.len(),
        dest_page_refs.len()
    );

    finish(dest)
}

/// Recursively remap object references in an object
fn remap_object_refs(obj: Object, offset: u32) -> Object {
    match obj {
        Object::Reference(id) => Object::Reference((id.0 + offset, id.1)),
        Object::Array(arr) => Object::Array(
            arr.into_iter()
                .map(|o| remap_object_refs(o, offset))
                .collect(),
        ),
        Object::Dictionary(mut dict) => {
            for (_, value) in dict.iter_mut() {
                *value = remap_object_refs(std::mem::replace(value, Object::Null), offset);
            }
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            for (_, value) in stream.dict.iter_mut() {
                *value = remap_object_refs(std::mem::replace(value, Object::Null), offset);
            }
            Object::Stream(stream)
        }
        other => other,
    }
}

/// Total page count across sources, loading each one
pub fn total_page_count(sources: &[PdfSource]) -> Result<u32, PdfMateError> {
    sources.iter().try_fold(0u32, |acc, source| {
        let doc: Document = load_named(&source.name, &source.bytes)?;
        Ok(acc + doc.get_pages().len() as u32)
    })
}
