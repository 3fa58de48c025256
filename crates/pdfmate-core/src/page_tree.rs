//! Page tree helpers shared by merge and extract
//!
//! Output documents always get a flat page tree: one root Pages node whose
//! Kids are the page objects in output order. Attributes that pages used to
//! inherit from intermediate nodes are copied onto the pages first.

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::PdfMateError;

/// Page attributes a page may inherit from its ancestors
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Catalog entries that point at specific pages of the source document
const PAGE_BOUND_CATALOG_KEYS: [&[u8]; 5] = [
    b"Outlines",
    b"OpenAction",
    b"PageLabels",
    b"StructTreeRoot",
    b"Dests",
];

/// Guard against malformed trees with Parent cycles
const MAX_TREE_DEPTH: usize = 64;

/// Copy inherited attributes onto every page so pages can be re-parented.
pub fn flatten_inherited(doc: &mut Document) {
    let page_ids: Vec<ObjectId> = doc.get_pages().values().copied().collect();
    for page_id in page_ids {
        let inherited = collect_inherited(doc, page_id);
        if let Ok(page) = doc.get_dictionary_mut(page_id) {
            for (key, value) in inherited {
                page.set(key, value);
            }
        }
    }
}

/// Attributes the page lacks but one of its ancestors defines
fn collect_inherited(doc: &Document, page_id: ObjectId) -> Vec<(Vec<u8>, Object)> {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return Vec::new();
    };

    let mut missing: Vec<&[u8]> = INHERITABLE_KEYS
        .iter()
        .copied()
        .filter(|key| page.get(key).is_err())
        .collect();
    let mut found = Vec::new();

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;
    while let Some(node_id) = parent {
        if missing.is_empty() || depth > MAX_TREE_DEPTH {
            break;
        }
        let Ok(node) = doc.get_dictionary(node_id) else {
            break;
        };
        missing.retain(|key| match node.get(key) {
            Ok(value) => {
                found.push((key.to_vec(), value.clone()));
                false
            }
            Err(_) => true,
        });
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    found
}

/// Object id of the root Pages node
pub fn root_pages_id(doc: &Document) -> Result<ObjectId, PdfMateError> {
    let catalog = doc
        .catalog()
        .map_err(|_| PdfMateError::OperationError("Catalog not found".into()))?;

    catalog
        .get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(|_| PdfMateError::OperationError("No Pages in catalog".into()))
}

/// Make `kids` the complete, ordered page list of the document
pub fn rebuild_page_tree(doc: &mut Document, kids: &[ObjectId]) -> Result<(), PdfMateError> {
    let pages_id = root_pages_id(doc)?;

    for &kid in kids {
        let page = doc
            .get_dictionary_mut(kid)
            .map_err(|_| PdfMateError::OperationError(format!("Page object {:?} missing", kid)))?;
        page.set("Parent", Object::Reference(pages_id));
    }

    let pages_dict = doc
        .get_dictionary_mut(pages_id)
        .map_err(|_| PdfMateError::OperationError("Invalid pages dictionary".into()))?;
    pages_dict.set(
        "Kids",
        Object::Array(kids.iter().map(|&id| Object::Reference(id)).collect()),
    );
    pages_dict.set("Count", Object::Integer(kids.len() as i64));
    pages_dict.remove(b"Parent");

    Ok(())
}

/// Drop catalog entries that would keep removed pages alive
pub fn drop_page_bound_entries(doc: &mut Document) -> Result<(), PdfMateError> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| PdfMateError::OperationError("No Root in trailer".into()))?;

    let catalog: &mut Dictionary = doc
        .get_dictionary_mut(catalog_id)
        .map_err(|_| PdfMateError::OperationError("Invalid catalog".into()))?;
    for key in PAGE_BOUND_CATALOG_KEYS {
        catalog.remove(key);
    }
    Ok(())
}

/// Prune unreachable objects, compress and serialize
pub fn finish(mut doc: Document) -> Result<Vec<u8>, PdfMateError> {
    doc.prune_objects();
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| PdfMateError::OperationError(format!("Save failed: {}", e)))?;
    Ok(buffer)
}
