//! Test fixtures: small generated PDFs whose pages are labelled by content

use lopdf::{content::Content, content::Operation, Dictionary, Document, Object, Stream};

/// Create a valid test PDF with the specified number of pages.
/// Page N draws the text "Page N".
pub fn create_test_pdf(num_pages: u32) -> Vec<u8> {
    save(build(num_pages, "Page", None))
}

/// Same as `create_test_pdf` with labels "<prefix> N"
pub fn create_labelled_pdf(num_pages: u32, prefix: &str) -> Vec<u8> {
    save(build(num_pages, prefix, None))
}

/// Test PDF carrying an Info dictionary
pub fn create_test_pdf_with_info(num_pages: u32, title: &str, author: &str) -> Vec<u8> {
    save(build(num_pages, "Page", Some((title, author))))
}

/// Test PDF carrying a Standard security handler (V1/R2) in its trailer.
/// The object streams themselves are left in the clear.
pub fn create_encrypted_pdf(num_pages: u32) -> Vec<u8> {
    let mut doc = build(num_pages, "Page", None);
    let encrypt_id = doc.add_object(Dictionary::from_iter(vec![
        ("Filter", Object::Name(b"Standard".to_vec())),
        ("V", Object::Integer(1)),
        ("R", Object::Integer(2)),
        (
            "O",
            Object::String(vec![0x11; 32], lopdf::StringFormat::Hexadecimal),
        ),
        (
            "U",
            Object::String(vec![0x22; 32], lopdf::StringFormat::Hexadecimal),
        ),
        ("P", Object::Integer(-4)),
    ]));
    doc.trailer.set("Encrypt", Object::Reference(encrypt_id));
    save(doc)
}

/// Test PDF whose pages inherit MediaBox and Resources from an intermediate
/// Pages node instead of carrying their own.
pub fn create_nested_tree_pdf(num_pages: u32) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let root_pages_id = doc.new_object_id();
    let inner_pages_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));
    let resources = Dictionary::from_iter(vec![(
        "Font",
        Object::Dictionary(Dictionary::from_iter(vec![("F1", Object::Reference(font_id))])),
    )]);

    let mut kids = Vec::new();
    for i in 0..num_pages {
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            label_content(&format!("Page {}", i + 1)),
        ));
        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(inner_pages_id)),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        inner_pages_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Parent", Object::Reference(root_pages_id)),
            ("Count", Object::Integer(num_pages as i64)),
            ("Kids", Object::Array(kids)),
            ("MediaBox", media_box(842, 595)),
            ("Resources", Object::Dictionary(resources)),
        ])),
    );
    doc.objects.insert(
        root_pages_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(num_pages as i64)),
            ("Kids", Object::Array(vec![Object::Reference(inner_pages_id)])),
        ])),
    );

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(root_pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));
    save(doc)
}

/// Read back the label drawn on every page, in page order
pub fn page_labels(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let content = doc.get_page_content(page_id).unwrap();
            let text = String::from_utf8_lossy(&content).into_owned();
            let start = text.find('(').unwrap() + 1;
            let end = text[start..].find(')').unwrap() + start;
            text[start..end].to_string()
        })
        .collect()
}

fn build(num_pages: u32, prefix: &str, info: Option<(&str, &str)>) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut page_ids = Vec::new();

    for i in 0..num_pages {
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            label_content(&format!("{} {}", prefix, i + 1)),
        ));

        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("MediaBox", media_box(612, 792)),
            ("Contents", Object::Reference(content_id)),
        ]);
        page_ids.push(doc.add_object(page));
    }

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(num_pages as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    if let Some((title, author)) = info {
        let info_id = doc.add_object(Dictionary::from_iter(vec![
            (
                "Title",
                Object::String(title.as_bytes().to_vec(), lopdf::StringFormat::Literal),
            ),
            (
                "Author",
                Object::String(author.as_bytes().to_vec(), lopdf::StringFormat::Literal),
            ),
        ]));
        doc.trailer.set("Info", Object::Reference(info_id));
    }

    doc
}

fn label_content(label: &str) -> Vec<u8> {
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
            ),
            Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
            Operation::new(
                "Tj",
                vec![Object::String(
                    label.as_bytes().to_vec(),
                    lopdf::StringFormat::Literal,
                )],
            ),
            Operation::new("ET", vec![]),
        ],
    };
    content.encode().unwrap()
}

fn media_box(width: i64, height: i64) -> Object {
    Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(width),
        Object::Integer(height),
    ])
}

fn save(mut doc: Document) -> Vec<u8> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}
