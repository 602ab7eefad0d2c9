//! Matched-page extraction.
//!
//! Builds the per-record output document by keeping only the matched pages
//! of the annotated working copy: clone, delete everything else in reverse
//! order so page numbers stay stable, prune orphaned objects, serialize.
//! Relative page order is preserved and no page is duplicated.

use lopdf::Document;
use std::collections::HashSet;

/// Extracts the given 0-based page indices from the working copy.
///
/// Indices must be in range; they are deduplicated and extracted in
/// ascending source order regardless of input order. An empty index list is
/// rejected; the caller decides that a record without matches produces no
/// output at all.
pub fn extract_pages(working: &Document, page_indices: &[usize]) -> lopdf::Result<Vec<u8>> {
    if page_indices.is_empty() {
        return Err(lopdf::Error::PageNumberNotFound(0));
    }

    let page_count = working.get_pages().len();
    for &index in page_indices {
        if index >= page_count {
            return Err(lopdf::Error::PageNumberNotFound(index as u32 + 1));
        }
    }

    let mut output = working.clone();

    // lopdf numbers pages from 1
    let pages_to_keep: HashSet<u32> = page_indices.iter().map(|&i| i as u32 + 1).collect();
    let mut pages_to_delete: Vec<u32> = (1..=page_count as u32)
        .filter(|n| !pages_to_keep.contains(n))
        .collect();

    // Delete in reverse order so earlier numbers stay valid
    pages_to_delete.reverse();
    for page_number in pages_to_delete {
        output.delete_pages(&[page_number]);
    }

    output.prune_objects();
    output.compress();

    let mut buffer = Vec::new();
    output.save_to(&mut buffer)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Dictionary, Object, Stream};

    // Minimal N-page PDF built directly with lopdf
    fn build_test_pdf(num_pages: u32) -> Document {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let mut page_ids = Vec::new();
        for i in 0..num_pages {
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
                            format!("Page {}", i + 1).into_bytes(),
                            lopdf::StringFormat::Literal,
                        )],
                    ),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));

            let page = Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(pages_id)),
                (
                    "MediaBox",
                    Object::Array(vec![
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(612),
                        Object::Integer(792),
                    ]),
                ),
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

        doc
    }

    #[test]
    fn test_extract_single_page() {
        let doc = build_test_pdf(5);
        let bytes = extract_pages(&doc, &[2]).unwrap();
        let result = Document::load_mem(&bytes).unwrap();
        assert_eq!(result.get_pages().len(), 1);
    }

    #[test]
    fn test_extract_preserves_order() {
        let doc = build_test_pdf(5);
        let bytes = extract_pages(&doc, &[0, 2, 4]).unwrap();
        let result = Document::load_mem(&bytes).unwrap();
        assert_eq!(result.get_pages().len(), 3);
    }

    #[test]
    fn test_extract_deduplicates() {
        let doc = build_test_pdf(5);
        let bytes = extract_pages(&doc, &[1, 1, 1]).unwrap();
        let result = Document::load_mem(&bytes).unwrap();
        assert_eq!(result.get_pages().len(), 1);
    }

    #[test]
    fn test_extract_empty_list_fails() {
        let doc = build_test_pdf(3);
        assert!(extract_pages(&doc, &[]).is_err());
    }

    #[test]
    fn test_extract_out_of_range_fails() {
        let doc = build_test_pdf(3);
        assert!(extract_pages(&doc, &[7]).is_err());
    }

    #[test]
    fn test_source_document_untouched() {
        let doc = build_test_pdf(4);
        let _ = extract_pages(&doc, &[0]).unwrap();
        assert_eq!(doc.get_pages().len(), 4);
    }
}
