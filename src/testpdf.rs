//! Test helper: build minimal valid PDFs with lopdf (the library that
//! pdf-extract uses internally), one content page per input string.

use lopdf::dictionary;
use lopdf::{Document, Object, Stream};

/// Build a PDF whose nth page contains the nth text string.
/// Parentheses in the text are escaped for the content stream.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.4");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut page_ids = Vec::new();
    for text in pages {
        let escaped = text.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)");
        // One text operation per line, stepping down the page
        let mut ops = String::from("BT /F1 12 Tf 50 750 Td 14 TL ");
        for (i, line) in escaped.lines().enumerate() {
            if i > 0 {
                ops.push_str("T* ");
            }
            ops.push_str(&format!("({line}) Tj "));
        }
        ops.push_str("ET");

        let content_stream = Stream::new(dictionary! {}, ops.into_bytes());
        let content_id = doc.add_object(content_stream);

        let resources = dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        };

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources,
        });
        page_ids.push(page_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| (*id).into()).collect();
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_ids.len() as i64,
    });

    for page_id in &page_ids {
        if let Ok(Object::Dictionary(ref mut dict)) = doc.get_object_mut(*page_id) {
            dict.set("Parent", pages_id);
        }
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });

    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}
