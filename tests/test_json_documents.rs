//! Documents described in JSON and published end to end.

use pdf_scribe::{Document, Error};

const REPORT: &str = r##"{
    "properties": {
        "title": "Quarterly Report",
        "author": "Finance",
        "creation_date": "2024-05-01T10:00:00+02:00"
    },
    "headers": [
        {
            "name": "head",
            "contents": [
                { "type": "text_box", "text": "ACME Corp", "pos_x": 40, "pos_y": 810, "font_size": 10 }
            ]
        }
    ],
    "pages": [
        {
            "size": "a4",
            "orientation": "portrait",
            "header": "head",
            "contents": [
                { "type": "shape", "shape": "rectangle", "pos_x": 100, "pos_y": 100,
                  "width": 200, "height": 100, "z_index": 2 },
                { "type": "text_box", "text": "Revenue <b>up</b>", "pos_x": 297, "pos_y": 700,
                  "align": "center", "color": "#336699" },
                { "type": "barcode", "text": "ABC", "pos_x": 50, "pos_y": 300, "height": 40 }
            ]
        },
        { "size": "letter", "orientation": "landscape" }
    ]
}"##;

#[test]
fn test_report_from_json() {
    let doc = Document::from_json(REPORT).unwrap();
    assert_eq!(doc.pages.len(), 2);
    assert_eq!(doc.fonts.len(), 4);

    let text = String::from_utf8_lossy(&doc.to_bytes().unwrap()).to_string();
    // Catalog 1, fonts 2-5, pages 6, header 7, page contents 8-10, pages 11-12, info 13
    assert!(text.contains("7 0 obj % TextBox\n"));
    // Zero z-index paints first: text, barcode, then the shape
    assert!(text.contains("8 0 obj % TextBox\n"));
    assert!(text.contains("9 0 obj % Barcode\n"));
    assert!(text.contains("10 0 obj % Shape\n"));
    assert!(text.contains("/Contents [7 0 R 8 0 R 9 0 R 10 0 R]"));
    assert!(text.contains("/Contents []"));
    assert!(text.contains("/MediaBox [0 0 792 612]"));
    assert!(text.contains("/Kids [11 0 R 12 0 R]"));
    assert!(text.contains("13 0 obj % Info\n"));
    assert!(text.contains("/Title (Quarterly Report)"));
    assert!(text.contains("/CreationDate (D:20240501100000+02'00')"));
    assert!(text.contains("0.2 0.4 0.6 rg"));
    assert!(text.contains("100 100 200 100 re\nS"));
}

#[test]
fn test_compress_flag_from_json() {
    let doc = Document::from_json(
        r#"{
            "config": { "compress": true },
            "pages": [ { "contents": [
                { "type": "text_box", "text": "packed", "pos_x": 10, "pos_y": 10 }
            ] } ]
        }"#,
    )
    .unwrap();
    let text = String::from_utf8_lossy(&doc.to_bytes().unwrap()).to_string();
    assert!(text.contains("/Filter /FlateDecode"));
    assert!(!text.contains("(packed) Tj"));
}

#[test]
fn test_custom_font_table_replaces_default() {
    let doc = Document::from_json(
        r#"{
            "fonts": [
                { "font_name": "Courier", "base_font": "Courier" }
            ],
            "pages": [ { "contents": [
                { "type": "text_box", "text": "mono", "pos_x": 10, "pos_y": 10, "font_name": "Courier" }
            ] } ]
        }"#,
    )
    .unwrap();
    let text = String::from_utf8_lossy(&doc.to_bytes().unwrap()).to_string();
    assert!(text.contains("2 0 obj % Font\n"));
    assert!(text.contains("/BaseFont /Courier"));
    assert!(!text.contains("Helvetica"));
}

#[test]
fn test_invalid_color_is_rejected() {
    let result = Document::from_json(
        r#"{ "pages": [ { "contents": [
            { "type": "text_box", "text": "x", "pos_x": 0, "pos_y": 0, "color": "blue" }
        ] } ] }"#,
    );
    assert!(matches!(result, Err(Error::Json(_))));
}

#[test]
fn test_unknown_barcode_character_fails() {
    let doc = Document::from_json(
        r#"{ "pages": [ { "contents": [
            { "type": "barcode", "text": "A#B", "pos_x": 10, "pos_y": 10, "height": 20 }
        ] } ] }"#,
    )
    .unwrap();
    assert!(matches!(
        doc.to_bytes(),
        Err(Error::BarcodeCharacter { character: '#', .. })
    ));
}
