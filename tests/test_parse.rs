use fluent_xml::{Document, Error, ErrorKind, Node, ReadOptions};
use std::io::Cursor;

#[test]
fn test_closing_tag_mismatch_err() {
    // no closing tag
    let xml = "<img>";
    let opts = ReadOptions::default();
    let doc = Document::parse_str_with_opts(xml, opts.clone());
    assert!(matches!(doc.unwrap_err(), Error::MalformedXML(_)));

    // closing tag mismatch
    let xml = "<a><img>Te</a>xt</img>";
    let doc = Document::parse_str_with_opts(xml, opts.clone());
    assert!(matches!(doc.unwrap_err(), Error::MalformedXML(_)));

    // no opening tag
    let xml = "</abc>";
    let doc = Document::parse_str_with_opts(xml, opts);
    assert!(matches!(doc.unwrap_err(), Error::MalformedXML(_)));
}

#[test]
fn test_unsupported() {
    let err = Document::parse_str("<a><?pi data?></a>").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedInput);

    let err = Document::parse_str("<?pi data?><a/>").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedInput);

    let err = Document::parse_str("<!DOCTYPE a><a/>").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedInput);
}

#[test]
fn test_conversion_failures() {
    for xml in &["", "<a/><b/>", "<a x='1' x='2'/>", "<a>&unknown;</a>"] {
        let err = Document::parse_str(xml).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConversionFailure, "{}", xml);
    }

    let err = Document::parse_file("tests/documents/does-not-exist.xml").unwrap_err();
    assert!(matches!(err, Error::Io(_)));

    let err = Document::parse_reader(Cursor::new(b"<a>\xff</a>".to_vec())).unwrap_err();
    assert!(matches!(err, Error::CannotDecode));
}

#[test]
fn test_parse_reader() {
    let xml = "\u{feff}<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<a b=\"&lt;\">c</a>";
    let doc = Document::parse_reader(Cursor::new(xml.as_bytes())).unwrap();
    let root = doc.root_element().unwrap();
    assert_eq!(root.attribute_value(&doc, "b"), Some("<"));
    assert_eq!(root.text(&doc).unwrap(), Some("c"));
    assert_eq!(
        doc.write_str().unwrap(),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<a b=\"&lt;\">c</a>\n"
    );
}

#[test]
fn test_declaration_values() {
    let doc: Document = r#"<?xml version="1.0"?><a/>"#.parse().unwrap();
    let decl = doc.declaration().unwrap();
    assert_eq!(decl.version(&doc), Some("1.0"));
    assert_eq!(decl.encoding(&doc), None);
    assert_eq!(doc.write_str().unwrap(), "<?xml version=\"1.0\"?>\n<a />\n");

    // No prolog keeps the default declaration.
    let doc = Document::parse_str("<a/>").unwrap();
    let decl = doc.declaration().unwrap();
    assert_eq!(decl.version(&doc), Some("1.0"));
    assert_eq!(decl.encoding(&doc), Some("UTF-8"));
    assert_eq!(doc.items().len(), 2);
    assert_eq!(
        doc.write_str().unwrap(),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<a />\n"
    );
}

#[test]
fn test_top_level_comments() {
    let doc = Document::parse_str("<!-- a --><r/><!-- b -->").unwrap();
    let texts: Vec<Option<&str>> = doc
        .items()
        .iter()
        .filter(|item| matches!(item, Node::Comment(_)))
        .map(|item| item.content_text(&doc))
        .collect();
    assert_eq!(texts, vec![Some("a"), Some("b")]);
    assert_eq!(
        doc.write_str().unwrap(),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- a -->\n<r />\n<!-- b -->\n"
    );
}

#[test]
fn test_whitespace_text() {
    let xml = "<a>\n  <b> x </b>\n  <c>  </c>\n</a>";
    let doc = Document::parse_str(xml).unwrap();
    let root = doc.root_element().unwrap();
    assert_eq!(root.children(&doc).len(), 2);
    assert_eq!(root.child_text(&doc, "b").unwrap(), Some(" x "));
    assert_eq!(root.child_text(&doc, "c").unwrap(), Some("  "));

    let opts = ReadOptions {
        trim_text: true,
        ..ReadOptions::default()
    };
    let doc = Document::parse_str_with_opts(xml, opts).unwrap();
    let root = doc.root_element().unwrap();
    assert_eq!(root.children(&doc).len(), 2);
    assert_eq!(root.child_text(&doc, "b").unwrap(), Some("x"));
    assert_eq!(root.child_text(&doc, "c").unwrap(), Some(""));
}
