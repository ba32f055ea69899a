use fluent_xml::{Document, Element, Node, Text};

#[test]
fn test_escape() {
    let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<root attr="&gt;&lt;&amp;&quot;'attrval">
  <inner>&gt;&lt;&amp;&quot;'text</inner>
  <!-- <&amp; -->
  <![CDATA[<&amp;]]>
</root>
"#;
    let mut doc = Document::new();
    let root = doc
        .root("root")
        .unwrap()
        .set_attribute(&mut doc, "attr", "><&\"'attrval");
    root.e_with_text(&mut doc, "inner", "><&\"'text");
    root.comment(&mut doc, "<&amp;");
    root.cdata(&mut doc, "<&amp;");
    let xml = doc.write_str().unwrap();

    assert_eq!(xml, expected);
}

#[test]
fn test_escape_examples() {
    let mut doc = Document::new();
    doc.set_declaration(None);
    let person = doc.root("person").unwrap();
    person.set_attribute(&mut doc, "name", "<M & M>");
    assert_eq!(
        doc.write_str().unwrap(),
        "<person name=\"&lt;M &amp; M&gt;\" />\n"
    );

    let elem = Element::with_text(&mut doc, "e", "<test>");
    assert_eq!(
        Node::Element(elem).write_str(&doc).unwrap(),
        "<e>&lt;test&gt;</e>\n"
    );
}

#[test]
fn test_end_to_end_example() {
    let mut doc = Document::new();
    doc.comment("note");
    doc.root("person")
        .unwrap()
        .e_with_text(&mut doc, "first-name", "Bob");
    assert_eq!(
        doc.write_str().unwrap(),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- note -->\n<person>\n  <first-name>Bob</first-name>\n</person>\n"
    );
}

#[test]
fn test_mixed_content() {
    let mut doc = Document::new();
    doc.set_declaration(None);
    let p = doc.root("p").unwrap();
    p.add_text(&mut doc, "Hello");
    p.e_with_text(&mut doc, "b", "big");
    p.add_text(&mut doc, "world & all");
    assert_eq!(
        doc.write_str().unwrap(),
        "<p>\n  Hello\n  <b>big</b>\n  world &amp; all\n</p>\n"
    );

    // A detached text node written on its own.
    let text = Text::new(&mut doc, "<x>");
    assert_eq!(Node::Text(text).write_str(&doc).unwrap(), "&lt;x&gt;\n");
}

#[test]
fn test_write_to_writer() {
    let mut doc = Document::new();
    doc.root("a").unwrap().e(&mut doc, "b");
    let mut out: Vec<u8> = Vec::new();
    doc.write(&mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), doc.write_str().unwrap());
}

fn sample() -> Document {
    let mut doc = Document::new();
    doc.comment("people");
    let people = doc.root("people").unwrap();
    for (i, name) in ["Ann", "Bo & Co", "<Cy>"].iter().enumerate() {
        let person = people
            .e(&mut doc, "person")
            .set_attributes(&mut doc, vec![("id", i.to_string()), ("name", name.to_string())]);
        person.e_with_text(&mut doc, "quote", format!("\"{}\" said hi", name));
        person.comment(&mut doc, "details");
        person.e(&mut doc, "empty");
        person.cdata(&mut doc, "if a < b && c > d");
    }
    doc
}

#[test]
fn test_well_formed() {
    let xml = sample().write_str().unwrap();
    let parsed = roxmltree::Document::parse(&xml).unwrap();
    let root = parsed.root_element();
    assert_eq!(root.tag_name().name(), "people");
    let people: Vec<_> = root.children().filter(|n| n.is_element()).collect();
    assert_eq!(people.len(), 3);
    assert_eq!(people[1].attribute("name"), Some("Bo & Co"));
    assert_eq!(people[2].attribute("name"), Some("<Cy>"));
    let quote = people[2]
        .children()
        .find(|n| n.has_tag_name("quote"))
        .unwrap();
    assert_eq!(quote.text(), Some("\"<Cy>\" said hi"));
}

#[test]
fn test_idempotent() {
    let first = sample().write_str().unwrap();
    let reparsed = Document::parse_str(&first).unwrap();
    let second = reparsed.write_str().unwrap();
    assert_eq!(first, second);

    let dom = reparsed.to_dom().unwrap();
    let converted = Document::from_dom(&dom).unwrap();
    let root = converted.root_element().unwrap();
    assert_eq!(
        root.write_str(&converted).unwrap(),
        reparsed.root_element().unwrap().write_str(&reparsed).unwrap()
    );
}

#[test]
fn test_idempotent_whitespace() {
    let mut doc = Document::new();
    let a = doc.root("a").unwrap();
    a.e_with_text(&mut doc, "b", " hi ");
    a.e_with_text(&mut doc, "c", "  ");
    a.e_with_text(&mut doc, "d", "\n line \n");
    a.comment(&mut doc, " c ");
    a.comment(&mut doc, "");
    doc.comment("  top  ");

    let first = doc.write_str().unwrap();
    assert_eq!(
        first,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<a>\n  <b> hi </b>\n  <c>  </c>\n  \
         <d>\n line \n</d>\n  <!--  c  -->\n  <!--  -->\n</a>\n<!--   top   -->\n"
    );
    let reparsed = Document::parse_str(&first).unwrap();
    assert_eq!(reparsed.write_str().unwrap(), first);

    let root = reparsed.root_element().unwrap();
    assert_eq!(root.child_text(&reparsed, "b").unwrap(), Some(" hi "));
    assert_eq!(root.child_text(&reparsed, "c").unwrap(), Some("  "));
    let comments: Vec<Option<&str>> = root
        .children(&reparsed)
        .iter()
        .filter(|node| matches!(node, Node::Comment(_)))
        .map(|node| node.content_text(&reparsed))
        .collect();
    assert_eq!(comments, vec![Some(" c "), Some("")]);
}

#[test]
fn test_idempotent_mixed_content() {
    let mut doc = Document::new();
    let p = doc.root("p").unwrap();
    p.add_text(&mut doc, " Hello ");
    p.e_with_text(&mut doc, "b", "big");
    p.add_text(&mut doc, "");
    p.add_text(&mut doc, "world\n& all");

    let first = doc.write_str().unwrap();
    let reparsed = Document::parse_str(&first).unwrap();
    assert_eq!(reparsed.write_str().unwrap(), first);
    let texts: Vec<Option<&str>> = reparsed
        .root_element()
        .unwrap()
        .children(&reparsed)
        .iter()
        .filter(|node| matches!(node, Node::Text(_)))
        .map(|node| node.content_text(&reparsed))
        .collect();
    assert_eq!(texts, vec![Some(" Hello "), Some("world\n& all")]);
}
