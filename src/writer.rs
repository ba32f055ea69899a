//! Pretty printer for nodes.
//!
//! Output is always indented by two spaces per level. An element without
//! children is self-closing, an element whose only child is text stays on
//! one line, anything else puts each child on its own lines.

use crate::document::Document;
use crate::element::Element;
use crate::error::Result;
use crate::node::Node;
use std::io::{self, Write};

const INDENT: &[u8] = b"  ";

fn write_indent(writer: &mut impl Write, depth: usize) -> io::Result<()> {
    for _ in 0..depth {
        writer.write_all(INDENT)?;
    }
    Ok(())
}

/// Escapes `<`, `>`, `&` and `"`. Everything else is written as is.
fn write_escaped(writer: &mut impl Write, value: &str) -> io::Result<()> {
    let mut last = 0;
    for (i, b) in value.bytes().enumerate() {
        let escaped: &[u8] = match b {
            b'<' => b"&lt;",
            b'>' => b"&gt;",
            b'&' => b"&amp;",
            b'"' => b"&quot;",
            _ => continue,
        };
        writer.write_all(value[last..i].as_bytes())?;
        writer.write_all(escaped)?;
        last = i + 1;
    }
    writer.write_all(value[last..].as_bytes())
}

fn write_start(document: &Document, elem: Element, writer: &mut impl Write) -> io::Result<()> {
    writer.write_all(b"<")?;
    writer.write_all(elem.name(document).as_bytes())?;
    for attr in elem.attributes(document) {
        writer.write_all(b" ")?;
        writer.write_all(attr.name.as_bytes())?;
        writer.write_all(b"=\"")?;
        write_escaped(writer, &attr.value)?;
        writer.write_all(b"\"")?;
    }
    Ok(())
}

fn write_element(
    document: &Document,
    elem: Element,
    writer: &mut impl Write,
    depth: usize,
) -> io::Result<()> {
    write_indent(writer, depth)?;
    write_start(document, elem, writer)?;
    match elem.children(document) {
        [] => return writer.write_all(b" />\n"),
        [Node::Text(text)] => {
            writer.write_all(b">")?;
            if let Some(value) = text.text(document) {
                write_escaped(writer, value)?;
            }
        }
        children => {
            writer.write_all(b">\n")?;
            for child in children {
                write_node(document, *child, writer, depth + 1)?;
            }
            write_indent(writer, depth)?;
        }
    }
    writer.write_all(b"</")?;
    writer.write_all(elem.name(document).as_bytes())?;
    writer.write_all(b">\n")
}

pub(crate) fn write_node(
    document: &Document,
    node: Node,
    writer: &mut impl Write,
    depth: usize,
) -> io::Result<()> {
    match node {
        Node::Declaration(decl) => {
            writer.write_all(b"<?xml")?;
            if let Some(version) = decl.version(document) {
                write!(writer, " version=\"{}\"", version)?;
            }
            if let Some(encoding) = decl.encoding(document) {
                write!(writer, " encoding=\"{}\"", encoding)?;
            }
            writer.write_all(b"?>\n")
        }
        Node::Element(elem) => write_element(document, elem, writer, depth),
        // Blank text on its own line would only read back as indentation.
        Node::Text(text) => {
            if let Some(value) = text.text(document).filter(|v| !v.trim().is_empty()) {
                write_indent(writer, depth)?;
                write_escaped(writer, value)?;
                writer.write_all(b"\n")?;
            }
            Ok(())
        }
        // CData and Comment content is not escaped.
        Node::CData(cdata) => {
            if let Some(value) = cdata.text(document) {
                write_indent(writer, depth)?;
                writeln!(writer, "<![CDATA[{}]]>", value)?;
            }
            Ok(())
        }
        Node::Comment(comment) => {
            if let Some(value) = comment.text(document) {
                write_indent(writer, depth)?;
                writeln!(writer, "<!-- {} -->", value)?;
            }
            Ok(())
        }
    }
}

impl Node {
    /// Writes this node and its subtree at depth 0.
    pub fn write(&self, document: &Document, writer: &mut impl Write) -> Result<()> {
        write_node(document, *self, writer, 0)?;
        Ok(())
    }

    /// Canonical string form of this node.
    pub fn write_str(&self, document: &Document) -> Result<String> {
        let mut buf: Vec<u8> = Vec::new();
        self.write(document, &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }
}

impl Element {
    /// Shorthand for `Node::Element(elem).write_str(document)`.
    pub fn write_str(&self, document: &Document) -> Result<String> {
        Node::Element(*self).write_str(document)
    }
}
