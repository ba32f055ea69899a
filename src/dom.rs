//! Conversion to and from the [`xmltree`] DOM.
//!
//! Names are carried whole: an element named `x:item` becomes an
//! `xmltree::Element` named `x:item` without a resolved namespace, and a
//! DOM element with a prefix becomes `prefix:name` here.
//!
//! Processing instructions have no counterpart in this model and are
//! rejected with [`Error::UnsupportedInput`].

use crate::document::Document;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::node::Node;
use crate::parser::{self, ReadOptions};
use xmltree::{EmitterConfig, XMLNode};

/// Parses `text` into the external DOM without building a [`Document`].
///
/// Uses the same reader as [`Document::parse_str()`] with default options,
/// so the returned nodes are exactly what [`Document::from_dom_nodes()`]
/// would receive.
pub fn parse(text: &str) -> Result<Vec<XMLNode>> {
    Ok(parser::parse_str(text, &ReadOptions::default())?.nodes)
}

/// Serializes a DOM element with xmltree's own writer, without a declaration.
pub fn write(element: &xmltree::Element) -> Result<String> {
    let mut buf: Vec<u8> = Vec::new();
    let config = EmitterConfig::new().write_document_declaration(false);
    element.write_with_config(&mut buf, config)?;
    Ok(String::from_utf8(buf)?)
}

fn unsupported_pi(target: &str) -> Error {
    tracing::warn!(pi = target, "rejecting processing instruction");
    Error::UnsupportedInput(format!("processing instruction '{}'", target))
}

impl Element {
    /// Builds the DOM counterpart of this element and its subtree.
    ///
    /// Attributes keep their order. A text node without payload becomes
    /// an empty string.
    pub fn to_dom(&self, document: &Document) -> xmltree::Element {
        let mut dom = xmltree::Element::new(self.name(document));
        for attr in self.attributes(document) {
            dom.attributes.insert(attr.name.clone(), attr.value.clone());
        }
        for child in self.children(document) {
            if let Some(node) = node_to_dom(document, *child) {
                dom.children.push(node);
            }
        }
        dom
    }

    /// Builds a detached element from a DOM element.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedInput`]: The subtree holds a processing instruction.
    /// Nodes created before the failure stay detached in `document`.
    pub fn from_dom(document: &mut Document, dom: &xmltree::Element) -> Result<Element> {
        let name = match &dom.prefix {
            Some(prefix) => format!("{}:{}", prefix, dom.name),
            None => dom.name.clone(),
        };
        let elem = Element::new(document, name);
        for (key, value) in &dom.attributes {
            elem.set_attribute(document, key.as_str(), value.as_str());
        }
        for child in &dom.children {
            match child {
                XMLNode::Element(child) => {
                    let child = Element::from_dom(document, child)?;
                    elem.add(document, child);
                }
                XMLNode::Text(text) => {
                    elem.add_text(document, text.as_str());
                }
                XMLNode::CData(text) => {
                    elem.cdata(document, text.as_str());
                }
                XMLNode::Comment(text) => {
                    elem.comment(document, text.as_str());
                }
                XMLNode::ProcessingInstruction(target, _) => return Err(unsupported_pi(target)),
            }
        }
        Ok(elem)
    }
}

fn node_to_dom(document: &Document, node: Node) -> Option<XMLNode> {
    let content = |text: Option<&str>| text.unwrap_or("").to_string();
    match node {
        Node::Element(elem) => Some(XMLNode::Element(elem.to_dom(document))),
        Node::Text(text) => Some(XMLNode::Text(content(text.text(document)))),
        Node::CData(cdata) => Some(XMLNode::CData(content(cdata.text(document)))),
        Node::Comment(comment) => Some(XMLNode::Comment(content(comment.text(document)))),
        Node::Declaration(_) => None,
    }
}

impl Document {
    /// DOM of the root element, or `None` if there is no root.
    pub fn to_dom(&self) -> Option<xmltree::Element> {
        self.root_element().map(|root| root.to_dom(self))
    }

    /// DOM of every top-level item except the declaration.
    pub fn to_dom_nodes(&self) -> Vec<XMLNode> {
        self.items()
            .iter()
            .filter_map(|item| node_to_dom(self, *item))
            .collect()
    }

    /// Creates a document with the default declaration and `root` as its root element.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedInput`]: The tree holds a processing instruction.
    pub fn from_dom(root: &xmltree::Element) -> Result<Document> {
        let mut doc = Document::new();
        let elem = Element::from_dom(&mut doc, root)?;
        doc.set_root(Some(elem));
        tracing::debug!(root = elem.name(&doc), "converted dom");
        Ok(doc)
    }

    /// Creates a document from a list of top-level DOM nodes.
    /// Comments are kept in order around the root element.
    ///
    /// # Errors
    ///
    /// - [`Error::StructuralState`]: There is more than one element.
    /// - [`Error::UnsupportedInput`]: There is top-level text or cdata, or a
    /// processing instruction anywhere.
    pub fn from_dom_nodes(nodes: &[XMLNode]) -> Result<Document> {
        let mut doc = Document::new();
        for node in nodes {
            match node {
                XMLNode::Element(dom) => {
                    if let Some(root) = doc.root_element() {
                        return Err(Error::StructuralState(format!(
                            "Second root element '{}' after '{}'",
                            dom.name,
                            root.name(&doc)
                        )));
                    }
                    let elem = Element::from_dom(&mut doc, dom)?;
                    doc.set_root(Some(elem));
                }
                XMLNode::Comment(text) => {
                    doc.comment(text.as_str());
                }
                XMLNode::Text(_) | XMLNode::CData(_) => {
                    tracing::warn!("rejecting top-level character data");
                    return Err(Error::UnsupportedInput(
                        "character data outside of the root element".to_string(),
                    ));
                }
                XMLNode::ProcessingInstruction(target, _) => return Err(unsupported_pi(target)),
            }
        }
        Ok(doc)
    }
}
