//! Pre-order traversal of a document.
//!
//! A [`Visitor`] is called once for the document and once for every node
//! below it. Returning `false` from a visit skips the children of that
//! item; its siblings are still visited.
//!
//! Any `FnMut(&Document, Item) -> bool` closure is a visitor:
//!
//! ```
//! use fluent_xml::{Document, Item, Node};
//!
//! let mut doc = Document::new();
//! let root = doc.root("a").unwrap();
//! root.e(&mut doc, "b").e(&mut doc, "c");
//!
//! let mut names = Vec::new();
//! doc.visit(&mut |doc: &Document, item: Item| {
//!     if let Item::Node(Node::Element(elem)) = item {
//!         names.push(elem.name(doc).to_string());
//!     }
//!     true
//! });
//! assert_eq!(names, vec!["a", "b", "c"]);
//! ```

use crate::document::Document;
use crate::element::Element;
use crate::node::Node;

/// What a [`Visitor`] is currently looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item {
    Document,
    Node(Node),
}

pub trait Visitor {
    /// Returns whether the children of `item` should be visited.
    /// Only the document and elements have children.
    fn visit(&mut self, document: &Document, item: Item) -> bool;
}

impl<F> Visitor for F
where
    F: FnMut(&Document, Item) -> bool,
{
    fn visit(&mut self, document: &Document, item: Item) -> bool {
        self(document, item)
    }
}

impl Node {
    /// Visits this node, then its subtree if the visitor agrees.
    pub fn visit<V: Visitor + ?Sized>(&self, document: &Document, visitor: &mut V) {
        if !visitor.visit(document, Item::Node(*self)) {
            return;
        }
        if let Node::Element(elem) = self {
            for child in elem.children(document) {
                child.visit(document, visitor);
            }
        }
    }
}

impl Element {
    pub fn visit<V: Visitor + ?Sized>(&self, document: &Document, visitor: &mut V) {
        Node::Element(*self).visit(document, visitor)
    }
}

impl Document {
    /// Visits the document itself, then every top-level item in order.
    pub fn visit<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        if !visitor.visit(self, Item::Document) {
            return;
        }
        for item in self.items() {
            item.visit(self, visitor);
        }
    }
}
