use crate::element::Element;
use crate::error::{Error, Result};
use crate::node::{Comment, Declaration, Node, NodeData, NodeSlot, Parent};
use crate::parser::{self, ParsedDeclaration, ReadOptions};
use crate::writer;
use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

/// Represents a XML document.
///
/// The document owns every node created for it, attached or not.
/// Its top-level items are usually a [`Declaration`], some comments and
/// one root [`Element`].
///
/// Use [`Document::parse_str()`], [`Document::parse_reader()`] or
/// [`Document::parse_file()`] to parse xml.
///
/// # Examples
/// ```
/// use fluent_xml::Document;
///
/// let mut doc = Document::new();
/// doc.comment("note");
/// let person = doc.root("person").unwrap();
/// person.e_with_text(&mut doc, "first-name", "Bob");
/// assert_eq!(
///     doc.write_str().unwrap(),
///     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- note -->\n<person>\n  <first-name>Bob</first-name>\n</person>\n"
/// );
/// ```
#[derive(Debug)]
pub struct Document {
    store: Vec<NodeSlot>,
    items: Vec<Node>,
    declaration: Option<Declaration>,
    root: Option<Element>,
}

impl Document {
    /// Create a blank new xml document with a
    /// `<?xml version="1.0" encoding="UTF-8"?>` declaration.
    pub fn new() -> Document {
        let mut doc = Document::empty();
        let decl = Declaration::new(&mut doc, Some("1.0"), Some("UTF-8"));
        doc.set_declaration(Some(decl));
        doc
    }

    fn empty() -> Document {
        Document {
            store: Vec::new(),
            items: Vec::new(),
            declaration: None,
            root: None,
        }
    }

    pub(crate) fn push_slot(&mut self, data: NodeData) -> usize {
        self.store.push(NodeSlot { parent: None, data });
        self.store.len() - 1
    }

    pub(crate) fn slot(&self, id: usize) -> &NodeSlot {
        &self.store[id]
    }

    pub(crate) fn mut_slot(&mut self, id: usize) -> &mut NodeSlot {
        &mut self.store[id]
    }

    pub(crate) fn content(&self, id: usize) -> &Option<String> {
        match &self.slot(id).data {
            NodeData::Text(text) | NodeData::CData(text) | NodeData::Comment(text) => text,
            _ => panic!("node {} is not a content node", id),
        }
    }

    pub(crate) fn mut_content(&mut self, id: usize) -> &mut Option<String> {
        match &mut self.mut_slot(id).data {
            NodeData::Text(text) | NodeData::CData(text) | NodeData::Comment(text) => text,
            _ => panic!("node {} is not a content node", id),
        }
    }

    /// Remove the node from whatever list holds it and clear its parent.
    pub(crate) fn detach_node(&mut self, node: Node) {
        match self.slot(node.id()).parent {
            Some(Parent::Document) => {
                self.remove_item(node);
            }
            Some(Parent::Element(parent)) => {
                parent.remove_child_node(self, node);
                self.mut_slot(node.id()).parent = None;
            }
            None => {}
        }
    }

    fn remove_item(&mut self, node: Node) -> bool {
        let pos = match self.items.iter().position(|n| *n == node) {
            Some(pos) => pos,
            None => return false,
        };
        self.items.remove(pos);
        self.mut_slot(node.id()).parent = None;
        if self.declaration.map(Node::from) == Some(node) {
            self.declaration = None;
        }
        if self.root.map(Node::from) == Some(node) {
            self.root = None;
        }
        true
    }

    /// Top-level items, in document order.
    pub fn items(&self) -> &[Node] {
        &self.items
    }

    /// True if nothing but the declaration is in the document.
    pub fn is_empty(&self) -> bool {
        self.items
            .iter()
            .all(|item| matches!(item, Node::Declaration(_)))
    }
}

impl Default for Document {
    fn default() -> Document {
        Document::new()
    }
}

// Declaration, root and top-level items
impl Document {
    /// Returns the declaration, or `None` if there isn't one.
    /// New documents start with `version="1.0" encoding="UTF-8"`.
    pub fn declaration(&self) -> Option<Declaration> {
        self.declaration
    }

    /// Replaces the declaration. The new one is inserted as the first item.
    /// `None` removes the current declaration.
    pub fn set_declaration(&mut self, declaration: Option<Declaration>) {
        if let Some(old) = self.declaration {
            self.remove_item(Node::Declaration(old));
        }
        if let Some(decl) = declaration {
            self.detach_node(Node::Declaration(decl));
            self.mut_slot(decl.id).parent = Some(Parent::Document);
            self.items.insert(0, Node::Declaration(decl));
            self.declaration = Some(decl);
        }
    }

    /// Get the root element of document.
    pub fn root_element(&self) -> Option<Element> {
        self.root
    }

    fn check_no_root(&self) -> Result<()> {
        match self.root {
            Some(_) => Err(Error::StructuralState(
                "There is already a root element for this document".to_string(),
            )),
            None => Ok(()),
        }
    }

    /// Creates the root element.
    ///
    /// # Errors
    ///
    /// - [`Error::StructuralState`]: The document already has a root element.
    /// Use [`Document::set_root()`] to replace it.
    pub fn root<S: Into<String>>(&mut self, name: S) -> Result<Element> {
        self.check_no_root()?;
        let root = Element::new(self, name);
        self.set_root(Some(root));
        Ok(root)
    }

    /// Creates the root element holding `text`.
    ///
    /// # Errors
    ///
    /// - [`Error::StructuralState`]: The document already has a root element.
    pub fn root_with_text<N: Into<String>, T: Into<String>>(
        &mut self,
        name: N,
        text: T,
    ) -> Result<Element> {
        self.check_no_root()?;
        let root = Element::with_text(self, name, text);
        self.set_root(Some(root));
        Ok(root)
    }

    /// Replaces the root element at its position, or appends it if there was none.
    /// `None` removes the current root.
    pub fn set_root(&mut self, root: Option<Element>) {
        if root.is_some() && root == self.root {
            return;
        }
        if let Some(new_root) = root {
            self.detach_node(Node::Element(new_root));
        }
        match (self.root, root) {
            (Some(old), Some(new_root)) => {
                let pos = self
                    .items
                    .iter()
                    .position(|n| *n == Node::Element(old))
                    .unwrap_or(self.items.len());
                self.mut_slot(old.id).parent = None;
                if pos < self.items.len() {
                    self.items[pos] = Node::Element(new_root);
                } else {
                    self.items.push(Node::Element(new_root));
                }
                self.mut_slot(new_root.id).parent = Some(Parent::Document);
            }
            (Some(old), None) => {
                self.remove_item(Node::Element(old));
            }
            (None, Some(new_root)) => {
                self.add(new_root);
            }
            (None, None) => {}
        }
        self.root = root;
    }

    /// Appends a comment to the top-level items.
    /// Call this before [`Document::root()`] to place it above the root element.
    pub fn comment<S: Into<String>>(&mut self, text: S) -> &mut Document {
        let comment = Comment::new(self, text);
        self.add(comment);
        self
    }

    /// Appends an item to the document. No validation is performed.
    pub fn add<T: Copy + Into<Node>>(&mut self, item: T) -> T {
        let node: Node = item.into();
        self.detach_node(node);
        self.mut_slot(node.id()).parent = Some(Parent::Document);
        self.items.push(node);
        item
    }

    /// Removes a top-level item. Returns `false` if it was not one.
    pub fn remove<T: Into<Node>>(&mut self, item: T) -> bool {
        self.remove_item(item.into())
    }
}

// Read and write
impl Document {
    /// Parses xml string.
    ///
    /// # Errors
    ///
    /// Returns Errors from [`Document::parse_reader()`].
    pub fn parse_str(str: &str) -> Result<Document> {
        Document::parse_str_with_opts(str, ReadOptions::default())
    }

    pub fn parse_str_with_opts(str: &str, opts: ReadOptions) -> Result<Document> {
        let parsed = parser::parse_str(str, &opts)?;
        Document::from_parsed(parsed.declaration, &parsed.nodes)
    }

    /// Parses xml from reader. The encoding is detected from the byte order mark
    /// or the `encoding` of the xml declaration.
    ///
    /// # Errors
    ///
    /// - [`Error::CannotDecode`]: Could not decode XML.
    /// - [`Error::MalformedXML`]: Could not read XML.
    /// - [`Error::UnsupportedInput`]: XML has nodes that can't be represented.
    /// - [`Error::Io`]: IO Error
    pub fn parse_reader<R: Read>(reader: R) -> Result<Document> {
        Document::parse_reader_with_opts(reader, ReadOptions::default())
    }

    pub fn parse_reader_with_opts<R: Read>(mut reader: R, opts: ReadOptions) -> Result<Document> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let parsed = parser::parse_bytes(&bytes, &opts)?;
        Document::from_parsed(parsed.declaration, &parsed.nodes)
    }

    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
        Document::parse_file_with_opts(path, ReadOptions::default())
    }

    pub fn parse_file_with_opts<P: AsRef<Path>>(path: P, opts: ReadOptions) -> Result<Document> {
        let file = File::open(path)?;
        Document::parse_reader_with_opts(file, opts)
    }

    fn from_parsed(
        declaration: Option<ParsedDeclaration>,
        nodes: &[xmltree::XMLNode],
    ) -> Result<Document> {
        // Without a prolog the default declaration stays.
        let mut doc = Document::from_dom_nodes(nodes)?;
        if let (Some(parsed), Some(decl)) = (declaration, doc.declaration()) {
            decl.set_version(&mut doc, parsed.version.as_deref());
            decl.set_encoding(&mut doc, parsed.encoding.as_deref());
        }
        tracing::debug!(items = doc.items.len(), nodes = doc.store.len(), "parsed document");
        Ok(doc)
    }

    /// Writes document as xml string.
    pub fn write_str(&self) -> Result<String> {
        let mut buf: Vec<u8> = Vec::with_capacity(200);
        self.write(&mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    /// Write document to writer. Will be written in UTF-8,
    /// whatever the declaration says.
    pub fn write(&self, writer: &mut impl Write) -> Result<()> {
        for item in &self.items {
            writer::write_node(self, *item, writer, 0)?;
        }
        Ok(())
    }
}

impl FromStr for Document {
    type Err = Error;

    fn from_str(s: &str) -> Result<Document> {
        Document::parse_str(s)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let xml = self.write_str().map_err(|_| fmt::Error)?;
        f.write_str(&xml)
    }
}
