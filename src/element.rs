use crate::document::Document;
use crate::error::{Error, Result};
use crate::node::{CData, ChildNode, Comment, Node, NodeData, Parent, Text};
use crate::visitor::Item;
use itertools::Itertools;

/// A name/value pair owned by exactly one [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V) -> Attribute {
        Attribute {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct ElementData {
    name: String,
    attributes: Vec<Attribute>, // insertion order, written in this order
    children: Vec<Node>,
}

/// Represents an Xml Element.
///
/// This struct only contains a unique usize id and implements trait `Copy`.
/// So you do not need to bother with having a reference.
///
/// Because the actual data of the element is stored in [`Document`],
/// most methods takes `&Document` or `&mut Document` as its first argument.
///
/// Builder methods return the created node, so a tree reads top-down:
///
/// ```
/// use fluent_xml::Document;
///
/// let mut doc = Document::new();
/// let person = doc.root("person").unwrap();
/// person.e_with_text(&mut doc, "first-name", "Bob");
/// let address = person.e(&mut doc, "address").set_attribute(&mut doc, "location", "Home");
/// address.e_with_text(&mut doc, "city", "Richmond");
/// assert_eq!(person.child_text(&doc, "first-name").unwrap(), Some("Bob"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Element {
    pub(crate) id: usize,
}

impl Element {
    /// Create a new detached element with name.
    pub fn new<S: Into<String>>(document: &mut Document, name: S) -> Element {
        let id = document.push_slot(NodeData::Element(ElementData {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }));
        Element { id }
    }

    /// Create a new detached element holding a single text node.
    pub fn with_text<N: Into<String>, T: Into<String>>(
        document: &mut Document,
        name: N,
        text: T,
    ) -> Element {
        let elem = Element::new(document, name);
        elem.add_text(document, text);
        elem
    }

    fn data<'a>(&self, document: &'a Document) -> &'a ElementData {
        match &document.slot(self.id).data {
            NodeData::Element(data) => data,
            _ => panic!("node {} is not an element", self.id),
        }
    }

    fn mut_data<'a>(&self, document: &'a mut Document) -> &'a mut ElementData {
        match &mut document.mut_slot(self.id).data {
            NodeData::Element(data) => data,
            _ => panic!("node {} is not an element", self.id),
        }
    }

    pub fn name<'a>(&self, document: &'a Document) -> &'a str {
        &self.data(document).name
    }

    pub fn set_name<S: Into<String>>(&self, document: &mut Document, name: S) {
        self.mut_data(document).name = name.into();
    }

    pub fn parent(&self, document: &Document) -> Option<Parent> {
        Node::Element(*self).parent(document)
    }

    /// ```ignore
    /// self.parent(document).is_some()
    /// ```
    pub fn has_parent(&self, document: &Document) -> bool {
        self.parent(document).is_some()
    }

    /// Returns the document, or `None` if this element is in a detached subtree.
    pub fn document<'a>(&self, document: &'a Document) -> Option<&'a Document> {
        Node::Element(*self).document(document)
    }
}

// Attributes
impl Element {
    pub fn attributes<'a>(&self, document: &'a Document) -> &'a [Attribute] {
        &self.data(document).attributes
    }

    /// First attribute with the given name.
    pub fn attribute<'a>(&self, document: &'a Document, name: &str) -> Option<&'a Attribute> {
        self.attributes(document).iter().find(|attr| attr.name == name)
    }

    pub fn attribute_mut<'a>(
        &self,
        document: &'a mut Document,
        name: &str,
    ) -> Option<&'a mut Attribute> {
        self.mut_data(document)
            .attributes
            .iter_mut()
            .find(|attr| attr.name == name)
    }

    pub fn attribute_value<'a>(&self, document: &'a Document, name: &str) -> Option<&'a str> {
        self.attribute(document, name).map(|attr| attr.value.as_str())
    }

    /// Sets the attribute, replacing the existing one of the same name.
    /// The new attribute goes to the end of the list.
    pub fn set_attribute<N: Into<String>, V: Into<String>>(
        &self,
        document: &mut Document,
        name: N,
        value: V,
    ) -> Element {
        let attr = Attribute::new(name, value);
        self.remove_attribute(document, &attr.name);
        self.add_attribute(document, attr)
    }

    /// Calls [`Element::set_attribute`] for each pair, in order.
    pub fn set_attributes<I, N, V>(&self, document: &mut Document, pairs: I) -> Element
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        for (name, value) in pairs {
            self.set_attribute(document, name, value);
        }
        *self
    }

    /// Appends the attribute without checking for duplicates.
    pub fn add_attribute(&self, document: &mut Document, attribute: Attribute) -> Element {
        self.mut_data(document).attributes.push(attribute);
        *self
    }

    /// Removes the first attribute with the given name.
    pub fn remove_attribute(&self, document: &mut Document, name: &str) -> Option<Attribute> {
        let attributes = &mut self.mut_data(document).attributes;
        let pos = attributes.iter().position(|attr| attr.name == name)?;
        Some(attributes.remove(pos))
    }
}

// Children
impl Element {
    pub fn children<'a>(&self, document: &'a Document) -> &'a [Node] {
        &self.data(document).children
    }

    /// ```ignore
    /// !self.children(document).is_empty()
    /// ```
    pub fn has_children(&self, document: &Document) -> bool {
        !self.children(document).is_empty()
    }

    pub fn child_elements(&self, document: &Document) -> Vec<Element> {
        self.children(document)
            .iter()
            .filter_map(|node| node.as_element())
            .collect()
    }

    /// Appends the node. If it is attached elsewhere it is moved, not copied.
    ///
    /// No structural validation is done. Adding an ancestor of `self`
    /// creates a cycle, which the caller must not do.
    pub fn add<T: ChildNode>(&self, document: &mut Document, child: T) -> T {
        let node: Node = child.into();
        document.detach_node(node);
        document.mut_slot(node.id()).parent = Some(Parent::Element(*self));
        self.mut_data(document).children.push(node);
        child
    }

    /// Removes the node from the children. Returns `false` if it was not a child.
    pub fn remove<T: ChildNode>(&self, document: &mut Document, child: T) -> bool {
        let node: Node = child.into();
        let children = &mut self.mut_data(document).children;
        match children.iter().position(|n| *n == node) {
            Some(pos) => {
                children.remove(pos);
                document.mut_slot(node.id()).parent = None;
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove_child_node(&self, document: &mut Document, node: Node) {
        let children = &mut self.mut_data(document).children;
        if let Some(pos) = children.iter().position(|n| *n == node) {
            children.remove(pos);
        }
    }

    /// Removes this element from its parent, if any.
    pub fn detach(&self, document: &mut Document) {
        document.detach_node(Node::Element(*self));
    }

    /// Creates and appends a new element.
    pub fn e<S: Into<String>>(&self, document: &mut Document, name: S) -> Element {
        let elem = Element::new(document, name);
        self.add(document, elem)
    }

    /// Creates and appends a new element holding `text`.
    pub fn e_with_text<N: Into<String>, T: Into<String>>(
        &self,
        document: &mut Document,
        name: N,
        text: T,
    ) -> Element {
        let elem = Element::with_text(document, name, text);
        self.add(document, elem)
    }

    /// Creates and appends a new text node.
    pub fn add_text<S: Into<String>>(&self, document: &mut Document, text: S) -> Text {
        let node = Text::new(document, text);
        self.add(document, node)
    }

    pub fn cdata<S: Into<String>>(&self, document: &mut Document, text: S) -> CData {
        let node = CData::new(document, text);
        self.add(document, node)
    }

    pub fn comment<S: Into<String>>(&self, document: &mut Document, text: S) -> Comment {
        let node = Comment::new(document, text);
        self.add(document, node)
    }
}

// Text and queries
impl Element {
    fn sole_text_child(&self, document: &Document) -> Result<Option<Text>> {
        match self.children(document) {
            [] => Ok(None),
            [Node::Text(text)] => Ok(Some(*text)),
            [_] => Err(Error::StructuralState(format!(
                "<{}> has a single child that is not text",
                self.name(document)
            ))),
            _ => Err(Error::StructuralState(format!(
                "<{}> has more than one child",
                self.name(document)
            ))),
        }
    }

    /// Returns the text of this element.
    ///
    /// # Errors
    ///
    /// - [`Error::StructuralState`]: The element has more than one child, or its
    /// only child is not a text node.
    pub fn text<'a>(&self, document: &'a Document) -> Result<Option<&'a str>> {
        Ok(self
            .sole_text_child(document)?
            .and_then(|text| text.text(document)))
    }

    /// Sets the text of this element, creating the text node if there are no children.
    ///
    /// # Errors
    ///
    /// - [`Error::StructuralState`]: The element has more than one child, or its
    /// only child is not a text node.
    pub fn set_text<S: Into<String>>(&self, document: &mut Document, text: S) -> Result<Element> {
        match self.sole_text_child(document)? {
            Some(node) => node.set_text(document, text),
            None => {
                self.add_text(document, text);
            }
        }
        Ok(*self)
    }

    /// Returns the direct child element with the given name.
    ///
    /// # Errors
    ///
    /// - [`Error::StructuralState`]: More than one child has that name.
    pub fn child(&self, document: &Document, name: &str) -> Result<Option<Element>> {
        let mut found = None;
        for elem in self.children_named(document, name) {
            if found.is_some() {
                return Err(Error::StructuralState(format!(
                    "<{}> has more than one child named '{}'",
                    self.name(document),
                    name
                )));
            }
            found = Some(elem);
        }
        Ok(found)
    }

    /// All direct child elements with the given name, in document order.
    pub fn children_named(&self, document: &Document, name: &str) -> Vec<Element> {
        self.children(document)
            .iter()
            .filter_map(|node| node.as_element())
            .filter(|elem| elem.name(document) == name)
            .collect()
    }

    /// Shorthand for `child(name)` then `text()`, with the errors of both.
    pub fn child_text<'a>(&self, document: &'a Document, name: &str) -> Result<Option<&'a str>> {
        match self.child(document, name)? {
            Some(child) => child.text(document),
            None => Ok(None),
        }
    }

    /// Every element below this one with the given name, in pre-order.
    pub fn descendants(&self, document: &Document, name: &str) -> Vec<Element> {
        let mut found = Vec::new();
        let mut visitor = |doc: &Document, item: Item| {
            if let Item::Node(Node::Element(elem)) = item {
                if elem.name(doc) == name {
                    found.push(elem);
                }
            }
            true
        };
        for child in self.children(document) {
            child.visit(document, &mut visitor);
        }
        found.into_iter().unique().collect()
    }

    /// Texts of [`Element::descendants`], in the same order.
    ///
    /// Equal texts are kept once, so two descendants with the same text
    /// produce a single entry.
    pub fn descendants_text<'a>(
        &self,
        document: &'a Document,
        name: &str,
    ) -> Result<Vec<Option<&'a str>>> {
        let texts: Vec<Option<&str>> = self
            .descendants(document, name)
            .into_iter()
            .map(|elem| elem.text(document))
            .collect::<Result<_>>()?;
        Ok(texts.into_iter().unique().collect())
    }
}
