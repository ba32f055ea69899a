use crate::document::Document;
use crate::element::{Element, ElementData};

/// Where a node is attached.
///
/// This is a plain back-reference: children are owned by the list of their
/// parent, never the other way around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parent {
    /// The node is a top-level item of the document.
    Document,
    Element(Element),
}

/// Any item that can be placed in a [`Document`].
///
/// Like [`Element`], every variant is a `Copy` handle. The node data is
/// stored in the [`Document`] that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    Declaration(Declaration),
    Element(Element),
    Text(Text),
    CData(CData),
    Comment(Comment),
}

#[derive(Debug)]
pub(crate) struct DeclarationData {
    pub(crate) version: Option<String>,
    pub(crate) encoding: Option<String>,
}

#[derive(Debug)]
pub(crate) enum NodeData {
    Declaration(DeclarationData),
    Element(ElementData),
    Text(Option<String>),
    CData(Option<String>),
    Comment(Option<String>),
}

#[derive(Debug)]
pub(crate) struct NodeSlot {
    pub(crate) parent: Option<Parent>,
    pub(crate) data: NodeData,
}

mod sealed {
    pub trait Sealed {}
}

/// Node kinds that may be children of an [`Element`]:
/// [`Element`], [`Text`], [`CData`] and [`Comment`].
pub trait ChildNode: Copy + Into<Node> + sealed::Sealed {}

impl Node {
    pub(crate) fn id(&self) -> usize {
        match self {
            Node::Declaration(n) => n.id,
            Node::Element(n) => n.id,
            Node::Text(n) => n.id,
            Node::CData(n) => n.id,
            Node::Comment(n) => n.id,
        }
    }

    pub fn as_element(&self) -> Option<Element> {
        match self {
            Self::Element(elem) => Some(*elem),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<Text> {
        match self {
            Self::Text(text) => Some(*text),
            _ => None,
        }
    }

    pub fn parent(&self, document: &Document) -> Option<Parent> {
        document.slot(self.id()).parent
    }

    /// Returns the document this node belongs to, or `None` if the node is
    /// part of a detached subtree.
    pub fn document<'a>(&self, document: &'a Document) -> Option<&'a Document> {
        let mut node = *self;
        loop {
            match node.parent(document)? {
                Parent::Document => return Some(document),
                Parent::Element(elem) => node = Node::Element(elem),
            }
        }
    }

    /// Text payload of a [`Text`], [`CData`] or [`Comment`] node.
    pub fn content_text<'a>(&self, document: &'a Document) -> Option<&'a str> {
        match self {
            Node::Text(n) => n.text(document),
            Node::CData(n) => n.text(document),
            Node::Comment(n) => n.text(document),
            Node::Declaration(_) | Node::Element(_) => None,
        }
    }
}

impl From<Element> for Node {
    fn from(elem: Element) -> Node {
        Node::Element(elem)
    }
}

impl From<Declaration> for Node {
    fn from(decl: Declaration) -> Node {
        Node::Declaration(decl)
    }
}

impl sealed::Sealed for Element {}
impl ChildNode for Element {}

macro_rules! content_node {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name {
            pub(crate) id: usize,
        }

        impl $name {
            /// Create a new detached node with text.
            pub fn new<S: Into<String>>(document: &mut Document, text: S) -> $name {
                let id = document.push_slot(NodeData::$name(Some(text.into())));
                $name { id }
            }

            pub fn text<'a>(&self, document: &'a Document) -> Option<&'a str> {
                document.content(self.id).as_deref()
            }

            pub fn set_text<S: Into<String>>(&self, document: &mut Document, text: S) {
                *document.mut_content(self.id) = Some(text.into());
            }

            /// Remove the payload. A node without payload writes nothing.
            pub fn clear_text(&self, document: &mut Document) {
                *document.mut_content(self.id) = None;
            }

            pub fn parent(&self, document: &Document) -> Option<Parent> {
                Node::$name(*self).parent(document)
            }

            pub fn document<'a>(&self, document: &'a Document) -> Option<&'a Document> {
                Node::$name(*self).document(document)
            }
        }

        impl From<$name> for Node {
            fn from(node: $name) -> Node {
                Node::$name(node)
            }
        }

        impl sealed::Sealed for $name {}
        impl ChildNode for $name {}
    };
}

content_node!(
    /// Character data. Its payload is escaped when written.
    Text
);
content_node!(
    /// A `<![CDATA[...]]>` section. Its payload is written verbatim.
    CData
);
content_node!(
    /// A `<!-- ... -->` comment. Its payload is written verbatim.
    Comment
);

/// The `<?xml ...?>` prolog of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Declaration {
    pub(crate) id: usize,
}

impl Declaration {
    pub fn new(document: &mut Document, version: Option<&str>, encoding: Option<&str>) -> Declaration {
        let id = document.push_slot(NodeData::Declaration(DeclarationData {
            version: version.map(String::from),
            encoding: encoding.map(String::from),
        }));
        Declaration { id }
    }

    fn data<'a>(&self, document: &'a Document) -> &'a DeclarationData {
        match &document.slot(self.id).data {
            NodeData::Declaration(data) => data,
            _ => panic!("node {} is not a declaration", self.id),
        }
    }

    fn mut_data<'a>(&self, document: &'a mut Document) -> &'a mut DeclarationData {
        match &mut document.mut_slot(self.id).data {
            NodeData::Declaration(data) => data,
            _ => panic!("node {} is not a declaration", self.id),
        }
    }

    pub fn version<'a>(&self, document: &'a Document) -> Option<&'a str> {
        self.data(document).version.as_deref()
    }

    pub fn set_version(&self, document: &mut Document, version: Option<&str>) {
        self.mut_data(document).version = version.map(String::from);
    }

    pub fn encoding<'a>(&self, document: &'a Document) -> Option<&'a str> {
        self.data(document).encoding.as_deref()
    }

    pub fn set_encoding(&self, document: &mut Document, encoding: Option<&str>) {
        self.mut_data(document).encoding = encoding.map(String::from);
    }

    pub fn parent(&self, document: &Document) -> Option<Parent> {
        Node::Declaration(*self).parent(document)
    }
}
