//! An in-memory XML document model with a fluent builder.
//!
//! A [`Document`] owns every node. [`Element`], [`Text`], [`CData`],
//! [`Comment`] and [`Declaration`] are `Copy` handles into it, so most
//! methods take the document as their first argument.
//!
//! Building a document:
//!
//! ```
//! use fluent_xml::Document;
//!
//! let mut doc = Document::new();
//! let person = doc.root("person").unwrap();
//! person.e_with_text(&mut doc, "first-name", "Bob");
//! person.e_with_text(&mut doc, "last-name", "Jones");
//! let home = person
//!     .e(&mut doc, "addresses")
//!     .e(&mut doc, "address")
//!     .set_attribute(&mut doc, "location", "Home");
//! home.e_with_text(&mut doc, "city", "Richmond");
//!
//! assert_eq!(
//!     doc.write_str().unwrap(),
//!     r#"<?xml version="1.0" encoding="UTF-8"?>
//! <person>
//!   <first-name>Bob</first-name>
//!   <last-name>Jones</last-name>
//!   <addresses>
//!     <address location="Home">
//!       <city>Richmond</city>
//!     </address>
//!   </addresses>
//! </person>
//! "#
//! );
//! ```
//!
//! Reading one back:
//!
//! ```
//! use fluent_xml::Document;
//!
//! let doc = Document::parse_str("<a><b>1</b><b>2</b></a>").unwrap();
//! let root = doc.root_element().unwrap();
//! let texts = root.descendants_text(&doc, "b").unwrap();
//! assert_eq!(texts, vec![Some("1"), Some("2")]);
//! ```
//!
//! [`Document::to_dom()`] and [`Document::from_dom()`] convert to and from
//! [`xmltree`], see the [`dom`] module.

mod document;
pub mod dom;
mod element;
mod error;
mod node;
mod parser;
mod visitor;
mod writer;

pub use crate::document::Document;
pub use crate::element::{Attribute, Element};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::node::{CData, ChildNode, Comment, Declaration, Node, Parent, Text};
pub use crate::parser::ReadOptions;
pub use crate::visitor::{Item, Visitor};
