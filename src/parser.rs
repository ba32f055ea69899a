use crate::error::{Error, Result};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use quick_xml::events::{BytesDecl, BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;
use xmltree::XMLNode;

/// Options when parsing xml.
///
/// `empty_text_node`: `<tag></tag>` will have an empty text node as its child, while `<tag />` won't.
///
/// `trim_text`: Whitespace around text and comments is removed, and text made
/// only of whitespace is dropped. Off by default, in which case only the
/// layout added by the writer is removed: the indentation around text between
/// siblings and the single space padding each comment.
///
/// `require_decl`: Input that doesn't start with an xml declaration is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    pub empty_text_node: bool,
    pub trim_text: bool,
    pub require_decl: bool,
}

impl Default for ReadOptions {
    fn default() -> ReadOptions {
        ReadOptions {
            empty_text_node: true,
            trim_text: false,
            require_decl: false,
        }
    }
}

/// Values of a parsed `<?xml ...?>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedDeclaration {
    pub(crate) version: Option<String>,
    pub(crate) encoding: Option<String>,
}

/// Tokenized input: the prolog, if any, and the top-level DOM nodes.
#[derive(Debug)]
pub(crate) struct ParsedDom {
    pub(crate) declaration: Option<ParsedDeclaration>,
    pub(crate) nodes: Vec<XMLNode>,
}

/// Parses raw bytes, detecting the encoding first.
pub(crate) fn parse_bytes(bytes: &[u8], opts: &ReadOptions) -> Result<ParsedDom> {
    let text = decode(bytes)?;
    parse_str(&text, opts)
}

pub(crate) fn parse_str(text: &str, opts: &ReadOptions) -> Result<ParsedDom> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(opts.trim_text);
    let mut parser = DomParser::new(opts);
    let mut buf = Vec::with_capacity(200); // reduce time increasing capacity at start.
    loop {
        let event = reader.read_event(&mut buf)?;
        tracing::trace!(?event);
        if parser.handle_event(event)? {
            break;
        }
        buf.clear();
    }
    parser.finish()
}

// Look at the byte order mark and the declaration to figure out the encoding.
fn decode(bytes: &[u8]) -> Result<Cow<'_, str>> {
    let (encoding, bom_len) = match bytes {
        [0xfe, 0xff, ..] => (UTF_16BE, 2),
        [0xff, 0xfe, ..] => (UTF_16LE, 2),
        [0xef, 0xbb, 0xbf, ..] => (UTF_8, 3),
        [0x00, 0x3c, 0x00, 0x3f, ..] => (UTF_16BE, 0),
        [0x3c, 0x00, 0x3f, 0x00, ..] => (UTF_16LE, 0),
        _ => (declared_encoding(bytes)?.unwrap_or(UTF_8), 0),
    };
    tracing::debug!(encoding = encoding.name(), "decoding input");
    let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
    if had_errors {
        return Err(Error::CannotDecode);
    }
    Ok(text)
}

// Encoding named by the declaration of ASCII compatible input.
fn declared_encoding(bytes: &[u8]) -> Result<Option<&'static Encoding>> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    let label = match reader.read_event(&mut buf) {
        Ok(Event::Decl(ev)) => match ev.encoding() {
            Some(label) => label?.into_owned(),
            None => return Ok(None),
        },
        _ => return Ok(None),
    };
    let encoding = Encoding::for_label(&label).ok_or(Error::CannotDecode)?;
    // UTF-16 without a byte order mark would have matched a pattern above.
    if encoding == UTF_16LE || encoding == UTF_16BE {
        return Err(Error::CannotDecode);
    }
    Ok(Some(encoding))
}

// Undoes the indentation the writer puts around text between siblings.
// A lone text child is written inline and is kept as is.
fn strip_layout(children: &mut Vec<XMLNode>, depth: usize) {
    if let [XMLNode::Text(_)] = children.as_slice() {
        return;
    }
    for child in children.iter_mut() {
        if let XMLNode::Text(text) = child {
            let stripped = strip_text_layout(text, depth).to_string();
            *text = stripped;
        }
    }
    children.retain(|child| match child {
        XMLNode::Text(text) => !text.trim().is_empty(),
        _ => true,
    });
}

fn strip_text_layout(text: &str, depth: usize) -> &str {
    let mut text = match text.strip_prefix('\n') {
        Some(rest) => {
            let indent = rest
                .bytes()
                .take(depth * 2)
                .take_while(|b| *b == b' ')
                .count();
            &rest[indent..]
        }
        None => text,
    };
    if let Some(pos) = text.rfind('\n') {
        if text[pos + 1..].bytes().all(|b| b == b' ') {
            text = &text[..pos];
        }
    }
    text
}

struct DomParser<'a> {
    opts: &'a ReadOptions,
    started: bool,
    declaration: Option<ParsedDeclaration>,
    element_stack: Vec<xmltree::Element>,
    nodes: Vec<XMLNode>,
}

impl<'a> DomParser<'a> {
    fn new(opts: &'a ReadOptions) -> DomParser<'a> {
        DomParser {
            opts,
            started: false,
            declaration: None,
            element_stack: Vec::new(),
            nodes: Vec::new(),
        }
    }

    fn handle_decl(&mut self, ev: &BytesDecl) -> Result<()> {
        if self.started {
            return Err(Error::MalformedXML(
                "XML Declaration is only allowed at the start of file".to_string(),
            ));
        }
        // `version()` fails only when there is no version.
        let version = match ev.version() {
            Ok(version) => Some(String::from_utf8(version.to_vec())?),
            Err(_) => None,
        };
        let encoding = match ev.encoding() {
            Some(res) => Some(String::from_utf8(res?.to_vec())?),
            None => None,
        };
        self.declaration = Some(ParsedDeclaration { version, encoding });
        Ok(())
    }

    fn handle_bytes_start(&mut self, ev: &BytesStart) -> Result<xmltree::Element> {
        let full_name = String::from_utf8(ev.name().to_vec())?;
        let mut element = xmltree::Element::new(&full_name);
        for attr in ev.attributes() {
            let attr = attr?;
            let key = String::from_utf8(attr.key.to_vec())?;
            let value = String::from_utf8(attr.unescaped_value()?.to_vec())?;
            if element.attributes.contains_key(&key) {
                return Err(Error::MalformedXML(format!(
                    "Duplicate attribute '{}' on <{}>",
                    key, full_name
                )));
            }
            element.attributes.insert(key, value);
        }
        Ok(element)
    }

    fn push_node(&mut self, node: XMLNode) -> Result<()> {
        if let Some(parent) = self.element_stack.last_mut() {
            parent.children.push(node);
            return Ok(());
        }
        match &node {
            XMLNode::Element(elem) => {
                if self.nodes.iter().any(|n| matches!(n, XMLNode::Element(_))) {
                    return Err(Error::MalformedXML(format!(
                        "Multiple root elements, found <{}> after the root",
                        elem.name
                    )));
                }
            }
            XMLNode::Text(_) | XMLNode::CData(_) => {
                return Err(Error::MalformedXML(
                    "Character data outside of the root element".to_string(),
                ));
            }
            XMLNode::Comment(_) | XMLNode::ProcessingInstruction(..) => {}
        }
        self.nodes.push(node);
        Ok(())
    }

    // Returns if document parsing is finished.
    fn handle_event(&mut self, event: Event) -> Result<bool> {
        let is_decl = matches!(event, Event::Decl(_));
        if !self.started && !is_decl && self.opts.require_decl {
            return Err(Error::MalformedXML(
                "Didn't find XML Declaration at the start of file".to_string(),
            ));
        }
        match event {
            Event::Decl(ref ev) => self.handle_decl(ev)?,
            Event::Start(ref ev) => {
                let element = self.handle_bytes_start(ev)?;
                self.element_stack.push(element);
            }
            Event::End(ref ev) => {
                let mut elem = match self.element_stack.pop() {
                    Some(elem) => elem,
                    None => {
                        return Err(Error::MalformedXML(format!(
                            "Closing tag </{}> without an opening tag",
                            String::from_utf8_lossy(ev.name())
                        )))
                    }
                };
                if !self.opts.trim_text {
                    let depth = self.element_stack.len() + 1;
                    strip_layout(&mut elem.children, depth);
                }
                // distinguish <tag></tag> and <tag />
                if self.opts.empty_text_node && elem.children.is_empty() {
                    elem.children.push(XMLNode::Text(String::new()));
                }
                self.push_node(XMLNode::Element(elem))?;
            }
            Event::Empty(ref ev) => {
                let element = self.handle_bytes_start(ev)?;
                self.push_node(XMLNode::Element(element))?;
            }
            Event::Text(ev) => {
                let mut content = String::from_utf8(ev.unescaped()?.to_vec())?;
                if self.opts.trim_text {
                    content = content.trim().to_string();
                }
                let top_level = self.element_stack.is_empty();
                if content.is_empty() || (top_level && content.trim().is_empty()) {
                    return Ok(false);
                }
                self.push_node(XMLNode::Text(content))?;
            }
            // Comment, CData, and PI content is not escaped.
            Event::Comment(ev) => {
                let content = String::from_utf8(ev.escaped().to_vec())?;
                let content = if self.opts.trim_text {
                    content.trim()
                } else {
                    let content = content.strip_prefix(' ').unwrap_or(content.as_str());
                    content.strip_suffix(' ').unwrap_or(content)
                };
                self.push_node(XMLNode::Comment(content.to_string()))?;
            }
            Event::CData(ev) => {
                let content = String::from_utf8(ev.escaped().to_vec())?;
                self.push_node(XMLNode::CData(content))?;
            }
            Event::PI(ev) => {
                let content = String::from_utf8(ev.escaped().to_vec())?;
                let node = match content.find(char::is_whitespace) {
                    Some(pos) => XMLNode::ProcessingInstruction(
                        content[..pos].to_string(),
                        Some(content[pos..].trim_start().to_string()),
                    ),
                    None => XMLNode::ProcessingInstruction(content, None),
                };
                self.push_node(node)?;
            }
            Event::DocType(_) => {
                tracing::warn!("rejecting document type declaration");
                return Err(Error::UnsupportedInput(
                    "Document type declarations are not supported".to_string(),
                ));
            }
            Event::Eof => {
                if let Some(elem) = self.element_stack.last() {
                    return Err(Error::MalformedXML(format!(
                        "Element <{}> is not closed",
                        elem.name
                    )));
                }
                return Ok(true);
            }
        }
        self.started = true;
        Ok(false)
    }

    fn finish(self) -> Result<ParsedDom> {
        if !self.nodes.iter().any(|n| matches!(n, XMLNode::Element(_))) {
            return Err(Error::MalformedXML("No root element".to_string()));
        }
        Ok(ParsedDom {
            declaration: self.declaration,
            nodes: self.nodes,
        })
    }
}
