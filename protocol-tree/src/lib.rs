//! Reads an XML document into an untyped element tree.
//!
//! The tree carries no knowledge of the protocol vocabulary. Interpreting tags and
//! attributes is left to the caller.


use {
    quick_xml::{
        Reader,
        escape::resolve_predefined_entity,
        events::{
            BytesRef, BytesStart, Event,
            attributes::{AttrError, Attribute},
        },
    },
    std::{borrow::Cow, str::Utf8Error, string::FromUtf8Error},
    thiserror::Error,
};

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Could not read the next event")]
    ReadEvent(#[source] quick_xml::Error),
    #[error("Could not parse an attribute of element {0}")]
    Attribute(String, #[source] AttributeError),
    #[error("Could not decode an element name as UTF-8")]
    ElementName(#[source] Utf8Error),
    #[error("Could not decode the body of element {0} as UTF-8")]
    DecodeUtf8(String, #[source] FromUtf8Error),
    #[error("The document does not contain a root element")]
    MissingRoot,
    #[error("Element {0} is not closed")]
    Unclosed(String),
    #[error("Unknown or invalid reference &{0};")]
    Entity(String),
}

#[derive(Debug, Error)]
pub enum AttributeError {
    #[error("quick_xml returned an error")]
    QuickXml(#[from] AttrError),
    #[error("Could not decode the attribute name as UTF-8")]
    Name(#[source] Utf8Error),
    #[error("Could not decode the value as UTF-8")]
    DecodeUtf8(#[source] quick_xml::Error),
}

/// One element of the document.
///
/// `text` is the concatenation of all character data directly inside the element,
/// with entity references resolved and whitespace preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }
}

/// Parses `input` and returns its root element.
///
/// Content before and after the root element (declarations, comments, processing
/// instructions) is skipped.
pub fn parse(input: &[u8]) -> Result<Element, TreeError> {
    let mut reader = Reader::from_reader(input);
    let (start, empty) = loop {
        match reader.read_event().map_err(TreeError::ReadEvent)? {
            Event::Start(s) => break (s, false),
            Event::Empty(s) => break (s, true),
            Event::Eof => return Err(TreeError::MissingRoot),
            _ => continue,
        }
    };
    parse_element(&mut reader, &start, empty)
}

fn parse_attr<'a>(attr: &'a Attribute) -> Result<(&'a str, Cow<'a, str>), AttributeError> {
    let name = std::str::from_utf8(attr.key.local_name().into_inner()).map_err(AttributeError::Name)?;
    let value = attr.unescape_value().map_err(AttributeError::DecodeUtf8)?;
    Ok((name, value))
}

fn parse_element(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart,
    empty: bool,
) -> Result<Element, TreeError> {
    let name = std::str::from_utf8(start.local_name().into_inner())
        .map_err(TreeError::ElementName)?
        .to_owned();
    let mut attributes = vec![];
    for attr in start.attributes() {
        let res = attr
            .map_err(AttributeError::QuickXml)
            .and_then(|attr| parse_attr(&attr).map(|(n, v)| (n.to_owned(), v.into_owned())));
        match res {
            Ok(a) => attributes.push(a),
            Err(e) => return Err(TreeError::Attribute(name, e)),
        }
    }
    let mut children = vec![];
    let mut body = Vec::new();
    if !empty {
        loop {
            let event = reader.read_event().map_err(TreeError::ReadEvent)?;
            match event {
                Event::Start(s) => children.push(parse_element(reader, &s, false)?),
                Event::Empty(s) => children.push(parse_element(reader, &s, true)?),
                Event::Text(s) => body.extend_from_slice(s.as_ref()),
                Event::CData(s) => body.extend_from_slice(&s),
                Event::GeneralRef(r) => resolve_reference(&r, &mut body)?,
                Event::End(_) => break,
                Event::Eof => return Err(TreeError::Unclosed(name)),
                _ => continue,
            }
        }
    }
    let text = match String::from_utf8(body) {
        Ok(t) => t,
        Err(e) => return Err(TreeError::DecodeUtf8(name, e)),
    };
    Ok(Element {
        name,
        attributes,
        children,
        text,
    })
}

fn resolve_reference(r: &BytesRef<'_>, body: &mut Vec<u8>) -> Result<(), TreeError> {
    let invalid = || TreeError::Entity(String::from_utf8_lossy(r).into_owned());
    if let Some(c) = r.resolve_char_ref().map_err(|_| invalid())? {
        let mut buf = [0; 4];
        body.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        return Ok(());
    }
    let name = std::str::from_utf8(r).map_err(|_| invalid())?;
    let value = resolve_predefined_entity(name).ok_or_else(invalid)?;
    body.extend_from_slice(value.as_bytes());
    Ok(())
}
