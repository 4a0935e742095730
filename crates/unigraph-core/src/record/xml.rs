//! XML to nested mapping conversion.
//!
//! Elements become [`Value`]s following the usual dictionary convention:
//! attributes are keyed `@name`, element text is keyed `#text`, and an
//! element name that repeats inside one parent becomes a [`Value::List`].
//! An element with no attributes and no children collapses to plain text.

use std::collections::BTreeMap;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, warn};

use crate::error::{IngestError, IngestResult, MappingError};

/// A parsed XML node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Map(BTreeMap<String, Value>),
    List(Vec<Value>),
}

impl Value {
    /// Look up a key in a mapping. Text and lists have no keys.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Text content: a plain string, or the `#text` of a mapping.
    pub fn text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Map(map) => match map.get("#text") {
                Some(Value::Text(s)) => Some(s),
                _ => None,
            },
            Value::List(_) => None,
        }
    }

    /// View as a sequence. A lone element parses to a single value rather
    /// than a list, so it is treated as a one-element sequence.
    pub fn as_seq(&self) -> &[Value] {
        match self {
            Value::List(items) => items,
            other => std::slice::from_ref(other),
        }
    }
}

struct Frame {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<(String, Value)>,
    text: String,
}

impl Frame {
    fn open(reader: &Reader<&[u8]>, start: &BytesStart<'_>) -> IngestResult<Self> {
        Ok(Self {
            name: local_name(start),
            attributes: read_attributes(reader, start)?,
            children: Vec::new(),
            text: String::new(),
        })
    }

    fn close(self) -> (String, Value) {
        let text = self.text.trim();
        if self.attributes.is_empty() && self.children.is_empty() {
            return (self.name, Value::Text(text.to_string()));
        }

        let mut map = BTreeMap::new();
        for (key, value) in self.attributes {
            map.insert(format!("@{}", key), Value::Text(value));
        }
        for (key, value) in self.children {
            match map.get_mut(&key) {
                Some(Value::List(items)) => items.push(value),
                Some(existing) => {
                    let first = std::mem::replace(existing, Value::List(Vec::new()));
                    *existing = Value::List(vec![first, value]);
                }
                None => {
                    map.insert(key, value);
                }
            }
        }
        if !text.is_empty() {
            map.insert("#text".to_string(), Value::Text(text.to_string()));
        }
        (self.name, Value::Map(map))
    }
}

/// Parse an XML document into a single-key mapping `{root: value}`.
pub fn parse_document(xml: &str) -> IngestResult<Value> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Frame> = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| xml_error(&reader, e))?;
        match event {
            Event::Start(start) => stack.push(Frame::open(&reader, &start)?),
            Event::Empty(start) => {
                let frame = Frame::open(&reader, &start)?;
                if let Some(done) = attach(&mut stack, frame.close()) {
                    return Ok(done);
                }
            }
            Event::Text(text) => {
                if let Some(top) = stack.last_mut() {
                    let unescaped = text.unescape().map_err(|e| xml_error(&reader, e))?;
                    top.text.push_str(&unescaped);
                }
            }
            Event::CData(data) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(_) => {
                let frame = stack.pop().ok_or_else(|| IngestError::Xml {
                    position: reader.buffer_position() as u64,
                    message: "closing tag without matching opening tag".to_string(),
                })?;
                if let Some(done) = attach(&mut stack, frame.close()) {
                    return Ok(done);
                }
            }
            Event::Eof => {
                return Err(IngestError::Xml {
                    position: reader.buffer_position() as u64,
                    message: if stack.is_empty() {
                        "document has no root element".to_string()
                    } else {
                        "unexpected end of document".to_string()
                    },
                });
            }
            _ => {}
        }
    }
}

/// Read a UniProt XML file and select its `uniprot.entry` mapping.
pub fn load_entry(path: &Path) -> IngestResult<Value> {
    let bytes = std::fs::read(path)?;
    let xml = String::from_utf8(bytes).map_err(|e| IngestError::Xml {
        position: e.utf8_error().valid_up_to() as u64,
        message: "document is not valid UTF-8".to_string(),
    })?;
    debug!(path = %path.display(), bytes = xml.len(), "Read input document");

    let document = parse_document(&xml)?;
    select_entry(document)
}

/// Select the single entry from a parsed `uniprot` document.
pub fn select_entry(document: Value) -> IngestResult<Value> {
    let entry = match document {
        Value::Map(mut root) => root
            .remove("uniprot")
            .and_then(|uniprot| match uniprot {
                Value::Map(mut map) => map.remove("entry"),
                _ => None,
            }),
        _ => None,
    };

    match entry {
        Some(Value::List(entries)) => {
            warn!(count = entries.len(), "Document holds several entries; only the first is mapped");
            entries
                .into_iter()
                .next()
                .ok_or_else(|| MappingError::missing("uniprot.entry").into())
        }
        Some(entry) => Ok(entry),
        None => Err(MappingError::missing("uniprot.entry").into()),
    }
}

/// Attach a closed element to its parent; returns the document once the
/// root element closes.
fn attach(stack: &mut [Frame], closed: (String, Value)) -> Option<Value> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(closed);
            None
        }
        None => {
            let (name, value) = closed;
            let mut root = BTreeMap::new();
            root.insert(name, value);
            Some(Value::Map(root))
        }
    }
}

fn local_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).to_string()
}

fn read_attributes(
    reader: &Reader<&[u8]>,
    start: &BytesStart<'_>,
) -> IngestResult<Vec<(String, String)>> {
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| xml_error(reader, e))?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).to_string();
        let value = attr.unescape_value().map_err(|e| xml_error(reader, e))?;
        attributes.push((key, value.into_owned()));
    }
    Ok(attributes)
}

fn xml_error(reader: &Reader<&[u8]>, err: impl std::fmt::Display) -> IngestError {
    IngestError::Xml {
        position: reader.buffer_position() as u64,
        message: err.to_string(),
    }
}
