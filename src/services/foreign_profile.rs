//! Reader for third-party connection-profile documents.
//!
//! These documents are flat key/value lists where a `<key>` element names a
//! field and the element right after it carries the value:
//!
//! ```xml
//! <dict>
//!     <key>Hostname</key><string>dav.example.com</string>
//!     <key>Protocol</key><string>davs</string>
//! </dict>
//! ```
//!
//! The document is first parsed into a generic element tree; the key lookup
//! then runs over that tree instead of over the raw event stream.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::collections::HashMap;
use tracing::debug;

const KEY_ELEMENT: &str = "key";

/// Field names understood by the importer.
pub const RECOGNIZED_KEYS: [&str; 5] = ["Protocol", "Hostname", "Port", "Username", "Path"];

/// Values read from a foreign document; absent keys are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForeignFields {
    pub protocol: Option<String>,
    pub hostname: Option<String>,
    pub port: Option<String>,
    pub username: Option<String>,
    pub path: Option<String>,
}

impl ForeignFields {
    fn set(&mut self, key: &str, value: String) {
        match key {
            "Protocol" => self.protocol = Some(value),
            "Hostname" => self.hostname = Some(value),
            "Port" => self.port = Some(value),
            "Username" => self.username = Some(value),
            "Path" => self.path = Some(value),
            _ => {}
        }
    }
}

#[derive(Debug, Default)]
struct XmlElement {
    name: String,
    text: String,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// Concatenated text of this element and all of its descendants.
    fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.children {
            child.collect_text(out);
        }
    }
}

/// Parses `document` and extracts the recognized fields.
///
/// Returns `None` when the input is not well-formed markup.
pub fn parse_foreign_profile(document: &str) -> Option<ForeignFields> {
    let root = match parse_tree(document) {
        Ok(root) => root,
        Err(reason) => {
            debug!("Foreign profile rejected: {}", reason);
            return None;
        }
    };

    let values = index_key_values(&root);
    let mut fields = ForeignFields::default();
    for key in RECOGNIZED_KEYS {
        if let Some(value) = values.get(key) {
            fields.set(key, value.clone());
        }
    }
    Some(fields)
}

/// Maps each key name to the text of the sibling following its first `<key>`
/// occurrence in document order. A key with no following sibling maps to
/// nothing, and later duplicates of that name are not consulted.
fn index_key_values(root: &XmlElement) -> HashMap<String, String> {
    // Pass 1: every <key> element paired with its next sibling, in document order
    let mut pairs: Vec<(String, Option<&XmlElement>)> = Vec::new();
    collect_key_pairs(root, &mut pairs);

    // Pass 2: first occurrence of each name decides
    let mut seen: HashMap<String, Option<&XmlElement>> = HashMap::new();
    for (name, sibling) in pairs {
        seen.entry(name).or_insert(sibling);
    }

    seen.into_iter()
        .filter_map(|(name, sibling)| sibling.map(|element| (name, element.text_content())))
        .collect()
}

fn collect_key_pairs<'a>(element: &'a XmlElement, pairs: &mut Vec<(String, Option<&'a XmlElement>)>) {
    for (index, child) in element.children.iter().enumerate() {
        if child.name == KEY_ELEMENT {
            pairs.push((child.text_content(), element.children.get(index + 1)));
        }
        collect_key_pairs(child, pairs);
    }
}

fn local_name(e: &BytesStart) -> Result<String, String> {
    let qname = e.name();
    std::str::from_utf8(qname.local_name().as_ref())
        .map(|name| name.to_string())
        .map_err(|e| format!("invalid UTF-8 in element name: {}", e))
}

fn parse_tree(document: &str) -> Result<XmlElement, String> {
    let mut reader = Reader::from_str(document);
    let config = reader.config_mut();
    config.check_end_names = true;
    config.expand_empty_elements = false;

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if root.is_some() {
                    return Err("more than one root element".to_string());
                }
                stack.push(XmlElement {
                    name: local_name(&e)?,
                    ..Default::default()
                });
            }
            Ok(Event::Empty(e)) => {
                if root.is_some() {
                    return Err("more than one root element".to_string());
                }
                let element = XmlElement {
                    name: local_name(&e)?,
                    ..Default::default()
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Ok(Event::End(_)) => {
                let element = stack.pop().ok_or("unexpected closing tag")?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|e| e.to_string())?;
                match stack.last_mut() {
                    Some(current) => current.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => return Err("text outside of the root element".to_string()),
                }
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                match stack.last_mut() {
                    Some(current) => current.text.push_str(&text),
                    None => return Err("CDATA outside of the root element".to_string()),
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(format!("XML parsing error: {}", e)),
        }
    }

    if !stack.is_empty() {
        return Err("unclosed element at end of document".to_string());
    }
    root.ok_or_else(|| "document has no root element".to_string())
}
