//! Plist tree builder
//!
//! Walks a parsed XML document tree and produces a [`Value`] tree, enforcing
//! the plist structural rules: the root element must be named `plist`, and
//! `<dict>` children must strictly alternate `<key>` and value elements.
//! Text, CDATA and comment runs are filtered out of every structural
//! iteration before any per-element logic runs.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::{Error, ErrorKind, Result, Span};
use crate::value::{Dictionary, Value};
use crate::xml::model::{Content, Document, Element};

/// Configuration for the plist builder
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum nesting depth (0 means unlimited)
    pub max_depth: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}

impl Config {
    /// Create a new config with unlimited depth
    pub const fn unlimited() -> Self {
        Self { max_depth: 0 }
    }

    /// Create a new config with a specific depth limit
    pub const fn new(max_depth: u16) -> Self {
        Self { max_depth }
    }
}

/// Recursive builder from an XML document tree to a plist value tree
#[derive(Clone, Copy, Debug, Default)]
pub struct Builder {
    config: Config,
}

impl Builder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new builder with custom configuration
    pub const fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Build the plist value tree for a whole document.
    ///
    /// The root element must be named `plist`. Building it always yields a
    /// list of top-level values; the conventional single-value document is
    /// unwrapped to its sole element, any other length is returned as the
    /// list unmodified.
    pub fn build(&self, document: &Document) -> Result<Value> {
        if document.root.name != "plist" {
            return Err(Error::new(
                ErrorKind::UnexpectedRoot {
                    found: document.root.name.clone(),
                },
                Span::empty(),
            ));
        }

        let mut values = self.build_sequence(&document.root, 0)?;
        if values.len() == 1 {
            if let Some(sole) = values.pop() {
                return Ok(sole);
            }
        }
        Ok(Value::Array(values.into()))
    }

    /// Build one element, dispatching on its name. Unrecognized names and
    /// value-less nodes yield `None`, which enclosing containers drop.
    fn build_element(&self, element: &Element, depth: u16) -> Result<Option<Value>> {
        if self.config.max_depth != 0 && depth >= self.config.max_depth {
            return Err(Error::new(
                ErrorKind::MaxDepthExceeded {
                    max: self.config.max_depth,
                },
                Span::empty(),
            ));
        }

        match element.name.as_str() {
            "plist" | "array" => {
                let values = self.build_sequence(element, depth)?;
                Ok(Some(Value::Array(values.into())))
            }
            "dict" => self.build_dict(element, depth).map(Some),
            "key" | "string" => Ok(Some(Value::String(character_content(element)))),
            "integer" => build_integer(element).map(Some),
            "real" => build_real(element).map(Some),
            "data" => build_data(element).map(Some),
            "date" => build_date(element).map(Some),
            "true" => Ok(Some(Value::Boolean(true))),
            "false" => Ok(Some(Value::Boolean(false))),
            _ => Ok(None),
        }
    }

    /// Build every child element in document order, dropping the ones that
    /// produce no value. Serves both `<array>` and the `<plist>` root.
    fn build_sequence(&self, element: &Element, depth: u16) -> Result<Vec<Value>> {
        let mut values = Vec::new();
        for child in element.child_elements() {
            if let Some(value) = self.build_element(child, depth + 1)? {
                values.push(value);
            }
        }
        Ok(values)
    }

    /// Pair a `<dict>`'s child elements two at a time: key element, then
    /// value element. A duplicate key silently overwrites the earlier entry.
    fn build_dict(&self, element: &Element, depth: u16) -> Result<Value> {
        let mut dict = Dictionary::new();
        let mut pending_key: Option<String> = None;

        for child in element.child_elements() {
            match pending_key.take() {
                None => {
                    if child.name != "key" {
                        return Err(Error::new(ErrorKind::MissingKey, Span::empty()));
                    }
                    pending_key = Some(character_content(child));
                }
                Some(key) => {
                    if child.name == "key" {
                        return Err(Error::new(
                            ErrorKind::UnexpectedKey {
                                key: character_content(child),
                            },
                            Span::empty(),
                        ));
                    }
                    if let Some(value) = self.build_element(child, depth + 1)? {
                        dict.insert(key, value);
                    }
                }
            }
        }

        if let Some(key) = pending_key {
            return Err(Error::new(ErrorKind::MissingValue { key }, Span::empty()));
        }

        Ok(Value::Dictionary(dict))
    }
}

/// Build the plist value tree for a document with the default configuration.
pub fn from_document(document: &Document) -> Result<Value> {
    Builder::new().build(document)
}

/// Concatenated text and CDATA runs, in document order. Comments and nested
/// elements contribute nothing.
fn character_content(element: &Element) -> String {
    let mut content = String::new();
    for child in &element.children {
        match child {
            Content::Text(text) | Content::CData(text) => content.push_str(text),
            _ => {}
        }
    }
    content
}

/// Concatenated text runs only. CDATA is excluded: `<real>` and `<data>`
/// historically read character data alone, unlike `<string>`.
fn text_runs(element: &Element) -> String {
    let mut content = String::new();
    for child in &element.children {
        if let Content::Text(text) = child {
            content.push_str(text);
        }
    }
    content
}

/// Text of the first text-bearing child, for the single-run leaf kinds.
fn first_text(element: &Element) -> Option<&str> {
    element.children.iter().find_map(|child| match child {
        Content::Text(text) | Content::CData(text) => Some(text.as_str()),
        _ => None,
    })
}

fn build_integer(element: &Element) -> Result<Value> {
    if element.children.is_empty() {
        return Err(Error::new(ErrorKind::EmptyInteger, Span::empty()));
    }
    let text = first_text(element).unwrap_or_default().trim().to_string();
    text.parse::<i64>().map(Value::Integer).map_err(|_| {
        Error::new(ErrorKind::InvalidInteger { text }, Span::empty())
    })
}

fn build_real(element: &Element) -> Result<Value> {
    if element.children.is_empty() {
        return Err(Error::new(ErrorKind::EmptyReal, Span::empty()));
    }
    let text = text_runs(element).trim().to_string();
    text.parse::<f64>().map(Value::Real).map_err(|_| {
        Error::new(ErrorKind::InvalidReal { text }, Span::empty())
    })
}

fn build_data(element: &Element) -> Result<Value> {
    let encoded: String = text_runs(element)
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .collect();
    BASE64_STANDARD
        .decode(encoded)
        .map(Value::Data)
        .map_err(|_| Error::new(ErrorKind::InvalidBase64, Span::empty()))
}

fn build_date(element: &Element) -> Result<Value> {
    if element.children.is_empty() {
        return Err(Error::new(ErrorKind::EmptyDate, Span::empty()));
    }
    let text = first_text(element).unwrap_or_default().trim().to_string();
    OffsetDateTime::parse(&text, &Rfc3339)
        .map(Value::Date)
        .map_err(|_| Error::new(ErrorKind::InvalidDate { text }, Span::empty()))
}
