//! XML data model
//!
//! The tree the plist builder walks. Every child node carries its kind so the
//! builder can filter text, CDATA and comment runs during structural iteration.

use indexmap::IndexMap;

/// XML document
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub root: Element,
}

/// XML element
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Content>,
}

impl Element {
    /// Iterate over child elements only, skipping text, CDATA and comment runs.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Content::Element(element) => Some(element),
            _ => None,
        })
    }
}

/// XML content node
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    Element(Element),
    /// Character data with entities decoded
    Text(String),
    /// Literal `<![CDATA[ ... ]]>` run, no entity decoding
    CData(String),
    /// Inert `<!-- ... -->` run
    Comment(String),
}
