//! xplist - XML property list parser
//!
//! Parses Apple-style XML plist documents into an order-preserving,
//! dynamically-typed value tree without depending on a platform plist
//! library. Parse-only: there is no serializer and no binary plist support.
//!
//! # Quick Start
//!
//! ```
//! use xplist::from_str;
//! # fn main() -> Result<(), xplist::Error> {
//! let value = from_str(
//!     r#"<plist version="1.0">
//!         <dict>
//!             <key>name</key><string>John</string>
//!             <key>age</key><integer>30</integer>
//!         </dict>
//!     </plist>"#,
//! )?;
//! let name = value
//!     .as_dictionary()
//!     .and_then(|dict| dict.get("name"))
//!     .and_then(|v| v.as_string())
//!     .unwrap_or_default();
//! assert_eq!(name, "John");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod value;
pub use value::{Array, Dictionary, Value};

pub mod xml;
pub use xml::{
    Content as XmlContent, Document as XmlDocument, Element as XmlElement, Parser as XmlParser,
};

pub mod plist;
pub use plist::{from_document, Builder, Config};

/// Parse an XML plist from string
pub fn from_str(s: &str) -> Result<Value> {
    from_bytes(s.as_bytes())
}

/// Parse an XML plist from bytes
pub fn from_bytes(bytes: &[u8]) -> Result<Value> {
    let mut parser = XmlParser::new(bytes);
    let document = parser.parse()?;
    from_document(&document)
}

/// Parse an XML plist with custom builder configuration
pub fn from_str_with_config(s: &str, config: Config) -> Result<Value> {
    let mut parser = XmlParser::new(s.as_bytes());
    let document = parser.parse()?;
    Builder::with_config(config).build(&document)
}
