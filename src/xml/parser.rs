//! XML parser implementation
//!
//! Tolerant, non-validating parser sufficient for XML property lists: it skips
//! the declaration, processing instructions and the DOCTYPE, and preserves
//! text, CDATA and comment runs as distinct node kinds.

use indexmap::IndexMap;

use crate::error::{Error, ErrorKind, Pos, Result, Span};
use crate::xml::cursor::Cursor;
use crate::xml::model::{Content, Document, Element};

/// XML parser
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Parser<'a> {
    /// Create a new XML parser
    pub const fn new(input: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(input),
        }
    }

    /// Parse an XML document
    pub fn parse(&mut self) -> Result<Document> {
        self.skip_prolog()?;

        self.expect_byte(b'<')?;
        let root = self.parse_element()?;

        // trailing comments and whitespace after the root are allowed
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.is_eof() {
                break;
            }
            if self.cursor.peek_bytes(4) == Some(b"<!--") {
                self.cursor.advance_by(4);
                self.read_until(b"-->")?;
                continue;
            }
            return Err(self.error_here("unexpected content after root element"));
        }

        Ok(Document { root })
    }

    /// Skip the XML declaration, processing instructions, DOCTYPE and comments
    /// before the root element.
    fn skip_prolog(&mut self) -> Result<()> {
        loop {
            self.cursor.skip_whitespace();
            match (self.cursor.current(), self.cursor.peek(1)) {
                (Some(b'<'), Some(b'?')) => {
                    self.cursor.advance_by(2);
                    self.read_until(b"?>")?;
                }
                (Some(b'<'), Some(b'!')) => {
                    if self.cursor.peek_bytes(4) == Some(b"<!--") {
                        self.cursor.advance_by(4);
                        self.read_until(b"-->")?;
                    } else {
                        // DOCTYPE or other declaration
                        self.cursor.advance_by(2);
                        self.read_until(b">")?;
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Parse one element; the cursor sits just past the opening `<`.
    fn parse_element(&mut self) -> Result<Element> {
        if self.cursor.current() == Some(b'/') {
            return Err(self.error_here("unexpected closing tag"));
        }

        let name = self.parse_name()?;
        let attributes = self.parse_attributes()?;

        if self.cursor.current() == Some(b'/') {
            self.cursor.advance();
            self.expect_byte(b'>')?;
            return Ok(Element {
                name,
                attributes,
                children: Vec::new(),
            });
        }

        self.expect_byte(b'>')?;

        let mut children = Vec::new();
        loop {
            if self.cursor.is_eof() {
                return Err(self.error_here("unterminated element"));
            }

            if self.cursor.current() == Some(b'<') {
                if self.cursor.peek(1) == Some(b'/') {
                    self.cursor.advance_by(2);
                    let close_name = self.parse_name()?;
                    if close_name != name {
                        return Err(self.error_here("mismatched closing tag"));
                    }
                    self.cursor.skip_whitespace();
                    self.expect_byte(b'>')?;
                    break;
                }

                if self.cursor.peek_bytes(4) == Some(b"<!--") {
                    self.cursor.advance_by(4);
                    let text = self.read_until(b"-->")?;
                    children.push(Content::Comment(text));
                    continue;
                }

                if self.cursor.peek_bytes(9) == Some(b"<![CDATA[") {
                    self.cursor.advance_by(9);
                    let text = self.read_until(b"]]>")?;
                    children.push(Content::CData(text));
                    continue;
                }

                if self.cursor.peek(1) == Some(b'?') {
                    self.cursor.advance_by(2);
                    self.read_until(b"?>")?;
                    continue;
                }

                self.cursor.advance();
                let child = self.parse_element()?;
                children.push(Content::Element(child));
                continue;
            }

            if let Some(text) = self.parse_text()? {
                children.push(Content::Text(text));
            }
        }

        Ok(Element {
            name,
            attributes,
            children,
        })
    }

    fn parse_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attrs = IndexMap::new();

        loop {
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/') | Some(b'>') => break,
                Some(_) => {}
                None => return Err(self.error_here("unexpected end of input")),
            }

            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.contains_key(&name) {
                return Err(self.error_here("duplicate attribute"));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(b'"') => b'"',
            Some(b'\'') => b'\'',
            _ => return Err(self.error_here("expected quoted attribute value")),
        };
        self.cursor.advance();

        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                let text = bytes_to_string(raw)?;
                return decode_entities(&text);
            }
            self.cursor.advance();
        }

        Err(self.error_here("unterminated attribute value"))
    }

    /// Read a character-data run up to the next `<`. Runs that are pure
    /// inter-markup whitespace are dropped so indentation never reaches the
    /// tree.
    fn parse_text(&mut self) -> Result<Option<String>> {
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.cursor.slice_from(start);
        let text = bytes_to_string(raw)?;
        let text = decode_entities(&text)?;

        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }

    fn parse_name(&mut self) -> Result<String> {
        let start_pos = self.cursor.position();
        let start = self.cursor.pos();

        let Some(first) = self.cursor.current() else {
            return Err(self.error_here("expected name"));
        };
        if !is_name_start(first) {
            return Err(Error::at(
                ErrorKind::InvalidToken,
                start_pos.offset,
                start_pos.line,
                start_pos.col,
            ));
        }

        self.cursor.advance();
        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        let raw = self.cursor.slice_from(start);
        bytes_to_string(raw)
    }

    /// Consume up to and including `pattern`, returning the text before it.
    fn read_until(&mut self, pattern: &[u8]) -> Result<String> {
        let start = self.cursor.pos();
        while self.cursor.current().is_some() {
            if self.cursor.peek_bytes(pattern.len()) == Some(pattern) {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance_by(pattern.len());
                return bytes_to_string(raw);
            }
            self.cursor.advance();
        }
        Err(self.error_here("unterminated markup"))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.current() == Some(expected) {
            self.cursor.advance();
            Ok(())
        } else {
            Err(self.error_here("unexpected token"))
        }
    }

    fn error_here(&self, message: &str) -> Error {
        let pos = self.cursor.position();
        Error::with_message(
            ErrorKind::InvalidToken,
            Span::new(Pos::new(pos.offset, pos.line, pos.col), pos),
            message.to_string(),
        )
    }
}

fn bytes_to_string(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(|s| s.to_string())
        .map_err(|_| {
            Error::with_message(
                ErrorKind::InvalidToken,
                Span::empty(),
                "invalid utf-8".to_string(),
            )
        })
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':')
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

fn decode_entities(input: &str) -> Result<String> {
    let mut result = String::new();
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '&' {
            result.push(ch);
            continue;
        }

        let mut entity = String::new();
        for next in chars.by_ref() {
            if next == ';' {
                break;
            }
            entity.push(next);
        }

        let decoded = match entity.as_str() {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric_entity(&entity),
        };

        match decoded {
            Some(ch) => result.push(ch),
            None => {
                return Err(Error::with_message(
                    ErrorKind::InvalidToken,
                    Span::empty(),
                    "invalid xml entity".to_string(),
                ));
            }
        }
    }

    Ok(result)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Document> {
        Parser::new(input.as_bytes()).parse()
    }

    #[test]
    fn test_parse_simple_element() -> Result<()> {
        let doc = parse("<plist></plist>")?;
        assert_eq!(doc.root.name, "plist");
        assert!(doc.root.children.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_with_attributes() -> Result<()> {
        let doc = parse(r#"<plist version="1.0"></plist>"#)?;
        assert_eq!(doc.root.attributes.get("version"), Some(&"1.0".to_string()));
        Ok(())
    }

    #[test]
    fn test_parse_nested() -> Result<()> {
        let doc = parse("<plist><string>text</string></plist>")?;
        match doc.root.children.first() {
            Some(Content::Element(child)) => {
                assert_eq!(child.name, "string");
                assert_eq!(
                    child.children.first(),
                    Some(&Content::Text("text".to_string()))
                );
            }
            other => panic!("expected child element, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_parse_self_closing() -> Result<()> {
        let doc = parse("<plist><true /></plist>")?;
        match doc.root.children.first() {
            Some(Content::Element(child)) => {
                assert_eq!(child.name, "true");
                assert!(child.children.is_empty());
            }
            other => panic!("expected child element, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_parse_prolog_and_doctype() -> Result<()> {
        let input = concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" ",
            "\"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n",
            "<plist version=\"1.0\"><string>ok</string></plist>\n"
        );
        let doc = parse(input)?;
        assert_eq!(doc.root.name, "plist");
        assert_eq!(doc.root.children.len(), 1);
        Ok(())
    }

    #[test]
    fn test_parse_cdata() -> Result<()> {
        let doc = parse("<plist><string><![CDATA[a < b]]></string></plist>")?;
        let Some(Content::Element(string)) = doc.root.children.first() else {
            panic!("expected string element");
        };
        assert_eq!(
            string.children.first(),
            Some(&Content::CData("a < b".to_string()))
        );
        Ok(())
    }

    #[test]
    fn test_parse_comment_preserved() -> Result<()> {
        let doc = parse("<plist><!-- note --><string>x</string></plist>")?;
        assert_eq!(
            doc.root.children.first(),
            Some(&Content::Comment(" note ".to_string()))
        );
        assert_eq!(doc.root.child_elements().count(), 1);
        Ok(())
    }

    #[test]
    fn test_parse_entities() -> Result<()> {
        let doc = parse("<plist><string>a &amp; b &#x41;</string></plist>")?;
        let Some(Content::Element(string)) = doc.root.children.first() else {
            panic!("expected string element");
        };
        assert_eq!(
            string.children.first(),
            Some(&Content::Text("a & b A".to_string()))
        );
        Ok(())
    }

    #[test]
    fn test_whitespace_runs_dropped() -> Result<()> {
        let doc = parse("<plist>\n  <array>\n  </array>\n</plist>")?;
        assert_eq!(doc.root.children.len(), 1);
        let Some(Content::Element(array)) = doc.root.children.first() else {
            panic!("expected array element");
        };
        assert!(array.children.is_empty());
        Ok(())
    }

    #[test]
    fn test_mismatched_closing_tag() {
        assert!(parse("<plist><dict></array></plist>").is_err());
    }

    #[test]
    fn test_unterminated_element() {
        assert!(parse("<plist><string>").is_err());
    }

    #[test]
    fn test_duplicate_attribute() {
        assert!(parse(r#"<plist version="1.0" version="1.0"></plist>"#).is_err());
    }

    #[test]
    fn test_content_after_root() {
        assert!(parse("<plist></plist><plist></plist>").is_err());
        assert!(parse("<plist></plist><!-- tail -->").is_ok());
    }
}
