//! Error types for xplist

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.offset, self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Lexical or well-formedness failure in the XML layer
    InvalidToken,
    /// Document root element is not named `plist`
    UnexpectedRoot { found: String },
    /// Even-position child of a `<dict>` is not a `<key>` element
    MissingKey,
    /// Odd-position child of a `<dict>` is itself a `<key>` element
    UnexpectedKey { key: String },
    /// A `<dict>` ends on a key with no value element following it
    MissingValue { key: String },
    MaxDepthExceeded { max: u16 },
    EmptyInteger,
    EmptyReal,
    EmptyDate,
    InvalidInteger { text: String },
    InvalidReal { text: String },
    InvalidDate { text: String },
    InvalidBase64,
}

impl ErrorKind {
    /// True for violations of the Plist structural grammar
    /// (root naming, dict key/value alternation, nesting limits).
    pub const fn is_structure(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedRoot { .. }
                | Self::MissingKey
                | Self::UnexpectedKey { .. }
                | Self::MissingValue { .. }
                | Self::MaxDepthExceeded { .. }
        )
    }

    /// True when a leaf element's text cannot be read as its declared type.
    pub const fn is_value(&self) -> bool {
        matches!(
            self,
            Self::EmptyInteger
                | Self::EmptyReal
                | Self::EmptyDate
                | Self::InvalidInteger { .. }
                | Self::InvalidReal { .. }
                | Self::InvalidDate { .. }
                | Self::InvalidBase64
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken => write!(f, "invalid token"),
            Self::UnexpectedRoot { found } => write!(
                f,
                "malformed document: expected root element named plist, found {found}"
            ),
            Self::MissingKey => write!(f, "missing key"),
            Self::UnexpectedKey { key } => write!(f, "unexpected key: {key}"),
            Self::MissingValue { key } => write!(f, "missing value for {key}"),
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::EmptyInteger => write!(f, "empty integer"),
            Self::EmptyReal => write!(f, "empty real"),
            Self::EmptyDate => write!(f, "empty date"),
            Self::InvalidInteger { text } => write!(f, "invalid integer: {text}"),
            Self::InvalidReal { text } => write!(f, "invalid real: {text}"),
            Self::InvalidDate { text } => write!(f, "invalid date: {text}"),
            Self::InvalidBase64 => write!(f, "invalid base64 data"),
        }
    }
}

/// Main error type for xplist
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, offset: usize, line: u32, col: u32) -> Self {
        let pos = Pos::new(offset, line, col);
        Self::new(kind, Span::new(pos, pos))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error at {}: {}", self.span.start, self.message)
    }
}

/// Result type alias for xplist
pub type Result<T> = std::result::Result<T, Error>;
