//! Error types for styled text and format operations

use std::fmt;

/// Category of a styled text contract violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextErrorKind {
    /// The range start is after its end.
    InvalidRange,
    /// The range extends past the end of the text.
    InvalidBounds,
    /// One of the range ends splits a UTF-8 character.
    NotOnCharBoundary,
}

/// Raised when a caller hands the styled text buffer a range it cannot honor.
///
/// Ranges are never clamped. An out-of-bounds or misaligned range is a
/// programmer error and surfaces here together with the offending offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextError {
    kind: TextErrorKind,
    start: usize,
    end: usize,
    len: usize,
}

impl TextError {
    pub(crate) fn new(kind: TextErrorKind, start: usize, end: usize, len: usize) -> Self {
        Self {
            kind,
            start,
            end,
            len,
        }
    }

    pub fn kind(&self) -> TextErrorKind {
        self.kind
    }

    /// Start byte offset of the rejected range.
    pub fn start(&self) -> usize {
        self.start
    }

    /// End byte offset (exclusive) of the rejected range.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Length of the text, in bytes, when the error was raised.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.len
    }
}

impl fmt::Display for TextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (start, end, len) = (self.start, self.end, self.len);
        match self.kind {
            TextErrorKind::InvalidRange => {
                write!(f, "Invalid range {start}..{end}: start is after end")
            }
            TextErrorKind::InvalidBounds => {
                write!(f, "Range {start}..{end} is out of bounds for text of length {len}")
            }
            TextErrorKind::NotOnCharBoundary => {
                write!(f, "Range {start}..{end} does not fall on character boundaries")
            }
        }
    }
}

impl std::error::Error for TextError {}

/// Errors that can occur during format operations
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Format not found in registry
    FormatNotFound(String),
    /// Error during parsing
    ParseError(String),
    /// Error during serialization
    SerializationError(String),
    /// Format does not support the requested operation
    NotSupported(String),
    /// Input could not be decoded as text
    InvalidInput(String),
    /// A rule handed the buffer an invalid range
    Text(TextError),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatNotFound(name) => write!(f, "Format '{name}' not found"),
            FormatError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            FormatError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            FormatError::NotSupported(msg) => write!(f, "Operation not supported: {msg}"),
            FormatError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            FormatError::Text(err) => write!(f, "Styled text error: {err}"),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormatError::Text(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TextError> for FormatError {
    fn from(err: TextError) -> Self {
        FormatError::Text(err)
    }
}
