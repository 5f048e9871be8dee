//! The `Format` trait
//!
//! A format converts between [`StyledText`] and one string representation.
//! Every format here reads and writes UTF-8 text, so output is always a
//! `String`.

use crate::error::FormatError;
use crate::styled::StyledText;
use std::collections::HashMap;

/// Which directions a format converts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub parse: bool,
    pub serialize: bool,
}

impl Capabilities {
    pub const BOTH: Capabilities = Capabilities {
        parse: true,
        serialize: true,
    };
    pub const PARSE_ONLY: Capabilities = Capabilities {
        parse: true,
        serialize: false,
    };
    pub const SERIALIZE_ONLY: Capabilities = Capabilities {
        parse: false,
        serialize: true,
    };
}

/// A named conversion between styled text and source text
///
/// # Examples
///
/// ```ignore
/// struct PlainFormat;
///
/// impl Format for PlainFormat {
///     fn name(&self) -> &str {
///         "plain"
///     }
///
///     fn capabilities(&self) -> Capabilities {
///         Capabilities::PARSE_ONLY
///     }
///
///     fn parse(&self, source: &str) -> Result<StyledText, FormatError> {
///         Ok(StyledText::plain(source))
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// Registry key, e.g. "markdown"
    fn name(&self) -> &str;

    fn capabilities(&self) -> Capabilities;

    fn description(&self) -> &str {
        ""
    }

    /// Extensions without the leading dot, used to guess a format from a path
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Keys accepted by [`Format::serialize_with_options`]
    fn option_names(&self) -> &[&str] {
        &[]
    }

    fn parse(&self, _source: &str) -> Result<StyledText, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' cannot read input",
            self.name()
        )))
    }

    fn serialize(&self, _text: &StyledText) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' cannot write output",
            self.name()
        )))
    }

    /// Serialize with per-call overrides of the format's own options.
    ///
    /// Formats without options only accept an empty map.
    fn serialize_with_options(
        &self,
        text: &StyledText,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        match options.keys().next() {
            None => self.serialize(text),
            Some(key) => Err(unknown_option(self.name(), key)),
        }
    }
}

pub(crate) fn unknown_option(format: &str, key: &str) -> FormatError {
    FormatError::NotSupported(format!("Format '{format}' has no option '{key}'"))
}
