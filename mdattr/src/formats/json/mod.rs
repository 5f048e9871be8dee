//! JSON format implementation
//!
//! A lossless dump of [`StyledText`]: the string plus every run with its byte
//! range and attributes.
//!
//! ```json
//! {
//!   "text": "a b",
//!   "runs": [
//!     { "start": 0, "end": 1, "attributes": { "font": { "face": "bold", "size": 12.0 } } },
//!     { "start": 1, "end": 3, "attributes": {} }
//!   ]
//! }
//! ```
//!
//! `serialize_with_options` accepts `pretty` (`true` / `false`).

use crate::error::FormatError;
use crate::format::{unknown_option, Capabilities, Format};
use crate::styled::StyledText;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonOptions {
    pub pretty: bool,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self { pretty: true }
    }
}

#[derive(Debug, Clone, Default)]
pub struct JsonFormat {
    options: JsonOptions,
}

impl JsonFormat {
    pub fn new(options: JsonOptions) -> Self {
        Self { options }
    }

    fn write(text: &StyledText, options: JsonOptions) -> Result<String, FormatError> {
        let result = if options.pretty {
            serde_json::to_string_pretty(text)
        } else {
            serde_json::to_string(text)
        };
        result.map_err(|e| FormatError::SerializationError(e.to_string()))
    }
}

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::BOTH
    }

    fn description(&self) -> &str {
        "Styled text as JSON (text plus attribute runs)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn option_names(&self) -> &[&str] {
        &["pretty"]
    }

    fn parse(&self, source: &str) -> Result<StyledText, FormatError> {
        serde_json::from_str(source).map_err(|e| FormatError::ParseError(e.to_string()))
    }

    fn serialize(&self, text: &StyledText) -> Result<String, FormatError> {
        Self::write(text, self.options)
    }

    fn serialize_with_options(
        &self,
        text: &StyledText,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let mut json_options = self.options;
        for (key, value) in options {
            match key.as_str() {
                "pretty" => {
                    json_options.pretty = value.parse::<bool>().map_err(|_| {
                        FormatError::InvalidInput(format!(
                            "Invalid value '{value}' for 'pretty', expected true or false"
                        ))
                    })?;
                }
                other => return Err(unknown_option(self.name(), other)),
            }
        }
        Self::write(text, json_options)
    }
}
