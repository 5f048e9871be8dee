//! Format registry
//!
//! Formats are looked up by name, or guessed from a file extension. The
//! registry also checks a format's declared capabilities and option names
//! before handing work to it, so every format reports misuse the same way.

use crate::error::FormatError;
use crate::format::{unknown_option, Format};
use crate::formats::json::JsonFormat;
use crate::formats::markdown::MarkdownFormat;
use crate::styled::StyledText;
use std::collections::HashMap;
use std::path::Path;

/// Registry of styled text formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::with_defaults();
/// let text = registry.parse("**hi**", "markdown")?;
/// let json = registry.serialize(&text, "json")?;
/// ```
#[derive(Default)]
pub struct FormatRegistry {
    formats: Vec<Box<dyn Format>>,
}

impl FormatRegistry {
    /// An empty registry. [`FormatRegistry::with_defaults`] has markdown and json.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(MarkdownFormat::default());
        registry.register(JsonFormat::default());
        registry
    }

    /// Add `format`, replacing any format registered under the same name.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        let format: Box<dyn Format> = Box::new(format);
        match self.position(format.name()) {
            Some(index) => {
                log::debug!("replacing format '{}'", format.name());
                self.formats[index] = format;
            }
            None => {
                log::debug!("registering format '{}'", format.name());
                self.formats.push(format);
            }
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.formats.iter().position(|f| f.name() == name)
    }

    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.position(name)
            .map(|index| self.formats[index].as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Registered format names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.formats.iter().map(|f| f.name()).collect();
        names.sort_unstable();
        names
    }

    /// Registered formats in registration order
    pub fn iter(&self) -> impl Iterator<Item = &dyn Format> {
        self.formats.iter().map(|f| f.as_ref())
    }

    /// Guess a format from the extension of `path` (case-insensitive).
    pub fn detect_format(&self, path: impl AsRef<Path>) -> Option<&str> {
        let extension = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        self.iter()
            .find(|format| format.file_extensions().contains(&extension.as_str()))
            .map(|format| format.name())
    }

    pub fn parse(&self, source: &str, format: &str) -> Result<StyledText, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.capabilities().parse {
            return Err(FormatError::NotSupported(format!(
                "Format '{format}' cannot read input"
            )));
        }
        fmt.parse(source)
    }

    pub fn serialize(&self, text: &StyledText, format: &str) -> Result<String, FormatError> {
        self.serialize_with_options(text, format, &HashMap::new())
    }

    /// Serialize with per-call options. Keys the format does not declare are
    /// rejected before the format runs.
    pub fn serialize_with_options(
        &self,
        text: &StyledText,
        format: &str,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.capabilities().serialize {
            return Err(FormatError::NotSupported(format!(
                "Format '{format}' cannot write output"
            )));
        }
        if let Some(key) = options
            .keys()
            .find(|key| !fmt.option_names().contains(&key.as_str()))
        {
            return Err(unknown_option(format, key));
        }
        fmt.serialize_with_options(text, options)
    }
}
