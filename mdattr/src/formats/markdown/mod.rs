//! Markdown format implementation
//!
//! Markdown is parsed by an ordered set of rewrite rules (see [`parser`]) and
//! written back by a single styling-aware walk (see [`serializer`]). Neither
//! side builds a syntax tree. The text buffer itself is the working state.
//!
//! # Element Mapping Table
//!
//! | Markdown           | Styled text                                  | Export                          |
//! |--------------------|----------------------------------------------|---------------------------------|
//! | `# Header`         | header attributes (size by level)            | bold text                       |
//! | `**x**` / `__x__`  | strong attributes                            | `**x**`                         |
//! | `*x*` / `_x_`      | emphasis attributes                          | `_x_`                           |
//! | `***x***`          | bold-italic                                  | `**_x_**`                       |
//! | `` `x` ``          | monospace attributes                         | backtick fence                  |
//! | `+ item`           | `•` + NBSP, indented with NBSP               | bullet (configurable marker)    |
//! | `1. item`          | number kept, indented with NBSP              | `1. item`                       |
//! | `> quote`          | tab per level, quote attributes              | tabs (not reconstructed)        |
//! | `[text](url)`      | link attributes + URL                        | `[text](url)` or bare URL       |
//! | `![alt](src)`      | U+FFFC + attachment, or alt text             | `![](src)`                      |
//! | `\*`               | literal `*`                                  | `\*`                            |
//!
//! # Lossy Conversions
//!
//! - Header sizes come back as plain bold.
//! - Quote depth is stored as tabs and is not written back as `>`.
//! - Image alt text is dropped when the image resolved.
//! - Colors, underline and any extra attributes are not representable.
//!
//! # Options
//!
//! `serialize_with_options` accepts `bullet` (`+`, `*` or `-`).

pub mod context;
pub mod options;
pub mod parser;
pub mod patterns;
pub mod serializer;
pub mod stylesheet;

pub use context::{ImageCatalog, ImageResolver, ImageSize, ParseContext};
pub use options::{BulletStyle, ParserOptions, SerializerOptions};
pub use parser::MarkdownParser;
pub use serializer::MarkdownSerializer;
pub use stylesheet::Stylesheet;

use crate::error::FormatError;
use crate::format::{unknown_option, Capabilities, Format};
use crate::styled::StyledText;
use std::collections::HashMap;

/// Format implementation for Markdown
pub struct MarkdownFormat {
    parser: MarkdownParser,
    serializer: MarkdownSerializer,
}

impl MarkdownFormat {
    pub fn new(parser: MarkdownParser, serializer_options: SerializerOptions) -> Self {
        Self {
            parser,
            serializer: MarkdownSerializer::with_options(serializer_options),
        }
    }

    pub fn with_options(parser_options: &ParserOptions, serializer_options: SerializerOptions) -> Self {
        Self::new(MarkdownParser::with_options(parser_options), serializer_options)
    }

    pub fn parser(&self) -> &MarkdownParser {
        &self.parser
    }
}

impl Default for MarkdownFormat {
    fn default() -> Self {
        Self::new(MarkdownParser::standard(), SerializerOptions::default())
    }
}

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::BOTH
    }

    fn description(&self) -> &str {
        "Markdown with inline styling, lists, links and images"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn option_names(&self) -> &[&str] {
        &["bullet"]
    }

    fn parse(&self, source: &str) -> Result<StyledText, FormatError> {
        self.parser.parse(source)
    }

    fn serialize(&self, text: &StyledText) -> Result<String, FormatError> {
        Ok(self.serializer.serialize(text))
    }

    fn serialize_with_options(
        &self,
        text: &StyledText,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let mut serializer_options = *self.serializer.options();
        for (key, value) in options {
            match key.as_str() {
                "bullet" => {
                    serializer_options.bullet = value
                        .parse::<BulletStyle>()
                        .map_err(FormatError::InvalidInput)?;
                }
                other => return Err(unknown_option(self.name(), other)),
            }
        }
        Ok(serializer::serialize_with(text, &serializer_options))
    }
}
