//! Functional conversion helpers
//!
//! Thin wrappers over [`MarkdownFormat`] for pipelines that just want a
//! string in and a value out. Each call builds a standard parser. Keep a
//! [`MarkdownParser`](crate::formats::markdown::MarkdownParser) around when
//! converting many documents.

use crate::format::Format;
use crate::formats::markdown::{MarkdownFormat, SerializerOptions};
use crate::styled::StyledText;

/// Parse markdown with the standard rules and default styling
///
/// # Example
///
/// ```
/// use mdattr::transforms::markdown_to_styled;
///
/// let text = markdown_to_styled("**Hello** world").unwrap();
/// assert_eq!(text.as_str(), "Hello world");
/// ```
pub fn markdown_to_styled(source: &str) -> Result<StyledText, String> {
    MarkdownFormat::default()
        .parse(source)
        .map_err(|e| e.to_string())
}

/// Serialize styled text to markdown with default options
pub fn styled_to_markdown(text: &StyledText) -> Result<String, String> {
    MarkdownFormat::default()
        .serialize(text)
        .map_err(|e| e.to_string())
}

/// Serialize styled text to markdown with custom options
///
/// # Example
///
/// ```
/// use mdattr::formats::markdown::{BulletStyle, SerializerOptions};
/// use mdattr::transforms::{markdown_to_styled, styled_to_markdown_with_options};
///
/// let text = markdown_to_styled("+ item").unwrap();
/// let options = SerializerOptions { bullet: BulletStyle::Star };
/// assert_eq!(styled_to_markdown_with_options(&text, options).unwrap(), "* item");
/// ```
pub fn styled_to_markdown_with_options(
    text: &StyledText,
    options: SerializerOptions,
) -> Result<String, String> {
    Ok(crate::formats::markdown::serializer::serialize_with(
        text, &options,
    ))
}

/// Round-trip transformation: parse and re-serialize
///
/// For markdown in the supported subset the output equals the input.
///
/// # Example
///
/// ```
/// use mdattr::transforms::roundtrip_markdown;
///
/// let source = "_italic **double**_** bold**";
/// assert_eq!(roundtrip_markdown(source).unwrap(), source);
/// ```
pub fn roundtrip_markdown(source: &str) -> Result<String, String> {
    let format = MarkdownFormat::default();
    let text = format.parse(source).map_err(|e| e.to_string())?;
    format.serialize(&text).map_err(|e| e.to_string())
}
