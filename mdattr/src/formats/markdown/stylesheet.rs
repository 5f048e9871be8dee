//! Attribute tables the markdown rules apply
//!
//! Level tables (`header_attributes`, `list_attributes`, ...) are indexed from
//! 0. A lookup past the end reuses the last entry, and an empty table yields
//! nothing. See [`level_attributes`].

use super::options::ParserOptions;
use crate::styled::{Attributes, Font};

#[derive(Debug, Clone, PartialEq)]
pub struct Stylesheet {
    /// Applied to the whole input before any rule runs.
    pub default_attributes: Attributes,
    /// Indexed by header level − 1.
    pub header_attributes: Vec<Attributes>,
    /// Indexed by indent, in spaces. An unindented item uses entry 0, not the
    /// last entry as a `level − 1` lookup would give it.
    pub list_attributes: Vec<Attributes>,
    /// Indexed by indent, in spaces, like `list_attributes`.
    pub numbered_list_attributes: Vec<Attributes>,
    /// Indexed by quote level − 1.
    pub quote_attributes: Vec<Attributes>,
    /// Applied to the placeholder of a resolved image.
    pub image_attributes: Attributes,
    /// Applied to the alt text of an image that did not resolve.
    pub alt_text_attributes: Attributes,
    pub link_attributes: Attributes,
    pub monospace_attributes: Attributes,
    pub strong_attributes: Attributes,
    pub emphasis_attributes: Attributes,
    pub strong_and_emphasis_attributes: Attributes,
}

impl Stylesheet {
    pub fn from_options(options: &ParserOptions) -> Self {
        let size = options.base_font_size;
        let indented = |levels: u32| -> Vec<Attributes> {
            (1..=levels)
                .map(|level| Attributes::new().with_paragraph_indent(level))
                .collect()
        };
        Self {
            default_attributes: Attributes::new().with_font(Font::regular(size)),
            header_attributes: options
                .header_sizes
                .iter()
                .map(|&header_size| Attributes::new().with_font(Font::bold(header_size)))
                .collect(),
            list_attributes: indented(3),
            numbered_list_attributes: indented(3),
            quote_attributes: indented(3),
            image_attributes: Attributes::new(),
            alt_text_attributes: Attributes::new(),
            link_attributes: Attributes::new()
                .with_foreground_color(options.link_color)
                .with_underline(true),
            monospace_attributes: Attributes::new()
                .with_font(Font::monospace(size))
                .with_foreground_color(options.code_color),
            strong_attributes: Attributes::new().with_font(Font::bold(size)),
            emphasis_attributes: Attributes::new().with_font(Font::italic(size)),
            strong_and_emphasis_attributes: Attributes::new().with_font(Font::bold_italic(size)),
        }
    }
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self::from_options(&ParserOptions::default())
    }
}

/// Entry `index` of `table`, clamped to the last entry.
pub fn level_attributes(table: &[Attributes], index: usize) -> Option<&Attributes> {
    table.get(index).or_else(|| table.last())
}
