//! Knobs for the markdown parser and serializer

use crate::styled::Color;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Settings the standard parser is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserOptions {
    /// Point size of body text, strong, emphasis and code.
    pub base_font_size: f32,
    /// Point sizes of header levels 1, 2, ... Deeper levels reuse the last one.
    pub header_sizes: Vec<f32>,
    /// Longest `#` run recognized as a header. `None` means no limit.
    pub max_header_level: Option<usize>,
    /// Deepest list indent (in spaces) recognized as a list item.
    pub max_list_indent: Option<usize>,
    /// Longest `>` run recognized as a quote.
    pub max_quote_level: Option<usize>,
    pub link_color: Color,
    pub code_color: Color,
    /// Detect bare URLs in running text.
    pub autolink: bool,
    /// Extra ASCII characters to percent-encode in link targets.
    pub url_encode_extra: String,
    /// Base for relative link targets.
    pub base_url: Option<Url>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            base_font_size: 12.0,
            header_sizes: vec![23.0, 21.0, 19.0, 17.0, 15.0, 13.0],
            max_header_level: None,
            max_list_indent: None,
            max_quote_level: None,
            link_color: Color::BLUE,
            code_color: Color::from_unit_rgb(0.95, 0.54, 0.55),
            autolink: true,
            url_encode_extra: String::new(),
            base_url: None,
        }
    }
}

/// Marker written for bulleted list items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulletStyle {
    #[default]
    Plus,
    Star,
    Dash,
}

impl BulletStyle {
    pub fn marker(self) -> char {
        match self {
            BulletStyle::Plus => '+',
            BulletStyle::Star => '*',
            BulletStyle::Dash => '-',
        }
    }
}

impl FromStr for BulletStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "+" | "plus" => Ok(BulletStyle::Plus),
            "*" | "star" | "asterisk" => Ok(BulletStyle::Star),
            "-" | "dash" | "hyphen" => Ok(BulletStyle::Dash),
            other => Err(format!(
                "Unknown bullet style '{other}', expected one of '+', '*', '-'"
            )),
        }
    }
}

impl fmt::Display for BulletStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.marker())
    }
}

impl<'de> Deserialize<'de> for BulletStyle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Settings for styled text → markdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializerOptions {
    pub bullet: BulletStyle,
}
