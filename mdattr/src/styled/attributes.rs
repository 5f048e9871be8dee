//! Typed attribute set attached to runs of styled text
//!
//! The key space is fixed: font (face, size, monospace), foreground color,
//! underline, link, paragraph indent and image attachment. Collaborators that
//! need something else can stash string pairs in [`Attributes::extra`].
//!
//! Bold and italic are not two independent flags. A font carries a single
//! [`FontFace`], and `FontFace::BoldItalic` is the identity for text that is
//! both. `**x _y_**` and `***y***` therefore produce the same attributes on `y`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Face of a font: the combination of weight and style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFace {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

/// `font-weight` view of a [`FontFace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Normal,
    Bold,
}

/// `font-style` view of a [`FontFace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Normal,
    Italic,
}

impl FontFace {
    pub fn from_traits(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (false, false) => FontFace::Regular,
            (true, false) => FontFace::Bold,
            (false, true) => FontFace::Italic,
            (true, true) => FontFace::BoldItalic,
        }
    }

    pub fn is_bold(self) -> bool {
        matches!(self, FontFace::Bold | FontFace::BoldItalic)
    }

    pub fn is_italic(self) -> bool {
        matches!(self, FontFace::Italic | FontFace::BoldItalic)
    }

    pub fn weight(self) -> FontWeight {
        if self.is_bold() {
            FontWeight::Bold
        } else {
            FontWeight::Normal
        }
    }

    pub fn style(self) -> FontStyle {
        if self.is_italic() {
            FontStyle::Italic
        } else {
            FontStyle::Normal
        }
    }
}

/// A font description: face, point size and whether it is fixed-width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub face: FontFace,
    pub size: f32,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub monospace: bool,
}

impl Font {
    pub fn new(face: FontFace, size: f32) -> Self {
        Self {
            face,
            size,
            monospace: false,
        }
    }

    pub fn regular(size: f32) -> Self {
        Self::new(FontFace::Regular, size)
    }

    pub fn bold(size: f32) -> Self {
        Self::new(FontFace::Bold, size)
    }

    pub fn italic(size: f32) -> Self {
        Self::new(FontFace::Italic, size)
    }

    pub fn bold_italic(size: f32) -> Self {
        Self::new(FontFace::BoldItalic, size)
    }

    pub fn monospace(size: f32) -> Self {
        Self {
            face: FontFace::Regular,
            size,
            monospace: true,
        }
    }
}

/// An sRGB color with alpha. Serialized as `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build a color from unit-interval components, rounding to the nearest byte.
    pub fn from_unit_rgb(r: f32, g: f32, b: f32) -> Self {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgb(channel(r), channel(g), channel(b))
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !(hex.len() == 6 || hex.len() == 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("Invalid color '{s}', expected #rrggbb or #rrggbbaa"));
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
        let alpha = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(Color::rgba(byte(0)?, byte(2)?, byte(4)?, alpha))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// An embedded image, stood in for by U+FFFC in the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub source: String,
    pub width: u32,
    pub height: u32,
}

/// The attribute set carried by a run.
///
/// Every key is optional. [`Attributes::merge`] overlays the keys that are set
/// on the other side, which is how rules "add" attributes to a range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Url>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph_indent: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font(mut self, font: Font) -> Self {
        self.font = Some(font);
        self
    }

    pub fn with_foreground_color(mut self, color: Color) -> Self {
        self.foreground_color = Some(color);
        self
    }

    pub fn with_underline(mut self, underline: bool) -> Self {
        self.underline = Some(underline);
        self
    }

    pub fn with_link(mut self, link: Url) -> Self {
        self.link = Some(link);
        self
    }

    pub fn with_paragraph_indent(mut self, level: u32) -> Self {
        self.paragraph_indent = Some(level);
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Overlay every key that is set in `other`.
    pub fn merge(&mut self, other: &Attributes) {
        if other.font.is_some() {
            self.font = other.font;
        }
        if other.foreground_color.is_some() {
            self.foreground_color = other.foreground_color;
        }
        if other.underline.is_some() {
            self.underline = other.underline;
        }
        if other.link.is_some() {
            self.link.clone_from(&other.link);
        }
        if other.paragraph_indent.is_some() {
            self.paragraph_indent = other.paragraph_indent;
        }
        if other.attachment.is_some() {
            self.attachment.clone_from(&other.attachment);
        }
        for (key, value) in &other.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }

    pub fn merged(&self, other: &Attributes) -> Attributes {
        let mut out = self.clone();
        out.merge(other);
        out
    }

    pub fn is_empty(&self) -> bool {
        *self == Attributes::default()
    }

    pub fn font_face(&self) -> FontFace {
        self.font.map(|f| f.face).unwrap_or_default()
    }

    pub fn font_weight(&self) -> FontWeight {
        self.font_face().weight()
    }

    pub fn font_style(&self) -> FontStyle {
        self.font_face().style()
    }

    pub fn is_bold(&self) -> bool {
        self.font_face().is_bold()
    }

    pub fn is_italic(&self) -> bool {
        self.font_face().is_italic()
    }

    pub fn is_monospace(&self) -> bool {
        self.font.is_some_and(|f| f.monospace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_italic_is_its_own_face() {
        let face = FontFace::from_traits(true, true);
        assert_eq!(face, FontFace::BoldItalic);
        assert_eq!(face.weight(), FontWeight::Bold);
        assert_eq!(face.style(), FontStyle::Italic);
        assert_ne!(face, FontFace::Bold);
        assert_ne!(face, FontFace::Italic);
    }

    #[test]
    fn merge_overlays_only_set_keys() {
        let mut base = Attributes::new()
            .with_font(Font::regular(12.0))
            .with_paragraph_indent(1);
        let overlay = Attributes::new()
            .with_font(Font::bold(12.0))
            .with_extra("app.tag", "todo");
        base.merge(&overlay);

        assert_eq!(base.font, Some(Font::bold(12.0)));
        assert_eq!(base.paragraph_indent, Some(1));
        assert_eq!(base.extra.get("app.tag").map(String::as_str), Some("todo"));
        assert!(base.is_bold());
        assert!(!base.is_italic());
    }

    #[test]
    fn color_hex_round_trip() {
        let color: Color = "#f28a8c".parse().unwrap();
        assert_eq!(color, Color::rgb(0xf2, 0x8a, 0x8c));
        assert_eq!(color.to_string(), "#f28a8c");
        assert_eq!(Color::rgba(1, 2, 3, 4).to_hex(), "#01020304");
        assert!("blue".parse::<Color>().is_err());
    }

    #[test]
    fn unit_rgb_rounds_channels() {
        assert_eq!(Color::from_unit_rgb(0.95, 0.54, 0.55), Color::rgb(242, 138, 140));
    }

    #[test]
    fn empty_attributes_serialize_to_empty_object() {
        let json = serde_json::to_string(&Attributes::new()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn attributes_deserialize_from_json() {
        let json = r##"{"font":{"face":"bold-italic","size":12.0},"foreground_color":"#0000ff","link":"https://example.com/"}"##;
        let attrs: Attributes = serde_json::from_str(json).unwrap();
        assert_eq!(attrs.font_face(), FontFace::BoldItalic);
        assert_eq!(attrs.foreground_color, Some(Color::BLUE));
        assert_eq!(attrs.link.unwrap().as_str(), "https://example.com/");
    }
}
