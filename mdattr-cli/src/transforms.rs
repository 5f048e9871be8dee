//! CLI-specific transforms
//!
//! `mdattr inspect` parses a markdown file and renders the resulting styled
//! text in one of these views:
//!
//! - `runs`: one line per attribute run, with its byte range, the covered text
//!   and a compact attribute summary (default)
//! - `text`: the bare string, markers and all
//! - `json`: the lossless JSON dump used by the `json` format
//!
//! ## Extra Parameters
//!
//! - `pretty`: "false" switches the `json` view to compact output
//!
//! Example: `mdattr inspect notes.md json --extra-pretty false`

use mdattr::{Attributes, FontFace, StyledText};
use std::collections::HashMap;
use std::fmt;

/// All available inspect views
pub const AVAILABLE_TRANSFORMS: &[&str] = &["runs", "text", "json"];

/// Render parsed styled text using the named view
///
/// # Examples
///
/// ```ignore
/// let text = parser.parse("**hi** there")?;
/// let output = execute_transform(&text, "runs", &HashMap::new())?;
/// ```
pub fn execute_transform(
    text: &StyledText,
    transform_name: &str,
    extra_params: &HashMap<String, String>,
) -> Result<String, String> {
    match transform_name {
        "runs" => Ok(runs_to_string(text)),
        "text" => {
            let mut output = text.as_str().to_string();
            if !output.is_empty() && !output.ends_with('\n') {
                output.push('\n');
            }
            Ok(output)
        }
        "json" => {
            let pretty = match extra_params.get("pretty").map(String::as_str) {
                None | Some("true") => true,
                Some("false") => false,
                Some(other) => return Err(format!("Invalid value '{other}' for pretty")),
            };
            let json = if pretty {
                serde_json::to_string_pretty(text)
            } else {
                serde_json::to_string(text)
            };
            json.map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| format!("JSON serialization failed: {e}"))
        }
        other => Err(format!("Unknown transform '{other}'")),
    }
}

fn runs_to_string(text: &StyledText) -> String {
    let mut output = String::new();
    for (range, attributes) in text.runs() {
        let covered = &text.as_str()[range.clone()];
        output.push_str(&format!(
            "{:>4}..{:<4} {:?} {}\n",
            range.start,
            range.end,
            covered,
            describe_attributes(attributes)
        ));
    }
    output
}

/// One-line summary of an attribute set, e.g. `font=bold/12 indent=1`
pub fn describe_attributes(attributes: &Attributes) -> String {
    let mut parts = Vec::new();
    if let Some(font) = &attributes.font {
        let face = match font.face {
            FontFace::Regular => "regular",
            FontFace::Bold => "bold",
            FontFace::Italic => "italic",
            FontFace::BoldItalic => "bold-italic",
        };
        let mono = if font.monospace { "/mono" } else { "" };
        parts.push(format!("font={face}/{}{mono}", font.size));
    }
    if let Some(color) = attributes.foreground_color {
        parts.push(format!("color={color}"));
    }
    if attributes.underline == Some(true) {
        parts.push("underline".to_string());
    }
    if let Some(link) = &attributes.link {
        parts.push(format!("link={link}"));
    }
    if let Some(indent) = attributes.paragraph_indent {
        parts.push(format!("indent={indent}"));
    }
    if let Some(attachment) = &attributes.attachment {
        parts.push(format!(
            "image={} ({}x{})",
            attachment.source, attachment.width, attachment.height
        ));
    }
    for (key, value) in &attributes.extra {
        parts.push(format!("{key}={value}"));
    }
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(" ")
    }
}

/// First line where a round trip diverged from its source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDifference {
    /// 1-based line number
    pub line: usize,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

impl fmt::Display for LineDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |side: &Option<String>| match side {
            Some(line) => format!("{line:?}"),
            None => "<end of file>".to_string(),
        };
        write!(
            f,
            "line {}: expected {}, got {}",
            self.line,
            show(&self.expected),
            show(&self.actual)
        )
    }
}

/// Compare two documents line by line
///
/// Lines are split on `\n` only, so a missing or extra trailing newline shows
/// up as a difference on the last line.
pub fn first_difference(expected: &str, actual: &str) -> Option<LineDifference> {
    let mut left = expected.split('\n');
    let mut right = actual.split('\n');
    let mut line = 1;
    loop {
        match (left.next(), right.next()) {
            (None, None) => return None,
            (a, b) if a == b => line += 1,
            (a, b) => {
                return Some(LineDifference {
                    line,
                    expected: a.map(str::to_string),
                    actual: b.map(str::to_string),
                })
            }
        }
    }
}
