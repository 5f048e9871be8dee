//! Regular expressions behind the standard markdown rules
//!
//! Line-oriented patterns are compiled in multi-line mode. Every lead pattern
//! captures the marker (or indent) in group 1 and the line content in group 2.

pub const ESCAPING: &str = r"\\.";
pub const UNESCAPING: &str = r"\\[0-9a-f]{4}";
pub const IMAGE: &str = r"!\[([^\[]*?)\]\((\S*)\)";
pub const LINK: &str = r"\[([^\[]*?)\]\(([^\)]*)\)";
pub const STRONG: &str = r"\*\*(.+?)\*\*|__(.+?)__";
pub const EMPHASIS: &str = r"\*(.+?)\*|_(.+?)_";
pub const STRONG_AND_EMPHASIS: &str = r"\*\*\*([\s\S]+?)\*\*\*|___([\s\S]+?)___";

/// `{min,max}` repetition, or `{min,}` when there is no usable cap.
///
/// A cap of 0 (or one below `min`) means unlimited.
fn repeat(min: usize, max: Option<usize>) -> String {
    match max {
        Some(max) if max > 0 && max >= min => format!("{{{min},{max}}}"),
        _ => format!("{{{min},}}"),
    }
}

pub fn numbered_list(max_indent: Option<usize>) -> String {
    format!(r"^( {})[0-9]+\.[ \t](.+)$", repeat(0, max_indent))
}

pub fn header(max_level: Option<usize>) -> String {
    format!(r"^(#{})[ \t]+(.+)$", repeat(1, max_level))
}

pub fn list(max_indent: Option<usize>) -> String {
    format!(r"^( {})[*+\-][ \t]+(.+)$", repeat(0, max_indent))
}

pub fn quote(max_level: Option<usize>) -> String {
    format!(r"^(>{})[ \t]+(.+)$", repeat(1, max_level))
}

/// Header whose marker may touch the content (`#Title`).
pub fn short_header(max_level: Option<usize>) -> String {
    format!(r"^(#{})[ \t]*([^#\s].*)$", repeat(1, max_level))
}

/// List item whose content may not itself start with a marker.
pub fn short_list(max_indent: Option<usize>) -> String {
    format!(r"^( {})[*+\-][ \t]+([^*+\-\s].*)$", repeat(0, max_indent))
}

/// Quote whose marker may touch the content (`>quoted`).
pub fn short_quote(max_level: Option<usize>) -> String {
    format!(r"^(>{})[ \t]*([^>\s].*)$", repeat(1, max_level))
}
