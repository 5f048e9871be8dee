//! Read-only queries over a selection in parsed text
//!
//! These answer toolbar-style questions ("is the selection bold?", "does it
//! touch a bulleted line?") about text produced by the markdown parser.
//!
//! Style queries look at the first run of a non-empty range. For an empty
//! range (a caret) they look at the character before the caret, or at the
//! first character when the caret is at the start. List queries check the
//! start of every line the range touches.

use crate::error::TextError;
use crate::formats::markdown::parser::{BULLET, NBSP};
use crate::styled::{Attributes, StyledText};
use std::ops::Range;

pub fn has_bold(text: &StyledText, range: Range<usize>) -> Result<bool, TextError> {
    Ok(inspected(text, range)?.is_some_and(Attributes::is_bold))
}

pub fn has_italic(text: &StyledText, range: Range<usize>) -> Result<bool, TextError> {
    Ok(inspected(text, range)?.is_some_and(Attributes::is_italic))
}

pub fn has_link(text: &StyledText, range: Range<usize>) -> Result<bool, TextError> {
    Ok(inspected(text, range)?.is_some_and(|attrs| attrs.link.is_some()))
}

/// Whether any touched line starts with the `•` + NBSP lead.
pub fn has_bulleted_list(text: &StyledText, range: Range<usize>) -> Result<bool, TextError> {
    text.substring(range.clone())?;
    Ok(touched_lines(text.as_str(), &range)
        .into_iter()
        .any(is_bulleted))
}

/// Whether any touched line starts with a `N.` + NBSP lead.
pub fn has_numbered_list(text: &StyledText, range: Range<usize>) -> Result<bool, TextError> {
    text.substring(range.clone())?;
    Ok(touched_lines(text.as_str(), &range)
        .into_iter()
        .any(is_numbered))
}

fn inspected(text: &StyledText, range: Range<usize>) -> Result<Option<&Attributes>, TextError> {
    text.substring(range.clone())?;
    if !range.is_empty() {
        return Ok(text.runs_in(range)?.next().map(|(_, attrs)| attrs));
    }
    if text.is_empty() {
        return Ok(None);
    }
    let index = text.as_str()[..range.start]
        .char_indices()
        .next_back()
        .map_or(0, |(index, _)| index);
    text.attributes_at(index).map(Some)
}

fn is_line_break(ch: char) -> bool {
    ch == '\n' || ch == '\u{2028}'
}

fn touched_lines<'a>(text: &'a str, range: &Range<usize>) -> Vec<&'a str> {
    let breaks = text
        .char_indices()
        .filter(|(_, ch)| is_line_break(*ch))
        .map(|(index, ch)| (index, ch.len_utf8()))
        .chain(std::iter::once((text.len(), 0)));

    let mut lines = Vec::new();
    let mut start = 0;
    for (end, width) in breaks {
        if start <= range.end && range.start <= end {
            lines.push(&text[start..end]);
        }
        start = end + width;
    }
    lines
}

fn without_indent(line: &str) -> &str {
    line.trim_start_matches(NBSP)
}

fn is_bulleted(line: &str) -> bool {
    let mut chars = without_indent(line).chars();
    chars.next() == Some(BULLET) && chars.next() == Some(NBSP)
}

fn is_numbered(line: &str) -> bool {
    let rest = without_indent(line);
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    digits > 0 && rest[digits..].starts_with(".\u{a0}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::markdown::MarkdownParser;

    fn parse(source: &str) -> StyledText {
        MarkdownParser::standard().parse(source).unwrap()
    }

    #[test]
    fn caret_inspects_previous_character() {
        let text = parse("**ab**cd");
        assert_eq!(text.as_str(), "abcd");
        assert!(has_bold(&text, 2..2).unwrap());
        assert!(!has_bold(&text, 3..3).unwrap());
        assert!(has_bold(&text, 0..0).unwrap());
    }

    #[test]
    fn range_inspects_first_run() {
        let text = parse("_ab_cd");
        assert!(has_italic(&text, 0..4).unwrap());
        assert!(!has_italic(&text, 2..4).unwrap());
    }

    #[test]
    fn link_query() {
        let text = parse("[ab](https://example.com) cd");
        assert!(has_link(&text, 0..1).unwrap());
        assert!(!has_link(&text, 3..4).unwrap());
    }

    #[test]
    fn list_queries_check_touched_lines() {
        let text = parse("plain\n+ bullet\n1. number");
        let bullet_line = text.as_str().find('•').unwrap();
        assert!(!has_bulleted_list(&text, 0..2).unwrap());
        assert!(has_bulleted_list(&text, 0..bullet_line).unwrap());
        assert!(has_numbered_list(&text, text.len()..text.len()).unwrap());
        assert!(!has_numbered_list(&text, 0..3).unwrap());
    }

    #[test]
    fn empty_text_has_nothing() {
        let text = StyledText::new();
        assert!(!has_bold(&text, 0..0).unwrap());
        assert!(!has_bulleted_list(&text, 0..0).unwrap());
    }

    #[test]
    fn out_of_bounds_is_an_error() {
        let text = parse("abc");
        assert!(has_bold(&text, 2..9).is_err());
    }
}
