//! Styled text → markdown
//!
//! The serializer walks the text one character at a time and keeps the open
//! markup (emphasis markers, a code fence, a link) in sync with the style of
//! the next character. Markup is opened lazily, right before the first
//! character that needs it, and closed as soon as a character no longer does.
//!
//! Emphasis markers nest like a stack. When an outer marker ends before an
//! inner one, both are closed and the inner one is reopened:
//!
//! ```text
//! **Markdown _double_**_ something_
//! _italic **double**_** bold**
//! ```
//!
//! Bold is written as `**` and italic as `_`, so the two never merge into an
//! ambiguous `***` run.
//!
//! Structure the parser encodes as text comes back as markdown: `•` + NBSP
//! leads become bullets, `1.` + NBSP leads become numbered items, and U+FFFC
//! with an attachment becomes `![](source)`. Header size and quote depth are
//! not reconstructed. Headers come back as bold text.

use super::options::SerializerOptions;
use super::parser::{BULLET, NBSP, OBJECT_REPLACEMENT};
use crate::common::links::is_bare_link;
use crate::styled::{Attachment, StyledText};
use std::ops::Range;
use url::Url;

/// Characters that always get a backslash outside code spans.
const ESCAPED: &[char] = &[
    '\\', '`', '*', '_', '{', '}', '[', ']', '(', ')', '#', '+', '-', '!',
];

#[derive(Debug, Clone, Default)]
pub struct MarkdownSerializer {
    options: SerializerOptions,
}

impl MarkdownSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SerializerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SerializerOptions {
        &self.options
    }

    pub fn serialize(&self, text: &StyledText) -> String {
        let (glyphs, links) = collect_glyphs(text);
        let mut writer = Writer::new(&links, text.len());

        let mut i = 0;
        while i < glyphs.len() {
            let ch = glyphs[i].ch;
            if is_line_break(ch) {
                writer.close_all();
                writer.out.push(ch);
                writer.line = LineState::Start;
                i += 1;
                continue;
            }
            if writer.line == LineState::Start {
                if let Some((lead, consumed)) = list_lead(&glyphs[i..], &self.options) {
                    writer.out.push_str(&lead);
                    writer.line = LineState::Text;
                    i += consumed;
                    continue;
                }
            }

            writer.reconcile(&glyphs, i);
            match glyphs[i].attachment.filter(|_| ch == OBJECT_REPLACEMENT) {
                Some(attachment) => writer.push_image(attachment),
                None => writer.push_char(
                    ch,
                    glyphs.get(i + 1).map(|g| g.ch),
                    glyphs[i].style.bare_link,
                ),
            }
            i += 1;
        }
        writer.close_all();
        writer.out
    }
}

/// Serialize with default options.
pub fn serialize(text: &StyledText) -> String {
    MarkdownSerializer::new().serialize(text)
}

pub fn serialize_with(text: &StyledText, options: &SerializerOptions) -> String {
    MarkdownSerializer::with_options(*options).serialize(text)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Style {
    bold: bool,
    italic: bool,
    mono: bool,
    /// Index into the link spans, for links that need markup.
    link: Option<usize>,
    /// Inside a link written as bare text.
    bare_link: bool,
}

struct Glyph<'a> {
    ch: char,
    style: Style,
    attachment: Option<&'a Attachment>,
}

/// Adjacent runs sharing one URL.
struct LinkSpan {
    url: Url,
    range: Range<usize>,
}

fn collect_glyphs(text: &StyledText) -> (Vec<Glyph<'_>>, Vec<LinkSpan>) {
    let mut spans: Vec<LinkSpan> = Vec::new();
    let mut glyphs = Vec::with_capacity(text.len());

    for (range, attrs) in text.runs() {
        let link = attrs.link.as_ref().map(|url| {
            match spans.last_mut() {
                Some(span) if span.url == *url && span.range.end == range.start => {
                    span.range.end = range.end;
                }
                _ => spans.push(LinkSpan {
                    url: url.clone(),
                    range: range.clone(),
                }),
            }
            spans.len() - 1
        });
        let mono = attrs.is_monospace();
        let style = Style {
            bold: !mono && attrs.is_bold(),
            italic: !mono && attrs.is_italic(),
            mono,
            link,
            bare_link: false,
        };
        glyphs.extend(text.as_str()[range].chars().map(|ch| Glyph {
            ch,
            style,
            attachment: attrs.attachment.as_ref(),
        }));
    }

    let bare: Vec<bool> = spans
        .iter()
        .map(|span| is_bare_link(&text.as_str()[span.range.clone()], &span.url))
        .collect();
    for glyph in &mut glyphs {
        if glyph.style.link.is_some_and(|index| bare[index]) {
            glyph.style.link = None;
            glyph.style.bare_link = true;
        }
    }
    (glyphs, spans)
}

fn is_line_break(ch: char) -> bool {
    ch == '\n' || ch == '\u{2028}'
}

/// Markdown for a bullet or numbered lead at the start of `glyphs`, and the
/// number of characters it replaces.
fn list_lead(glyphs: &[Glyph<'_>], options: &SerializerOptions) -> Option<(String, usize)> {
    let indent = glyphs.iter().take_while(|g| g.ch == NBSP).count();
    let rest = &glyphs[indent..];
    let ch_at = |i: usize| rest.get(i).map(|g| g.ch);

    if ch_at(0) == Some(BULLET) && ch_at(1) == Some(NBSP) {
        let lead = format!("{}{} ", " ".repeat(indent), options.bullet.marker());
        return Some((lead, indent + 2));
    }

    let digits = rest.iter().take_while(|g| g.ch.is_ascii_digit()).count();
    if digits > 0 && ch_at(digits) == Some('.') && ch_at(digits + 1) == Some(NBSP) {
        let number: String = rest[..digits].iter().map(|g| g.ch).collect();
        let lead = format!("{}{number}. ", " ".repeat(indent));
        return Some((lead, indent + digits + 2));
    }
    None
}

/// Longest backtick run in the code span starting at `start`.
fn longest_backtick_run(glyphs: &[Glyph<'_>], start: usize) -> usize {
    let link = glyphs[start].style.link;
    let mut longest = 0;
    let mut current = 0;
    for glyph in &glyphs[start..] {
        if !glyph.style.mono || glyph.style.link != link || is_line_break(glyph.ch) {
            break;
        }
        if glyph.ch == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// `(` and `)` would end the target early when parsed back.
fn link_target(url: &Url) -> String {
    url.as_str().replace('(', "%28").replace(')', "%29")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Emphasis {
    Bold,
    Italic,
}

impl Emphasis {
    fn token(self) -> &'static str {
        match self {
            Emphasis::Bold => "**",
            Emphasis::Italic => "_",
        }
    }

    fn wanted(self, style: &Style) -> bool {
        match self {
            Emphasis::Bold => style.bold,
            Emphasis::Italic => style.italic,
        }
    }
}

/// What the current line holds so far, for context-sensitive escapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineState {
    Start,
    Indent,
    Digits,
    Text,
}

impl LineState {
    fn advance(self, ch: char) -> Self {
        match (self, ch) {
            (LineState::Start | LineState::Indent, ' ' | NBSP) => LineState::Indent,
            (LineState::Start | LineState::Indent | LineState::Digits, '0'..='9') => {
                LineState::Digits
            }
            _ => LineState::Text,
        }
    }
}

struct Writer<'a> {
    out: String,
    links: &'a [LinkSpan],
    emphasis: Vec<Emphasis>,
    fence: Option<String>,
    link: Option<usize>,
    line: LineState,
}

impl<'a> Writer<'a> {
    fn new(links: &'a [LinkSpan], capacity: usize) -> Self {
        Self {
            out: String::with_capacity(capacity),
            links,
            emphasis: Vec::new(),
            fence: None,
            link: None,
            line: LineState::Start,
        }
    }

    fn close_emphasis(&mut self) {
        while let Some(marker) = self.emphasis.pop() {
            self.out.push_str(marker.token());
        }
    }

    fn close_code(&mut self) {
        if let Some(fence) = self.fence.take() {
            self.out.push_str(&fence);
        }
    }

    fn close_link(&mut self) {
        if let Some(index) = self.link.take() {
            self.out.push_str("](");
            self.out.push_str(&link_target(&self.links[index].url));
            self.out.push(')');
        }
    }

    fn close_all(&mut self) {
        self.close_emphasis();
        self.close_code();
        self.close_link();
    }

    /// Bring the open markup in line with the style of `glyphs[at]`.
    fn reconcile(&mut self, glyphs: &[Glyph<'_>], at: usize) {
        let style = glyphs[at].style;

        if style.link != self.link || style.mono != self.fence.is_some() {
            self.close_emphasis();
            self.close_code();
            if style.link != self.link {
                self.close_link();
                if style.link.is_some() {
                    self.out.push('[');
                    self.link = style.link;
                }
            }
            if style.mono {
                let fence = "`".repeat(longest_backtick_run(glyphs, at) + 1);
                self.out.push_str(&fence);
                self.fence = Some(fence);
            }
        }
        if style.mono {
            return;
        }

        if let Some(first_unwanted) = self.emphasis.iter().position(|m| !m.wanted(&style)) {
            while self.emphasis.len() > first_unwanted {
                if let Some(marker) = self.emphasis.pop() {
                    self.out.push_str(marker.token());
                }
            }
        }
        for marker in [Emphasis::Bold, Emphasis::Italic] {
            if marker.wanted(&style) && !self.emphasis.contains(&marker) {
                self.emphasis.push(marker);
                self.out.push_str(marker.token());
            }
        }
    }

    fn push_char(&mut self, ch: char, next: Option<char>, bare_link: bool) {
        let escape = if self.fence.is_some() {
            ch == '\\'
        } else {
            match ch {
                '.' => {
                    self.line == LineState::Digits && matches!(next, Some(' ' | '\t' | NBSP))
                }
                '>' => self.line == LineState::Start,
                // Never at a line start inside a bare URL, and not trimmed by the link detector.
                '-' | '+' | '#' if bare_link => false,
                _ => ESCAPED.contains(&ch),
            }
        };
        if escape {
            self.out.push('\\');
        }
        self.out.push(if ch == NBSP { ' ' } else { ch });
        self.line = self.line.advance(ch);
    }

    fn push_image(&mut self, attachment: &Attachment) {
        self.out.push_str("![](");
        self.out.push_str(&attachment.source);
        self.out.push(')');
        self.line = LineState::Text;
    }
}
