//! Markdown → styled text
//!
//! [`MarkdownParser`] owns a [`RuleSet`] over a [`ParseContext`]. The standard
//! parser registers, in order:
//!
//! | rule                   | effect                                               |
//! |------------------------|------------------------------------------------------|
//! | `numbered-list`        | `1. item` keeps its number, indents with NBSP        |
//! | `escaping`             | `\*` → `\002a` so later rules cannot see the `*`     |
//! | `code-escaping`        | `` `x` `` contents → hex groups                      |
//! | `header`               | `# Title` → header attributes, marker removed        |
//! | `list`                 | `+ item` → `•` + NBSP, indented with NBSP            |
//! | `quote`                | `> text` → one tab per level                         |
//! | `image`                | `![alt](src)` → attachment placeholder or alt text   |
//! | `link`                 | `[text](target)` → link attributes on `text`         |
//! | `autolink`             | bare `https://…` / `www.…` → link attributes         |
//! | `strong`               | `**x**` / `__x__`                                    |
//! | `emphasis`             | `*x*` / `_x_`                                        |
//! | `strong-and-emphasis`  | `***x***` / `___x___`                                |
//! | `code-unescaping`      | hex groups → code contents, monospace applied        |
//! | `unescaping`           | `\002a` → `*`                                        |
//!
//! The order matters. Escaping runs before every structural rule, and the
//! closing rules undo it once nothing else can match the hidden characters.
//! `strong` runs before `emphasis` so `**` is never read as two `*` delimiters.
//!
//! Strong applied to italic text (and emphasis applied to bold text) upgrades
//! it to the combined bold-italic style instead of replacing the font.

use super::context::{ImageResolver, ParseContext};
use super::options::ParserOptions;
use super::patterns;
use super::stylesheet::level_attributes;
use crate::common::escape::{decode_escapes, decode_placeholder, decode_utf16_hex, encode_utf16_hex, hex_placeholder};
use crate::error::{FormatError, TextError};
use crate::rules::{CodeSpanPattern, LinkDetector, Pattern, RuleFlags, RuleMatch, RuleSet};
use crate::styled::{Attachment, Attributes, StyledText};
use std::ops::Range;

/// Indent and spacing character the list rules write.
pub const NBSP: char = '\u{A0}';
/// Marker written in place of `*`, `+` and `-`.
pub const BULLET: char = '•';
/// Placeholder character carrying an image attachment.
pub const OBJECT_REPLACEMENT: char = '\u{FFFC}';

pub struct MarkdownParser {
    context: ParseContext,
    rules: RuleSet<ParseContext>,
}

impl MarkdownParser {
    /// A parser with default styling and no rules.
    pub fn new() -> Self {
        Self::with_context(ParseContext::default())
    }

    pub fn with_context(context: ParseContext) -> Self {
        Self {
            context,
            rules: RuleSet::new(),
        }
    }

    /// A parser with every standard rule, in standard order.
    pub fn standard() -> Self {
        Self::with_options(&ParserOptions::default())
    }

    pub fn with_options(options: &ParserOptions) -> Self {
        let mut parser = Self::with_context(ParseContext::from_options(options));
        parser.add_numbered_list_rule(options.max_list_indent);
        parser.add_escaping_rule();
        parser.add_code_escaping_rule();
        parser.add_header_rule(options.max_header_level);
        parser.add_list_rule(options.max_list_indent);
        parser.add_quote_rule(options.max_quote_level);
        parser.add_image_rule();
        parser.add_link_rule();
        if options.autolink {
            parser.add_autolink_rule();
        }
        parser.add_strong_rule();
        parser.add_emphasis_rule();
        parser.add_strong_and_emphasis_rule();
        parser.add_code_unescaping_rule();
        parser.add_unescaping_rule();
        parser
    }

    pub fn context(&self) -> &ParseContext {
        &self.context
    }

    /// Attribute tables and link settings can change after rules are added.
    pub fn context_mut(&mut self) -> &mut ParseContext {
        &mut self.context
    }

    pub fn set_image_resolver(&mut self, resolver: impl ImageResolver + 'static) {
        self.context.set_image_resolver(resolver);
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.names()
    }

    /// Parse `source` starting from the default attributes.
    pub fn parse(&self, source: &str) -> Result<StyledText, FormatError> {
        self.parse_with_attributes(source, None)
    }

    /// Parse `source` starting from `attributes` instead of the defaults.
    pub fn parse_with_attributes(
        &self,
        source: &str,
        attributes: Option<&Attributes>,
    ) -> Result<StyledText, FormatError> {
        let base = attributes.unwrap_or(&self.context.stylesheet.default_attributes);
        self.parse_styled(StyledText::with_attributes(source, base.clone()))
    }

    /// Run the rules over text that already carries attributes.
    pub fn parse_styled(&self, mut text: StyledText) -> Result<StyledText, FormatError> {
        log::debug!(
            "parsing {} bytes of markdown with {} rules",
            text.len(),
            self.rules.len()
        );
        self.rules.run(&mut text, &self.context)?;
        Ok(text)
    }

    pub fn parse_bytes(&self, source: &[u8]) -> Result<StyledText, FormatError> {
        let source = std::str::from_utf8(source).map_err(|e| {
            FormatError::InvalidInput(format!("Markdown source is not valid UTF-8: {e}"))
        })?;
        self.parse(source)
    }

    /// Append a custom regex rule. Returns `false` if `pattern` does not compile.
    pub fn add_rule<F>(&mut self, name: &str, pattern: &str, flags: RuleFlags, action: F) -> bool
    where
        F: Fn(&RuleMatch, &mut StyledText, &ParseContext) -> Result<(), TextError>
            + Send
            + Sync
            + 'static,
    {
        self.rules.add_rule(name, pattern, flags, action)
    }

    pub fn add_pattern_rule<P, F>(&mut self, name: &str, pattern: P, action: F)
    where
        P: Pattern + 'static,
        F: Fn(&RuleMatch, &mut StyledText, &ParseContext) -> Result<(), TextError>
            + Send
            + Sync
            + 'static,
    {
        self.rules.add_pattern_rule(name, pattern, action);
    }

    pub fn add_escaping_rule(&mut self) -> bool {
        self.add_rule("escaping", patterns::ESCAPING, RuleFlags::NONE, apply_escaping)
    }

    pub fn add_unescaping_rule(&mut self) -> bool {
        self.add_rule("unescaping", patterns::UNESCAPING, RuleFlags::NONE, apply_unescaping)
    }

    pub fn add_code_escaping_rule(&mut self) -> bool {
        self.add_pattern_rule("code-escaping", CodeSpanPattern, apply_code_escaping);
        true
    }

    pub fn add_code_unescaping_rule(&mut self) -> bool {
        self.add_pattern_rule("code-unescaping", CodeSpanPattern, |m, text, ctx| {
            apply_code_span(m, text, ctx, true)
        });
        true
    }

    /// Monospace for code spans that were not escaped first.
    pub fn add_monospace_rule(&mut self) -> bool {
        self.add_pattern_rule("monospace", CodeSpanPattern, |m, text, ctx| {
            apply_code_span(m, text, ctx, false)
        });
        true
    }

    pub fn add_header_rule(&mut self, max_level: Option<usize>) -> bool {
        let pattern = patterns::header(max_level);
        self.add_rule("header", &pattern, RuleFlags::MULTI_LINE, apply_header)
    }

    pub fn add_short_header_rule(&mut self, max_level: Option<usize>) -> bool {
        let pattern = patterns::short_header(max_level);
        self.add_rule("short-header", &pattern, RuleFlags::MULTI_LINE, apply_header)
    }

    pub fn add_list_rule(&mut self, max_indent: Option<usize>) -> bool {
        let pattern = patterns::list(max_indent);
        self.add_rule("list", &pattern, RuleFlags::MULTI_LINE, apply_list)
    }

    pub fn add_short_list_rule(&mut self, max_indent: Option<usize>) -> bool {
        let pattern = patterns::short_list(max_indent);
        self.add_rule("short-list", &pattern, RuleFlags::MULTI_LINE, apply_list)
    }

    pub fn add_numbered_list_rule(&mut self, max_indent: Option<usize>) -> bool {
        let pattern = patterns::numbered_list(max_indent);
        self.add_rule(
            "numbered-list",
            &pattern,
            RuleFlags::MULTI_LINE,
            apply_numbered_list,
        )
    }

    pub fn add_quote_rule(&mut self, max_level: Option<usize>) -> bool {
        let pattern = patterns::quote(max_level);
        self.add_rule("quote", &pattern, RuleFlags::MULTI_LINE, apply_quote)
    }

    pub fn add_short_quote_rule(&mut self, max_level: Option<usize>) -> bool {
        let pattern = patterns::short_quote(max_level);
        self.add_rule("short-quote", &pattern, RuleFlags::MULTI_LINE, apply_quote)
    }

    pub fn add_image_rule(&mut self) -> bool {
        self.add_rule(
            "image",
            patterns::IMAGE,
            RuleFlags::DOT_MATCHES_NEW_LINE,
            apply_image,
        )
    }

    pub fn add_link_rule(&mut self) -> bool {
        self.add_rule(
            "link",
            patterns::LINK,
            RuleFlags::DOT_MATCHES_NEW_LINE,
            apply_link,
        )
    }

    pub fn add_autolink_rule(&mut self) -> bool {
        match LinkDetector::new() {
            Ok(detector) => {
                self.add_pattern_rule("autolink", detector, apply_autolink);
                true
            }
            Err(err) => {
                log::warn!("skipping rule 'autolink': {err}");
                false
            }
        }
    }

    pub fn add_strong_rule(&mut self) -> bool {
        self.add_rule("strong", patterns::STRONG, RuleFlags::NONE, |m, text, ctx| {
            let sheet = &ctx.stylesheet;
            apply_enclosed(m, text, |text, content| {
                upgrade_runs(
                    text,
                    content,
                    &sheet.strong_attributes,
                    &sheet.strong_and_emphasis_attributes,
                    Attributes::is_italic,
                )
            })
        })
    }

    pub fn add_emphasis_rule(&mut self) -> bool {
        self.add_rule("emphasis", patterns::EMPHASIS, RuleFlags::NONE, |m, text, ctx| {
            let sheet = &ctx.stylesheet;
            apply_enclosed(m, text, |text, content| {
                upgrade_runs(
                    text,
                    content,
                    &sheet.emphasis_attributes,
                    &sheet.strong_and_emphasis_attributes,
                    Attributes::is_bold,
                )
            })
        })
    }

    pub fn add_strong_and_emphasis_rule(&mut self) -> bool {
        self.add_rule(
            "strong-and-emphasis",
            patterns::STRONG_AND_EMPHASIS,
            RuleFlags::NONE,
            |m, text, ctx| {
                apply_enclosed(m, text, |text, content| {
                    text.add_attributes(content, &ctx.stylesheet.strong_and_emphasis_attributes)
                })
            },
        )
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::standard()
    }
}

/// Lead (line start up to the content), content, and marker length.
fn lead_and_content(m: &RuleMatch) -> Option<(Range<usize>, Range<usize>, usize)> {
    let marker = m.group(1)?;
    let content = m.group(2)?;
    Some((m.start()..content.start, content, marker.len()))
}

fn apply_escaping(m: &RuleMatch, text: &mut StyledText, _: &ParseContext) -> Result<(), TextError> {
    let escaped = m.start() + 1..m.end();
    let Some(c) = text.substring(escaped.clone())?.chars().next() else {
        return Ok(());
    };
    match hex_placeholder(c) {
        Some(hex) => text.replace(escaped, &hex, None),
        None => Ok(()),
    }
}

fn apply_unescaping(m: &RuleMatch, text: &mut StyledText, _: &ParseContext) -> Result<(), TextError> {
    let decoded = decode_placeholder(text.substring(m.start() + 1..m.end())?);
    match decoded {
        Some(c) => text.replace(m.range(), c.encode_utf8(&mut [0; 4]), None),
        None => Ok(()),
    }
}

fn apply_code_escaping(
    m: &RuleMatch,
    text: &mut StyledText,
    _: &ParseContext,
) -> Result<(), TextError> {
    let Some(content) = m.group(2) else {
        return Ok(());
    };
    let hex = encode_utf16_hex(text.substring(content.clone())?);
    text.replace(content, &hex, None)
}

fn apply_code_span(
    m: &RuleMatch,
    text: &mut StyledText,
    ctx: &ParseContext,
    decode: bool,
) -> Result<(), TextError> {
    let (Some(open), Some(content), Some(close)) = (m.group(1), m.group(2), m.group(3)) else {
        return Ok(());
    };
    text.delete(close)?;
    let decoded = if decode {
        decode_utf16_hex(text.substring(content.clone())?)
    } else {
        None
    };
    let content = match decoded {
        Some(decoded) => {
            text.replace(content.clone(), &decoded, None)?;
            content.start..content.start + decoded.len()
        }
        None => content,
    };
    text.add_attributes(content, &ctx.stylesheet.monospace_attributes)?;
    text.delete(open)
}

fn apply_header(m: &RuleMatch, text: &mut StyledText, ctx: &ParseContext) -> Result<(), TextError> {
    let Some((lead, content, level)) = lead_and_content(m) else {
        return Ok(());
    };
    if let Some(attrs) = level_attributes(&ctx.stylesheet.header_attributes, level.saturating_sub(1)) {
        text.add_attributes(content, attrs)?;
    }
    text.delete(lead)
}

fn apply_list(m: &RuleMatch, text: &mut StyledText, ctx: &ParseContext) -> Result<(), TextError> {
    let Some((lead, content, indent)) = lead_and_content(m) else {
        return Ok(());
    };
    if let Some(attrs) = level_attributes(&ctx.stylesheet.list_attributes, indent) {
        text.add_attributes(content, attrs)?;
        text.add_attributes(lead.clone(), attrs)?;
    }
    let marker: String = std::iter::repeat(NBSP)
        .take(indent)
        .chain([BULLET, NBSP])
        .collect();
    text.replace(lead, &marker, None)
}

fn apply_numbered_list(
    m: &RuleMatch,
    text: &mut StyledText,
    ctx: &ParseContext,
) -> Result<(), TextError> {
    let Some((lead, content, indent)) = lead_and_content(m) else {
        return Ok(());
    };
    if let Some(attrs) = level_attributes(&ctx.stylesheet.numbered_list_attributes, indent) {
        text.add_attributes(content, attrs)?;
        text.add_attributes(lead.clone(), attrs)?;
    }
    let marker: String = text
        .substring(lead.clone())?
        .chars()
        .map(|c| if c == ' ' || c == '\t' { NBSP } else { c })
        .collect();
    text.replace(lead, &marker, None)
}

fn apply_quote(m: &RuleMatch, text: &mut StyledText, ctx: &ParseContext) -> Result<(), TextError> {
    let Some((lead, content, level)) = lead_and_content(m) else {
        return Ok(());
    };
    if let Some(attrs) = level_attributes(&ctx.stylesheet.quote_attributes, level.saturating_sub(1)) {
        text.add_attributes(content, attrs)?;
    }
    text.replace(lead, &"\t".repeat(level), None)
}

fn apply_image(m: &RuleMatch, text: &mut StyledText, ctx: &ParseContext) -> Result<(), TextError> {
    let (Some(alt), Some(path)) = (m.group(1), m.group(2)) else {
        return Ok(());
    };
    let source = decode_escapes(text.substring(path)?);
    match ctx.images().resolve(&source) {
        Some(size) => {
            log::trace!("image '{source}' resolved to {}x{}", size.width, size.height);
            let attrs = ctx.stylesheet.image_attributes.clone().with_attachment(Attachment {
                source,
                width: size.width,
                height: size.height,
            });
            let placeholder = OBJECT_REPLACEMENT.to_string();
            text.replace(m.range(), &placeholder, None)?;
            text.add_attributes(m.start()..m.start() + placeholder.len(), &attrs)
        }
        None => {
            log::trace!("image '{source}' not found, using alt text");
            let alt_text = text.substring(alt)?.to_string();
            text.replace(m.range(), &alt_text, None)?;
            text.add_attributes(
                m.start()..m.start() + alt_text.len(),
                &ctx.stylesheet.alt_text_attributes,
            )
        }
    }
}

fn apply_link(m: &RuleMatch, text: &mut StyledText, ctx: &ParseContext) -> Result<(), TextError> {
    let (Some(label), Some(target)) = (m.group(1), m.group(2)) else {
        return Ok(());
    };
    let url = ctx.links.resolve(&decode_escapes(text.substring(target)?));
    if url.is_none() {
        log::debug!("link target at {}..{} did not resolve", m.start(), m.end());
    }
    text.delete(label.end..m.end())?;
    let mut attrs = ctx.stylesheet.link_attributes.clone();
    attrs.link = url;
    text.add_attributes(label.clone(), &attrs)?;
    text.delete(m.start()..label.start)
}

fn apply_autolink(m: &RuleMatch, text: &mut StyledText, ctx: &ParseContext) -> Result<(), TextError> {
    if text.runs_in(m.range())?.any(|(_, attrs)| attrs.link.is_some()) {
        return Ok(());
    }
    let raw = decode_escapes(text.substring(m.range())?);
    let mut attrs = ctx.stylesheet.link_attributes.clone();
    attrs.link = ctx.links.resolve_bare(&raw);
    text.add_attributes(m.range(), &attrs)
}

/// Delete the closing delimiter, format the content, delete the opening one.
fn apply_enclosed<F>(m: &RuleMatch, text: &mut StyledText, format: F) -> Result<(), TextError>
where
    F: FnOnce(&mut StyledText, Range<usize>) -> Result<(), TextError>,
{
    let Some(content) = m.first_group() else {
        return Ok(());
    };
    text.delete(content.end..m.end())?;
    format(text, content.clone())?;
    text.delete(m.start()..content.start)
}

/// Apply `plain` to runs of `range`, or `upgraded` where `upgrade_if` holds.
fn upgrade_runs(
    text: &mut StyledText,
    range: Range<usize>,
    plain: &Attributes,
    upgraded: &Attributes,
    upgrade_if: fn(&Attributes) -> bool,
) -> Result<(), TextError> {
    let targets: Vec<(Range<usize>, bool)> = text
        .runs_in(range)?
        .map(|(run, attrs)| (run, upgrade_if(attrs)))
        .collect();
    for (run, upgrade) in targets {
        text.add_attributes(run, if upgrade { upgraded } else { plain })?;
    }
    Ok(())
}
