use super::PARSER;
use mdattr::formats::markdown::parser::{BULLET, NBSP};
use mdattr::formats::markdown::serializer::serialize;
use mdattr::{Font, FontFace, MarkdownParser, ParserOptions, StyledText};
use url::Url;

fn parse(markdown: &str) -> StyledText {
    PARSER.parse(markdown).expect("Failed to parse markdown")
}

fn font_at(text: &StyledText, index: usize) -> Option<Font> {
    text.attributes_at(index).expect("index in bounds").font
}

#[test]
fn test_header_levels_map_to_sizes() {
    let sizes = [23.0, 21.0, 19.0, 17.0, 15.0, 13.0];
    for (level, size) in (1..=6).zip(sizes) {
        let source = format!("{} Title", "#".repeat(level));
        let text = parse(&source);
        assert_eq!(text.as_str(), "Title");
        assert_eq!(font_at(&text, 0), Some(Font::bold(size)), "level {level}");
    }
}

#[test]
fn test_header_level_seven_clamps_to_last_size() {
    let text = parse("####### Seven");
    assert_eq!(text.as_str(), "Seven");
    assert_eq!(font_at(&text, 0), Some(Font::bold(13.0)));
}

#[test]
fn test_header_needs_space_and_line_start() {
    let text = parse("#hashtag and a # in text");
    assert_eq!(text.as_str(), "#hashtag and a # in text");
    assert_eq!(font_at(&text, 0), Some(Font::regular(12.0)));
}

#[test]
fn test_short_header_rule_accepts_touching_marker() {
    let mut parser = MarkdownParser::new();
    assert!(parser.add_short_header_rule(None));
    let text = parser.parse("#Title").unwrap();
    assert_eq!(text.as_str(), "Title");
    assert_eq!(font_at(&text, 0), Some(Font::bold(23.0)));
}

#[test]
fn test_bullet_markers_are_normalized() {
    for marker in ['*', '+', '-'] {
        let text = parse(&format!("{marker} item"));
        assert_eq!(text.as_str(), format!("{BULLET}{NBSP}item"));
        assert_eq!(serialize(&text), "+ item");
    }
}

#[test]
fn test_hello_with_bulleted_items() {
    let text = parse("Hello\n* item one\n* item two");
    assert_eq!(
        text.as_str(),
        "Hello\n\u{2022}\u{a0}item one\n\u{2022}\u{a0}item two"
    );

    let hello = text.attributes_at(0).unwrap();
    assert_eq!(hello.paragraph_indent, None);

    let item = text.as_str().find("item one").unwrap();
    let attrs = text.attributes_at(item).unwrap();
    assert_eq!(attrs.paragraph_indent, Some(1));
    assert_eq!(attrs.font, Some(Font::regular(12.0)));

    let marker = text.as_str().find(BULLET).unwrap();
    assert_eq!(text.attributes_at(marker).unwrap().paragraph_indent, Some(1));
}

#[test]
fn test_list_without_space_is_text() {
    let text = parse("-not a list");
    assert_eq!(text.as_str(), "-not a list");
}

#[test]
fn test_escaped_asterisks_are_literal() {
    let text = parse(r"\*not bold\*");
    assert_eq!(text.as_str(), "*not bold*");
    for index in 0..text.len() {
        assert_eq!(text.attributes_at(index).unwrap().font_face(), FontFace::Regular);
    }
}

#[test]
fn test_escaped_backslash_before_hex_digits() {
    let text = parse(r"\\abcd");
    assert_eq!(text.as_str(), r"\abcd");
}

#[test]
fn test_triple_delimiters_match_nested_identity() {
    let triple = parse("***triple***");
    assert_eq!(triple.as_str(), "triple");

    let nested = parse("**bold _and italic_**");
    let inner = nested.as_str().find("and").unwrap();

    assert_eq!(font_at(&triple, 0), font_at(&nested, inner));
    assert_eq!(font_at(&triple, 0), Some(Font::bold_italic(12.0)));
}

#[test]
fn test_underscore_strong_and_emphasis() {
    let text = parse("__strong__ and ___both___");
    assert_eq!(text.as_str(), "strong and both");
    assert_eq!(font_at(&text, 0).unwrap().face, FontFace::Bold);
    let both = text.as_str().find("both").unwrap();
    assert_eq!(font_at(&text, both).unwrap().face, FontFace::BoldItalic);
}

#[test]
fn test_unclosed_delimiters_pass_through() {
    let text = parse("**never closed and _dangling");
    assert_eq!(text.as_str(), "**never closed and _dangling");
}

#[test]
fn test_link_extraction() {
    let text = parse("read [the guide](https://example.com/guide) today");
    assert_eq!(text.as_str(), "read the guide today");

    let start = text.as_str().find("the guide").unwrap();
    let runs: Vec<_> = text
        .runs()
        .filter(|(_, attrs)| attrs.link.is_some())
        .collect();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].0, start..start + "the guide".len());
    assert_eq!(
        runs[0].1.link,
        Some(Url::parse("https://example.com/guide").unwrap())
    );
}

#[test]
fn test_link_target_with_escapes() {
    let text = parse(r"[x](https://example.com/a\_b)");
    let attrs = text.attributes_at(0).unwrap();
    assert_eq!(
        attrs.link.as_ref().map(Url::as_str),
        Some("https://example.com/a_b")
    );
}

#[test]
fn test_relative_link_uses_base_url() {
    let options = ParserOptions {
        base_url: Some(Url::parse("https://example.com/docs/").unwrap()),
        ..Default::default()
    };
    let parser = MarkdownParser::with_options(&options);
    let text = parser.parse("[intro](intro.md)").unwrap();
    assert_eq!(
        text.attributes_at(0).unwrap().link.as_ref().map(Url::as_str),
        Some("https://example.com/docs/intro.md")
    );
}

#[test]
fn test_autolink_skips_existing_links() {
    let text = parse("[https://a.example](https://b.example/)");
    assert_eq!(text.as_str(), "https://a.example");
    assert_eq!(
        text.attributes_at(0).unwrap().link.as_ref().map(Url::as_str),
        Some("https://b.example/")
    );
}

#[test]
fn test_quote_levels() {
    let text = parse("> one\n>>> three");
    assert_eq!(text.as_str(), "\tone\n\t\t\tthree");
    assert_eq!(text.attributes_at(1).unwrap().paragraph_indent, Some(1));
    let three = text.as_str().find("three").unwrap();
    assert_eq!(text.attributes_at(three).unwrap().paragraph_indent, Some(3));
}

#[test]
fn test_parse_with_explicit_attributes() {
    let base = mdattr::Attributes::new().with_font(Font::regular(20.0));
    let text = PARSER.parse_with_attributes("plain", Some(&base)).unwrap();
    assert_eq!(font_at(&text, 0), Some(Font::regular(20.0)));
}

#[test]
fn test_parse_styled_keeps_existing_runs() {
    let mut source = StyledText::plain("red **bold**");
    source
        .add_attributes(0..3, &mdattr::Attributes::new().with_extra("color", "red"))
        .unwrap();
    let text = PARSER.parse_styled(source).unwrap();
    assert_eq!(text.as_str(), "red bold");
    assert_eq!(
        text.attributes_at(0).unwrap().extra.get("color").map(String::as_str),
        Some("red")
    );
    assert_eq!(font_at(&text, 4).unwrap().face, FontFace::Bold);
}

#[test]
fn test_parser_is_shareable_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let text = PARSER.parse(&format!("**{i}**")).unwrap();
                text.attributes_at(0).unwrap().is_bold()
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
