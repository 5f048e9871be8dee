use insta::assert_snapshot;
use mdattr::formats::markdown::serializer::{serialize, serialize_with};
use mdattr::{Attachment, Attributes, BulletStyle, Font, SerializerOptions, StyledText};
use url::Url;

fn bold() -> Attributes {
    Attributes::new().with_font(Font::bold(12.0))
}

fn italic() -> Attributes {
    Attributes::new().with_font(Font::italic(12.0))
}

fn bold_italic() -> Attributes {
    Attributes::new().with_font(Font::bold_italic(12.0))
}

fn styled(parts: &[(&str, Attributes)]) -> StyledText {
    let mut text = StyledText::new();
    for (part, attrs) in parts {
        text.push_str(part, attrs);
    }
    text
}

#[test]
fn test_unordered_list_from_plain_text() {
    let text = StyledText::plain("\u{2022}\u{a0}Some Text\n\u{2022}\u{a0}Some other text");
    assert_snapshot!(serialize(&text), @"+ Some Text\n+ Some other text");
}

#[test]
fn test_plain_punctuation_is_escaped() {
    let text = StyledText::plain(
        "This is text that has characters like *,+,- that aren't supposed to be converted to markdown.",
    );
    assert_eq!(
        serialize(&text),
        r"This is text that has characters like \*,\+,\- that aren't supposed to be converted to markdown."
    );
}

#[test]
fn test_paired_punctuation_is_escaped() {
    let text = StyledText::plain(
        "This is text that looks like it should be _italicized_ or **bolded**, but really isn't.",
    );
    assert_eq!(
        serialize(&text),
        r"This is text that looks like it should be \_italicized\_ or \*\*bolded\*\*, but really isn't."
    );
}

#[test]
fn test_italic_closing_before_bold_swaps_delimiters() {
    let text = styled(&[
        ("italic ", italic()),
        ("double", bold_italic()),
        (" bold", bold()),
    ]);
    assert_snapshot!(serialize(&text), @"_italic **double**_** bold**");
}

#[test]
fn test_bold_italic_opens_bold_first() {
    let text = styled(&[("both", bold_italic())]);
    assert_snapshot!(serialize(&text), @"**_both_**");
}

#[test]
fn test_markers_reopen_after_newline_past_list_lead() {
    let text = styled(&[
        ("\u{2022}\u{a0}", Attributes::new()),
        ("one\n", bold()),
        ("\u{2022}\u{a0}", Attributes::new()),
        ("two", bold()),
    ]);
    assert_snapshot!(serialize(&text), @"+ **one**\n+ **two**");
}

#[test]
fn test_styled_list_lead_is_not_wrapped() {
    let text = styled(&[("\u{2022}\u{a0}styled", bold())]);
    assert_snapshot!(serialize(&text), @"+ **styled**");
}

#[test]
fn test_bullet_style_options() {
    let text = StyledText::plain("\u{2022}\u{a0}a\n\u{a0}\u{2022}\u{a0}b");
    let star = SerializerOptions {
        bullet: BulletStyle::Star,
    };
    assert_eq!(serialize_with(&text, &star), "* a\n * b");
}

#[test]
fn test_link_inside_bold_closes_in_order() {
    let url = Url::parse("https://example.com/x").unwrap();
    let text = styled(&[
        ("see ", bold()),
        ("here", bold().with_link(url)),
        (" now", Attributes::new()),
    ]);
    assert_snapshot!(
        serialize(&text),
        @"**see **[**here**](https://example.com/x) now"
    );
}

#[test]
fn test_link_target_parentheses_are_encoded() {
    let url = Url::parse("https://example.com/a_(b)").unwrap();
    let text = styled(&[("wiki", Attributes::new().with_link(url))]);
    assert_snapshot!(serialize(&text), @"[wiki](https://example.com/a_%28b%29)");
}

#[test]
fn test_unresolved_image_placeholder_without_attachment() {
    let text = StyledText::plain("\u{fffc}");
    assert_eq!(serialize(&text), "\u{fffc}");

    let image = Attributes::new().with_attachment(Attachment {
        source: "img/cat.png".to_string(),
        width: 10,
        height: 10,
    });
    let text = styled(&[("\u{fffc}", image)]);
    assert_snapshot!(serialize(&text), @"![](img/cat.png)");
}

#[test]
fn test_nbsp_outside_lists_becomes_space() {
    let text = StyledText::plain("a\u{a0}b");
    assert_eq!(serialize(&text), "a b");
}

#[test]
fn test_period_after_number_mid_line_is_not_escaped() {
    let text = StyledText::plain("Version 2. Then 3.");
    assert_eq!(serialize(&text), "Version 2. Then 3.");
}

#[test]
fn test_unknown_attributes_are_plain_text() {
    let text = styled(&[(
        "colored",
        Attributes::new()
            .with_underline(true)
            .with_extra("highlight", "yellow"),
    )]);
    assert_eq!(serialize(&text), "colored");
}
