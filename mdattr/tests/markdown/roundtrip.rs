use super::PARSER;
use mdattr::formats::markdown::serializer::serialize;

fn assert_round_trip(markdown: &str) {
    let text = PARSER.parse(markdown).expect("Failed to parse markdown");
    assert_eq!(serialize(&text), markdown, "round trip of {markdown:?}");
}

#[test]
fn test_text_with_no_formatting() {
    assert_round_trip("Some text that does not have formatting");
}

#[test]
fn test_bold_across_two_lines() {
    assert_round_trip("Some text **that has bolded**   \n**text across two lines**");
}

#[test]
fn test_bold_inside_italic() {
    assert_round_trip("Some text that has _italics and **bold**_");
}

#[test]
fn test_nested_emphasis() {
    for markdown in ["**a _b_ c**", "_a **b** c_"] {
        assert_round_trip(markdown);
    }
}

#[test]
fn test_overlapping_emphasis() {
    for markdown in [
        "**Markdown _double_**_ something_",
        "_italic **double**_** bold**",
    ] {
        assert_round_trip(markdown);
    }
}

#[test]
fn test_lots_of_cases() {
    for markdown in [
        "Bible **studies**\n\n+ jailed\n+ skd\n+ skd",
        "hello",
        "**something**",
        "bible **studies**\n**open the door**",
    ] {
        assert_round_trip(markdown);
    }
}

#[test]
fn test_numbered_lists() {
    assert_round_trip("1. Hi\n2. Hi\n3. Hi\n");
}

#[test]
fn test_numbered_lists_with_formatting() {
    for markdown in [
        "1. **this list has some bolded strings**\n2. **does it translate?**",
        "1. _this list has some bolded strings_\n2. **does it translate?**",
        "1. **this list has some bolded strings**\n2. _does it translate?_",
        "1. _this list has some bolded strings_\n2. _does it translate?_",
        "1. **this list has some bolded strings**\n2. **does it translate?**\n\n_I am also writing something in italics_",
    ] {
        assert_round_trip(markdown);
    }
}

#[test]
fn test_bulleted_lists() {
    assert_round_trip("+ Hi\n+ hi\n+ Hi");
}

#[test]
fn test_bulleted_lists_with_formatting() {
    for markdown in [
        "+ **this list has some bolded strings**\n+ **does it translate?**",
        "+ _this list has some bolded strings_\n+ **does it translate?**",
        "+ **this list has some bolded strings**\n+ _does it translate?_",
        "+ _this list has some bolded strings_\n+ _does it translate?_",
        "+ **this list has some bolded strings**\n+ **does it translate?**\n\n_I am also writing something in italics_",
    ] {
        assert_round_trip(markdown);
    }
}

#[test]
fn test_bulleted_followed_by_numbered() {
    assert_round_trip("+ a bullet\n1. a number\n2. another number");
}

#[test]
fn test_two_line_breaks() {
    assert_round_trip("Some text\n\nthat has two line breaks between it");
}

#[test]
fn test_unordered_list_with_styles() {
    assert_round_trip("+ Item 1\n+ Item 2\n+ **Bolded Item 3**\n+ _Italicized Item 4_");
}

#[test]
fn test_levelled_lists() {
    for markdown in [
        "+ Level One\n + Level Two\n  + Level Three",
        "1. Level One\n 1. Level Two\n  1. Level Three",
    ] {
        assert_round_trip(markdown);
    }
}

#[test]
fn test_escaped_punctuation() {
    assert_round_trip(r"\*not bold\* and \_not italic\_ \[not a link\]");
}

#[test]
fn test_code_spans() {
    for markdown in ["run `cargo test` now", "a ``b`c`` d"] {
        assert_round_trip(markdown);
    }
}

#[test]
fn test_links() {
    for markdown in [
        "see [the docs](https://example.com/docs) for more",
        "bare https://example.com/ link",
        "bare https://my-site.com/a+b#top link",
    ] {
        assert_round_trip(markdown);
    }
}

#[test]
fn test_empty_input() {
    assert_round_trip("");
}
