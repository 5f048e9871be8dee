use super::PARSER;
use mdattr::formats::markdown::serializer::serialize;
use mdattr::StyledText;
use proptest::prelude::*;

fn styled_word() -> impl Strategy<Value = String> {
    ("[a-z]{1,8}", 0..3u8).prop_map(|(word, style)| match style {
        0 => word,
        1 => format!("**{word}**"),
        _ => format!("_{word}_"),
    })
}

proptest! {
    #[test]
    fn prop_plain_text_round_trips(source in "[a-zA-Z0-9 ,]{0,40}") {
        let text = PARSER.parse(&source).unwrap();
        prop_assert_eq!(text.as_str(), source.as_str());
        prop_assert_eq!(serialize(&text), source);
    }

    #[test]
    fn prop_styled_words_round_trip(words in prop::collection::vec(styled_word(), 1..8)) {
        let source = words.join(" ");
        let text = PARSER.parse(&source).unwrap();
        prop_assert_eq!(serialize(&text), source);
    }

    #[test]
    fn prop_bulleted_items_round_trip(
        items in prop::collection::vec((0..3usize, styled_word()), 1..5)
    ) {
        let source = items
            .iter()
            .map(|(indent, word)| format!("{}+ {word}", " ".repeat(*indent)))
            .collect::<Vec<_>>()
            .join("\n");
        let text = PARSER.parse(&source).unwrap();
        prop_assert_eq!(serialize(&text), source);
    }

    #[test]
    fn prop_escaped_punctuation_survives(source in r"[a-z *_#+!(){}\[\]\\`-]{0,40}") {
        let escaped = serialize(&StyledText::plain(source.as_str()));
        let text = PARSER.parse(&escaped).unwrap();
        prop_assert_eq!(text.as_str(), source.as_str());
    }
}
