//! Hex placeholders used while parsing
//!
//! Escaped characters (`\*`) become `\` plus the four lowercase hex digits of
//! their code point (`\002a`). Code span contents become a bare run of such
//! four-digit groups, one per UTF-16 unit. Neither form contains markdown
//! punctuation, so the structural rules that run in between cannot see it.

/// Four-digit placeholder for `c`, or `None` outside the basic multilingual plane.
pub fn hex_placeholder(c: char) -> Option<String> {
    let code = u32::from(c);
    (code <= 0xFFFF).then(|| format!("{code:04x}"))
}

/// Encode every UTF-16 unit of `text` as four hex digits.
pub fn encode_utf16_hex(text: &str) -> String {
    text.encode_utf16().map(|unit| format!("{unit:04x}")).collect()
}

/// Decode a run of four-digit groups produced by [`encode_utf16_hex`].
///
/// Returns `None` when `hex` is not such a run or does not form valid UTF-16.
pub fn decode_utf16_hex(hex: &str) -> Option<String> {
    if hex.len() % 4 != 0 || !hex.bytes().all(is_placeholder_digit) {
        return None;
    }
    let units = hex
        .as_bytes()
        .chunks(4)
        .map(|chunk| std::str::from_utf8(chunk).ok().and_then(|s| u16::from_str_radix(s, 16).ok()))
        .collect::<Option<Vec<u16>>>()?;
    char::decode_utf16(units).collect::<Result<String, _>>().ok()
}

/// Character for a single four-digit placeholder, if it names one.
pub fn decode_placeholder(hex: &str) -> Option<char> {
    if hex.len() != 4 || !hex.bytes().all(is_placeholder_digit) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

/// Replace every `\xxxx` placeholder in `text` with the character it encodes.
///
/// Link targets are lifted out of the buffer before the final un-escaping
/// pass, so they are decoded here instead.
pub fn decode_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        match after.get(..4).and_then(decode_placeholder) {
            Some(c) => {
                out.push(c);
                rest = &after[4..];
            }
            None => {
                out.push('\\');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn is_placeholder_digit(b: u8) -> bool {
    b.is_ascii_digit() || (b'a'..=b'f').contains(&b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_lowercase_hex() {
        assert_eq!(hex_placeholder('*').as_deref(), Some("002a"));
        assert_eq!(hex_placeholder('é').as_deref(), Some("00e9"));
        assert_eq!(hex_placeholder('😀'), None);
    }

    #[test]
    fn code_content_round_trips_through_utf16() {
        let source = "a*b_😀";
        let hex = encode_utf16_hex(source);
        assert_eq!(&hex[..8], "0061002a");
        assert_eq!(decode_utf16_hex(&hex).as_deref(), Some(source));
        assert_eq!(decode_utf16_hex("00zz"), None);
        assert_eq!(decode_utf16_hex("006"), None);
    }

    #[test]
    fn decode_escapes_leaves_other_backslashes() {
        assert_eq!(decode_escapes(r"a\005fb\c\\"), r"a_b\c\\");
        assert_eq!(decode_escapes(r"\0029)"), "))");
    }
}
