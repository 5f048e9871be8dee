//! Link target helpers shared by the parser and the serializer.
//!
//! - **Import**: turn the raw target of `[text](target)` or a bare URL into a
//!   [`Url`], percent-encoding characters a URL cannot carry.
//! - **Export**: decide whether a linked span can be written back as bare text
//!   (it reads exactly like its target) or needs `[text](target)` markup.

use percent_encoding::{percent_encode_byte, utf8_percent_encode, AsciiSet, CONTROLS};
use url::Url;

/// Characters encoded by default when a raw target does not parse as-is.
///
/// Everything outside the characters allowed somewhere in a URL path, query or
/// fragment. Non-ASCII is always encoded.
const TARGET_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

const BARE_PREFIXES: [&str; 5] = ["http://", "https://", "ftp://", "mailto:", "www."];

/// How link targets are turned into URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkOptions {
    /// Additional ASCII characters to percent-encode in targets that fail to
    /// parse as written.
    pub encode_extra: String,
    /// Base for relative targets such as `docs/intro.md`.
    pub base_url: Option<Url>,
}

impl LinkOptions {
    /// Resolve a raw link target.
    ///
    /// The target is tried as written, then percent-encoded, then joined onto
    /// [`LinkOptions::base_url`]. Returns `None` if all three fail.
    pub fn resolve(&self, raw: &str) -> Option<Url> {
        let target = raw.trim();
        if target.is_empty() {
            return None;
        }
        if let Ok(url) = Url::parse(target) {
            return Some(url);
        }
        let encoded = self.encode(target);
        if let Ok(url) = Url::parse(&encoded) {
            return Some(url);
        }
        self.base_url.as_ref().and_then(|base| base.join(&encoded).ok())
    }

    /// Resolve a bare URL found in running text.
    ///
    /// `www.` prefixed spans get an `http://` scheme.
    pub fn resolve_bare(&self, raw: &str) -> Option<Url> {
        if raw.get(..4).is_some_and(|head| head.eq_ignore_ascii_case("www.")) {
            Url::parse(&format!("http://{raw}")).ok()
        } else {
            Url::parse(raw).ok()
        }
    }

    fn encode(&self, target: &str) -> String {
        if self.encode_extra.is_empty() {
            return utf8_percent_encode(target, TARGET_ENCODE_SET).to_string();
        }
        let mut encoded = String::with_capacity(target.len());
        let mut buf = [0; 4];
        for c in target.chars() {
            if c.is_ascii() && self.encode_extra.contains(c) {
                encoded.push_str(percent_encode_byte(c as u8));
            } else {
                encoded.extend(utf8_percent_encode(c.encode_utf8(&mut buf), TARGET_ENCODE_SET));
            }
        }
        encoded
    }
}

/// Whether `text` reads exactly like `url`, so it can be written without markup.
///
/// Covers the normalizations URL parsing applies to bare links: a trailing `/`
/// on an empty path and the `http://` scheme added to `www.` hosts. Only text
/// with a prefix the link detector recognizes qualifies.
pub fn is_bare_link(text: &str, url: &Url) -> bool {
    let detectable = BARE_PREFIXES.iter().any(|prefix| {
        text.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    });
    if !detectable {
        return false;
    }
    let target = url.as_str();
    let with_slash = format!("{text}/");
    let with_scheme = format!("http://{text}");
    let with_both = format!("http://{text}/");
    [text, with_slash.as_str(), with_scheme.as_str(), with_both.as_str()]
        .iter()
        .any(|candidate| *candidate == target)
}
