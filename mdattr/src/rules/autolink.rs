//! Bare URL detection in plain text
//!
//! Recognizes `http://`, `https://`, `ftp://`, `mailto:` and `www.` prefixed
//! spans. Trailing sentence punctuation is not part of the URL, and neither is
//! a closing parenthesis without a matching opening one inside the span.

use super::pattern::{Pattern, RuleMatch};
use regex::Regex;

pub struct LinkDetector {
    candidate: Regex,
}

impl LinkDetector {
    pub fn new() -> Result<Self, regex::Error> {
        let candidate = Regex::new(r"(?i)\b(?:https?://|ftp://|mailto:|www\.)[^\s<>]+")?;
        Ok(Self { candidate })
    }
}

/// Length of `span` once trailing punctuation and unbalanced `)` are dropped.
fn trimmed_len(span: &str) -> usize {
    let mut end = span.len();
    loop {
        let Some(last) = span[..end].chars().next_back() else {
            return 0;
        };
        let drop = match last {
            '.' | ',' | ':' | ';' | '!' | '?' | '\'' | '"' => true,
            ')' => {
                let body = &span[..end];
                body.matches('(').count() < body.matches(')').count()
            }
            _ => false,
        };
        if !drop {
            return end;
        }
        end -= last.len_utf8();
    }
}

impl Pattern for LinkDetector {
    fn find_at(&self, haystack: &str, start: usize) -> Option<RuleMatch> {
        let mut from = start;
        while let Some(found) = self.candidate.find_at(haystack, from) {
            let len = trimmed_len(found.as_str());
            // A bare scheme such as "https://" with nothing after it is not a link.
            let prefix_only = found.as_str()[..len].ends_with("://")
                || found.as_str()[..len].eq_ignore_ascii_case("mailto:")
                || found.as_str()[..len].eq_ignore_ascii_case("www.");
            if len > 0 && !prefix_only {
                let end = found.start() + len;
                return Some(RuleMatch::new(found.start()..end, []));
            }
            from = found.end();
        }
        None
    }
}
