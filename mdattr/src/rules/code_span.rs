//! Backtick code span matcher
//!
//! A code span opens with a maximal run of `n` backticks and closes at the
//! next run of exactly `n` backticks on the same line. The content between the
//! runs must not be empty. Backtick runs of other lengths inside the content
//! are part of it.
//!
//! Groups: 1 is the opening run, 2 the content, 3 the closing run.

use super::pattern::{Pattern, RuleMatch};

#[derive(Debug, Clone, Copy, Default)]
pub struct CodeSpanPattern;

fn run_len(bytes: &[u8], from: usize) -> usize {
    bytes[from..].iter().take_while(|&&b| b == b'`').count()
}

impl Pattern for CodeSpanPattern {
    fn find_at(&self, haystack: &str, start: usize) -> Option<RuleMatch> {
        let bytes = haystack.as_bytes();
        let mut pos = start;
        while pos < bytes.len() {
            if bytes[pos] != b'`' {
                pos += 1;
                continue;
            }
            let open = run_len(bytes, pos);
            let content_start = pos + open;
            let mut cursor = content_start;
            while cursor < bytes.len() && bytes[cursor] != b'\n' {
                if bytes[cursor] != b'`' {
                    cursor += 1;
                    continue;
                }
                let close = run_len(bytes, cursor);
                if close == open && cursor > content_start {
                    return Some(RuleMatch::new(
                        pos..cursor + close,
                        [
                            Some(pos..content_start),
                            Some(content_start..cursor),
                            Some(cursor..cursor + close),
                        ],
                    ));
                }
                cursor += close;
            }
            pos = content_start;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(text: &str) -> Vec<(usize, usize)> {
        let mut found = Vec::new();
        let mut at = 0;
        while let Some(m) = CodeSpanPattern.find_at(text, at) {
            let content = m.group(2).unwrap();
            found.push((content.start, content.end));
            at = m.end();
        }
        found
    }

    #[test]
    fn matches_single_backtick_span() {
        let m = CodeSpanPattern.find_at("a `b*c` d", 0).unwrap();
        assert_eq!(m.range(), 2..7);
        assert_eq!(m.group(1), Some(2..3));
        assert_eq!(m.group(2), Some(3..6));
        assert_eq!(m.group(3), Some(6..7));
    }

    #[test]
    fn closing_run_must_have_same_length() {
        assert_eq!(spans("``a ` b``"), vec![(2, 7)]);
        assert_eq!(spans("``a`"), vec![]);
    }

    #[test]
    fn spans_do_not_cross_lines() {
        assert_eq!(spans("`a\nb`"), vec![]);
        assert_eq!(spans("`a` and `b`"), vec![(1, 2), (9, 10)]);
    }

    #[test]
    fn empty_span_is_not_code() {
        assert_eq!(spans("`` x"), vec![]);
    }
}
