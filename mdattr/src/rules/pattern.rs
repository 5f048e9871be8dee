//! Patterns the rule engine can search with
//!
//! A [`Pattern`] finds the first match at or after a byte offset. Regular
//! expressions are the usual implementation. Searching starts at the offset
//! while the text before it stays visible, so `^` and `\b` behave as they would
//! on the whole string.

use regex::Regex;
use std::ops::Range;

/// A single match: the overall range plus the ranges of its capture groups.
///
/// Group 0 is the whole match. Groups that did not participate are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    groups: Vec<Option<Range<usize>>>,
}

impl RuleMatch {
    pub fn new(range: Range<usize>, groups: impl IntoIterator<Item = Option<Range<usize>>>) -> Self {
        let mut all = vec![Some(range)];
        all.extend(groups);
        Self { groups: all }
    }

    pub fn range(&self) -> Range<usize> {
        self.groups[0].clone().unwrap_or(0..0)
    }

    pub fn start(&self) -> usize {
        self.range().start
    }

    pub fn end(&self) -> usize {
        self.range().end
    }

    /// Range of capture group `index`, if it participated in the match.
    pub fn group(&self, index: usize) -> Option<Range<usize>> {
        self.groups.get(index).cloned().flatten()
    }

    /// Number of groups, including group 0.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// The first capture group (index 1 or above) that participated.
    ///
    /// Alternations such as `\*\*(.+?)\*\*|__(.+?)__` put their content in
    /// different groups depending on which branch matched.
    pub fn first_group(&self) -> Option<Range<usize>> {
        (1..self.groups.len()).find_map(|i| self.group(i))
    }
}

/// Something the rule engine can search the buffer with.
pub trait Pattern: Send + Sync {
    /// Find the leftmost match that starts at or after `start`.
    fn find_at(&self, haystack: &str, start: usize) -> Option<RuleMatch>;
}

impl Pattern for Regex {
    fn find_at(&self, haystack: &str, start: usize) -> Option<RuleMatch> {
        let caps = self.captures_at(haystack, start)?;
        let whole = caps.get(0)?.range();
        let groups = (1..caps.len()).map(|i| caps.get(i).map(|m| m.range()));
        Some(RuleMatch::new(whole, groups))
    }
}
