//! Rule registry and parsing engine
//!
//! A [`RuleSet`] is an ordered list of rules. Each rule pairs a [`Pattern`]
//! with an action that rewrites the [`StyledText`] around a match. Rules run
//! in registration order and each one sees the output of the rules before it.
//! That layering is what lets escaping hide literal punctuation from the
//! emphasis rules that come later.
//!
//! # Engine loop
//!
//! For every rule, a cursor starts at 0. The engine asks the pattern for the
//! first match at or after the cursor and hands it to the action. It then
//! resumes at
//!
//! ```text
//! cursor = match.end + (len_after_action - len_before_action)
//! ```
//!
//! The formula compensates for text the action inserted or removed, so the
//! scan continues right after the rewritten region. Matches are searched
//! again after every action rather than collected up front, because an action
//! changes the offsets and content later matches depend on.
//!
//! Regular expressions go through the `regex` crate, which runs in linear time
//! in the input size. Rules cannot backtrack catastrophically.
//!
//! # Failure policy
//!
//! A pattern that fails to compile is logged and the rule is dropped. The rest
//! of the rule set registers and runs as usual. Actions only fail on buffer
//! contract violations, which abort the run.

pub mod autolink;
pub mod code_span;
pub mod pattern;

pub use autolink::LinkDetector;
pub use code_span::CodeSpanPattern;
pub use pattern::{Pattern, RuleMatch};

use crate::error::TextError;
use crate::styled::StyledText;
use regex::RegexBuilder;

/// Callback invoked for every match of a rule.
///
/// `C` is the context the owning parser passes to every action, typically its
/// attribute tables.
pub type Action<C> =
    Box<dyn Fn(&RuleMatch, &mut StyledText, &C) -> Result<(), TextError> + Send + Sync>;

/// Regex compile options for [`RuleSet::add_rule`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleFlags {
    /// `^` and `$` match at line boundaries.
    pub multi_line: bool,
    /// `.` also matches `\n`.
    pub dot_matches_new_line: bool,
    pub case_insensitive: bool,
}

impl RuleFlags {
    pub const NONE: RuleFlags = RuleFlags {
        multi_line: false,
        dot_matches_new_line: false,
        case_insensitive: false,
    };

    pub const MULTI_LINE: RuleFlags = RuleFlags {
        multi_line: true,
        dot_matches_new_line: false,
        case_insensitive: false,
    };

    pub const DOT_MATCHES_NEW_LINE: RuleFlags = RuleFlags {
        multi_line: false,
        dot_matches_new_line: true,
        case_insensitive: false,
    };
}

/// A registered rule. Immutable once added.
pub struct Rule<C> {
    name: String,
    pattern: Box<dyn Pattern>,
    action: Action<C>,
}

impl<C> Rule<C> {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Ordered collection of rules.
pub struct RuleSet<C> {
    rules: Vec<Rule<C>>,
}

impl<C> RuleSet<C> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Compile `pattern` and append it with `action`.
    ///
    /// Returns `false` (and logs a warning) when the pattern does not compile.
    /// The rule is skipped in that case.
    pub fn add_rule<F>(&mut self, name: &str, pattern: &str, flags: RuleFlags, action: F) -> bool
    where
        F: Fn(&RuleMatch, &mut StyledText, &C) -> Result<(), TextError> + Send + Sync + 'static,
    {
        let compiled = RegexBuilder::new(pattern)
            .multi_line(flags.multi_line)
            .dot_matches_new_line(flags.dot_matches_new_line)
            .case_insensitive(flags.case_insensitive)
            .build();
        match compiled {
            Ok(regex) => {
                self.add_pattern_rule(name, regex, action);
                true
            }
            Err(err) => {
                log::warn!("skipping rule '{name}': pattern {pattern:?} does not compile: {err}");
                false
            }
        }
    }

    /// Append a rule backed by any [`Pattern`] implementation.
    pub fn add_pattern_rule<P, F>(&mut self, name: &str, pattern: P, action: F)
    where
        P: Pattern + 'static,
        F: Fn(&RuleMatch, &mut StyledText, &C) -> Result<(), TextError> + Send + Sync + 'static,
    {
        log::debug!("registering rule '{name}' at position {}", self.rules.len());
        self.rules.push(Rule {
            name: name.to_string(),
            pattern: Box::new(pattern),
            action: Box::new(action),
        });
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule<C>> {
        self.rules.iter()
    }

    /// Rule names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(Rule::name).collect()
    }

    /// Run every rule, in order, over `text`.
    pub fn run(&self, text: &mut StyledText, context: &C) -> Result<(), TextError> {
        for rule in &self.rules {
            let mut cursor = 0;
            let mut applied = 0usize;
            while cursor <= text.len() {
                let Some(found) = rule.pattern.find_at(text.as_str(), cursor) else {
                    break;
                };
                let before = text.len();
                (rule.action)(&found, text, context)?;
                applied += 1;

                let mut next = (found.end() + text.len()).saturating_sub(before);
                if found.range().is_empty() && next <= cursor {
                    // An empty match that rewrote nothing would be found again.
                    // Edits before the match may have left `cursor` inside a character.
                    let mut from = cursor.min(text.len());
                    while !text.as_str().is_char_boundary(from) {
                        from += 1;
                    }
                    match text.as_str()[from..].chars().next() {
                        Some(c) => next = from + c.len_utf8(),
                        None => break,
                    }
                }
                while next < text.len() && !text.as_str().is_char_boundary(next) {
                    next += 1;
                }
                cursor = next;
            }
            log::trace!("rule '{}' applied {applied} time(s)", rule.name);
        }
        Ok(())
    }
}

impl<C> Default for RuleSet<C> {
    fn default() -> Self {
        Self::new()
    }
}
