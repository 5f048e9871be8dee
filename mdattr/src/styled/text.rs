//! The styled text buffer
//!
//! A [`StyledText`] is a UTF-8 string plus a run list. Runs tile the text
//! exactly: their lengths sum to the text length, none is empty, and two
//! neighbours never carry equal attributes. Every mutation re-establishes those
//! properties, so enumeration always yields maximal runs left to right.
//!
//! Offsets are byte offsets. A range whose ends do not fall on character
//! boundaries, that points past the end, or whose start is after its end is
//! rejected with a [`TextError`] instead of being clamped.

use super::attributes::Attributes;
use crate::error::{TextError, TextErrorKind};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::Range;

#[derive(Debug, Clone, PartialEq)]
struct Run {
    len: usize,
    attributes: Attributes,
}

/// Text with per-range style attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyledText {
    text: String,
    runs: Vec<Run>,
}

impl StyledText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text covered by a single run of `attributes`.
    pub fn with_attributes(text: impl Into<String>, attributes: Attributes) -> Self {
        let mut styled = Self::new();
        styled.push_str(&text.into(), &attributes);
        styled
    }

    /// Text without any attributes set.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::with_attributes(text, Attributes::default())
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn substring(&self, range: Range<usize>) -> Result<&str, TextError> {
        self.check_range(&range)?;
        Ok(&self.text[range])
    }

    /// Attributes of the character starting at `index`.
    pub fn attributes_at(&self, index: usize) -> Result<&Attributes, TextError> {
        let len = self.len();
        if index >= len {
            return Err(TextError::new(TextErrorKind::InvalidBounds, index, index, len));
        }
        if !self.text.is_char_boundary(index) {
            return Err(TextError::new(
                TextErrorKind::NotOnCharBoundary,
                index,
                index,
                len,
            ));
        }
        let mut offset = 0;
        for run in &self.runs {
            if index < offset + run.len {
                return Ok(&run.attributes);
            }
            offset += run.len;
        }
        Err(TextError::new(TextErrorKind::InvalidBounds, index, index, len))
    }

    /// Append `text` styled with `attributes`.
    pub fn push_str(&mut self, text: &str, attributes: &Attributes) {
        if text.is_empty() {
            return;
        }
        self.text.push_str(text);
        self.runs.push(Run {
            len: text.len(),
            attributes: attributes.clone(),
        });
        self.normalize();
    }

    /// Replace `range` with `text`.
    ///
    /// Without explicit attributes the new text inherits from the first
    /// replaced character. For an empty range it inherits from the preceding
    /// character, or from the following one at the very start.
    pub fn replace(
        &mut self,
        range: Range<usize>,
        text: &str,
        attributes: Option<&Attributes>,
    ) -> Result<(), TextError> {
        self.check_range(&range)?;
        let attributes = match attributes {
            Some(attrs) => attrs.clone(),
            None => self.inherited_attributes(range.start, range.is_empty()),
        };

        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        let inserted = (!text.is_empty()).then(|| Run {
            len: text.len(),
            attributes,
        });
        self.runs.splice(first..last, inserted);
        self.text.replace_range(range, text);
        self.normalize();
        Ok(())
    }

    pub fn insert(
        &mut self,
        index: usize,
        text: &str,
        attributes: Option<&Attributes>,
    ) -> Result<(), TextError> {
        self.replace(index..index, text, attributes)
    }

    pub fn delete(&mut self, range: Range<usize>) -> Result<(), TextError> {
        self.replace(range, "", None)
    }

    /// Merge `attributes` into every run overlapping `range`.
    pub fn add_attributes(
        &mut self,
        range: Range<usize>,
        attributes: &Attributes,
    ) -> Result<(), TextError> {
        self.check_range(&range)?;
        if range.is_empty() {
            return Ok(());
        }
        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        for run in &mut self.runs[first..last] {
            run.attributes.merge(attributes);
        }
        self.normalize();
        Ok(())
    }

    /// Overwrite the attributes of `range` with `attributes`.
    pub fn set_attributes(
        &mut self,
        range: Range<usize>,
        attributes: Attributes,
    ) -> Result<(), TextError> {
        self.check_range(&range)?;
        if range.is_empty() {
            return Ok(());
        }
        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        self.runs.splice(
            first..last,
            [Run {
                len: range.len(),
                attributes,
            }],
        );
        self.normalize();
        Ok(())
    }

    /// Maximal runs over the whole text.
    pub fn runs(&self) -> Runs<'_> {
        Runs {
            runs: self.runs.iter(),
            offset: 0,
            clip: 0..self.len(),
        }
    }

    /// Maximal runs overlapping `range`, each clipped to it.
    pub fn runs_in(&self, range: Range<usize>) -> Result<Runs<'_>, TextError> {
        self.check_range(&range)?;
        Ok(Runs {
            runs: self.runs.iter(),
            offset: 0,
            clip: range,
        })
    }

    fn check_range(&self, range: &Range<usize>) -> Result<(), TextError> {
        let len = self.len();
        let (start, end) = (range.start, range.end);
        if start > end {
            return Err(TextError::new(TextErrorKind::InvalidRange, start, end, len));
        }
        if end > len {
            return Err(TextError::new(TextErrorKind::InvalidBounds, start, end, len));
        }
        if !self.text.is_char_boundary(start) || !self.text.is_char_boundary(end) {
            return Err(TextError::new(
                TextErrorKind::NotOnCharBoundary,
                start,
                end,
                len,
            ));
        }
        Ok(())
    }

    fn inherited_attributes(&self, start: usize, empty_range: bool) -> Attributes {
        let index = if !empty_range && start < self.len() {
            Some(start)
        } else if start > 0 {
            self.text[..start].char_indices().next_back().map(|(i, _)| i)
        } else if !self.is_empty() {
            Some(0)
        } else {
            None
        };
        index
            .and_then(|i| self.attributes_at(i).ok())
            .cloned()
            .unwrap_or_default()
    }

    /// Ensure a run boundary at `offset` and return the index of the run that
    /// starts there (`runs.len()` at the end of the text).
    fn split_at(&mut self, offset: usize) -> usize {
        let mut start = 0;
        for index in 0..self.runs.len() {
            let len = self.runs[index].len;
            if offset == start {
                return index;
            }
            if offset < start + len {
                let head = offset - start;
                let tail = Run {
                    len: len - head,
                    attributes: self.runs[index].attributes.clone(),
                };
                self.runs[index].len = head;
                self.runs.insert(index + 1, tail);
                return index + 1;
            }
            start += len;
        }
        self.runs.len()
    }

    fn normalize(&mut self) {
        let mut merged: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.len == 0 {
                continue;
            }
            match merged.last_mut() {
                Some(prev) if prev.attributes == run.attributes => prev.len += run.len,
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}

impl From<&str> for StyledText {
    fn from(text: &str) -> Self {
        StyledText::plain(text)
    }
}

/// Iterator over `(range, attributes)` pairs produced by [`StyledText::runs`].
pub struct Runs<'a> {
    runs: std::slice::Iter<'a, Run>,
    offset: usize,
    clip: Range<usize>,
}

impl<'a> Iterator for Runs<'a> {
    type Item = (Range<usize>, &'a Attributes);

    fn next(&mut self) -> Option<Self::Item> {
        for run in self.runs.by_ref() {
            let start = self.offset;
            let end = start + run.len;
            self.offset = end;
            if start >= self.clip.end {
                return None;
            }
            let clipped = start.max(self.clip.start)..end.min(self.clip.end);
            if !clipped.is_empty() {
                return Some((clipped, &run.attributes));
            }
        }
        None
    }
}

#[derive(Serialize, Deserialize)]
struct SerializedRun {
    start: usize,
    end: usize,
    attributes: Attributes,
}

#[derive(Serialize, Deserialize)]
struct SerializedText {
    text: String,
    runs: Vec<SerializedRun>,
}

impl Serialize for StyledText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let runs = self
            .runs()
            .map(|(range, attributes)| SerializedRun {
                start: range.start,
                end: range.end,
                attributes: attributes.clone(),
            })
            .collect();
        SerializedText {
            text: self.text.clone(),
            runs,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StyledText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = SerializedText::deserialize(deserializer)?;
        let mut styled = StyledText::plain(raw.text);
        for run in raw.runs {
            styled
                .set_attributes(run.start..run.end, run.attributes)
                .map_err(D::Error::custom)?;
        }
        Ok(styled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styled::attributes::Font;

    fn bold() -> Attributes {
        Attributes::new().with_font(Font::bold(12.0))
    }

    fn collect(text: &StyledText) -> Vec<(Range<usize>, Attributes)> {
        text.runs().map(|(r, a)| (r, a.clone())).collect()
    }

    #[test]
    fn runs_are_maximal_after_edits() {
        let mut text = StyledText::plain("hello world");
        text.add_attributes(0..5, &bold()).unwrap();
        text.add_attributes(2..4, &bold()).unwrap();

        let runs = collect(&text);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], (0..5, bold()));
        assert_eq!(runs[1].0, 5..11);
    }

    #[test]
    fn replace_shifts_downstream_runs() {
        let mut text = StyledText::plain("a **b** c");
        text.add_attributes(4..5, &bold()).unwrap();
        text.delete(5..7).unwrap();
        text.delete(2..4).unwrap();

        assert_eq!(text.as_str(), "a b c");
        assert_eq!(text.attributes_at(2).unwrap(), &bold());
        assert!(text.attributes_at(3).unwrap().is_empty());
        let total: usize = text.runs().map(|(r, _)| r.len()).sum();
        assert_eq!(total, text.len());
    }

    #[test]
    fn replace_inherits_from_first_replaced_character() {
        let mut text = StyledText::plain("xy");
        text.add_attributes(1..2, &bold()).unwrap();
        text.replace(1..2, "zzz", None).unwrap();
        assert_eq!(text.as_str(), "xzzz");
        assert_eq!(text.attributes_at(3).unwrap(), &bold());
    }

    #[test]
    fn insert_inherits_from_preceding_character() {
        let mut text = StyledText::plain("ab");
        text.add_attributes(0..1, &bold()).unwrap();
        text.insert(1, "!", None).unwrap();
        assert_eq!(text.as_str(), "a!b");
        assert_eq!(text.attributes_at(1).unwrap(), &bold());

        text.insert(0, ">", None).unwrap();
        assert_eq!(text.attributes_at(0).unwrap(), &bold());
    }

    #[test]
    fn runs_in_clips_to_range() {
        let mut text = StyledText::plain("abcdef");
        text.add_attributes(2..4, &bold()).unwrap();
        let runs: Vec<_> = text.runs_in(1..3).unwrap().map(|(r, _)| r).collect();
        assert_eq!(runs, vec![1..2, 2..3]);
        assert_eq!(text.runs_in(3..3).unwrap().count(), 0);
    }

    #[test]
    fn out_of_bounds_ranges_are_rejected() {
        let mut text = StyledText::plain("abc");
        let err = text.delete(1..5).unwrap_err();
        assert_eq!(err.kind(), TextErrorKind::InvalidBounds);

        #[allow(clippy::reversed_empty_ranges)]
        let err = text.add_attributes(2..1, &bold()).unwrap_err();
        assert_eq!(err.kind(), TextErrorKind::InvalidRange);

        assert!(text.attributes_at(3).is_err());
        assert_eq!(text.as_str(), "abc");
    }

    #[test]
    fn ranges_must_fall_on_char_boundaries() {
        let mut text = StyledText::plain("café");
        let err = text.delete(3..4).unwrap_err();
        assert_eq!(err.kind(), TextErrorKind::NotOnCharBoundary);
        text.delete(3..5).unwrap();
        assert_eq!(text.as_str(), "caf");
    }

    #[test]
    fn deleting_everything_leaves_no_runs() {
        let mut text = StyledText::with_attributes("abc", bold());
        text.delete(0..3).unwrap();
        assert!(text.is_empty());
        assert_eq!(text.runs().count(), 0);
        text.insert(0, "x", None).unwrap();
        assert!(text.attributes_at(0).unwrap().is_empty());
    }

    #[test]
    fn json_round_trip_preserves_runs() {
        let mut text = StyledText::plain("plain bold");
        text.add_attributes(6..10, &bold()).unwrap();
        let json = serde_json::to_string(&text).unwrap();
        let back: StyledText = serde_json::from_str(&json).unwrap();
        assert_eq!(back, text);
    }

    #[test]
    fn json_with_bad_range_is_rejected() {
        let json = r#"{"text":"ab","runs":[{"start":0,"end":9,"attributes":{}}]}"#;
        assert!(serde_json::from_str::<StyledText>(json).is_err());
    }
}
