//! Pattern collection - all matches found over one fixed input string.

use crate::pattern::{Pattern, PatternError};

/// Matches over one input, in insertion order.
///
/// Insertion order only matters as a tie-break: when two patterns are equally
/// good, the one inserted first wins.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternCollection {
    source_text: String,
    len: usize,
    patterns: Vec<Pattern>,
}

impl PatternCollection {
    pub fn new(text: &str) -> Self {
        Self {
            source_text: text.to_string(),
            len: text.chars().count(),
            patterns: Vec::new(),
        }
    }

    /// Adds a pattern.
    ///
    /// # Errors
    ///
    /// Returns `PatternError::OutOfBounds` if the span reaches past the input.
    pub fn add(&mut self, pattern: Pattern) -> Result<(), PatternError> {
        if pattern.end() > self.len {
            return Err(PatternError::OutOfBounds {
                start: pattern.start(),
                end: pattern.end(),
                len: self.len,
            });
        }
        self.patterns.push(pattern);
        Ok(())
    }

    /// Finder-internal insert for spans computed from the input itself.
    pub(crate) fn push(&mut self, pattern: Pattern) {
        debug_assert!(pattern.end() <= self.len);
        self.patterns.push(pattern);
    }

    /// Appends `other`'s patterns after this collection's and re-filters.
    ///
    /// # Errors
    ///
    /// Returns `PatternError::SourceMismatch` if `other` was built over a
    /// different input; `self` is left untouched in that case.
    pub fn merge(&mut self, other: PatternCollection) -> Result<(), PatternError> {
        if other.source_text != self.source_text {
            return Err(PatternError::SourceMismatch);
        }
        self.patterns.extend(other.patterns);
        self.filter();
        Ok(())
    }

    /// Removes dominated patterns.
    ///
    /// P is dominated when some other Q spans all of P at no greater cost. When
    /// Q and P share span and cost, the earlier-inserted one survives.
    pub fn filter(&mut self) {
        let keep: Vec<bool> = (0..self.patterns.len())
            .map(|i| !self.is_dominated(i))
            .collect();
        let mut flags = keep.into_iter();
        self.patterns.retain(|_| flags.next().unwrap_or(true));
    }

    fn is_dominated(&self, i: usize) -> bool {
        let p = &self.patterns[i];
        self.patterns.iter().enumerate().any(|(j, q)| {
            if j == i || !q.contains(p) || q.cost() > p.cost() {
                return false;
            }
            // Exact twins: only an earlier twin may evict a later one.
            !(q.same_span(p) && q.cost() == p.cost() && j > i)
        })
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// Input length in characters.
    pub fn text_len(&self) -> usize {
        self.len
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The substring of the input a pattern covers.
    pub fn text_of(&self, pattern: &Pattern) -> String {
        self.source_text
            .chars()
            .skip(pattern.start())
            .take(pattern.span_len())
            .collect()
    }

    pub fn into_patterns(self) -> Vec<Pattern> {
        self.patterns
    }
}
