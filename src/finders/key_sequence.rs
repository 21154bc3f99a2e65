//! Key-sequence finder - detects runs typed by walking across the keyboard.

use std::sync::Arc;

use super::{FinderError, PatternFinder};
use crate::collection::PatternCollection;
use crate::keyboard::KeyboardLayout;
use crate::pattern::{Pattern, PatternKind};

const DEFAULT_MIN_LEN: usize = 3;

/// Finds maximal runs where every character repeats the previous one or sits
/// on a neighboring key.
pub struct KeySequenceFinder {
    layout: Arc<KeyboardLayout>,
    min_len: usize,
    bits_per_key: f64,
}

impl KeySequenceFinder {
    pub fn new(layout: Arc<KeyboardLayout>) -> Self {
        let bits_per_key = layout.average_degree().max(1.0).log2();
        Self {
            layout,
            min_len: DEFAULT_MIN_LEN,
            bits_per_key,
        }
    }

    /// Builds a finder over a built-in layout.
    ///
    /// # Errors
    ///
    /// Returns `FinderError::BackingDataUnavailable` for an unknown layout name.
    pub fn named(layout: &str) -> Result<Self, FinderError> {
        let layout =
            KeyboardLayout::named(layout).map_err(|e| FinderError::unavailable("key sequence", e))?;
        Ok(Self::new(Arc::new(layout)))
    }

    /// Shortest run reported.
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len.max(2);
        self
    }

    /// Cost of one step of a run: log2 of the layout's branching factor.
    pub fn bits_per_key(&self) -> f64 {
        self.bits_per_key
    }

    fn continues(&self, prev: char, curr: char) -> bool {
        prev == curr || self.layout.is_adjacent(prev, curr)
    }

    fn emit(&self, start: usize, end: usize, out: &mut PatternCollection) {
        if end - start < self.min_len {
            return;
        }
        let run_len = end - start;
        out.push(Pattern::spanning(
            start,
            end,
            PatternKind::KeySequence,
            run_len as f64 * self.bits_per_key,
            format!("keyboard sequence on {}", self.layout.name()),
        ));
    }
}

impl PatternFinder for KeySequenceFinder {
    fn name(&self) -> &str {
        "key sequence"
    }

    fn search(&self, text: &str) -> PatternCollection {
        let chars: Vec<char> = text.chars().collect();
        let mut collection = PatternCollection::new(text);
        if chars.is_empty() {
            return collection;
        }

        let mut run_start = 0;
        for i in 1..chars.len() {
            if !self.continues(chars[i - 1], chars[i]) {
                self.emit(run_start, i, &mut collection);
                run_start = i;
            }
        }
        self.emit(run_start, chars.len(), &mut collection);

        collection.filter();
        collection
    }
}
