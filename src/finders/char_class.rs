//! Character-class finder - detects runs drawn from a single restricted alphabet.

use super::PatternFinder;
use crate::collection::PatternCollection;
use crate::pattern::{CharClass, Pattern, PatternKind};

const DEFAULT_MIN_LEN: usize = 2;

#[derive(Debug, Clone)]
pub struct CharClassFinder {
    min_len: usize,
}

impl Default for CharClassFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl CharClassFinder {
    pub fn new() -> Self {
        Self {
            min_len: DEFAULT_MIN_LEN,
        }
    }

    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len.max(1);
        self
    }

    fn emit(&self, start: usize, end: usize, class: CharClass, out: &mut PatternCollection) {
        let run_len = end - start;
        if run_len < self.min_len {
            return;
        }
        out.push(Pattern::spanning(
            start,
            end,
            PatternKind::CharClass(class),
            run_len as f64 * class.bits(),
            format!("run of {} {}", run_len, class.name()),
        ));
    }
}

impl PatternFinder for CharClassFinder {
    fn name(&self) -> &str {
        "character class"
    }

    fn search(&self, text: &str) -> PatternCollection {
        let mut collection = PatternCollection::new(text);
        let mut run: Option<(usize, CharClass)> = None;
        let mut len = 0;

        for (i, c) in text.chars().enumerate() {
            let class = CharClass::of(c);
            match run {
                Some((_, current)) if current == class => {}
                Some((start, current)) => {
                    self.emit(start, i, current, &mut collection);
                    run = Some((i, class));
                }
                None => run = Some((i, class)),
            }
            len = i + 1;
        }
        if let Some((start, class)) = run {
            self.emit(start, len, class, &mut collection);
        }

        collection.filter();
        collection
    }
}
