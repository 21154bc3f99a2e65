//! Reverse decorator - also searches the password typed backwards.

use super::PatternFinder;
use crate::collection::PatternCollection;

/// Extra bits charged for a match that only appears in the reversed password.
pub const REVERSAL_BITS: f64 = 1.0;

/// Wraps a finder so it also reports matches in the reversed input, mapped
/// back to original offsets.
pub struct ReverseFinder<F> {
    inner: F,
    name: String,
}

impl<F: PatternFinder> ReverseFinder<F> {
    pub fn new(inner: F) -> Self {
        let name = format!("reversed {}", inner.name());
        Self { inner, name }
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }
}

impl<F: PatternFinder> PatternFinder for ReverseFinder<F> {
    fn name(&self) -> &str {
        &self.name
    }

    fn search(&self, text: &str) -> PatternCollection {
        let mut collection = self.inner.search(text);
        let len = collection.text_len();

        let reversed: String = text.chars().rev().collect();
        for pattern in self.inner.search(&reversed).into_patterns() {
            collection.push(pattern.mirrored(len, REVERSAL_BITS));
        }

        collection.filter();
        collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finders::{DateFinder, DictionaryFinder, MatchStrategy};
    use crate::wordlist::WordList;
    use std::sync::Arc;

    fn dictionary(words: &[&str]) -> DictionaryFinder {
        DictionaryFinder::new(Arc::new(WordList::from_words(words.iter())), MatchStrategy::Exact)
    }

    #[test]
    fn test_finds_reversed_word() {
        let finder = ReverseFinder::new(dictionary(&["password"]));
        let result = finder.search("xdrowssap");

        assert_eq!(result.source_text(), "xdrowssap");
        assert_eq!(result.len(), 1);
        let p = &result.patterns()[0];
        assert_eq!((p.start(), p.end()), (1, 9));
        assert!(p.is_reversed());
        assert_eq!(p.label(), "reversed dictionary word 'password'");
        assert_eq!(p.cost(), 1.0 + REVERSAL_BITS);
    }

    #[test]
    fn test_keeps_direct_matches() {
        let inner = dictionary(&["dragon", "monkey"]);
        let direct = inner.search("dragonyeknom");
        let finder = ReverseFinder::new(inner);
        let result = finder.search("dragonyeknom");

        for p in direct.patterns() {
            assert!(result.patterns().contains(p), "missing direct match {}", p);
        }
        assert!(result.patterns().iter().any(|p| p.is_reversed() && p.start() == 6));
    }

    #[test]
    fn test_palindrome_keeps_direct_match_only() {
        let finder = ReverseFinder::new(dictionary(&["level"]));
        let result = finder.search("level");
        assert_eq!(result.len(), 1);
        assert!(!result.patterns()[0].is_reversed());
    }

    #[test]
    fn test_offsets_use_characters() {
        let finder = ReverseFinder::new(DateFinder::new());
        let result = finder.search("é7991.50.11");
        assert!(result
            .patterns()
            .iter()
            .any(|p| p.is_reversed() && (p.start(), p.end()) == (1, 11)));
    }

    #[test]
    fn test_name() {
        let finder = ReverseFinder::new(DateFinder::new());
        assert_eq!(finder.name(), "reversed date");
    }
}
