//! Dictionary finder - detects words from a word list, optionally disguised by
//! capitalization or look-alike substitutions.

use std::sync::Arc;

use super::{FinderError, PatternFinder};
use crate::collection::PatternCollection;
use crate::pattern::{Pattern, PatternKind};
use crate::substitution::SubstitutionTable;
use crate::wordlist::{WordList, WordSource};

const DEFAULT_MIN_LEN: usize = 3;

/// Upper bound on normalized spellings tracked per start offset.
const MAX_CANDIDATES: usize = 32;

/// How substrings are compared against the word list.
#[derive(Debug, Clone)]
pub enum MatchStrategy {
    /// Case-insensitive exact match.
    Exact,
    /// Like `Exact`, but look-alike characters may also stand for the letters
    /// the table maps them to.
    Normalized(Arc<SubstitutionTable>),
}

#[derive(Debug, Clone)]
struct Candidate {
    word: String,
    substituted: bool,
}

pub struct DictionaryFinder {
    source: Arc<dyn WordSource>,
    strategy: MatchStrategy,
    min_len: usize,
}

impl DictionaryFinder {
    pub fn new(source: Arc<dyn WordSource>, strategy: MatchStrategy) -> Self {
        Self {
            source,
            strategy,
            min_len: DEFAULT_MIN_LEN,
        }
    }

    /// Builds a finder over the word list named by `PWD_WORDLIST_PATH`.
    ///
    /// # Errors
    ///
    /// Returns `FinderError::BackingDataUnavailable` if the list cannot be loaded.
    pub fn from_env(strategy: MatchStrategy) -> Result<Self, FinderError> {
        let list = WordList::from_env().map_err(|e| FinderError::unavailable("dictionary", e))?;
        Ok(Self::new(Arc::new(list), strategy))
    }

    /// Shortest span reported as a word.
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len.max(1);
        self
    }

    fn table(&self) -> Option<&SubstitutionTable> {
        match &self.strategy {
            MatchStrategy::Exact => None,
            MatchStrategy::Normalized(table) => Some(table),
        }
    }

    fn extend(&self, cand: &Candidate, letter: char, substituted: bool, next: &mut Vec<Candidate>) {
        let mut word = cand.word.clone();
        word.push(letter);
        if !self.source.is_prefix(&word) {
            return;
        }
        let substituted = cand.substituted || substituted;
        match next.iter_mut().find(|c| c.word == word) {
            Some(existing) => existing.substituted &= substituted,
            None => next.push(Candidate { word, substituted }),
        }
    }

    /// Cheapest dictionary reading among the candidates, if any is a word.
    fn best_word<'a>(&self, candidates: &'a [Candidate]) -> Option<(&'a Candidate, f64)> {
        let extra = self.table().map(SubstitutionTable::extra_bits).unwrap_or(0.0);
        candidates
            .iter()
            .filter_map(|cand| {
                let bits = self.source.lookup(&cand.word)?;
                Some((cand, if cand.substituted { bits + extra } else { bits }))
            })
            .fold(None, |best, (cand, bits)| match best {
                Some((_, best_bits)) if best_bits <= bits => best,
                _ => Some((cand, bits)),
            })
    }

    fn scan_from(&self, chars: &[char], start: usize, out: &mut PatternCollection) {
        let mut candidates = vec![Candidate {
            word: String::new(),
            substituted: false,
        }];

        for end in start..chars.len() {
            let c = chars[end];
            let folded = fold_case(c);
            let mut next = Vec::new();
            for cand in &candidates {
                self.extend(cand, folded, false, &mut next);
                if let Some(table) = self.table() {
                    for &letter in table.letters_for(c) {
                        if letter != folded {
                            self.extend(cand, letter, true, &mut next);
                        }
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            next.truncate(MAX_CANDIDATES);
            candidates = next;

            if end + 1 - start < self.min_len {
                continue;
            }
            if let Some((cand, bits)) = self.best_word(&candidates) {
                let cost = bits + case_bits(&chars[start..=end]);
                let label = if cand.substituted {
                    format!("dictionary word '{}' (l33t)", cand.word)
                } else {
                    format!("dictionary word '{}'", cand.word)
                };
                out.push(Pattern::spanning(start, end + 1, PatternKind::Dictionary, cost, label));
            }
        }
    }
}

impl PatternFinder for DictionaryFinder {
    fn name(&self) -> &str {
        "dictionary"
    }

    fn search(&self, text: &str) -> PatternCollection {
        let chars: Vec<char> = text.chars().collect();
        let mut collection = PatternCollection::new(text);
        if self.source.is_empty() {
            return collection;
        }
        for start in 0..chars.len() {
            self.scan_from(&chars, start, &mut collection);
        }
        collection.filter();
        collection
    }
}

fn fold_case(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Extra bits for capitalization: one bit for "Word" or "WORD", otherwise the
/// number of ways to place the minority case among the letters.
fn case_bits(span: &[char]) -> f64 {
    let upper = span.iter().filter(|c| c.is_uppercase()).count();
    let lower = span.iter().filter(|c| c.is_lowercase()).count();
    if upper == 0 {
        return 0.0;
    }
    if lower == 0 {
        return 1.0;
    }
    let first_letter_upper = span
        .iter()
        .find(|c| c.is_alphabetic())
        .is_some_and(|c| c.is_uppercase());
    if upper == 1 && first_letter_upper {
        return 1.0;
    }
    let letters = upper + lower;
    let variations: f64 = (1..=upper.min(lower))
        .map(|k| binomial(letters, k))
        .sum();
    variations.log2()
}

fn binomial(n: usize, k: usize) -> f64 {
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn finder(words: &[&str], strategy: MatchStrategy) -> DictionaryFinder {
        DictionaryFinder::new(Arc::new(WordList::from_words(words.iter())), strategy)
    }

    fn spans(c: &PatternCollection) -> Vec<(usize, usize)> {
        c.patterns().iter().map(|p| (p.start(), p.end())).collect()
    }

    #[test]
    fn test_finds_word_and_drops_dominated_subwords() {
        let f = finder(&["password", "pass", "word"], MatchStrategy::Exact);
        let result = f.search("mypassword1");

        assert_eq!(result.source_text(), "mypassword1");
        assert_eq!(spans(&result), vec![(2, 10)]);
        let p = &result.patterns()[0];
        assert_eq!(p.kind(), PatternKind::Dictionary);
        assert_eq!(p.cost(), 1.0);
        assert_eq!(p.label(), "dictionary word 'password'");
    }

    #[test]
    fn test_keeps_cheaper_subword() {
        let f = finder(&["pass", "password"], MatchStrategy::Exact);
        let result = f.search("password");
        assert_eq!(spans(&result), vec![(0, 4), (0, 8)]);
    }

    #[test]
    fn test_capitalization_costs_extra() {
        let f = finder(&["dragon"], MatchStrategy::Exact);
        let plain = f.search("dragon").patterns()[0].cost();
        let title = f.search("Dragon").patterns()[0].cost();
        let upper = f.search("DRAGON").patterns()[0].cost();
        let mixed = f.search("dRaGoN").patterns()[0].cost();

        assert_eq!(title, plain + 1.0);
        assert_eq!(upper, plain + 1.0);
        assert!(mixed > title);
    }

    #[test]
    fn test_exact_strategy_ignores_lookalikes() {
        let f = finder(&["password"], MatchStrategy::Exact);
        assert!(f.search("p4ssw0rd").is_empty());
    }

    #[test]
    fn test_normalized_strategy_undoes_substitutions() {
        let table = Arc::new(SubstitutionTable::simple());
        let f = finder(&["password"], MatchStrategy::Normalized(table));
        let result = f.search("p4ssw0rd");

        assert_eq!(spans(&result), vec![(0, 8)]);
        let p = &result.patterns()[0];
        assert_eq!(p.cost(), 2.0);
        assert!(p.label().contains("(l33t)"));
    }

    #[test]
    fn test_normalized_strategy_prefers_plain_spelling() {
        let table = Arc::new(SubstitutionTable::simple());
        let f = finder(&["password"], MatchStrategy::Normalized(table));
        let result = f.search("password");
        let p = &result.patterns()[0];
        assert_eq!(p.cost(), 1.0);
        assert!(!p.label().contains("l33t"));
    }

    #[test]
    fn test_ambiguous_lookalike() {
        let table = Arc::new(SubstitutionTable::advanced());
        let f = finder(&["love", "ice"], MatchStrategy::Normalized(table));
        let result = f.search("1ove");
        assert_eq!(spans(&result), vec![(0, 4)]);
        assert!(result.patterns()[0].label().contains("'love'"));
    }

    #[test]
    fn test_min_len() {
        let f = finder(&["ab", "abc"], MatchStrategy::Exact);
        assert_eq!(spans(&f.search("ab")), Vec::<(usize, usize)>::new());
        let f = finder(&["ab"], MatchStrategy::Exact).with_min_len(2);
        assert_eq!(spans(&f.search("ab")), vec![(0, 2)]);
    }

    #[test]
    fn test_empty_input() {
        let f = finder(&["password"], MatchStrategy::Exact);
        assert!(f.search("").is_empty());
    }

    #[test]
    #[serial]
    fn test_from_env_loads_wordlist() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(temp_file, "sunshine").expect("Failed to write");
        unsafe { std::env::set_var("PWD_WORDLIST_PATH", temp_file.path()); }

        let f = DictionaryFinder::from_env(MatchStrategy::Exact).expect("Should load");
        assert_eq!(spans(&f.search("sunshine!")), vec![(0, 8)]);

        unsafe { std::env::remove_var("PWD_WORDLIST_PATH"); }
    }

    #[test]
    #[serial]
    fn test_from_env_reports_missing_wordlist() {
        unsafe { std::env::set_var("PWD_WORDLIST_PATH", "/nonexistent/words.txt"); }

        let err = DictionaryFinder::from_env(MatchStrategy::Exact).err().expect("Should fail");
        assert_eq!(err.finder(), "dictionary");

        unsafe { std::env::remove_var("PWD_WORDLIST_PATH"); }
    }

    #[test]
    fn test_case_bits() {
        let chars: Vec<char> = "abc".chars().collect();
        assert_eq!(case_bits(&chars), 0.0);
        let chars: Vec<char> = "aBcd".chars().collect();
        // one upper among four letters, not first: log2(C(4,1))
        assert_eq!(case_bits(&chars), 2.0);
    }
}
