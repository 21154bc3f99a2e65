//! Word list management module
//!
//! Handles loading and querying the dictionary used by the dictionary finder.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WordListError {
    #[error("Word list file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read word list file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Word list file is empty")]
    EmptyFile,
}

/// Read-only dictionary lookup used by the dictionary finder.
pub trait WordSource: Send + Sync {
    /// Cost in bits of guessing `word`, or `None` if it is not a word.
    fn lookup(&self, word: &str) -> Option<f64>;

    /// True if some word starts with `prefix` (a full word counts).
    fn is_prefix(&self, prefix: &str) -> bool;

    /// Number of distinct words.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How a word's cost is derived from the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ranking {
    /// `log2(rank + 1)`, rank 1 being the first line of the file.
    #[default]
    Ranked,
    /// `log2(len)` for every word.
    Uniform,
}

/// Returns the word list file path.
///
/// Priority:
/// 1. Environment variable `PWD_WORDLIST_PATH`
/// 2. Default path `./assets/wordlist.txt`
pub fn get_wordlist_path() -> PathBuf {
    std::env::var("PWD_WORDLIST_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./assets/wordlist.txt"))
}

/// In-memory dictionary, most common words first.
#[derive(Debug, Clone)]
pub struct WordList {
    ranks: HashMap<String, usize>,
    prefixes: HashSet<String>,
    ranking: Ranking,
}

impl WordList {
    /// Builds a list from words in rank order. Words are trimmed and
    /// lower-cased; duplicates keep their first rank.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ranks = HashMap::new();
        let mut prefixes = HashSet::new();

        for word in words {
            let word = word.as_ref().trim().to_lowercase();
            if word.is_empty() || ranks.contains_key(&word) {
                continue;
            }
            for (idx, c) in word.char_indices() {
                prefixes.insert(word[..idx + c.len_utf8()].to_string());
            }
            let rank = ranks.len() + 1;
            ranks.insert(word, rank);
        }

        Self {
            ranks,
            prefixes,
            ranking: Ranking::default(),
        }
    }

    pub fn with_ranking(mut self, ranking: Ranking) -> Self {
        self.ranking = ranking;
        self
    }

    /// Loads the word list from the path in `PWD_WORDLIST_PATH`.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File does not exist
    /// - File cannot be read
    /// - File is empty
    pub fn from_env() -> Result<Self, WordListError> {
        Self::from_path(get_wordlist_path())
    }

    /// Loads the word list from a specific file path, one word per line.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File does not exist
    /// - File cannot be read
    /// - File is empty
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, WordListError> {
        let path = path.as_ref();

        if !path.exists() {
            #[cfg(feature = "tracing")]
            tracing::error!("Word list loading FAILED: FileNotFound {:?}", path);
            return Err(WordListError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;

        if content.trim().is_empty() {
            #[cfg(feature = "tracing")]
            tracing::error!("Word list loading FAILED: Empty file {:?}", path);
            return Err(WordListError::EmptyFile);
        }

        let list = Self::from_words(content.lines());

        #[cfg(feature = "tracing")]
        tracing::info!("Word list loaded: {} words from {:?}", list.len(), path);

        Ok(list)
    }

    pub fn ranking(&self) -> Ranking {
        self.ranking
    }

    /// 1-based rank of `word`, if present.
    pub fn rank(&self, word: &str) -> Option<usize> {
        self.ranks.get(word).copied()
    }
}

impl WordSource for WordList {
    fn lookup(&self, word: &str) -> Option<f64> {
        let rank = self.rank(word)?;
        let bits = match self.ranking {
            Ranking::Ranked => ((rank + 1) as f64).log2(),
            Ranking::Uniform => (self.ranks.len().max(1) as f64).log2(),
        };
        Some(bits)
    }

    fn is_prefix(&self, prefix: &str) -> bool {
        self.prefixes.contains(prefix)
    }

    fn len(&self) -> usize {
        self.ranks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper to safely set env var in tests
    fn set_env(key: &str, value: &str) {
        // SAFETY: This is only for testing purposes in single-threaded test context
        unsafe { std::env::set_var(key, value); }
    }

    /// Helper to safely remove env var in tests
    fn remove_env(key: &str) {
        // SAFETY: This is only for testing purposes in single-threaded test context
        unsafe { std::env::remove_var(key); }
    }

    #[test]
    #[serial]
    fn test_get_wordlist_path_default() {
        remove_env("PWD_WORDLIST_PATH");

        let path = get_wordlist_path();
        assert_eq!(path, PathBuf::from("./assets/wordlist.txt"));
    }

    #[test]
    #[serial]
    fn test_get_wordlist_path_from_env() {
        let custom_path = "/custom/path/words.txt";
        set_env("PWD_WORDLIST_PATH", custom_path);

        let path = get_wordlist_path();
        assert_eq!(path, PathBuf::from(custom_path));

        remove_env("PWD_WORDLIST_PATH");
    }

    #[test]
    #[serial]
    fn test_from_env_file_not_found() {
        set_env("PWD_WORDLIST_PATH", "/nonexistent/path/words.txt");

        let result = WordList::from_env();
        assert!(matches!(result, Err(WordListError::FileNotFound(_))));

        remove_env("PWD_WORDLIST_PATH");
    }

    #[test]
    fn test_from_path_empty_file() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        write!(temp_file, "  \n\n").expect("Failed to write empty content");

        let result = WordList::from_path(temp_file.path());
        assert!(matches!(result, Err(WordListError::EmptyFile)));
    }

    #[test]
    fn test_from_path_success() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(temp_file, "Password").expect("Failed to write");
        writeln!(temp_file, "dragon").expect("Failed to write");
        writeln!(temp_file, "password").expect("Failed to write");

        let list = WordList::from_path(temp_file.path()).expect("Should load");
        assert_eq!(list.len(), 2);
        assert_eq!(list.rank("password"), Some(1));
        assert_eq!(list.rank("dragon"), Some(2));
    }

    #[test]
    fn test_ranked_lookup_cost() {
        let list = WordList::from_words(["password", "dragon", "monkey"]);
        assert_eq!(list.lookup("password"), Some(1.0));
        assert_eq!(list.lookup("monkey"), Some(2.0));
        assert_eq!(list.lookup("unknown"), None);
    }

    #[test]
    fn test_uniform_lookup_cost() {
        let list = WordList::from_words(["a1", "b2", "c3", "d4"]).with_ranking(Ranking::Uniform);
        assert_eq!(list.lookup("a1"), Some(2.0));
        assert_eq!(list.lookup("d4"), Some(2.0));
    }

    #[test]
    fn test_is_prefix_includes_full_words() {
        let list = WordList::from_words(["pass"]);
        assert!(list.is_prefix("p"));
        assert!(list.is_prefix("pas"));
        assert!(list.is_prefix("pass"));
        assert!(!list.is_prefix("passw"));
        assert!(!list.is_prefix("x"));
    }
}
