//! Look-alike character substitutions ("l33t") undone before dictionary lookup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubstitutionError {
    #[error("Substitution table file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read substitution table file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Substitution table file is empty")]
    EmptyFile,
    #[error("Malformed substitution line {line}: {content:?}")]
    MalformedLine { line: usize, content: String },
}

/// Bits charged for matches needing the simple table.
pub const SIMPLE_BITS: f64 = 1.0;
/// Bits charged for matches needing the advanced table.
pub const ADVANCED_BITS: f64 = 2.0;

const SIMPLE_RULES: &[(char, &str)] = &[
    ('a', "4@"),
    ('e', "3"),
    ('i', "1"),
    ('o', "0"),
    ('s', "5$"),
    ('t', "7"),
];

const ADVANCED_RULES: &[(char, &str)] = &[
    ('a', "4@^"),
    ('b', "86"),
    ('c', "(<{["),
    ('e', "3"),
    ('g', "69"),
    ('i', "1!|"),
    ('l', "1|7"),
    ('o', "0"),
    ('s', "5$"),
    ('t', "7+"),
    ('x', "%"),
    ('z', "2"),
];

/// Maps each look-alike character to the letters it may stand for.
#[derive(Debug, Clone, PartialEq)]
pub struct SubstitutionTable {
    letters: HashMap<char, Vec<char>>,
    extra_bits: f64,
}

impl SubstitutionTable {
    /// Builds a table from `(letter, substitutes)` rules.
    pub fn from_rules<I, S>(rules: I, extra_bits: f64) -> Self
    where
        I: IntoIterator<Item = (char, S)>,
        S: AsRef<str>,
    {
        let mut letters: HashMap<char, Vec<char>> = HashMap::new();
        for (letter, substitutes) in rules {
            for sub in substitutes.as_ref().chars() {
                let entry = letters.entry(sub).or_default();
                if !entry.contains(&letter) {
                    entry.push(letter);
                }
            }
        }
        Self { letters, extra_bits }
    }

    /// Common digit and symbol look-alikes; one extra bit when used.
    pub fn simple() -> Self {
        Self::from_rules(SIMPLE_RULES.iter().copied(), SIMPLE_BITS)
    }

    /// Broader look-alike set; two extra bits when used.
    pub fn advanced() -> Self {
        Self::from_rules(ADVANCED_RULES.iter().copied(), ADVANCED_BITS)
    }

    /// Loads a table where each line is `letter sub1 sub2 ...`.
    ///
    /// Repeated letters accumulate their substitutes.
    ///
    /// # Errors
    ///
    /// Returns error if the file is missing, unreadable, empty, or a line has
    /// no substitutes.
    pub fn from_path<P: AsRef<Path>>(path: P, extra_bits: f64) -> Result<Self, SubstitutionError> {
        let path = path.as_ref();

        if !path.exists() {
            #[cfg(feature = "tracing")]
            tracing::error!("Substitution table loading FAILED: FileNotFound {:?}", path);
            return Err(SubstitutionError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Err(SubstitutionError::EmptyFile);
        }

        let mut rules = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split_whitespace();
            let letter = fields.next().and_then(single_char);
            let substitutes: String = fields.collect();
            match letter {
                Some(letter) if !substitutes.is_empty() => rules.push((letter, substitutes)),
                _ => {
                    return Err(SubstitutionError::MalformedLine {
                        line: idx + 1,
                        content: line.to_string(),
                    });
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::info!("Substitution table loaded: {} rules from {:?}", rules.len(), path);

        Ok(Self::from_rules(rules, extra_bits))
    }

    /// Letters `c` may stand for; empty if `c` is not a look-alike.
    pub fn letters_for(&self, c: char) -> &[char] {
        self.letters.get(&c).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Bits charged for a match that needed at least one substitution.
    pub fn extra_bits(&self) -> f64 {
        self.extra_bits
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
