//! Pattern model - a single matched weakness over a span of the password.

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatternError {
    #[error("Pattern span is empty or inverted: [{start}, {end})")]
    EmptySpan { start: usize, end: usize },
    #[error("Pattern cost must be finite and non-negative, got {0}")]
    InvalidCost(f64),
    #[error("Pattern span [{start}, {end}) exceeds input length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },
    #[error("Cannot merge collections built over different inputs")]
    SourceMismatch,
}

/// Character class used by the per-character fallback and by run detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    Digit,
    Lower,
    Upper,
    /// Printable ASCII punctuation and space.
    Symbol,
    /// Anything outside printable ASCII.
    Other,
}

impl CharClass {
    pub fn of(c: char) -> Self {
        match c {
            '0'..='9' => CharClass::Digit,
            'a'..='z' => CharClass::Lower,
            'A'..='Z' => CharClass::Upper,
            ' '..='~' => CharClass::Symbol,
            _ => CharClass::Other,
        }
    }

    pub fn alphabet_size(self) -> u32 {
        match self {
            CharClass::Digit => 10,
            CharClass::Lower => 26,
            CharClass::Upper => 26,
            CharClass::Symbol => 33,
            CharClass::Other => 100,
        }
    }

    /// Cost in bits of one character drawn uniformly from this class.
    pub fn bits(self) -> f64 {
        f64::from(self.alphabet_size()).log2()
    }

    pub fn name(self) -> &'static str {
        match self {
            CharClass::Digit => "digits",
            CharClass::Lower => "lowercase letters",
            CharClass::Upper => "uppercase letters",
            CharClass::Symbol => "symbols",
            CharClass::Other => "non-ASCII characters",
        }
    }
}

/// What kind of weakness a pattern represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    Dictionary,
    Date,
    KeySequence,
    CharClass(CharClass),
    /// Implicit single-character fallback.
    Bruteforce(CharClass),
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternKind::Dictionary => write!(f, "dictionary"),
            PatternKind::Date => write!(f, "date"),
            PatternKind::KeySequence => write!(f, "key sequence"),
            PatternKind::CharClass(class) => write!(f, "character class ({})", class.name()),
            PatternKind::Bruteforce(class) => write!(f, "bruteforce ({})", class.name()),
        }
    }
}

/// A matched weakness over `[start, end)` in character offsets.
///
/// `cost` is the base-2 logarithm of the pattern's search space; lower means
/// easier to guess.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    start: usize,
    end: usize,
    kind: PatternKind,
    cost: f64,
    label: String,
    reversed: bool,
}

impl Pattern {
    /// Creates a pattern, validating its span and cost.
    ///
    /// # Errors
    ///
    /// Returns error if `start >= end` or `cost` is negative or not finite.
    pub fn new(
        start: usize,
        end: usize,
        kind: PatternKind,
        cost: f64,
        label: impl Into<String>,
    ) -> Result<Self, PatternError> {
        if start >= end {
            return Err(PatternError::EmptySpan { start, end });
        }
        if !cost.is_finite() || cost < 0.0 {
            return Err(PatternError::InvalidCost(cost));
        }
        Ok(Self::spanning(start, end, kind, cost, label))
    }

    /// Finder-internal constructor for spans already known to be valid.
    pub(crate) fn spanning(
        start: usize,
        end: usize,
        kind: PatternKind,
        cost: f64,
        label: impl Into<String>,
    ) -> Self {
        debug_assert!(start < end);
        Self {
            start,
            end,
            kind,
            cost,
            label: label.into(),
            reversed: false,
        }
    }

    /// Single-character fallback pattern at `offset`.
    pub(crate) fn bruteforce(offset: usize, c: char) -> Self {
        let class = CharClass::of(c);
        Self::spanning(
            offset,
            offset + 1,
            PatternKind::Bruteforce(class),
            class.bits(),
            format!("bruteforce {}", class.name()),
        )
    }

    /// Re-expresses a pattern found in the reversed input in original coordinates.
    pub(crate) fn mirrored(self, len: usize, extra_bits: f64) -> Self {
        Self {
            start: len - self.end,
            end: len - self.start,
            kind: self.kind,
            cost: self.cost + extra_bits,
            label: format!("reversed {}", self.label),
            reversed: true,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of characters covered.
    pub fn span_len(&self) -> usize {
        self.end - self.start
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// True when the pattern was found in the reversed password.
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// True when `self` covers all of `other`'s span.
    pub fn contains(&self, other: &Pattern) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    pub fn same_span(&self, other: &Pattern) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}) {} ({:.2} bits)",
            self.start, self.end, self.label, self.cost
        )
    }
}
