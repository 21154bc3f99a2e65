//! Pattern finders
//!
//! Each finder detects one kind of weakness and reports every span where it
//! occurs. Finders hold only read-only configuration, so one instance can serve
//! any number of concurrent searches.

mod char_class;
mod composite;
mod date;
mod dictionary;
mod key_sequence;
mod reverse;

pub use char_class::CharClassFinder;
pub use composite::CompositeFinder;
pub use date::{DateFinder, YearDigits, date_space_bits};
pub use dictionary::{DictionaryFinder, MatchStrategy};
pub use key_sequence::KeySequenceFinder;
pub use reverse::{REVERSAL_BITS, ReverseFinder};

use std::sync::Arc;
use thiserror::Error;

use crate::collection::PatternCollection;
use crate::keyboard::LayoutError;
use crate::substitution::SubstitutionError;
use crate::wordlist::WordListError;

/// Why a finder's backing data could not be obtained.
#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error(transparent)]
    WordList(#[from] WordListError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Substitutions(#[from] SubstitutionError),
}

#[derive(Error, Debug)]
pub enum FinderError {
    #[error("Backing data for the {finder} finder is unavailable: {source}")]
    BackingDataUnavailable {
        finder: &'static str,
        #[source]
        source: DataSourceError,
    },
}

impl FinderError {
    pub fn unavailable(finder: &'static str, source: impl Into<DataSourceError>) -> Self {
        FinderError::BackingDataUnavailable {
            finder,
            source: source.into(),
        }
    }

    /// Name of the finder that could not be built.
    pub fn finder(&self) -> &'static str {
        match self {
            FinderError::BackingDataUnavailable { finder, .. } => finder,
        }
    }
}

/// Detects one kind of weakness in a password.
///
/// `search` must be a pure function of `text` and the finder's configuration,
/// and must return an already-filtered collection over exactly `text`.
pub trait PatternFinder: Send + Sync {
    fn name(&self) -> &str;

    fn search(&self, text: &str) -> PatternCollection;
}

impl<F: PatternFinder + ?Sized> PatternFinder for Box<F> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn search(&self, text: &str) -> PatternCollection {
        (**self).search(text)
    }
}

impl<F: PatternFinder + ?Sized> PatternFinder for Arc<F> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn search(&self, text: &str) -> PatternCollection {
        (**self).search(text)
    }
}
