//! Finder configuration from environment variables.
//!
//! Backing data is loaded once here and shared by every finder that needs it.

use std::path::PathBuf;
use std::sync::Arc;

use crate::finders::{
    CharClassFinder, CompositeFinder, DateFinder, DictionaryFinder, FinderError,
    KeySequenceFinder, MatchStrategy, ReverseFinder,
};
use crate::keyboard::KeyboardLayout;
use crate::substitution::{ADVANCED_BITS, SubstitutionTable};
use crate::wordlist::{WordList, WordSource, get_wordlist_path};

const DEFAULT_LAYOUT: &str = "qwerty";

/// Where each finder's backing data comes from.
#[derive(Debug, Clone, PartialEq)]
pub struct FinderConfig {
    pub wordlist_path: PathBuf,
    pub keyboard_layout: String,
    /// Overrides `keyboard_layout` when set.
    pub keyboard_layout_path: Option<PathBuf>,
    /// Built-in advanced table when unset.
    pub l33t_path: Option<PathBuf>,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            wordlist_path: PathBuf::from("./assets/wordlist.txt"),
            keyboard_layout: DEFAULT_LAYOUT.to_string(),
            keyboard_layout_path: None,
            l33t_path: None,
        }
    }
}

impl FinderConfig {
    /// Reads the configuration.
    ///
    /// # Environment Variables
    ///
    /// - `PWD_WORDLIST_PATH`: word list file (default `./assets/wordlist.txt`)
    /// - `PWD_KEYBOARD_LAYOUT`: built-in layout name (default `qwerty`)
    /// - `PWD_KEYBOARD_LAYOUT_PATH`: custom layout file, overrides the name
    /// - `PWD_L33T_PATH`: substitution table file
    pub fn from_env() -> Self {
        Self {
            wordlist_path: get_wordlist_path(),
            keyboard_layout: std::env::var("PWD_KEYBOARD_LAYOUT")
                .unwrap_or_else(|_| DEFAULT_LAYOUT.to_string()),
            keyboard_layout_path: std::env::var("PWD_KEYBOARD_LAYOUT_PATH").ok().map(PathBuf::from),
            l33t_path: std::env::var("PWD_L33T_PATH").ok().map(PathBuf::from),
        }
    }

    /// Builds the default finder set, failing on the first finder whose
    /// backing data cannot be loaded.
    ///
    /// Registration order: dictionary, reversed dictionary, date, key
    /// sequence, character class.
    ///
    /// # Errors
    ///
    /// Returns `FinderError::BackingDataUnavailable` naming the failed finder.
    pub fn build(&self) -> Result<CompositeFinder, FinderError> {
        let words = self.load_words()?;
        let table = self.load_table()?;
        let layout = self.load_layout()?;

        let mut composite = CompositeFinder::new();
        register_dictionaries(&mut composite, words, table);
        composite
            .register(DateFinder::new())
            .register(KeySequenceFinder::new(layout))
            .register(CharClassFinder::new());

        #[cfg(feature = "tracing")]
        tracing::info!("Finders ready: {:?}", composite.names());

        Ok(composite)
    }

    /// Builds the default finder set, skipping finders whose backing data
    /// cannot be loaded.
    pub fn build_lenient(&self) -> CompositeFinder {
        let mut composite = CompositeFinder::new();

        match (self.load_words(), self.load_table()) {
            (Ok(words), Ok(table)) => register_dictionaries(&mut composite, words, table),
            (Err(_e), _) | (_, Err(_e)) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Skipping dictionary finders: {}", _e);
            }
        }
        composite.register(DateFinder::new());
        composite.register_or_skip(self.load_layout().map(KeySequenceFinder::new));
        composite.register(CharClassFinder::new());

        #[cfg(feature = "tracing")]
        tracing::info!("Finders ready: {:?}", composite.names());

        composite
    }

    fn load_words(&self) -> Result<Arc<dyn WordSource>, FinderError> {
        let list = WordList::from_path(&self.wordlist_path)
            .map_err(|e| FinderError::unavailable("dictionary", e))?;
        let words: Arc<dyn WordSource> = Arc::new(list);
        Ok(words)
    }

    fn load_table(&self) -> Result<Arc<SubstitutionTable>, FinderError> {
        let table = match &self.l33t_path {
            Some(path) => SubstitutionTable::from_path(path, ADVANCED_BITS)
                .map_err(|e| FinderError::unavailable("dictionary", e))?,
            None => SubstitutionTable::advanced(),
        };
        Ok(Arc::new(table))
    }

    fn load_layout(&self) -> Result<Arc<KeyboardLayout>, FinderError> {
        let layout = match &self.keyboard_layout_path {
            Some(path) => KeyboardLayout::from_path(path),
            None => KeyboardLayout::named(&self.keyboard_layout),
        }
        .map_err(|e| FinderError::unavailable("key sequence", e))?;
        Ok(Arc::new(layout))
    }
}

fn register_dictionaries(
    composite: &mut CompositeFinder,
    words: Arc<dyn WordSource>,
    table: Arc<SubstitutionTable>,
) {
    composite
        .register(DictionaryFinder::new(
            Arc::clone(&words),
            MatchStrategy::Normalized(table),
        ))
        .register(ReverseFinder::new(DictionaryFinder::new(
            words,
            MatchStrategy::Exact,
        )));
}
