//! Composite finder - runs every registered finder and merges their matches.

use rayon::prelude::*;

use super::{FinderError, PatternFinder};
use crate::collection::PatternCollection;

/// Ordered set of finders run as one.
///
/// Registration order is the tie-break key: between equally good matches,
/// the one from the earlier-registered finder wins.
#[derive(Default)]
pub struct CompositeFinder {
    finders: Vec<Box<dyn PatternFinder>>,
}

impl CompositeFinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F: PatternFinder + 'static>(&mut self, finder: F) -> &mut Self {
        self.finders.push(Box::new(finder));
        self
    }

    pub fn with<F: PatternFinder + 'static>(mut self, finder: F) -> Self {
        self.register(finder);
        self
    }

    /// Registers a finder whose construction may have failed, skipping it
    /// when it did. Returns whether the finder was registered.
    pub fn register_or_skip<F: PatternFinder + 'static>(
        &mut self,
        finder: Result<F, FinderError>,
    ) -> bool {
        match finder {
            Ok(finder) => {
                self.register(finder);
                true
            }
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Skipping {} finder: {}", _e.finder(), _e);
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.finders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.finders.is_empty()
    }

    /// Names of the registered finders in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.finders.iter().map(|f| f.name()).collect()
    }
}

impl PatternFinder for CompositeFinder {
    fn name(&self) -> &str {
        "composite"
    }

    fn search(&self, text: &str) -> PatternCollection {
        // collect() keeps registration order whatever the scheduling
        let results: Vec<PatternCollection> =
            self.finders.par_iter().map(|f| f.search(text)).collect();

        let mut merged = PatternCollection::new(text);
        for (_finder, collection) in self.finders.iter().zip(results) {
            if let Err(_e) = merged.merge(collection) {
                #[cfg(feature = "tracing")]
                tracing::error!("Discarding matches from {} finder: {}", _finder.name(), _e);
            }
        }
        merged.filter();
        merged
    }
}
