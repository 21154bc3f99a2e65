//! Password strength estimation by pattern decomposition
//!
//! Finders report the recognizable pieces of a password (dictionary words,
//! dates, keyboard walks, character-class runs) together with a cost in bits.
//! The analyzer then picks the cheapest way to cover the whole password with
//! those pieces, falling back to per-character bruteforce for anything left
//! over. The total cost is the strength estimate.
//!
//! # Features
//!
//! - `async` (default): Enables cancellable analysis and channel delivery
//! - `tracing`: Enables logging via tracing crate
//!
//! # Environment Variables
//!
//! - `PWD_WORDLIST_PATH`: Word list file, one word per line, most common first
//!   (default: `./assets/wordlist.txt`)
//! - `PWD_KEYBOARD_LAYOUT`: Built-in layout, `qwerty`, `qwertz` or `azerty`
//!   (default: `qwerty`)
//! - `PWD_KEYBOARD_LAYOUT_PATH`: Custom layout file, overrides the name
//! - `PWD_L33T_PATH`: Custom substitution table file
//!
//! # Example
//!
//! ```rust,no_run
//! use pwd_patterns::{FinderConfig, StrengthAnalyzer};
//! use secrecy::SecretString;
//!
//! // Load backing data once at startup
//! let finders = FinderConfig::from_env().build().expect("Failed to load finders");
//! let analyzer = StrengthAnalyzer::new(finders);
//!
//! let password = SecretString::new("nogardsummer".to_string().into());
//! let result = analyzer.analyze(&password);
//!
//! println!("Bits: {:.1}", result.total_cost_bits);
//! println!("Strength: {:?}", result.strength());
//! for pattern in &result.chosen_patterns {
//!     println!("  {}", pattern);
//! }
//! ```

// Internal modules
mod analyzer;
mod collection;
mod config;
mod keyboard;
mod pattern;
mod result;
mod substitution;
mod wordlist;

pub mod finders;

// Public API
pub use analyzer::{AnalysisError, StrengthAnalyzer, analyze, analyze_collection};
pub use collection::PatternCollection;
pub use config::FinderConfig;
pub use finders::{DataSourceError, FinderError, PatternFinder};
pub use keyboard::{KeyboardLayout, LayoutError};
pub use pattern::{CharClass, Pattern, PatternError, PatternKind};
pub use result::{AnalysisResult, CrackEstimate, DEFAULT_GUESSES_PER_SECOND, StrengthLevel};
pub use substitution::{ADVANCED_BITS, SIMPLE_BITS, SubstitutionError, SubstitutionTable};
pub use wordlist::{Ranking, WordList, WordListError, WordSource, get_wordlist_path};

#[cfg(feature = "async")]
pub use analyzer::analyze_tx;
