//! Analysis output - the cheapest decomposition and what it implies.

use crate::pattern::Pattern;

/// Offline attack against a fast hash.
pub const DEFAULT_GUESSES_PER_SECOND: f64 = 1e10;

/// Below this many bits a password counts as low-entropy.
const WEAK_BITS: f64 = 36.0;
const MEDIUM_BITS: f64 = 60.0;
const STRONG_BITS: f64 = 80.0;
const EPIC_BITS: f64 = 128.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrackEstimate {
    /// Guesses needed at uniform-random-guess equivalence.
    pub guesses: f64,
    /// Seconds at the rate the estimate was computed for.
    pub seconds: f64,
}

impl CrackEstimate {
    pub fn from_bits(bits: f64) -> Self {
        Self::at_rate(bits, DEFAULT_GUESSES_PER_SECOND)
    }

    pub fn at_rate(bits: f64, guesses_per_second: f64) -> Self {
        let guesses = bits.exp2();
        Self {
            guesses,
            seconds: guesses / guesses_per_second,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StrengthLevel {
    Weak,
    Medium,
    Strong,
    Epic,
    God,
}

impl StrengthLevel {
    pub fn from_bits(bits: f64) -> Self {
        match bits {
            b if b < WEAK_BITS => StrengthLevel::Weak,
            b if b < MEDIUM_BITS => StrengthLevel::Medium,
            b if b < STRONG_BITS => StrengthLevel::Strong,
            b if b < EPIC_BITS => StrengthLevel::Epic,
            _ => StrengthLevel::God,
        }
    }
}

/// The minimum-cost covering of one password.
///
/// `chosen_patterns` is sorted by offset and partitions the whole password:
/// the first starts at 0, each ends where the next starts, the last ends at
/// the password length.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub total_cost_bits: f64,
    pub chosen_patterns: Vec<Pattern>,
    pub crack_estimate: CrackEstimate,
}

impl AnalysisResult {
    pub(crate) fn new(chosen_patterns: Vec<Pattern>) -> Self {
        let total_cost_bits = chosen_patterns.iter().fold(0.0, |acc, p| acc + p.cost());
        Self {
            total_cost_bits,
            chosen_patterns,
            crack_estimate: CrackEstimate::from_bits(total_cost_bits),
        }
    }

    pub fn strength(&self) -> StrengthLevel {
        StrengthLevel::from_bits(self.total_cost_bits)
    }

    /// Crack time in seconds for an attacker making `guesses_per_second`.
    pub fn crack_seconds_at(&self, guesses_per_second: f64) -> f64 {
        CrackEstimate::at_rate(self.total_cost_bits, guesses_per_second).seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::PatternKind;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= b.abs() * 1e-12
    }

    #[test]
    fn test_empty_result() {
        let result = AnalysisResult::new(Vec::new());
        assert_eq!(result.total_cost_bits, 0.0);
        assert_eq!(result.crack_estimate.guesses, 1.0);
        assert_eq!(result.strength(), StrengthLevel::Weak);
    }

    #[test]
    fn test_total_and_estimate() {
        let patterns = vec![
            Pattern::new(0, 2, PatternKind::Date, 10.0, "a").unwrap(),
            Pattern::new(2, 3, PatternKind::Date, 30.0, "b").unwrap(),
        ];
        let result = AnalysisResult::new(patterns);
        assert_eq!(result.total_cost_bits, 40.0);
        assert!(approx(result.crack_estimate.guesses, 2f64.powi(40)));
        assert!(approx(result.crack_estimate.seconds, 2f64.powi(40) / 1e10));
        assert!(approx(result.crack_seconds_at(2f64.powi(20)), 2f64.powi(20)));
        assert_eq!(result.strength(), StrengthLevel::Medium);
    }

    #[test]
    fn test_strength_levels() {
        assert_eq!(StrengthLevel::from_bits(35.9), StrengthLevel::Weak);
        assert_eq!(StrengthLevel::from_bits(36.0), StrengthLevel::Medium);
        assert_eq!(StrengthLevel::from_bits(70.0), StrengthLevel::Strong);
        assert_eq!(StrengthLevel::from_bits(100.0), StrengthLevel::Epic);
        assert_eq!(StrengthLevel::from_bits(200.0), StrengthLevel::God);
        assert!(StrengthLevel::Weak < StrengthLevel::God);
    }
}
