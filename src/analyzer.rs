//! Strength analyzer - cheapest full covering of a password by its patterns.

use rayon::prelude::*;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

#[cfg(feature = "async")]
use tokio::sync::mpsc;

#[cfg(feature = "async")]
use tokio_util::sync::CancellationToken;

use crate::collection::PatternCollection;
use crate::finders::{CompositeFinder, PatternFinder};
use crate::pattern::Pattern;
use crate::result::AnalysisResult;

/// Costs closer than this are treated as equal when breaking ties.
const COST_EPSILON: f64 = 1e-9;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Analysis cancelled")]
    Cancelled,
}

/// Runs a finder over passwords and picks the cheapest decomposition.
pub struct StrengthAnalyzer<F = CompositeFinder> {
    finder: F,
}

impl<F: PatternFinder> StrengthAnalyzer<F> {
    pub fn new(finder: F) -> Self {
        Self { finder }
    }

    pub fn finder(&self) -> &F {
        &self.finder
    }

    /// Analyzes one password.
    pub fn analyze(&self, password: &SecretString) -> AnalysisResult {
        let collection = self.finder.search(password.expose_secret());
        let result = analyze_collection(&collection);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "analysis done: {} candidate patterns, {} chosen, {:.2} bits",
            collection.len(),
            result.chosen_patterns.len(),
            result.total_cost_bits
        );

        result
    }

    /// Analyzes many passwords independently on the rayon pool; results keep
    /// input order.
    pub fn analyze_batch(&self, passwords: &[SecretString]) -> Vec<AnalysisResult> {
        passwords.par_iter().map(|p| self.analyze(p)).collect()
    }

    /// Like [`analyze`](Self::analyze), checking the token before searching and
    /// before covering.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::Cancelled` if the token was cancelled.
    #[cfg(feature = "async")]
    pub fn analyze_with_cancel(
        &self,
        password: &SecretString,
        token: Option<CancellationToken>,
    ) -> Result<AnalysisResult, AnalysisError> {
        let is_cancelled = || token.as_ref().is_some_and(CancellationToken::is_cancelled);

        if is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }
        let collection = self.finder.search(password.expose_secret());
        if is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }
        Ok(analyze_collection(&collection))
    }
}

/// Analyzes `password` with `finders`.
pub fn analyze<F: PatternFinder + ?Sized>(password: &SecretString, finders: &F) -> AnalysisResult {
    analyze_collection(&finders.search(password.expose_secret()))
}

/// Async version that sends the analysis result via channel.
#[cfg(feature = "async")]
pub async fn analyze_tx<F: PatternFinder>(
    analyzer: &StrengthAnalyzer<F>,
    password: &SecretString,
    token: CancellationToken,
    tx: mpsc::Sender<Result<AnalysisResult, AnalysisError>>,
) {
    #[cfg(feature = "tracing")]
    tracing::info!("analysis is about to start...");

    let result = analyzer.analyze_with_cancel(password, Some(token));

    if let Err(_e) = tx.send(result).await {
        #[cfg(feature = "tracing")]
        tracing::error!("Failed to send password analysis result: {}", _e);
    }
}

#[derive(Debug, Clone, Copy)]
enum Edge {
    Pattern(usize),
    Bruteforce,
}

#[derive(Debug, Clone, Copy)]
struct Step {
    cost: f64,
    edges: usize,
    /// Tie-break key of the edge that reached this offset; lower wins.
    key: usize,
    from: usize,
    edge: Edge,
}

impl Step {
    fn beats(&self, other: &Step) -> bool {
        if self.cost < other.cost - COST_EPSILON {
            return true;
        }
        if self.cost > other.cost + COST_EPSILON {
            return false;
        }
        (self.edges, self.key) < (other.edges, other.key)
    }
}

fn relax(best: &mut [Option<Step>], to: usize, step: Step) {
    if best[to].is_none_or(|current| step.beats(&current)) {
        best[to] = Some(step);
    }
}

/// Computes the minimum-cost covering of the collection's input.
///
/// Offsets are graph nodes; every pattern is an edge from its start to its
/// end, and each character also has a bruteforce edge priced by its class.
/// A forward scan settles offsets in increasing order, so each offset is
/// final before its outgoing edges are relaxed. Equal-cost paths prefer fewer
/// edges, then the lower key on the final edge: discovered patterns in
/// collection order, bruteforce edges after all of them.
pub fn analyze_collection(collection: &PatternCollection) -> AnalysisResult {
    let chars: Vec<char> = collection.source_text().chars().collect();
    let n = chars.len();
    let patterns = collection.patterns();

    let mut by_start: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (idx, p) in patterns.iter().enumerate() {
        by_start[p.start()].push(idx);
    }

    let mut best: Vec<Option<Step>> = vec![None; n + 1];
    best[0] = Some(Step {
        cost: 0.0,
        edges: 0,
        key: 0,
        from: 0,
        edge: Edge::Bruteforce,
    });

    for pos in 0..n {
        let Some(here) = best[pos] else {
            continue;
        };

        let fallback = Pattern::bruteforce(pos, chars[pos]);
        relax(
            &mut best,
            pos + 1,
            Step {
                cost: here.cost + fallback.cost(),
                edges: here.edges + 1,
                key: patterns.len() + pos,
                from: pos,
                edge: Edge::Bruteforce,
            },
        );

        for &idx in &by_start[pos] {
            let p = &patterns[idx];
            relax(
                &mut best,
                p.end(),
                Step {
                    cost: here.cost + p.cost(),
                    edges: here.edges + 1,
                    key: idx,
                    from: pos,
                    edge: Edge::Pattern(idx),
                },
            );
        }
    }

    let mut chosen = Vec::new();
    let mut pos = n;
    while pos > 0 {
        let Some(step) = best[pos] else {
            break;
        };
        chosen.push(match step.edge {
            Edge::Pattern(idx) => patterns[idx].clone(),
            Edge::Bruteforce => Pattern::bruteforce(step.from, chars[step.from]),
        });
        pos = step.from;
    }
    chosen.reverse();

    AnalysisResult::new(chosen)
}
