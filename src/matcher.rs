//! Reference matching: fuzzy reconciliation against a catalog list.
//!
//! Jaro-Winkler over the full list, scored on a 0–100 scale. The
//! threshold gates acceptance; below it the input passes through
//! unchanged with `matched = false`.

use serde::{Deserialize, Serialize};
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

/// Verdict for one candidate against one catalog.
///
/// Invariant: if `matched` is false, `canonical_value` is the raw
/// input unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub canonical_value: String,
    pub matched: bool,
    pub confidence_score: f64,
}

impl MatchResult {
    /// Pass-through verdict for an unmatched input.
    pub fn unmatched(input: &str) -> Self {
        Self {
            canonical_value: input.to_string(),
            matched: false,
            confidence_score: 0.0,
        }
    }
}

/// Fuzzy matcher with a tunable acceptance threshold (0–100).
#[derive(Debug, Clone)]
pub struct ReferenceMatcher {
    threshold: f64,
}

impl ReferenceMatcher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Best fuzzy match of `term` over `catalog`. Highest score wins;
    /// ties go to the earlier catalog entry. An empty catalog yields
    /// an unmatched pass-through, never an error.
    pub fn best_match(&self, term: &str, catalog: &[String]) -> MatchResult {
        let needle = normalize(term);

        let mut best: Option<(&String, f64)> = None;
        for entry in catalog {
            let score = strsim::jaro_winkler(&needle, &normalize(entry)) * 100.0;
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((entry, score));
            }
        }

        let Some((entry, score)) = best else {
            return MatchResult::unmatched(term);
        };

        debug!("Matching '{term}' → '{entry}' (score: {score:.1})");

        if score >= self.threshold {
            MatchResult {
                canonical_value: entry.clone(),
                matched: true,
                confidence_score: score,
            }
        } else {
            MatchResult {
                canonical_value: term.to_string(),
                matched: false,
                confidence_score: score,
            }
        }
    }
}

/// NFKC fold + lowercase so the two scripts in play compare stably.
fn normalize(s: &str) -> String {
    s.nfkc().collect::<String>().to_lowercase()
}
