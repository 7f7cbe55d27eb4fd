//! Pattern extraction: the deterministic order grammar.
//!
//! Grammar over a single clause:
//! `<customer> "." <quantity><unit>? <product> ("," <comment>)?`
//! Customer and product capture is non-greedy on purpose: catalog
//! entries may contain spaces, and field-boundary noise is corrected
//! downstream by the reference matcher.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::IntakeConfig;

/// Fields pulled directly from a clause, no semantic validation yet.
/// Absent unit/comment are empty strings, never missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawExtraction {
    pub customer_raw: String,
    pub product_raw: String,
    pub quantity_raw: String,
    pub unit_raw: String,
    pub comment_raw: String,
}

/// Outcome of one grammar attempt. `Unmatched` routes the clause to
/// the fallback extractor; it is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternOutcome {
    Matched(RawExtraction),
    Unmatched,
}

/// Applies the order grammar to single clauses. The unit alternation
/// is compiled once from the configured vocabulary.
#[derive(Debug, Clone)]
pub struct PatternExtractor {
    grammar: Regex,
}

impl PatternExtractor {
    pub fn new(config: &IntakeConfig) -> Self {
        let units = config
            .unit_tokens()
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        // No whitespace allowed between digits and unit token: a
        // space there makes the token part of the product text, which
        // the matcher then reconciles.
        let pattern = format!(r"^(.+?)\s*\.\s*(\d+)({units})?\s+(.+?)(?:\s*[,;]\s*(.*))?$");
        let grammar = Regex::new(&pattern).expect("order grammar pattern is valid");
        Self { grammar }
    }

    /// Attempt a single structured match against the clause.
    pub fn extract(&self, clause: &str) -> PatternOutcome {
        let clause = clause.trim();
        let Some(caps) = self.grammar.captures(clause) else {
            warn!("Grammar did not match clause: {clause}");
            return PatternOutcome::Unmatched;
        };

        let group = |i: usize| caps.get(i).map(|m| m.as_str().trim()).unwrap_or("");

        PatternOutcome::Matched(RawExtraction {
            customer_raw: group(1).to_string(),
            quantity_raw: group(2).to_string(),
            unit_raw: group(3).to_string(),
            product_raw: group(4).to_string(),
            comment_raw: group(5).to_string(),
        })
    }
}
