//! Intake configuration.
//!
//! The grammar's unit vocabulary and the matcher threshold are
//! configuration, not code: tests substitute fixtures and deployments
//! tune the threshold without touching call sites.

use serde::{Deserialize, Serialize};

/// One quantity unit: a canonical name plus the short-form tokens the
/// grammar accepts for it. Tokens cover both scripts in use
/// (Georgian and Latin).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitToken {
    pub canonical: String,
    pub tokens: Vec<String>,
}

impl UnitToken {
    pub fn new(canonical: &str, tokens: &[&str]) -> Self {
        Self {
            canonical: canonical.to_string(),
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Configuration for the generative extraction service client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            max_tokens: 512,
            temperature: 0.1,
            timeout_seconds: 30,
        }
    }
}

/// Top-level intake configuration, dependency-injected into the
/// extractor, matcher and fallback rather than read from globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Minimum similarity (0–100) for a catalog match to be accepted.
    pub match_threshold: f64,
    /// Unit vocabulary driving the grammar's unit alternation.
    pub units: Vec<UnitToken>,
    pub model: ModelConfig,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            match_threshold: 50.0,
            units: default_units(),
            model: ModelConfig::default(),
        }
    }
}

impl IntakeConfig {
    /// All unit tokens, longest first so the regex alternation never
    /// matches a prefix of a longer token.
    pub fn unit_tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = self
            .units
            .iter()
            .flat_map(|u| u.tokens.iter().cloned())
            .collect();
        tokens.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
        tokens
    }
}

/// Default vocabulary: kilogram, piece, liter, gram.
fn default_units() -> Vec<UnitToken> {
    vec![
        UnitToken::new("kilogram", &["კგ", "kg"]),
        UnitToken::new("piece", &["ც"]),
        UnitToken::new("liter", &["ლ", "l"]),
        UnitToken::new("gram", &["გრამი", "g"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold() {
        let config = IntakeConfig::default();
        assert_eq!(config.match_threshold, 50.0);
    }

    #[test]
    fn test_unit_tokens_longest_first() {
        let config = IntakeConfig::default();
        let tokens = config.unit_tokens();
        assert_eq!(tokens.first().map(String::as_str), Some("გრამი"));
        assert!(tokens.contains(&"kg".to_string()));
        assert!(tokens.contains(&"კგ".to_string()));
    }
}
