//! Fallback extraction via the generative model.
//!
//! Invoked only when the order grammar misses. The model is asked for
//! the same five fields as strict JSON, constrained to the catalogs.
//! This is the last line of defense: any service or parse failure
//! degrades to a flagged placeholder record instead of propagating.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::catalog::Catalog;
use crate::extract::RawExtraction;
use crate::matcher::{MatchResult, ReferenceMatcher};
use crate::model::ExtractionModel;

/// Extraction plus catalog verdicts: the uniform shape both the
/// pattern path and the fallback path hand to the assembler.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedExtraction {
    pub raw: RawExtraction,
    pub customer: MatchResult,
    pub product: MatchResult,
}

/// Quantity placeholder emitted by the exhausted-failure branch.
pub const QUANTITY_PLACEHOLDER: &str = "?";

const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that extracts structured order data.";

pub struct FallbackExtractor {
    model: Arc<dyn ExtractionModel>,
}

impl FallbackExtractor {
    pub fn new(model: Arc<dyn ExtractionModel>) -> Self {
        Self { model }
    }

    /// Extract the order fields from a clause the grammar could not
    /// parse. Never fails: a model error or malformed response yields
    /// the degraded placeholder record.
    pub async fn extract(
        &self,
        clause: &str,
        catalog: &Catalog,
        matcher: &ReferenceMatcher,
    ) -> ResolvedExtraction {
        warn!("Using model fallback for: {clause}");

        let user_prompt = build_prompt(clause, catalog);

        let content = match self.model.complete(SYSTEM_PROMPT, &user_prompt).await {
            Ok(content) => content,
            Err(e) => {
                warn!("Fallback extraction call failed: {e}");
                return degraded(clause);
            }
        };

        let Some(raw) = parse_response(&content) else {
            warn!("Fallback extraction returned malformed content: {content}");
            return degraded(clause);
        };

        // Same reconciliation as the pattern path, so downstream
        // consumers see one record shape regardless of origin.
        let customer = matcher.best_match(&raw.customer_raw, catalog.customers());
        let product = matcher.best_match(&raw.product_raw, catalog.products());

        ResolvedExtraction {
            raw,
            customer,
            product,
        }
    }
}

fn build_prompt(clause: &str, catalog: &Catalog) -> String {
    let customers = catalog.customers().join(", ");
    let products = catalog.products().join(", ");

    format!(
        r#"Given a Georgian text order, extract the following:
- Customer (prefer one of these): {customers}
- Product (prefer one of these): {products}
- Quantity value and unit
- Comment if available

OUTPUT FORMAT (JSON only, no markdown code blocks):
{{
  "customer": "...",
  "product": "...",
  "quantity_value": "...",
  "quantity_unit": "კგ|ც|ლ|გრამი or empty",
  "comment": "..."
}}

If no catalog entry fits, return the literal text from the message.
Use empty strings for fields that are absent. Output VALID JSON only.

Text: "{clause}""#
    )
}

/// Recover the five fields from the model's reply. Tolerates markdown
/// fences, surrounding prose and numeric quantity values.
fn parse_response(content: &str) -> Option<RawExtraction> {
    let json_str = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let value: Value = match serde_json::from_str(json_str) {
        Ok(v) => v,
        Err(_) => {
            // The JSON may be wrapped in explanatory text. The last
            // `}` can precede the first `{`; `get` rejects the
            // reversed range.
            let start = json_str.find('{')?;
            let end = json_str.rfind('}')?;
            let candidate = json_str.get(start..=end)?;
            serde_json::from_str(candidate).ok()?
        }
    };

    let obj = value.as_object()?;
    let field = |name: &str| -> String {
        match obj.get(name) {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    };

    Some(RawExtraction {
        customer_raw: field("customer"),
        product_raw: field("product"),
        quantity_raw: field("quantity_value"),
        unit_raw: field("quantity_unit"),
        comment_raw: field("comment"),
    })
}

/// The exhausted-failure record: whole clause as customer, placeholder
/// quantity, both unknown flags forced true.
fn degraded(clause: &str) -> ResolvedExtraction {
    ResolvedExtraction {
        raw: RawExtraction {
            customer_raw: clause.to_string(),
            product_raw: String::new(),
            quantity_raw: QUANTITY_PLACEHOLDER.to_string(),
            unit_raw: String::new(),
            comment_raw: String::new(),
        },
        customer: MatchResult::unmatched(clause),
        product: MatchResult::unmatched(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    struct CannedModel(String);

    #[async_trait]
    impl ExtractionModel for CannedModel {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    struct UnreachableModel;

    #[async_trait]
    impl ExtractionModel for UnreachableModel {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            Err(anyhow!("connection refused"))
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(
            vec!["Shop1".to_string(), "Shop2".to_string()],
            vec!["Bread".to_string(), "Milk".to_string()],
        )
    }

    #[test]
    fn test_parse_clean_json() {
        let raw = parse_response(
            r#"{"customer": "Shop1", "product": "Bread", "quantity_value": "10", "quantity_unit": "კგ", "comment": ""}"#,
        )
        .unwrap();
        assert_eq!(raw.customer_raw, "Shop1");
        assert_eq!(raw.quantity_raw, "10");
    }

    #[test]
    fn test_parse_markdown_wrapped_json() {
        let content = "```json\n{\"customer\": \"Shop1\", \"product\": \"Milk\", \"quantity_value\": 3, \"quantity_unit\": \"ც\", \"comment\": \"asap\"}\n```";
        let raw = parse_response(content).unwrap();
        assert_eq!(raw.product_raw, "Milk");
        assert_eq!(raw.quantity_raw, "3");
        assert_eq!(raw.comment_raw, "asap");
    }

    #[test]
    fn test_parse_json_wrapped_in_prose() {
        let content = r#"Here is the extraction: {"customer": "Shop2", "product": "Bread", "quantity_value": "1", "quantity_unit": "", "comment": ""} hope that helps"#;
        let raw = parse_response(content).unwrap();
        assert_eq!(raw.customer_raw, "Shop2");
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert!(parse_response("sorry, I can't help with that").is_none());
    }

    #[test]
    fn test_parse_reversed_braces_is_none() {
        // Last `}` before the first `{` must not slice out of order.
        assert!(parse_response("} sorry, here is nothing usable {").is_none());
    }

    #[tokio::test]
    async fn test_service_failure_degrades() {
        let extractor = FallbackExtractor::new(Arc::new(UnreachableModel));
        let matcher = ReferenceMatcher::new(50.0);
        let resolved = extractor
            .extract("gibberish with no dot or digits", &catalog(), &matcher)
            .await;

        assert_eq!(resolved.raw.quantity_raw, QUANTITY_PLACEHOLDER);
        assert_eq!(resolved.raw.customer_raw, "gibberish with no dot or digits");
        assert_eq!(resolved.raw.product_raw, "");
        assert!(!resolved.customer.matched);
        assert!(!resolved.product.matched);
    }

    #[tokio::test]
    async fn test_malformed_response_degrades() {
        let extractor = FallbackExtractor::new(Arc::new(CannedModel("not json".to_string())));
        let matcher = ReferenceMatcher::new(50.0);
        let resolved = extractor.extract("??", &catalog(), &matcher).await;
        assert_eq!(resolved.raw.quantity_raw, QUANTITY_PLACEHOLDER);
        assert!(!resolved.customer.matched);
    }

    #[tokio::test]
    async fn test_reversed_brace_response_degrades() {
        let extractor = FallbackExtractor::new(Arc::new(CannedModel(
            "} sorry, here is nothing usable {".to_string(),
        )));
        let matcher = ReferenceMatcher::new(50.0);
        let resolved = extractor.extract("??", &catalog(), &matcher).await;
        assert_eq!(resolved.raw.quantity_raw, QUANTITY_PLACEHOLDER);
        assert!(!resolved.customer.matched);
        assert!(!resolved.product.matched);
    }

    #[tokio::test]
    async fn test_model_output_is_reconciled() {
        let extractor = FallbackExtractor::new(Arc::new(CannedModel(
            r#"{"customer": "Shp1", "product": "Bred", "quantity_value": "2", "quantity_unit": "კგ", "comment": ""}"#
                .to_string(),
        )));
        let matcher = ReferenceMatcher::new(50.0);
        let resolved = extractor.extract("anything", &catalog(), &matcher).await;

        assert!(resolved.customer.matched);
        assert_eq!(resolved.customer.canonical_value, "Shop1");
        assert!(resolved.product.matched);
        assert_eq!(resolved.product.canonical_value, "Bread");
    }
}
