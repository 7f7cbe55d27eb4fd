//! Order records and the record assembler.
//!
//! An `OrderRecord` is created once per parsed clause, handed to the
//! sink, and never mutated. Rendering covers the user-facing status
//! line with additive unknown-field warnings.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::extract::RawExtraction;
use crate::matcher::MatchResult;

/// Warning markers appended to the status line, one per unknown field.
pub const UNKNOWN_CUSTOMER_MARKER: &str = "⚠️ უცნობი მომხმარებელი";
pub const UNKNOWN_PRODUCT_MARKER: &str = "⚠️ უცნობი პროდუქტი";

/// The terminal entity: one persisted order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRecord {
    pub timestamp: DateTime<Local>,
    pub customer: String,
    pub product: String,
    pub quantity_value: String,
    pub quantity_unit: String,
    pub comment: String,
    pub author: String,
    pub customer_unknown: bool,
    pub product_unknown: bool,
}

impl OrderRecord {
    /// Row in sink column order:
    /// [timestamp, customer, product, quantity_value, quantity_unit,
    /// comment, author].
    pub fn to_row(&self) -> [String; 7] {
        [
            self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            self.customer.trim().to_string(),
            self.product.trim().to_string(),
            self.quantity_value.trim().to_string(),
            self.quantity_unit.trim().to_string(),
            self.comment.trim().to_string(),
            self.author.trim().to_string(),
        ]
    }

    /// User-facing status line: canonical fields plus a warning marker
    /// per unknown field. Markers are additive, not exclusive.
    pub fn status_line(&self) -> String {
        let mut line = format!(
            "✅ Logged: {} / {} / {} / {}",
            self.customer, self.product, self.quantity_value, self.quantity_unit
        );
        if self.customer_unknown {
            line.push(' ');
            line.push_str(UNKNOWN_CUSTOMER_MARKER);
        }
        if self.product_unknown {
            line.push(' ');
            line.push_str(UNKNOWN_PRODUCT_MARKER);
        }
        line
    }
}

/// Per-clause result the pipeline reports on. `Failed` is reachable
/// only if an extractor ever returns nothing at all; the current
/// extractors always degrade instead.
#[derive(Debug, Clone)]
pub enum ClauseOutcome {
    Parsed(OrderRecord),
    Failed { clause: String },
}

impl ClauseOutcome {
    pub fn status_line(&self) -> String {
        match self {
            ClauseOutcome::Parsed(record) => record.status_line(),
            ClauseOutcome::Failed { clause } => format!("❌ Couldn't parse: {clause}"),
        }
    }
}

/// Merge an extraction and two catalog verdicts into the final record,
/// stamping the current wall-clock time and the message author.
pub fn assemble(
    raw: &RawExtraction,
    customer: &MatchResult,
    product: &MatchResult,
    author: &str,
) -> OrderRecord {
    OrderRecord {
        timestamp: Local::now(),
        customer: customer.canonical_value.clone(),
        product: product.canonical_value.clone(),
        quantity_value: raw.quantity_raw.clone(),
        quantity_unit: raw.unit_raw.clone(),
        comment: raw.comment_raw.clone(),
        author: author.to_string(),
        customer_unknown: !customer.matched,
        product_unknown: !product.matched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawExtraction {
        RawExtraction {
            customer_raw: "Shp1".to_string(),
            product_raw: "Bred".to_string(),
            quantity_raw: "10".to_string(),
            unit_raw: "kg".to_string(),
            comment_raw: "".to_string(),
        }
    }

    fn matched(value: &str) -> MatchResult {
        MatchResult {
            canonical_value: value.to_string(),
            matched: true,
            confidence_score: 90.0,
        }
    }

    #[test]
    fn test_assemble_uses_canonical_values() {
        let record = assemble(&raw(), &matched("Shop1"), &matched("Bread"), "Ana");
        assert_eq!(record.customer, "Shop1");
        assert_eq!(record.product, "Bread");
        assert_eq!(record.quantity_value, "10");
        assert_eq!(record.quantity_unit, "kg");
        assert!(!record.customer_unknown);
        assert!(!record.product_unknown);
    }

    #[test]
    fn test_row_column_order() {
        let record = assemble(&raw(), &matched("Shop1"), &matched("Bread"), "Ana");
        let row = record.to_row();
        assert_eq!(&row[1..], ["Shop1", "Bread", "10", "kg", "", "Ana"]);
    }

    #[test]
    fn test_status_line_markers_are_additive() {
        let record = assemble(
            &raw(),
            &MatchResult::unmatched("Shp1"),
            &MatchResult::unmatched("Bred"),
            "Ana",
        );
        let line = record.status_line();
        assert!(line.contains(UNKNOWN_CUSTOMER_MARKER));
        assert!(line.contains(UNKNOWN_PRODUCT_MARKER));
        assert!(record.customer_unknown && record.product_unknown);
    }

    #[test]
    fn test_status_line_without_warnings() {
        let record = assemble(&raw(), &matched("Shop1"), &matched("Bread"), "Ana");
        let line = record.status_line();
        assert!(line.starts_with("✅ Logged: Shop1 / Bread / 10 / kg"));
        assert!(!line.contains("⚠️"));
    }

    #[test]
    fn test_failed_outcome_renders_clause() {
        let outcome = ClauseOutcome::Failed {
            clause: "???".to_string(),
        };
        assert_eq!(outcome.status_line(), "❌ Couldn't parse: ???");
    }
}
