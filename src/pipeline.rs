//! The per-message clause loop.
//!
//! Wires segmenter → pattern extractor → (on miss) fallback extractor
//! → reference matcher → assembler, strictly one clause at a time so
//! replies keep the order the user typed. The persistence sink and
//! the chat transport are capability seams.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{error, info};

use crate::catalog::Catalog;
use crate::config::IntakeConfig;
use crate::error::IntakeError;
use crate::extract::{PatternExtractor, PatternOutcome};
use crate::fallback::{FallbackExtractor, ResolvedExtraction};
use crate::matcher::ReferenceMatcher;
use crate::model::ExtractionModel;
use crate::record::{assemble, ClauseOutcome};
use crate::segment::clauses;

/// Persistence seam: one append per assembled record, in clause order.
#[async_trait]
pub trait RowSink: Send + Sync {
    async fn append_row(&self, row: &[String; 7]) -> Result<()>;
}

/// Chat seam: one reply per clause, in clause order.
#[async_trait]
pub trait Replier: Send + Sync {
    async fn reply(&self, text: &str) -> Result<()>;
}

/// The extraction pipeline for one process lifetime. Catalogs are
/// loaded once and read-only; there is no other state shared between
/// clauses.
pub struct OrderIntake {
    catalog: Catalog,
    extractor: PatternExtractor,
    matcher: ReferenceMatcher,
    fallback: FallbackExtractor,
}

impl OrderIntake {
    pub fn new(config: &IntakeConfig, catalog: Catalog, model: Arc<dyn ExtractionModel>) -> Self {
        Self {
            extractor: PatternExtractor::new(config),
            matcher: ReferenceMatcher::new(config.match_threshold),
            fallback: FallbackExtractor::new(model),
            catalog,
        }
    }

    /// Process one inbound message: segment, extract, reconcile,
    /// persist and reply per clause, strictly sequentially. Sink and
    /// transport failures are logged and never abort sibling clauses.
    pub async fn process_message(
        &self,
        text: &str,
        author: &str,
        sink: &dyn RowSink,
        replier: &dyn Replier,
    ) -> Vec<ClauseOutcome> {
        let mut outcomes = Vec::new();

        for clause in clauses(text) {
            let outcome = self.process_clause(clause, author).await;

            if let ClauseOutcome::Parsed(record) = &outcome {
                if let Err(e) = sink.append_row(&record.to_row()).await {
                    let e = IntakeError::Persistence {
                        message: e.to_string(),
                    };
                    error!("{e}");
                }
            }
            if let Err(e) = replier.reply(&outcome.status_line()).await {
                error!("Failed to send reply: {e}");
            }

            outcomes.push(outcome);
        }

        outcomes
    }

    /// Extract one clause. The fallback path always degrades rather
    /// than returning nothing, so this currently always parses.
    async fn process_clause(&self, clause: &str, author: &str) -> ClauseOutcome {
        let resolved = match self.extractor.extract(clause) {
            PatternOutcome::Matched(raw) => {
                let customer = self.matcher.best_match(&raw.customer_raw, self.catalog.customers());
                let product = self.matcher.best_match(&raw.product_raw, self.catalog.products());
                ResolvedExtraction {
                    raw,
                    customer,
                    product,
                }
            }
            PatternOutcome::Unmatched => {
                self.fallback
                    .extract(clause, &self.catalog, &self.matcher)
                    .await
            }
        };

        let record = assemble(&resolved.raw, &resolved.customer, &resolved.product, author);
        info!(
            "Assembled order: {} / {} / {} {}",
            record.customer, record.product, record.quantity_value, record.quantity_unit
        );
        ClauseOutcome::Parsed(record)
    }
}
