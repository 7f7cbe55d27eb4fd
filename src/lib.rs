//! order-intake - structured order extraction from free-form
//! Georgian commerce messages.
//!
//! One inbound message ("Customer . 10kg Product, note") becomes one
//! or more order records: customer, product, quantity, unit and
//! comment, each reference field reconciled against a fixed catalog.
//!
//! ## Pipeline
//! Segmenter → Pattern Extractor → (on miss) Fallback Extractor →
//! Reference Matcher → Record Assembler. Extraction failures are
//! absorbed into degraded-but-valid records; only persistence and
//! total-parse failures reach the boundary.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use order_intake::{Catalog, IntakeConfig, OpenAiModel, OrderIntake};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = IntakeConfig::default();
//! let catalog = Catalog::from_files("known_customers.txt", "known_products.txt")?;
//! let model = Arc::new(OpenAiModel::from_env()?);
//! let intake = OrderIntake::new(&config, catalog, model);
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Injected configuration: threshold, unit vocabulary, model knobs
pub mod config;

// Reference catalogs (customers, products)
pub mod catalog;

// Pipeline stages
pub mod extract;
pub mod fallback;
pub mod matcher;
pub mod record;
pub mod segment;

// Generative extraction service seam + OpenAI binding
pub mod model;

// Per-message clause loop and capability seams
pub mod pipeline;

// Public re-exports
pub use catalog::Catalog;
pub use config::{IntakeConfig, ModelConfig, UnitToken};
pub use error::IntakeError;
pub use extract::{PatternExtractor, PatternOutcome, RawExtraction};
pub use fallback::{FallbackExtractor, ResolvedExtraction, QUANTITY_PLACEHOLDER};
pub use matcher::{MatchResult, ReferenceMatcher};
pub use model::{ExtractionModel, OpenAiModel};
pub use pipeline::{OrderIntake, Replier, RowSink};
pub use record::{assemble, ClauseOutcome, OrderRecord};
pub use segment::clauses;
