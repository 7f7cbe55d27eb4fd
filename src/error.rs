//! Error handling for the order intake pipeline.
//!
//! Extraction-stage failures (grammar mismatch, fallback-service
//! failure) are absorbed into control flow and never appear here:
//! the pattern extractor returns a tagged outcome and the fallback
//! extractor degrades to a placeholder record. Only boundary failures
//! get a variant.

use thiserror::Error;

/// Errors that can reach the intake boundary.
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Catalog load failed for '{path}': {source}")]
    Catalog {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Persistence sink rejected row: {message}")]
    Persistence { message: String },

    #[error("Could not parse clause: {clause}")]
    TotalParseFailure { clause: String },
}
