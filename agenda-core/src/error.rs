//! Error types for the agenda pipeline.

use thiserror::Error;

/// Errors that can occur in the aggregation pipeline.
///
/// `Fetch` is absorbed per source by the driver and turns into "zero
/// events from that source". Extraction failures are absorbed per
/// block inside the adapters, and resolution failure is not an error
/// at all (the resolver returns `None` and the candidate is dropped).
/// Only `IcsGenerate` and `Io` abort a run.
#[derive(Error, Debug)]
pub enum AgendaError {
    #[error("Fetch error for '{name}': {message}")]
    Fetch { name: String, message: String },

    #[error("ICS generation error: {0}")]
    IcsGenerate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for pipeline operations.
pub type AgendaResult<T> = Result<T, AgendaError>;
