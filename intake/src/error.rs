//! Error taxonomy of the intake pipeline.
//!
//! A label that yields no report number is deliberately absent: that outcome is
//! logged and counted by the binder, never raised.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntakeError {
    /// The spreadsheet could not be read. Carries the reader's message.
    #[error("Failed to parse spreadsheet: {0}")]
    Parse(String),

    /// No header could be resolved for the mandatory lab report number field.
    #[error(
        "Could not find a column for Lab Report No. Headers seen: {headers:?}"
    )]
    ColumnNotFound { headers: Vec<String> },

    /// The sheet parsed but held no data rows.
    #[error("Spreadsheet appears to be empty or has no valid rows")]
    EmptySheet,

    #[error("Failed to read archive: {0}")]
    Archive(String),

    /// The image bytes could not be decoded. Counted as a miss for that image.
    #[error("Cannot decode image {image}: {detail}")]
    Undecodable { image: String, detail: String },

    /// The recognition engine itself failed (not a miss). Aborts the image pass.
    #[error("Text recognition failed for {image}: {detail}")]
    Recognition { image: String, detail: String },

    /// A row reached submission without a lab report number.
    #[error("Missing Lab Report No. for row {row}: {detail}")]
    Validation { row: usize, detail: String },

    /// The record store rejected one create request.
    #[error("{certificate_number}: {detail}")]
    Submission {
        certificate_number: String,
        detail: String,
    },

    /// The record store could not be reached, or rejected the clear request.
    #[error("Record store request failed: {0}")]
    Transport(String),

    #[error("Cannot {action} while the wizard is {step}")]
    InvalidStep {
        action: &'static str,
        step: &'static str,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = IntakeError> = std::result::Result<T, E>;
