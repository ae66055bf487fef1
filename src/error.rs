//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

use crate::models::NodeId;

/// Errors produced while ingesting tables, loading configuration, or
/// running a lookup that requires a present ID.
#[derive(Debug, Error)]
pub enum TollError {
    /// The reference ID never appears as an `id_start` value.
    #[error("reference id {reference_id} not found in id_start column")]
    NotFound {
        /// The ID that was looked up.
        reference_id: NodeId,
    },

    /// A row was rejected at ingestion.
    #[error("malformed row {row}: {reason}")]
    MalformedRow {
        /// Zero-based row index within the input table.
        row: usize,
        /// Why the row was rejected.
        reason: String,
    },

    /// An explicit dense matrix is not a valid distance matrix.
    #[error("malformed distance matrix: {0}")]
    MalformedMatrix(String),

    /// Configuration values failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration could not be parsed.
    #[error("failed to parse configuration")]
    ConfigParse(#[from] serde_json::Error),
}

impl TollError {
    pub(crate) fn malformed_row(row: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRow {
            row,
            reason: reason.into(),
        }
    }
}
