//! Error Types for the Banking Advisor

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Incomplete record for {username}: no {missing} on file")]
    IncompleteRecord {
        username: String,
        missing: &'static str,
    },

    #[error("Unknown risk tolerance: {0:?} (expected high, medium or low)")]
    UnknownRiskTolerance(String),

    #[error("Narrative generation failed: {0}")]
    Narrative(#[from] insight_core::CoreError),
}

impl AdvisorError {
    /// Whether the failure comes from the records themselves rather than the
    /// storage engine
    pub const fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRecord(_) | Self::IncompleteRecord { .. } | Self::UnknownRiskTolerance(_)
        )
    }
}
