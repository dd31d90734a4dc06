//! Error taxonomy for the scoring pipeline.
//!
//! A `NoResponse` block and a zero-variance correlation are *not* errors:
//! they are ordinary outcomes handled in [`crate::ratings`] and
//! [`crate::correlation`].
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EaError {
    /// Missing run-start anchor or a line that does not fit its column schema.
    #[error("malformed log: {0}")]
    MalformedLog(String),

    /// A response code whose trailing character is not a rating digit 1–9.
    #[error("malformed response code {code:?} in trial {trial}")]
    MalformedResponse { trial: i64, code: String },

    /// Block label absent from a reference table header.
    #[error("column {label:?} not found in {table}")]
    MissingReferenceColumn { label: String, table: String },

    /// Column exists but holds no finite values.
    #[error("column {label:?} in {table} has no finite values")]
    MissingReferenceData { label: String, table: String },

    /// |r| reached 1 under `FisherGuard::Reject`.
    #[error("correlation r = {0} is outside the open interval (-1, 1)")]
    SaturatedCorrelation(f64),

    #[error("invalid trial type {0:?} (expected `vid` or `cvid`)")]
    InvalidTrialType(String),
}

pub type EaResult<T> = std::result::Result<T, EaError>;
