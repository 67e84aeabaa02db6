//! Error types for the clscurves metrics engine

use thiserror::Error;

/// Result type alias for clscurves operations
pub type Result<T> = std::result::Result<T, ClscurvesError>;

/// Main error type for the clscurves engine
#[derive(Error, Debug)]
pub enum ClscurvesError {
    #[error("Invalid input shape: {0}")]
    InvalidInputShape(String),

    #[error("Invalid threshold sequence: {0}")]
    InvalidThresholdSequence(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Undefined metric: {0}")]
    UndefinedMetric(String),

    #[error("Unsupported imputation policy: {0}")]
    UnsupportedImputationPolicy(String),

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },
}
