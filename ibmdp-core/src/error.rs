//! Error types for environment construction and interaction

use thiserror::Error;

/// Core error type for environment operations
#[derive(Error, Debug)]
pub enum RlError {
    /// An environment exposed a space kind the consumer cannot work with
    #[error("unsupported {context} space: expected {expected}, got {actual}")]
    UnsupportedSpace {
        /// Which space was inspected ("observation" or "action")
        context: &'static str,
        /// Space kind the consumer requires
        expected: &'static str,
        /// Space kind the environment actually exposes
        actual: &'static str,
    },

    /// An information-gathering action targets a feature the observation
    /// vector does not have
    #[error("info-gathering action targets feature {index}, but the observation has {num_features} features")]
    FeatureIndexOutOfRange {
        /// Offending feature index
        index: usize,
        /// Number of features in the base observation vector
        num_features: usize,
    },

    /// A configuration scalar was NaN or infinite
    #[error("{name} must be a finite number, got {value}")]
    NonFiniteValue {
        /// Name of the offending parameter
        name: &'static str,
        /// The rejected value
        value: f64,
    },

    /// Invalid action
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// Dimension mismatch
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Environment-related errors
    #[error("environment error: {0}")]
    Environment(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for environment operations
pub type Result<T> = std::result::Result<T, RlError>;
