//! Error types for distance computation and chart rendering

use thiserror::Error;

/// Result type alias for distance server operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Error types that can occur while validating, computing, rendering or exporting
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Malformed or mismatched input shape
    #[error("Validation error: {reason}")]
    Validation { reason: String },

    /// The metric is mathematically undefined for the given input
    #[error("Degenerate vector: {reason}")]
    DegenerateVector { reason: String },

    /// The point set cannot be drawn as the requested chart type
    #[error("Chart input error: {reason}")]
    ChartInput { reason: String },

    /// The drawing backend or image encoder failed
    #[error("Render error: {0}")]
    Render(String),

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AnalysisError {
    pub fn validation(reason: impl Into<String>) -> Self {
        AnalysisError::Validation {
            reason: reason.into(),
        }
    }

    pub fn degenerate(reason: impl Into<String>) -> Self {
        AnalysisError::DegenerateVector {
            reason: reason.into(),
        }
    }

    pub fn chart_input(reason: impl Into<String>) -> Self {
        AnalysisError::ChartInput {
            reason: reason.into(),
        }
    }

    /// Attach the offending pair of point indices to a per-pair failure.
    pub fn at_pair(self, i: usize, j: usize) -> Self {
        match self {
            AnalysisError::Validation { reason } => AnalysisError::Validation {
                reason: format!("points {} and {}: {}", i, j, reason),
            },
            AnalysisError::DegenerateVector { reason } => AnalysisError::DegenerateVector {
                reason: format!("points {} and {}: {}", i, j, reason),
            },
            other => other,
        }
    }

    /// Whether the failure was caused by the caller's input rather than the backend.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            AnalysisError::Render(_) | AnalysisError::InvalidConfig(_)
        )
    }
}
