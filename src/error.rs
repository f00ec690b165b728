//! Error types for the confidence scoring engine

use std::fmt;

/// Errors that can occur while configuring or running the engine
#[derive(Debug, Clone, PartialEq)]
pub enum ConfidenceError {
    /// Invalid input (non-finite feature vector passed to a model)
    InvalidInput(String),

    /// Invalid configuration (bounds, thresholds, profile weights)
    InvalidConfig(String),

    /// Requested scoring profile does not exist
    UnknownProfile(String),

    /// Regression model could not be loaded or evaluated
    ModelError(String),

    /// Numerical error (non-finite feature, overflow, etc.)
    NumericalError(String),
}

impl fmt::Display for ConfidenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ConfidenceError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfidenceError::UnknownProfile(name) => write!(f, "Unknown scoring profile: {}", name),
            ConfidenceError::ModelError(msg) => write!(f, "Model error: {}", msg),
            ConfidenceError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
        }
    }
}

impl std::error::Error for ConfidenceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = ConfidenceError::UnknownProfile("shouty".to_string());
        assert_eq!(err.to_string(), "Unknown scoring profile: shouty");

        let err = ConfidenceError::InvalidConfig("missing weight".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: missing weight");

        let err = ConfidenceError::InvalidInput("NaN feature".to_string());
        assert_eq!(err.to_string(), "Invalid input: NaN feature");
    }
}
