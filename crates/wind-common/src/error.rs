//! Error types for wind extraction.

use thiserror::Error;

/// Result type alias using WindError.
pub type WindResult<T> = Result<T, WindError>;

/// Primary error type for dataset discovery and region extraction.
#[derive(Debug, Error)]
pub enum WindError {
    // === Run-level errors ===
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("No dataset found: {0}")]
    DatasetNotFound(String),

    // === Candidate-level errors ===
    #[error("Remote dataset unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Malformed remote response: {0}")]
    Protocol(String),

    // === Tile-level errors ===
    #[error("Empty {axis} selection: {message}")]
    EmptySelection { axis: &'static str, message: String },

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WindError {
    /// Create an EmptySelection error for the named axis.
    pub fn empty_selection(axis: &'static str, message: impl Into<String>) -> Self {
        Self::EmptySelection {
            axis,
            message: message.into(),
        }
    }

    /// Whether the error only affects the current tile or time slice.
    ///
    /// Configuration and discovery errors abort the whole run; everything
    /// that happens once extraction has started is reported and skipped.
    pub fn is_tile_local(&self) -> bool {
        matches!(
            self,
            WindError::EmptySelection { .. }
                | WindError::ShapeMismatch(_)
                | WindError::Io(_)
                | WindError::RemoteUnavailable(_)
                | WindError::Protocol(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_local_classification() {
        assert!(WindError::ShapeMismatch("x".into()).is_tile_local());
        assert!(WindError::empty_selection("latitude", "none").is_tile_local());
        assert!(!WindError::Configuration("x".into()).is_tile_local());
        assert!(!WindError::DatasetNotFound("x".into()).is_tile_local());
    }

    #[test]
    fn test_empty_selection_message() {
        let err = WindError::empty_selection("longitude", "window 2 +/- 5");
        assert_eq!(
            err.to_string(),
            "Empty longitude selection: window 2 +/- 5"
        );
    }
}
