//! Error types for procap.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcapError {
    // Configuration errors
    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    // Extraction collaborator errors
    #[error("Extraction failed: {message}")]
    Extraction { message: String },

    #[error("Fragment rejected: {message}")]
    FragmentSchema { message: String },

    // Classification collaborator errors
    #[error("Classification failed: {message}")]
    Classification { message: String },

    // Session lifecycle errors
    #[error("Pipeline channel to {station} closed")]
    ChannelClosed { station: &'static str },

    #[error("Session shutdown failed: {message}")]
    Shutdown { message: String },

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, ProcapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_invalid_value_display() {
        let error = ProcapError::ConfigInvalidValue {
            key: "token_max".to_string(),
            message: "must be at least token_target".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for token_max: must be at least token_target"
        );
    }

    #[test]
    fn test_extraction_display() {
        let error = ProcapError::Extraction {
            message: "request timed out".to_string(),
        };
        assert_eq!(error.to_string(), "Extraction failed: request timed out");
    }

    #[test]
    fn test_fragment_schema_display() {
        let error = ProcapError::FragmentSchema {
            message: "risks: expected array".to_string(),
        };
        assert_eq!(error.to_string(), "Fragment rejected: risks: expected array");
    }

    #[test]
    fn test_classification_display() {
        let error = ProcapError::Classification {
            message: "collaborator unavailable".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Classification failed: collaborator unavailable"
        );
    }

    #[test]
    fn test_channel_closed_display() {
        let error = ProcapError::ChannelClosed {
            station: "extractor",
        };
        assert_eq!(error.to_string(), "Pipeline channel to extractor closed");
    }

    #[test]
    fn test_shutdown_display() {
        let error = ProcapError::Shutdown {
            message: "merger task panicked".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Session shutdown failed: merger task panicked"
        );
    }

    #[test]
    fn test_other_display() {
        let error = ProcapError::Other("unexpected error".to_string());
        assert_eq!(error.to_string(), "unexpected error");
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<ProcapError>();
        assert_sync::<ProcapError>();
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().ok(), Some(42));
    }
}
