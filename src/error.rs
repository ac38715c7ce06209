//! Domain-specific error types for hexagram-diagnostics

use thiserror::Error;

/// Main error type for the diagnostic engine
#[derive(Error, Debug)]
pub enum DiagnosticsError {
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Lookup miss: no {kind} with id {id}")]
    LookupMiss { kind: &'static str, id: u32 },

    #[error("Analyzer {method} failed: {message}")]
    AnalyzerFailure { method: String, message: String },

    #[error("Orchestration failed: {message}")]
    OrchestrationFailure { message: String },

    #[error("Total failure: {message}")]
    TotalFailure { message: String },

    #[error("Timeout error: {operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DiagnosticsError {
    pub fn analyzer(method: impl Into<String>, message: impl Into<String>) -> Self {
        DiagnosticsError::AnalyzerFailure {
            method: method.into(),
            message: message.into(),
        }
    }

    /// Short machine-readable label used in logs and embedded error fields
    pub fn kind(&self) -> &'static str {
        match self {
            DiagnosticsError::InvalidConfiguration { .. } => "invalid_configuration",
            DiagnosticsError::LookupMiss { .. } => "lookup_miss",
            DiagnosticsError::AnalyzerFailure { .. } => "analyzer_failure",
            DiagnosticsError::OrchestrationFailure { .. } => "orchestration_failure",
            DiagnosticsError::TotalFailure { .. } => "total_failure",
            DiagnosticsError::Timeout { .. } => "timeout",
            DiagnosticsError::Serialization { .. } => "serialization",
            DiagnosticsError::Internal { .. } => "internal",
        }
    }
}

impl From<anyhow::Error> for DiagnosticsError {
    fn from(err: anyhow::Error) -> Self {
        DiagnosticsError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for DiagnosticsError {
    fn from(err: serde_json::Error) -> Self {
        DiagnosticsError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Result type alias for diagnostic operations
pub type Result<T> = std::result::Result<T, DiagnosticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_miss_message_names_kind_and_id() {
        let err = DiagnosticsError::LookupMiss {
            kind: "hexagram",
            id: 65,
        };
        assert_eq!(err.to_string(), "Lookup miss: no hexagram with id 65");
        assert_eq!(err.kind(), "lookup_miss");
    }

    #[test]
    fn serde_errors_map_to_serialization() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: DiagnosticsError = parse.into();
        assert_eq!(err.kind(), "serialization");
    }
}
