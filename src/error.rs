//! Error types for the EcoPlot client
//!
//! Every API call can fail in one of three ways: the transport itself
//! (connection refused, timeout), the envelope (`success: false` with a
//! server-provided message), or a malformed response body. Components are
//! expected to catch per call and degrade locally, never fail the whole view.

use thiserror::Error;

/// Result type alias for EcoPlot operations
pub type Result<T> = std::result::Result<T, EcoPlotError>;

/// Error types for EcoPlot client operations
#[derive(Error, Debug)]
pub enum EcoPlotError {
    /// HTTP transport errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing errors
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server answered with `success: false`
    #[error("API error: {message}")]
    Api {
        /// Server-provided message, or a generic fallback
        message: String,
    },

    /// Response decoded but expected fields were missing
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Client-side form validation failures
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Preference/state storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EcoPlotError {
    /// Create an API error from an optional server message
    pub fn api(message: Option<String>) -> Self {
        Self::Api {
            message: message.unwrap_or_else(|| "request was not successful".to_string()),
        }
    }

    /// Create a malformed-response error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Whether this error came from the network layer rather than the server
    pub fn is_transport(&self) -> bool {
        matches!(self, EcoPlotError::Http(_))
    }

    /// Short category label used in log lines and banners
    pub fn category(&self) -> &'static str {
        match self {
            EcoPlotError::Http(_) => "network",
            EcoPlotError::Json(_) | EcoPlotError::MalformedResponse(_) => "malformed-response",
            EcoPlotError::Api { .. } => "api",
            EcoPlotError::Config(_) => "configuration",
            EcoPlotError::Validation(_) => "validation",
            EcoPlotError::Storage(_) => "storage",
            EcoPlotError::Io(_) => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_uses_server_message() {
        let err = EcoPlotError::api(Some("device name is required".to_string()));
        assert_eq!(err.to_string(), "API error: device name is required");
    }

    #[test]
    fn api_error_falls_back_to_generic_message() {
        let err = EcoPlotError::api(None);
        assert_eq!(err.to_string(), "API error: request was not successful");
        assert_eq!(err.category(), "api");
    }
}
