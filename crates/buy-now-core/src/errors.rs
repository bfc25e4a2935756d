//! Unified error type for widget operations

use serde::{Deserialize, Serialize};

/// Unified error type for all widget operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum WidgetError {
    /// Missing or invalid mount options, e.g. an unknown container
    #[error("{message}")]
    Configuration {
        /// Error message describing the invalid input
        message: String,
    },

    /// Mounting the button into its render target failed
    #[error("{message}")]
    Render {
        /// Error message describing the render failure
        message: String,
    },

    /// Purchase endpoint could not be reached
    #[error("Network error: {message}")]
    Network {
        /// Error message describing the transport failure
        message: String,
    },

    /// A payload could not be encoded or decoded
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message describing the serialization failure
        message: String,
    },
}

impl WidgetError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a render error
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Stable error name exposed to host pages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "ConfigurationError",
            Self::Render { .. } => "RenderError",
            Self::Network { .. } => "NetworkError",
            Self::Serialization { .. } => "SerializationError",
        }
    }
}

impl From<serde_json::Error> for WidgetError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

/// Result type for widget operations
pub type WidgetResult<T> = Result<T, WidgetError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_match_host_contract() {
        assert_eq!(
            WidgetError::configuration("x").kind(),
            "ConfigurationError"
        );
        assert_eq!(WidgetError::render("x").kind(), "RenderError");
        assert_eq!(WidgetError::network("x").kind(), "NetworkError");
    }

    #[test]
    fn json_errors_become_serialization_errors() {
        let err: WidgetError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), "SerializationError");
    }
}
