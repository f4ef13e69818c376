//! Error types for the Meraki provider.

use thiserror::Error;

use crate::schema::Diagnostic;

/// Errors that can occur while serving a provider callback.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The backend reported the object does not exist (HTTP 404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// A validation error occurred.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A configuration error occurred.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested resource or data source type is unknown.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// None of a data source's candidate operations had its parameters set.
    #[error("Insufficient parameters for {data_source}: set one of {candidates}")]
    InsufficientParameters {
        /// The data source type name.
        data_source: String,
        /// Human-readable list of the accepted parameter groups.
        candidates: String,
    },

    /// The dashboard API answered with a non-success status.
    #[error("API error (HTTP {status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body, kept for diagnostics.
        body: String,
    },

    /// The HTTP request could not be completed.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A URL could not be built or parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Operation not implemented for this resource type.
    #[error("Unimplemented: {0}")]
    Unimplemented(String),
}

impl ProviderError {
    /// Returns `true` when the backend reported the object as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Convert into an error diagnostic for the host.
    ///
    /// Backend failures carry the raw response body as detail.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Api { status, body } => {
                Diagnostic::error(format!("Failure when executing request (HTTP {})", status))
                    .with_detail(body.clone())
            },
            Self::NotFound(body) => {
                Diagnostic::error("Failure when executing request (HTTP 404)").with_detail(body.clone())
            },
            Self::Transport(err) => {
                Diagnostic::error("Failure when executing request").with_detail(err.to_string())
            },
            other => Diagnostic::error(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DiagnosticSeverity;

    #[test]
    fn test_error_display() {
        let err = ProviderError::NotFound("Q2XX-AAAA-0001".to_string());
        assert_eq!(format!("{}", err), "Resource not found: Q2XX-AAAA-0001");

        let err = ProviderError::Validation("invalid input".to_string());
        assert_eq!(format!("{}", err), "Validation error: invalid input");

        let err = ProviderError::UnknownResource("meraki_widgets".to_string());
        assert_eq!(format!("{}", err), "Unknown resource type: meraki_widgets");
    }

    #[test]
    fn test_api_error_display() {
        let err = ProviderError::Api {
            status: 400,
            body: r#"{"errors":["Name is required"]}"#.to_string(),
        };
        assert_eq!(
            format!("{}", err),
            r#"API error (HTTP 400): {"errors":["Name is required"]}"#
        );
    }

    #[test]
    fn test_insufficient_parameters_display() {
        let err = ProviderError::InsufficientParameters {
            data_source: "meraki_devices".to_string(),
            candidates: "[serial] or [organization_id]".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Insufficient parameters for meraki_devices: set one of [serial] or [organization_id]"
        );
    }

    #[test]
    fn test_is_not_found() {
        assert!(ProviderError::NotFound("x".to_string()).is_not_found());
        assert!(!ProviderError::Configuration("x".to_string()).is_not_found());
    }

    #[test]
    fn test_to_diagnostic_keeps_raw_body() {
        let err = ProviderError::Api {
            status: 500,
            body: "upstream exploded".to_string(),
        };
        let diag = err.to_diagnostic();
        assert_eq!(diag.severity, DiagnosticSeverity::Error);
        assert!(diag.summary.contains("500"));
        assert_eq!(diag.detail, Some("upstream exploded".to_string()));

        let diag = ProviderError::Configuration("missing api key".to_string()).to_diagnostic();
        assert_eq!(diag.summary, "Configuration error: missing api key");
        assert!(diag.detail.is_none());
    }
}
