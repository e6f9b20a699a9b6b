//! Error types for the OpsLevel provider.

use thiserror::Error;

use crate::schema::Diagnostic;

/// Errors that can occur while servicing a provider operation.
///
/// None of these are retryable: every backend failure is terminal for the
/// operation that hit it, and the caller reissues the operation on its next
/// plan/apply cycle.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The requested catalog object does not exist on the backend.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Provider configuration is missing or unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The GraphQL response carried one or more errors.
    #[error("API error: {}", .0.join("; "))]
    Api(Vec<String>),

    /// An HTTP-level failure talking to the API.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Declarative state could not be decoded into the resource model.
    #[error("Decode error: {0}")]
    Decode(String),

    /// An API response could not be mapped into the resource model.
    #[error("Model build error: {0}")]
    ModelBuild(String),

    /// The requested resource or data source type is not registered.
    #[error("Unknown type: {0}")]
    UnknownResource(String),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The configured API URL could not be parsed or joined.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ProviderError {
    /// Convert this error into an error diagnostic carrying the raw message.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DiagnosticSeverity;

    #[test]
    fn test_error_display() {
        let err = ProviderError::NotFound("domain my-domain".to_string());
        assert_eq!(format!("{}", err), "Not found: domain my-domain");

        let err = ProviderError::Configuration("api token missing".to_string());
        assert_eq!(format!("{}", err), "Configuration error: api token missing");

        let err = ProviderError::UnknownResource("opslevel_widget".to_string());
        assert_eq!(format!("{}", err), "Unknown type: opslevel_widget");
    }

    #[test]
    fn test_api_error_joins_messages() {
        let err = ProviderError::Api(vec![
            "name can't be blank".to_string(),
            "owner does not exist".to_string(),
        ]);
        assert_eq!(
            format!("{}", err),
            "API error: name can't be blank; owner does not exist"
        );
    }

    #[test]
    fn test_to_diagnostic() {
        let diag = ProviderError::Decode("missing field `name`".to_string()).to_diagnostic();
        assert_eq!(diag.severity, DiagnosticSeverity::Error);
        assert!(diag.summary.contains("missing field `name`"));
    }
}
