//! Testing utilities for the provider.
//!
//! [`ProviderTester`] wraps an [`OpsLevelProvider`] and turns operation
//! responses into plain `Result`s: error diagnostics become `Err`, state
//! comes back as the `Ok` value. Point the provider at a mock GraphQL
//! endpoint (e.g. `wiremock`) and drive whole lifecycles from tests.
//!
//! # Example
//!
//! ```ignore
//! use opslevel_provider::testing::ProviderTester;
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn test_create_domain() {
//!     let tester = ProviderTester::new();
//!     tester
//!         .configure(json!({"api_token": "test", "api_url": server.uri()}))
//!         .unwrap();
//!
//!     let state = tester
//!         .create("opslevel_domain", json!({"name": "Payments"}))
//!         .await
//!         .unwrap();
//!     assert_eq!(state["name"], "Payments");
//! }
//! ```

use serde_json::Value;

use crate::provider::OpsLevelProvider;
use crate::resource::OperationResponse;
use crate::schema::{Diagnostic, ProviderSchema};

/// A test harness over [`OpsLevelProvider`].
pub struct ProviderTester {
    provider: OpsLevelProvider,
}

impl ProviderTester {
    /// Create a tester around a fresh provider.
    pub fn new() -> Self {
        Self {
            provider: OpsLevelProvider::new(),
        }
    }

    /// Access the underlying provider.
    pub fn provider(&self) -> &OpsLevelProvider {
        &self.provider
    }

    /// The provider's full schema.
    pub fn schema(&self) -> ProviderSchema {
        self.provider.schema()
    }

    /// Configure the provider, failing on error diagnostics.
    pub fn configure(&self, config: Value) -> Result<(), TestError> {
        check_diagnostics(self.provider.configure(&config))
    }

    /// Create a resource, returning the written state.
    pub async fn create(&self, type_name: &str, planned_state: Value) -> Result<Value, TestError> {
        unwrap_state(self.provider.create(type_name, &planned_state).await)
    }

    /// Read a resource, returning the refreshed state.
    pub async fn read(&self, type_name: &str, current_state: Value) -> Result<Value, TestError> {
        unwrap_state(self.provider.read(type_name, &current_state).await)
    }

    /// Update a resource, returning the written state.
    pub async fn update(&self, type_name: &str, planned_state: Value) -> Result<Value, TestError> {
        unwrap_state(self.provider.update(type_name, &planned_state).await)
    }

    /// Delete a resource.
    pub async fn delete(&self, type_name: &str, current_state: Value) -> Result<(), TestError> {
        check_diagnostics(self.provider.delete(type_name, &current_state).await.diagnostics)
    }

    /// Import a resource by external id, returning the written state.
    pub async fn import(&self, type_name: &str, id: &str) -> Result<Value, TestError> {
        unwrap_state(self.provider.import(type_name, id).await)
    }

    /// Read a data source, returning the written state.
    pub async fn read_data_source(
        &self,
        type_name: &str,
        config: Value,
    ) -> Result<Value, TestError> {
        unwrap_state(self.provider.read_data_source(type_name, &config).await)
    }

    /// Run create followed by read and return the refreshed state.
    pub async fn lifecycle_create(
        &self,
        type_name: &str,
        planned_state: Value,
    ) -> Result<Value, TestError> {
        let created = self.create(type_name, planned_state).await?;
        self.read(type_name, created).await
    }
}

impl Default for ProviderTester {
    fn default() -> Self {
        Self::new()
    }
}

/// Error type for test operations that fail with diagnostics.
#[derive(Debug)]
pub struct TestError {
    /// The error diagnostics that failed the operation.
    pub diagnostics: Vec<Diagnostic>,
}

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Operation failed with {} diagnostic(s):",
            self.diagnostics.len()
        )?;
        for diag in &self.diagnostics {
            write!(f, "  [{:?}] {}", diag.severity, diag.summary)?;
            if let Some(detail) = &diag.detail {
                write!(f, ": {}", detail)?;
            }
            if let Some(attr) = &diag.attribute {
                write!(f, " (at {})", attr)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl std::error::Error for TestError {}

fn check_diagnostics(diagnostics: Vec<Diagnostic>) -> Result<(), TestError> {
    let errors: Vec<_> = diagnostics
        .into_iter()
        .filter(Diagnostic::is_error)
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(TestError {
            diagnostics: errors,
        })
    }
}

fn unwrap_state(response: OperationResponse) -> Result<Value, TestError> {
    check_diagnostics(response.diagnostics)?;
    Ok(response.state.unwrap_or(Value::Null))
}

// =========================================================================
// Assertion Helpers
// =========================================================================

/// Assert that diagnostics contain no errors.
///
/// # Panics
///
/// Panics if there are any error diagnostics.
pub fn assert_no_errors(diagnostics: &[Diagnostic]) {
    let errors: Vec<_> = diagnostics.iter().filter(|d| d.is_error()).collect();

    assert!(
        errors.is_empty(),
        "Expected no errors, but got {} error(s): {:?}",
        errors.len(),
        errors.iter().map(|d| &d.summary).collect::<Vec<_>>()
    );
}

/// Assert that diagnostics contain at least one error.
///
/// # Panics
///
/// Panics if there are no error diagnostics.
pub fn assert_has_errors(diagnostics: &[Diagnostic]) {
    assert!(
        diagnostics.iter().any(Diagnostic::is_error),
        "Expected at least one error, but got none"
    );
}

/// Assert that diagnostics contain an error whose summary contains the given
/// substring.
///
/// # Panics
///
/// Panics if no error diagnostic matches.
pub fn assert_error_contains(diagnostics: &[Diagnostic], substring: &str) {
    let found = diagnostics
        .iter()
        .any(|d| d.is_error() && d.summary.contains(substring));

    assert!(
        found,
        "Expected an error containing '{}', but no matching error found. Errors: {:?}",
        substring,
        diagnostics
            .iter()
            .filter(|d| d.is_error())
            .map(|d| &d.summary)
            .collect::<Vec<_>>()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DiagnosticSeverity as Severity;

    #[test]
    fn test_assert_no_errors() {
        assert_no_errors(&[Diagnostic::warning("just a warning")]);
    }

    #[test]
    #[should_panic(expected = "Expected no errors")]
    fn test_assert_no_errors_fails() {
        assert_no_errors(&[Diagnostic::error("an error")]);
    }

    #[test]
    fn test_assert_has_errors() {
        assert_has_errors(&[Diagnostic::error("an error")]);
    }

    #[test]
    fn test_assert_error_contains() {
        let diagnostics = vec![Diagnostic::error("Invalid configuration value")];
        assert_error_contains(&diagnostics, "Invalid");
        assert_error_contains(&diagnostics, "configuration");
    }

    #[test]
    fn test_test_error_display() {
        let err = TestError {
            diagnostics: vec![
                Diagnostic::error("First error").with_attribute("name"),
                Diagnostic::error("Second error").with_detail("More info"),
            ],
        };

        let display = format!("{}", err);
        assert!(display.contains("First error"));
        assert!(display.contains("Second error"));
        assert!(display.contains("name"));
        assert!(display.contains("More info"));
        assert_eq!(err.diagnostics[0].severity, Severity::Error);
    }
}
