//! Provider configuration resolution.
//!
//! Configuration is resolved once at configure time, field by field, with the
//! precedence: explicit config value, then environment variable, then hard
//! default. The resolved [`ProviderConfig`] is immutable for the rest of the
//! process.
//!
//! # Environment Variables
//!
//! - `OPSLEVEL_API_TOKEN`: fallback for `api_token` (required one way or the other)
//! - `OPSLEVEL_API_URL`: fallback for `api_url`
//! - `OPSLEVEL_API_TIMEOUT`: fallback for `api_timeout`, in seconds

use std::time::Duration;

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::schema::Diagnostic;

/// Environment fallback for the API token.
pub const ENV_API_TOKEN: &str = "OPSLEVEL_API_TOKEN";
/// Environment fallback for the API URL.
pub const ENV_API_URL: &str = "OPSLEVEL_API_URL";
/// Environment fallback for the API timeout, in seconds.
pub const ENV_API_TIMEOUT: &str = "OPSLEVEL_API_TIMEOUT";

/// Default API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.opslevel.com/";
/// Default request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Resolved provider configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Bearer token for the API. Sensitive; never logged.
    pub api_token: String,
    /// Base URL of the API.
    pub api_url: Url,
    /// Request timeout applied to every API call.
    pub api_timeout: Duration,
}

/// Resolve provider configuration from the declared config block and the
/// process environment.
///
/// Returns the resolved config (or `None` when resolution failed fatally)
/// together with the diagnostics produced along the way. A missing token is
/// the one fatal case; a malformed timeout only produces a warning and falls
/// back to the default.
pub fn resolve(config: &Value) -> (Option<ProviderConfig>, Vec<Diagnostic>) {
    resolve_with(config, |name| std::env::var(name).ok())
}

/// Resolve provider configuration with an injected environment lookup.
///
/// [`resolve`] is the process-env front door; this variant exists so
/// precedence can be exercised without mutating process environment.
pub fn resolve_with<F>(config: &Value, env: F) -> (Option<ProviderConfig>, Vec<Diagnostic>)
where
    F: Fn(&str) -> Option<String>,
{
    let mut diagnostics = Vec::new();

    let api_token = match string_field(config, "api_token").or_else(|| env(ENV_API_TOKEN)) {
        Some(token) if !token.is_empty() => token,
        _ => {
            diagnostics.push(
                Diagnostic::error("Missing API token")
                    .with_detail(format!(
                        "Set api_token in the provider configuration or export {}",
                        ENV_API_TOKEN
                    ))
                    .with_attribute("api_token"),
            );
            return (None, diagnostics);
        }
    };

    let raw_url = string_field(config, "api_url")
        .or_else(|| env(ENV_API_URL))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let api_url = match Url::parse(&raw_url) {
        Ok(url) => url,
        Err(e) => {
            diagnostics.push(
                Diagnostic::error("Invalid API URL")
                    .with_detail(format!("'{}' is not a valid URL: {}", raw_url, e))
                    .with_attribute("api_url"),
            );
            return (None, diagnostics);
        }
    };

    let timeout_secs = resolve_timeout(config, &env, &mut diagnostics);

    debug!(
        api_url = %api_url,
        api_timeout_secs = timeout_secs,
        "resolved provider configuration"
    );

    (
        Some(ProviderConfig {
            api_token,
            api_url,
            api_timeout: Duration::from_secs(timeout_secs),
        }),
        diagnostics,
    )
}

fn resolve_timeout<F>(config: &Value, env: &F, diagnostics: &mut Vec<Diagnostic>) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    match config.get("api_timeout") {
        Some(Value::Number(n)) => {
            if let Some(secs) = n.as_u64() {
                return secs;
            }
            diagnostics.push(
                Diagnostic::warning("Ignoring api_timeout")
                    .with_detail(format!(
                        "'{}' is not a non-negative integer; using the default of {} seconds",
                        n, DEFAULT_TIMEOUT_SECS
                    ))
                    .with_attribute("api_timeout"),
            );
        }
        Some(Value::Null) | None => {}
        Some(other) => {
            diagnostics.push(
                Diagnostic::warning("Ignoring api_timeout")
                    .with_detail(format!(
                        "Expected an integer number of seconds, got {}; using the default of {} seconds",
                        other, DEFAULT_TIMEOUT_SECS
                    ))
                    .with_attribute("api_timeout"),
            );
        }
    }

    if let Some(raw) = env(ENV_API_TIMEOUT) {
        match raw.parse::<u64>() {
            Ok(secs) => return secs,
            Err(_) => {
                diagnostics.push(
                    Diagnostic::warning(format!("Ignoring {}", ENV_API_TIMEOUT))
                        .with_detail(format!(
                            "'{}' is not a non-negative integer; using the default of {} seconds",
                            raw, DEFAULT_TIMEOUT_SECS
                        ))
                        .with_attribute("api_timeout"),
                );
            }
        }
    }

    DEFAULT_TIMEOUT_SECS
}

fn string_field(config: &Value, name: &str) -> Option<String> {
    config
        .get(name)
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_token_from_config_wins_over_env() {
        let config = json!({"api_token": "from-config"});
        let (resolved, diagnostics) =
            resolve_with(&config, |name| match name {
                ENV_API_TOKEN => Some("from-env".to_string()),
                _ => None,
            });

        assert!(diagnostics.is_empty());
        assert_eq!(resolved.unwrap().api_token, "from-config");
    }

    #[test]
    fn test_token_falls_back_to_env() {
        let (resolved, diagnostics) = resolve_with(&json!({}), |name| match name {
            ENV_API_TOKEN => Some("from-env".to_string()),
            _ => None,
        });

        assert!(diagnostics.is_empty());
        assert_eq!(resolved.unwrap().api_token, "from-env");
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let (resolved, diagnostics) = resolve_with(&json!({}), no_env);

        assert!(resolved.is_none());
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].is_error());
        assert_eq!(diagnostics[0].attribute, Some("api_token".to_string()));
    }

    #[test]
    fn test_url_precedence() {
        let config = json!({"api_token": "t", "api_url": "https://config.example.com/"});
        let (resolved, _) = resolve_with(&config, |name| match name {
            ENV_API_URL => Some("https://env.example.com/".to_string()),
            _ => None,
        });
        assert_eq!(
            resolved.unwrap().api_url.as_str(),
            "https://config.example.com/"
        );

        let (resolved, _) = resolve_with(&json!({"api_token": "t"}), |name| match name {
            ENV_API_URL => Some("https://env.example.com/".to_string()),
            _ => None,
        });
        assert_eq!(
            resolved.unwrap().api_url.as_str(),
            "https://env.example.com/"
        );

        let (resolved, _) = resolve_with(&json!({"api_token": "t"}), no_env);
        assert_eq!(resolved.unwrap().api_url.as_str(), DEFAULT_API_URL);
    }

    #[test]
    fn test_invalid_url_is_fatal() {
        let config = json!({"api_token": "t", "api_url": "not a url"});
        let (resolved, diagnostics) = resolve_with(&config, no_env);

        assert!(resolved.is_none());
        assert!(diagnostics.iter().any(Diagnostic::is_error));
    }

    #[test]
    fn test_timeout_precedence() {
        let config = json!({"api_token": "t", "api_timeout": 30});
        let (resolved, diagnostics) = resolve_with(&config, |name| match name {
            ENV_API_TIMEOUT => Some("60".to_string()),
            _ => None,
        });
        assert!(diagnostics.is_empty());
        assert_eq!(resolved.unwrap().api_timeout, Duration::from_secs(30));

        let (resolved, _) = resolve_with(&json!({"api_token": "t"}), |name| match name {
            ENV_API_TIMEOUT => Some("60".to_string()),
            _ => None,
        });
        assert_eq!(resolved.unwrap().api_timeout, Duration::from_secs(60));

        let (resolved, _) = resolve_with(&json!({"api_token": "t"}), no_env);
        assert_eq!(
            resolved.unwrap().api_timeout,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_unparseable_timeout_env_warns_and_defaults() {
        let (resolved, diagnostics) = resolve_with(&json!({"api_token": "t"}), |name| match name {
            ENV_API_TIMEOUT => Some("abc".to_string()),
            _ => None,
        });

        let resolved = resolved.expect("a bad timeout must not be fatal");
        assert_eq!(
            resolved.api_timeout,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        );
        assert_eq!(diagnostics.len(), 1);
        assert!(!diagnostics[0].is_error());
    }

    #[test]
    fn test_non_integer_timeout_config_warns_and_defaults() {
        let config = json!({"api_token": "t", "api_timeout": "abc"});
        let (resolved, diagnostics) = resolve_with(&config, no_env);

        assert_eq!(
            resolved.unwrap().api_timeout,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        );
        assert_eq!(diagnostics.len(), 1);
        assert!(!diagnostics[0].is_error());
    }
}
