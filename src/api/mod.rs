//! Typed wrappers over the OpsLevel GraphQL API.
//!
//! One submodule per catalog object. Each carries the response DTO, the
//! mutation input, the GraphQL documents, and the [`Client`] methods that
//! execute them. The DTOs are point-in-time projections: the backend owns the
//! authoritative state, this layer never caches.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

mod check;
mod domain;
mod service;
mod team;
mod user;

pub use check::{Check, CheckInput};
pub use domain::{Domain, DomainInput};
pub use service::{Service, ServiceFilter, ServiceInput, Tag};
pub use team::{Team, TeamInput, TeamMember};
pub use user::{User, UserInput};

/// Opaque backend identifier.
///
/// Identifiers round-trip unchanged from create through read back into state; nothing in
/// this crate inspects their contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(pub String);

impl Id {
    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Reference to another catalog object by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    /// The referenced object's id.
    pub id: Id,
}

/// Reference to another catalog object by alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRef {
    /// The referenced object's default alias.
    pub alias: String,
}

/// An error entry in a mutation payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    /// Human-readable message.
    pub message: String,
    /// Input path the error applies to, when the backend reports one.
    #[serde(default)]
    pub path: Vec<String>,
}

/// Fail if a mutation payload carried errors.
pub(crate) fn check_mutation_errors(errors: Vec<ApiError>) -> Result<(), ProviderError> {
    if errors.is_empty() {
        return Ok(());
    }
    Err(ProviderError::Api(
        errors
            .into_iter()
            .map(|e| {
                if e.path.is_empty() {
                    e.message
                } else {
                    format!("{}: {}", e.path.join("."), e.message)
                }
            })
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_is_transparent() {
        let id: Id = serde_json::from_str("\"Z2lkOi8v\"").unwrap();
        assert_eq!(id.as_str(), "Z2lkOi8v");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"Z2lkOi8v\"");
        assert_eq!(format!("{}", id), "Z2lkOi8v");
    }

    #[test]
    fn test_check_mutation_errors() {
        assert!(check_mutation_errors(vec![]).is_ok());

        let err = check_mutation_errors(vec![
            ApiError {
                message: "can't be blank".to_string(),
                path: vec!["input".to_string(), "name".to_string()],
            },
            ApiError {
                message: "does not exist".to_string(),
                path: vec![],
            },
        ])
        .unwrap_err();

        match err {
            ProviderError::Api(messages) => {
                assert_eq!(messages[0], "input.name: can't be blank");
                assert_eq!(messages[1], "does not exist");
            }
            other => panic!("expected Api error, got {}", other),
        }
    }
}
