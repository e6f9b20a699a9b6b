//! Check queries and mutations.
//!
//! The backend models many check variants; this layer exposes their common
//! core (name, category, level, enablement, notes) as one object.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{check_mutation_errors, AliasRef, ApiError, Id};
use crate::client::Client;
use crate::error::ProviderError;

const CHECK_FIELDS: &str = "id name enabled category { alias } level { alias } notes";

/// A check evaluated against services in the catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Check {
    /// Opaque identifier.
    pub id: Id,
    /// Display name.
    pub name: String,
    /// Whether the check is being evaluated.
    #[serde(default)]
    pub enabled: bool,
    /// Rubric category, referenced by alias.
    #[serde(default)]
    pub category: Option<AliasRef>,
    /// Rubric level, referenced by alias.
    #[serde(default)]
    pub level: Option<AliasRef>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Input for creating or updating a check.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInput {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Whether the check should be evaluated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Alias of the rubric category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_alias: Option<String>,
    /// Alias of the rubric level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_alias: Option<String>,
    /// Free-form notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Deserialize)]
struct CheckGetData {
    account: CheckGetAccount,
}

#[derive(Deserialize)]
struct CheckGetAccount {
    check: Option<Check>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckCreateData {
    check_create: CheckPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckUpdateData {
    check_update: CheckPayload,
}

#[derive(Deserialize)]
struct CheckPayload {
    check: Option<Check>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckDeleteData {
    check_delete: CheckDeletePayload,
}

#[derive(Deserialize)]
struct CheckDeletePayload {
    #[serde(default)]
    errors: Vec<ApiError>,
}

impl Client {
    /// Create a check.
    pub async fn create_check(&self, input: CheckInput) -> Result<Check, ProviderError> {
        let document = format!(
            "mutation CheckCreate($input: CheckCreateInput!) {{ checkCreate(input: $input) {{ check {{ {CHECK_FIELDS} }} errors {{ message path }} }} }}"
        );
        let data: CheckCreateData = self.query(&document, json!({ "input": input })).await?;
        check_mutation_errors(data.check_create.errors)?;
        data.check_create
            .check
            .ok_or_else(|| ProviderError::Api(vec!["checkCreate returned no check".to_string()]))
    }

    /// Fetch a check by id.
    pub async fn get_check(&self, identifier: &str) -> Result<Check, ProviderError> {
        let document = format!(
            "query CheckGet($id: ID!) {{ account {{ check(id: $id) {{ {CHECK_FIELDS} }} }} }}"
        );
        let data: CheckGetData = self.query(&document, json!({ "id": identifier })).await?;
        data.account
            .check
            .ok_or_else(|| ProviderError::NotFound(format!("check {}", identifier)))
    }

    /// Update a check by id.
    pub async fn update_check(&self, id: &str, input: CheckInput) -> Result<Check, ProviderError> {
        let document = format!(
            "mutation CheckUpdate($check: IdentifierInput!, $input: CheckUpdateInput!) {{ checkUpdate(check: $check, input: $input) {{ check {{ {CHECK_FIELDS} }} errors {{ message path }} }} }}"
        );
        let data: CheckUpdateData = self
            .query(&document, json!({ "check": { "id": id }, "input": input }))
            .await?;
        check_mutation_errors(data.check_update.errors)?;
        data.check_update
            .check
            .ok_or_else(|| ProviderError::Api(vec!["checkUpdate returned no check".to_string()]))
    }

    /// Delete a check by id.
    pub async fn delete_check(&self, id: &str) -> Result<(), ProviderError> {
        let document = "mutation CheckDelete($resource: IdentifierInput!) { checkDelete(resource: $resource) { errors { message path } } }";
        let data: CheckDeleteData = self
            .query(document, json!({ "resource": { "id": id } }))
            .await?;
        check_mutation_errors(data.check_delete.errors)
    }
}
