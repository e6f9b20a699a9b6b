//! Service queries and mutations.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{check_mutation_errors, AliasRef, ApiError, Id};
use crate::client::{Client, PAGE_SIZE};
use crate::error::ProviderError;
use crate::pagination::{collect_pages, Page};

const SERVICE_FIELDS: &str = "id aliases name description framework language owner { alias } tier { alias } lifecycle { alias } tags { key value }";

/// A service: a deployable unit of software tracked in the catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Opaque identifier.
    pub id: Id,
    /// Human-readable aliases, server-assigned.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Web framework, if any.
    #[serde(default)]
    pub framework: Option<String>,
    /// Primary implementation language.
    #[serde(default)]
    pub language: Option<String>,
    /// Owning team, referenced by alias.
    #[serde(default)]
    pub owner: Option<AliasRef>,
    /// Service tier, referenced by alias.
    #[serde(default)]
    pub tier: Option<AliasRef>,
    /// Lifecycle stage, referenced by alias.
    #[serde(default)]
    pub lifecycle: Option<AliasRef>,
    /// Key/value tags.
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// A key/value tag on a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag key.
    pub key: String,
    /// Tag value.
    pub value: String,
}

/// Input for creating or updating a service.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInput {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Web framework.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    /// Primary implementation language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Alias of the owning team.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_alias: Option<String>,
    /// Alias of the service tier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier_alias: Option<String>,
    /// Alias of the lifecycle stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle_alias: Option<String>,
    /// Key/value tags to assign.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

/// One filter applied to a service listing.
///
/// Each variant corresponds to one filterable field; the listing query takes
/// the field/value pair as variables, so every filter shares one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceFilter {
    /// Match services by framework.
    Framework(String),
    /// Match services by implementation language.
    Language(String),
    /// Match services by owning team alias.
    OwnerAlias(String),
    /// Match services carrying a `key:value` tag.
    Tag(String),
}

impl ServiceFilter {
    fn field(&self) -> &'static str {
        match self {
            Self::Framework(_) => "framework",
            Self::Language(_) => "language",
            Self::OwnerAlias(_) => "owner_alias",
            Self::Tag(_) => "tag",
        }
    }

    fn value(&self) -> &str {
        match self {
            Self::Framework(v) | Self::Language(v) | Self::OwnerAlias(v) | Self::Tag(v) => v,
        }
    }
}

#[derive(Deserialize)]
struct ServiceGetData {
    account: ServiceGetAccount,
}

#[derive(Deserialize)]
struct ServiceGetAccount {
    service: Option<Service>,
}

#[derive(Deserialize)]
struct ServiceListData {
    account: ServiceListAccount,
}

#[derive(Deserialize)]
struct ServiceListAccount {
    services: Page<Service>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceCreateData {
    service_create: ServicePayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceUpdateData {
    service_update: ServicePayload,
}

#[derive(Deserialize)]
struct ServicePayload {
    service: Option<Service>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceDeleteData {
    service_delete: ServiceDeletePayload,
}

#[derive(Deserialize)]
struct ServiceDeletePayload {
    #[serde(default)]
    errors: Vec<ApiError>,
}

impl Client {
    /// Create a service.
    pub async fn create_service(&self, input: ServiceInput) -> Result<Service, ProviderError> {
        let document = format!(
            "mutation ServiceCreate($input: ServiceCreateInput!) {{ serviceCreate(input: $input) {{ service {{ {SERVICE_FIELDS} }} errors {{ message path }} }} }}"
        );
        let data: ServiceCreateData = self.query(&document, json!({ "input": input })).await?;
        check_mutation_errors(data.service_create.errors)?;
        data.service_create
            .service
            .ok_or_else(|| ProviderError::Api(vec!["serviceCreate returned no service".to_string()]))
    }

    /// Fetch a service by id or alias.
    pub async fn get_service(&self, identifier: &str) -> Result<Service, ProviderError> {
        let document = format!(
            "query ServiceGet($id: ID!) {{ account {{ service(input: {{ id: $id }}) {{ {SERVICE_FIELDS} }} }} }}"
        );
        let data: ServiceGetData = self.query(&document, json!({ "id": identifier })).await?;
        data.account
            .service
            .ok_or_else(|| ProviderError::NotFound(format!("service {}", identifier)))
    }

    /// Update a service by id.
    pub async fn update_service(
        &self,
        id: &str,
        input: ServiceInput,
    ) -> Result<Service, ProviderError> {
        let document = format!(
            "mutation ServiceUpdate($service: IdentifierInput!, $input: ServiceUpdateInput!) {{ serviceUpdate(service: $service, input: $input) {{ service {{ {SERVICE_FIELDS} }} errors {{ message path }} }} }}"
        );
        let data: ServiceUpdateData = self
            .query(&document, json!({ "service": { "id": id }, "input": input }))
            .await?;
        check_mutation_errors(data.service_update.errors)?;
        data.service_update
            .service
            .ok_or_else(|| ProviderError::Api(vec!["serviceUpdate returned no service".to_string()]))
    }

    /// Delete a service by id.
    pub async fn delete_service(&self, id: &str) -> Result<(), ProviderError> {
        let document = "mutation ServiceDelete($resource: IdentifierInput!) { serviceDelete(resource: $resource) { errors { message path } } }";
        let data: ServiceDeleteData = self
            .query(document, json!({ "resource": { "id": id } }))
            .await?;
        check_mutation_errors(data.service_delete.errors)
    }

    /// List services, following pagination to exhaustion.
    ///
    /// One optional filter narrows the listing by framework, language, owner
    /// alias, or tag.
    pub async fn list_services(
        &self,
        filter: Option<&ServiceFilter>,
    ) -> Result<Vec<Service>, ProviderError> {
        collect_pages(move |after| self.service_page(filter, after)).await
    }

    async fn service_page(
        &self,
        filter: Option<&ServiceFilter>,
        after: Option<String>,
    ) -> Result<Page<Service>, ProviderError> {
        let document = format!(
            "query ServiceList($after: String, $first: Int!, $filter: ServiceFilterInput) {{ account {{ services(after: $after, first: $first, filter: $filter) {{ nodes {{ {SERVICE_FIELDS} }} pageInfo {{ endCursor hasNextPage }} }} }} }}"
        );
        let filter_value = filter.map(|f| json!({ "field": f.field(), "value": f.value() }));
        let data: ServiceListData = self
            .query(
                &document,
                json!({ "after": after, "first": PAGE_SIZE, "filter": filter_value }),
            )
            .await?;
        Ok(data.account.services)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_wire_shape() {
        let service: Service = serde_json::from_value(json!({
            "id": "Z2lkOi8vMQ",
            "aliases": ["checkout", "checkout-svc"],
            "name": "Checkout",
            "framework": "axum",
            "language": "rust",
            "owner": {"alias": "payments"},
            "tier": {"alias": "tier_1"},
            "lifecycle": null,
            "tags": [{"key": "env", "value": "prod"}]
        }))
        .unwrap();

        assert_eq!(service.aliases.len(), 2);
        assert_eq!(service.owner.unwrap().alias, "payments");
        assert!(service.lifecycle.is_none());
        assert_eq!(service.tags[0].key, "env");
    }

    #[test]
    fn test_filter_field_and_value() {
        let filter = ServiceFilter::OwnerAlias("payments".to_string());
        assert_eq!(filter.field(), "owner_alias");
        assert_eq!(filter.value(), "payments");

        let filter = ServiceFilter::Tag("env:prod".to_string());
        assert_eq!(filter.field(), "tag");
        assert_eq!(filter.value(), "env:prod");
    }

    #[test]
    fn test_input_wire_names() {
        let input = ServiceInput {
            name: Some("Checkout".to_string()),
            owner_alias: Some("payments".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(input).unwrap();
        assert_eq!(value, json!({"name": "Checkout", "ownerAlias": "payments"}));
    }
}
