//! Domain queries and mutations.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{check_mutation_errors, ApiError, EntityRef, Id};
use crate::client::{Client, PAGE_SIZE};
use crate::error::ProviderError;
use crate::pagination::{collect_pages, Page};

const DOMAIN_FIELDS: &str = "id aliases name description note owner { id }";

/// A domain: a top-level grouping of systems and services.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
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
    /// Optional free-form note.
    #[serde(default)]
    pub note: Option<String>,
    /// Owning team, if any.
    #[serde(default)]
    pub owner: Option<EntityRef>,
}

/// Input for creating or updating a domain.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainInput {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description, cleared when omitted server-side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-form note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Id of the owning team.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

#[derive(Deserialize)]
struct DomainGetData {
    account: DomainGetAccount,
}

#[derive(Deserialize)]
struct DomainGetAccount {
    domain: Option<Domain>,
}

#[derive(Deserialize)]
struct DomainListData {
    account: DomainListAccount,
}

#[derive(Deserialize)]
struct DomainListAccount {
    domains: Page<Domain>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DomainCreateData {
    domain_create: DomainPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DomainUpdateData {
    domain_update: DomainPayload,
}

#[derive(Deserialize)]
struct DomainPayload {
    domain: Option<Domain>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DomainDeleteData {
    domain_delete: DeletePayload,
}

#[derive(Deserialize)]
struct DeletePayload {
    #[serde(default)]
    errors: Vec<ApiError>,
}

impl Client {
    /// Create a domain.
    pub async fn create_domain(&self, input: DomainInput) -> Result<Domain, ProviderError> {
        let document = format!(
            "mutation DomainCreate($input: DomainInput!) {{ domainCreate(input: $input) {{ domain {{ {DOMAIN_FIELDS} }} errors {{ message path }} }} }}"
        );
        let data: DomainCreateData = self.query(&document, json!({ "input": input })).await?;
        check_mutation_errors(data.domain_create.errors)?;
        data.domain_create
            .domain
            .ok_or_else(|| ProviderError::Api(vec!["domainCreate returned no domain".to_string()]))
    }

    /// Fetch a domain by id or alias.
    pub async fn get_domain(&self, identifier: &str) -> Result<Domain, ProviderError> {
        let document = format!(
            "query DomainGet($id: ID!) {{ account {{ domain(input: {{ id: $id }}) {{ {DOMAIN_FIELDS} }} }} }}"
        );
        let data: DomainGetData = self.query(&document, json!({ "id": identifier })).await?;
        data.account
            .domain
            .ok_or_else(|| ProviderError::NotFound(format!("domain {}", identifier)))
    }

    /// Update a domain by id.
    pub async fn update_domain(
        &self,
        id: &str,
        input: DomainInput,
    ) -> Result<Domain, ProviderError> {
        let document = format!(
            "mutation DomainUpdate($domain: IdentifierInput!, $input: DomainInput!) {{ domainUpdate(domain: $domain, input: $input) {{ domain {{ {DOMAIN_FIELDS} }} errors {{ message path }} }} }}"
        );
        let data: DomainUpdateData = self
            .query(&document, json!({ "domain": { "id": id }, "input": input }))
            .await?;
        check_mutation_errors(data.domain_update.errors)?;
        data.domain_update
            .domain
            .ok_or_else(|| ProviderError::Api(vec!["domainUpdate returned no domain".to_string()]))
    }

    /// Delete a domain by id.
    pub async fn delete_domain(&self, id: &str) -> Result<(), ProviderError> {
        let document = "mutation DomainDelete($resource: IdentifierInput!) { domainDelete(resource: $resource) { errors { message path } } }";
        let data: DomainDeleteData = self
            .query(document, json!({ "resource": { "id": id } }))
            .await?;
        check_mutation_errors(data.domain_delete.errors)
    }

    /// List every domain, following pagination to exhaustion.
    pub async fn list_domains(&self) -> Result<Vec<Domain>, ProviderError> {
        collect_pages(move |after| self.domain_page(after)).await
    }

    async fn domain_page(&self, after: Option<String>) -> Result<Page<Domain>, ProviderError> {
        let document = format!(
            "query DomainList($after: String, $first: Int!) {{ account {{ domains(after: $after, first: $first) {{ nodes {{ {DOMAIN_FIELDS} }} pageInfo {{ endCursor hasNextPage }} }} }} }}"
        );
        let data: DomainListData = self
            .query(&document, json!({ "after": after, "first": PAGE_SIZE }))
            .await?;
        Ok(data.account.domains)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_wire_shape() {
        let domain: Domain = serde_json::from_value(json!({
            "id": "Z2lkOi8vMQ",
            "aliases": ["payments"],
            "name": "Payments",
            "description": null,
            "note": "owned by platform",
            "owner": {"id": "Z2lkOi8vMg"}
        }))
        .unwrap();

        assert_eq!(domain.id.as_str(), "Z2lkOi8vMQ");
        assert_eq!(domain.aliases, vec!["payments"]);
        assert_eq!(domain.owner.unwrap().id.as_str(), "Z2lkOi8vMg");
    }

    #[test]
    fn test_input_omits_unset_fields() {
        let input = DomainInput {
            name: Some("Payments".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(input).unwrap();
        assert_eq!(value, json!({"name": "Payments"}));
    }
}
