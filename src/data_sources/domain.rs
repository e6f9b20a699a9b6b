//! Domain data sources.

use async_trait::async_trait;
use serde_json::Value;

use crate::api::Domain;
use crate::client::Client;
use crate::data_source::{MultiLookup, SingleLookup};
use crate::error::ProviderError;
use crate::resources::domain::{domain_schema, flatten_domain};
use crate::resources::DomainModel;
use crate::schema::{Attribute, Schema};

/// Looks up one domain by id or alias.
pub struct DomainDataSource;

#[async_trait]
impl SingleLookup for DomainDataSource {
    type Data = Domain;
    type Model = DomainModel;

    fn type_name(&self) -> &'static str {
        "opslevel_domain"
    }

    fn schema(&self) -> Schema {
        super::computed_view(domain_schema()).with_attribute(
            "identifier",
            Attribute::required_string()
                .with_description("The id or alias of the domain to look up."),
        )
    }

    async fn read(&self, client: &Client, identifier: &str) -> Result<Domain, ProviderError> {
        client.get_domain(identifier).await
    }

    fn to_model(&self, data: Domain) -> Result<DomainModel, ProviderError> {
        Ok(flatten_domain(data))
    }
}

/// Lists every domain in the account.
pub struct DomainsDataSource;

#[async_trait]
impl MultiLookup for DomainsDataSource {
    type Data = Domain;
    type Model = DomainModel;

    fn type_name(&self) -> &'static str {
        "opslevel_domains"
    }

    fn schema(&self) -> Schema {
        Schema::v0().with_attribute(
            "all",
            super::all_attribute(&domain_schema())
                .with_description("All domains in the account."),
        )
    }

    async fn read_all(&self, client: &Client, _config: &Value) -> Result<Vec<Domain>, ProviderError> {
        client.list_domains().await
    }

    fn to_model(&self, data: Domain) -> Result<DomainModel, ProviderError> {
        Ok(flatten_domain(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_schema_has_identifier() {
        let schema = DomainDataSource.schema();
        let identifier = schema.attribute("identifier").unwrap();
        assert!(identifier.flags.required);

        // Resource attributes come back computed.
        let name = schema.attribute("name").unwrap();
        assert!(name.flags.computed);
        assert!(!name.flags.required);
    }

    #[test]
    fn test_multi_schema_has_all() {
        let schema = DomainsDataSource.schema();
        assert!(schema.attribute("all").unwrap().flags.computed);
    }
}
