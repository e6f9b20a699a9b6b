//! Service data sources.

use async_trait::async_trait;
use serde_json::Value;

use crate::api::{Service, ServiceFilter};
use crate::client::Client;
use crate::convert::optional_string;
use crate::data_source::{MultiLookup, SingleLookup};
use crate::error::ProviderError;
use crate::resources::service::{flatten_service, service_schema};
use crate::resources::ServiceModel;
use crate::schema::{Attribute, Schema};

/// Looks up one service by id or alias.
pub struct ServiceDataSource;

#[async_trait]
impl SingleLookup for ServiceDataSource {
    type Data = Service;
    type Model = ServiceModel;

    fn type_name(&self) -> &'static str {
        "opslevel_service"
    }

    fn schema(&self) -> Schema {
        super::computed_view(service_schema()).with_attribute(
            "identifier",
            Attribute::required_string()
                .with_description("The id or alias of the service to look up."),
        )
    }

    async fn read(&self, client: &Client, identifier: &str) -> Result<Service, ProviderError> {
        client.get_service(identifier).await
    }

    fn to_model(&self, data: Service) -> Result<ServiceModel, ProviderError> {
        Ok(flatten_service(data))
    }
}

/// Lists services, optionally narrowed by one filter attribute.
pub struct ServicesDataSource;

/// The first declared filter attribute present in the read config wins; the
/// backend accepts one filter per listing.
fn filter_from(config: &Value) -> Option<ServiceFilter> {
    optional_string(config, "framework")
        .map(ServiceFilter::Framework)
        .or_else(|| optional_string(config, "language").map(ServiceFilter::Language))
        .or_else(|| optional_string(config, "owner").map(ServiceFilter::OwnerAlias))
        .or_else(|| optional_string(config, "tag").map(ServiceFilter::Tag))
}

#[async_trait]
impl MultiLookup for ServicesDataSource {
    type Data = Service;
    type Model = ServiceModel;

    fn type_name(&self) -> &'static str {
        "opslevel_services"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_attribute(
                "framework",
                Attribute::optional_string().with_description("Only list services with this framework."),
            )
            .with_attribute(
                "language",
                Attribute::optional_string().with_description("Only list services with this language."),
            )
            .with_attribute(
                "owner",
                Attribute::optional_string()
                    .with_description("Only list services owned by the team with this alias."),
            )
            .with_attribute(
                "tag",
                Attribute::optional_string()
                    .with_description("Only list services carrying this key:value tag."),
            )
            .with_attribute(
                "all",
                super::all_attribute(&service_schema())
                    .with_description("The matching services."),
            )
    }

    async fn read_all(
        &self,
        client: &Client,
        config: &Value,
    ) -> Result<Vec<Service>, ProviderError> {
        let filter = filter_from(config);
        client.list_services(filter.as_ref()).await
    }

    fn to_model(&self, data: Service) -> Result<ServiceModel, ProviderError> {
        Ok(flatten_service(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_from_config() {
        assert_eq!(filter_from(&json!({})), None);

        assert_eq!(
            filter_from(&json!({"framework": "rails"})),
            Some(ServiceFilter::Framework("rails".to_string()))
        );
        assert_eq!(
            filter_from(&json!({"owner": "payments"})),
            Some(ServiceFilter::OwnerAlias("payments".to_string()))
        );
        assert_eq!(
            filter_from(&json!({"tag": "env:prod"})),
            Some(ServiceFilter::Tag("env:prod".to_string()))
        );

        // First declared filter wins when more than one is set.
        assert_eq!(
            filter_from(&json!({"framework": "rails", "language": "ruby"})),
            Some(ServiceFilter::Framework("rails".to_string()))
        );
    }

    #[test]
    fn test_multi_schema_declares_filters() {
        let schema = ServicesDataSource.schema();
        for name in ["framework", "language", "owner", "tag"] {
            assert!(schema.attribute(name).unwrap().flags.optional, "{}", name);
        }
        assert!(schema.attribute("all").unwrap().flags.computed);
    }
}
