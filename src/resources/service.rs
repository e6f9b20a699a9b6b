//! The `opslevel_service` resource.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::api::{Service, ServiceInput};
use crate::client::Client;
use crate::convert::{map_to_tags, tags_to_map};
use crate::error::ProviderError;
use crate::resource::ResourceHandler;
use crate::schema::{Attribute, AttributeFlags, AttributeType, Schema};

/// Flat state model for a service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServiceModel {
    /// Backend id, computed on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Web framework.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    /// Primary implementation language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Alias of the owning team.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Alias of the service tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_alias: Option<String>,
    /// Alias of the lifecycle stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_alias: Option<String>,
    /// Key/value tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    /// Server-assigned aliases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<String>>,
    /// When the resource was last updated through this provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

pub(crate) fn flatten_service(service: Service) -> ServiceModel {
    ServiceModel {
        id: Some(service.id.0),
        name: service.name,
        description: service.description,
        framework: service.framework,
        language: service.language,
        owner: service.owner.map(|o| o.alias),
        tier_alias: service.tier.map(|t| t.alias),
        lifecycle_alias: service.lifecycle.map(|l| l.alias),
        tags: if service.tags.is_empty() {
            None
        } else {
            Some(tags_to_map(&service.tags))
        },
        aliases: if service.aliases.is_empty() {
            None
        } else {
            Some(service.aliases)
        },
        last_updated: None,
    }
}

fn expand_service(model: &ServiceModel) -> ServiceInput {
    ServiceInput {
        name: Some(model.name.clone()),
        description: model.description.clone(),
        framework: model.framework.clone(),
        language: model.language.clone(),
        owner_alias: model.owner.clone(),
        tier_alias: model.tier_alias.clone(),
        lifecycle_alias: model.lifecycle_alias.clone(),
        tags: model.tags.as_ref().map(map_to_tags),
    }
}

pub(crate) fn service_schema() -> Schema {
    Schema::v0()
        .with_attribute(
            "id",
            Attribute::computed_string().with_description("The id of the service."),
        )
        .with_attribute(
            "name",
            Attribute::required_string().with_description("The display name of the service."),
        )
        .with_attribute(
            "description",
            Attribute::optional_string().with_description("A brief description of the service."),
        )
        .with_attribute(
            "framework",
            Attribute::optional_string().with_description("The primary software framework."),
        )
        .with_attribute(
            "language",
            Attribute::optional_string()
                .with_description("The primary programming language of the service."),
        )
        .with_attribute(
            "owner",
            Attribute::optional_string()
                .with_description("The alias of the team that owns the service."),
        )
        .with_attribute(
            "tier_alias",
            Attribute::optional_string().with_description("The alias of the service tier."),
        )
        .with_attribute(
            "lifecycle_alias",
            Attribute::optional_string().with_description("The alias of the lifecycle stage."),
        )
        .with_attribute(
            "tags",
            Attribute::new(
                AttributeType::map(AttributeType::String),
                AttributeFlags::optional_computed(),
            )
            .with_description("Key/value tags assigned to the service."),
        )
        .with_attribute(
            "aliases",
            Attribute::new(
                AttributeType::list(AttributeType::String),
                AttributeFlags::computed(),
            )
            .with_description("The aliases of the service."),
        )
}

/// Handler wiring the service resource to the API.
pub struct ServiceResource;

#[async_trait]
impl ResourceHandler for ServiceResource {
    type Resource = Service;
    type Model = ServiceModel;

    fn type_name(&self) -> &'static str {
        "opslevel_service"
    }

    fn schema(&self) -> Schema {
        service_schema().with_attribute("last_updated", Attribute::computed_string())
    }

    fn resource_id<'a>(&self, model: &'a ServiceModel) -> Option<&'a str> {
        model.id.as_deref()
    }

    async fn do_create(
        &self,
        client: &Client,
        model: &ServiceModel,
    ) -> Result<Service, ProviderError> {
        client.create_service(expand_service(model)).await
    }

    async fn do_read(&self, client: &Client, id: &str) -> Result<Service, ProviderError> {
        client.get_service(id).await
    }

    async fn do_update(
        &self,
        client: &Client,
        id: &str,
        model: &ServiceModel,
    ) -> Result<Service, ProviderError> {
        client.update_service(id, expand_service(model)).await
    }

    async fn do_delete(&self, client: &Client, id: &str) -> Result<(), ProviderError> {
        client.delete_service(id).await
    }

    fn build_model(&self, service: Service) -> Result<ServiceModel, ProviderError> {
        Ok(flatten_service(service))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::AliasRef;

    fn sample_service() -> Service {
        Service {
            id: "Z2lkOi8vMQ".into(),
            aliases: vec!["checkout".to_string()],
            name: "Checkout".to_string(),
            description: Some("Takes the money".to_string()),
            framework: Some("axum".to_string()),
            language: Some("rust".to_string()),
            owner: Some(AliasRef {
                alias: "payments".to_string(),
            }),
            tier: Some(AliasRef {
                alias: "tier_1".to_string(),
            }),
            lifecycle: None,
            tags: vec![crate::api::Tag {
                key: "env".to_string(),
                value: "prod".to_string(),
            }],
        }
    }

    #[test]
    fn test_flatten_expand_round_trip_on_optional_computed_fields() {
        let service = sample_service();
        let model = flatten_service(service.clone());
        let input = expand_service(&model);

        // Every field that is both settable and server-echoed survives the
        // round trip unchanged.
        assert_eq!(input.name.as_deref(), Some("Checkout"));
        assert_eq!(input.description, service.description);
        assert_eq!(input.framework, service.framework);
        assert_eq!(input.language, service.language);
        assert_eq!(input.owner_alias.as_deref(), Some("payments"));
        assert_eq!(input.tier_alias.as_deref(), Some("tier_1"));
        assert_eq!(input.lifecycle_alias, None);
        assert_eq!(input.tags.unwrap(), service.tags);
    }

    #[test]
    fn test_flatten_maps_tags_to_attribute_map() {
        let model = flatten_service(sample_service());
        let tags = model.tags.unwrap();
        assert_eq!(tags.get("env").map(String::as_str), Some("prod"));
        assert_eq!(model.aliases.unwrap(), vec!["checkout"]);
    }

    #[test]
    fn test_flatten_empty_collections_to_unset() {
        let service = Service {
            id: "Z2lkOi8vMQ".into(),
            name: "Bare".to_string(),
            ..Default::default()
        };
        let model = flatten_service(service);
        assert!(model.tags.is_none());
        assert!(model.aliases.is_none());
    }
}
