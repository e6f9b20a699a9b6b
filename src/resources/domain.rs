//! The `opslevel_domain` resource.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::api::{Domain, DomainInput};
use crate::client::Client;
use crate::error::ProviderError;
use crate::resource::ResourceHandler;
use crate::schema::{Attribute, AttributeFlags, AttributeType, Schema};

/// Flat state model for a domain.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DomainModel {
    /// Backend id, computed on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Id of the owning team.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Server-assigned aliases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<String>>,
    /// When the resource was last updated through this provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

pub(crate) fn flatten_domain(domain: Domain) -> DomainModel {
    DomainModel {
        id: Some(domain.id.0),
        name: domain.name,
        description: domain.description,
        note: domain.note,
        owner: domain.owner.map(|o| o.id.0),
        aliases: if domain.aliases.is_empty() {
            None
        } else {
            Some(domain.aliases)
        },
        last_updated: None,
    }
}

fn expand_domain(model: &DomainModel) -> DomainInput {
    DomainInput {
        name: Some(model.name.clone()),
        description: model.description.clone(),
        note: model.note.clone(),
        owner_id: model.owner.clone(),
    }
}

pub(crate) fn domain_schema() -> Schema {
    Schema::v0()
        .with_attribute(
            "id",
            Attribute::computed_string().with_description("The id of the domain."),
        )
        .with_attribute(
            "name",
            Attribute::required_string().with_description("The display name of the domain."),
        )
        .with_attribute(
            "description",
            Attribute::optional_string().with_description("The description of the domain."),
        )
        .with_attribute(
            "note",
            Attribute::optional_string().with_description("Additional information about the domain."),
        )
        .with_attribute(
            "owner",
            Attribute::optional_string().with_description("The id of the team that owns the domain."),
        )
        .with_attribute(
            "aliases",
            Attribute::new(
                AttributeType::list(AttributeType::String),
                AttributeFlags::computed(),
            )
            .with_description("The aliases of the domain."),
        )
}

/// Handler wiring the domain resource to the API.
pub struct DomainResource;

#[async_trait]
impl ResourceHandler for DomainResource {
    type Resource = Domain;
    type Model = DomainModel;

    fn type_name(&self) -> &'static str {
        "opslevel_domain"
    }

    fn schema(&self) -> Schema {
        domain_schema().with_attribute("last_updated", Attribute::computed_string())
    }

    fn resource_id<'a>(&self, model: &'a DomainModel) -> Option<&'a str> {
        model.id.as_deref()
    }

    async fn do_create(
        &self,
        client: &Client,
        model: &DomainModel,
    ) -> Result<Domain, ProviderError> {
        client.create_domain(expand_domain(model)).await
    }

    async fn do_read(&self, client: &Client, id: &str) -> Result<Domain, ProviderError> {
        client.get_domain(id).await
    }

    async fn do_update(
        &self,
        client: &Client,
        id: &str,
        model: &DomainModel,
    ) -> Result<Domain, ProviderError> {
        client.update_domain(id, expand_domain(model)).await
    }

    async fn do_delete(&self, client: &Client, id: &str) -> Result<(), ProviderError> {
        client.delete_domain(id).await
    }

    fn build_model(&self, domain: Domain) -> Result<DomainModel, ProviderError> {
        Ok(flatten_domain(domain))
    }
}
