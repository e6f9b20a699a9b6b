//! The `opslevel_check` resource.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::api::{Check, CheckInput};
use crate::client::Client;
use crate::error::ProviderError;
use crate::resource::ResourceHandler;
use crate::schema::Attribute;
use crate::schema::Schema;

/// Flat state model for a check.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CheckModel {
    /// Backend id, computed on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Whether the check is being evaluated. Defaults to true server-side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Alias of the rubric category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Alias of the rubric level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// When the resource was last updated through this provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

fn flatten_check(check: Check) -> CheckModel {
    CheckModel {
        id: Some(check.id.0),
        name: check.name,
        enabled: Some(check.enabled),
        category: check.category.map(|c| c.alias),
        level: check.level.map(|l| l.alias),
        notes: check.notes,
        last_updated: None,
    }
}

fn expand_check(model: &CheckModel) -> CheckInput {
    CheckInput {
        name: Some(model.name.clone()),
        enabled: model.enabled,
        category_alias: model.category.clone(),
        level_alias: model.level.clone(),
        notes: model.notes.clone(),
    }
}

/// Handler wiring the check resource to the API.
pub struct CheckResource;

#[async_trait]
impl ResourceHandler for CheckResource {
    type Resource = Check;
    type Model = CheckModel;

    fn type_name(&self) -> &'static str {
        "opslevel_check"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_attribute(
                "id",
                Attribute::computed_string().with_description("The id of the check."),
            )
            .with_attribute(
                "name",
                Attribute::required_string().with_description("The display name of the check."),
            )
            .with_attribute(
                "enabled",
                Attribute::optional_bool()
                    .with_description("Whether the check is being evaluated."),
            )
            .with_attribute(
                "category",
                Attribute::optional_string()
                    .with_description("The alias of the rubric category."),
            )
            .with_attribute(
                "level",
                Attribute::optional_string().with_description("The alias of the rubric level."),
            )
            .with_attribute(
                "notes",
                Attribute::optional_string().with_description("Additional notes about the check."),
            )
            .with_attribute("last_updated", Attribute::computed_string())
    }

    fn resource_id<'a>(&self, model: &'a CheckModel) -> Option<&'a str> {
        model.id.as_deref()
    }

    async fn do_create(&self, client: &Client, model: &CheckModel) -> Result<Check, ProviderError> {
        client.create_check(expand_check(model)).await
    }

    async fn do_read(&self, client: &Client, id: &str) -> Result<Check, ProviderError> {
        client.get_check(id).await
    }

    async fn do_update(
        &self,
        client: &Client,
        id: &str,
        model: &CheckModel,
    ) -> Result<Check, ProviderError> {
        client.update_check(id, expand_check(model)).await
    }

    async fn do_delete(&self, client: &Client, id: &str) -> Result<(), ProviderError> {
        client.delete_check(id).await
    }

    fn build_model(&self, check: Check) -> Result<CheckModel, ProviderError> {
        Ok(flatten_check(check))
    }
}
