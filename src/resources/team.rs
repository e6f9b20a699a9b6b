//! The `opslevel_team` resource.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::api::{Team, TeamInput};
use crate::client::Client;
use crate::error::ProviderError;
use crate::resource::ResourceHandler;
use crate::schema::{Attribute, AttributeFlags, AttributeType, Schema};

/// Flat state model for a team.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamModel {
    /// Backend id, computed on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Server-assigned default alias.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// What the team is responsible for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsibilities: Option<String>,
    /// Member email addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<String>>,
    /// When the resource was last updated through this provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

pub(crate) fn flatten_team(team: Team) -> TeamModel {
    TeamModel {
        id: Some(team.id.0),
        name: team.name,
        alias: team.alias,
        responsibilities: team.responsibilities,
        members: if team.members.is_empty() {
            None
        } else {
            Some(team.members.into_iter().map(|m| m.email).collect())
        },
        last_updated: None,
    }
}

fn expand_team(model: &TeamModel) -> TeamInput {
    TeamInput {
        name: Some(model.name.clone()),
        responsibilities: model.responsibilities.clone(),
    }
}

pub(crate) fn team_schema() -> Schema {
    Schema::v0()
        .with_attribute(
            "id",
            Attribute::computed_string().with_description("The id of the team."),
        )
        .with_attribute(
            "name",
            Attribute::required_string().with_description("The display name of the team."),
        )
        .with_attribute(
            "alias",
            Attribute::computed_string().with_description("The default alias of the team."),
        )
        .with_attribute(
            "responsibilities",
            Attribute::optional_string()
                .with_description("A description of what the team is responsible for."),
        )
        .with_attribute(
            "members",
            Attribute::new(
                AttributeType::list(AttributeType::String),
                AttributeFlags::computed(),
            )
            .with_description("The email addresses of the team members."),
        )
}

/// Handler wiring the team resource to the API.
pub struct TeamResource;

#[async_trait]
impl ResourceHandler for TeamResource {
    type Resource = Team;
    type Model = TeamModel;

    fn type_name(&self) -> &'static str {
        "opslevel_team"
    }

    fn schema(&self) -> Schema {
        team_schema().with_attribute("last_updated", Attribute::computed_string())
    }

    fn resource_id<'a>(&self, model: &'a TeamModel) -> Option<&'a str> {
        model.id.as_deref()
    }

    async fn do_create(&self, client: &Client, model: &TeamModel) -> Result<Team, ProviderError> {
        client.create_team(expand_team(model)).await
    }

    async fn do_read(&self, client: &Client, id: &str) -> Result<Team, ProviderError> {
        client.get_team(id).await
    }

    async fn do_update(
        &self,
        client: &Client,
        id: &str,
        model: &TeamModel,
    ) -> Result<Team, ProviderError> {
        client.update_team(id, expand_team(model)).await
    }

    async fn do_delete(&self, client: &Client, id: &str) -> Result<(), ProviderError> {
        client.delete_team(id).await
    }

    fn build_model(&self, team: Team) -> Result<TeamModel, ProviderError> {
        Ok(flatten_team(team))
    }
}
