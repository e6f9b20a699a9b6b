//! Team data sources.

use async_trait::async_trait;
use serde_json::Value;

use crate::api::Team;
use crate::client::Client;
use crate::data_source::{MultiLookup, SingleLookup};
use crate::error::ProviderError;
use crate::resources::team::{flatten_team, team_schema};
use crate::resources::TeamModel;
use crate::schema::{Attribute, Schema};

/// Looks up one team by id or alias.
pub struct TeamDataSource;

#[async_trait]
impl SingleLookup for TeamDataSource {
    type Data = Team;
    type Model = TeamModel;

    fn type_name(&self) -> &'static str {
        "opslevel_team"
    }

    fn schema(&self) -> Schema {
        super::computed_view(team_schema()).with_attribute(
            "identifier",
            Attribute::required_string().with_description("The id or alias of the team to look up."),
        )
    }

    async fn read(&self, client: &Client, identifier: &str) -> Result<Team, ProviderError> {
        client.get_team(identifier).await
    }

    fn to_model(&self, data: Team) -> Result<TeamModel, ProviderError> {
        Ok(flatten_team(data))
    }
}

/// Lists every team in the account.
pub struct TeamsDataSource;

#[async_trait]
impl MultiLookup for TeamsDataSource {
    type Data = Team;
    type Model = TeamModel;

    fn type_name(&self) -> &'static str {
        "opslevel_teams"
    }

    fn schema(&self) -> Schema {
        Schema::v0().with_attribute(
            "all",
            super::all_attribute(&team_schema()).with_description("All teams in the account."),
        )
    }

    async fn read_all(&self, client: &Client, _config: &Value) -> Result<Vec<Team>, ProviderError> {
        client.list_teams().await
    }

    fn to_model(&self, data: Team) -> Result<TeamModel, ProviderError> {
        Ok(flatten_team(data))
    }
}
