//! Team queries and mutations.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{check_mutation_errors, ApiError, Id};
use crate::client::{Client, PAGE_SIZE};
use crate::error::ProviderError;
use crate::pagination::{collect_pages, Page};

const TEAM_FIELDS: &str = "id alias name responsibilities members { email }";

/// A team owning catalog objects.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// Opaque identifier.
    pub id: Id,
    /// Default alias, server-assigned from the name.
    #[serde(default)]
    pub alias: Option<String>,
    /// Display name.
    pub name: String,
    /// What the team is responsible for.
    #[serde(default)]
    pub responsibilities: Option<String>,
    /// Team members.
    #[serde(default)]
    pub members: Vec<TeamMember>,
}

/// A member of a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    /// The member's email address.
    pub email: String,
}

/// Input for creating or updating a team.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInput {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// What the team is responsible for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsibilities: Option<String>,
}

#[derive(Deserialize)]
struct TeamGetData {
    account: TeamGetAccount,
}

#[derive(Deserialize)]
struct TeamGetAccount {
    team: Option<Team>,
}

#[derive(Deserialize)]
struct TeamListData {
    account: TeamListAccount,
}

#[derive(Deserialize)]
struct TeamListAccount {
    teams: Page<Team>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamCreateData {
    team_create: TeamPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamUpdateData {
    team_update: TeamPayload,
}

#[derive(Deserialize)]
struct TeamPayload {
    team: Option<Team>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamDeleteData {
    team_delete: TeamDeletePayload,
}

#[derive(Deserialize)]
struct TeamDeletePayload {
    #[serde(default)]
    errors: Vec<ApiError>,
}

impl Client {
    /// Create a team.
    pub async fn create_team(&self, input: TeamInput) -> Result<Team, ProviderError> {
        let document = format!(
            "mutation TeamCreate($input: TeamCreateInput!) {{ teamCreate(input: $input) {{ team {{ {TEAM_FIELDS} }} errors {{ message path }} }} }}"
        );
        let data: TeamCreateData = self.query(&document, json!({ "input": input })).await?;
        check_mutation_errors(data.team_create.errors)?;
        data.team_create
            .team
            .ok_or_else(|| ProviderError::Api(vec!["teamCreate returned no team".to_string()]))
    }

    /// Fetch a team by id or alias.
    pub async fn get_team(&self, identifier: &str) -> Result<Team, ProviderError> {
        let document = format!(
            "query TeamGet($id: ID!) {{ account {{ team(input: {{ id: $id }}) {{ {TEAM_FIELDS} }} }} }}"
        );
        let data: TeamGetData = self.query(&document, json!({ "id": identifier })).await?;
        data.account
            .team
            .ok_or_else(|| ProviderError::NotFound(format!("team {}", identifier)))
    }

    /// Update a team by id.
    pub async fn update_team(&self, id: &str, input: TeamInput) -> Result<Team, ProviderError> {
        let document = format!(
            "mutation TeamUpdate($team: IdentifierInput!, $input: TeamUpdateInput!) {{ teamUpdate(team: $team, input: $input) {{ team {{ {TEAM_FIELDS} }} errors {{ message path }} }} }}"
        );
        let data: TeamUpdateData = self
            .query(&document, json!({ "team": { "id": id }, "input": input }))
            .await?;
        check_mutation_errors(data.team_update.errors)?;
        data.team_update
            .team
            .ok_or_else(|| ProviderError::Api(vec!["teamUpdate returned no team".to_string()]))
    }

    /// Delete a team by id.
    pub async fn delete_team(&self, id: &str) -> Result<(), ProviderError> {
        let document = "mutation TeamDelete($resource: IdentifierInput!) { teamDelete(resource: $resource) { errors { message path } } }";
        let data: TeamDeleteData = self
            .query(document, json!({ "resource": { "id": id } }))
            .await?;
        check_mutation_errors(data.team_delete.errors)
    }

    /// List every team, following pagination to exhaustion.
    pub async fn list_teams(&self) -> Result<Vec<Team>, ProviderError> {
        collect_pages(move |after| self.team_page(after)).await
    }

    async fn team_page(&self, after: Option<String>) -> Result<Page<Team>, ProviderError> {
        let document = format!(
            "query TeamList($after: String, $first: Int!) {{ account {{ teams(after: $after, first: $first) {{ nodes {{ {TEAM_FIELDS} }} pageInfo {{ endCursor hasNextPage }} }} }} }}"
        );
        let data: TeamListData = self
            .query(&document, json!({ "after": after, "first": PAGE_SIZE }))
            .await?;
        Ok(data.account.teams)
    }
}
