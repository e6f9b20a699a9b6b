//! User queries and mutations.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{check_mutation_errors, ApiError, Id};
use crate::client::{Client, PAGE_SIZE};
use crate::error::ProviderError;
use crate::pagination::{collect_pages, Page};

const USER_FIELDS: &str = "id email name role";

/// A user account.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque identifier.
    pub id: Id,
    /// Email address; unique per account.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Role, e.g. `user` or `admin`.
    #[serde(default)]
    pub role: Option<String>,
}

/// Input for inviting or updating a user.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Role to assign.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Deserialize)]
struct UserGetData {
    account: UserGetAccount,
}

#[derive(Deserialize)]
struct UserGetAccount {
    user: Option<User>,
}

#[derive(Deserialize)]
struct UserListData {
    account: UserListAccount,
}

#[derive(Deserialize)]
struct UserListAccount {
    users: Page<User>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserInviteData {
    user_invite: UserPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserUpdateData {
    user_update: UserPayload,
}

#[derive(Deserialize)]
struct UserPayload {
    user: Option<User>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDeleteData {
    user_delete: UserDeletePayload,
}

#[derive(Deserialize)]
struct UserDeletePayload {
    #[serde(default)]
    errors: Vec<ApiError>,
}

impl Client {
    /// Invite a user by email.
    pub async fn invite_user(&self, email: &str, input: UserInput) -> Result<User, ProviderError> {
        let document = format!(
            "mutation UserInvite($email: String!, $input: UserInput!) {{ userInvite(email: $email, input: $input) {{ user {{ {USER_FIELDS} }} errors {{ message path }} }} }}"
        );
        let data: UserInviteData = self
            .query(&document, json!({ "email": email, "input": input }))
            .await?;
        check_mutation_errors(data.user_invite.errors)?;
        data.user_invite
            .user
            .ok_or_else(|| ProviderError::Api(vec!["userInvite returned no user".to_string()]))
    }

    /// Fetch a user by id or email.
    pub async fn get_user(&self, identifier: &str) -> Result<User, ProviderError> {
        let document = format!(
            "query UserGet($id: ID!) {{ account {{ user(input: {{ id: $id }}) {{ {USER_FIELDS} }} }} }}"
        );
        let data: UserGetData = self.query(&document, json!({ "id": identifier })).await?;
        data.account
            .user
            .ok_or_else(|| ProviderError::NotFound(format!("user {}", identifier)))
    }

    /// Update a user by id.
    pub async fn update_user(&self, id: &str, input: UserInput) -> Result<User, ProviderError> {
        let document = format!(
            "mutation UserUpdate($user: UserIdentifierInput!, $input: UserInput!) {{ userUpdate(user: $user, input: $input) {{ user {{ {USER_FIELDS} }} errors {{ message path }} }} }}"
        );
        let data: UserUpdateData = self
            .query(&document, json!({ "user": { "id": id }, "input": input }))
            .await?;
        check_mutation_errors(data.user_update.errors)?;
        data.user_update
            .user
            .ok_or_else(|| ProviderError::Api(vec!["userUpdate returned no user".to_string()]))
    }

    /// Remove a user by id.
    pub async fn delete_user(&self, id: &str) -> Result<(), ProviderError> {
        let document = "mutation UserDelete($user: UserIdentifierInput!) { userDelete(user: $user) { errors { message path } } }";
        let data: UserDeleteData = self.query(document, json!({ "user": { "id": id } })).await?;
        check_mutation_errors(data.user_delete.errors)
    }

    /// List every user, following pagination to exhaustion.
    pub async fn list_users(&self) -> Result<Vec<User>, ProviderError> {
        collect_pages(move |after| self.user_page(after)).await
    }

    async fn user_page(&self, after: Option<String>) -> Result<Page<User>, ProviderError> {
        let document = format!(
            "query UserList($after: String, $first: Int!) {{ account {{ users(after: $after, first: $first) {{ nodes {{ {USER_FIELDS} }} pageInfo {{ endCursor hasNextPage }} }} }} }}"
        );
        let data: UserListData = self
            .query(&document, json!({ "after": after, "first": PAGE_SIZE }))
            .await?;
        Ok(data.account.users)
    }
}
