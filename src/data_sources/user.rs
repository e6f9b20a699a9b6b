//! User data sources.

use async_trait::async_trait;
use serde_json::Value;

use crate::api::User;
use crate::client::Client;
use crate::data_source::{MultiLookup, SingleLookup};
use crate::error::ProviderError;
use crate::resources::user::{flatten_user, user_schema};
use crate::resources::UserModel;
use crate::schema::{Attribute, Schema};

/// Looks up one user by id or email.
pub struct UserDataSource;

#[async_trait]
impl SingleLookup for UserDataSource {
    type Data = User;
    type Model = UserModel;

    fn type_name(&self) -> &'static str {
        "opslevel_user"
    }

    fn schema(&self) -> Schema {
        super::computed_view(user_schema()).with_attribute(
            "identifier",
            Attribute::required_string().with_description("The id or email of the user to look up."),
        )
    }

    async fn read(&self, client: &Client, identifier: &str) -> Result<User, ProviderError> {
        client.get_user(identifier).await
    }

    fn to_model(&self, data: User) -> Result<UserModel, ProviderError> {
        Ok(flatten_user(data))
    }
}

/// Lists every user in the account.
pub struct UsersDataSource;

#[async_trait]
impl MultiLookup for UsersDataSource {
    type Data = User;
    type Model = UserModel;

    fn type_name(&self) -> &'static str {
        "opslevel_users"
    }

    fn schema(&self) -> Schema {
        Schema::v0().with_attribute(
            "all",
            super::all_attribute(&user_schema()).with_description("All users in the account."),
        )
    }

    async fn read_all(&self, client: &Client, _config: &Value) -> Result<Vec<User>, ProviderError> {
        client.list_users().await
    }

    fn to_model(&self, data: User) -> Result<UserModel, ProviderError> {
        Ok(flatten_user(data))
    }
}
