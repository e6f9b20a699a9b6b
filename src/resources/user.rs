//! The `opslevel_user` resource.
//!
//! Users are invited by email; the email is the one attribute that cannot
//! change after create.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::api::{User, UserInput};
use crate::client::Client;
use crate::error::ProviderError;
use crate::resource::ResourceHandler;
use crate::schema::{Attribute, Schema};

/// Flat state model for a user.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserModel {
    /// Backend id, computed on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Role, e.g. `user` or `admin`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

pub(crate) fn flatten_user(user: User) -> UserModel {
    UserModel {
        id: Some(user.id.0),
        email: user.email,
        name: user.name,
        role: user.role,
    }
}

fn expand_user(model: &UserModel) -> UserInput {
    UserInput {
        name: Some(model.name.clone()),
        role: model.role.clone(),
    }
}

pub(crate) fn user_schema() -> Schema {
    Schema::v0()
        .with_attribute(
            "id",
            Attribute::computed_string().with_description("The id of the user."),
        )
        .with_attribute(
            "email",
            Attribute::required_string().with_description("The email address of the user."),
        )
        .with_attribute(
            "name",
            Attribute::required_string().with_description("The display name of the user."),
        )
        .with_attribute(
            "role",
            Attribute::optional_computed_string()
                .with_description("The role of the user, either user or admin."),
        )
}

/// Handler wiring the user resource to the API.
pub struct UserResource;

#[async_trait]
impl ResourceHandler for UserResource {
    type Resource = User;
    type Model = UserModel;

    fn type_name(&self) -> &'static str {
        "opslevel_user"
    }

    fn schema(&self) -> Schema {
        user_schema()
    }

    fn resource_id<'a>(&self, model: &'a UserModel) -> Option<&'a str> {
        model.id.as_deref()
    }

    async fn do_create(&self, client: &Client, model: &UserModel) -> Result<User, ProviderError> {
        client.invite_user(&model.email, expand_user(model)).await
    }

    async fn do_read(&self, client: &Client, id: &str) -> Result<User, ProviderError> {
        client.get_user(id).await
    }

    async fn do_update(
        &self,
        client: &Client,
        id: &str,
        model: &UserModel,
    ) -> Result<User, ProviderError> {
        client.update_user(id, expand_user(model)).await
    }

    async fn do_delete(&self, client: &Client, id: &str) -> Result<(), ProviderError> {
        client.delete_user(id).await
    }

    fn build_model(&self, user: User) -> Result<UserModel, ProviderError> {
        Ok(flatten_user(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_user() {
        let user = User {
            id: "Z2lkOi8vMQ".into(),
            email: "a@example.com".to_string(),
            name: "Alex".to_string(),
            role: Some("admin".to_string()),
        };

        let model = flatten_user(user);
        assert_eq!(model.id.as_deref(), Some("Z2lkOi8vMQ"));
        assert_eq!(model.email, "a@example.com");
        assert_eq!(model.role.as_deref(), Some("admin"));
    }

    #[test]
    fn test_expand_user_omits_email() {
        // The email goes through the invite call, never the update input.
        let model = UserModel {
            email: "a@example.com".to_string(),
            name: "Alex".to_string(),
            ..Default::default()
        };
        let input = expand_user(&model);
        let value = serde_json::to_value(input).unwrap();
        assert_eq!(value, serde_json::json!({"name": "Alex"}));
    }
}
