//! The provider entrypoint.
//!
//! [`OpsLevelProvider`] owns the resource and data-source registries and the
//! one shared API client. The client is installed exactly once, at configure
//! time; every operation afterwards borrows it read-only. There is no other
//! shared mutable state and no background work.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::{info, warn};

use crate::client::Client;
use crate::config;
use crate::data_source::{DynDataSource, MultiDataSource, SingleDataSource};
use crate::data_sources::{
    DomainDataSource, DomainsDataSource, ServiceDataSource, ServicesDataSource, TeamDataSource,
    TeamsDataSource, UserDataSource, UsersDataSource,
};
use crate::error::ProviderError;
use crate::resource::{DynResource, OperationResponse, ResourceCrud};
use crate::resources::{
    CheckResource, DomainResource, ServiceResource, TeamResource, UserResource,
};
use crate::schema::{Attribute, Diagnostic, ProviderSchema, Schema};

/// The OpsLevel provider: registries plus the shared API client.
pub struct OpsLevelProvider {
    resources: HashMap<&'static str, Box<dyn DynResource>>,
    data_sources: HashMap<&'static str, Box<dyn DynDataSource>>,
    client: RwLock<Option<Arc<Client>>>,
}

impl OpsLevelProvider {
    /// Build the provider with every resource and data source registered.
    pub fn new() -> Self {
        let mut resources: HashMap<&'static str, Box<dyn DynResource>> = HashMap::new();
        let registered: Vec<Box<dyn DynResource>> = vec![
            Box::new(ResourceCrud::new(DomainResource)),
            Box::new(ResourceCrud::new(ServiceResource)),
            Box::new(ResourceCrud::new(TeamResource)),
            Box::new(ResourceCrud::new(UserResource)),
            Box::new(ResourceCrud::new(CheckResource)),
        ];
        for resource in registered {
            resources.insert(resource.type_name(), resource);
        }

        let mut data_sources: HashMap<&'static str, Box<dyn DynDataSource>> = HashMap::new();
        let registered: Vec<Box<dyn DynDataSource>> = vec![
            Box::new(SingleDataSource::new(DomainDataSource)),
            Box::new(MultiDataSource::new(DomainsDataSource)),
            Box::new(SingleDataSource::new(ServiceDataSource)),
            Box::new(MultiDataSource::new(ServicesDataSource)),
            Box::new(SingleDataSource::new(TeamDataSource)),
            Box::new(MultiDataSource::new(TeamsDataSource)),
            Box::new(SingleDataSource::new(UserDataSource)),
            Box::new(MultiDataSource::new(UsersDataSource)),
        ];
        for source in registered {
            data_sources.insert(source.type_name(), source);
        }

        Self {
            resources,
            data_sources,
            client: RwLock::new(None),
        }
    }

    fn provider_config_schema() -> Schema {
        Schema::v0()
            .with_attribute(
                "api_token",
                Attribute::required_string().sensitive().with_description(format!(
                    "The API token to authenticate with. Falls back to {}.",
                    config::ENV_API_TOKEN
                )),
            )
            .with_attribute(
                "api_url",
                Attribute::optional_string().with_description(format!(
                    "The base URL of the API. Falls back to {}, then {}.",
                    config::ENV_API_URL,
                    config::DEFAULT_API_URL
                )),
            )
            .with_attribute(
                "api_timeout",
                Attribute::optional_int64().with_description(format!(
                    "Request timeout in seconds. Falls back to {}, then {}.",
                    config::ENV_API_TIMEOUT,
                    config::DEFAULT_TIMEOUT_SECS
                )),
            )
    }

    /// The full provider schema: configuration block, resources, data sources.
    pub fn schema(&self) -> ProviderSchema {
        let mut schema = ProviderSchema::new().with_provider_config(Self::provider_config_schema());
        for (name, resource) in &self.resources {
            schema = schema.with_resource(*name, resource.schema());
        }
        for (name, source) in &self.data_sources {
            schema = schema.with_data_source(*name, source.schema());
        }
        schema
    }

    /// Registered resource type names, sorted.
    pub fn resource_types(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.resources.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Registered data source type names, sorted.
    pub fn data_source_types(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.data_sources.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Resolve configuration and install the shared client.
    ///
    /// Returns the resolution diagnostics. On a fatal diagnostic the provider
    /// stays unconfigured and every subsequent operation fails with a
    /// configuration error.
    pub fn configure(&self, config_value: &Value) -> Vec<Diagnostic> {
        let (resolved, mut diagnostics) = config::resolve(config_value);

        let Some(provider_config) = resolved else {
            warn!("provider configuration failed");
            return diagnostics;
        };

        match Client::new(&provider_config) {
            Ok(client) => {
                *self.client.write().expect("client lock poisoned") = Some(Arc::new(client));
                info!(api_url = %provider_config.api_url, "provider configured");
            }
            Err(e) => {
                warn!(error = %e, "provider configuration failed");
                diagnostics.push(e.to_diagnostic());
            }
        }

        diagnostics
    }

    fn client(&self) -> Result<Arc<Client>, ProviderError> {
        self.client
            .read()
            .expect("client lock poisoned")
            .clone()
            .ok_or_else(|| {
                ProviderError::Configuration("the provider has not been configured".to_string())
            })
    }

    fn resource(&self, type_name: &str) -> Result<&dyn DynResource, ProviderError> {
        self.resources
            .get(type_name)
            .map(Box::as_ref)
            .ok_or_else(|| ProviderError::UnknownResource(type_name.to_string()))
    }

    /// Create a resource from planned state.
    pub async fn create(&self, type_name: &str, planned_state: &Value) -> OperationResponse {
        match (self.client(), self.resource(type_name)) {
            (Ok(client), Ok(resource)) => resource.create(&client, planned_state).await,
            (Err(e), _) | (_, Err(e)) => OperationResponse::fail(vec![], &e),
        }
    }

    /// Refresh a resource from current state.
    pub async fn read(&self, type_name: &str, current_state: &Value) -> OperationResponse {
        match (self.client(), self.resource(type_name)) {
            (Ok(client), Ok(resource)) => resource.read(&client, current_state).await,
            (Err(e), _) | (_, Err(e)) => OperationResponse::fail(vec![], &e),
        }
    }

    /// Update a resource to match planned state.
    pub async fn update(&self, type_name: &str, planned_state: &Value) -> OperationResponse {
        match (self.client(), self.resource(type_name)) {
            (Ok(client), Ok(resource)) => resource.update(&client, planned_state).await,
            (Err(e), _) | (_, Err(e)) => OperationResponse::fail(vec![], &e),
        }
    }

    /// Delete the resource recorded in current state.
    pub async fn delete(&self, type_name: &str, current_state: &Value) -> OperationResponse {
        match (self.client(), self.resource(type_name)) {
            (Ok(client), Ok(resource)) => resource.delete(&client, current_state).await,
            (Err(e), _) | (_, Err(e)) => OperationResponse::fail(vec![], &e),
        }
    }

    /// Import an existing object by its external identifier.
    pub async fn import(&self, type_name: &str, id: &str) -> OperationResponse {
        match (self.client(), self.resource(type_name)) {
            (Ok(client), Ok(resource)) => resource.import(&client, id).await,
            (Err(e), _) | (_, Err(e)) => OperationResponse::fail(vec![], &e),
        }
    }

    /// Execute a data source read.
    pub async fn read_data_source(&self, type_name: &str, config_value: &Value) -> OperationResponse {
        let source = match self.data_sources.get(type_name) {
            Some(source) => source,
            None => {
                let e = ProviderError::UnknownResource(type_name.to_string());
                return OperationResponse::fail(vec![], &e);
            }
        };
        match self.client() {
            Ok(client) => source.read(&client, config_value).await,
            Err(e) => OperationResponse::fail(vec![], &e),
        }
    }
}

impl Default for OpsLevelProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registers_every_type() {
        let provider = OpsLevelProvider::new();

        assert_eq!(
            provider.resource_types(),
            vec![
                "opslevel_check",
                "opslevel_domain",
                "opslevel_service",
                "opslevel_team",
                "opslevel_user",
            ]
        );
        assert_eq!(
            provider.data_source_types(),
            vec![
                "opslevel_domain",
                "opslevel_domains",
                "opslevel_service",
                "opslevel_services",
                "opslevel_team",
                "opslevel_teams",
                "opslevel_user",
                "opslevel_users",
            ]
        );
    }

    #[test]
    fn test_schema_covers_registries() {
        let provider = OpsLevelProvider::new();
        let schema = provider.schema();

        assert!(schema.provider.attribute("api_token").unwrap().flags.sensitive);
        assert_eq!(schema.resources.len(), 5);
        assert_eq!(schema.data_sources.len(), 8);

        let domain = &schema.resources["opslevel_domain"];
        assert!(domain.attribute("id").unwrap().flags.computed);
        assert!(domain.attribute("last_updated").is_some());

        // Users do not track an update timestamp.
        assert!(schema.resources["opslevel_user"].attribute("last_updated").is_none());
    }

    #[tokio::test]
    async fn test_operations_before_configure_fail() {
        let provider = OpsLevelProvider::new();

        let response = provider
            .create("opslevel_domain", &json!({"name": "Payments"}))
            .await;
        assert!(!response.is_success());
        assert!(response.diagnostics[0].summary.contains("not been configured"));
    }

    #[tokio::test]
    async fn test_unknown_type_fails() {
        let provider = OpsLevelProvider::new();
        provider.configure(&json!({"api_token": "test"}));

        let response = provider.create("opslevel_widget", &json!({})).await;
        assert!(!response.is_success());
        assert!(response.diagnostics[0].summary.contains("opslevel_widget"));

        let response = provider.read_data_source("opslevel_widgets", &json!({})).await;
        assert!(!response.is_success());
    }

    #[test]
    fn test_configure_without_token_leaves_provider_unconfigured() {
        let provider = OpsLevelProvider::new();

        // No token in config; make sure the environment cannot supply one.
        std::env::remove_var(config::ENV_API_TOKEN);
        let diagnostics = provider.configure(&json!({}));

        assert!(crate::schema::has_errors(&diagnostics));
        assert!(provider.client().is_err());
    }

    #[test]
    fn test_configure_installs_client() {
        let provider = OpsLevelProvider::new();
        let diagnostics = provider.configure(&json!({"api_token": "test"}));

        assert!(!crate::schema::has_errors(&diagnostics));
        assert!(provider.client().is_ok());
    }
}
