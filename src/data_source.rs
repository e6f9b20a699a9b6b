//! Generic read dispatch for data sources.
//!
//! Two shapes cover every data source: a single lookup keyed by an
//! `identifier` attribute, and a multi lookup that lists everything into an
//! `all` attribute. Both fail closed on client errors: no state is written
//! once the backend call has failed. Only the multi variant has per-item
//! semantics, where a conversion failure skips that item with its own
//! diagnostic instead of aborting the rest.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::client::Client;
use crate::convert;
use crate::error::ProviderError;
use crate::resource::OperationResponse;
use crate::schema::{Diagnostic, Schema};

/// The injected behavior of a single-object data source.
#[async_trait]
pub trait SingleLookup: Send + Sync + 'static {
    /// Server-side response type.
    type Data: Send + 'static;
    /// Flat state model mirroring the schema.
    type Model: Serialize + Send + Sync + 'static;

    /// The data source type name, e.g. `opslevel_domain`.
    fn type_name(&self) -> &'static str;

    /// The declared attribute schema.
    fn schema(&self) -> Schema;

    /// Fetch one object by identifier.
    async fn read(&self, client: &Client, identifier: &str)
        -> Result<Self::Data, ProviderError>;

    /// Map the response into the outgoing model.
    fn to_model(&self, data: Self::Data) -> Result<Self::Model, ProviderError>;
}

/// Dispatcher for single-object lookups.
pub struct SingleDataSource<L: SingleLookup> {
    lookup: L,
}

impl<L: SingleLookup> SingleDataSource<L> {
    /// Wrap a lookup.
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Read the object named by the `identifier` attribute and write it out
    /// as state.
    pub async fn read(&self, client: &Client, config: &Value) -> OperationResponse {
        let type_name = self.lookup.type_name();
        debug!(data_source_type = type_name, "Read called");

        let Some(identifier) = convert::optional_string(config, "identifier") else {
            let e = ProviderError::Decode("the identifier attribute must be set".to_string());
            return OperationResponse::fail(vec![], &e);
        };

        let result = match self.lookup.read(client, &identifier).await {
            Ok(data) => self.lookup.to_model(data),
            Err(e) => {
                error!(data_source_type = type_name, identifier, error = %e, "Read failed");
                return OperationResponse::fail(vec![], &e);
            }
        };

        match result.and_then(|m| Ok(serde_json::to_value(m)?)) {
            Ok(mut state) => {
                if let Value::Object(map) = &mut state {
                    map.insert("identifier".to_string(), Value::String(identifier));
                }
                debug!(data_source_type = type_name, "Read completed");
                OperationResponse::ok(state, vec![])
            }
            Err(e) => {
                error!(data_source_type = type_name, identifier, error = %e, "Read failed");
                OperationResponse::fail(vec![], &e)
            }
        }
    }
}

/// The injected behavior of a list-all data source.
#[async_trait]
pub trait MultiLookup: Send + Sync + 'static {
    /// Server-side response type of one item.
    type Data: Send + 'static;
    /// Flat model of one item under the `all` attribute.
    type Model: Serialize + Send + Sync + 'static;

    /// The data source type name, e.g. `opslevel_services`.
    fn type_name(&self) -> &'static str;

    /// The declared attribute schema.
    fn schema(&self) -> Schema;

    /// Fetch every item. The read config is passed through for data sources
    /// that declare filter attributes.
    async fn read_all(
        &self,
        client: &Client,
        config: &Value,
    ) -> Result<Vec<Self::Data>, ProviderError>;

    /// Map one item into its model.
    fn to_model(&self, data: Self::Data) -> Result<Self::Model, ProviderError>;
}

/// Dispatcher for list-all lookups.
pub struct MultiDataSource<L: MultiLookup> {
    lookup: L,
}

impl<L: MultiLookup> MultiDataSource<L> {
    /// Wrap a lookup.
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// List every item and write the mapped models under `all`.
    ///
    /// Items are mapped independently: a conversion failure skips that item
    /// and records a warning diagnostic, it never discards the rest.
    pub async fn read(&self, client: &Client, config: &Value) -> OperationResponse {
        let type_name = self.lookup.type_name();
        debug!(data_source_type = type_name, "Read called");

        let items = match self.lookup.read_all(client, config).await {
            Ok(items) => items,
            Err(e) => {
                error!(data_source_type = type_name, error = %e, "Read failed");
                return OperationResponse::fail(vec![], &e);
            }
        };

        let mut diagnostics = Vec::new();
        let mut all = Vec::new();
        for (index, item) in items.into_iter().enumerate() {
            match self
                .lookup
                .to_model(item)
                .and_then(|m| Ok(serde_json::to_value(m)?))
            {
                Ok(value) => all.push(value),
                Err(e) => {
                    warn!(data_source_type = type_name, index, error = %e, "Skipping item");
                    diagnostics.push(
                        Diagnostic::warning(format!("Skipped item {} of {}", index, type_name))
                            .with_detail(e.to_string()),
                    );
                }
            }
        }

        // Echo the read config (filters and such) back into state.
        let mut state = match config {
            Value::Object(map) => Value::Object(map.clone()),
            _ => Value::Object(serde_json::Map::new()),
        };
        if let Value::Object(map) = &mut state {
            map.insert("all".to_string(), Value::Array(all));
        }

        debug!(data_source_type = type_name, "Read completed");
        OperationResponse::ok(state, diagnostics)
    }
}

/// Object-safe view of a data source, so the provider can hold a registry.
#[async_trait]
pub trait DynDataSource: Send + Sync {
    /// The data source type name.
    fn type_name(&self) -> &'static str;
    /// The declared attribute schema.
    fn schema(&self) -> Schema;
    /// Execute the read against the given config.
    async fn read(&self, client: &Client, config: &Value) -> OperationResponse;
}

#[async_trait]
impl<L: SingleLookup> DynDataSource for SingleDataSource<L> {
    fn type_name(&self) -> &'static str {
        self.lookup.type_name()
    }

    fn schema(&self) -> Schema {
        self.lookup.schema()
    }

    async fn read(&self, client: &Client, config: &Value) -> OperationResponse {
        SingleDataSource::read(self, client, config).await
    }
}

#[async_trait]
impl<L: MultiLookup> DynDataSource for MultiDataSource<L> {
    fn type_name(&self) -> &'static str {
        self.lookup.type_name()
    }

    fn schema(&self) -> Schema {
        self.lookup.schema()
    }

    async fn read(&self, client: &Client, config: &Value) -> OperationResponse {
        MultiDataSource::read(self, client, config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use crate::schema::Attribute;
    use serde_json::json;
    use std::time::Duration;
    use url::Url;

    fn unused_client() -> Client {
        Client::new(&ProviderConfig {
            api_token: "test".to_string(),
            api_url: Url::parse("http://127.0.0.1:9").unwrap(),
            api_timeout: Duration::from_secs(1),
        })
        .unwrap()
    }

    struct NameLookup;

    #[async_trait]
    impl SingleLookup for NameLookup {
        type Data = String;
        type Model = serde_json::Map<String, Value>;

        fn type_name(&self) -> &'static str {
            "opslevel_name"
        }

        fn schema(&self) -> Schema {
            Schema::v0()
                .with_attribute("identifier", Attribute::required_string())
                .with_attribute("name", Attribute::computed_string())
        }

        async fn read(&self, _client: &Client, identifier: &str) -> Result<String, ProviderError> {
            if identifier == "missing" {
                return Err(ProviderError::NotFound(format!("name {}", identifier)));
            }
            Ok(identifier.to_uppercase())
        }

        fn to_model(&self, data: String) -> Result<Self::Model, ProviderError> {
            let mut map = serde_json::Map::new();
            map.insert("name".to_string(), Value::String(data));
            Ok(map)
        }
    }

    struct NumberLookup;

    #[async_trait]
    impl MultiLookup for NumberLookup {
        type Data = i64;
        type Model = serde_json::Map<String, Value>;

        fn type_name(&self) -> &'static str {
            "opslevel_numbers"
        }

        fn schema(&self) -> Schema {
            Schema::v0().with_attribute(
                "all",
                Attribute::new(
                    crate::schema::AttributeType::list(crate::schema::AttributeType::Int64),
                    crate::schema::AttributeFlags::computed(),
                ),
            )
        }

        async fn read_all(
            &self,
            _client: &Client,
            _config: &Value,
        ) -> Result<Vec<i64>, ProviderError> {
            Ok(vec![1, -2, 3])
        }

        fn to_model(&self, data: i64) -> Result<Self::Model, ProviderError> {
            if data < 0 {
                return Err(ProviderError::ModelBuild(format!(
                    "negative value {}",
                    data
                )));
            }
            let mut map = serde_json::Map::new();
            map.insert("value".to_string(), Value::Number(data.into()));
            Ok(map)
        }
    }

    #[tokio::test]
    async fn test_single_read_writes_state() {
        let source = SingleDataSource::new(NameLookup);
        let response = source
            .read(&unused_client(), &json!({"identifier": "payments"}))
            .await;

        assert!(response.is_success());
        let state = response.state.unwrap();
        assert_eq!(state["identifier"], "payments");
        assert_eq!(state["name"], "PAYMENTS");
    }

    #[tokio::test]
    async fn test_single_read_requires_identifier() {
        let source = SingleDataSource::new(NameLookup);
        let response = source.read(&unused_client(), &json!({})).await;

        assert!(!response.is_success());
        assert!(response.state.is_none());
    }

    #[tokio::test]
    async fn test_single_read_fails_closed_on_client_error() {
        let source = SingleDataSource::new(NameLookup);
        let response = source
            .read(&unused_client(), &json!({"identifier": "missing"}))
            .await;

        assert!(!response.is_success());
        assert!(response.state.is_none());
    }

    #[tokio::test]
    async fn test_multi_read_skips_failed_conversions() {
        let source = MultiDataSource::new(NumberLookup);
        let response = source.read(&unused_client(), &json!({})).await;

        // One of three items fails conversion: the other two survive, with
        // exactly one extra diagnostic, and the operation still succeeds.
        assert!(response.is_success());
        assert_eq!(response.diagnostics.len(), 1);
        assert!(!response.diagnostics[0].is_error());

        let state = response.state.unwrap();
        let all = state["all"].as_array().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0]["value"], 1);
        assert_eq!(all[1]["value"], 3);
    }

    #[tokio::test]
    async fn test_multi_read_echoes_config() {
        let source = MultiDataSource::new(NumberLookup);
        let response = source
            .read(&unused_client(), &json!({"framework": "rails"}))
            .await;

        let state = response.state.unwrap();
        assert_eq!(state["framework"], "rails");
        assert!(state["all"].is_array());
    }
}
