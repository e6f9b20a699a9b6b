//! GraphQL client for the OpsLevel API.
//!
//! One authenticated [`reqwest`] client is built at configure time and shared
//! read-only by every resource and data source. All calls are plain POSTs of
//! `{query, variables}` against `<api_url>/graphql`; timeout and TLS live in
//! the underlying HTTP client.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::config::ProviderConfig;
use crate::error::ProviderError;

/// Fixed page size for cursor-paginated list queries.
pub const PAGE_SIZE: i64 = 100;

/// Cursor state returned by paginated connections.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Opaque cursor of the last node in this page.
    #[serde(default)]
    pub end_cursor: Option<String>,
    /// Whether another page follows this one.
    #[serde(default)]
    pub has_next_page: bool,
}

#[derive(Serialize)]
struct GraphqlRequest<'a, V> {
    query: &'a str,
    variables: V,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Deserialize)]
struct GraphqlResponse<D> {
    data: Option<D>,
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

/// Authenticated client for the OpsLevel GraphQL API.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoint: Url,
}

impl Client {
    /// Build a client from resolved provider configuration.
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let endpoint = config.api_url.join("graphql")?;

        let mut token = HeaderValue::from_str(&format!("Bearer {}", config.api_token))
            .map_err(|_| {
                ProviderError::Configuration(
                    "api token contains characters not allowed in an HTTP header".to_string(),
                )
            })?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, token);

        let http = reqwest::Client::builder()
            .user_agent(concat!("opslevel-provider/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(config.api_timeout)
            .build()?;

        Ok(Self { http, endpoint })
    }

    /// Execute one GraphQL document and deserialize its `data` payload.
    ///
    /// A non-2xx status, a response-level `errors` array, or a missing `data`
    /// payload all surface as [`ProviderError::Api`]; there is no retry.
    pub async fn query<V, D>(&self, document: &str, variables: V) -> Result<D, ProviderError>
    where
        V: Serialize,
        D: DeserializeOwned,
    {
        debug!(endpoint = %self.endpoint, "POST graphql");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&GraphqlRequest {
                query: document,
                variables,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "API request failed");
            return Err(ProviderError::Api(vec![format!(
                "API request failed: {}",
                status
            )]));
        }

        let envelope: GraphqlResponse<D> = response.json().await?;

        if let Some(errors) = envelope.errors.filter(|e| !e.is_empty()) {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            warn!(errors = messages.len(), "graphql response has errors");
            return Err(ProviderError::Api(messages));
        }

        envelope.data.ok_or_else(|| {
            ProviderError::Api(vec![
                "graphql response contained no data and no errors".to_string()
            ])
        })
    }
}
