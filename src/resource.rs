//! Generic CRUD dispatch for resources.
//!
//! Every resource follows the same operation shape: decode the incoming model
//! from declarative state, invoke one injected domain call against the
//! client, map the response back through `build_model`, and write the result
//! out as state. [`ResourceCrud`] implements that sequence once;
//! per-resource modules only supply a [`ResourceHandler`].
//!
//! On failure an operation attaches one diagnostic and stops. There is no
//! retry and no partial commit; the caller reissues the operation on its next
//! plan/apply cycle.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::client::Client;
use crate::error::ProviderError;
use crate::schema::{has_errors, Diagnostic, Schema};
use crate::validation;

const LAST_UPDATED: &str = "last_updated";

/// The outcome of one resource or data-source operation.
#[derive(Debug, Clone)]
pub struct OperationResponse {
    /// The declarative state to persist; `None` when the operation failed or
    /// deleted the resource.
    pub state: Option<Value>,
    /// Diagnostics attached along the way.
    pub diagnostics: Vec<Diagnostic>,
}

impl OperationResponse {
    pub(crate) fn ok(state: Value, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            state: Some(state),
            diagnostics,
        }
    }

    pub(crate) fn no_state(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            state: None,
            diagnostics,
        }
    }

    pub(crate) fn fail(mut diagnostics: Vec<Diagnostic>, error: &ProviderError) -> Self {
        diagnostics.push(error.to_diagnostic());
        Self {
            state: None,
            diagnostics,
        }
    }

    /// Whether the operation completed without error diagnostics.
    pub fn is_success(&self) -> bool {
        !has_errors(&self.diagnostics)
    }
}

/// The injected behavior of one resource type.
///
/// `Resource` is the server-side response type, `Model` the flat state model.
/// The four `do_*` calls wrap exactly one backend operation each; all
/// sequencing lives in [`ResourceCrud`].
#[async_trait]
pub trait ResourceHandler: Send + Sync + 'static {
    /// Server-side response type.
    type Resource: Send + 'static;
    /// Flat state model mirroring the schema.
    type Model: Serialize + DeserializeOwned + Send + Sync + 'static;

    /// The resource type name, e.g. `opslevel_domain`.
    fn type_name(&self) -> &'static str;

    /// The declared attribute schema.
    fn schema(&self) -> Schema;

    /// The backend id recorded in a model, if it has one yet.
    fn resource_id<'a>(&self, model: &'a Self::Model) -> Option<&'a str>;

    /// Create the object on the backend.
    async fn do_create(
        &self,
        client: &Client,
        model: &Self::Model,
    ) -> Result<Self::Resource, ProviderError>;

    /// Read the object by id.
    async fn do_read(&self, client: &Client, id: &str) -> Result<Self::Resource, ProviderError>;

    /// Update the object by id.
    async fn do_update(
        &self,
        client: &Client,
        id: &str,
        model: &Self::Model,
    ) -> Result<Self::Resource, ProviderError>;

    /// Delete the object by id.
    async fn do_delete(&self, client: &Client, id: &str) -> Result<(), ProviderError>;

    /// Map a server response into the outgoing model.
    fn build_model(&self, resource: Self::Resource) -> Result<Self::Model, ProviderError>;
}

/// Generic CRUD dispatcher over one [`ResourceHandler`].
pub struct ResourceCrud<H: ResourceHandler> {
    handler: H,
}

impl<H: ResourceHandler> ResourceCrud<H> {
    /// Wrap a handler.
    pub fn new(handler: H) -> Self {
        Self { handler }
    }

    /// Create the resource from planned state.
    pub async fn create(&self, client: &Client, planned_state: &Value) -> OperationResponse {
        let type_name = self.handler.type_name();
        info!(resource_type = type_name, "Create called");

        let diagnostics = validation::validate(&self.handler.schema(), planned_state);
        if has_errors(&diagnostics) {
            return OperationResponse::no_state(diagnostics);
        }

        let model = match self.decode(planned_state) {
            Ok(model) => model,
            Err(e) => return OperationResponse::fail(diagnostics, &e),
        };

        let built = match self.handler.do_create(client, &model).await {
            Ok(resource) => self.handler.build_model(resource),
            Err(e) => {
                error!(resource_type = type_name, error = %e, "Create failed");
                return OperationResponse::fail(diagnostics, &e);
            }
        };

        match built.and_then(|m| self.encode(&m)) {
            Ok(state) => {
                info!(resource_type = type_name, "Create completed");
                OperationResponse::ok(state, diagnostics)
            }
            Err(e) => {
                error!(resource_type = type_name, error = %e, "Create failed");
                OperationResponse::fail(diagnostics, &e)
            }
        }
    }

    /// Refresh the resource from current state.
    ///
    /// The `last_updated` attribute, when declared, is carried through
    /// unchanged: the backend does not track it.
    pub async fn read(&self, client: &Client, current_state: &Value) -> OperationResponse {
        let type_name = self.handler.type_name();
        debug!(resource_type = type_name, "Read called");

        let id = match self.decode_id(current_state) {
            Ok(id) => id,
            Err(e) => return OperationResponse::fail(vec![], &e),
        };

        let result = match self.handler.do_read(client, &id).await {
            Ok(resource) => self.handler.build_model(resource).and_then(|m| self.encode(&m)),
            Err(e) => {
                error!(resource_type = type_name, error = %e, "Read failed");
                return OperationResponse::fail(vec![], &e);
            }
        };

        match result {
            Ok(mut state) => {
                self.carry_last_updated(current_state, &mut state);
                debug!(resource_type = type_name, "Read completed");
                OperationResponse::ok(state, vec![])
            }
            Err(e) => {
                error!(resource_type = type_name, error = %e, "Read failed");
                OperationResponse::fail(vec![], &e)
            }
        }
    }

    /// Update the resource to match planned state.
    pub async fn update(&self, client: &Client, planned_state: &Value) -> OperationResponse {
        let type_name = self.handler.type_name();
        info!(resource_type = type_name, "Update called");

        let diagnostics = validation::validate(&self.handler.schema(), planned_state);
        if has_errors(&diagnostics) {
            return OperationResponse::no_state(diagnostics);
        }

        let model = match self.decode(planned_state) {
            Ok(model) => model,
            Err(e) => return OperationResponse::fail(diagnostics, &e),
        };
        let id = match self.require_id(&model) {
            Ok(id) => id,
            Err(e) => return OperationResponse::fail(diagnostics, &e),
        };

        let result = match self.handler.do_update(client, &id, &model).await {
            Ok(resource) => self.handler.build_model(resource).and_then(|m| self.encode(&m)),
            Err(e) => {
                error!(resource_type = type_name, error = %e, "Update failed");
                return OperationResponse::fail(diagnostics, &e);
            }
        };

        match result {
            Ok(mut state) => {
                self.stamp_last_updated(&mut state);
                info!(resource_type = type_name, "Update completed");
                OperationResponse::ok(state, diagnostics)
            }
            Err(e) => {
                error!(resource_type = type_name, error = %e, "Update failed");
                OperationResponse::fail(diagnostics, &e)
            }
        }
    }

    /// Delete the resource recorded in current state.
    ///
    /// Success means the object no longer exists; the model is discarded.
    pub async fn delete(&self, client: &Client, current_state: &Value) -> OperationResponse {
        let type_name = self.handler.type_name();
        info!(resource_type = type_name, "Delete called");

        let id = match self.decode_id(current_state) {
            Ok(id) => id,
            Err(e) => return OperationResponse::fail(vec![], &e),
        };

        match self.handler.do_delete(client, &id).await {
            Ok(()) => {
                info!(resource_type = type_name, "Delete completed");
                OperationResponse::no_state(vec![])
            }
            Err(e) => {
                error!(resource_type = type_name, error = %e, "Delete failed");
                OperationResponse::fail(vec![], &e)
            }
        }
    }

    /// Import an existing object by its external identifier.
    ///
    /// The identifier passes straight through as the internal `id`.
    pub async fn import(&self, client: &Client, id: &str) -> OperationResponse {
        let type_name = self.handler.type_name();
        info!(resource_type = type_name, id, "Import called");

        let result = match self.handler.do_read(client, id).await {
            Ok(resource) => self.handler.build_model(resource).and_then(|m| self.encode(&m)),
            Err(e) => {
                error!(resource_type = type_name, id, error = %e, "Import failed");
                return OperationResponse::fail(vec![], &e);
            }
        };

        match result {
            Ok(state) => {
                info!(resource_type = type_name, id, "Import completed");
                OperationResponse::ok(state, vec![])
            }
            Err(e) => {
                error!(resource_type = type_name, id, error = %e, "Import failed");
                OperationResponse::fail(vec![], &e)
            }
        }
    }

    fn decode(&self, state: &Value) -> Result<H::Model, ProviderError> {
        serde_json::from_value(state.clone()).map_err(|e| ProviderError::Decode(e.to_string()))
    }

    fn encode(&self, model: &H::Model) -> Result<Value, ProviderError> {
        Ok(serde_json::to_value(model)?)
    }

    fn decode_id(&self, state: &Value) -> Result<String, ProviderError> {
        let model = self.decode(state)?;
        self.require_id(&model)
    }

    fn require_id(&self, model: &H::Model) -> Result<String, ProviderError> {
        self.handler
            .resource_id(model)
            .map(str::to_string)
            .ok_or_else(|| ProviderError::Decode("state does not record an id".to_string()))
    }

    fn carry_last_updated(&self, prior: &Value, state: &mut Value) {
        if self.handler.schema().attribute(LAST_UPDATED).is_none() {
            return;
        }
        if let Some(previous) = prior.get(LAST_UPDATED).filter(|v| !v.is_null()) {
            if let Value::Object(map) = state {
                map.insert(LAST_UPDATED.to_string(), previous.clone());
            }
        }
    }

    fn stamp_last_updated(&self, state: &mut Value) {
        if self.handler.schema().attribute(LAST_UPDATED).is_none() {
            return;
        }
        if let Value::Object(map) = state {
            map.insert(
                LAST_UPDATED.to_string(),
                Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
            );
        }
    }
}

/// Object-safe view of a [`ResourceCrud`], so the provider can hold a
/// registry of heterogeneous resource types.
#[async_trait]
pub trait DynResource: Send + Sync {
    /// The resource type name.
    fn type_name(&self) -> &'static str;
    /// The declared attribute schema.
    fn schema(&self) -> Schema;
    /// See [`ResourceCrud::create`].
    async fn create(&self, client: &Client, planned_state: &Value) -> OperationResponse;
    /// See [`ResourceCrud::read`].
    async fn read(&self, client: &Client, current_state: &Value) -> OperationResponse;
    /// See [`ResourceCrud::update`].
    async fn update(&self, client: &Client, planned_state: &Value) -> OperationResponse;
    /// See [`ResourceCrud::delete`].
    async fn delete(&self, client: &Client, current_state: &Value) -> OperationResponse;
    /// See [`ResourceCrud::import`].
    async fn import(&self, client: &Client, id: &str) -> OperationResponse;
}

#[async_trait]
impl<H: ResourceHandler> DynResource for ResourceCrud<H> {
    fn type_name(&self) -> &'static str {
        self.handler.type_name()
    }

    fn schema(&self) -> Schema {
        self.handler.schema()
    }

    async fn create(&self, client: &Client, planned_state: &Value) -> OperationResponse {
        ResourceCrud::create(self, client, planned_state).await
    }

    async fn read(&self, client: &Client, current_state: &Value) -> OperationResponse {
        ResourceCrud::read(self, client, current_state).await
    }

    async fn update(&self, client: &Client, planned_state: &Value) -> OperationResponse {
        ResourceCrud::update(self, client, planned_state).await
    }

    async fn delete(&self, client: &Client, current_state: &Value) -> OperationResponse {
        ResourceCrud::delete(self, client, current_state).await
    }

    async fn import(&self, client: &Client, id: &str) -> OperationResponse {
        ResourceCrud::import(self, client, id).await
    }
}
