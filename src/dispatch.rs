//! The shared control flow behind every endpoint definition.
//!
//! An endpoint is described by a typed definition: a data source implements
//! [`DataSourceDefinition`], a resource implements [`ResourceDefinition`].
//! Definitions only select operations and map payloads. Decoding host JSON,
//! method selection errors, state merging, not-found recovery and encoding
//! the result happen here, once, through the object-safe [`DataSource`] and
//! [`Resource`] traits that every definition gets via a blanket impl.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::client::DashboardClient;
use crate::error::ProviderError;
use crate::merge::{Merge, MergePolicy};
use crate::schema::{Diagnostic, Schema};
use crate::selector::require_method;
use crate::types::ReadResult;

/// What a delete actually did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deletion {
    /// The object was deleted on the backend.
    Remote,
    /// The backend has nothing to delete; only local state is dropped.
    StateOnly {
        /// Shown to the user as a warning.
        reason: String,
    },
}

/// A data source served by one of several candidate operations.
#[async_trait::async_trait]
pub trait DataSourceDefinition: Send + Sync + 'static {
    /// Type name, e.g. `meraki_devices`.
    const TYPE_NAME: &'static str;

    /// Configuration object; after a read it also carries `item`/`items`.
    type Config: DeserializeOwned + Serialize + Send + Sync + 'static;

    /// Schema of the configuration and computed results.
    fn schema(&self) -> Schema;

    /// One presence vector per candidate operation, most specific first.
    fn methods(&self, config: &Self::Config) -> Vec<Vec<bool>>;

    /// Parameter names behind each presence vector, for error messages.
    fn parameters(&self) -> &'static [&'static [&'static str]];

    /// Invoke operation `method` (1-based) and map the result into the config.
    async fn fetch(
        &self,
        client: &DashboardClient,
        config: Self::Config,
        method: usize,
    ) -> Result<Self::Config, ProviderError>;
}

/// A managed object with a create/read/update/delete lifecycle.
///
/// Each operation returns the freshly mapped state; merging it with the plan
/// or prior state is done by the caller according to [`MergePolicy`].
#[async_trait::async_trait]
pub trait ResourceDefinition: Send + Sync + 'static {
    /// Type name, e.g. `meraki_networks`.
    const TYPE_NAME: &'static str;

    /// State object.
    type State: DeserializeOwned + Serialize + Merge + Clone + Send + Sync + 'static;

    /// Schema of the state.
    fn schema(&self) -> Schema;

    /// Attribute that receives the id on import, if import is supported.
    fn import_attribute(&self) -> Option<&'static str> {
        None
    }

    /// Create the object described by `plan`.
    async fn create(&self, client: &DashboardClient, plan: &Self::State) -> Result<Self::State, ProviderError>;

    /// Fetch the object described by `state`.
    async fn read(&self, client: &DashboardClient, state: &Self::State) -> Result<Self::State, ProviderError>;

    /// Apply `plan` to the object described by `prior`.
    async fn update(
        &self,
        client: &DashboardClient,
        prior: &Self::State,
        plan: &Self::State,
    ) -> Result<Self::State, ProviderError>;

    /// Delete the object described by `state`.
    async fn delete(&self, client: &DashboardClient, state: &Self::State) -> Result<Deletion, ProviderError>;
}

/// Object-safe view of a data source.
#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    /// Type name.
    fn type_name(&self) -> &'static str;

    /// Schema.
    fn schema(&self) -> Schema;

    /// Read with a JSON configuration, returning JSON state.
    async fn read(&self, client: &DashboardClient, config: Value) -> Result<Value, ProviderError>;
}

/// Object-safe view of a resource.
#[async_trait::async_trait]
pub trait Resource: Send + Sync {
    /// Type name.
    fn type_name(&self) -> &'static str;

    /// Schema.
    fn schema(&self) -> Schema;

    /// Attribute that receives the id on import.
    fn import_attribute(&self) -> Option<&'static str>;

    /// Create and return the post-write merged state.
    async fn create(&self, client: &DashboardClient, planned: Value) -> Result<Value, ProviderError>;

    /// Refresh, or report the object as removed.
    async fn read(&self, client: &DashboardClient, current: Value) -> Result<ReadResult, ProviderError>;

    /// Update and return the post-write merged state.
    async fn update(&self, client: &DashboardClient, prior: Value, planned: Value) -> Result<Value, ProviderError>;

    /// Delete, returning warnings.
    async fn delete(&self, client: &DashboardClient, current: Value) -> Result<Vec<Diagnostic>, ProviderError>;
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ProviderError> {
    Ok(serde_json::from_value(value)?)
}

fn encode<T: Serialize>(value: &T) -> Result<Value, ProviderError> {
    Ok(serde_json::to_value(value)?)
}

#[async_trait::async_trait]
impl<D: DataSourceDefinition> DataSource for D {
    fn type_name(&self) -> &'static str {
        D::TYPE_NAME
    }

    fn schema(&self) -> Schema {
        DataSourceDefinition::schema(self)
    }

    #[instrument(skip_all, fields(data_source_type = D::TYPE_NAME))]
    async fn read(&self, client: &DashboardClient, config: Value) -> Result<Value, ProviderError> {
        let config: D::Config = decode(config)?;
        let method = require_method(D::TYPE_NAME, &self.methods(&config), self.parameters())?;
        debug!(method, "Selected operation");
        let state = self.fetch(client, config, method).await?;
        encode(&state)
    }
}

#[async_trait::async_trait]
impl<R: ResourceDefinition> Resource for R {
    fn type_name(&self) -> &'static str {
        R::TYPE_NAME
    }

    fn schema(&self) -> Schema {
        ResourceDefinition::schema(self)
    }

    fn import_attribute(&self) -> Option<&'static str> {
        ResourceDefinition::import_attribute(self)
    }

    #[instrument(skip_all, fields(resource_type = R::TYPE_NAME))]
    async fn create(&self, client: &DashboardClient, planned: Value) -> Result<Value, ProviderError> {
        let plan: R::State = decode(planned)?;
        let fresh = ResourceDefinition::create(self, client, &plan).await?;
        encode(&plan.merge(fresh, MergePolicy::PostWrite))
    }

    #[instrument(skip_all, fields(resource_type = R::TYPE_NAME))]
    async fn read(&self, client: &DashboardClient, current: Value) -> Result<ReadResult, ProviderError> {
        let state: R::State = decode(current)?;
        match ResourceDefinition::read(self, client, &state).await {
            Ok(fresh) => Ok(ReadResult::found(encode(&state.merge(fresh, MergePolicy::Refresh))?)),
            Err(err) if err.is_not_found() => {
                warn!(error = %err, "Object not found on the dashboard; removing it from state");
                Ok(ReadResult::removed(
                    Diagnostic::warning(format!("{} no longer exists", R::TYPE_NAME)).with_detail(
                        "The dashboard reported the object as not found. It has been removed \
                         from state and will be recreated on the next apply.",
                    ),
                ))
            },
            Err(err) => Err(err),
        }
    }

    #[instrument(skip_all, fields(resource_type = R::TYPE_NAME))]
    async fn update(&self, client: &DashboardClient, prior: Value, planned: Value) -> Result<Value, ProviderError> {
        let prior: R::State = decode(prior)?;
        let plan: R::State = decode(planned)?;
        let fresh = ResourceDefinition::update(self, client, &prior, &plan).await?;
        encode(&plan.merge(fresh, MergePolicy::PostWrite))
    }

    #[instrument(skip_all, fields(resource_type = R::TYPE_NAME))]
    async fn delete(&self, client: &DashboardClient, current: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let state: R::State = decode(current)?;
        match ResourceDefinition::delete(self, client, &state).await? {
            Deletion::Remote => Ok(vec![]),
            Deletion::StateOnly { reason } => {
                warn!(%reason, "No backend delete performed; removing from state only");
                Ok(vec![Diagnostic::warning(format!(
                    "{} was removed from state only",
                    R::TYPE_NAME
                ))
                .with_detail(reason)])
            },
        }
    }
}
