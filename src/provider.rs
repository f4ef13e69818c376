//! The Meraki dashboard provider.
//!
//! [`MerakiProvider`] owns the registry of endpoint definitions and the
//! [`DashboardClient`] built by `configure`. Every callback looks up the
//! definition by type name and hands over to [`crate::dispatch`].

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

use crate::client::DashboardClient;
use crate::config::ProviderConfig;
use crate::dispatch::{DataSource, Resource};
use crate::error::ProviderError;
use crate::resources;
use crate::schema::{AttributeType, Diagnostic, ProviderSchema, Schema};
use crate::service::ProviderService;
use crate::types::{AttributeChange, ImportedResource, PlanResult, ReadResult, ServerCapabilities};
use crate::validation::validate;
use crate::value::UNKNOWN_VALUE;

/// Provider for the Cisco Meraki dashboard API.
pub struct MerakiProvider {
    data_sources: HashMap<&'static str, Box<dyn DataSource>>,
    resources: HashMap<&'static str, Box<dyn Resource>>,
    client: RwLock<Option<Arc<DashboardClient>>>,
}

impl MerakiProvider {
    /// An unconfigured provider with every endpoint registered.
    pub fn new() -> Self {
        Self::with_client(None)
    }

    /// A provider already configured with `config`.
    pub fn configured(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = DashboardClient::new(config)?;
        Ok(Self::with_client(Some(Arc::new(client))))
    }

    fn with_client(client: Option<Arc<DashboardClient>>) -> Self {
        let data_sources = resources::data_sources()
            .into_iter()
            .map(|d| (d.type_name(), d))
            .collect();
        let resources = resources::resources()
            .into_iter()
            .map(|r| (r.type_name(), r))
            .collect();
        Self {
            data_sources,
            resources,
            client: RwLock::new(client),
        }
    }

    async fn client(&self) -> Result<Arc<DashboardClient>, ProviderError> {
        self.client.read().await.clone().ok_or_else(|| {
            ProviderError::Configuration(
                "provider is not configured; call configure before using resources or data sources".to_string(),
            )
        })
    }

    fn resource(&self, resource_type: &str) -> Result<&dyn Resource, ProviderError> {
        self.resources
            .get(resource_type)
            .map(|r| r.as_ref())
            .ok_or_else(|| ProviderError::UnknownResource(format!("Unknown resource type: {}", resource_type)))
    }

    fn data_source(&self, data_source_type: &str) -> Result<&dyn DataSource, ProviderError> {
        self.data_sources
            .get(data_source_type)
            .map(|d| d.as_ref())
            .ok_or_else(|| ProviderError::UnknownResource(format!("Unknown data source type: {}", data_source_type)))
    }
}

impl Default for MerakiProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MerakiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MerakiProvider")
            .field("data_sources", &self.data_sources.len())
            .field("resources", &self.resources.len())
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl ProviderService for MerakiProvider {
    // =========================================================================
    // Schema & Metadata
    // =========================================================================

    fn schema(&self) -> ProviderSchema {
        let mut schema = ProviderSchema::new().with_provider_config(ProviderConfig::schema());
        for (name, resource) in &self.resources {
            schema = schema.with_resource(*name, resource.schema());
        }
        for (name, data_source) in &self.data_sources {
            schema = schema.with_data_source(*name, data_source.schema());
        }
        schema
    }

    fn capabilities(&self) -> ServerCapabilities {
        ServerCapabilities { plan_destroy: true }
    }

    // =========================================================================
    // Provider Lifecycle
    // =========================================================================

    async fn validate_provider_config(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        Ok(validate(&ProviderConfig::schema(), &config))
    }

    #[instrument(skip_all, name = "provider.configure")]
    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let diagnostics = validate(&ProviderConfig::schema(), &config);
        if diagnostics.iter().any(Diagnostic::is_error) {
            warn!(diagnostics = diagnostics.len(), "Configure completed with errors");
            return Ok(diagnostics);
        }

        let config = ProviderConfig::from_value(&config).map_err(|e| {
            error!(error = %e, "Configure failed");
            e
        })?;
        let client = DashboardClient::new(&config)?;
        info!(base_url = %config.base_url, debug = config.debug, "Configured dashboard client");
        *self.client.write().await = Some(Arc::new(client));
        Ok(diagnostics)
    }

    #[instrument(skip_all, name = "provider.stop")]
    async fn stop(&self) -> Result<(), ProviderError> {
        info!("Stop called");
        self.client.write().await.take();
        Ok(())
    }

    // =========================================================================
    // Resource Operations
    // =========================================================================

    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let resource = self.resource(resource_type)?;
        Ok(validate(&resource.schema(), &config))
    }

    #[instrument(skip(self, prior_state, proposed_state, config), name = "provider.plan")]
    async fn plan(
        &self,
        resource_type: &str,
        prior_state: Option<Value>,
        proposed_state: Value,
        config: Value,
    ) -> Result<PlanResult, ProviderError> {
        let schema = self.resource(resource_type)?.schema();
        let result = plan_changes(&schema, prior_state, proposed_state, &config);
        debug!(
            changes = result.changes.len(),
            requires_replace = result.requires_replace,
            "Plan completed"
        );
        Ok(result)
    }

    #[instrument(skip(self, planned_state), name = "provider.create")]
    async fn create(&self, resource_type: &str, planned_state: Value) -> Result<Value, ProviderError> {
        let resource = self.resource(resource_type)?;
        let client = self.client().await?;
        info!("Create called");
        resource.create(&client, planned_state).await.map_err(|e| {
            error!(error = %e, "Create failed");
            e
        })
    }

    #[instrument(skip(self, current_state), name = "provider.read")]
    async fn read(&self, resource_type: &str, current_state: Value) -> Result<ReadResult, ProviderError> {
        let resource = self.resource(resource_type)?;
        let client = self.client().await?;
        debug!("Read called");
        resource.read(&client, current_state).await
    }

    #[instrument(skip(self, prior_state, planned_state), name = "provider.update")]
    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        let resource = self.resource(resource_type)?;
        let client = self.client().await?;
        info!("Update called");
        resource.update(&client, prior_state, planned_state).await.map_err(|e| {
            error!(error = %e, "Update failed");
            e
        })
    }

    #[instrument(skip(self, current_state), name = "provider.delete")]
    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let resource = self.resource(resource_type)?;
        let client = self.client().await?;
        info!("Delete called");
        resource.delete(&client, current_state).await.map_err(|e| {
            error!(error = %e, "Delete failed");
            e
        })
    }

    #[instrument(skip(self), name = "provider.import_resource")]
    async fn import_resource(&self, resource_type: &str, id: &str) -> Result<Vec<ImportedResource>, ProviderError> {
        let resource = self.resource(resource_type)?;
        let attribute = resource.import_attribute().ok_or_else(|| {
            ProviderError::Unimplemented(format!("Import not supported for resource type: {}", resource_type))
        })?;
        if id.is_empty() {
            return Err(ProviderError::Validation(format!(
                "import id for {} must not be empty",
                resource_type
            )));
        }

        let mut state = Map::new();
        state.insert(attribute.to_string(), Value::String(id.to_string()));
        info!(attribute, "Imported resource id");
        Ok(vec![ImportedResource::new(resource_type, Value::Object(state))])
    }

    // =========================================================================
    // Data Source Operations
    // =========================================================================

    async fn validate_data_source_config(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let data_source = self.data_source(data_source_type)?;
        Ok(validate(&data_source.schema(), &config))
    }

    #[instrument(skip(self, config), name = "provider.read_data_source")]
    async fn read_data_source(&self, data_source_type: &str, config: Value) -> Result<Value, ProviderError> {
        let data_source = self.data_source(data_source_type)?;
        let client = self.client().await?;
        debug!("ReadDataSource called");
        data_source.read(&client, config).await.map_err(|e| {
            error!(error = %e, "ReadDataSource failed");
            e
        })
    }
}

/// Diff top-level attributes of `prior` and `proposed`.
///
/// Computed attributes and blocks the configuration leaves unset are copied
/// from prior state, or marked unknown on create. A change to a `force_new` attribute
/// requires replacement.
fn plan_changes(schema: &Schema, prior: Option<Value>, proposed: Value, config: &Value) -> PlanResult {
    let prior = prior.filter(|p| !p.is_null());

    if proposed.is_null() {
        let changes = prior
            .as_ref()
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .filter(|(_, v)| !v.is_null())
                    .map(|(k, v)| AttributeChange::removed(k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default();
        return PlanResult::with_changes(Value::Null, changes, false);
    }

    let mut planned = match proposed {
        Value::Object(map) => map,
        other => return PlanResult::no_change(other),
    };
    let prior_map = prior.as_ref().and_then(Value::as_object);

    let computed_attributes = schema
        .block
        .attributes
        .iter()
        .filter(|(_, attribute)| attribute.flags.computed)
        .map(|(name, _)| name);
    let computed_blocks = schema
        .block
        .blocks
        .iter()
        .filter(|(_, block)| block.computed)
        .map(|(name, _)| name);
    for name in computed_attributes.chain(computed_blocks) {
        let configured = config.get(name).is_some_and(|v| !v.is_null());
        if configured {
            continue;
        }
        let value = match prior_map {
            Some(prior) => prior.get(name).cloned().unwrap_or(Value::Null),
            None => Value::String(UNKNOWN_VALUE.to_string()),
        };
        planned.insert(name.clone(), value);
    }

    let Some(prior_map) = prior_map else {
        let changes = planned
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| AttributeChange::added(k.clone(), v.clone()))
            .collect();
        return PlanResult::with_changes(Value::Object(planned), changes, false);
    };

    let names: BTreeSet<&String> = prior_map.keys().chain(planned.keys()).collect();
    let mut changes = Vec::new();
    let mut requires_replace = false;
    for name in names {
        let before = prior_map.get(name).unwrap_or(&Value::Null);
        let after = planned.get(name).unwrap_or(&Value::Null);
        let attribute = schema.attribute(name);
        if equivalent(attribute.map(|a| &a.attr_type), before, after) {
            continue;
        }
        if attribute.is_some_and(|a| a.force_new) {
            requires_replace = true;
        }
        changes.push(match (before.is_null(), after.is_null()) {
            (true, _) => AttributeChange::added(name.clone(), after.clone()),
            (false, true) => AttributeChange::removed(name.clone(), before.clone()),
            (false, false) => AttributeChange::modified(name.clone(), before.clone(), after.clone()),
        });
    }

    if changes.is_empty() {
        PlanResult::no_change(Value::Object(planned))
    } else {
        PlanResult::with_changes(Value::Object(planned), changes, requires_replace)
    }
}

/// Values are equal, comparing set-typed attributes without regard to order.
fn equivalent(attr_type: Option<&AttributeType>, before: &Value, after: &Value) -> bool {
    match (attr_type, before, after) {
        (Some(AttributeType::Set(_)), Value::Array(a), Value::Array(b)) => {
            let mut a: Vec<String> = a.iter().map(Value::to_string).collect();
            let mut b: Vec<String> = b.iter().map(Value::to_string).collect();
            a.sort();
            b.sort();
            a.dedup();
            b.dedup();
            a == b
        },
        _ => before == after,
    }
}
