//! Test harness for [`ProviderService`] implementations.
//!
//! [`ProviderTester`] drives a provider the way the host does, without the
//! plugin protocol in between. Pair it with a `wiremock` server standing in
//! for the dashboard:
//!
//! ```no_run
//! use meraki_provider::testing::ProviderTester;
//! use meraki_provider::MerakiProvider;
//! use serde_json::json;
//!
//! # async fn run(mock_uri: String) {
//! let tester = ProviderTester::new(MerakiProvider::new());
//! tester
//!     .configure(json!({
//!         "meraki_dashboard_api_key": "test-key",
//!         "meraki_base_url": mock_uri,
//!     }))
//!     .await
//!     .unwrap();
//!
//! let state = tester
//!     .lifecycle_create(
//!         "meraki_networks",
//!         json!({"organization_id": "1", "name": "Branch", "product_types": ["switch"]}),
//!     )
//!     .await
//!     .unwrap();
//! assert_eq!(state["name"], "Branch");
//! # }
//! ```

use serde_json::Value;

use crate::error::ProviderError;
use crate::schema::{Diagnostic, DiagnosticSeverity, ProviderSchema};
use crate::service::ProviderService;
use crate::types::{ChangeKind, ImportedResource, PlanResult, ReadResult};
use crate::value::is_unknown_json;

/// Drives a [`ProviderService`] in tests.
pub struct ProviderTester<P: ProviderService> {
    provider: P,
}

impl<P: ProviderService> ProviderTester<P> {
    /// Wrap `provider`.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// The wrapped provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    // =========================================================================
    // Schema & Metadata
    // =========================================================================

    /// The provider's schema.
    pub fn schema(&self) -> ProviderSchema {
        self.provider.schema()
    }

    /// Resource type names, sorted.
    pub fn resource_types(&self) -> Vec<String> {
        self.provider.metadata().resources
    }

    /// Data source type names, sorted.
    pub fn data_source_types(&self) -> Vec<String> {
        self.provider.metadata().data_sources
    }

    // =========================================================================
    // Provider Lifecycle
    // =========================================================================

    /// Validate provider configuration; error diagnostics become `Err`.
    pub async fn validate_provider_config(&self, config: Value) -> Result<(), TestError> {
        let diagnostics = self.provider.validate_provider_config(config).await?;
        check_diagnostics(diagnostics)
    }

    /// Configure the provider; error diagnostics become `Err`.
    pub async fn configure(&self, config: Value) -> Result<(), TestError> {
        let diagnostics = self.provider.configure(config).await?;
        check_diagnostics(diagnostics)
    }

    /// Stop the provider.
    pub async fn stop(&self) -> Result<(), ProviderError> {
        self.provider.stop().await
    }

    // =========================================================================
    // Resource Operations
    // =========================================================================

    /// Validate a resource configuration.
    pub async fn validate_resource_config(&self, resource_type: &str, config: Value) -> Result<(), TestError> {
        let diagnostics = self.provider.validate_resource_config(resource_type, config).await?;
        check_diagnostics(diagnostics)
    }

    /// Plan a create, using `config` as both proposed state and config.
    pub async fn plan_create(&self, resource_type: &str, config: Value) -> Result<PlanResult, ProviderError> {
        self.provider.plan(resource_type, None, config.clone(), config).await
    }

    /// Plan an update from `prior_state` towards `config`.
    pub async fn plan_update(
        &self,
        resource_type: &str,
        prior_state: Value,
        config: Value,
    ) -> Result<PlanResult, ProviderError> {
        self.provider
            .plan(resource_type, Some(prior_state), config.clone(), config)
            .await
    }

    /// Plan a destroy.
    pub async fn plan_delete(&self, resource_type: &str, prior_state: Value) -> Result<PlanResult, ProviderError> {
        self.provider
            .plan(resource_type, Some(prior_state), Value::Null, Value::Null)
            .await
    }

    /// Create a resource.
    pub async fn create(&self, resource_type: &str, planned_state: Value) -> Result<Value, ProviderError> {
        self.provider.create(resource_type, planned_state).await
    }

    /// Refresh a resource.
    pub async fn read(&self, resource_type: &str, current_state: Value) -> Result<ReadResult, ProviderError> {
        self.provider.read(resource_type, current_state).await
    }

    /// Update a resource.
    pub async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        self.provider.update(resource_type, prior_state, planned_state).await
    }

    /// Delete a resource, returning its warnings.
    pub async fn delete(&self, resource_type: &str, current_state: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        self.provider.delete(resource_type, current_state).await
    }

    /// Import a resource by id.
    pub async fn import_resource(&self, resource_type: &str, id: &str) -> Result<Vec<ImportedResource>, ProviderError> {
        self.provider.import_resource(resource_type, id).await
    }

    // =========================================================================
    // Data Source Operations
    // =========================================================================

    /// Validate a data source configuration.
    pub async fn validate_data_source_config(&self, data_source_type: &str, config: Value) -> Result<(), TestError> {
        let diagnostics = self
            .provider
            .validate_data_source_config(data_source_type, config)
            .await?;
        check_diagnostics(diagnostics)
    }

    /// Read a data source.
    pub async fn read_data_source(&self, data_source_type: &str, config: Value) -> Result<Value, ProviderError> {
        self.provider.read_data_source(data_source_type, config).await
    }

    // =========================================================================
    // Lifecycle Helpers
    // =========================================================================

    /// plan → create → read. Returns the refreshed state.
    pub async fn lifecycle_create(&self, resource_type: &str, config: Value) -> Result<Value, ProviderError> {
        let plan = self.plan_create(resource_type, config).await?;
        let created = self.create(resource_type, plan.planned_state).await?;
        self.refresh(resource_type, created).await
    }

    /// plan → update → read. Returns the refreshed state.
    pub async fn lifecycle_update(
        &self,
        resource_type: &str,
        prior_state: Value,
        config: Value,
    ) -> Result<Value, ProviderError> {
        let plan = self.plan_update(resource_type, prior_state.clone(), config).await?;
        let updated = self.update(resource_type, prior_state, plan.planned_state).await?;
        self.refresh(resource_type, updated).await
    }

    /// plan → delete. Returns the delete warnings.
    pub async fn lifecycle_delete(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        self.plan_delete(resource_type, current_state.clone()).await?;
        self.delete(resource_type, current_state).await
    }

    /// create → update → delete. Returns the state after the update.
    pub async fn lifecycle_crud(
        &self,
        resource_type: &str,
        initial_config: Value,
        updated_config: Value,
    ) -> Result<Value, ProviderError> {
        let created = self.lifecycle_create(resource_type, initial_config).await?;
        let updated = self.lifecycle_update(resource_type, created, updated_config).await?;
        self.lifecycle_delete(resource_type, updated.clone()).await?;
        Ok(updated)
    }

    async fn refresh(&self, resource_type: &str, state: Value) -> Result<Value, ProviderError> {
        self.read(resource_type, state).await?.state.ok_or_else(|| {
            ProviderError::NotFound(format!("{} disappeared right after being written", resource_type))
        })
    }
}

/// Failure of a harness call that reports diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum TestError {
    /// The call returned error diagnostics.
    #[error("{}", render(.0))]
    Diagnostics(Vec<Diagnostic>),
    /// The call failed outright.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
}

fn render(diagnostics: &[Diagnostic]) -> String {
    let mut out = format!("{} error diagnostic(s):", diagnostics.len());
    for diag in diagnostics {
        out.push_str("\n  ");
        out.push_str(&diag.summary);
        if let Some(attribute) = &diag.attribute {
            out.push_str(&format!(" (at {})", attribute));
        }
    }
    out
}

fn check_diagnostics(diagnostics: Vec<Diagnostic>) -> Result<(), TestError> {
    let errors: Vec<_> = diagnostics.into_iter().filter(Diagnostic::is_error).collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(TestError::Diagnostics(errors))
    }
}

// =========================================================================
// Assertion Helpers
// =========================================================================

fn changed_paths(plan: &PlanResult) -> Vec<&str> {
    plan.changes.iter().map(|c| c.path.as_str()).collect()
}

fn summaries<'a>(diagnostics: impl Iterator<Item = &'a Diagnostic>) -> Vec<&'a str> {
    diagnostics.map(|d| d.summary.as_str()).collect()
}

/// The plan creates the object: every change is an addition.
///
/// # Panics
///
/// Panics if there are no changes, if any change is not an addition, or if
/// replacement is required.
pub fn assert_plan_creates(plan: &PlanResult) {
    assert!(!plan.changes.is_empty(), "plan has no changes; expected a create");
    assert!(
        plan.changes.iter().all(|c| c.kind() == ChangeKind::Added),
        "expected only additions in a create plan, got {:?}",
        plan.changes
    );
    assert!(!plan.requires_replace, "a create plan must not require replacement");
}

/// The plan is empty.
pub fn assert_plan_no_changes(plan: &PlanResult) {
    assert!(plan.changes.is_empty(), "expected an empty plan, got changes to {:?}", changed_paths(plan));
}

/// The plan replaces the object.
pub fn assert_plan_replaces(plan: &PlanResult) {
    assert!(
        plan.requires_replace,
        "expected a replacement; changed {:?} without touching a force_new attribute",
        changed_paths(plan)
    );
}

/// The plan updates the object in place.
pub fn assert_plan_updates_in_place(plan: &PlanResult) {
    assert!(!plan.requires_replace, "expected an in-place update, but the plan replaces the object");
}

/// The plan destroys the object.
pub fn assert_plan_destroys(plan: &PlanResult) {
    assert!(plan.is_destroy(), "expected a null planned state, got {}", plan.planned_state);
}

/// The plan changes `path`.
pub fn assert_plan_changes_attribute(plan: &PlanResult, path: &str) {
    assert!(
        plan.changes.iter().any(|c| c.path == path),
        "expected '{}' to change; changed {:?}",
        path,
        changed_paths(plan)
    );
}

/// `path` is only known after apply.
pub fn assert_plan_unknown(plan: &PlanResult, path: &str) {
    let value = plan.planned_state.get(path);
    assert!(
        value.is_some_and(is_unknown_json),
        "expected '{}' to be unknown until apply, got {:?}",
        path,
        value
    );
}

/// The read dropped the object from state with a warning.
pub fn assert_removed(result: &ReadResult) {
    assert!(result.is_removed(), "expected the object to leave state, got {:?}", result.state);
    assert_has_warnings(&result.diagnostics);
}

/// No error diagnostics.
pub fn assert_no_errors(diagnostics: &[Diagnostic]) {
    let errors = summaries(diagnostics.iter().filter(|d| d.is_error()));
    assert!(errors.is_empty(), "expected no errors, got {:?}", errors);
}

/// At least one error diagnostic.
pub fn assert_has_errors(diagnostics: &[Diagnostic]) {
    assert!(diagnostics.iter().any(Diagnostic::is_error), "expected an error, got {:?}", diagnostics);
}

/// At least one warning diagnostic.
pub fn assert_has_warnings(diagnostics: &[Diagnostic]) {
    assert!(
        diagnostics.iter().any(|d| d.severity == DiagnosticSeverity::Warning),
        "expected a warning, got {:?}",
        diagnostics
    );
}

/// Some error summary contains `needle`.
pub fn assert_error_contains(diagnostics: &[Diagnostic], needle: &str) {
    let errors = summaries(diagnostics.iter().filter(|d| d.is_error()));
    assert!(
        errors.iter().any(|s| s.contains(needle)),
        "expected an error mentioning '{}', got {:?}",
        needle,
        errors
    );
}
