//! Values returned by [`crate::ProviderService`] callbacks.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::Diagnostic;

/// What a plan does to one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Null before, set after.
    Added,
    /// Set before, null after.
    Removed,
    /// Set on both sides with different values.
    Modified,
}

/// One top-level attribute a plan changes.
///
/// `before` is `None` when the attribute was null or the object is being
/// created; `after` is `None` when it becomes null or the object is being
/// destroyed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeChange {
    /// Attribute name.
    pub path: String,
    /// Prior value.
    pub before: Option<Value>,
    /// Planned value; may be the unknown marker.
    pub after: Option<Value>,
}

impl AttributeChange {
    /// `path` goes from null to `value`.
    pub fn added(path: impl Into<String>, value: Value) -> Self {
        Self {
            path: path.into(),
            before: None,
            after: Some(value),
        }
    }

    /// `path` goes from `value` to null.
    pub fn removed(path: impl Into<String>, value: Value) -> Self {
        Self {
            path: path.into(),
            before: Some(value),
            after: None,
        }
    }

    /// `path` goes from `before` to `after`.
    pub fn modified(path: impl Into<String>, before: Value, after: Value) -> Self {
        Self {
            path: path.into(),
            before: Some(before),
            after: Some(after),
        }
    }

    /// Classify the change.
    pub fn kind(&self) -> ChangeKind {
        match (&self.before, &self.after) {
            (None, _) => ChangeKind::Added,
            (Some(_), None) => ChangeKind::Removed,
            (Some(_), Some(_)) => ChangeKind::Modified,
        }
    }
}

/// Outcome of planning one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResult {
    /// State the host will pass to create or update; `null` for a destroy.
    pub planned_state: Value,
    /// Changed attributes, sorted by name on update.
    pub changes: Vec<AttributeChange>,
    /// A `force_new` attribute changed.
    pub requires_replace: bool,
}

impl PlanResult {
    /// Nothing to do; `state` is carried through unchanged.
    pub fn no_change(state: Value) -> Self {
        Self::with_changes(state, Vec::new(), false)
    }

    /// A plan with `changes`.
    pub fn with_changes(planned_state: Value, changes: Vec<AttributeChange>, requires_replace: bool) -> Self {
        Self {
            planned_state,
            changes,
            requires_replace,
        }
    }

    /// `true` when the plan removes the object.
    pub fn is_destroy(&self) -> bool {
        self.planned_state.is_null()
    }
}

/// Outcome of refreshing one resource.
///
/// `state` is `None` when the dashboard no longer has the object; the host
/// drops it from state and plans to recreate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadResult {
    /// Refreshed state, or `None` when the object is gone.
    pub state: Option<Value>,
    /// Warnings raised while reading.
    pub diagnostics: Vec<Diagnostic>,
}

impl ReadResult {
    /// The object still exists.
    pub fn found(state: Value) -> Self {
        Self {
            state: Some(state),
            diagnostics: Vec::new(),
        }
    }

    /// The object is gone; `warning` explains why it leaves state.
    pub fn removed(warning: Diagnostic) -> Self {
        Self {
            state: None,
            diagnostics: vec![warning],
        }
    }

    /// `true` when the object should leave state.
    pub fn is_removed(&self) -> bool {
        self.state.is_none()
    }
}

/// State seeded by an import, to be completed by a read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedResource {
    /// Resource type name.
    pub resource_type: String,
    /// Partial state holding the import id.
    pub state: Value,
}

impl ImportedResource {
    /// Seed `state` for `resource_type`.
    pub fn new(resource_type: impl Into<String>, state: Value) -> Self {
        Self {
            resource_type: resource_type.into(),
            state,
        }
    }
}

/// Type names the provider serves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMetadata {
    /// Resource type names, sorted.
    pub resources: Vec<String>,
    /// Data source type names, sorted.
    pub data_sources: Vec<String>,
    /// Optional protocol features.
    pub capabilities: ServerCapabilities,
}

/// Optional protocol features a provider supports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerCapabilities {
    /// `plan` accepts a null proposed state and plans a destroy.
    pub plan_destroy: bool,
}
