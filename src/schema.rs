//! Attribute schemas for the provider, its resources and data sources.
//!
//! Schemas are pure data. Every endpoint definition in [`crate::resources`]
//! declares one, [`crate::validation`] checks configuration against it, and
//! the provider's plan step reads the `computed` and `force_new` flags.
//!
//! Attribute names are the snake_case names the host sees; the dashboard's
//! camelCase keys only appear in the client payload types.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Value type of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    /// UTF-8 string.
    String,
    /// Whole number.
    Int64,
    /// Floating point number, e.g. device coordinates.
    Float64,
    /// `true` / `false`.
    Bool,
    /// Ordered sequence.
    List(Box<AttributeType>),
    /// Unordered sequence; order and duplicates carry no meaning.
    Set(Box<AttributeType>),
    /// Fixed set of typed keys. Used for computed response objects.
    Object(BTreeMap<String, AttributeType>),
}

impl AttributeType {
    /// `List` of `element`.
    pub fn list(element: AttributeType) -> Self {
        Self::List(Box::new(element))
    }

    /// `Set` of `element`.
    pub fn set(element: AttributeType) -> Self {
        Self::Set(Box::new(element))
    }

    /// Name used in validation messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Bool => "bool",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Object(_) => "object",
        }
    }
}

/// Who may set an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttributeFlags {
    /// Must be present in configuration.
    pub required: bool,
    /// May be present in configuration.
    pub optional: bool,
    /// Filled in by the dashboard.
    pub computed: bool,
    /// Redacted from plans and logs.
    pub sensitive: bool,
}

impl AttributeFlags {
    const fn of(required: bool, optional: bool, computed: bool) -> Self {
        Self {
            required,
            optional,
            computed,
            sensitive: false,
        }
    }

    /// Required in configuration.
    pub const fn required() -> Self {
        Self::of(true, false, false)
    }

    /// Optional in configuration.
    pub const fn optional() -> Self {
        Self::of(false, true, false)
    }

    /// Read-only; only the dashboard sets it.
    pub const fn computed() -> Self {
        Self::of(false, false, true)
    }

    /// Optional, with the dashboard's value used when left unset.
    pub const fn optional_computed() -> Self {
        Self::of(false, true, true)
    }

    /// The same flags, marked sensitive.
    pub const fn sensitive(self) -> Self {
        Self { sensitive: true, ..self }
    }

    /// Set by the dashboard and never by configuration.
    pub const fn is_computed_only(&self) -> bool {
        self.computed && !self.optional && !self.required
    }
}

/// A constraint checked on known values after the type check passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validator {
    /// String (or each string element) must be one of these.
    OneOf(Vec<String>),
    /// Number must lie in `min..=max`.
    Int64Between {
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
}

/// One attribute of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Value type.
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    /// Presence flags.
    #[serde(flatten)]
    pub flags: AttributeFlags,
    /// Shown to users in generated docs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// A change replaces the object instead of updating it.
    #[serde(default)]
    pub force_new: bool,
    /// Value constraints.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,
}

impl Attribute {
    /// Attribute of `attr_type` with `flags` and nothing else.
    pub fn new(attr_type: AttributeType, flags: AttributeFlags) -> Self {
        Self {
            attr_type,
            flags,
            description: None,
            force_new: false,
            validators: Vec::new(),
        }
    }

    /// Computed attribute of any type.
    pub fn computed(attr_type: AttributeType) -> Self {
        Self::new(attr_type, AttributeFlags::computed())
    }

    /// Required string.
    pub fn required_string() -> Self {
        Self::new(AttributeType::String, AttributeFlags::required())
    }

    /// Optional string.
    pub fn optional_string() -> Self {
        Self::new(AttributeType::String, AttributeFlags::optional())
    }

    /// Computed string.
    pub fn computed_string() -> Self {
        Self::computed(AttributeType::String)
    }

    /// Optional string the dashboard fills in when unset.
    pub fn optional_computed_string() -> Self {
        Self::new(AttributeType::String, AttributeFlags::optional_computed())
    }

    /// Optional list of strings.
    pub fn optional_string_list() -> Self {
        Self::new(AttributeType::list(AttributeType::String), AttributeFlags::optional())
    }

    /// Required integer.
    pub fn required_int64() -> Self {
        Self::new(AttributeType::Int64, AttributeFlags::required())
    }

    /// Optional integer.
    pub fn optional_int64() -> Self {
        Self::new(AttributeType::Int64, AttributeFlags::optional())
    }

    /// Required boolean.
    pub fn required_bool() -> Self {
        Self::new(AttributeType::Bool, AttributeFlags::required())
    }

    /// Optional boolean.
    pub fn optional_bool() -> Self {
        Self::new(AttributeType::Bool, AttributeFlags::optional())
    }

    /// Computed boolean.
    pub fn computed_bool() -> Self {
        Self::computed(AttributeType::Bool)
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace the object when this attribute changes.
    pub fn with_force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    /// Mark sensitive.
    pub fn sensitive(mut self) -> Self {
        self.flags = self.flags.sensitive();
        self
    }

    /// Only accept one of `values`.
    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.validators.push(Validator::OneOf(values));
        self
    }

    /// Only accept numbers in `min..=max`.
    pub fn between(mut self, min: i64, max: i64) -> Self {
        self.validators.push(Validator::Int64Between { min, max });
        self
    }
}

/// How a nested block repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockNestingMode {
    /// At most one object, e.g. a VLAN's `ipv6` settings.
    #[default]
    Single,
    /// An ordered list of objects, e.g. `reserved_ip_ranges`.
    List,
}

/// Attributes and nested blocks at one level of a schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Attributes by name.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, Attribute>,
    /// Nested blocks by name.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub blocks: HashMap<String, NestedBlock>,
    /// Block description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Block {
    /// An empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, attr: Attribute) -> Self {
        self.attributes.insert(name.into(), attr);
        self
    }

    /// Add a nested block.
    pub fn with_block(mut self, name: impl Into<String>, block: NestedBlock) -> Self {
        self.blocks.insert(name.into(), block);
        self
    }
}

/// A block nested under a name, with its repetition rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedBlock {
    /// The nested attributes.
    #[serde(flatten)]
    pub block: Block,
    /// Single object or list.
    #[serde(default)]
    pub nesting_mode: BlockNestingMode,
    /// Upper bound on list length, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u32>,
    /// The dashboard fills the block when the configuration leaves it out.
    #[serde(default)]
    pub computed: bool,
}

impl NestedBlock {
    /// At most one object.
    pub fn single(block: Block) -> Self {
        Self {
            block,
            nesting_mode: BlockNestingMode::Single,
            max_items: Some(1),
            computed: false,
        }
    }

    /// Any number of objects, order preserved.
    pub fn list(block: Block) -> Self {
        Self {
            block,
            nesting_mode: BlockNestingMode::List,
            max_items: None,
            computed: false,
        }
    }

    /// Cap the list length.
    pub fn with_max_items(mut self, max: u32) -> Self {
        self.max_items = Some(max);
        self
    }

    /// Keep the dashboard's value when the configuration omits the block.
    pub fn with_computed(mut self) -> Self {
        self.computed = true;
        self
    }
}

/// Schema of one resource, data source, or the provider configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// State version, bumped when the stored shape changes.
    #[serde(default)]
    pub version: u64,
    /// Top-level block.
    #[serde(flatten)]
    pub block: Block,
}

impl Schema {
    /// An empty schema at version 0.
    pub fn v0() -> Self {
        Self::default()
    }

    /// Add a top-level attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, attr: Attribute) -> Self {
        self.block = self.block.with_attribute(name, attr);
        self
    }

    /// Add a top-level nested block.
    pub fn with_block(mut self, name: impl Into<String>, block: NestedBlock) -> Self {
        self.block = self.block.with_block(name, block);
        self
    }

    /// Describe the schema.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.block.description = Some(description.into());
        self
    }

    /// Top-level attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.block.attributes.get(name)
    }

    /// Top-level attributes only the dashboard sets, sorted by name.
    pub fn computed_only(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .block
            .attributes
            .iter()
            .filter(|(_, attr)| attr.flags.is_computed_only())
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

/// Everything the provider exposes to the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderSchema {
    /// Provider configuration block.
    #[serde(default)]
    pub provider: Schema,
    /// Resource schemas by type name.
    #[serde(default)]
    pub resources: HashMap<String, Schema>,
    /// Data source schemas by type name.
    #[serde(default)]
    pub data_sources: HashMap<String, Schema>,
}

impl ProviderSchema {
    /// An empty provider schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the provider configuration schema.
    pub fn with_provider_config(mut self, schema: Schema) -> Self {
        self.provider = schema;
        self
    }

    /// Register a resource schema.
    pub fn with_resource(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.resources.insert(name.into(), schema);
        self
    }

    /// Register a data source schema.
    pub fn with_data_source(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.data_sources.insert(name.into(), schema);
        self
    }
}

/// Severity of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    /// The operation failed.
    Error,
    /// The operation went through but the user should know something.
    Warning,
}

/// A message shown to the user by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Error or warning.
    pub severity: DiagnosticSeverity,
    /// One-line summary.
    pub summary: String,
    /// Longer explanation, e.g. the dashboard's error body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Dotted attribute path the message is about.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl Diagnostic {
    fn with_severity(severity: DiagnosticSeverity, summary: impl Into<String>) -> Self {
        Self {
            severity,
            summary: summary.into(),
            detail: None,
            attribute: None,
        }
    }

    /// An error.
    pub fn error(summary: impl Into<String>) -> Self {
        Self::with_severity(DiagnosticSeverity::Error, summary)
    }

    /// A warning.
    pub fn warning(summary: impl Into<String>) -> Self {
        Self::with_severity(DiagnosticSeverity::Warning, summary)
    }

    /// `true` for errors.
    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }

    /// Attach detail text.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attach an attribute path. An empty path means the whole object and is
    /// not recorded.
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        if !attribute.is_empty() {
            self.attribute = Some(attribute);
        }
        self
    }
}
