//! Schema validation of configuration values.
//!
//! Configuration arrives as `serde_json::Value` and is checked against a
//! [`Schema`] before any request is built. The request mappers trust their
//! input, so enum membership and integer ranges are enforced here and nowhere
//! else.
//!
//! Values equal to the host's unknown marker pass for any type; they are
//! checked again once known.
//!
//! # Example
//!
//! ```
//! use meraki_provider::schema::{Schema, Attribute};
//! use meraki_provider::validation::validate;
//! use serde_json::json;
//!
//! let schema = Schema::v0()
//!     .with_attribute("network_id", Attribute::required_string())
//!     .with_attribute("per_page", Attribute::optional_int64().between(3, 1000));
//!
//! assert!(validate(&schema, &json!({"network_id": "N_1", "per_page": 50})).is_empty());
//!
//! let diagnostics = validate(&schema, &json!({"network_id": "N_1", "per_page": 1}));
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].attribute.as_deref(), Some("per_page"));
//! ```

use serde_json::{Map, Value};

use crate::schema::{Attribute, AttributeType, Block, BlockNestingMode, Diagnostic, NestedBlock, Schema, Validator};
use crate::value::{is_unknown_json, UNKNOWN_VALUE};

/// Check `value` against `schema`. An empty result means valid.
///
/// - required attributes must be present and non-null
/// - computed-only attributes are ignored
/// - unknown values are skipped
/// - a value with the wrong type gets one diagnostic and its validators are
///   not run
/// - nested blocks are checked recursively with paths like
///   `reserved_ip_ranges.0.start`
pub fn validate(schema: &Schema, value: &Value) -> Vec<Diagnostic> {
    let mut checker = Checker::default();
    checker.block(&schema.block, value, "");
    checker.diagnostics
}

/// [`validate`], as a `Result`.
pub fn validate_result(schema: &Schema, value: &Value) -> Result<(), Vec<Diagnostic>> {
    let diagnostics = validate(schema, value);
    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(diagnostics)
    }
}

/// `true` when [`validate`] finds nothing.
pub fn is_valid(schema: &Schema, value: &Value) -> bool {
    validate(schema, value).is_empty()
}

#[derive(Default)]
struct Checker {
    diagnostics: Vec<Diagnostic>,
}

impl Checker {
    fn report(&mut self, path: &str, summary: String, detail: String) {
        self.diagnostics
            .push(Diagnostic::error(summary).with_detail(detail).with_attribute(path));
    }

    fn block(&mut self, block: &Block, value: &Value, path: &str) {
        let object = match value {
            Value::Null => return,
            v if is_unknown_json(v) => return,
            Value::Object(object) => object,
            other => {
                self.report(path, "Expected object".to_string(), format!("Got {}", kind(other)));
                return;
            },
        };

        for (name, attribute) in &block.attributes {
            self.attribute(attribute, object.get(name), &child(path, name));
        }
        for (name, nested) in &block.blocks {
            self.nested(nested, object.get(name), &child(path, name));
        }
    }

    fn attribute(&mut self, attribute: &Attribute, value: Option<&Value>, path: &str) {
        if attribute.flags.is_computed_only() {
            return;
        }
        let value = match value {
            None | Some(Value::Null) => {
                if attribute.flags.required {
                    self.report(
                        path,
                        format!("Missing required attribute '{}'", path),
                        "This attribute is required and must be provided".to_string(),
                    );
                }
                return;
            },
            Some(value) => value,
        };

        let before = self.diagnostics.len();
        self.typed(&attribute.attr_type, value, path);
        if self.diagnostics.len() == before {
            for validator in &attribute.validators {
                self.constraint(validator, value, path);
            }
        }
    }

    fn typed(&mut self, attr_type: &AttributeType, value: &Value, path: &str) {
        if is_unknown_json(value) {
            return;
        }
        let matches = match (attr_type, value) {
            (AttributeType::String, Value::String(_)) => true,
            (AttributeType::Int64, v) => is_whole_number(v),
            (AttributeType::Float64, Value::Number(_)) => true,
            (AttributeType::Bool, Value::Bool(_)) => true,
            (AttributeType::List(element) | AttributeType::Set(element), Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    self.typed(element, item, &format!("{}.{}", path, i));
                }
                true
            },
            (AttributeType::Object(fields), Value::Object(object)) => {
                self.object(fields.iter(), object, path);
                true
            },
            _ => false,
        };
        if !matches {
            self.report(
                path,
                format!("Invalid type for attribute '{}'", path),
                format!("Expected {}, got {}", attr_type.name(), kind(value)),
            );
        }
    }

    // Object types carry no presence flags, only element types.
    fn object<'a>(
        &mut self,
        fields: impl Iterator<Item = (&'a String, &'a AttributeType)>,
        object: &Map<String, Value>,
        path: &str,
    ) {
        for (name, attr_type) in fields {
            if let Some(value) = object.get(name).filter(|v| !v.is_null()) {
                self.typed(attr_type, value, &child(path, name));
            }
        }
    }

    fn constraint(&mut self, validator: &Validator, value: &Value, path: &str) {
        match validator {
            Validator::OneOf(allowed) => {
                // On lists and sets each element is checked.
                let candidates = match value {
                    Value::Array(items) => items.as_slice(),
                    single => std::slice::from_ref(single),
                };
                for s in candidates.iter().filter_map(Value::as_str) {
                    if s == UNKNOWN_VALUE || allowed.iter().any(|a| a == s) {
                        continue;
                    }
                    self.report(
                        path,
                        format!("Invalid value for attribute '{}'", path),
                        format!("Value must be one of [{}], got \"{}\"", allowed.join(", "), s),
                    );
                }
            },
            Validator::Int64Between { min, max } => {
                let Some(n) = value.as_f64() else {
                    return;
                };
                if n < *min as f64 || n > *max as f64 {
                    self.report(
                        path,
                        format!("Value out of range for attribute '{}'", path),
                        format!("Value must be between {} and {}, got {}", min, max, value),
                    );
                }
            },
        }
    }

    fn nested(&mut self, nested: &NestedBlock, value: Option<&Value>, path: &str) {
        let Some(value) = value.filter(|v| !v.is_null() && !is_unknown_json(v)) else {
            return;
        };
        match (nested.nesting_mode, value) {
            (BlockNestingMode::Single, value) => self.block(&nested.block, value, path),
            (BlockNestingMode::List, Value::Array(items)) => {
                if let Some(max) = nested.max_items.filter(|max| items.len() > *max as usize) {
                    self.report(
                        path,
                        format!("Block '{}' allows at most {} item(s), got {}", path, max, items.len()),
                        "Remove the extra entries".to_string(),
                    );
                }
                for (i, item) in items.iter().enumerate() {
                    self.block(&nested.block, item, &format!("{}.{}", path, i));
                }
            },
            (BlockNestingMode::List, other) => self.report(
                path,
                format!("Expected list for block '{}'", path),
                format!("Got {}", kind(other)),
            ),
        }
    }
}

fn child(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// JSON has one number type; 42.0 is accepted as an integer.
fn is_whole_number(value: &Value) -> bool {
    let Value::Number(n) = value else {
        return false;
    };
    n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::schema::{Attribute, AttributeFlags, Block, NestedBlock, Schema};
    use serde_json::json;

    fn vlan() -> Schema {
        Schema::v0()
            .with_attribute("network_id", Attribute::required_string())
            .with_attribute("vlan_id", Attribute::required_int64().between(1, 4094))
            .with_attribute("interface_id", Attribute::computed_string())
            .with_attribute(
                "dhcp_handling",
                Attribute::optional_string().one_of([
                    "Run a DHCP server",
                    "Relay DHCP to another server",
                    "Do not respond to DHCP requests",
                ]),
            )
            .with_attribute(
                "dhcp_relay_server_ips",
                Attribute::new(AttributeType::set(AttributeType::String), AttributeFlags::optional()),
            )
            .with_block(
                "reserved_ip_ranges",
                NestedBlock::list(
                    Block::new()
                        .with_attribute("start", Attribute::required_string())
                        .with_attribute("end", Attribute::required_string()),
                )
                .with_max_items(2),
            )
            .with_block(
                "ipv6",
                NestedBlock::single(Block::new().with_attribute("enabled", Attribute::required_bool())),
            )
    }

    fn only(diagnostics: Vec<Diagnostic>) -> Diagnostic {
        assert_eq!(diagnostics.len(), 1, "{:?}", diagnostics);
        diagnostics.into_iter().next().unwrap()
    }

    #[test]
    fn test_minimal_config_is_valid() {
        assert!(validate(&vlan(), &json!({"network_id": "N_1", "vlan_id": 10})).is_empty());
    }

    #[test]
    fn test_missing_and_null_required() {
        let diag = only(validate(&vlan(), &json!({"vlan_id": 10})));
        assert_eq!(diag.attribute.as_deref(), Some("network_id"));
        assert!(diag.summary.contains("Missing required attribute"));

        let diag = only(validate(&vlan(), &json!({"network_id": null, "vlan_id": 10})));
        assert_eq!(diag.attribute.as_deref(), Some("network_id"));
    }

    #[test]
    fn test_type_mismatch() {
        let diag = only(validate(&vlan(), &json!({"network_id": 123, "vlan_id": 10})));
        assert!(diag.summary.contains("Invalid type"));
        assert_eq!(diag.detail.as_deref(), Some("Expected string, got number"));
    }

    #[test]
    fn test_whole_floats_count_as_integers() {
        assert!(validate(&vlan(), &json!({"network_id": "N_1", "vlan_id": 10.0})).is_empty());
        assert_eq!(validate(&vlan(), &json!({"network_id": "N_1", "vlan_id": 10.5})).len(), 1);
        assert_eq!(validate(&vlan(), &json!({"network_id": "N_1", "vlan_id": "10"})).len(), 1);
    }

    #[test]
    fn test_unknown_values_are_skipped() {
        let config = json!({
            "network_id": UNKNOWN_VALUE,
            "vlan_id": UNKNOWN_VALUE,
            "dhcp_handling": UNKNOWN_VALUE,
            "dhcp_relay_server_ips": ["10.0.0.1", UNKNOWN_VALUE],
            "reserved_ip_ranges": UNKNOWN_VALUE,
        });
        assert!(validate(&vlan(), &config).is_empty());
    }

    #[test]
    fn test_computed_only_ignored() {
        let config = json!({"network_id": "N_1", "vlan_id": 10, "interface_id": 99});
        assert!(validate(&vlan(), &config).is_empty());
    }

    #[test]
    fn test_one_of() {
        let diag = only(validate(
            &vlan(),
            &json!({"network_id": "N_1", "vlan_id": 10, "dhcp_handling": "Maybe"}),
        ));
        assert!(diag.summary.contains("Invalid value"));
        assert!(diag.detail.unwrap().contains("Run a DHCP server"));
    }

    #[test]
    fn test_one_of_checks_each_element() {
        let schema = Schema::v0().with_attribute(
            "product_types",
            Attribute::optional_string_list().one_of(["appliance", "switch", "wireless"]),
        );
        assert!(validate(&schema, &json!({"product_types": ["switch", "wireless"]})).is_empty());
        assert_eq!(validate(&schema, &json!({"product_types": ["switch", "toaster"]})).len(), 1);
    }

    #[test]
    fn test_range_bounds_inclusive() {
        for ok in [1, 4094] {
            assert!(validate(&vlan(), &json!({"network_id": "N_1", "vlan_id": ok})).is_empty());
        }
        let diag = only(validate(&vlan(), &json!({"network_id": "N_1", "vlan_id": 4095})));
        assert!(diag.summary.contains("out of range"));
    }

    #[test]
    fn test_type_error_suppresses_validators() {
        let diag = only(validate(&vlan(), &json!({"network_id": "N_1", "vlan_id": "many"})));
        assert!(diag.summary.contains("Invalid type"));
    }

    #[test]
    fn test_set_requires_array() {
        let diag = only(validate(
            &vlan(),
            &json!({"network_id": "N_1", "vlan_id": 10, "dhcp_relay_server_ips": "10.0.0.1"}),
        ));
        assert!(diag.detail.unwrap().contains("Expected set"));
    }

    #[test]
    fn test_single_block_paths() {
        let mut config = json!({"network_id": "N_1", "vlan_id": 10});
        config["ipv6"] = json!({"enabled": true});
        assert!(validate(&vlan(), &config).is_empty());

        config["ipv6"] = json!({"enabled": "yes"});
        let diag = only(validate(&vlan(), &config));
        assert_eq!(diag.attribute.as_deref(), Some("ipv6.enabled"));
    }

    #[test]
    fn test_list_block_limits_and_paths() {
        let mut config = json!({"network_id": "N_1", "vlan_id": 10});
        config["reserved_ip_ranges"] = json!([
            {"start": "10.0.0.2", "end": "10.0.0.9"},
            {"start": "10.0.1.2", "end": "10.0.1.9"},
            {"start": "10.0.2.2", "end": "10.0.2.9"},
        ]);
        let diag = only(validate(&vlan(), &config));
        assert!(diag.summary.contains("at most 2"));

        config["reserved_ip_ranges"] = json!([{"start": "10.0.0.2"}]);
        let diag = only(validate(&vlan(), &config));
        assert_eq!(diag.attribute.as_deref(), Some("reserved_ip_ranges.0.end"));

        config["reserved_ip_ranges"] = json!({"start": "10.0.0.2"});
        let diag = only(validate(&vlan(), &config));
        assert!(diag.summary.contains("Expected list"));
    }

    #[test]
    fn test_object_type_checks_fields() {
        let fields = BTreeMap::from([
            ("serial".to_string(), AttributeType::String),
            ("lan_ip".to_string(), AttributeType::String),
        ]);
        let schema = Schema::v0().with_attribute(
            "item",
            Attribute::new(AttributeType::Object(fields), AttributeFlags::optional()),
        );

        assert!(validate(&schema, &json!({"item": {"serial": "Q2XX-AAAA-0001", "lan_ip": null}})).is_empty());

        let diag = only(validate(&schema, &json!({"item": {"serial": 7}})));
        assert_eq!(diag.attribute.as_deref(), Some("item.serial"));
    }

    #[test]
    fn test_result_helpers() {
        let config = json!({"network_id": "N_1", "vlan_id": 10});
        assert!(is_valid(&vlan(), &config));
        assert!(validate_result(&vlan(), &config).is_ok());
        assert_eq!(validate_result(&vlan(), &json!({})).unwrap_err().len(), 2);
    }

    #[test]
    fn test_root_must_be_object() {
        let diag = only(validate(&vlan(), &json!("not an object")));
        assert!(diag.summary.contains("Expected object"));
        assert!(diag.attribute.is_none());
    }
}
