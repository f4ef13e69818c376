//! Tri-state attribute values.
//!
//! Every attribute the host hands us is in one of three states: unset
//! (`null`), not yet known (only during planning), or concretely valued.
//! [`Field`] keeps those three apart so the request and response mappers can
//! apply a per-field policy instead of guessing from zero values.
//!
//! # JSON encoding
//!
//! | JSON                                          | `Field`        |
//! |-----------------------------------------------|----------------|
//! | absent key (with `#[serde(default)]`) / `null` | `Field::Null`  |
//! | `"74D93920-ED26-11E3-AC10-0800200C9A66"`       | `Field::Unknown` |
//! | anything else                                  | `Field::Known` |
//!
//! ```
//! use meraki_provider::value::{Field, UNKNOWN_VALUE};
//!
//! let name: Field<String> = serde_json::from_value(serde_json::json!("branch-1")).unwrap();
//! assert_eq!(name, Field::Known("branch-1".to_string()));
//!
//! let pending: Field<i64> = serde_json::from_value(serde_json::json!(UNKNOWN_VALUE)).unwrap();
//! assert!(pending.is_unknown());
//! ```

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Marker the host uses for values that are not known until apply.
pub const UNKNOWN_VALUE: &str = "74D93920-ED26-11E3-AC10-0800200C9A66";

/// A configuration or state value that may be unset, unknown, or known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    /// Not set by the user, or not returned by the backend.
    Null,
    /// Will only be known after apply.
    Unknown,
    /// A concrete value.
    Known(T),
}

impl<T> Field<T> {
    /// Returns `true` for [`Field::Known`].
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Returns `true` for [`Field::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for [`Field::Unknown`].
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Borrow the known value.
    pub fn as_known(&self) -> Option<&T> {
        match self {
            Self::Known(v) => Some(v),
            _ => None,
        }
    }

    /// Convert into an `Option`, collapsing `Null` and `Unknown` into `None`.
    pub fn into_known(self) -> Option<T> {
        match self {
            Self::Known(v) => Some(v),
            _ => None,
        }
    }

    /// Map the known value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Self::Null => Field::Null,
            Self::Unknown => Field::Unknown,
            Self::Known(v) => Field::Known(f(v)),
        }
    }

    /// Keep `self` if known, otherwise `other`.
    pub fn or(self, other: Self) -> Self {
        if self.is_known() {
            self
        } else {
            other
        }
    }

    /// Replace `Unknown` with `Null`.
    ///
    /// State written back to the host after apply must not contain unknowns.
    pub fn settle(self) -> Self {
        match self {
            Self::Unknown => Self::Null,
            other => other,
        }
    }

    /// `Some` becomes `Known`, `None` becomes `Null`.
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Known(v),
            None => Self::Null,
        }
    }
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Self::Null
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Self::Known(value)
    }
}

impl From<&str> for Field<String> {
    fn from(value: &str) -> Self {
        Self::Known(value.to_string())
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Unknown => serializer.serialize_str(UNKNOWN_VALUE),
            Self::Known(v) => v.serialize(serializer),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        match raw {
            serde_json::Value::Null => Ok(Self::Null),
            serde_json::Value::String(ref s) if s == UNKNOWN_VALUE => Ok(Self::Unknown),
            other => serde_json::from_value(other)
                .map(Self::Known)
                .map_err(D::Error::custom),
        }
    }
}

/// Returns `true` if a raw JSON value is the host's unknown marker.
pub fn is_unknown_json(value: &serde_json::Value) -> bool {
    value.as_str() == Some(UNKNOWN_VALUE)
}
