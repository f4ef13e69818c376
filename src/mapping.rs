//! Request and response mapping between [`Field`] values and API payloads.
//!
//! Endpoint definitions never hand-write null checks. A request payload is
//! assembled from the [`request`] helpers, each of which encodes one field
//! policy; a state object is assembled from the [`response`] helpers, which
//! turn every absent backend field into [`Field::Null`].
//!
//! Canonical policies:
//!
//! | Case                       | Request side          | Response side            |
//! |----------------------------|-----------------------|--------------------------|
//! | required-as-optional string | `""`                 | `None` → `Null`          |
//! | optional scalar            | omitted (`None`)      | `None` → `Null`          |
//! | list                       | omitted, order kept   | `None` → `Null`, `[]` → `[]` |
//! | nested object              | omitted               | `None` → `Null`          |

use serde::Serialize;

use crate::value::Field;

/// A configuration object that can be turned into a request payload.
pub trait ToPayload {
    /// The payload type sent to the backend.
    type Payload: Serialize;

    /// Build the payload. Never fails; validation happens before this.
    fn to_payload(&self) -> Self::Payload;
}

/// A state object that can be built from a response payload.
pub trait FromPayload: Sized {
    /// The payload type received from the backend.
    type Payload;

    /// Build the state object. Never fails.
    fn from_payload(payload: &Self::Payload) -> Self;
}

/// Configuration → request payload helpers.
pub mod request {
    use super::Field;

    /// A string the payload always carries; null and unknown become `""`.
    pub fn string(field: &Field<String>) -> String {
        field.as_known().cloned().unwrap_or_default()
    }

    /// A truly optional string; null and unknown are omitted.
    pub fn opt_string(field: &Field<String>) -> Option<String> {
        field.as_known().cloned()
    }

    /// An optional number or boolean; null and unknown are omitted.
    pub fn opt<T: Clone>(field: &Field<T>) -> Option<T> {
        field.as_known().cloned()
    }

    /// An ordered list; element order is preserved.
    pub fn list<T: Clone>(field: &Field<Vec<T>>) -> Option<Vec<T>> {
        field.as_known().cloned()
    }

    /// A set: duplicates removed, order not guaranteed.
    pub fn set<T: Clone + Ord>(field: &Field<Vec<T>>) -> Option<Vec<T>> {
        field.as_known().map(|items| {
            let mut items = items.clone();
            items.sort();
            items.dedup();
            items
        })
    }

    /// A nested object, mapped only when the parent is known.
    pub fn nested<C, P>(field: &Field<C>, map: impl FnOnce(&C) -> P) -> Option<P> {
        field.as_known().map(map)
    }

    /// A list of nested objects, mapped element-wise in order.
    pub fn nested_list<C, P>(field: &Field<Vec<C>>, map: impl FnMut(&C) -> P) -> Option<Vec<P>> {
        field.as_known().map(|items| items.iter().map(map).collect())
    }
}

/// Response payload → state helpers.
pub mod response {
    use super::Field;

    /// A scalar; absent becomes `Null`.
    pub fn field<T: Clone>(value: &Option<T>) -> Field<T> {
        Field::from_option(value.clone())
    }

    /// A list of scalars. Absent becomes `Null`, empty stays empty.
    pub fn list<T: Clone>(value: &Option<Vec<T>>) -> Field<Vec<T>> {
        Field::from_option(value.clone())
    }

    /// A nested object; absent becomes `Null`.
    pub fn nested<P, S>(value: &Option<P>, map: impl FnOnce(&P) -> S) -> Field<S> {
        Field::from_option(value.as_ref().map(map))
    }

    /// A list of nested objects, one state element per payload element.
    pub fn nested_list<P, S>(value: &Option<Vec<P>>, map: impl FnMut(&P) -> S) -> Field<Vec<S>> {
        Field::from_option(value.as_ref().map(|items| items.iter().map(map).collect()))
    }

    /// A homogeneous array response mapped with [`super::FromPayload`].
    pub fn items<S: super::FromPayload>(payloads: &[S::Payload]) -> Vec<S> {
        payloads.iter().map(S::from_payload).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, Default, PartialEq, Deserialize)]
    struct RangePayload {
        start: Option<String>,
        end: Option<String>,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct RangeState {
        start: Field<String>,
        end: Field<String>,
    }

    impl FromPayload for RangeState {
        type Payload = RangePayload;

        fn from_payload(p: &RangePayload) -> Self {
            Self {
                start: response::field(&p.start),
                end: response::field(&p.end),
            }
        }
    }

    #[test]
    fn test_request_string_policies() {
        assert_eq!(request::string(&Field::Null), "");
        assert_eq!(request::string(&Field::Unknown), "");
        assert_eq!(request::string(&Field::from("Branch")), "Branch");

        assert_eq!(request::opt_string(&Field::Null), None);
        assert_eq!(request::opt_string(&Field::Unknown), None);
        assert_eq!(request::opt_string(&Field::from("x")), Some("x".to_string()));
    }

    #[test]
    fn test_request_scalars_are_omitted_not_zeroed() {
        assert_eq!(request::opt::<i64>(&Field::Null), None);
        assert_eq!(request::opt::<bool>(&Field::Unknown), None);
        assert_eq!(request::opt(&Field::Known(false)), Some(false));
        assert_eq!(request::opt(&Field::Known(0i64)), Some(0));
    }

    #[test]
    fn test_request_list_keeps_order_and_set_dedups() {
        let tags = Field::Known(vec!["b".to_string(), "a".to_string(), "b".to_string()]);
        assert_eq!(
            request::list(&tags),
            Some(vec!["b".to_string(), "a".to_string(), "b".to_string()])
        );

        let set = request::set(&tags).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&"a".to_string()));
    }

    #[test]
    fn test_request_nested_omitted_when_parent_unset() {
        let parent: Field<RangeState> = Field::Null;
        assert_eq!(request::nested(&parent, |r| request::string(&r.start)), None);

        let parent = Field::Known(RangeState {
            start: Field::from("10.0.0.2"),
            end: Field::Null,
        });
        assert_eq!(
            request::nested(&parent, |r| (request::string(&r.start), request::string(&r.end))),
            Some(("10.0.0.2".to_string(), String::new()))
        );
    }

    #[test]
    fn test_response_absent_becomes_null() {
        let state = RangeState::from_payload(&RangePayload::default());
        assert!(state.start.is_null());
        assert!(state.end.is_null());
    }

    #[test]
    fn test_response_empty_list_stays_empty() {
        let empty: Option<Vec<String>> = Some(vec![]);
        assert_eq!(response::list(&empty), Field::Known(vec![]));
        assert_eq!(response::list::<String>(&None), Field::Null);
    }

    #[test]
    fn test_response_items() {
        let payloads = vec![
            RangePayload {
                start: Some("a".to_string()),
                end: None,
            },
            RangePayload::default(),
        ];
        let states: Vec<RangeState> = response::items(&payloads);
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].start, Field::from("a"));
        assert!(states[1].start.is_null());
    }

    proptest! {
        #[test]
        fn prop_nested_list_preserves_length(
            ranges in prop::collection::vec(
                (proptest::option::of("[0-9.]{1,15}"), proptest::option::of("[0-9.]{1,15}")),
                0..40,
            ),
        ) {
            let payloads: Vec<RangePayload> = ranges
                .into_iter()
                .map(|(start, end)| RangePayload { start, end })
                .collect();
            let expected = payloads.len();
            let mapped = response::nested_list(&Some(payloads), RangeState::from_payload);
            prop_assert_eq!(mapped.into_known().map(|v| v.len()), Some(expected));
        }

        #[test]
        fn prop_null_or_unknown_never_reaches_the_wire(unknown in any::<bool>()) {
            let field: Field<String> = if unknown { Field::Unknown } else { Field::Null };
            prop_assert_eq!(request::string(&field), "");
            prop_assert_eq!(request::opt_string(&field), None);
            let number: Field<i64> = if unknown { Field::Unknown } else { Field::Null };
            prop_assert_eq!(request::opt(&number), None);
        }
    }
}
