//! Reconciling freshly fetched state with prior plan or state.
//!
//! The dashboard does not echo every attribute a user configures: write-only
//! knobs such as `copy_from_network_id` never come back, and path parameters
//! like `network_id` are not part of most response bodies. Writing the mapped
//! response straight into state would drop them and produce a permanent diff.
//!
//! Two policies cover every resource:
//!
//! - [`MergePolicy::PostWrite`] after create/update: every attribute prefers
//!   the fresh value and falls back to the planned one.
//! - [`MergePolicy::Refresh`] on read: kept attributes (path identifiers and
//!   write-only knobs) prefer the prior value; everything else prefers fresh.
//!
//! [`impl_merge!`](crate::impl_merge) generates the per-type [`Merge`] impl
//! from a field list, so the struct literal it expands to fails to compile if
//! a field is forgotten.

use crate::value::Field;

/// Which side wins when both the prior and fresh values are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Merge after a write: fresh values win.
    PostWrite,
    /// Merge during refresh: kept attributes retain their prior value.
    Refresh,
}

/// Merge a prior value (`self`) with a freshly mapped one.
pub trait Merge: Sized {
    /// Produce the state to persist.
    fn merge(self, fresh: Self, policy: MergePolicy) -> Self;
}

/// Fresh if known, else prior if known, else `Null`.
pub fn prefer_fresh<T>(prior: Field<T>, fresh: Field<T>) -> Field<T> {
    fresh.or(prior).settle()
}

/// Prior if known, else fresh if known, else `Null`.
pub fn prefer_old<T>(prior: Field<T>, fresh: Field<T>) -> Field<T> {
    prior.or(fresh).settle()
}

/// Merge a kept attribute under `policy`.
pub fn merge_kept<T>(prior: Field<T>, fresh: Field<T>, policy: MergePolicy) -> Field<T> {
    match policy {
        MergePolicy::PostWrite => prefer_fresh(prior, fresh),
        MergePolicy::Refresh => prefer_old(prior, fresh),
    }
}

/// Implement [`Merge`] for a state struct whose fields are all [`Field`]s.
///
/// ```
/// use meraki_provider::impl_merge;
/// use meraki_provider::merge::{Merge, MergePolicy};
/// use meraki_provider::value::Field;
///
/// struct VlanState {
///     network_id: Field<String>,
///     name: Field<String>,
/// }
///
/// impl_merge!(VlanState {
///     keep: [network_id],
///     fields: [name],
/// });
///
/// let prior = VlanState { network_id: "N_1".into(), name: "old".into() };
/// let fresh = VlanState { network_id: Field::Null, name: "new".into() };
/// let merged = prior.merge(fresh, MergePolicy::Refresh);
/// assert_eq!(merged.network_id, Field::from("N_1"));
/// assert_eq!(merged.name, Field::from("new"));
/// ```
#[macro_export]
macro_rules! impl_merge {
    ($ty:ident { keep: [$($keep:ident),* $(,)?], fields: [$($field:ident),* $(,)?] $(,)? }) => {
        impl $crate::merge::Merge for $ty {
            fn merge(self, fresh: Self, policy: $crate::merge::MergePolicy) -> Self {
                #[allow(unused_variables)]
                let policy = policy;
                Self {
                    $($keep: $crate::merge::merge_kept(self.$keep, fresh.$keep, policy),)*
                    $($field: $crate::merge::prefer_fresh(self.$field, fresh.$field),)*
                }
            }
        }
    };
}
