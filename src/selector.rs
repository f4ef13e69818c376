//! Method selection for data sources backed by several API operations.
//!
//! A data source like `meraki_devices` can be served by "get one device by
//! serial" or by "list an organization's devices". Each candidate operation
//! contributes a presence vector: one boolean per parameter relevant to it,
//! `true` when the user supplied that parameter. The first vector with any
//! `true` entry wins, in declaration order. There is no specificity ranking,
//! so a definition must declare its most specific operation first.

use crate::error::ProviderError;
use crate::value::Field;

/// Returns `true` when the user supplied a concrete value.
///
/// Null and unknown values do not count as supplied.
pub fn presence<T>(field: &Field<T>) -> bool {
    field.is_known()
}

/// Pick the first presence vector containing at least one `true`.
///
/// Returns the 1-based position of the winning vector, or `None` when every
/// vector is entirely `false`.
///
/// ```
/// use meraki_provider::selector::select_method;
///
/// assert_eq!(select_method(&[vec![false], vec![true, false]]), Some(2));
/// assert_eq!(select_method(&[vec![true], vec![true, true]]), Some(1));
/// assert_eq!(select_method(&[vec![false], vec![false, false]]), None);
/// ```
pub fn select_method(vectors: &[Vec<bool>]) -> Option<usize> {
    vectors
        .iter()
        .position(|v| v.iter().any(|&present| present))
        .map(|i| i + 1)
}

/// Like [`select_method`], but a miss is an error naming what could be set.
///
/// `parameters[i]` lists the parameter names behind `vectors[i]` and is only
/// used for the error message.
pub fn require_method(
    data_source: &str,
    vectors: &[Vec<bool>],
    parameters: &[&[&str]],
) -> Result<usize, ProviderError> {
    select_method(vectors).ok_or_else(|| ProviderError::InsufficientParameters {
        data_source: data_source.to_string(),
        candidates: describe_candidates(parameters),
    })
}

fn describe_candidates(parameters: &[&[&str]]) -> String {
    parameters
        .iter()
        .map(|group| format!("[{}]", group.join(", ")))
        .collect::<Vec<_>>()
        .join(" or ")
}
