//! Endpoint definitions.
//!
//! Each module pairs a configuration/state struct with the payload mapping
//! and operation selection for one dashboard endpoint family. Everything else
//! is handled by [`crate::dispatch`].

// State fields mirror the attribute names in each schema.
#[allow(missing_docs)]
mod devices;
#[allow(missing_docs)]
mod devices_blink_leds;
#[allow(missing_docs)]
mod devices_cellular_gateway_lan;
#[allow(missing_docs)]
mod devices_switch_ports;
#[allow(missing_docs)]
mod networks;
#[allow(missing_docs)]
mod networks_appliance_vlans;
#[allow(missing_docs)]
mod organizations;

pub use devices::{DeviceState, DevicesDataSource, DevicesDataSourceConfig, DevicesResource};
pub use devices_blink_leds::{BlinkLedsParameters, BlinkLedsResource, BlinkLedsState};
pub use devices_cellular_gateway_lan::{CellularGatewayLanConfig, CellularGatewayLanDataSource, CellularGatewayLanState};
pub use devices_switch_ports::{SwitchPortState, SwitchPortsConfig, SwitchPortsDataSource};
pub use networks::{NetworkState, NetworksDataSource, NetworksDataSourceConfig, NetworksResource};
pub use networks_appliance_vlans::{ReservedIpRangeState, VlanIpv6State, VlanResource, VlanState};
pub use organizations::{OrganizationState, OrganizationsConfig, OrganizationsDataSource};

use std::collections::BTreeMap;

use crate::dispatch::{DataSource, Resource};
use crate::error::ProviderError;
use crate::pagination::PageRequest;
use crate::schema::AttributeType;
use crate::value::Field;

/// Every data source this provider serves.
pub fn data_sources() -> Vec<Box<dyn DataSource>> {
    vec![
        Box::new(OrganizationsDataSource),
        Box::new(NetworksDataSource),
        Box::new(DevicesDataSource),
        Box::new(SwitchPortsDataSource),
        Box::new(CellularGatewayLanDataSource),
    ]
}

/// Every resource this provider manages.
pub fn resources() -> Vec<Box<dyn Resource>> {
    vec![
        Box::new(NetworksResource),
        Box::new(DevicesResource),
        Box::new(BlinkLedsResource),
        Box::new(VlanResource),
    ]
}

/// A path parameter that must be known before the call can be made.
pub(crate) fn required<'a>(field: &'a Field<String>, name: &str) -> Result<&'a str, ProviderError> {
    field
        .as_known()
        .map(String::as_str)
        .ok_or_else(|| ProviderError::Validation(format!("{} must be set", name)))
}

/// Page walk from a data source's `per_page`/`starting_after`/`ending_before`.
pub(crate) fn page_request(
    per_page: &Field<i64>,
    starting_after: &Field<String>,
    ending_before: &Field<String>,
) -> PageRequest {
    PageRequest {
        per_page: per_page
            .as_known()
            .and_then(|n| usize::try_from(*n).ok())
            .filter(|n| *n > 0),
        starting_after: starting_after.as_known().cloned(),
        ending_before: ending_before.as_known().cloned(),
        ..PageRequest::default()
    }
}

/// Object type from `(name, type)` pairs.
pub(crate) fn object(attributes: &[(&str, AttributeType)]) -> AttributeType {
    AttributeType::Object(
        attributes
            .iter()
            .map(|(name, ty)| (name.to_string(), ty.clone()))
            .collect::<BTreeMap<_, _>>(),
    )
}

fn string_list() -> AttributeType {
    AttributeType::list(AttributeType::String)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_names_are_unique() {
        let mut names: Vec<&str> = data_sources().iter().map(|d| d.type_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), data_sources().len());

        let mut names: Vec<&str> = resources().iter().map(|r| r.type_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), resources().len());
    }

    #[test]
    fn test_required() {
        assert_eq!(required(&Field::from("N_1"), "network_id").unwrap(), "N_1");
        let err = required(&Field::Unknown, "network_id").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: network_id must be set");
    }

    #[test]
    fn test_page_request() {
        let request = page_request(&Field::Known(50), &Field::from("N_9"), &Field::Null);
        assert_eq!(request.per_page, Some(50));
        assert_eq!(request.starting_after.as_deref(), Some("N_9"));
        assert!(request.ending_before.is_none());
        assert!(request.total_pages.is_none());

        assert_eq!(page_request(&Field::Known(-1), &Field::Null, &Field::Null).per_page, None);
    }
}
