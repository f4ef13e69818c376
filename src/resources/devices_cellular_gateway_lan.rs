//! `meraki_devices_cellular_gateway_lan` data source.

use serde::{Deserialize, Serialize};

use super::{object, required};
use crate::client::{CellularGatewayLan, DashboardClient, FixedIpAssignment, ReservedIpRange};
use crate::dispatch::DataSourceDefinition;
use crate::error::ProviderError;
use crate::mapping::{response, FromPayload};
use crate::schema::{Attribute, AttributeType, Schema};
use crate::selector::presence;
use crate::value::Field;

/// Configuration and result of `meraki_devices_cellular_gateway_lan`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellularGatewayLanConfig {
    #[serde(default)]
    pub serial: Field<String>,
    #[serde(default)]
    pub item: Field<CellularGatewayLanState>,
}

/// LAN settings in state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellularGatewayLanState {
    #[serde(default)]
    pub device_name: Field<String>,
    #[serde(default)]
    pub device_lan_ip: Field<String>,
    #[serde(default)]
    pub device_subnet: Field<String>,
    #[serde(default)]
    pub fixed_ip_assignments: Field<Vec<FixedIpAssignmentState>>,
    #[serde(default)]
    pub reserved_ip_ranges: Field<Vec<LanReservedIpRangeState>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixedIpAssignmentState {
    #[serde(default)]
    pub mac: Field<String>,
    #[serde(default)]
    pub name: Field<String>,
    #[serde(default)]
    pub ip: Field<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanReservedIpRangeState {
    #[serde(default)]
    pub start: Field<String>,
    #[serde(default)]
    pub end: Field<String>,
    #[serde(default)]
    pub comment: Field<String>,
}

impl FromPayload for CellularGatewayLanState {
    type Payload = CellularGatewayLan;

    fn from_payload(lan: &CellularGatewayLan) -> Self {
        Self {
            device_name: response::field(&lan.device_name),
            device_lan_ip: response::field(&lan.device_lan_ip),
            device_subnet: response::field(&lan.device_subnet),
            fixed_ip_assignments: response::nested_list(&lan.fixed_ip_assignments, fixed_ip),
            reserved_ip_ranges: response::nested_list(&lan.reserved_ip_ranges, reserved_range),
        }
    }
}

fn fixed_ip(assignment: &FixedIpAssignment) -> FixedIpAssignmentState {
    FixedIpAssignmentState {
        mac: response::field(&assignment.mac),
        name: response::field(&assignment.name),
        ip: response::field(&assignment.ip),
    }
}

fn reserved_range(range: &ReservedIpRange) -> LanReservedIpRangeState {
    LanReservedIpRangeState {
        start: response::field(&range.start),
        end: response::field(&range.end),
        comment: response::field(&range.comment),
    }
}

fn lan_type() -> AttributeType {
    let range = object(&[
        ("start", AttributeType::String),
        ("end", AttributeType::String),
        ("comment", AttributeType::String),
    ]);
    let fixed = object(&[
        ("mac", AttributeType::String),
        ("name", AttributeType::String),
        ("ip", AttributeType::String),
    ]);
    object(&[
        ("device_name", AttributeType::String),
        ("device_lan_ip", AttributeType::String),
        ("device_subnet", AttributeType::String),
        ("fixed_ip_assignments", AttributeType::list(fixed)),
        ("reserved_ip_ranges", AttributeType::list(range)),
    ])
}

/// Reads the LAN settings of a cellular gateway.
pub struct CellularGatewayLanDataSource;

#[async_trait::async_trait]
impl DataSourceDefinition for CellularGatewayLanDataSource {
    const TYPE_NAME: &'static str = "meraki_devices_cellular_gateway_lan";

    type Config = CellularGatewayLanConfig;

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("LAN settings of a cellular gateway.")
            .with_attribute("serial", Attribute::required_string())
            .with_attribute("item", Attribute::computed(lan_type()))
    }

    fn methods(&self, config: &CellularGatewayLanConfig) -> Vec<Vec<bool>> {
        vec![vec![presence(&config.serial)]]
    }

    fn parameters(&self) -> &'static [&'static [&'static str]] {
        &[&["serial"]]
    }

    async fn fetch(
        &self,
        client: &DashboardClient,
        mut config: CellularGatewayLanConfig,
        _method: usize,
    ) -> Result<CellularGatewayLanConfig, ProviderError> {
        let serial = required(&config.serial, "serial")?;
        let response = client
            .cellular_gateway()
            .get_device_cellular_gateway_lan(serial)
            .await?;
        config.item = Field::Known(CellularGatewayLanState::from_payload(&response.body));
        Ok(config)
    }
}
