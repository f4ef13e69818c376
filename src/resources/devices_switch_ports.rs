//! `meraki_devices_switch_ports` data source.

use serde::{Deserialize, Serialize};

use super::{object, required, string_list};
use crate::client::{DashboardClient, SwitchPort};
use crate::dispatch::DataSourceDefinition;
use crate::error::ProviderError;
use crate::mapping::{response, FromPayload};
use crate::schema::{Attribute, AttributeType, Schema};
use crate::selector::presence;
use crate::value::Field;

/// Configuration and result of `meraki_devices_switch_ports`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwitchPortsConfig {
    #[serde(default)]
    pub serial: Field<String>,
    #[serde(default)]
    pub port_id: Field<String>,
    #[serde(default)]
    pub item: Field<SwitchPortState>,
    #[serde(default)]
    pub items: Field<Vec<SwitchPortState>>,
}

/// One switch port in state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwitchPortState {
    #[serde(default)]
    pub port_id: Field<String>,
    #[serde(default)]
    pub name: Field<String>,
    #[serde(default)]
    pub tags: Field<Vec<String>>,
    #[serde(default)]
    pub enabled: Field<bool>,
    #[serde(default)]
    pub poe_enabled: Field<bool>,
    #[serde(default, rename = "type")]
    pub port_type: Field<String>,
    #[serde(default)]
    pub vlan: Field<i64>,
    #[serde(default)]
    pub voice_vlan: Field<i64>,
    #[serde(default)]
    pub allowed_vlans: Field<String>,
    #[serde(default)]
    pub isolation_enabled: Field<bool>,
    #[serde(default)]
    pub rstp_enabled: Field<bool>,
    #[serde(default)]
    pub stp_guard: Field<String>,
    #[serde(default)]
    pub link_negotiation: Field<String>,
    #[serde(default)]
    pub access_policy_type: Field<String>,
    #[serde(default)]
    pub sticky_mac_allow_list: Field<Vec<String>>,
}

impl FromPayload for SwitchPortState {
    type Payload = SwitchPort;

    fn from_payload(port: &SwitchPort) -> Self {
        Self {
            port_id: response::field(&port.port_id),
            name: response::field(&port.name),
            tags: response::list(&port.tags),
            enabled: response::field(&port.enabled),
            poe_enabled: response::field(&port.poe_enabled),
            port_type: response::field(&port.port_type),
            vlan: response::field(&port.vlan),
            voice_vlan: response::field(&port.voice_vlan),
            allowed_vlans: response::field(&port.allowed_vlans),
            isolation_enabled: response::field(&port.isolation_enabled),
            rstp_enabled: response::field(&port.rstp_enabled),
            stp_guard: response::field(&port.stp_guard),
            link_negotiation: response::field(&port.link_negotiation),
            access_policy_type: response::field(&port.access_policy_type),
            sticky_mac_allow_list: response::list(&port.sticky_mac_allow_list),
        }
    }
}

fn switch_port_type() -> AttributeType {
    object(&[
        ("port_id", AttributeType::String),
        ("name", AttributeType::String),
        ("tags", string_list()),
        ("enabled", AttributeType::Bool),
        ("poe_enabled", AttributeType::Bool),
        ("type", AttributeType::String),
        ("vlan", AttributeType::Int64),
        ("voice_vlan", AttributeType::Int64),
        ("allowed_vlans", AttributeType::String),
        ("isolation_enabled", AttributeType::Bool),
        ("rstp_enabled", AttributeType::Bool),
        ("stp_guard", AttributeType::String),
        ("link_negotiation", AttributeType::String),
        ("access_policy_type", AttributeType::String),
        ("sticky_mac_allow_list", string_list()),
    ])
}

/// Reads one port of a switch, or all of them.
pub struct SwitchPortsDataSource;

#[async_trait::async_trait]
impl DataSourceDefinition for SwitchPortsDataSource {
    const TYPE_NAME: &'static str = "meraki_devices_switch_ports";

    type Config = SwitchPortsConfig;

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("Ports of a switch.")
            .with_attribute("serial", Attribute::required_string())
            .with_attribute("port_id", Attribute::optional_string())
            .with_attribute("item", Attribute::computed(switch_port_type()))
            .with_attribute("items", Attribute::computed(AttributeType::list(switch_port_type())))
    }

    fn methods(&self, config: &SwitchPortsConfig) -> Vec<Vec<bool>> {
        vec![vec![presence(&config.port_id)], vec![presence(&config.serial)]]
    }

    fn parameters(&self) -> &'static [&'static [&'static str]] {
        &[&["port_id"], &["serial"]]
    }

    async fn fetch(
        &self,
        client: &DashboardClient,
        mut config: SwitchPortsConfig,
        method: usize,
    ) -> Result<SwitchPortsConfig, ProviderError> {
        let serial = required(&config.serial, "serial")?;
        if method == 1 {
            let port_id = required(&config.port_id, "port_id")?;
            let response = client.switch().get_device_switch_port(serial, port_id).await?;
            config.item = Field::Known(SwitchPortState::from_payload(&response.body));
            config.items = Field::Null;
        } else {
            let response = client.switch().get_device_switch_ports(serial).await?;
            config.items = Field::Known(response::items(&response.body));
            config.item = Field::Null;
        }
        Ok(config)
    }
}
