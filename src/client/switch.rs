use serde::{Deserialize, Serialize};

use super::{ApiResponse, DashboardClient, QueryParams};
use crate::error::ProviderError;

/// A switch port as returned by the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchPort {
    #[serde(default)]
    pub port_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub poe_enabled: Option<bool>,
    #[serde(default, rename = "type")]
    pub port_type: Option<String>,
    #[serde(default)]
    pub vlan: Option<i64>,
    #[serde(default)]
    pub voice_vlan: Option<i64>,
    #[serde(default)]
    pub allowed_vlans: Option<String>,
    #[serde(default)]
    pub isolation_enabled: Option<bool>,
    #[serde(default)]
    pub rstp_enabled: Option<bool>,
    #[serde(default)]
    pub stp_guard: Option<String>,
    #[serde(default)]
    pub link_negotiation: Option<String>,
    #[serde(default)]
    pub access_policy_type: Option<String>,
    #[serde(default)]
    pub sticky_mac_allow_list: Option<Vec<String>>,
}

/// Switch operations under `/devices/{serial}/switch`.
pub struct Switch<'a> {
    client: &'a DashboardClient,
}

impl<'a> Switch<'a> {
    pub(super) fn new(client: &'a DashboardClient) -> Self {
        Self { client }
    }

    /// `GET /devices/{serial}/switch/ports`
    pub async fn get_device_switch_ports(
        &self,
        serial: &str,
    ) -> Result<ApiResponse<Vec<SwitchPort>>, ProviderError> {
        self.client
            .get(&["devices", serial, "switch", "ports"], &QueryParams::new())
            .await
    }

    /// `GET /devices/{serial}/switch/ports/{portId}`
    pub async fn get_device_switch_port(
        &self,
        serial: &str,
        port_id: &str,
    ) -> Result<ApiResponse<SwitchPort>, ProviderError> {
        self.client
            .get(&["devices", serial, "switch", "ports", port_id], &QueryParams::new())
            .await
    }
}
