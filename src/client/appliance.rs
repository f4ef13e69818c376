use serde::{Deserialize, Serialize};

use super::{ApiResponse, DashboardClient, QueryParams};
use crate::error::ProviderError;

/// An appliance VLAN as returned by the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vlan {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub interface_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub subnet: Option<String>,
    #[serde(default)]
    pub appliance_ip: Option<String>,
    #[serde(default)]
    pub group_policy_id: Option<String>,
    #[serde(default)]
    pub template_vlan_type: Option<String>,
    #[serde(default)]
    pub cidr: Option<String>,
    #[serde(default)]
    pub mask: Option<i64>,
    #[serde(default)]
    pub vpn_nat_subnet: Option<String>,
    #[serde(default)]
    pub dhcp_handling: Option<String>,
    #[serde(default)]
    pub dhcp_lease_time: Option<String>,
    #[serde(default)]
    pub dhcp_boot_options_enabled: Option<bool>,
    #[serde(default)]
    pub dhcp_relay_server_ips: Option<Vec<String>>,
    #[serde(default)]
    pub dns_nameservers: Option<String>,
    #[serde(default)]
    pub reserved_ip_ranges: Option<Vec<ReservedIpRange>>,
    #[serde(default)]
    pub ipv6: Option<VlanIpv6>,
}

/// A reserved range inside a VLAN or LAN subnet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReservedIpRange {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VlanIpv6 {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub prefix_assignments: Option<Vec<VlanIpv6PrefixAssignment>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VlanIpv6PrefixAssignment {
    #[serde(default)]
    pub autonomous: Option<bool>,
    #[serde(default)]
    pub static_prefix: Option<String>,
    #[serde(default)]
    pub static_appliance_ip6: Option<String>,
}

/// Reserved range in a request; every key is always sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReservedIpRangeRequest {
    pub start: String,
    pub end: String,
    pub comment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VlanIpv6Request {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// Body of `POST /networks/{networkId}/appliance/vlans`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVlanRequest {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appliance_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_policy_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_vlan_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<VlanIpv6Request>,
}

/// Body of `PUT /networks/{networkId}/appliance/vlans/{vlanId}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVlanRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appliance_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_policy_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_vlan_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpn_nat_subnet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp_handling: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp_lease_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp_boot_options_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp_relay_server_ips: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_nameservers: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_ip_ranges: Option<Vec<ReservedIpRangeRequest>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<VlanIpv6Request>,
}

impl UpdateVlanRequest {
    /// Returns `true` when the body carries a setting the create call cannot.
    pub fn has_update_only_settings(&self) -> bool {
        self.vpn_nat_subnet.is_some()
            || self.dhcp_handling.is_some()
            || self.dhcp_lease_time.is_some()
            || self.dhcp_boot_options_enabled.is_some()
            || self.dhcp_relay_server_ips.is_some()
            || self.dns_nameservers.is_some()
            || self.reserved_ip_ranges.is_some()
    }
}

/// Appliance operations under `/networks/{networkId}/appliance`.
pub struct Appliance<'a> {
    client: &'a DashboardClient,
}

impl<'a> Appliance<'a> {
    pub(super) fn new(client: &'a DashboardClient) -> Self {
        Self { client }
    }

    /// `GET /networks/{networkId}/appliance/vlans/{vlanId}`
    pub async fn get_network_appliance_vlan(
        &self,
        network_id: &str,
        vlan_id: &str,
    ) -> Result<ApiResponse<Vlan>, ProviderError> {
        self.client
            .get(&["networks", network_id, "appliance", "vlans", vlan_id], &QueryParams::new())
            .await
    }

    /// `POST /networks/{networkId}/appliance/vlans`
    pub async fn create_network_appliance_vlan(
        &self,
        network_id: &str,
        body: &CreateVlanRequest,
    ) -> Result<ApiResponse<Vlan>, ProviderError> {
        self.client
            .post(&["networks", network_id, "appliance", "vlans"], body)
            .await
    }

    /// `PUT /networks/{networkId}/appliance/vlans/{vlanId}`
    pub async fn update_network_appliance_vlan(
        &self,
        network_id: &str,
        vlan_id: &str,
        body: &UpdateVlanRequest,
    ) -> Result<ApiResponse<Vlan>, ProviderError> {
        self.client
            .put(&["networks", network_id, "appliance", "vlans", vlan_id], body)
            .await
    }

    /// `DELETE /networks/{networkId}/appliance/vlans/{vlanId}`
    pub async fn delete_network_appliance_vlan(
        &self,
        network_id: &str,
        vlan_id: &str,
    ) -> Result<ApiResponse<()>, ProviderError> {
        self.client
            .delete(&["networks", network_id, "appliance", "vlans", vlan_id])
            .await
    }
}
