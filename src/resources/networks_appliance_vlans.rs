//! `meraki_networks_appliance_vlans` resource.
//!
//! The create call only accepts addressing and IPv6 settings. DHCP and
//! reserved ranges are applied with a follow-up update when the plan sets
//! them.

use serde::{Deserialize, Serialize};

use super::{object, required, string_list};
use crate::client::{
    CreateVlanRequest, DashboardClient, ReservedIpRange, ReservedIpRangeRequest, UpdateVlanRequest, Vlan, VlanIpv6,
    VlanIpv6Request,
};
use crate::dispatch::{Deletion, ResourceDefinition};
use crate::error::ProviderError;
use crate::impl_merge;
use crate::mapping::{request, response, FromPayload, ToPayload};
use crate::schema::{Attribute, AttributeFlags, AttributeType, Block, NestedBlock, Schema};
use crate::value::Field;

const DHCP_HANDLING: [&str; 3] = [
    "Do not respond to DHCP requests",
    "Relay DHCP to another server",
    "Run a DHCP server",
];

const DHCP_LEASE_TIMES: [&str; 6] = ["30 minutes", "1 hour", "4 hours", "12 hours", "1 day", "1 week"];

/// An appliance VLAN in state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VlanState {
    #[serde(default)]
    pub network_id: Field<String>,
    #[serde(default)]
    pub vlan_id: Field<String>,
    #[serde(default)]
    pub interface_id: Field<String>,
    #[serde(default)]
    pub name: Field<String>,
    #[serde(default)]
    pub subnet: Field<String>,
    #[serde(default)]
    pub appliance_ip: Field<String>,
    #[serde(default)]
    pub group_policy_id: Field<String>,
    #[serde(default)]
    pub template_vlan_type: Field<String>,
    #[serde(default)]
    pub cidr: Field<String>,
    #[serde(default)]
    pub mask: Field<i64>,
    #[serde(default)]
    pub vpn_nat_subnet: Field<String>,
    #[serde(default)]
    pub dhcp_handling: Field<String>,
    #[serde(default)]
    pub dhcp_lease_time: Field<String>,
    #[serde(default)]
    pub dhcp_boot_options_enabled: Field<bool>,
    #[serde(default)]
    pub dhcp_relay_server_ips: Field<Vec<String>>,
    #[serde(default)]
    pub dns_nameservers: Field<String>,
    #[serde(default)]
    pub reserved_ip_ranges: Field<Vec<ReservedIpRangeState>>,
    #[serde(default)]
    pub ipv6: Field<VlanIpv6State>,
}

/// One reserved range; all three keys are required by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReservedIpRangeState {
    #[serde(default)]
    pub start: Field<String>,
    #[serde(default)]
    pub end: Field<String>,
    #[serde(default)]
    pub comment: Field<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VlanIpv6State {
    #[serde(default)]
    pub enabled: Field<bool>,
}

impl_merge!(VlanState {
    keep: [network_id, vlan_id],
    fields: [
        interface_id,
        name,
        subnet,
        appliance_ip,
        group_policy_id,
        template_vlan_type,
        cidr,
        mask,
        vpn_nat_subnet,
        dhcp_handling,
        dhcp_lease_time,
        dhcp_boot_options_enabled,
        dhcp_relay_server_ips,
        dns_nameservers,
        reserved_ip_ranges,
        ipv6,
    ],
});

impl FromPayload for VlanState {
    type Payload = Vlan;

    fn from_payload(vlan: &Vlan) -> Self {
        Self {
            network_id: Field::Null,
            vlan_id: response::field(&vlan.id),
            interface_id: response::field(&vlan.interface_id),
            name: response::field(&vlan.name),
            subnet: response::field(&vlan.subnet),
            appliance_ip: response::field(&vlan.appliance_ip),
            group_policy_id: response::field(&vlan.group_policy_id),
            template_vlan_type: response::field(&vlan.template_vlan_type),
            cidr: response::field(&vlan.cidr),
            mask: response::field(&vlan.mask),
            vpn_nat_subnet: response::field(&vlan.vpn_nat_subnet),
            dhcp_handling: response::field(&vlan.dhcp_handling),
            dhcp_lease_time: response::field(&vlan.dhcp_lease_time),
            dhcp_boot_options_enabled: response::field(&vlan.dhcp_boot_options_enabled),
            dhcp_relay_server_ips: response::list(&vlan.dhcp_relay_server_ips),
            dns_nameservers: response::field(&vlan.dns_nameservers),
            reserved_ip_ranges: response::nested_list(&vlan.reserved_ip_ranges, reserved_range),
            ipv6: response::nested(&vlan.ipv6, ipv6),
        }
    }
}

fn reserved_range(range: &ReservedIpRange) -> ReservedIpRangeState {
    ReservedIpRangeState {
        start: response::field(&range.start),
        end: response::field(&range.end),
        comment: response::field(&range.comment),
    }
}

fn ipv6(ipv6: &VlanIpv6) -> VlanIpv6State {
    VlanIpv6State {
        enabled: response::field(&ipv6.enabled),
    }
}

fn ipv6_request(state: &VlanIpv6State) -> VlanIpv6Request {
    VlanIpv6Request {
        enabled: request::opt(&state.enabled),
    }
}

impl ToPayload for VlanState {
    type Payload = UpdateVlanRequest;

    fn to_payload(&self) -> UpdateVlanRequest {
        UpdateVlanRequest {
            name: request::opt_string(&self.name),
            subnet: request::opt_string(&self.subnet),
            appliance_ip: request::opt_string(&self.appliance_ip),
            group_policy_id: request::opt_string(&self.group_policy_id),
            template_vlan_type: request::opt_string(&self.template_vlan_type),
            cidr: request::opt_string(&self.cidr),
            mask: request::opt(&self.mask),
            vpn_nat_subnet: request::opt_string(&self.vpn_nat_subnet),
            dhcp_handling: request::opt_string(&self.dhcp_handling),
            dhcp_lease_time: request::opt_string(&self.dhcp_lease_time),
            dhcp_boot_options_enabled: request::opt(&self.dhcp_boot_options_enabled),
            dhcp_relay_server_ips: request::set(&self.dhcp_relay_server_ips),
            dns_nameservers: request::opt_string(&self.dns_nameservers),
            reserved_ip_ranges: request::nested_list(&self.reserved_ip_ranges, |range| ReservedIpRangeRequest {
                start: request::string(&range.start),
                end: request::string(&range.end),
                comment: request::string(&range.comment),
            }),
            ipv6: request::nested(&self.ipv6, ipv6_request),
        }
    }
}

impl VlanState {
    fn create_payload(&self, vlan_id: &str) -> CreateVlanRequest {
        CreateVlanRequest {
            id: vlan_id.to_string(),
            name: request::string(&self.name),
            subnet: request::opt_string(&self.subnet),
            appliance_ip: request::opt_string(&self.appliance_ip),
            group_policy_id: request::opt_string(&self.group_policy_id),
            template_vlan_type: request::opt_string(&self.template_vlan_type),
            cidr: request::opt_string(&self.cidr),
            mask: request::opt(&self.mask),
            ipv6: request::nested(&self.ipv6, ipv6_request),
        }
    }
}

/// Manages a VLAN on a network's security appliance.
pub struct VlanResource;

#[async_trait::async_trait]
impl ResourceDefinition for VlanResource {
    const TYPE_NAME: &'static str = "meraki_networks_appliance_vlans";

    type State = VlanState;

    fn schema(&self) -> Schema {
        let reserved_range = Block::new()
            .with_attribute("start", Attribute::required_string())
            .with_attribute("end", Attribute::required_string())
            .with_attribute("comment", Attribute::required_string());
        let ipv6 = Block::new().with_attribute("enabled", Attribute::optional_bool());

        Schema::v0()
            .with_description("A VLAN on a network's appliance.")
            .with_attribute("network_id", Attribute::required_string().with_force_new())
            .with_attribute("vlan_id", Attribute::required_string().with_force_new())
            .with_attribute("interface_id", Attribute::computed_string())
            .with_attribute("name", Attribute::required_string())
            .with_attribute("subnet", Attribute::optional_computed_string())
            .with_attribute("appliance_ip", Attribute::optional_computed_string())
            .with_attribute("group_policy_id", Attribute::optional_computed_string())
            .with_attribute(
                "template_vlan_type",
                Attribute::optional_computed_string().one_of(["same", "unique"]),
            )
            .with_attribute("cidr", Attribute::optional_computed_string())
            .with_attribute(
                "mask",
                Attribute::new(AttributeType::Int64, AttributeFlags::optional_computed()).between(1, 32),
            )
            .with_attribute("vpn_nat_subnet", Attribute::optional_computed_string())
            .with_attribute(
                "dhcp_handling",
                Attribute::optional_computed_string().one_of(DHCP_HANDLING),
            )
            .with_attribute(
                "dhcp_lease_time",
                Attribute::optional_computed_string().one_of(DHCP_LEASE_TIMES),
            )
            .with_attribute(
                "dhcp_boot_options_enabled",
                Attribute::new(AttributeType::Bool, AttributeFlags::optional_computed()),
            )
            .with_attribute(
                "dhcp_relay_server_ips",
                Attribute::new(AttributeType::set(AttributeType::String), AttributeFlags::optional_computed()),
            )
            .with_attribute("dns_nameservers", Attribute::optional_computed_string())
            .with_block("reserved_ip_ranges", NestedBlock::list(reserved_range).with_computed())
            .with_block("ipv6", NestedBlock::single(ipv6).with_computed())
    }

    async fn create(&self, client: &DashboardClient, plan: &VlanState) -> Result<VlanState, ProviderError> {
        let network_id = required(&plan.network_id, "network_id")?;
        let vlan_id = required(&plan.vlan_id, "vlan_id")?;
        let appliance = client.appliance();

        let created = appliance
            .create_network_appliance_vlan(network_id, &plan.create_payload(vlan_id))
            .await?;

        let update = plan.to_payload();
        if !update.has_update_only_settings() {
            return Ok(VlanState::from_payload(&created.body));
        }
        let response = appliance
            .update_network_appliance_vlan(network_id, vlan_id, &update)
            .await?;
        Ok(VlanState::from_payload(&response.body))
    }

    async fn read(&self, client: &DashboardClient, state: &VlanState) -> Result<VlanState, ProviderError> {
        let network_id = required(&state.network_id, "network_id")?;
        let vlan_id = required(&state.vlan_id, "vlan_id")?;
        let response = client
            .appliance()
            .get_network_appliance_vlan(network_id, vlan_id)
            .await?;
        Ok(VlanState::from_payload(&response.body))
    }

    async fn update(
        &self,
        client: &DashboardClient,
        prior: &VlanState,
        plan: &VlanState,
    ) -> Result<VlanState, ProviderError> {
        let network_id = required(&prior.network_id, "network_id")?;
        let vlan_id = required(&prior.vlan_id, "vlan_id")?;
        let response = client
            .appliance()
            .update_network_appliance_vlan(network_id, vlan_id, &plan.to_payload())
            .await?;
        Ok(VlanState::from_payload(&response.body))
    }

    async fn delete(&self, client: &DashboardClient, state: &VlanState) -> Result<Deletion, ProviderError> {
        let network_id = required(&state.network_id, "network_id")?;
        let vlan_id = required(&state.vlan_id, "vlan_id")?;
        client
            .appliance()
            .delete_network_appliance_vlan(network_id, vlan_id)
            .await?;
        Ok(Deletion::Remote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::{Merge, MergePolicy};
    use serde_json::json;

    fn plan() -> VlanState {
        VlanState {
            network_id: Field::from("L_123"),
            vlan_id: Field::from("1234"),
            name: Field::from("My VLAN"),
            subnet: Field::from("192.168.1.0/24"),
            appliance_ip: Field::from("192.168.1.2"),
            interface_id: Field::Unknown,
            ..Default::default()
        }
    }

    #[test]
    fn test_create_payload_carries_only_create_settings() {
        let body = serde_json::to_value(plan().create_payload("1234")).unwrap();
        assert_eq!(
            body,
            json!({
                "id": "1234",
                "name": "My VLAN",
                "subnet": "192.168.1.0/24",
                "applianceIp": "192.168.1.2"
            })
        );
        assert!(!plan().to_payload().has_update_only_settings());
    }

    #[test]
    fn test_reserved_ranges_are_update_only_and_send_every_key() {
        let mut state = plan();
        state.reserved_ip_ranges = Field::Known(vec![ReservedIpRangeState {
            start: Field::from("192.168.1.10"),
            end: Field::from("192.168.1.20"),
            comment: Field::Null,
        }]);
        let update = state.to_payload();

        assert!(update.has_update_only_settings());
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(
            body["reservedIpRanges"],
            json!([{"start": "192.168.1.10", "end": "192.168.1.20", "comment": ""}])
        );
    }

    #[test]
    fn test_relay_servers_are_sent_sorted() {
        let mut state = plan();
        state.dhcp_relay_server_ips = Field::Known(vec!["192.0.2.9".to_string(), "192.0.2.1".to_string()]);
        let body = serde_json::to_value(state.to_payload()).unwrap();
        assert_eq!(body["dhcpRelayServerIps"], json!(["192.0.2.1", "192.0.2.9"]));
    }

    #[test]
    fn test_ipv6_omitted_when_null() {
        let body = serde_json::to_value(plan().to_payload()).unwrap();
        assert!(body.get("ipv6").is_none());

        let mut state = plan();
        state.ipv6 = Field::Known(VlanIpv6State {
            enabled: Field::Known(true),
        });
        let body = serde_json::to_value(state.create_payload("1234")).unwrap();
        assert_eq!(body["ipv6"], json!({"enabled": true}));
    }

    #[test]
    fn test_refresh_keeps_network_id() {
        let vlan: Vlan = serde_json::from_value(json!({
            "id": "1234",
            "interfaceId": "1284392014819",
            "name": "My VLAN",
            "subnet": "192.168.1.0/24",
            "applianceIp": "192.168.1.2",
            "reservedIpRanges": [
                {"start": "192.168.1.10", "end": "192.168.1.20", "comment": "printers"}
            ],
            "ipv6": {"enabled": false, "prefixAssignments": []}
        }))
        .unwrap();
        let fresh = VlanState::from_payload(&vlan);
        assert!(fresh.network_id.is_null());

        let merged = plan().merge(fresh, MergePolicy::Refresh);
        assert_eq!(merged.network_id, Field::from("L_123"));
        assert_eq!(merged.interface_id, Field::from("1284392014819"));
        assert_eq!(merged.reserved_ip_ranges.as_known().map(Vec::len), Some(1));
        assert_eq!(
            merged.ipv6,
            Field::Known(VlanIpv6State {
                enabled: Field::Known(false)
            })
        );
        assert!(merged.dhcp_relay_server_ips.is_null());
    }

    #[test]
    fn test_schema_requires_path_parameters() {
        let schema = ResourceDefinition::schema(&VlanResource);
        assert!(schema.attribute("network_id").unwrap().force_new);
        assert!(schema.attribute("vlan_id").unwrap().force_new);
        assert!(schema.computed_only().contains(&"interface_id"));
    }
}
