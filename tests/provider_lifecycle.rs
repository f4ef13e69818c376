//! End-to-end provider tests against a mocked dashboard.

use meraki_provider::testing::{
    assert_has_warnings, assert_plan_creates, assert_plan_no_changes, assert_plan_unknown, assert_removed,
    ProviderTester,
};
use meraki_provider::{MerakiProvider, ProviderError};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn configured(server: &MockServer) -> ProviderTester<MerakiProvider> {
    let tester = ProviderTester::new(MerakiProvider::new());
    tester
        .configure(json!({
            "meraki_dashboard_api_key": "test-key",
            "meraki_base_url": format!("{}/api/v1", server.uri()),
        }))
        .await
        .expect("provider configures");
    tester
}

fn network(name: &str) -> Value {
    json!({
        "id": "N_24329156",
        "organizationId": "2930418",
        "name": name,
        "productTypes": ["appliance", "switch"],
        "timeZone": "America/Los_Angeles",
        "tags": [],
        "url": "https://n1.meraki.com/Main-Office/n/manage/usage/list",
        "isBoundToConfigTemplate": false
    })
}

mod networks {
    use super::*;

    fn config(name: &str) -> Value {
        json!({
            "organization_id": "2930418",
            "name": name,
            "product_types": ["switch", "appliance"],
            "copy_from_network_id": "N_template",
        })
    }

    #[tokio::test]
    async fn test_network_crud() {
        let server = MockServer::start().await;
        let tester = configured(&server).await;

        Mock::given(method("POST"))
            .and(path("/api/v1/organizations/2930418/networks"))
            .and(body_json(json!({
                "name": "Main Office",
                "productTypes": ["appliance", "switch"],
                "copyFromNetworkId": "N_template"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(network("Main Office")))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v1/networks/N_24329156"))
            .respond_with(ResponseTemplate::new(200).set_body_json(network("Main Office")))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        let plan = tester
            .plan_create("meraki_networks", config("Main Office"))
            .await
            .unwrap();
        assert_plan_creates(&plan);
        assert_plan_unknown(&plan, "network_id");

        let created = tester
            .lifecycle_create("meraki_networks", config("Main Office"))
            .await
            .unwrap();
        assert_eq!(created["network_id"], "N_24329156");
        assert_eq!(created["copy_from_network_id"], "N_template");
        assert_eq!(created["time_zone"], "America/Los_Angeles");
        assert_eq!(created["tags"], json!([]));
        assert_eq!(created["notes"], Value::Null);

        Mock::given(method("PUT"))
            .and(path("/api/v1/networks/N_24329156"))
            .and(body_partial_json(json!({"name": "Head Office"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(network("Head Office")))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v1/networks/N_24329156"))
            .respond_with(ResponseTemplate::new(200).set_body_json(network("Head Office")))
            .mount(&server)
            .await;

        let updated = tester
            .lifecycle_update("meraki_networks", created, config("Head Office"))
            .await
            .unwrap();
        assert_eq!(updated["name"], "Head Office");
        assert_eq!(updated["copy_from_network_id"], "N_template");

        Mock::given(method("DELETE"))
            .and(path("/api/v1/networks/N_24329156"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let warnings = tester.lifecycle_delete("meraki_networks", updated).await.unwrap();
        assert!(warnings.is_empty());
    }

    #[tokio::test]
    async fn test_unchanged_config_plans_no_changes() {
        let server = MockServer::start().await;
        let tester = configured(&server).await;

        let mut echoed = network("Main Office");
        echoed["notes"] = json!("Combined network for Long Island Office");
        echoed["enrollmentString"] = json!("my-enrollment-string");

        Mock::given(method("POST"))
            .and(path("/api/v1/organizations/2930418/networks"))
            .respond_with(ResponseTemplate::new(201).set_body_json(echoed.clone()))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v1/networks/N_24329156"))
            .respond_with(ResponseTemplate::new(200).set_body_json(echoed))
            .mount(&server)
            .await;

        let state = tester
            .lifecycle_create("meraki_networks", config("Main Office"))
            .await
            .unwrap();
        assert_eq!(state["notes"], "Combined network for Long Island Office");

        let plan = tester
            .plan_update("meraki_networks", state, config("Main Office"))
            .await
            .unwrap();
        assert_plan_no_changes(&plan);
    }

    #[tokio::test]
    async fn test_read_of_deleted_network_removes_it() {
        let server = MockServer::start().await;
        let tester = configured(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/v1/networks/N_gone"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"errors": ["Not found"]})))
            .mount(&server)
            .await;

        let result = tester
            .read("meraki_networks", json!({"organization_id": "1", "network_id": "N_gone"}))
            .await
            .unwrap();
        assert_removed(&result);
    }

    #[tokio::test]
    async fn test_read_error_other_than_not_found_fails() {
        let server = MockServer::start().await;
        let tester = configured(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/v1/networks/N_1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = tester
            .read("meraki_networks", json!({"network_id": "N_1"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_delete_not_found_is_an_error() {
        let server = MockServer::start().await;
        let tester = configured(&server).await;

        Mock::given(method("DELETE"))
            .and(path("/api/v1/networks/N_1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = tester
            .delete("meraki_networks", json!({"network_id": "N_1"}))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}

mod devices {
    use super::*;

    fn device() -> Value {
        json!({
            "serial": "Q234-ABCD-5678",
            "name": "My AP",
            "mac": "00:11:22:33:44:55",
            "model": "MR34",
            "networkId": "N_24329156",
            "tags": ["recently-added"],
            "lat": 37.4180951010362,
            "lng": -122.098531723022,
            "address": "1600 Pennsylvania Ave"
        })
    }

    #[tokio::test]
    async fn test_create_updates_existing_device_and_delete_is_state_only() {
        let server = MockServer::start().await;
        let tester = configured(&server).await;

        Mock::given(method("PUT"))
            .and(path("/api/v1/devices/Q234-ABCD-5678"))
            .and(body_partial_json(json!({"name": "My AP", "moveMapMarker": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(device()))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let state = tester
            .create(
                "meraki_devices",
                json!({"serial": "Q234-ABCD-5678", "name": "My AP", "move_map_marker": true}),
            )
            .await
            .unwrap();
        assert_eq!(state["model"], "MR34");
        assert_eq!(state["move_map_marker"], true);

        let warnings = tester.delete("meraki_devices", state).await.unwrap();
        assert_has_warnings(&warnings);
    }

    #[tokio::test]
    async fn test_unchanged_config_plans_no_changes() {
        let server = MockServer::start().await;
        let tester = configured(&server).await;

        let mut echoed = device();
        echoed["notes"] = json!("My AP's note");
        echoed["floorPlanId"] = json!("g_2176982374");

        Mock::given(method("PUT"))
            .and(path("/api/v1/devices/Q234-ABCD-5678"))
            .respond_with(ResponseTemplate::new(200).set_body_json(echoed.clone()))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v1/devices/Q234-ABCD-5678"))
            .respond_with(ResponseTemplate::new(200).set_body_json(echoed))
            .mount(&server)
            .await;

        let config = json!({"serial": "Q234-ABCD-5678", "name": "My AP", "move_map_marker": true});
        let state = tester.lifecycle_create("meraki_devices", config.clone()).await.unwrap();
        assert_eq!(state["floor_plan_id"], "g_2176982374");

        let plan = tester.plan_update("meraki_devices", state, config).await.unwrap();
        assert_plan_no_changes(&plan);
    }

    #[tokio::test]
    async fn test_data_source_selects_get_one_by_serial() {
        let server = MockServer::start().await;
        let tester = configured(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/v1/devices/Q234-ABCD-5678"))
            .respond_with(ResponseTemplate::new(200).set_body_json(device()))
            .expect(1)
            .mount(&server)
            .await;

        let result = tester
            .read_data_source(
                "meraki_devices",
                json!({"serial": "Q234-ABCD-5678", "organization_id": "2930418"}),
            )
            .await
            .unwrap();
        assert_eq!(result["item"]["name"], "My AP");
        assert_eq!(result["items"], Value::Null);
    }

    #[tokio::test]
    async fn test_data_source_lists_organization_devices() {
        let server = MockServer::start().await;
        let tester = configured(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/v1/organizations/2930418/devices"))
            .and(query_param("productTypes[]", "wireless"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([device(), device()])))
            .expect(1)
            .mount(&server)
            .await;

        let result = tester
            .read_data_source(
                "meraki_devices",
                json!({"organization_id": "2930418", "product_types": ["wireless"]}),
            )
            .await
            .unwrap();
        assert_eq!(result["items"].as_array().map(Vec::len), Some(2));
    }
}

mod data_sources {
    use super::*;

    #[tokio::test]
    async fn test_insufficient_parameters() {
        let server = MockServer::start().await;
        let tester = configured(&server).await;

        let err = tester.read_data_source("meraki_networks", json!({})).await.unwrap_err();
        assert!(matches!(err, ProviderError::InsufficientParameters { .. }));

        let err = tester
            .read_data_source("meraki_devices_switch_ports", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::InsufficientParameters { .. }));
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn test_organizations_without_parameters_lists_all() {
        let server = MockServer::start().await;
        let tester = configured(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/v1/organizations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "2930418", "name": "My organization", "api": {"enabled": true}},
                {"id": "2930419", "name": "Other", "cloud": {"region": {"name": "North America"}}}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let result = tester.read_data_source("meraki_organizations", json!({})).await.unwrap();
        let items = result["items"].as_array().cloned().unwrap_or_default();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["api_enabled"], true);
        assert_eq!(items[1]["cloud_region_name"], "North America");
        assert_eq!(items[1]["api_enabled"], Value::Null);
    }

    #[tokio::test]
    async fn test_switch_port_by_id() {
        let server = MockServer::start().await;
        let tester = configured(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/v1/devices/Q234-ABCD-5678/switch/ports/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "portId": "1",
                "name": "My switch port",
                "type": "access",
                "vlan": 10
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = tester
            .read_data_source(
                "meraki_devices_switch_ports",
                json!({"serial": "Q234-ABCD-5678", "port_id": "1"}),
            )
            .await
            .unwrap();
        assert_eq!(result["item"]["type"], "access");
        assert_eq!(result["item"]["vlan"], 10);
    }

    #[tokio::test]
    async fn test_cellular_gateway_lan() {
        let server = MockServer::start().await;
        let tester = configured(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/v1/devices/Q234-ABCD-5678/cellularGateway/lan"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "deviceName": "name of the MG",
                "deviceLanIp": "192.168.0.33",
                "deviceSubnet": "192.168.0.32/27",
                "fixedIpAssignments": [
                    {"mac": "0b:00:00:00:00:ac", "name": "server 1", "ip": "192.168.0.10"}
                ],
                "reservedIpRanges": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = tester
            .read_data_source("meraki_devices_cellular_gateway_lan", json!({"serial": "Q234-ABCD-5678"}))
            .await
            .unwrap();
        assert_eq!(result["item"]["fixed_ip_assignments"][0]["ip"], "192.168.0.10");
        assert_eq!(result["item"]["reserved_ip_ranges"], json!([]));
    }
}

mod appliance_vlans {
    use super::*;

    fn vlan() -> Value {
        json!({
            "id": "1234",
            "interfaceId": "1284392014819",
            "name": "My VLAN",
            "subnet": "192.168.1.0/24",
            "applianceIp": "192.168.1.2",
            "dhcpHandling": "Run a DHCP server",
            "reservedIpRanges": [
                {"start": "192.168.1.10", "end": "192.168.1.20", "comment": "printers"}
            ]
        })
    }

    fn config() -> Value {
        json!({
            "network_id": "L_123",
            "vlan_id": "1234",
            "name": "My VLAN",
            "subnet": "192.168.1.0/24",
            "appliance_ip": "192.168.1.2",
        })
    }

    #[tokio::test]
    async fn test_create_without_update_only_settings_posts_once() {
        let server = MockServer::start().await;
        let tester = configured(&server).await;

        Mock::given(method("POST"))
            .and(path("/api/v1/networks/L_123/appliance/vlans"))
            .and(body_json(json!({
                "id": "1234",
                "name": "My VLAN",
                "subnet": "192.168.1.0/24",
                "applianceIp": "192.168.1.2"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(vlan()))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vlan()))
            .expect(0)
            .mount(&server)
            .await;

        let plan = tester
            .plan_create("meraki_networks_appliance_vlans", config())
            .await
            .unwrap();
        let state = tester
            .create("meraki_networks_appliance_vlans", plan.planned_state)
            .await
            .unwrap();
        assert_eq!(state["network_id"], "L_123");
        assert_eq!(state["interface_id"], "1284392014819");
    }

    #[tokio::test]
    async fn test_create_applies_reserved_ranges_with_follow_up_update() {
        let server = MockServer::start().await;
        let tester = configured(&server).await;

        Mock::given(method("POST"))
            .and(path("/api/v1/networks/L_123/appliance/vlans"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "1234", "name": "My VLAN"})))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/api/v1/networks/L_123/appliance/vlans/1234"))
            .and(body_partial_json(json!({
                "reservedIpRanges": [
                    {"start": "192.168.1.10", "end": "192.168.1.20", "comment": "printers"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(vlan()))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = config();
        config["reserved_ip_ranges"] = json!([
            {"start": "192.168.1.10", "end": "192.168.1.20", "comment": "printers"}
        ]);
        let state = tester
            .create("meraki_networks_appliance_vlans", config)
            .await
            .unwrap();
        assert_eq!(state["reserved_ip_ranges"][0]["comment"], "printers");
        assert_eq!(state["dhcp_handling"], "Run a DHCP server");
    }

    #[tokio::test]
    async fn test_unchanged_config_plans_no_changes() {
        let server = MockServer::start().await;
        let tester = configured(&server).await;

        let mut echoed = vlan();
        echoed["reservedIpRanges"] = json!([]);
        echoed["ipv6"] = json!({"enabled": false});
        echoed["mask"] = json!(28);
        echoed["groupPolicyId"] = json!("101");
        echoed["dhcpRelayServerIps"] = json!([]);

        Mock::given(method("POST"))
            .and(path("/api/v1/networks/L_123/appliance/vlans"))
            .respond_with(ResponseTemplate::new(201).set_body_json(echoed.clone()))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v1/networks/L_123/appliance/vlans/1234"))
            .respond_with(ResponseTemplate::new(200).set_body_json(echoed))
            .mount(&server)
            .await;

        let state = tester
            .lifecycle_create("meraki_networks_appliance_vlans", config())
            .await
            .unwrap();
        assert_eq!(state["ipv6"], json!({"enabled": false}));
        assert_eq!(state["reserved_ip_ranges"], json!([]));

        let plan = tester
            .plan_update("meraki_networks_appliance_vlans", state, config())
            .await
            .unwrap();
        assert_plan_no_changes(&plan);
    }

    #[tokio::test]
    async fn test_refresh_keeps_network_id() {
        let server = MockServer::start().await;
        let tester = configured(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/v1/networks/L_123/appliance/vlans/1234"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vlan()))
            .expect(1)
            .mount(&server)
            .await;

        let result = tester
            .read("meraki_networks_appliance_vlans", config())
            .await
            .unwrap();
        let state = result.state.unwrap();
        assert_eq!(state["network_id"], "L_123");
        assert_eq!(state["vlan_id"], "1234");
        assert_eq!(state["ipv6"], Value::Null);
    }
}

mod blink_leds {
    use super::*;

    #[tokio::test]
    async fn test_action_lifecycle() {
        let server = MockServer::start().await;
        let tester = configured(&server).await;

        Mock::given(method("POST"))
            .and(path("/api/v1/devices/Q234-ABCD-5678/blinkLeds"))
            .and(body_json(json!({"duration": 20, "duty": 50})))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({
                "duration": 20,
                "period": 160,
                "duty": 50
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = json!({
            "serial": "Q234-ABCD-5678",
            "parameters": {"duration": 20, "duty": 50},
        });
        let state = tester
            .create("meraki_devices_blink_leds", config.clone())
            .await
            .unwrap();
        assert_eq!(state["serial"], "Q234-ABCD-5678");
        assert_eq!(state["parameters"]["duration"], 20);
        assert_eq!(state["item"]["period"], 160);

        let result = tester
            .read("meraki_devices_blink_leds", state.clone())
            .await
            .unwrap();
        assert_eq!(result.state.as_ref(), Some(&state));

        let warnings = tester.delete("meraki_devices_blink_leds", state).await.unwrap();
        assert_has_warnings(&warnings);
    }
}
