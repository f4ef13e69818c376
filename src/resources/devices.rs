//! `meraki_devices` data source and resource.
//!
//! Devices are claimed into networks out of band, so the resource never
//! creates or deletes anything: create applies the planned settings to an
//! existing serial and delete only forgets it.

use serde::{Deserialize, Serialize};

use super::{object, page_request, required, string_list};
use crate::client::{DashboardClient, Device, OrganizationDevicesQuery, UpdateDeviceRequest};
use crate::dispatch::{DataSourceDefinition, Deletion, ResourceDefinition};
use crate::error::ProviderError;
use crate::impl_merge;
use crate::mapping::{request, response, FromPayload, ToPayload};
use crate::schema::{Attribute, AttributeFlags, AttributeType, Schema};
use crate::selector::presence;
use crate::value::Field;

/// A device in state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceState {
    #[serde(default)]
    pub serial: Field<String>,
    #[serde(default)]
    pub name: Field<String>,
    #[serde(default)]
    pub tags: Field<Vec<String>>,
    #[serde(default)]
    pub lat: Field<f64>,
    #[serde(default)]
    pub lng: Field<f64>,
    #[serde(default)]
    pub address: Field<String>,
    #[serde(default)]
    pub notes: Field<String>,
    #[serde(default)]
    pub move_map_marker: Field<bool>,
    #[serde(default)]
    pub floor_plan_id: Field<String>,
    #[serde(default)]
    pub mac: Field<String>,
    #[serde(default)]
    pub model: Field<String>,
    #[serde(default)]
    pub network_id: Field<String>,
    #[serde(default)]
    pub product_type: Field<String>,
    #[serde(default)]
    pub firmware: Field<String>,
    #[serde(default)]
    pub lan_ip: Field<String>,
    #[serde(default)]
    pub url: Field<String>,
}

impl_merge!(DeviceState {
    keep: [serial, move_map_marker],
    fields: [
        name,
        tags,
        lat,
        lng,
        address,
        notes,
        floor_plan_id,
        mac,
        model,
        network_id,
        product_type,
        firmware,
        lan_ip,
        url,
    ],
});

impl FromPayload for DeviceState {
    type Payload = Device;

    fn from_payload(device: &Device) -> Self {
        Self {
            serial: response::field(&device.serial),
            name: response::field(&device.name),
            tags: response::list(&device.tags),
            lat: response::field(&device.lat),
            lng: response::field(&device.lng),
            address: response::field(&device.address),
            notes: response::field(&device.notes),
            move_map_marker: Field::Null,
            floor_plan_id: response::field(&device.floor_plan_id),
            mac: response::field(&device.mac),
            model: response::field(&device.model),
            network_id: response::field(&device.network_id),
            product_type: response::field(&device.product_type),
            firmware: response::field(&device.firmware),
            lan_ip: response::field(&device.lan_ip),
            url: response::field(&device.url),
        }
    }
}

impl ToPayload for DeviceState {
    type Payload = UpdateDeviceRequest;

    fn to_payload(&self) -> UpdateDeviceRequest {
        UpdateDeviceRequest {
            name: request::opt_string(&self.name),
            tags: request::list(&self.tags),
            lat: request::opt(&self.lat),
            lng: request::opt(&self.lng),
            address: request::opt_string(&self.address),
            notes: request::opt_string(&self.notes),
            move_map_marker: request::opt(&self.move_map_marker),
            floor_plan_id: request::opt_string(&self.floor_plan_id),
        }
    }
}

fn device_type() -> AttributeType {
    object(&[
        ("serial", AttributeType::String),
        ("name", AttributeType::String),
        ("tags", string_list()),
        ("lat", AttributeType::Float64),
        ("lng", AttributeType::Float64),
        ("address", AttributeType::String),
        ("notes", AttributeType::String),
        ("move_map_marker", AttributeType::Bool),
        ("floor_plan_id", AttributeType::String),
        ("mac", AttributeType::String),
        ("model", AttributeType::String),
        ("network_id", AttributeType::String),
        ("product_type", AttributeType::String),
        ("firmware", AttributeType::String),
        ("lan_ip", AttributeType::String),
        ("url", AttributeType::String),
    ])
}

/// Configuration and result of the `meraki_devices` data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DevicesDataSourceConfig {
    #[serde(default)]
    pub serial: Field<String>,
    #[serde(default)]
    pub organization_id: Field<String>,
    #[serde(default)]
    pub network_ids: Field<Vec<String>>,
    #[serde(default)]
    pub serials: Field<Vec<String>>,
    #[serde(default)]
    pub product_types: Field<Vec<String>>,
    #[serde(default)]
    pub model: Field<String>,
    #[serde(default)]
    pub tags: Field<Vec<String>>,
    #[serde(default)]
    pub tags_filter_type: Field<String>,
    #[serde(default)]
    pub mac: Field<String>,
    #[serde(default)]
    pub name: Field<String>,
    #[serde(default)]
    pub per_page: Field<i64>,
    #[serde(default)]
    pub starting_after: Field<String>,
    #[serde(default)]
    pub ending_before: Field<String>,
    #[serde(default)]
    pub item: Field<DeviceState>,
    #[serde(default)]
    pub items: Field<Vec<DeviceState>>,
}

/// Reads one device by serial, or lists an organization's devices.
pub struct DevicesDataSource;

#[async_trait::async_trait]
impl DataSourceDefinition for DevicesDataSource {
    const TYPE_NAME: &'static str = "meraki_devices";

    type Config = DevicesDataSourceConfig;

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("A device, or the devices of an organization.")
            .with_attribute("serial", Attribute::optional_string())
            .with_attribute("organization_id", Attribute::optional_string())
            .with_attribute("network_ids", Attribute::optional_string_list())
            .with_attribute("serials", Attribute::optional_string_list())
            .with_attribute("product_types", Attribute::optional_string_list())
            .with_attribute("model", Attribute::optional_string())
            .with_attribute("tags", Attribute::optional_string_list())
            .with_attribute(
                "tags_filter_type",
                Attribute::optional_string().one_of(["withAnyTags", "withAllTags"]),
            )
            .with_attribute("mac", Attribute::optional_string())
            .with_attribute("name", Attribute::optional_string())
            .with_attribute("per_page", Attribute::optional_int64().between(3, 1000))
            .with_attribute("starting_after", Attribute::optional_string())
            .with_attribute("ending_before", Attribute::optional_string())
            .with_attribute("item", Attribute::computed(device_type()))
            .with_attribute("items", Attribute::computed(AttributeType::list(device_type())))
    }

    fn methods(&self, config: &DevicesDataSourceConfig) -> Vec<Vec<bool>> {
        vec![
            vec![presence(&config.serial)],
            vec![
                presence(&config.organization_id),
                presence(&config.network_ids),
                presence(&config.serials),
                presence(&config.product_types),
                presence(&config.model),
                presence(&config.tags),
                presence(&config.tags_filter_type),
                presence(&config.mac),
                presence(&config.name),
                presence(&config.per_page),
                presence(&config.starting_after),
                presence(&config.ending_before),
            ],
        ]
    }

    fn parameters(&self) -> &'static [&'static [&'static str]] {
        &[
            &["serial"],
            &[
                "organization_id",
                "network_ids",
                "serials",
                "product_types",
                "model",
                "tags",
                "tags_filter_type",
                "mac",
                "name",
                "per_page",
                "starting_after",
                "ending_before",
            ],
        ]
    }

    async fn fetch(
        &self,
        client: &DashboardClient,
        mut config: DevicesDataSourceConfig,
        method: usize,
    ) -> Result<DevicesDataSourceConfig, ProviderError> {
        if method == 1 {
            let serial = required(&config.serial, "serial")?;
            let response = client.devices().get_device(serial).await?;
            config.item = Field::Known(DeviceState::from_payload(&response.body));
            config.items = Field::Null;
        } else {
            let organization_id = required(&config.organization_id, "organization_id")?;
            let filter = OrganizationDevicesQuery {
                network_ids: request::list(&config.network_ids),
                serials: request::set(&config.serials),
                product_types: request::set(&config.product_types),
                model: request::opt_string(&config.model),
                tags: request::list(&config.tags),
                tags_filter_type: request::opt_string(&config.tags_filter_type),
                mac: request::opt_string(&config.mac),
                name: request::opt_string(&config.name),
            };
            let page = page_request(&config.per_page, &config.starting_after, &config.ending_before);
            let devices = client
                .devices()
                .list_organization_devices(organization_id, &filter, &page)
                .await?;
            config.items = Field::Known(response::items(&devices));
            config.item = Field::Null;
        }
        Ok(config)
    }
}

/// Manages the settings of a claimed device.
pub struct DevicesResource;

#[async_trait::async_trait]
impl ResourceDefinition for DevicesResource {
    const TYPE_NAME: &'static str = "meraki_devices";

    type State = DeviceState;

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("Settings of a device already claimed into a network.")
            .with_attribute("serial", Attribute::required_string().with_force_new())
            .with_attribute("name", Attribute::optional_computed_string())
            .with_attribute(
                "tags",
                Attribute::new(string_list(), AttributeFlags::optional_computed()),
            )
            .with_attribute(
                "lat",
                Attribute::new(AttributeType::Float64, AttributeFlags::optional_computed()),
            )
            .with_attribute(
                "lng",
                Attribute::new(AttributeType::Float64, AttributeFlags::optional_computed()),
            )
            .with_attribute("address", Attribute::optional_computed_string())
            .with_attribute("notes", Attribute::optional_computed_string())
            .with_attribute(
                "move_map_marker",
                Attribute::optional_bool()
                    .with_description("Move the map marker to the address. Never read back."),
            )
            .with_attribute("floor_plan_id", Attribute::optional_computed_string())
            .with_attribute("mac", Attribute::computed_string())
            .with_attribute("model", Attribute::computed_string())
            .with_attribute("network_id", Attribute::computed_string())
            .with_attribute("product_type", Attribute::computed_string())
            .with_attribute("firmware", Attribute::computed_string())
            .with_attribute("lan_ip", Attribute::computed_string())
            .with_attribute("url", Attribute::computed_string())
    }

    fn import_attribute(&self) -> Option<&'static str> {
        Some("serial")
    }

    async fn create(&self, client: &DashboardClient, plan: &DeviceState) -> Result<DeviceState, ProviderError> {
        let serial = required(&plan.serial, "serial")?;
        let response = client.devices().update_device(serial, &plan.to_payload()).await?;
        Ok(DeviceState::from_payload(&response.body))
    }

    async fn read(&self, client: &DashboardClient, state: &DeviceState) -> Result<DeviceState, ProviderError> {
        let serial = required(&state.serial, "serial")?;
        let response = client.devices().get_device(serial).await?;
        Ok(DeviceState::from_payload(&response.body))
    }

    async fn update(
        &self,
        client: &DashboardClient,
        prior: &DeviceState,
        plan: &DeviceState,
    ) -> Result<DeviceState, ProviderError> {
        let serial = required(&prior.serial, "serial")?;
        let response = client.devices().update_device(serial, &plan.to_payload()).await?;
        Ok(DeviceState::from_payload(&response.body))
    }

    async fn delete(&self, _client: &DashboardClient, _state: &DeviceState) -> Result<Deletion, ProviderError> {
        Ok(Deletion::StateOnly {
            reason: "Devices cannot be deleted through the dashboard API. The device keeps \
                     its current settings and stays claimed in its network."
                .to_string(),
        })
    }
}
