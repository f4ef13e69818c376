use serde::{Deserialize, Serialize};

use super::{ApiResponse, DashboardClient, QueryParams};
use crate::error::ProviderError;
use crate::pagination::{paginate, Page, PageQuery, PageRequest};

/// A device as returned by the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub network_id: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub firmware: Option<String>,
    #[serde(default)]
    pub lan_ip: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub floor_plan_id: Option<String>,
}

/// Body of `PUT /devices/{serial}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeviceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_map_marker: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor_plan_id: Option<String>,
}

/// Body of `POST /devices/{serial}/blinkLeds`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlinkLedsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duty: Option<i64>,
}

/// Response of `POST /devices/{serial}/blinkLeds`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlinkLeds {
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub period: Option<i64>,
    #[serde(default)]
    pub duty: Option<i64>,
}

/// Filters of `GET /organizations/{organizationId}/devices`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationDevicesQuery {
    pub network_ids: Option<Vec<String>>,
    pub serials: Option<Vec<String>>,
    pub product_types: Option<Vec<String>>,
    pub model: Option<String>,
    pub tags: Option<Vec<String>>,
    pub tags_filter_type: Option<String>,
    pub mac: Option<String>,
    pub name: Option<String>,
}

impl OrganizationDevicesQuery {
    fn to_query(&self, page: &PageQuery) -> QueryParams {
        let mut query = QueryParams::new();
        query
            .push_list("networkIds", self.network_ids.as_deref())
            .push_list("serials", self.serials.as_deref())
            .push_list("productTypes", self.product_types.as_deref())
            .push_opt("model", self.model.as_deref())
            .push_list("tags", self.tags.as_deref())
            .push_opt("tagsFilterType", self.tags_filter_type.as_deref())
            .push_opt("mac", self.mac.as_deref())
            .push_opt("name", self.name.as_deref());
        page.append_to(&mut query);
        query
    }
}

/// `/devices` operations.
pub struct Devices<'a> {
    client: &'a DashboardClient,
}

impl<'a> Devices<'a> {
    pub(super) fn new(client: &'a DashboardClient) -> Self {
        Self { client }
    }

    /// `GET /devices/{serial}`
    pub async fn get_device(&self, serial: &str) -> Result<ApiResponse<Device>, ProviderError> {
        self.client.get(&["devices", serial], &QueryParams::new()).await
    }

    /// `PUT /devices/{serial}`
    pub async fn update_device(
        &self,
        serial: &str,
        body: &UpdateDeviceRequest,
    ) -> Result<ApiResponse<Device>, ProviderError> {
        self.client.put(&["devices", serial], body).await
    }

    /// `POST /devices/{serial}/blinkLeds`
    pub async fn blink_device_leds(
        &self,
        serial: &str,
        body: &BlinkLedsRequest,
    ) -> Result<ApiResponse<BlinkLeds>, ProviderError> {
        self.client.post(&["devices", serial, "blinkLeds"], body).await
    }

    /// `GET /organizations/{organizationId}/devices`, one page.
    pub async fn get_organization_devices(
        &self,
        organization_id: &str,
        filter: &OrganizationDevicesQuery,
        page: &PageQuery,
    ) -> Result<ApiResponse<Vec<Device>>, ProviderError> {
        self.client
            .get(&["organizations", organization_id, "devices"], &filter.to_query(page))
            .await
    }

    /// `GET /organizations/{organizationId}/devices`, following pagination.
    pub async fn list_organization_devices(
        &self,
        organization_id: &str,
        filter: &OrganizationDevicesQuery,
        request: &PageRequest,
    ) -> Result<Vec<Device>, ProviderError> {
        paginate(request, |page| async move {
            self.get_organization_devices(organization_id, filter, &page)
                .await
                .map(Page::from)
        })
        .await
    }
}
