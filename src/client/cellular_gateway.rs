use serde::{Deserialize, Serialize};

use super::{ApiResponse, DashboardClient, QueryParams, ReservedIpRange};
use crate::error::ProviderError;

/// LAN settings of a cellular gateway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellularGatewayLan {
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub device_lan_ip: Option<String>,
    #[serde(default)]
    pub device_subnet: Option<String>,
    #[serde(default)]
    pub fixed_ip_assignments: Option<Vec<FixedIpAssignment>>,
    #[serde(default)]
    pub reserved_ip_ranges: Option<Vec<ReservedIpRange>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixedIpAssignment {
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
}

/// Cellular gateway operations under `/devices/{serial}/cellularGateway`.
pub struct CellularGateway<'a> {
    client: &'a DashboardClient,
}

impl<'a> CellularGateway<'a> {
    pub(super) fn new(client: &'a DashboardClient) -> Self {
        Self { client }
    }

    /// `GET /devices/{serial}/cellularGateway/lan`
    pub async fn get_device_cellular_gateway_lan(
        &self,
        serial: &str,
    ) -> Result<ApiResponse<CellularGatewayLan>, ProviderError> {
        self.client
            .get(&["devices", serial, "cellularGateway", "lan"], &QueryParams::new())
            .await
    }
}
