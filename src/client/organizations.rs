use serde::{Deserialize, Serialize};

use super::{ApiResponse, DashboardClient, QueryParams};
use crate::error::ProviderError;
use crate::pagination::{paginate, Page, PageQuery, PageRequest};

/// An organization as returned by the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub api: Option<OrganizationApi>,
    #[serde(default)]
    pub licensing: Option<OrganizationLicensing>,
    #[serde(default)]
    pub cloud: Option<OrganizationCloud>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizationApi {
    #[serde(default)]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizationLicensing {
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizationCloud {
    #[serde(default)]
    pub region: Option<OrganizationCloudRegion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizationCloudRegion {
    #[serde(default)]
    pub name: Option<String>,
}

/// `/organizations` operations.
pub struct Organizations<'a> {
    client: &'a DashboardClient,
}

impl<'a> Organizations<'a> {
    pub(super) fn new(client: &'a DashboardClient) -> Self {
        Self { client }
    }

    /// `GET /organizations/{organizationId}`
    pub async fn get_organization(
        &self,
        organization_id: &str,
    ) -> Result<ApiResponse<Organization>, ProviderError> {
        self.client
            .get(&["organizations", organization_id], &QueryParams::new())
            .await
    }

    /// `GET /organizations`, one page.
    pub async fn get_organizations(
        &self,
        page: &PageQuery,
    ) -> Result<ApiResponse<Vec<Organization>>, ProviderError> {
        let mut query = QueryParams::new();
        page.append_to(&mut query);
        self.client.get(&["organizations"], &query).await
    }

    /// `GET /organizations`, following pagination.
    pub async fn list_organizations(
        &self,
        request: &PageRequest,
    ) -> Result<Vec<Organization>, ProviderError> {
        paginate(request, |page| async move {
            self.get_organizations(&page).await.map(Page::from)
        })
        .await
    }
}
