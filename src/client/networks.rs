use serde::{Deserialize, Serialize};

use super::{ApiResponse, DashboardClient, QueryParams};
use crate::error::ProviderError;
use crate::pagination::{paginate, Page, PageQuery, PageRequest};

/// A network as returned by the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub product_types: Option<Vec<String>>,
    #[serde(default)]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub enrollment_string: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_bound_to_config_template: Option<bool>,
}

/// Body of `POST /organizations/{organizationId}/networks`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNetworkRequest {
    pub name: String,
    pub product_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy_from_network_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `PUT /networks/{networkId}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNetworkRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Filters of `GET /organizations/{organizationId}/networks`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationNetworksQuery {
    pub config_template_id: Option<String>,
    pub is_bound_to_config_template: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub tags_filter_type: Option<String>,
}

impl OrganizationNetworksQuery {
    fn to_query(&self, page: &PageQuery) -> QueryParams {
        let mut query = QueryParams::new();
        query
            .push_opt("configTemplateId", self.config_template_id.as_deref())
            .push_opt("isBoundToConfigTemplate", self.is_bound_to_config_template)
            .push_list("tags", self.tags.as_deref())
            .push_opt("tagsFilterType", self.tags_filter_type.as_deref());
        page.append_to(&mut query);
        query
    }
}

/// `/networks` operations.
pub struct Networks<'a> {
    client: &'a DashboardClient,
}

impl<'a> Networks<'a> {
    pub(super) fn new(client: &'a DashboardClient) -> Self {
        Self { client }
    }

    /// `GET /networks/{networkId}`
    pub async fn get_network(&self, network_id: &str) -> Result<ApiResponse<Network>, ProviderError> {
        self.client.get(&["networks", network_id], &QueryParams::new()).await
    }

    /// `GET /organizations/{organizationId}/networks`, one page.
    pub async fn get_organization_networks(
        &self,
        organization_id: &str,
        filter: &OrganizationNetworksQuery,
        page: &PageQuery,
    ) -> Result<ApiResponse<Vec<Network>>, ProviderError> {
        self.client
            .get(&["organizations", organization_id, "networks"], &filter.to_query(page))
            .await
    }

    /// `GET /organizations/{organizationId}/networks`, following pagination.
    pub async fn list_organization_networks(
        &self,
        organization_id: &str,
        filter: &OrganizationNetworksQuery,
        request: &PageRequest,
    ) -> Result<Vec<Network>, ProviderError> {
        paginate(request, |page| async move {
            self.get_organization_networks(organization_id, filter, &page)
                .await
                .map(Page::from)
        })
        .await
    }

    /// `POST /organizations/{organizationId}/networks`
    pub async fn create_organization_network(
        &self,
        organization_id: &str,
        body: &CreateNetworkRequest,
    ) -> Result<ApiResponse<Network>, ProviderError> {
        self.client
            .post(&["organizations", organization_id, "networks"], body)
            .await
    }

    /// `PUT /networks/{networkId}`
    pub async fn update_network(
        &self,
        network_id: &str,
        body: &UpdateNetworkRequest,
    ) -> Result<ApiResponse<Network>, ProviderError> {
        self.client.put(&["networks", network_id], body).await
    }

    /// `DELETE /networks/{networkId}`
    pub async fn delete_network(&self, network_id: &str) -> Result<ApiResponse<()>, ProviderError> {
        self.client.delete(&["networks", network_id]).await
    }
}
