//! `meraki_organizations` data source.

use serde::{Deserialize, Serialize};

use super::{object, page_request};
use crate::client::{DashboardClient, Organization};
use crate::dispatch::DataSourceDefinition;
use crate::error::ProviderError;
use crate::mapping::{response, FromPayload};
use crate::schema::{Attribute, AttributeType, Schema};
use crate::selector::presence;
use crate::value::Field;

/// Configuration and result of `meraki_organizations`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizationsConfig {
    #[serde(default)]
    pub organization_id: Field<String>,
    #[serde(default)]
    pub per_page: Field<i64>,
    #[serde(default)]
    pub starting_after: Field<String>,
    #[serde(default)]
    pub ending_before: Field<String>,
    #[serde(default)]
    pub item: Field<OrganizationState>,
    #[serde(default)]
    pub items: Field<Vec<OrganizationState>>,
}

/// One organization in state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizationState {
    #[serde(default)]
    pub id: Field<String>,
    #[serde(default)]
    pub name: Field<String>,
    #[serde(default)]
    pub url: Field<String>,
    #[serde(default)]
    pub api_enabled: Field<bool>,
    #[serde(default)]
    pub licensing_model: Field<String>,
    #[serde(default)]
    pub cloud_region_name: Field<String>,
}

impl FromPayload for OrganizationState {
    type Payload = Organization;

    fn from_payload(org: &Organization) -> Self {
        Self {
            id: response::field(&org.id),
            name: response::field(&org.name),
            url: response::field(&org.url),
            api_enabled: response::field(&org.api.as_ref().and_then(|a| a.enabled)),
            licensing_model: response::field(&org.licensing.as_ref().and_then(|l| l.model.clone())),
            cloud_region_name: response::field(
                &org.cloud
                    .as_ref()
                    .and_then(|c| c.region.as_ref())
                    .and_then(|r| r.name.clone()),
            ),
        }
    }
}

fn organization_type() -> AttributeType {
    object(&[
        ("id", AttributeType::String),
        ("name", AttributeType::String),
        ("url", AttributeType::String),
        ("api_enabled", AttributeType::Bool),
        ("licensing_model", AttributeType::String),
        ("cloud_region_name", AttributeType::String),
    ])
}

/// Reads one organization by id, or lists every organization the key can see.
pub struct OrganizationsDataSource;

#[async_trait::async_trait]
impl DataSourceDefinition for OrganizationsDataSource {
    const TYPE_NAME: &'static str = "meraki_organizations";

    type Config = OrganizationsConfig;

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("Organizations the API key has access to.")
            .with_attribute("organization_id", Attribute::optional_string())
            .with_attribute("per_page", Attribute::optional_int64().between(3, 9000))
            .with_attribute("starting_after", Attribute::optional_string())
            .with_attribute("ending_before", Attribute::optional_string())
            .with_attribute("item", Attribute::computed(organization_type()))
            .with_attribute(
                "items",
                Attribute::computed(AttributeType::list(organization_type())),
            )
    }

    fn methods(&self, config: &OrganizationsConfig) -> Vec<Vec<bool>> {
        // Listing needs no parameter, so it is always selectable.
        vec![vec![presence(&config.organization_id)], vec![true]]
    }

    fn parameters(&self) -> &'static [&'static [&'static str]] {
        &[&["organization_id"], &[]]
    }

    async fn fetch(
        &self,
        client: &DashboardClient,
        mut config: OrganizationsConfig,
        method: usize,
    ) -> Result<OrganizationsConfig, ProviderError> {
        if method == 1 {
            let organization_id = super::required(&config.organization_id, "organization_id")?;
            let response = client.organizations().get_organization(organization_id).await?;
            config.item = Field::Known(OrganizationState::from_payload(&response.body));
            config.items = Field::Null;
        } else {
            let request = page_request(&config.per_page, &config.starting_after, &config.ending_before);
            let organizations = client.organizations().list_organizations(&request).await?;
            config.items = Field::Known(response::items(&organizations));
            config.item = Field::Null;
        }
        Ok(config)
    }
}
