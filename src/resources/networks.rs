//! `meraki_networks` data source and resource.

use serde::{Deserialize, Serialize};

use super::{object, page_request, required, string_list};
use crate::client::{
    CreateNetworkRequest, DashboardClient, Network, OrganizationNetworksQuery, UpdateNetworkRequest,
};
use crate::dispatch::{DataSourceDefinition, Deletion, ResourceDefinition};
use crate::error::ProviderError;
use crate::impl_merge;
use crate::mapping::{request, response, FromPayload, ToPayload};
use crate::schema::{Attribute, AttributeFlags, AttributeType, Schema};
use crate::selector::presence;
use crate::value::Field;

const PRODUCT_TYPES: [&str; 7] = [
    "appliance",
    "camera",
    "cellularGateway",
    "sensor",
    "switch",
    "systemsManager",
    "wireless",
];

/// A network in state.
///
/// `copy_from_network_id` is write-only: the dashboard never returns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkState {
    #[serde(default)]
    pub organization_id: Field<String>,
    #[serde(default)]
    pub network_id: Field<String>,
    #[serde(default)]
    pub name: Field<String>,
    #[serde(default)]
    pub product_types: Field<Vec<String>>,
    #[serde(default)]
    pub time_zone: Field<String>,
    #[serde(default)]
    pub tags: Field<Vec<String>>,
    #[serde(default)]
    pub enrollment_string: Field<String>,
    #[serde(default)]
    pub notes: Field<String>,
    #[serde(default)]
    pub url: Field<String>,
    #[serde(default)]
    pub is_bound_to_config_template: Field<bool>,
    #[serde(default)]
    pub copy_from_network_id: Field<String>,
}

impl_merge!(NetworkState {
    keep: [organization_id, network_id, copy_from_network_id],
    fields: [
        name,
        product_types,
        time_zone,
        tags,
        enrollment_string,
        notes,
        url,
        is_bound_to_config_template,
    ],
});

impl FromPayload for NetworkState {
    type Payload = Network;

    fn from_payload(network: &Network) -> Self {
        Self {
            organization_id: response::field(&network.organization_id),
            network_id: response::field(&network.id),
            name: response::field(&network.name),
            product_types: response::list(&network.product_types),
            time_zone: response::field(&network.time_zone),
            tags: response::list(&network.tags),
            enrollment_string: response::field(&network.enrollment_string),
            notes: response::field(&network.notes),
            url: response::field(&network.url),
            is_bound_to_config_template: response::field(&network.is_bound_to_config_template),
            copy_from_network_id: Field::Null,
        }
    }
}

impl ToPayload for NetworkState {
    type Payload = UpdateNetworkRequest;

    fn to_payload(&self) -> UpdateNetworkRequest {
        UpdateNetworkRequest {
            name: request::opt_string(&self.name),
            time_zone: request::opt_string(&self.time_zone),
            tags: request::list(&self.tags),
            enrollment_string: request::opt_string(&self.enrollment_string),
            notes: request::opt_string(&self.notes),
        }
    }
}

impl NetworkState {
    fn create_payload(&self) -> CreateNetworkRequest {
        CreateNetworkRequest {
            name: request::string(&self.name),
            product_types: request::set(&self.product_types).unwrap_or_default(),
            tags: request::list(&self.tags),
            time_zone: request::opt_string(&self.time_zone),
            copy_from_network_id: request::opt_string(&self.copy_from_network_id),
            notes: request::opt_string(&self.notes),
        }
    }
}

fn network_type() -> AttributeType {
    object(&[
        ("organization_id", AttributeType::String),
        ("network_id", AttributeType::String),
        ("name", AttributeType::String),
        ("product_types", string_list()),
        ("time_zone", AttributeType::String),
        ("tags", string_list()),
        ("enrollment_string", AttributeType::String),
        ("notes", AttributeType::String),
        ("url", AttributeType::String),
        ("is_bound_to_config_template", AttributeType::Bool),
        ("copy_from_network_id", AttributeType::String),
    ])
}

/// Configuration and result of the `meraki_networks` data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworksDataSourceConfig {
    #[serde(default)]
    pub network_id: Field<String>,
    #[serde(default)]
    pub organization_id: Field<String>,
    #[serde(default)]
    pub config_template_id: Field<String>,
    #[serde(default)]
    pub is_bound_to_config_template: Field<bool>,
    #[serde(default)]
    pub tags: Field<Vec<String>>,
    #[serde(default)]
    pub tags_filter_type: Field<String>,
    #[serde(default)]
    pub per_page: Field<i64>,
    #[serde(default)]
    pub starting_after: Field<String>,
    #[serde(default)]
    pub ending_before: Field<String>,
    #[serde(default)]
    pub item: Field<NetworkState>,
    #[serde(default)]
    pub items: Field<Vec<NetworkState>>,
}

/// Reads one network, or lists an organization's networks.
pub struct NetworksDataSource;

#[async_trait::async_trait]
impl DataSourceDefinition for NetworksDataSource {
    const TYPE_NAME: &'static str = "meraki_networks";

    type Config = NetworksDataSourceConfig;

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("A network, or the networks of an organization.")
            .with_attribute("network_id", Attribute::optional_string())
            .with_attribute("organization_id", Attribute::optional_string())
            .with_attribute("config_template_id", Attribute::optional_string())
            .with_attribute("is_bound_to_config_template", Attribute::optional_bool())
            .with_attribute("tags", Attribute::optional_string_list())
            .with_attribute(
                "tags_filter_type",
                Attribute::optional_string().one_of(["withAnyTags", "withAllTags"]),
            )
            .with_attribute("per_page", Attribute::optional_int64().between(3, 100000))
            .with_attribute("starting_after", Attribute::optional_string())
            .with_attribute("ending_before", Attribute::optional_string())
            .with_attribute("item", Attribute::computed(network_type()))
            .with_attribute("items", Attribute::computed(AttributeType::list(network_type())))
    }

    fn methods(&self, config: &NetworksDataSourceConfig) -> Vec<Vec<bool>> {
        vec![
            vec![presence(&config.network_id)],
            vec![
                presence(&config.organization_id),
                presence(&config.config_template_id),
                presence(&config.is_bound_to_config_template),
                presence(&config.tags),
                presence(&config.tags_filter_type),
                presence(&config.per_page),
                presence(&config.starting_after),
                presence(&config.ending_before),
            ],
        ]
    }

    fn parameters(&self) -> &'static [&'static [&'static str]] {
        &[
            &["network_id"],
            &[
                "organization_id",
                "config_template_id",
                "is_bound_to_config_template",
                "tags",
                "tags_filter_type",
                "per_page",
                "starting_after",
                "ending_before",
            ],
        ]
    }

    async fn fetch(
        &self,
        client: &DashboardClient,
        mut config: NetworksDataSourceConfig,
        method: usize,
    ) -> Result<NetworksDataSourceConfig, ProviderError> {
        if method == 1 {
            let network_id = required(&config.network_id, "network_id")?;
            let response = client.networks().get_network(network_id).await?;
            config.item = Field::Known(NetworkState::from_payload(&response.body));
            config.items = Field::Null;
        } else {
            let organization_id = required(&config.organization_id, "organization_id")?;
            let filter = OrganizationNetworksQuery {
                config_template_id: request::opt_string(&config.config_template_id),
                is_bound_to_config_template: request::opt(&config.is_bound_to_config_template),
                tags: request::list(&config.tags),
                tags_filter_type: request::opt_string(&config.tags_filter_type),
            };
            let page = page_request(&config.per_page, &config.starting_after, &config.ending_before);
            let networks = client
                .networks()
                .list_organization_networks(organization_id, &filter, &page)
                .await?;
            config.items = Field::Known(response::items(&networks));
            config.item = Field::Null;
        }
        Ok(config)
    }
}

/// Manages a network.
pub struct NetworksResource;

#[async_trait::async_trait]
impl ResourceDefinition for NetworksResource {
    const TYPE_NAME: &'static str = "meraki_networks";

    type State = NetworkState;

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("A dashboard network.")
            .with_attribute("organization_id", Attribute::required_string().with_force_new())
            .with_attribute("network_id", Attribute::computed_string())
            .with_attribute("name", Attribute::required_string())
            .with_attribute(
                "product_types",
                Attribute::new(AttributeType::set(AttributeType::String), AttributeFlags::required())
                    .with_force_new()
                    .one_of(PRODUCT_TYPES),
            )
            .with_attribute("time_zone", Attribute::optional_computed_string())
            .with_attribute(
                "tags",
                Attribute::new(string_list(), AttributeFlags::optional_computed()),
            )
            .with_attribute("enrollment_string", Attribute::optional_computed_string())
            .with_attribute("notes", Attribute::optional_computed_string())
            .with_attribute("url", Attribute::computed_string())
            .with_attribute("is_bound_to_config_template", Attribute::computed_bool())
            .with_attribute(
                "copy_from_network_id",
                Attribute::optional_string()
                    .with_force_new()
                    .with_description("Network to copy settings from on create. Never read back."),
            )
    }

    fn import_attribute(&self) -> Option<&'static str> {
        Some("network_id")
    }

    async fn create(&self, client: &DashboardClient, plan: &NetworkState) -> Result<NetworkState, ProviderError> {
        let organization_id = required(&plan.organization_id, "organization_id")?;
        let response = client
            .networks()
            .create_organization_network(organization_id, &plan.create_payload())
            .await?;
        Ok(NetworkState::from_payload(&response.body))
    }

    async fn read(&self, client: &DashboardClient, state: &NetworkState) -> Result<NetworkState, ProviderError> {
        let network_id = required(&state.network_id, "network_id")?;
        let response = client.networks().get_network(network_id).await?;
        Ok(NetworkState::from_payload(&response.body))
    }

    async fn update(
        &self,
        client: &DashboardClient,
        prior: &NetworkState,
        plan: &NetworkState,
    ) -> Result<NetworkState, ProviderError> {
        let network_id = required(&prior.network_id, "network_id")?;
        let response = client
            .networks()
            .update_network(network_id, &plan.to_payload())
            .await?;
        Ok(NetworkState::from_payload(&response.body))
    }

    async fn delete(&self, client: &DashboardClient, state: &NetworkState) -> Result<Deletion, ProviderError> {
        let network_id = required(&state.network_id, "network_id")?;
        client.networks().delete_network(network_id).await?;
        Ok(Deletion::Remote)
    }
}
