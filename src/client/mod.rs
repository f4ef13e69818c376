//! HTTP client for the dashboard REST API.
//!
//! [`DashboardClient`] issues exactly one request per call and classifies the
//! outcome: 2xx responses are decoded, 404 becomes
//! [`ProviderError::NotFound`], every other status becomes
//! [`ProviderError::Api`] with the raw body kept for diagnostics. Nothing is
//! retried.
//!
//! Endpoint-specific operations and their payload types live in the
//! per-domain sub-clients returned by [`DashboardClient::organizations`],
//! [`DashboardClient::networks`] and friends.

// Payload fields mirror the API's documented JSON keys.
#[allow(missing_docs)]
mod appliance;
#[allow(missing_docs)]
mod cellular_gateway;
#[allow(missing_docs)]
mod devices;
#[allow(missing_docs)]
mod networks;
#[allow(missing_docs)]
mod organizations;
#[allow(missing_docs)]
mod switch;

pub use appliance::{
    Appliance, CreateVlanRequest, ReservedIpRange, ReservedIpRangeRequest, UpdateVlanRequest, Vlan,
    VlanIpv6, VlanIpv6PrefixAssignment, VlanIpv6Request,
};
pub use cellular_gateway::{CellularGateway, CellularGatewayLan, FixedIpAssignment};
pub use devices::{
    BlinkLeds, BlinkLedsRequest, Device, Devices, OrganizationDevicesQuery, UpdateDeviceRequest,
};
pub use networks::{
    CreateNetworkRequest, Network, Networks, OrganizationNetworksQuery, UpdateNetworkRequest,
};
pub use organizations::{
    Organization, OrganizationApi, OrganizationCloud, OrganizationCloudRegion,
    OrganizationLicensing, Organizations,
};
pub use switch::{Switch, SwitchPort};

use reqwest::header::LINK;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};
use url::Url;

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::pagination::{LinkHeader, Page};

/// Maximum number of body bytes written to the log.
const MAX_LOG_BODY_LENGTH: usize = 512;

/// A decoded API response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    /// HTTP status code.
    pub status: u16,
    /// Parsed `Link` header; empty when absent.
    pub link: LinkHeader,
    /// Decoded body. An empty body decodes as JSON `null`.
    pub body: T,
}

impl<T> From<ApiResponse<Vec<T>>> for Page<T> {
    fn from(response: ApiResponse<Vec<T>>) -> Self {
        Page {
            items: response.body,
            link: response.link,
        }
    }
}

/// Query string builder following the dashboard's conventions.
///
/// Array parameters are sent as repeated `name[]=value` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// An empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `name=value`.
    pub fn push(&mut self, name: &str, value: impl ToString) -> &mut Self {
        self.pairs.push((name.to_string(), value.to_string()));
        self
    }

    /// Append `name=value` when a value is present.
    pub fn push_opt<V: ToString>(&mut self, name: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.push(name, value);
        }
        self
    }

    /// Append `name[]=value` once per element.
    pub fn push_list<V: ToString>(&mut self, name: &str, values: Option<&[V]>) -> &mut Self {
        let key = format!("{}[]", name);
        for value in values.unwrap_or_default() {
            self.push(&key, value.to_string());
        }
        self
    }

    /// The accumulated pairs, in insertion order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Returns `true` when nothing was pushed.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Client for the dashboard REST API.
#[derive(Clone)]
pub struct DashboardClient {
    http: reqwest::Client,
    api_key: String,
    base_url: Url,
    debug: bool,
}

impl std::fmt::Debug for DashboardClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardClient")
            .field("base_url", &self.base_url.as_str())
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

impl DashboardClient {
    /// Build a client from resolved provider configuration.
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.requests_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            debug: config.debug,
        })
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Organization operations.
    pub fn organizations(&self) -> Organizations<'_> {
        Organizations::new(self)
    }

    /// Network operations.
    pub fn networks(&self) -> Networks<'_> {
        Networks::new(self)
    }

    /// Device operations.
    pub fn devices(&self) -> Devices<'_> {
        Devices::new(self)
    }

    /// Security appliance operations.
    pub fn appliance(&self) -> Appliance<'_> {
        Appliance::new(self)
    }

    /// Switch operations.
    pub fn switch(&self) -> Switch<'_> {
        Switch::new(self)
    }

    /// Cellular gateway operations.
    pub fn cellular_gateway(&self) -> CellularGateway<'_> {
        CellularGateway::new(self)
    }

    /// `GET` the resource at `segments`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &QueryParams,
    ) -> Result<ApiResponse<T>, ProviderError> {
        let url = self.url(segments, query)?;
        self.execute(Method::GET, url, None).await
    }

    /// `POST` a JSON body to `segments`.
    pub async fn post<B, T>(&self, segments: &[&str], body: &B) -> Result<ApiResponse<T>, ProviderError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(segments, &QueryParams::new())?;
        self.execute(Method::POST, url, Some(serde_json::to_value(body)?)).await
    }

    /// `PUT` a JSON body to `segments`.
    pub async fn put<B, T>(&self, segments: &[&str], body: &B) -> Result<ApiResponse<T>, ProviderError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(segments, &QueryParams::new())?;
        self.execute(Method::PUT, url, Some(serde_json::to_value(body)?)).await
    }

    /// `DELETE` the resource at `segments`.
    pub async fn delete(&self, segments: &[&str]) -> Result<ApiResponse<()>, ProviderError> {
        let url = self.url(segments, &QueryParams::new())?;
        let response: ApiResponse<Value> = self.execute(Method::DELETE, url, None).await?;
        Ok(ApiResponse {
            status: response.status,
            link: response.link,
            body: (),
        })
    }

    /// Base URL plus percent-encoded path segments plus query.
    fn url(&self, segments: &[&str], query: &QueryParams) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ProviderError::Configuration(format!(
                    "base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.pairs().iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<ApiResponse<T>, ProviderError> {
        debug!(%method, %url, "Sending request");
        if self.debug {
            if let Some(body) = &body {
                debug!(body = %sanitize_for_log(&body.to_string()), "Request body");
            }
        }

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let link = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .map(LinkHeader::parse)
            .unwrap_or_default();
        let text = response.text().await?;

        debug!(%method, %url, status = status.as_u16(), "Received response");
        if self.debug {
            debug!(body = %sanitize_for_log(&text), "Response body");
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound(if text.trim().is_empty() {
                url.to_string()
            } else {
                text
            }));
        }
        if !status.is_success() {
            error!(status = status.as_u16(), body = %sanitize_for_log(&text), "API error");
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let body = if text.trim().is_empty() {
            serde_json::from_value(Value::Null)?
        } else {
            serde_json::from_str(&text)?
        };

        Ok(ApiResponse {
            status: status.as_u16(),
            link,
            body,
        })
    }
}

/// Truncate a body for logging and drop non-printable characters.
pub(crate) fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> DashboardClient {
        let config = ProviderConfig::new("test-key")
            .unwrap()
            .with_base_url(base)
            .unwrap();
        DashboardClient::new(&config).unwrap()
    }

    #[test]
    fn test_url_encodes_segments() {
        let client = client("https://api.meraki.com/api/v1");
        let url = client
            .url(&["networks", "N_1/../x", "appliance", "vlans"], &QueryParams::new())
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.meraki.com/api/v1/networks/N_1%2F..%2Fx/appliance/vlans"
        );
    }

    #[test]
    fn test_url_tolerates_trailing_slash() {
        let client = client("https://api.meraki.com/api/v1/");
        let url = client.url(&["organizations"], &QueryParams::new()).unwrap();
        assert_eq!(url.as_str(), "https://api.meraki.com/api/v1/organizations");
    }

    #[test]
    fn test_query_params_array_convention() {
        let mut query = QueryParams::new();
        query
            .push("perPage", 100)
            .push_opt("model", None::<&str>)
            .push_list("networkIds", Some(&["N_1".to_string(), "N_2".to_string()][..]));

        let client = client("https://api.meraki.com/api/v1");
        let url = client.url(&["organizations", "1", "devices"], &query).unwrap();
        assert_eq!(
            url.query(),
            Some("perPage=100&networkIds%5B%5D=N_1&networkIds%5B%5D=N_2")
        );
    }

    #[test]
    fn test_query_params_empty_list() {
        let mut query = QueryParams::new();
        query.push_list::<String>("tags", None).push_list::<String>("serials", Some(&[][..]));
        assert!(query.is_empty());
    }

    #[test]
    fn test_sanitize_for_log() {
        assert_eq!(sanitize_for_log("{\"a\":1}\n"), "{\"a\":1}");

        let long = "é".repeat(MAX_LOG_BODY_LENGTH);
        let sanitized = sanitize_for_log(&long);
        assert!(sanitized.contains("truncated"));
        assert!(sanitized.len() < long.len());
    }
}
