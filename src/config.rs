//! Provider configuration.
//!
//! Every attribute can also be supplied through the environment, which is how
//! CI pipelines usually pass the API key. Explicit configuration wins.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::error::ProviderError;
use crate::schema::{Attribute, Schema};
use crate::value::Field;

/// Dashboard API endpoint used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.meraki.com/api/v1";

/// Environment variable holding the dashboard API key.
pub const ENV_API_KEY: &str = "MERAKI_DASHBOARD_API_KEY";
/// Environment variable overriding the API base URL.
pub const ENV_BASE_URL: &str = "MERAKI_BASE_URL";
/// Environment variable enabling request/response body logging.
pub const ENV_DEBUG: &str = "MERAKI_DEBUG";
/// Environment variable with an application name prepended to the user agent.
pub const ENV_USER_AGENT: &str = "MERAKI_USER_AGENT";

/// Provider configuration as sent by the host.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderConfigInput {
    /// Dashboard API key.
    #[serde(default)]
    pub meraki_dashboard_api_key: Field<String>,
    /// API base URL.
    #[serde(default)]
    pub meraki_base_url: Field<String>,
    /// Log request and response bodies.
    #[serde(default)]
    pub meraki_debug: Field<bool>,
    /// Application name for the user agent.
    #[serde(default)]
    pub meraki_user_agent: Field<String>,
    /// Per-request timeout in seconds.
    #[serde(default)]
    pub meraki_requests_timeout_secs: Field<i64>,
}

/// Resolved provider configuration.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Dashboard API key, sent as a bearer token.
    pub api_key: String,
    /// API base URL, e.g. `https://api.meraki.com/api/v1`.
    pub base_url: Url,
    /// Log sanitized request and response bodies at debug level.
    pub debug: bool,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
    /// Per-request timeout. `None` leaves reqwest's default (no timeout).
    pub requests_timeout: Option<Duration>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("debug", &self.debug)
            .field("user_agent", &self.user_agent)
            .field("requests_timeout", &self.requests_timeout)
            .finish()
    }
}

impl ProviderConfig {
    /// Configuration with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        Ok(Self {
            api_key: api_key.into(),
            base_url: Url::parse(DEFAULT_BASE_URL)?,
            debug: false,
            user_agent: default_user_agent(None),
            requests_timeout: None,
        })
    }

    /// Point the client at a different API endpoint.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ProviderError> {
        self.base_url = Url::parse(base_url)?;
        Ok(self)
    }

    /// The provider configuration schema.
    pub fn schema() -> Schema {
        Schema::v0()
            .with_description("Cisco Meraki dashboard API provider")
            .with_attribute(
                "meraki_dashboard_api_key",
                Attribute::optional_string()
                    .sensitive()
                    .with_description(format!(
                        "Dashboard API key. Falls back to {}.",
                        ENV_API_KEY
                    )),
            )
            .with_attribute(
                "meraki_base_url",
                Attribute::optional_string().with_description(format!(
                    "API base URL. Defaults to {}. Falls back to {}.",
                    DEFAULT_BASE_URL, ENV_BASE_URL
                )),
            )
            .with_attribute(
                "meraki_debug",
                Attribute::optional_bool().with_description(format!(
                    "Log request and response bodies. Falls back to {}.",
                    ENV_DEBUG
                )),
            )
            .with_attribute(
                "meraki_user_agent",
                Attribute::optional_string().with_description(format!(
                    "Application name prepended to the user agent. Falls back to {}.",
                    ENV_USER_AGENT
                )),
            )
            .with_attribute(
                "meraki_requests_timeout_secs",
                Attribute::optional_int64()
                    .between(0, 3600)
                    .with_description("Per-request timeout in seconds; 0 disables it."),
            )
    }

    /// Resolve configuration from the host value and the process environment.
    pub fn from_value(value: &Value) -> Result<Self, ProviderError> {
        Self::from_value_with_env(value, |name| std::env::var(name).ok())
    }

    /// Resolve configuration with an explicit environment lookup.
    pub fn from_value_with_env(
        value: &Value,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ProviderError> {
        let input: ProviderConfigInput = if value.is_null() {
            ProviderConfigInput::default()
        } else {
            serde_json::from_value(value.clone())?
        };

        let api_key = input
            .meraki_dashboard_api_key
            .into_known()
            .or_else(|| env(ENV_API_KEY))
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ProviderError::Configuration(format!(
                    "meraki_dashboard_api_key must be set in the provider configuration or via {}",
                    ENV_API_KEY
                ))
            })?;

        let base_url = input
            .meraki_base_url
            .into_known()
            .or_else(|| env(ENV_BASE_URL))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url).map_err(|e| {
            ProviderError::Configuration(format!("invalid meraki_base_url '{}': {}", base_url, e))
        })?;

        let debug = match input.meraki_debug.into_known() {
            Some(debug) => debug,
            None => env(ENV_DEBUG).is_some_and(|v| parse_flag(&v)),
        };

        let user_agent = default_user_agent(
            input
                .meraki_user_agent
                .into_known()
                .or_else(|| env(ENV_USER_AGENT))
                .as_deref(),
        );

        let requests_timeout = match input.meraki_requests_timeout_secs.into_known() {
            Some(secs) if secs < 0 => {
                return Err(ProviderError::Configuration(format!(
                    "meraki_requests_timeout_secs must not be negative, got {}",
                    secs
                )))
            },
            Some(0) | None => None,
            Some(secs) => Some(Duration::from_secs(secs.unsigned_abs())),
        };

        Ok(Self {
            api_key,
            base_url,
            debug,
            user_agent,
            requests_timeout,
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn default_user_agent(application: Option<&str>) -> String {
    let own = format!("meraki-provider/{}", env!("CARGO_PKG_VERSION"));
    match application.map(str::trim).filter(|a| !a.is_empty()) {
        Some(application) => format!("{} {}", application, own),
        None => own,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;
    use serde_json::json;
    use std::collections::HashMap;

    fn env_of(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_explicit_config() {
        let config = ProviderConfig::from_value_with_env(
            &json!({
                "meraki_dashboard_api_key": "abc123",
                "meraki_base_url": "http://localhost:8080/api/v1",
                "meraki_debug": true,
                "meraki_user_agent": "netops",
                "meraki_requests_timeout_secs": 30
            }),
            env_of(&[]),
        )
        .unwrap();

        assert_eq!(config.api_key, "abc123");
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/api/v1");
        assert!(config.debug);
        assert!(config.user_agent.starts_with("netops meraki-provider/"));
        assert_eq!(config.requests_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_env_fallback() {
        let config = ProviderConfig::from_value_with_env(
            &json!({}),
            env_of(&[(ENV_API_KEY, "from-env"), (ENV_DEBUG, "TRUE")]),
        )
        .unwrap();

        assert_eq!(config.api_key, "from-env");
        assert_eq!(config.base_url.as_str(), "https://api.meraki.com/api/v1");
        assert!(config.debug);
        assert!(config.requests_timeout.is_none());
    }

    #[test]
    fn test_explicit_wins_over_env() {
        let config = ProviderConfig::from_value_with_env(
            &json!({"meraki_dashboard_api_key": "explicit", "meraki_debug": false}),
            env_of(&[(ENV_API_KEY, "from-env"), (ENV_DEBUG, "true")]),
        )
        .unwrap();

        assert_eq!(config.api_key, "explicit");
        assert!(!config.debug);
    }

    #[test]
    fn test_missing_api_key() {
        let err = ProviderConfig::from_value_with_env(&Value::Null, env_of(&[])).unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
        assert!(err.to_string().contains(ENV_API_KEY));

        let err = ProviderConfig::from_value_with_env(
            &json!({"meraki_dashboard_api_key": "  "}),
            env_of(&[]),
        )
        .unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ProviderConfig::from_value_with_env(
            &json!({"meraki_dashboard_api_key": "k", "meraki_base_url": "not a url"}),
            env_of(&[]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("meraki_base_url"));
    }

    #[test]
    fn test_debug_output_redacts_key() {
        let config = ProviderConfig::new("super-secret").unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_schema_validation() {
        let schema = ProviderConfig::schema();
        assert!(schema.attribute("meraki_dashboard_api_key").unwrap().flags.sensitive);
        assert!(validate(&schema, &json!({"meraki_requests_timeout_secs": 30})).is_empty());
        assert_eq!(
            validate(&schema, &json!({"meraki_requests_timeout_secs": -1})).len(),
            1
        );
    }
}
