//! `meraki_devices_blink_leds` action resource.
//!
//! Blinking LEDs is a one-shot action. Creating the resource performs it;
//! there is nothing to read back or delete on the dashboard.

use serde::{Deserialize, Serialize};

use super::{object, required};
use crate::client::{BlinkLeds, BlinkLedsRequest, DashboardClient};
use crate::dispatch::{Deletion, ResourceDefinition};
use crate::error::ProviderError;
use crate::impl_merge;
use crate::mapping::{request, response, FromPayload};
use crate::schema::{Attribute, AttributeType, Block, NestedBlock, Schema};
use crate::value::Field;

/// Action input and result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlinkLedsState {
    #[serde(default)]
    pub serial: Field<String>,
    #[serde(default)]
    pub parameters: Field<BlinkLedsParameters>,
    #[serde(default)]
    pub item: Field<BlinkLedsParameters>,
}

/// Blink timing, as sent and as echoed by the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlinkLedsParameters {
    #[serde(default)]
    pub duration: Field<i64>,
    #[serde(default)]
    pub period: Field<i64>,
    #[serde(default)]
    pub duty: Field<i64>,
}

impl_merge!(BlinkLedsState {
    keep: [serial, parameters],
    fields: [item],
});

impl FromPayload for BlinkLedsParameters {
    type Payload = BlinkLeds;

    fn from_payload(blink: &BlinkLeds) -> Self {
        Self {
            duration: response::field(&blink.duration),
            period: response::field(&blink.period),
            duty: response::field(&blink.duty),
        }
    }
}

impl BlinkLedsState {
    fn request(&self) -> BlinkLedsRequest {
        request::nested(&self.parameters, |p| BlinkLedsRequest {
            duration: request::opt(&p.duration),
            period: request::opt(&p.period),
            duty: request::opt(&p.duty),
        })
        .unwrap_or_default()
    }

    async fn blink(&self, client: &DashboardClient) -> Result<Self, ProviderError> {
        let serial = required(&self.serial, "serial")?;
        let response = client.devices().blink_device_leds(serial, &self.request()).await?;
        Ok(Self {
            serial: Field::Null,
            parameters: Field::Null,
            item: Field::Known(BlinkLedsParameters::from_payload(&response.body)),
        })
    }
}

/// Blinks a device's LEDs on create.
pub struct BlinkLedsResource;

#[async_trait::async_trait]
impl ResourceDefinition for BlinkLedsResource {
    const TYPE_NAME: &'static str = "meraki_devices_blink_leds";

    type State = BlinkLedsState;

    fn schema(&self) -> Schema {
        let parameters = Block::new()
            .with_attribute("duration", Attribute::optional_int64().between(5, 120))
            .with_attribute("period", Attribute::optional_int64().between(100, 1000))
            .with_attribute("duty", Attribute::optional_int64().between(10, 90));

        Schema::v0()
            .with_description("Blink the LEDs on a device.")
            .with_attribute("serial", Attribute::required_string().with_force_new())
            .with_block("parameters", NestedBlock::single(parameters))
            .with_attribute(
                "item",
                Attribute::computed(object(&[
                    ("duration", AttributeType::Int64),
                    ("period", AttributeType::Int64),
                    ("duty", AttributeType::Int64),
                ])),
            )
    }

    async fn create(&self, client: &DashboardClient, plan: &BlinkLedsState) -> Result<BlinkLedsState, ProviderError> {
        plan.blink(client).await
    }

    async fn read(&self, _client: &DashboardClient, state: &BlinkLedsState) -> Result<BlinkLedsState, ProviderError> {
        Ok(state.clone())
    }

    async fn update(
        &self,
        client: &DashboardClient,
        _prior: &BlinkLedsState,
        plan: &BlinkLedsState,
    ) -> Result<BlinkLedsState, ProviderError> {
        plan.blink(client).await
    }

    async fn delete(&self, _client: &DashboardClient, _state: &BlinkLedsState) -> Result<Deletion, ProviderError> {
        Ok(Deletion::StateOnly {
            reason: "Blinking LEDs is an action with nothing to delete on the dashboard.".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::{Merge, MergePolicy};
    use crate::validation::validate;
    use serde_json::json;

    #[test]
    fn test_request_without_parameters_is_empty_object() {
        let state = BlinkLedsState {
            serial: Field::from("Q234-ABCD-5678"),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(state.request()).unwrap(), json!({}));
    }

    #[test]
    fn test_request_with_parameters() {
        let state = BlinkLedsState {
            serial: Field::from("Q234-ABCD-5678"),
            parameters: Field::Known(BlinkLedsParameters {
                duration: Field::Known(20),
                period: Field::Null,
                duty: Field::Known(50),
            }),
            item: Field::Unknown,
        };
        assert_eq!(
            serde_json::to_value(state.request()).unwrap(),
            json!({"duration": 20, "duty": 50})
        );
    }

    #[test]
    fn test_post_write_merge_keeps_inputs() {
        let plan = BlinkLedsState {
            serial: Field::from("Q234-ABCD-5678"),
            parameters: Field::Known(BlinkLedsParameters {
                duration: Field::Known(20),
                ..Default::default()
            }),
            item: Field::Unknown,
        };
        let fresh = BlinkLedsState {
            item: Field::Known(BlinkLedsParameters {
                duration: Field::Known(20),
                period: Field::Known(160),
                duty: Field::Known(50),
            }),
            ..Default::default()
        };
        let merged = plan.clone().merge(fresh, MergePolicy::PostWrite);

        assert_eq!(merged.serial, plan.serial);
        assert_eq!(merged.parameters, plan.parameters);
        assert!(merged.item.is_known());
    }

    #[test]
    fn test_schema_validates_parameter_ranges() {
        let schema = ResourceDefinition::schema(&BlinkLedsResource);
        assert!(validate(&schema, &json!({"serial": "Q234", "parameters": {"duration": 20}})).is_empty());
        assert_eq!(
            validate(&schema, &json!({"serial": "Q234", "parameters": {"duty": 95}})).len(),
            1
        );
    }
}
