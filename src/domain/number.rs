use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::entity::Entity;
use crate::domain::types::NumberId;

/// A provisioned phone number engaged by a campaign or survey.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EngagedNumber {
    pub id: NumberId,
    pub twilio_number: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for EngagedNumber {
    type Id = NumberId;
    const ENDPOINT: &'static str = "/api/marketing/engaged-phone-numbers/";
    const LABEL: &'static str = "Number";

    fn id(&self) -> NumberId {
        self.id
    }
}
