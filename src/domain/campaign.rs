use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::entity::Entity;
use crate::domain::types::CampaignId;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Campaign {
    pub id: CampaignId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub use_voice: bool,
    #[serde(default)]
    pub use_sms: bool,
    #[serde(default)]
    pub use_mms: bool,
    #[serde(default)]
    pub use_email: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Campaign {
    type Id = CampaignId;
    const ENDPOINT: &'static str = "/api/marketing/campaigns/";
    const LABEL: &'static str = "Campaign";

    fn id(&self) -> CampaignId {
        self.id
    }
}
