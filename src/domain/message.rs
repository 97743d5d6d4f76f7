use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::entity::Entity;
use crate::domain::types::MessageId;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Voice,
    Sms,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Voice => "voice",
            MessageKind::Sms => "sms",
        }
    }
}

impl Display for MessageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageKind::Voice => write!(f, "Call"),
            MessageKind::Sms => write!(f, "SMS"),
        }
    }
}

/// Pre-recorded voice message or SMS template sent on a contact's behalf.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PersonalizedMessage {
    pub id: MessageId,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub audio: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for PersonalizedMessage {
    type Id = MessageId;
    const ENDPOINT: &'static str = "/api/marketing/autodialer/personalized-messages/";
    const LABEL: &'static str = "Message";

    fn id(&self) -> MessageId {
        self.id
    }
}
