use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::entity::Entity;
use crate::domain::types::{ContactId, GroupId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    pub id: ContactId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Every other server field, round-tripped untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Contact {
    /// Dialable phone number, if the contact has a non-blank one.
    pub fn dialable_phone(&self) -> Option<&str> {
        self.phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

impl Entity for Contact {
    type Id = ContactId;
    const ENDPOINT: &'static str = "/api/contacts/";
    const LABEL: &'static str = "Contact";

    fn id(&self) -> ContactId {
        self.id
    }
}

/// Contact group, used as a filter lookup.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ContactGroup {
    pub id: GroupId,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for ContactGroup {
    type Id = GroupId;
    const ENDPOINT: &'static str = "/api/contacts/groups/";
    const LABEL: &'static str = "Group";

    fn id(&self) -> GroupId {
        self.id
    }
}
