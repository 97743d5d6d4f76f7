use serde::Serialize;
use validator::Validate;

use crate::domain::types::{GroupId, normalize_phone_to_e164};

#[derive(Clone, Debug, Default, Serialize, Validate)]
/// Form data for creating or editing a contact.
pub struct ContactForm {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 4, message = "Enter a valid phone number."))]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupId>,
}

impl ContactForm {
    /// Trims every text input, turns blank optionals into `None` and formats
    /// parseable phone numbers as E.164.
    pub fn normalized(mut self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        }
        self.first_name = self.first_name.trim().to_string();
        self.last_name = clean(self.last_name);
        self.email = clean(self.email).map(|e| e.to_lowercase());
        self.phone = clean(self.phone).map(|p| normalize_phone_to_e164(&p).unwrap_or(p));
        self
    }
}
