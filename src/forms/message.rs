use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{ContactId, PhoneNumber};
use crate::dto::api::SendMessagePayload;
use crate::forms::FormError;

#[derive(Clone, Debug, Deserialize, Validate)]
/// Form data for sending one personalized message to a typed-in number.
pub struct SendMessageForm {
    #[validate(length(min = 1, message = "Please select a number to use"))]
    pub from_: String,
    #[validate(length(min = 1, message = "Please enter a number"))]
    pub to: String,
}

impl TryFrom<SendMessageForm> for SendMessagePayload {
    type Error = FormError;

    fn try_from(form: SendMessageForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(SendMessagePayload {
            from_: PhoneNumber::new(form.from_)?,
            contacts: Vec::new(),
            to: Some(PhoneNumber::new(form.to)?),
        })
    }
}

/// Builds the payload for sending to a list of contacts.
pub fn contacts_payload(from: &PhoneNumber, contacts: &[ContactId]) -> SendMessagePayload {
    SendMessagePayload {
        from_: from.clone(),
        contacts: contacts.to_vec(),
        to: None,
    }
}
