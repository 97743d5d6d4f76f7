use serde::Serialize;
use validator::{Validate, ValidationError};

#[derive(Clone, Debug, Default, Serialize, Validate)]
#[validate(schema(function = "validate_channels"))]
/// Form data for the first step of the campaign wizard.
pub struct CampaignForm {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub name: String,
    pub use_voice: bool,
    pub use_sms: bool,
    pub use_mms: bool,
    pub use_email: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_campaign: Option<i64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_follow_up: bool,
}

fn validate_channels(form: &CampaignForm) -> Result<(), ValidationError> {
    if form.use_voice || form.use_sms || form.use_mms || form.use_email {
        Ok(())
    } else {
        Err(ValidationError::new("no_channel")
            .with_message("Please turn on at least one channel.".into()))
    }
}
