//! Configuration model loaded from external sources.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Twilio Client error code for an expired capability token.
pub const DEFAULT_TOKEN_EXPIRED_CODE: u32 = 31205;

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_token_url() -> String {
    "/click-to-call/token/".to_string()
}

fn default_token_expired_code() -> u32 {
    DEFAULT_TOKEN_EXPIRED_CODE
}

fn default_call_interval_secs() -> u64 {
    3
}

fn default_storage_path() -> String {
    "ccc-console-storage.json".to_string()
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
/// Settings shared by the REST client and the console view-models.
pub struct ClientConfig {
    pub base_url: String,
    #[serde(default)]
    pub csrf_token: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_token_expired_code")]
    pub token_expired_code: u32,
    /// Pause between two auto-dialed calls.
    #[serde(default = "default_call_interval_secs")]
    pub call_interval_secs: u64,
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
}

impl ClientConfig {
    /// Loads `config/default`, then `config/{app_env}`, then `APP_*`
    /// environment variables, each layer overriding the previous one.
    pub fn load(app_env: &str) -> Result<Self, ConfigError> {
        Self::load_from("config", app_env)
    }

    pub fn load_from(dir: &str, app_env: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(&format!("{dir}/default")).required(false))
            .add_source(File::with_name(&format!("{dir}/{app_env}")).required(false))
            .add_source(Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }
}
