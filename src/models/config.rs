//! Configuration model loaded from external sources.

use serde::Deserialize;

fn default_token_ttl_secs() -> u64 {
    60 * 60 * 8
}

#[derive(Clone, Debug, Deserialize)]
/// Settings for the HTTP server, read from `config/*.yaml` and `APP_*` variables.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// HMAC key used to sign access tokens.
    pub secret: String,
    pub admin_email: String,
    pub admin_password: String,
    pub admin_name: String,
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
}
