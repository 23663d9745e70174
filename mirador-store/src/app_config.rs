use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub business_rules: BusinessRules,
}

/// Tunable domain numbers. Everything has a default so a bare config file
/// still boots.
#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    /// Substring of the extras summary that marks it commissionable.
    #[serde(default = "default_commission_marker")]
    pub commission_marker: String,
    /// Commission paid per marked item, in minor units.
    #[serde(default = "default_commission_per_item")]
    pub commission_per_item_cents: i64,
    #[serde(default = "default_bid_expiry_hours")]
    pub bid_expiry_hours: i64,
    #[serde(default = "default_alert_ttl_ms")]
    pub alert_ttl_ms: u64,
}

fn default_commission_marker() -> String {
    "cava".to_string()
}
fn default_commission_per_item() -> i64 {
    200
}
fn default_bid_expiry_hours() -> i64 {
    24
}
fn default_alert_ttl_ms() -> u64 {
    4000
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            commission_marker: default_commission_marker(),
            commission_per_item_cents: default_commission_per_item(),
            bid_expiry_hours: default_bid_expiry_hours(),
            alert_ttl_ms: default_alert_ttl_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    5
}
fn default_acquire_timeout_secs() -> u64 {
    3
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("MIRADOR").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
