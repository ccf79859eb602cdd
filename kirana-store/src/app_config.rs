use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    /// Remote calls exceeding this budget are treated as transport
    /// failures and the per-order lock is released.
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Artificial latency for the in-process order service, used to widen
    /// race windows during development.
    #[serde(default)]
    pub simulated_latency_ms: u64,
}

fn default_timeout_ms() -> u64 {
    5_000
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Environment overlay is optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("KIRANA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
