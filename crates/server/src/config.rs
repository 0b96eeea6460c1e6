//! Application configuration

use std::env;
use std::time::Duration;

use navms_resolver::directory;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_address: String,

    // Redirect table
    pub redirects_path: String,

    // Tenant directory
    pub directory_endpoint: String,
    pub directory_timeout: Duration,

    // Destination for every failure path (optionally annotated with a
    // msg reason code)
    pub fallback_url: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),

            redirects_path: env::var("REDIRECTS_PATH")
                .unwrap_or_else(|_| "redirects.json".to_string()),

            directory_endpoint: env::var("DIRECTORY_ENDPOINT")
                .unwrap_or_else(|_| directory::DEFAULT_ENDPOINT.to_string()),
            directory_timeout: Duration::from_millis(
                env::var("DIRECTORY_TIMEOUT_MS")
                    .unwrap_or_else(|_| "300".to_string())
                    .parse()
                    .unwrap_or(300),
            ),

            fallback_url: {
                let url = env::var("FALLBACK_URL")
                    .unwrap_or_else(|_| "https://github.com/justiniven/nav.ms".to_string());
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(ConfigError::Invalid(
                        "FALLBACK_URL must be an absolute http(s) URL",
                    ));
                }
                url
            },
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}
