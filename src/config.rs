use thiserror::Error;
use tracing::{error, info};

/// Environment variables required to reach the Sienge public API.
pub const ENV_SUBDOMAIN: &str = "SIENGE_SUBDOMAIN";
pub const ENV_USER: &str = "SIENGE_USER";
pub const ENV_PASSWORD: &str = "SIENGE_PASSWORD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} environment variable not set")]
    Missing { name: &'static str },
    #[error("{name} environment variable is blank")]
    Blank { name: &'static str },
}

/// Tenant and credentials for one export run, resolved once at startup and
/// passed by reference into the API client.
#[derive(Debug)]
pub struct Config {
    pub subdomain: String,
    pub user: String,
    pub password: String,
}

impl Config {
    /// Reads the three required variables, failing before any network call.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Config {
            subdomain: require_var(ENV_SUBDOMAIN)?,
            user: require_var(ENV_USER)?,
            password: require_var(ENV_PASSWORD)?,
        };
        config.trace_loaded();
        Ok(config)
    }

    pub fn trace_loaded(&self) {
        info!(
            subdomain = %self.subdomain,
            user = %self.user,
            "Loaded Sienge API configuration"
        );
    }
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if value.trim().is_empty() => {
            error!(var = name, "Required environment variable is blank");
            Err(ConfigError::Blank { name })
        }
        Ok(value) => Ok(value),
        Err(_) => {
            error!(var = name, "Required environment variable not set");
            Err(ConfigError::Missing { name })
        }
    }
}
