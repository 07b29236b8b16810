use std::env;
use std::time::Duration;

use crate::clients::flexible::ClientType;
use crate::error::ConfigError;

pub const PROVIDER_VAR: &str = "APPTITUDE_PROVIDER";
pub const MODEL_VAR: &str = "APPTITUDE_MODEL";
pub const TIMEOUT_VAR: &str = "APPTITUDE_TIMEOUT_SECS";
pub const BASE_URL_VAR: &str = "APPTITUDE_BASE_URL";

pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Clients that read their credential from a named environment variable
pub trait KeyFromEnv {
    /// The environment variable name for this client's API key
    const KEY_NAME: &'static str;
}

/// Everything needed to build a backend client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub provider: ClientType,
    pub api_key: String,
    /// Overrides the provider's default model id.
    pub model: Option<String>,
    /// Overrides the provider's default endpoint.
    pub base_url: Option<String>,
    pub timeout: Duration,
}

impl AppConfig {
    /// Read configuration from the process environment (after loading `.env`),
    /// letting `overrides` win over the environment key by key.
    pub fn from_env_with<F>(overrides: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| overrides(key).or_else(|| env::var(key).ok()))
    }

    /// Read configuration through an arbitrary key lookup.
    ///
    /// Fails when the selected provider's credential is missing: the tool
    /// must not start without one.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let provider = match get(PROVIDER_VAR) {
            Some(name) => name.parse::<ClientType>()?,
            None => ClientType::default(),
        };

        let key_name = provider.key_name();
        let api_key = get(key_name).ok_or(ConfigError::MissingCredential { key: key_name })?;

        let timeout = match get(TIMEOUT_VAR) {
            Some(raw) => parse_timeout(&raw)?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            provider,
            api_key,
            model: get(MODEL_VAR),
            base_url: get(BASE_URL_VAR),
            timeout,
        })
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        key: TIMEOUT_VAR,
        value: raw.to_string(),
        reason: reason.to_string(),
    };
    match raw.parse::<u64>() {
        Ok(0) => Err(invalid("timeout must be at least one second")),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(invalid(&e.to_string())),
    }
}
