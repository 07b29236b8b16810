use crate::clients::claude::{ClaudeClient, ClaudeConfig, ClaudeModel};
use crate::clients::mock::{MockClient, MockHandle, MockResponse};
use crate::clients::xai::{XaiClient, XaiConfig, XaiModel};
use crate::config::{AppConfig, KeyFromEnv};
use crate::core::{LowLevelClient, Prompt};
use crate::error::{AIError, ConfigError};
use async_trait::async_trait;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

/// Backend provider selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientType {
    #[default]
    Xai,
    Claude,
}

impl ClientType {
    /// Environment variable holding this provider's credential
    pub fn key_name(self) -> &'static str {
        match self {
            ClientType::Xai => XaiClient::KEY_NAME,
            ClientType::Claude => ClaudeClient::KEY_NAME,
        }
    }
}

impl FromStr for ClientType {
    type Err = ConfigError;

    /// Parse client type from string (case insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xai" | "grok" => Ok(Self::Xai),
            "claude" | "anthropic" => Ok(Self::Claude),
            _ => Err(ConfigError::UnknownProvider(s.to_string())),
        }
    }
}

impl std::fmt::Display for ClientType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientType::Xai => write!(f, "xAI"),
            ClientType::Claude => write!(f, "Claude"),
        }
    }
}

/// Flexible client that wraps any LowLevelClient and provides factory functions
#[derive(Debug, Clone)]
pub struct FlexibleClient {
    inner: Arc<dyn LowLevelClient>,
}

impl FlexibleClient {
    /// Create a new FlexibleClient wrapping the given client
    pub fn new(client: Box<dyn LowLevelClient>) -> Self {
        Self {
            inner: Arc::from(client),
        }
    }

    /// Build the provider named by `config`, applying its overrides.
    pub fn from_config(config: &AppConfig) -> Self {
        info!(provider = %config.provider, timeout_secs = config.timeout.as_secs(), "Building backend client");
        match config.provider {
            ClientType::Xai => {
                let mut xai = XaiConfig::new(config.api_key.clone()).with_timeout(config.timeout);
                if let Some(model) = &config.model {
                    xai = xai.with_model(XaiModel::from_id(model));
                }
                if let Some(base_url) = &config.base_url {
                    xai = xai.with_base_url(base_url.clone());
                }
                Self::xai(xai)
            }
            ClientType::Claude => {
                let model = config
                    .model
                    .as_deref()
                    .map(ClaudeModel::from_id)
                    .unwrap_or_default();
                let mut claude = ClaudeConfig::anthropic(config.api_key.clone(), model).with_timeout(config.timeout);
                if let Some(base_url) = &config.base_url {
                    claude = claude.with_base_url(base_url.clone());
                }
                Self::claude(claude)
            }
        }
    }

    /// Create a FlexibleClient with an xAI client
    pub fn xai(config: XaiConfig) -> Self {
        Self::new(Box::new(XaiClient::new(config)))
    }

    /// Create a FlexibleClient with a Claude client
    pub fn claude(config: ClaudeConfig) -> Self {
        Self::new(Box::new(ClaudeClient::new(config)))
    }

    /// Create a FlexibleClient with a mock and return the handle for configuration
    pub fn mock() -> (Self, Arc<MockHandle>) {
        Self::new_mock_with_responses(Vec::new())
    }

    /// Create a FlexibleClient mock with predefined responses
    pub fn new_mock_with_responses(responses: Vec<MockResponse>) -> (Self, Arc<MockHandle>) {
        let (mock_client, handle) = MockClient::with_responses(responses);
        (Self::new(Box::new(mock_client)), handle)
    }

    /// Clone out the wrapped client as a boxed trait object
    pub fn into_inner(self) -> Box<dyn LowLevelClient> {
        self.inner.clone_box()
    }
}

#[async_trait]
impl LowLevelClient for FlexibleClient {
    async fn ask_raw(&self, prompt: Prompt) -> Result<String, AIError> {
        self.inner.ask_raw(prompt).await
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        Box::new(self.clone())
    }
}
