pub mod models;

pub use models::XaiModel;

use crate::config::{KeyFromEnv, DEFAULT_TIMEOUT_SECS};
use crate::core::{LowLevelClient, Prompt};
use crate::error::{AIError, XaiError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

pub const XAI_BASE_URL: &str = "https://api.x.ai/v1";

#[derive(Debug, Serialize)]
struct XaiRequest {
    model: String,
    messages: Vec<XaiMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct XaiMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct XaiResponse {
    choices: Vec<XaiChoice>,
}

#[derive(Debug, Deserialize)]
struct XaiChoice {
    message: XaiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct XaiResponseMessage {
    content: String,
}

/// Configuration for the xAI (OpenAI-compatible chat completions) client
#[derive(Debug, Clone)]
pub struct XaiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: XaiModel,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for XaiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: XAI_BASE_URL.to_string(),
            model: XaiModel::default(),
            max_tokens: 1024,
            temperature: 0.7,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl XaiConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: XaiModel) -> Self {
        self.model = model;
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Clone, Debug)]
pub struct XaiClient {
    config: XaiConfig,
    client: Client,
}

impl KeyFromEnv for XaiClient {
    const KEY_NAME: &'static str = "XAI_API_KEY";
}

impl XaiClient {
    pub fn new(config: XaiConfig) -> Self {
        info!(model = %config.model.id(), base_url = %config.base_url, "Creating new xAI client");
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Use a preconfigured HTTP client (proxies, TLS roots, connection pools).
    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn config(&self) -> &XaiConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn transport_error(&self, e: reqwest::Error) -> AIError {
        if e.is_timeout() {
            warn!(error = %e, "xAI request timed out");
            AIError::Timeout(self.config.timeout)
        } else {
            error!(error = %e, "HTTP request failed");
            AIError::Xai(XaiError::Http(e.to_string()))
        }
    }
}

#[async_trait]
impl LowLevelClient for XaiClient {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len(), model = %self.config.model.id()))]
    async fn ask_raw(&self, prompt: Prompt) -> Result<String, AIError> {
        debug!(model = %self.config.model.id(), prompt_len = prompt.len(), "Preparing xAI API request");

        let request = XaiRequest {
            model: self.config.model.id().to_string(),
            messages: vec![
                XaiMessage {
                    role: "system",
                    content: prompt.system,
                },
                XaiMessage {
                    role: "user",
                    content: prompt.user,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!("Sending request to xAI API");
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        debug!(status = %response.status(), "Received response from xAI API");

        if response.status() == 429 {
            warn!("xAI API rate limit exceeded");
            return Err(AIError::Xai(XaiError::RateLimit));
        }

        if response.status() == 401 {
            error!("xAI API authentication failed");
            return Err(AIError::Xai(XaiError::Authentication));
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "xAI API error");
            return Err(AIError::Xai(XaiError::Api(error_text)));
        }

        let xai_response: XaiResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse xAI response JSON");
            self.transport_error(e)
        })?;

        debug!(choices_count = xai_response.choices.len(), "Parsed xAI response");

        let result = xai_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AIError::Xai(XaiError::Api("No choices in response".to_string())));

        match &result {
            Ok(text) => info!(response_len = text.len(), "Successfully received xAI response"),
            Err(e) => error!(error = %e, "Failed to extract content from xAI response"),
        }

        result
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        Box::new(self.clone())
    }
}
