use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::{
    core::{lock, LowLevelClient, Prompt},
    error::AIError,
};

/// Mock client for testing that always answers with an empty JSON object
#[derive(Debug, Clone, Default)]
pub struct MockVoid;

#[async_trait]
impl LowLevelClient for MockVoid {
    async fn ask_raw(&self, _prompt: Prompt) -> Result<String, AIError> {
        Ok("{}".to_string())
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        Box::new(self.clone())
    }
}

/// One scripted reply for [`MockClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    Text(String),
    Fail(String),
    Delayed(Duration, Box<MockResponse>),
}

impl MockResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(message.into())
    }

    pub fn delayed(delay: Duration, inner: MockResponse) -> Self {
        Self::Delayed(delay, Box::new(inner))
    }
}

/// Control side of a [`MockClient`]: queue replies, inspect prompts.
#[derive(Debug, Default)]
pub struct MockHandle {
    responses: Mutex<VecDeque<MockResponse>>,
    prompts: Mutex<Vec<Prompt>>,
}

impl MockHandle {
    pub fn push(&self, response: MockResponse) {
        lock(&self.responses).push_back(response);
    }

    pub fn push_text(&self, text: impl Into<String>) {
        self.push(MockResponse::text(text));
    }

    pub fn push_failure(&self, message: impl Into<String>) {
        self.push(MockResponse::fail(message));
    }

    /// Every prompt received so far, in call order.
    pub fn prompts(&self) -> Vec<Prompt> {
        lock(&self.prompts).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }

    pub fn remaining(&self) -> usize {
        lock(&self.responses).len()
    }
}

/// Mock client replaying queued responses. An empty queue is a backend error.
#[derive(Debug, Clone)]
pub struct MockClient {
    handle: Arc<MockHandle>,
}

impl MockClient {
    pub fn new() -> (Self, Arc<MockHandle>) {
        Self::with_responses(Vec::new())
    }

    pub fn with_responses(responses: Vec<MockResponse>) -> (Self, Arc<MockHandle>) {
        let handle = Arc::new(MockHandle {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        });
        (Self { handle: handle.clone() }, handle)
    }
}

#[async_trait]
impl LowLevelClient for MockClient {
    async fn ask_raw(&self, prompt: Prompt) -> Result<String, AIError> {
        lock(&self.handle.prompts).push(prompt);
        let next = lock(&self.handle.responses).pop_front();

        let mut response = next.ok_or_else(|| AIError::Mock("no scripted response".to_string()))?;
        loop {
            match response {
                MockResponse::Text(text) => return Ok(text),
                MockResponse::Fail(message) => return Err(AIError::Mock(message)),
                MockResponse::Delayed(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    response = *inner;
                }
            }
        }
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        Box::new(self.clone())
    }
}
