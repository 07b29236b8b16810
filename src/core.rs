//! The backend capability every provider implements: a role-tagged prompt
//! goes in, the model's raw text comes out.
//!
//! Question generation and answer judging only ever talk to a backend
//! through [`LowLevelClient`], so providers are interchangeable and tests can
//! script replies with [`crate::clients::mock::MockClient`].

use crate::error::AIError;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::warn;

/// A two-part chat prompt: persona/instructions plus the user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// Combined length in bytes, used for log fields.
    pub fn len(&self) -> usize {
        self.system.len() + self.user.len()
    }

    pub fn is_empty(&self) -> bool {
        self.system.is_empty() && self.user.is_empty()
    }
}

/// Low-level model client abstraction.
///
/// Implementors provide `ask_raw`, which executes a prompt and returns the raw
/// model text. Parsing is the caller's job.
#[async_trait]
pub trait LowLevelClient: Send + Sync + Debug {
    /// The only method that implementations must provide
    async fn ask_raw(&self, prompt: Prompt) -> Result<String, AIError>;

    /// Clone this client into a boxed trait object
    fn clone_box(&self) -> Box<dyn LowLevelClient>;
}

impl Clone for Box<dyn LowLevelClient> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[async_trait]
impl LowLevelClient for Box<dyn LowLevelClient> {
    async fn ask_raw(&self, prompt: Prompt) -> Result<String, AIError> {
        self.as_ref().ask_raw(prompt).await
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        self.as_ref().clone_box()
    }
}

/// Run one backend call, giving up after `limit`.
///
/// There are no retries: an expired call is reported as
/// [`AIError::Timeout`] and the caller degrades to its local fallback.
pub async fn ask_with_timeout<C>(client: &C, prompt: Prompt, limit: Duration) -> Result<String, AIError>
where
    C: LowLevelClient + ?Sized,
{
    match tokio::time::timeout(limit, client.ask_raw(prompt)).await {
        Ok(result) => result,
        Err(_) => {
            warn!(timeout_ms = limit.as_millis() as u64, "Backend call timed out");
            Err(AIError::Timeout(limit))
        }
    }
}

/// Lock `m`, recovering the guard if a previous holder panicked.
pub fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
