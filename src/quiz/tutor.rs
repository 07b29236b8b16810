use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Mutex;
use std::time::Duration;
use tracing::instrument;

use super::model::ProvidedQuestion;
use super::provider::QuestionProvider;
use super::session::Session;
use super::validator::{AnswerValidator, ValidationResult};
use crate::clients::flexible::FlexibleClient;
use crate::config::AppConfig;
use crate::core::{lock, LowLevelClient};
use crate::error::SessionError;

/// Drives a [`Session`] through question cycles against one backend.
///
/// The session lock is only held for the synchronous state changes, never
/// while a backend call is in flight, so a host may start a newer request (or
/// change level) while an older one is still outstanding.
#[derive(Debug)]
pub struct Tutor<C> {
    provider: QuestionProvider<C>,
    validator: AnswerValidator<C>,
    rng: Mutex<StdRng>,
}

impl<C: LowLevelClient + Clone> Tutor<C> {
    pub fn new(client: C, timeout: Duration) -> Self {
        Self {
            provider: QuestionProvider::new(client.clone(), timeout),
            validator: AnswerValidator::new(client, timeout),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Make random topic picks reproducible.
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }
}

impl Tutor<FlexibleClient> {
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(FlexibleClient::from_config(config), config.timeout)
    }
}

impl<C: LowLevelClient> Tutor<C> {
    pub fn provider(&self) -> &QuestionProvider<C> {
        &self.provider
    }

    pub fn validator(&self) -> &AnswerValidator<C> {
        &self.validator
    }

    /// Fetch the next question and show it, unless a newer cycle has started
    /// in the meantime.
    #[instrument(target = "apptitude::tutor", skip_all)]
    pub async fn next_question(&self, session: &Mutex<Session>) -> Result<ProvidedQuestion, SessionError> {
        let (ticket, level, topic) = {
            let mut s = lock(session);
            let ticket = s.begin_question()?;
            let topic = s.topic().resolve(&mut *lock(&self.rng));
            (ticket, s.level(), topic)
        };

        let provided = self.provider.request(level, &topic).await;

        lock(session).complete_question(ticket, provided.clone())?;
        Ok(provided)
    }

    /// Check an answer to the current question and record the verdict.
    #[instrument(target = "apptitude::tutor", skip_all)]
    pub async fn submit_answer(&self, session: &Mutex<Session>, answer: &str) -> Result<ValidationResult, SessionError> {
        let pending = lock(session).submit(answer)?;

        let result = self
            .validator
            .validate_detailed(&pending.question, &pending.answer)
            .await;

        lock(session).record_verdict(pending.ticket, result)
    }
}
