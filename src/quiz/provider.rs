//! Question Provider: turns (difficulty, topic) into a [`Question`], asking
//! the backend first and falling back to the offline bank on any failure.

use schemars::JsonSchema;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::fallback::{fallback_index, fallback_question};
use super::model::{Difficulty, ProvidedQuestion, Question, QuestionSource, TopicChoice};
use super::prompts::question_prompt;
use crate::core::{ask_with_timeout, LowLevelClient};
use crate::error::GenerationError;
use crate::json_utils::extract_object;

/// The JSON object the backend is asked to produce.
#[derive(Debug, Deserialize, JsonSchema)]
#[schemars(title = "Mental Math Question")]
pub struct QuestionPayload {
    /// The question text shown to the learner
    pub question: String,
    /// The expected answer as a bare number, without units
    pub answer: AnswerValue,
    /// Step-by-step worked solution
    pub explanation: String,
}

/// Models sometimes emit the answer as a JSON number instead of a string.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Number(f64),
}

impl AnswerValue {
    fn into_text(self) -> String {
        match self {
            AnswerValue::Text(text) => text,
            AnswerValue::Number(n) => n.to_string(),
        }
    }
}

/// Pull a complete [`Question`] out of a raw backend reply.
pub fn parse_question_response(raw: &str) -> Result<Question, GenerationError> {
    let payload: QuestionPayload = extract_object(raw).map_err(|source| GenerationError::MalformedPayload {
        source,
        raw: raw.to_string(),
    })?;
    Question::new(payload.question, payload.answer.into_text(), payload.explanation)
}

#[derive(Debug, Clone)]
pub struct QuestionProvider<C> {
    client: C,
    timeout: Duration,
}

impl<C: LowLevelClient> QuestionProvider<C> {
    pub fn new(client: C, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Backend only: the question, or why none could be produced.
    #[instrument(target = "apptitude::provider", skip(self), fields(difficulty = difficulty.get()))]
    pub async fn try_generate(&self, difficulty: Difficulty, topic: &str) -> Result<Question, GenerationError> {
        let prompt = question_prompt::<QuestionPayload>(difficulty, topic);
        let raw = ask_with_timeout(&self.client, prompt, self.timeout).await?;
        debug!(target: "apptitude::provider", response = %raw, "Question response received");
        parse_question_response(&raw)
    }

    /// Always yields a question; backend failures degrade to the offline bank.
    pub async fn request(&self, difficulty: Difficulty, topic: &str) -> ProvidedQuestion {
        match self.try_generate(difficulty, topic).await {
            Ok(question) => {
                info!(target: "apptitude::provider", difficulty = difficulty.get(), topic, "Generated question from backend");
                ProvidedQuestion {
                    question,
                    source: QuestionSource::Backend,
                    topic: topic.to_string(),
                }
            }
            Err(e) => {
                warn!(
                    target: "apptitude::provider",
                    error = %e,
                    difficulty = difficulty.get(),
                    index = fallback_index(difficulty),
                    "Question generation failed, using fallback question"
                );
                ProvidedQuestion {
                    question: fallback_question(difficulty),
                    source: QuestionSource::Fallback,
                    topic: topic.to_string(),
                }
            }
        }
    }

    /// Resolve `topic` (picking one when it is `Random`) and request a question.
    pub async fn request_question(&self, difficulty: Difficulty, topic: &TopicChoice) -> Question {
        let topic = topic.resolve(&mut rand::thread_rng());
        self.request(difficulty, &topic).await.question
    }
}
