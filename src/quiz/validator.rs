//! Answer Validator: asks the backend for a `true`/`false` verdict and falls
//! back to [`answers_match`] when the backend fails or is ambiguous.

use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::compare::answers_match;
use super::model::Question;
use super::prompts::verdict_prompt;
use crate::core::{ask_with_timeout, LowLevelClient};
use crate::error::ValidationError;

/// Which path decided a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VerdictSource {
    Backend,
    LocalComparator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub is_correct: bool,
    pub source: VerdictSource,
}

impl ValidationResult {
    pub fn local(question: &Question, user_answer: &str) -> Self {
        Self {
            is_correct: answers_match(user_answer, question.correct_answer()),
            source: VerdictSource::LocalComparator,
        }
    }
}

/// Read a backend verdict. Only the bare tokens `true` and `false` count.
pub fn parse_verdict(raw: &str) -> Result<bool, ValidationError> {
    match raw.trim().to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ValidationError::Ambiguous(raw.to_string())),
    }
}

#[derive(Debug, Clone)]
pub struct AnswerValidator<C> {
    client: C,
    timeout: Duration,
}

impl<C: LowLevelClient> AnswerValidator<C> {
    pub fn new(client: C, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Backend only: the verdict, or why none was given.
    #[instrument(target = "apptitude::validator", skip(self, question, user_answer))]
    pub async fn judge(&self, question: &Question, user_answer: &str) -> Result<bool, ValidationError> {
        let prompt = verdict_prompt(question, user_answer);
        let raw = ask_with_timeout(&self.client, prompt, self.timeout).await?;
        debug!(target: "apptitude::validator", response = %raw, "Verdict response received");
        parse_verdict(&raw)
    }

    /// Never fails: backend errors and ambiguous replies use the local comparator.
    pub async fn validate_detailed(&self, question: &Question, user_answer: &str) -> ValidationResult {
        match self.judge(question, user_answer).await {
            Ok(is_correct) => {
                info!(target: "apptitude::validator", is_correct, "Backend verdict");
                ValidationResult {
                    is_correct,
                    source: VerdictSource::Backend,
                }
            }
            Err(e) => {
                let result = ValidationResult::local(question, user_answer);
                warn!(
                    target: "apptitude::validator",
                    error = %e,
                    is_correct = result.is_correct,
                    "Backend verdict unusable, compared locally"
                );
                result
            }
        }
    }

    pub async fn validate(&self, question: &Question, user_answer: &str) -> bool {
        self.validate_detailed(question, user_answer).await.is_correct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_tokens() {
        assert!(parse_verdict("true").unwrap());
        assert!(parse_verdict("  TRUE\n").unwrap());
        assert!(!parse_verdict("False").unwrap());
        assert!(matches!(parse_verdict("true."), Err(ValidationError::Ambiguous(_))));
        assert!(matches!(parse_verdict("Yes, that is correct"), Err(ValidationError::Ambiguous(_))));
        assert!(matches!(parse_verdict(r#"{"is_correct": true}"#), Err(ValidationError::Ambiguous(_))));
    }
}
