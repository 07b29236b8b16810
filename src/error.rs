use std::time::Duration;
use thiserror::Error;

use crate::quiz::session::PhaseKind;

#[derive(Error, Debug)]
pub enum AIError {
    #[error("xAI API error: {0}")]
    Xai(#[from] XaiError),
    #[error("Claude API error: {0}")]
    Claude(#[from] ClaudeError),
    #[error("Backend call timed out after {0:?}")]
    Timeout(Duration),
    #[error("Mock error: {0}")]
    Mock(String),
}

#[derive(Error, Debug)]
pub enum XaiError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Rate limit exceeded")]
    RateLimit,
    #[error("Authentication failed")]
    Authentication,
}

#[derive(Error, Debug)]
pub enum ClaudeError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Rate limit exceeded")]
    RateLimit,
    #[error("Authentication failed")]
    Authentication,
}

/// Failure to pull a JSON object out of free-form model text.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("no JSON object found in response")]
    NoObject,
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a backend question could not be used. Always recovered by the
/// fallback table before reaching the caller of `QuestionProvider::request`.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("backend error: {0}")]
    Backend(#[from] AIError),
    #[error("malformed question payload: {source}. Raw response: {raw}")]
    MalformedPayload {
        #[source]
        source: ExtractionError,
        raw: String,
    },
    #[error("required field `{0}` is missing or empty")]
    MissingField(&'static str),
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("backend error: {0}")]
    Backend(#[from] AIError),
    #[error("ambiguous verdict from backend: {0:?}")]
    Ambiguous(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing credential: set {key} in the environment or a .env file")]
    MissingCredential { key: &'static str },
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("unknown provider '{0}'. Supported: xai, claude")]
    UnknownProvider(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot {action} while {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: PhaseKind,
    },
    #[error("result for cycle {ticket} superseded by cycle {current}")]
    Superseded { ticket: u64, current: u64 },
    #[error("answer is empty")]
    EmptyAnswer,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("difficulty must be between 1 and 5, got {0}")]
    InvalidDifficulty(u8),
}
