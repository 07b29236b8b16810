pub mod clients;
pub mod config;
pub mod core;
pub mod error;
pub mod json_utils;
pub mod quiz;

// Convenient re-exports
pub use json_utils::extract_object;
pub use quiz::{AnswerValidator, Difficulty, Question, QuestionProvider, Session, TopicChoice, Tutor};
