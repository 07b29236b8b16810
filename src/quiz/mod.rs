pub mod compare;
pub mod fallback;
pub mod model;
pub mod prompts;
pub mod provider;
pub mod session;
pub mod tutor;
pub mod validator;

pub use compare::answers_match;
pub use model::{Difficulty, ProvidedQuestion, Question, QuestionSource, Topic, TopicChoice};
pub use provider::{parse_question_response, QuestionProvider};
pub use session::{Outcome, Phase, PhaseKind, Score, Session, Ticket};
pub use tutor::Tutor;
pub use validator::{AnswerValidator, ValidationResult, VerdictSource};
