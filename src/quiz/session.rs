//! Per-user practice session: level, topic, the current question cycle and
//! the running score.
//!
//! A cycle moves `Idle -> Generated -> Answered -> Explained`, and the next
//! question starts again from `Idle`. Skipping goes straight from
//! `Generated` to `Explained`.
//!
//! Backend work happens outside the session. Each request is tied to the
//! cycle it was started for through a [`Ticket`]; once the cycle moves on (a
//! newer request, a level or topic change) results carrying the old ticket
//! are rejected with [`SessionError::Superseded`] instead of being applied.

use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{debug, info};

use super::model::{Difficulty, ProvidedQuestion, Question, QuestionSource, TopicChoice};
use super::validator::ValidationResult;
use crate::error::SessionError;

/// Running tally. Skips count toward `total` but not `correct`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    correct: u32,
    total: u32,
}

impl Score {
    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn record_answer(&mut self, is_correct: bool) {
        self.total = self.total.saturating_add(1);
        if is_correct {
            self.correct = self.correct.saturating_add(1);
        }
    }

    pub fn record_skip(&mut self) {
        self.total = self.total.saturating_add(1);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fraction of questions answered correctly; `None` before the first one.
    #[must_use]
    pub fn accuracy(&self) -> Option<f64> {
        (self.total > 0).then(|| f64::from(self.correct) / f64::from(self.total))
    }
}

/// How a question cycle ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Answered { answer: String, result: ValidationResult },
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Generated {
        question: Question,
        source: QuestionSource,
        asked_at: DateTime<Utc>,
    },
    Answered {
        question: Question,
        source: QuestionSource,
        asked_at: DateTime<Utc>,
        answer: String,
    },
    Explained {
        question: Question,
        outcome: Outcome,
        time_taken: chrono::Duration,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Idle,
    Generated,
    Answered,
    Explained,
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PhaseKind::Idle => "idle",
            PhaseKind::Generated => "a question is waiting for an answer",
            PhaseKind::Answered => "an answer is being checked",
            PhaseKind::Explained => "showing the explanation",
        })
    }
}

impl Phase {
    #[must_use]
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Idle => PhaseKind::Idle,
            Phase::Generated { .. } => PhaseKind::Generated,
            Phase::Answered { .. } => PhaseKind::Answered,
            Phase::Explained { .. } => PhaseKind::Explained,
        }
    }
}

/// Proof that a backend result belongs to a particular question cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Ticket {
    #[must_use]
    pub fn cycle(self) -> u64 {
        self.0
    }
}

/// A submitted answer waiting for its verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAnswer {
    pub ticket: Ticket,
    pub question: Question,
    pub answer: String,
}

#[derive(Debug, Clone)]
pub struct Session {
    level: Difficulty,
    topic: TopicChoice,
    phase: Phase,
    score: Score,
    cycle: u64,
}

fn invalid(action: &'static str, phase: PhaseKind) -> SessionError {
    SessionError::InvalidTransition { action, phase }
}

impl Session {
    pub fn new(level: Difficulty, topic: TopicChoice) -> Self {
        Self {
            level,
            topic,
            phase: Phase::Idle,
            score: Score::default(),
            cycle: 0,
        }
    }

    pub fn level(&self) -> Difficulty {
        self.level
    }

    pub fn topic(&self) -> &TopicChoice {
        &self.topic
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn score(&self) -> Score {
        self.score
    }

    /// The question currently on screen, if any.
    pub fn current_question(&self) -> Option<&Question> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Generated { question, .. }
            | Phase::Answered { question, .. }
            | Phase::Explained { question, .. } => Some(question),
        }
    }

    /// Start a new question cycle. Any outstanding request becomes stale,
    /// including a verdict still being checked; that answer is not scored.
    pub fn begin_question(&mut self) -> Result<Ticket, SessionError> {
        match self.phase.kind() {
            PhaseKind::Idle | PhaseKind::Answered | PhaseKind::Explained => {
                self.cycle += 1;
                self.phase = Phase::Idle;
                debug!(target: "apptitude::session", cycle = self.cycle, "Requesting question");
                Ok(Ticket(self.cycle))
            }
            kind => Err(invalid("request a new question", kind)),
        }
    }

    fn check_ticket(&self, ticket: Ticket) -> Result<(), SessionError> {
        if ticket.0 == self.cycle {
            Ok(())
        } else {
            Err(SessionError::Superseded {
                ticket: ticket.0,
                current: self.cycle,
            })
        }
    }

    /// Show the question produced for `ticket`.
    pub fn complete_question(&mut self, ticket: Ticket, provided: ProvidedQuestion) -> Result<&Question, SessionError> {
        self.check_ticket(ticket)?;
        if self.phase.kind() != PhaseKind::Idle {
            return Err(invalid("show a question", self.phase.kind()));
        }
        info!(target: "apptitude::session", cycle = self.cycle, source = ?provided.source, "Question ready");
        self.phase = Phase::Generated {
            question: provided.question,
            source: provided.source,
            asked_at: Utc::now(),
        };
        self.current_question().ok_or_else(|| invalid("show a question", PhaseKind::Idle))
    }

    /// Submit an answer to the current question.
    pub fn submit(&mut self, answer: &str) -> Result<PendingAnswer, SessionError> {
        let answer = answer.trim();
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Generated {
                question,
                source,
                asked_at,
            } => {
                if answer.is_empty() {
                    self.phase = Phase::Generated {
                        question,
                        source,
                        asked_at,
                    };
                    return Err(SessionError::EmptyAnswer);
                }
                let pending = PendingAnswer {
                    ticket: Ticket(self.cycle),
                    question: question.clone(),
                    answer: answer.to_string(),
                };
                self.phase = Phase::Answered {
                    question,
                    source,
                    asked_at,
                    answer: answer.to_string(),
                };
                Ok(pending)
            }
            other => {
                let kind = other.kind();
                self.phase = other;
                Err(invalid("submit an answer", kind))
            }
        }
    }

    /// Apply the verdict for a submitted answer and move on to the explanation.
    pub fn record_verdict(&mut self, ticket: Ticket, result: ValidationResult) -> Result<ValidationResult, SessionError> {
        self.check_ticket(ticket)?;
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Answered {
                question,
                asked_at,
                answer,
                ..
            } => {
                self.score.record_answer(result.is_correct);
                info!(
                    target: "apptitude::session",
                    cycle = self.cycle,
                    is_correct = result.is_correct,
                    correct = self.score.correct(),
                    total = self.score.total(),
                    "Answer recorded"
                );
                self.phase = Phase::Explained {
                    question,
                    outcome: Outcome::Answered { answer, result },
                    time_taken: Utc::now() - asked_at,
                };
                Ok(result)
            }
            other => {
                let kind = other.kind();
                self.phase = other;
                Err(invalid("record a verdict", kind))
            }
        }
    }

    /// Give up on the current question and reveal the explanation.
    pub fn skip(&mut self) -> Result<Question, SessionError> {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Generated { question, asked_at, .. } => {
                self.score.record_skip();
                info!(target: "apptitude::session", cycle = self.cycle, total = self.score.total(), "Question skipped");
                self.phase = Phase::Explained {
                    question: question.clone(),
                    outcome: Outcome::Skipped,
                    time_taken: Utc::now() - asked_at,
                };
                Ok(question)
            }
            other => {
                let kind = other.kind();
                self.phase = other;
                Err(invalid("skip", kind))
            }
        }
    }

    pub fn reset_score(&mut self) {
        info!(target: "apptitude::session", "Score reset");
        self.score.reset();
    }

    /// Change the level. A real change abandons the current cycle.
    pub fn set_level(&mut self, level: Difficulty) -> bool {
        if level == self.level {
            return false;
        }
        self.level = level;
        self.abandon_cycle();
        true
    }

    /// Change the topic. A real change abandons the current cycle.
    pub fn set_topic(&mut self, topic: TopicChoice) -> bool {
        if topic == self.topic {
            return false;
        }
        self.topic = topic;
        self.abandon_cycle();
        true
    }

    fn abandon_cycle(&mut self) {
        self.cycle += 1;
        self.phase = Phase::Idle;
        debug!(target: "apptitude::session", cycle = self.cycle, "Cycle abandoned");
    }
}
