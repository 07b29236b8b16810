use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{GenerationError, InputError};

/// Question difficulty, 1 (easiest) to 5 (hardest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(level: u8) -> Result<Self, InputError> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(InputError::InvalidDifficulty(level))
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Every level, easiest first.
    pub fn all() -> impl Iterator<Item = Difficulty> {
        (Self::MIN..=Self::MAX).map(Difficulty)
    }

    /// What the level means, phrased for a prompt.
    #[must_use]
    pub fn descriptor(self) -> &'static str {
        match self.0 {
            1 => "single-step arithmetic with small whole numbers",
            2 => "one or two steps with whole numbers or simple percentages",
            3 => "two-step everyday problems involving percentages, ratios or decimals",
            4 => "multi-step word problems that need careful mental bookkeeping",
            _ => "challenging multi-step problems combining several concepts",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = InputError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Topic {
    Arithmetic,
    Percentages,
    FractionsDecimals,
    RatiosProportions,
    SpeedDistanceTime,
    ProfitLoss,
    SimpleInterest,
    Averages,
    TimeWork,
    UnitConversion,
}

impl Topic {
    pub const ALL: [Topic; 10] = [
        Topic::Arithmetic,
        Topic::Percentages,
        Topic::FractionsDecimals,
        Topic::RatiosProportions,
        Topic::SpeedDistanceTime,
        Topic::ProfitLoss,
        Topic::SimpleInterest,
        Topic::Averages,
        Topic::TimeWork,
        Topic::UnitConversion,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Topic::Arithmetic => "Arithmetic",
            Topic::Percentages => "Percentages",
            Topic::FractionsDecimals => "Fractions & Decimals",
            Topic::RatiosProportions => "Ratios & Proportions",
            Topic::SpeedDistanceTime => "Speed, Distance & Time",
            Topic::ProfitLoss => "Profit & Loss",
            Topic::SimpleInterest => "Simple Interest",
            Topic::Averages => "Averages",
            Topic::TimeWork => "Time & Work",
            Topic::UnitConversion => "Unit Conversion",
        }
    }

    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Topic::Arithmetic => "arithmetic",
            Topic::Percentages => "percentages",
            Topic::FractionsDecimals => "fractions",
            Topic::RatiosProportions => "ratios",
            Topic::SpeedDistanceTime => "speed",
            Topic::ProfitLoss => "profit",
            Topic::SimpleInterest => "interest",
            Topic::Averages => "averages",
            Topic::TimeWork => "work",
            Topic::UnitConversion => "units",
        }
    }

    fn lookup(name: &str) -> Option<Topic> {
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(name) || t.slug().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The user's topic selection. `Random` is resolved locally, never by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TopicChoice {
    #[default]
    Random,
    Topic(Topic),
    Custom(String),
}

impl TopicChoice {
    /// Pick the concrete topic to put in the prompt.
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        match self {
            TopicChoice::Random => Topic::ALL[rng.gen_range(0..Topic::ALL.len())].label().to_string(),
            TopicChoice::Topic(topic) => topic.label().to_string(),
            TopicChoice::Custom(name) => name.clone(),
        }
    }
}

impl FromStr for TopicChoice {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() || name.eq_ignore_ascii_case("random") {
            return Ok(TopicChoice::Random);
        }
        Ok(match Topic::lookup(name) {
            Some(topic) => TopicChoice::Topic(topic),
            None => TopicChoice::Custom(name.to_string()),
        })
    }
}

impl fmt::Display for TopicChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopicChoice::Random => f.write_str("Random"),
            TopicChoice::Topic(topic) => f.write_str(topic.label()),
            TopicChoice::Custom(name) => f.write_str(name),
        }
    }
}

/// A question with its expected answer and worked explanation.
///
/// All three fields are non-empty. `correct_answer` is usually a number but
/// may be any token; see [`crate::quiz::compare::answers_match`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    text: String,
    correct_answer: String,
    explanation: String,
}

impl Question {
    pub fn new(
        text: impl Into<String>,
        correct_answer: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Result<Self, GenerationError> {
        let text = non_empty(text.into(), "question")?;
        let correct_answer = non_empty(correct_answer.into(), "answer")?;
        let explanation = non_empty(explanation.into(), "explanation")?;
        Ok(Self {
            text,
            correct_answer,
            explanation,
        })
    }

    /// Built-in questions are known to be complete.
    pub(crate) fn from_static(text: &'static str, correct_answer: &'static str, explanation: &'static str) -> Self {
        Self {
            text: text.to_string(),
            correct_answer: correct_answer.to_string(),
            explanation: explanation.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }
}

fn non_empty(value: String, field: &'static str) -> Result<String, GenerationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(GenerationError::MissingField(field))
    } else if trimmed.len() == value.len() {
        Ok(value)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Where a question came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuestionSource {
    Backend,
    Fallback,
}

/// The provider's full reply: the question plus provenance for the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvidedQuestion {
    pub question: Question,
    pub source: QuestionSource,
    pub topic: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn difficulty_bounds() {
        assert!(Difficulty::new(0).is_err());
        assert_eq!(Difficulty::new(6), Err(InputError::InvalidDifficulty(6)));
        assert_eq!(Difficulty::all().map(Difficulty::get).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert_eq!(Difficulty::default().get(), 1);
    }

    #[test]
    fn topic_choice_parsing() {
        assert_eq!("".parse::<TopicChoice>().unwrap(), TopicChoice::Random);
        assert_eq!("RANDOM".parse::<TopicChoice>().unwrap(), TopicChoice::Random);
        assert_eq!(
            "profit & loss".parse::<TopicChoice>().unwrap(),
            TopicChoice::Topic(Topic::ProfitLoss)
        );
        assert_eq!("speed".parse::<TopicChoice>().unwrap(), TopicChoice::Topic(Topic::SpeedDistanceTime));
        assert_eq!(
            " Compound growth ".parse::<TopicChoice>().unwrap(),
            TopicChoice::Custom("Compound growth".to_string())
        );
    }

    #[test]
    fn random_topic_resolves_to_enumerated_label() {
        let mut rng = StdRng::seed_from_u64(7);
        let labels: Vec<&str> = Topic::ALL.iter().map(|t| t.label()).collect();
        for _ in 0..50 {
            let picked = TopicChoice::Random.resolve(&mut rng);
            assert!(labels.contains(&picked.as_str()), "{picked}");
        }
        assert_eq!(TopicChoice::Topic(Topic::Averages).resolve(&mut rng), "Averages");
    }

    #[test]
    fn question_fields_must_be_non_empty() {
        assert!(matches!(
            Question::new("What is 2+2?", "  ", "2+2=4"),
            Err(GenerationError::MissingField("answer"))
        ));
        assert!(matches!(Question::new("", "4", "x"), Err(GenerationError::MissingField("question"))));
        let q = Question::new(" What is 2+2? ", "4", "2+2=4").unwrap();
        assert_eq!(q.text(), "What is 2+2?");
    }
}
