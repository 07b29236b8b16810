//! Offline question bank used whenever the backend cannot produce a usable
//! question.

use super::model::{Difficulty, Question};

struct Entry {
    question: &'static str,
    answer: &'static str,
    explanation: &'static str,
}

const FALLBACK_QUESTIONS: [Entry; 5] = [
    Entry {
        question: "A train travels 240 kilometers in 3 hours. What is its average speed in kilometers per hour?",
        answer: "80",
        explanation: "Average speed = Total distance / Total time = 240 km / 3 hours = 80 km/h",
    },
    Entry {
        question: "If a shirt costs $45 and there's a 20% discount, what's the final price?",
        answer: "36",
        explanation: "20% of $45 = $45 × 0.2 = $9 discount. Final price = $45 - $9 = $36",
    },
    Entry {
        question: "A recipe needs 2.5 cups of flour to make 12 cookies. How many cups are needed for 30 cookies?",
        answer: "6.25",
        explanation: "For 30 cookies (2.5 × 30/12) = 2.5 × 2.5 = 6.25 cups",
    },
    Entry {
        question: "If you save $15 per week, how much will you save in 8 months (assuming 4 weeks per month)?",
        answer: "480",
        explanation: "8 months × 4 weeks × $15 = 32 weeks × $15 = $480",
    },
    Entry {
        question: "A car uses 6 liters of fuel per 100 kilometers. How many liters will it use for a 250km journey?",
        answer: "15",
        explanation: "Fuel needed = (250 km × 6 L) ÷ 100 km = 15 liters",
    },
];

/// Number of entries in the bank.
pub const FALLBACK_LEN: usize = FALLBACK_QUESTIONS.len();

/// Index of the entry served for `difficulty` (`difficulty mod FALLBACK_LEN`).
#[must_use]
pub fn fallback_index(difficulty: Difficulty) -> usize {
    usize::from(difficulty.get()) % FALLBACK_LEN
}

/// The table entry at `index mod FALLBACK_LEN`.
#[must_use]
pub fn fallback_entry(index: usize) -> Question {
    let entry = &FALLBACK_QUESTIONS[index % FALLBACK_LEN];
    Question::from_static(entry.question, entry.answer, entry.explanation)
}

/// Deterministic offline question for a difficulty level.
#[must_use]
pub fn fallback_question(difficulty: Difficulty) -> Question {
    fallback_entry(fallback_index(difficulty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_entry_is_complete() {
        for i in 0..FALLBACK_LEN {
            let q = fallback_entry(i);
            assert!(!q.text().is_empty());
            assert!(q.correct_answer().parse::<f64>().is_ok());
            assert!(!q.explanation().is_empty());
        }
    }

    #[test]
    fn level_five_wraps_to_first_entry() {
        let five = Difficulty::new(5).unwrap();
        assert_eq!(fallback_index(five), 0);
        assert_eq!(fallback_question(five).correct_answer(), "80");
        assert_eq!(fallback_question(Difficulty::new(1).unwrap()).correct_answer(), "36");
    }
}
