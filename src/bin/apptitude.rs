use anyhow::{Context, Result};
use apptitude::config::{AppConfig, PROVIDER_VAR, TIMEOUT_VAR};
use apptitude::core::lock;
use apptitude::quiz::{
    Difficulty, Outcome, Phase, ProvidedQuestion, QuestionSource, Session, TopicChoice, Tutor, VerdictSource,
};
use clap::Parser;
use std::sync::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "APPtitude: mental-math practice in the terminal", long_about = None)]
#[command(after_help = "ENVIRONMENT VARIABLES:
    APPTITUDE_PROVIDER      Backend provider (xai|claude), default xai
    XAI_API_KEY             API key for the xAI backend
    ANTHROPIC_API_KEY       API key for the Claude backend
    APPTITUDE_MODEL         Model id override
    APPTITUDE_TIMEOUT_SECS  Backend timeout in seconds, default 20
    APPTITUDE_BASE_URL      Endpoint override
    RUST_LOG                Log filter, default apptitude=warn

COMMANDS (at the prompt):
    <answer>      Submit an answer
    skip          Reveal the explanation without answering
    next          Fetch the next question
    level <1-5>   Change difficulty
    topic <name>  Change topic (or 'random')
    score         Show the running score
    reset         Reset the score
    quit          Leave")]
struct Args {
    /// Backend provider: xai or claude [default: $APPTITUDE_PROVIDER or xai]
    #[arg(short, long)]
    provider: Option<String>,

    /// Starting difficulty, 1 (easiest) to 5 (hardest)
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=5))]
    level: u8,

    /// Topic name or slug, or 'random'
    #[arg(short, long, default_value = "random")]
    topic: String,

    /// Backend timeout in seconds [default: $APPTITUDE_TIMEOUT_SECS or 20]
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[derive(Debug, PartialEq)]
enum Command {
    Answer(String),
    Skip,
    Next,
    Level(Difficulty),
    Topic(TopicChoice),
    Score,
    Reset,
    Help,
    Quit,
}

const USAGE: &str = "Commands: <answer>, skip, next, level <1-5>, topic <name>, score, reset, quit";

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    ///
    /// A line whose first word is a command never becomes an answer: wrong
    /// arguments are a usage error instead.
    fn parse(input: &str) -> Option<Result<Self, String>> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        let (head, rest) = input.split_once(char::is_whitespace).unwrap_or((input, ""));
        let rest = rest.trim();
        let head = head.to_lowercase();

        let no_args = |command: Command| {
            if rest.is_empty() {
                Ok(command)
            } else {
                Err(format!("'{head}' takes no arguments"))
            }
        };

        Some(match head.as_str() {
            "quit" | "exit" => no_args(Command::Quit),
            "skip" => no_args(Command::Skip),
            "next" => no_args(Command::Next),
            "score" => no_args(Command::Score),
            "reset" => no_args(Command::Reset),
            "help" => no_args(Command::Help),
            "level" => rest
                .parse::<u8>()
                .ok()
                .and_then(|n| Difficulty::new(n).ok())
                .map(Command::Level)
                .ok_or_else(|| "usage: level <1-5>".to_string()),
            "topic" => match rest.parse::<TopicChoice>() {
                Ok(topic) => Ok(Command::Topic(topic)),
                Err(never) => match never {},
            },
            _ => Ok(Command::Answer(input.to_string())),
        })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("apptitude=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn print_question(provided: &ProvidedQuestion, session: &Session) {
    println!();
    println!("Level {} · {}", session.level(), provided.topic);
    if provided.source == QuestionSource::Fallback {
        println!("(backend unavailable, using an offline question)");
    }
    println!("Q: {}", provided.question.text());
}

fn print_explanation(session: &Session) {
    if let Phase::Explained {
        question,
        outcome,
        time_taken,
    } = session.phase()
    {
        match outcome {
            Outcome::Answered { result, .. } => {
                let verdict = if result.is_correct { "Correct! Well done!" } else { "Sorry, that's not correct." };
                let how = match result.source {
                    VerdictSource::Backend => "",
                    VerdictSource::LocalComparator => " (checked offline)",
                };
                println!("{verdict}{how}");
            }
            Outcome::Skipped => println!("Skipped."),
        }
        println!("Answer: {}", question.correct_answer());
        println!("Explanation: {}", question.explanation());
        println!("Time: {:.1}s", time_taken.num_milliseconds() as f64 / 1000.0);
        print_score(session);
        println!("Type 'next' for another question.");
    }
}

fn print_score(session: &Session) {
    let score = session.score();
    match score.accuracy() {
        Some(acc) => println!("Score: {}/{} ({:.0}%)", score.correct(), score.total(), acc * 100.0),
        None => println!("Score: 0/0"),
    }
}

async fn ask_next(tutor: &Tutor<apptitude::clients::FlexibleClient>, session: &Mutex<Session>) {
    match tutor.next_question(session).await {
        Ok(provided) => {
            let s = lock(session);
            print_question(&provided, &s);
        }
        Err(e) => println!("{e}"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = AppConfig::from_env_with(|key| match key {
        PROVIDER_VAR => args.provider.clone(),
        TIMEOUT_VAR => args.timeout_secs.map(|secs| secs.to_string()),
        _ => None,
    })
    .context("cannot start without backend configuration")?;

    let level = Difficulty::new(args.level)?;
    let topic: TopicChoice = args.topic.parse()?;
    let tutor = Tutor::from_config(&config);
    let session = Mutex::new(Session::new(level, topic));

    println!("APPtitude: mental math with {} (type 'help' for commands)", config.provider);
    ask_next(&tutor, &session).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let command = match Command::parse(&line) {
            None => continue,
            Some(Ok(command)) => command,
            Some(Err(usage)) => {
                println!("{usage}");
                continue;
            }
        };
        match command {
            Command::Quit => break,
            Command::Help => println!("{USAGE}"),
            Command::Score => print_score(&lock(&session)),
            Command::Reset => {
                let mut s = lock(&session);
                s.reset_score();
                print_score(&s);
            }
            Command::Next => ask_next(&tutor, &session).await,
            Command::Skip => {
                let mut s = lock(&session);
                match s.skip() {
                    Ok(_) => print_explanation(&s),
                    Err(e) => println!("{e}"),
                }
            }
            Command::Answer(answer) => match tutor.submit_answer(&session, &answer).await {
                Ok(_) => print_explanation(&lock(&session)),
                Err(e) => println!("{e}"),
            },
            Command::Level(level) => {
                let changed = lock(&session).set_level(level);
                if changed {
                    ask_next(&tutor, &session).await;
                }
            }
            Command::Topic(topic) => {
                let changed = lock(&session).set_topic(topic);
                if changed {
                    ask_next(&tutor, &session).await;
                }
            }
        }
    }

    print_score(&lock(&session));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use apptitude::quiz::Topic;

    fn parsed(input: &str) -> Result<Command, String> {
        Command::parse(input).expect("non-blank input")
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert!(Command::parse("").is_none());
        assert!(Command::parse("   \t").is_none());
    }

    #[test]
    fn command_words_are_recognised() {
        assert_eq!(parsed("SKIP"), Ok(Command::Skip));
        assert_eq!(parsed(" next "), Ok(Command::Next));
        assert_eq!(parsed("exit"), Ok(Command::Quit));
        assert_eq!(parsed("level 3"), Ok(Command::Level(Difficulty::new(3).unwrap())));
        assert_eq!(parsed("topic speed"), Ok(Command::Topic(TopicChoice::Topic(Topic::SpeedDistanceTime))));
        assert_eq!(parsed("topic"), Ok(Command::Topic(TopicChoice::Random)));
    }

    #[test]
    fn malformed_commands_are_usage_errors_not_answers() {
        for input in ["level", "level 0", "level 9", "level three", "skip now", "score please", "quit 1"] {
            assert!(parsed(input).is_err(), "{input:?} should be a usage error");
        }
    }

    #[test]
    fn anything_else_is_an_answer() {
        assert_eq!(parsed(" 480 "), Ok(Command::Answer("480".to_string())));
        assert_eq!(parsed("$1,200"), Ok(Command::Answer("$1,200".to_string())));
        assert_eq!(parsed("six point two five"), Ok(Command::Answer("six point two five".to_string())));
    }
}
