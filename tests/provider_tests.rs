
use std::time::Duration;

use apptitude::clients::{MockClient, MockResponse, MockVoid};
use apptitude::quiz::fallback::{fallback_entry, fallback_question, FALLBACK_LEN};
use apptitude::quiz::{AnswerValidator, Difficulty, QuestionProvider, QuestionSource, Topic, TopicChoice, VerdictSource};
use test_utils::{init_tracing, question_json, scripted};

const TIMEOUT: Duration = Duration::from_secs(5);

fn level(n: u8) -> Difficulty {
    Difficulty::new(n).unwrap()
}

#[tokio::test]
async fn backend_question_is_used_as_is() {
    init_tracing();
    let reply = question_json("What is 12 × 11?", "132", "12 × 11 = 132");
    let (client, handle) = scripted(&[&reply]);
    let provider = QuestionProvider::new(client, TIMEOUT);

    let provided = provider.request(level(2), "Basic Arithmetic").await;

    assert_eq!(provided.source, QuestionSource::Backend);
    assert_eq!(provided.topic, "Basic Arithmetic");
    assert_eq!(provided.question.text(), "What is 12 × 11?");
    assert_eq!(provided.question.correct_answer(), "132");
    assert_eq!(handle.call_count(), 1);
}

#[tokio::test]
async fn prompt_names_level_topic_and_json_shape() {
    let (client, handle) = scripted(&[&question_json("q", "1", "e")]);
    let provider = QuestionProvider::new(client, TIMEOUT);

    provider.request(level(4), "Simple Interest").await;

    let prompts = handle.prompts();
    assert_eq!(prompts.len(), 1);
    let user = &prompts[0].user;
    assert!(user.contains("Simple Interest"));
    assert!(user.contains("difficulty level 4"));
    assert!(user.contains("\"question\""));
    assert!(user.contains("\"explanation\""));
    assert!(prompts[0].system.contains("APPtitude"));
}

#[tokio::test]
async fn fenced_and_prose_wrapped_replies_are_accepted() {
    let fenced = format!("```json\n{}\n```", question_json("What is 9²?", "81", "9 × 9"));
    let prose = format!("Of course! {} Hope that helps.", question_json("What is 7 × 8?", "56", "7 × 8"));
    let (client, _handle) = scripted(&[&fenced, &prose]);
    let provider = QuestionProvider::new(client, TIMEOUT);

    let first = provider.request(level(1), "Basic Arithmetic").await;
    let second = provider.request(level(1), "Basic Arithmetic").await;

    assert_eq!(first.source, QuestionSource::Backend);
    assert_eq!(first.question.correct_answer(), "81");
    assert_eq!(second.source, QuestionSource::Backend);
    assert_eq!(second.question.correct_answer(), "56");
}

#[tokio::test]
async fn failing_backend_serves_the_fallback_for_every_level() {
    init_tracing();
    for d in Difficulty::all() {
        let (client, handle) = MockClient::new();
        handle.push_failure("backend down");
        let provider = QuestionProvider::new(client, TIMEOUT);

        let provided = provider.request(d, "Percentages").await;

        assert_eq!(provided.source, QuestionSource::Fallback, "level {d}");
        assert_eq!(provided.topic, "Percentages");
        assert_eq!(
            provided.question,
            fallback_entry(usize::from(d.get()) % FALLBACK_LEN),
            "level {d}"
        );
    }
}

#[tokio::test]
async fn malformed_replies_fall_back() {
    let replies = [
        "I'm sorry, I can't do that.",
        "{\"question\": \"unterminated",
        r#"{"question": "What is 2+2?", "answer": "4"}"#,
        r#"{"question": "", "answer": "4", "explanation": "sum"}"#,
    ];
    let (client, handle) = scripted(&replies);
    let provider = QuestionProvider::new(client, TIMEOUT);

    for raw in replies {
        let provided = provider.request(level(2), "Fractions").await;
        assert_eq!(provided.source, QuestionSource::Fallback, "reply {raw:?}");
        assert_eq!(provided.question, fallback_question(level(2)));
    }
    assert_eq!(handle.remaining(), 0);
}

#[tokio::test]
async fn empty_object_reply_falls_back() {
    let provider = QuestionProvider::new(MockVoid, TIMEOUT);
    let provided = provider.request(level(5), "Ratios").await;
    assert_eq!(provided.source, QuestionSource::Fallback);
    assert_eq!(provided.question.correct_answer(), "80");
}

#[tokio::test]
async fn slow_backend_times_out_into_fallback() {
    let slow = MockResponse::delayed(
        Duration::from_millis(500),
        MockResponse::text(question_json("late", "1", "too late")),
    );
    let (client, _handle) = MockClient::with_responses(vec![slow]);
    let provider = QuestionProvider::new(client, Duration::from_millis(50));

    let provided = provider.request(level(1), "Averages").await;

    assert_eq!(provided.source, QuestionSource::Fallback);
    assert_eq!(provided.question.correct_answer(), "36");
}

#[tokio::test]
async fn try_generate_reports_why_it_failed() {
    let (client, _handle) = scripted(&["no json here"]);
    let provider = QuestionProvider::new(client, TIMEOUT);
    let err = provider.try_generate(level(1), "Units").await.unwrap_err();
    assert!(err.to_string().contains("malformed question payload"));
}

#[tokio::test]
async fn random_topic_is_resolved_before_prompting() {
    let (client, handle) = scripted(&[&question_json("q", "1", "e")]);
    let provider = QuestionProvider::new(client, TIMEOUT);

    provider.request_question(level(3), &TopicChoice::Random).await;

    let user = &handle.prompts()[0].user;
    assert!(
        Topic::ALL.iter().any(|t| user.contains(t.label())),
        "prompt names no known topic: {user}"
    );
}

#[tokio::test]
async fn custom_topic_is_passed_through() {
    let (client, handle) = scripted(&[&question_json("q", "1", "e")]);
    let provider = QuestionProvider::new(client, TIMEOUT);

    let choice: TopicChoice = "compound growth".parse().unwrap();
    provider.request_question(level(3), &choice).await;

    assert!(handle.prompts()[0].user.contains("compound growth"));
}

#[tokio::test]
async fn offline_level_three_round_trip() {
    // Backend unreachable for both calls: question comes from the bank and the
    // answer is checked locally.
    let (client, _handle) = MockClient::new();
    let provider = QuestionProvider::new(client.clone(), TIMEOUT);
    let validator = AnswerValidator::new(client, TIMEOUT);

    let provided = provider.request(level(3), "Speed, Distance & Time").await;
    assert_eq!(provided.source, QuestionSource::Fallback);
    assert_eq!(provided.question.correct_answer(), "480");

    let result = validator.validate_detailed(&provided.question, "480").await;
    assert!(result.is_correct);
    assert_eq!(result.source, VerdictSource::LocalComparator);

    assert!(validator.validate(&provided.question, "$480.00").await);
    assert!(!validator.validate(&provided.question, "48").await);
}
