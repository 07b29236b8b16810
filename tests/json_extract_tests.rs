use apptitude::error::ExtractionError;
use apptitude::extract_object;
use apptitude::quiz::parse_question_response;
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
struct Item {
    x: i32,
}

#[test]
fn extract_bare_object() {
    let v: Item = extract_object(r#"{"x":1}"#).unwrap();
    assert_eq!(v, Item { x: 1 });
}

#[test]
fn extract_from_fenced_block() {
    let s = "```json\n{\"x\": 42}\n```";
    let v: Item = extract_object(s).unwrap();
    assert_eq!(v.x, 42);
}

#[test]
fn extract_from_untagged_fence_with_trailing_newline() {
    let s = "```\n{\"x\": 7}\n```\n";
    let v: Item = extract_object(s).unwrap();
    assert_eq!(v.x, 7);
}

#[test]
fn extract_object_surrounded_by_prose() {
    let s = "Sure! Here is your question:\n{\"x\": 5}\nGood luck with it.";
    let v: Item = extract_object(s).unwrap();
    assert_eq!(v.x, 5);
}

#[derive(Debug, Deserialize, PartialEq)]
struct ComplexItem {
    id: u32,
    name: String,
    meta: Meta,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Meta {
    tags: Vec<String>,
    score: f32,
}

#[test]
fn extract_nested_object_keeps_inner_braces() {
    let s = r#"noise {"id":1,"name":"alpha","meta":{"tags":["a","b"],"score":0.5}} tail"#;
    let v: ComplexItem = extract_object(s).unwrap();
    assert_eq!(v.id, 1);
    assert_eq!(v.name, "alpha");
    assert_eq!(v.meta.tags, vec!["a", "b"]);
    assert!((v.meta.score - 0.5).abs() < 1e-6);
}

#[test]
fn text_without_braces_has_no_object() {
    let err = extract_object::<Item>("I cannot help with that.").unwrap_err();
    assert!(matches!(err, ExtractionError::NoObject));
}

#[test]
fn broken_json_inside_braces_is_a_json_error() {
    let err = extract_object::<Item>("{\"x\": }").unwrap_err();
    assert!(matches!(err, ExtractionError::Json(_)));
}

#[test]
fn two_objects_in_one_reply_do_not_parse() {
    // The span runs from the first '{' to the last '}', which is not one object.
    let err = extract_object::<Item>(r#"{"x":1} and {"x":2}"#).unwrap_err();
    assert!(matches!(err, ExtractionError::Json(_)));
}

#[test]
fn question_payload_from_fenced_reply() {
    let raw = "```json\n{\"question\": \"What is 15% of 200?\", \"answer\": \"30\", \"explanation\": \"0.15 × 200 = 30\"}\n```";
    let q = parse_question_response(raw).unwrap();
    assert_eq!(q.text(), "What is 15% of 200?");
    assert_eq!(q.correct_answer(), "30");
    assert_eq!(q.explanation(), "0.15 × 200 = 30");
}

#[test]
fn question_payload_accepts_numeric_answer() {
    let raw = r#"Here you go: {"question": "Half of 12.5?", "answer": 6.25, "explanation": "12.5 / 2"}"#;
    let q = parse_question_response(raw).unwrap();
    assert_eq!(q.correct_answer(), "6.25");
}

#[test]
fn question_payload_missing_field_is_rejected() {
    assert!(parse_question_response(r#"{"question": "q", "answer": "1"}"#).is_err());
    assert!(parse_question_response(r#"{"question": "  ", "answer": "1", "explanation": "e"}"#).is_err());
}
