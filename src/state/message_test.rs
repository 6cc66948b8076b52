use super::*;
use crate::api::test_helpers::sample_answer;
use time::macros::datetime;

#[test]
fn user_message_carries_no_answer_metadata() {
    let msg = Message::user(MessageId(1), "hello".into(), datetime!(2024-01-01 00:00:00 UTC));
    assert!(msg.is_user());
    assert!(!msg.is_error);
    assert!(msg.processing_time_secs.is_none());
    assert!(msg.confidence.is_none());
    assert!(msg.sources.is_empty());
}

#[test]
fn answer_message_maps_fields() {
    let mut answer = sample_answer("Avoid raw fish...");
    answer.timestamp = datetime!(2024-01-15 10:30:00 UTC);
    answer.processing_time_secs = Some(1.5);
    answer.confidence = Some(0.92);
    answer.sources = vec!["ACOG".into()];

    let msg = Message::answer(MessageId(2), answer);
    assert_eq!(msg.author, Author::Assistant);
    assert_eq!(msg.text, "Avoid raw fish...");
    assert_eq!(msg.created_at, datetime!(2024-01-15 10:30:00 UTC));
    assert_eq!(msg.processing_time_secs, Some(1.5));
    assert_eq!(msg.confidence, Some(0.92));
    assert_eq!(msg.sources, vec!["ACOG".to_string()]);
    assert!(!msg.is_error);
}

#[test]
fn failure_message_wraps_error_in_apology() {
    let msg = Message::failure(MessageId(3), "model unavailable", datetime!(2024-01-01 00:00:00 UTC));
    assert!(msg.is_error);
    assert_eq!(msg.author, Author::Assistant);
    assert!(msg.text.starts_with(APOLOGY_PREFIX));
    assert!(msg.text.ends_with("Error: model unavailable"));
    assert!(msg.confidence.is_none());
}

#[test]
fn confidence_percent_rounds() {
    let mut answer = sample_answer("x");
    answer.confidence = Some(0.926);
    let msg = Message::answer(MessageId(4), answer);
    assert_eq!(msg.confidence_percent(), Some(93));

    let msg = Message::user(MessageId(5), "q".into(), datetime!(2024-01-01 00:00:00 UTC));
    assert_eq!(msg.confidence_percent(), None);
}

#[test]
fn message_ids_order_by_creation() {
    assert!(MessageId(1) < MessageId(2));
}
