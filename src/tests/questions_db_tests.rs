// Category 3: Feedback Question Storage Tests (questions_db.rs)
// Tests for resolving question identities used to key responses

use super::{create_empty_store, create_typical_store};
use crate::error::StorageError;
use crate::models::{FeedbackQuestion, FeedbackQuestionType};

fn new_question(number: u32) -> FeedbackQuestion {
    FeedbackQuestion::new(
        "fsTest1",
        "testCourse",
        number,
        FeedbackQuestionType::Text,
        "How did the project go?",
    )
}

/// Test Case 3.1: Find Question By Session Position
#[test]
fn test_find_by_composite() {
    let (store, stored) = create_typical_store();

    let question = store
        .questions
        .find_by_composite("First feedback session", "idOfTypicalCourse1", 1)
        .unwrap()
        .expect("Question should exist");

    assert_eq!(question, stored.feedback_questions["qn1InSession1InCourse1"]);
    assert_eq!(question.question_type, FeedbackQuestionType::Text);
}

/// Test Case 3.2: Identifier Is Stable
#[test]
fn test_question_id_is_stable() {
    let (store, _) = create_typical_store();

    let first = store
        .questions
        .find_by_composite("First feedback session", "idOfTypicalCourse1", 2)
        .unwrap()
        .unwrap();
    let second = store
        .questions
        .find_by_composite("First feedback session", "idOfTypicalCourse1", 2)
        .unwrap()
        .unwrap();

    assert!(first.id.is_some());
    assert_eq!(first.id, second.id);
}

/// Test Case 3.3: Unknown Question
#[test]
fn test_find_unknown_question() {
    let (store, _) = create_typical_store();

    assert!(store
        .questions
        .find_by_composite("First feedback session", "idOfTypicalCourse1", 99)
        .unwrap()
        .is_none());
    assert!(store
        .questions
        .find_by_composite("First feedback session", "idOfTypicalCourse3", 1)
        .unwrap()
        .is_none());
}

/// Test Case 3.4: Null Lookup Arguments
#[test]
fn test_find_null_params() {
    let (store, _) = create_typical_store();

    assert!(store
        .questions
        .find_by_composite("", "idOfTypicalCourse1", 1)
        .unwrap_err()
        .is_precondition_violation());
    assert!(store
        .questions
        .find_by_composite("First feedback session", " ", 1)
        .unwrap_err()
        .is_precondition_violation());
}

/// Test Case 3.5: Create Question
#[test]
fn test_create_question() {
    let store = create_empty_store();

    let created = store.questions.create(&new_question(1)).unwrap();

    let id = created.id.clone().expect("id should be generated");
    assert_eq!(store.questions.get_by_id(&id).unwrap(), Some(created));
}

/// Test Case 3.6: Duplicate Question Number
#[test]
fn test_create_duplicate_question() {
    let store = create_empty_store();
    store.questions.create(&new_question(1)).unwrap();

    let err = store.questions.create(&new_question(1)).unwrap_err();

    match err {
        StorageError::AlreadyExists {
            entity_type,
            identification,
        } => {
            assert_eq!(entity_type, "Feedback Question");
            assert_eq!(identification, "1. How did the project go?/fsTest1/testCourse");
        }
        other => panic!("Expected StorageError::AlreadyExists, got {:?}", other),
    }
}

/// Test Case 3.7: Invalid Question
#[test]
fn test_create_invalid_question() {
    let store = create_empty_store();

    let err = store.questions.create(&new_question(0)).unwrap_err();
    assert!(err.to_string().contains("Invalid question number"));

    let mut question = new_question(1);
    question.course_id = String::new();
    assert!(store
        .questions
        .create(&question)
        .unwrap_err()
        .is_precondition_violation());
}

/// Test Case 3.8: List Questions For Session
#[test]
fn test_list_for_session() {
    let (store, _) = create_typical_store();

    let questions = store
        .questions
        .list_for_session("First feedback session", "idOfTypicalCourse1")
        .unwrap();

    let numbers: Vec<u32> = questions.iter().map(|q| q.question_number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
    assert!(store
        .questions
        .list_for_session("non-existent feedback session", "idOfTypicalCourse1")
        .unwrap()
        .is_empty());
}

/// Test Case 3.9: Delete Question Removes Its Responses
#[test]
fn test_delete_question_cascades() {
    let (store, stored) = create_typical_store();
    let question_id = stored.feedback_questions["qn1InSession1InCourse1"]
        .id
        .clone()
        .unwrap();

    store.questions.delete(&question_id).unwrap();

    assert!(store.questions.get_by_id(&question_id).unwrap().is_none());
    assert!(store.responses.list_for_question(&question_id).unwrap().is_empty());
    assert_eq!(
        store
            .responses
            .list_for_session("First feedback session", "idOfTypicalCourse1")
            .unwrap()
            .len(),
        4
    );

    // unknown ids are ignored
    store.questions.delete("non-existent fq id").unwrap();
}
