// Category 5: Data Models Tests (models.rs)
// Tests for serialization, identification strings and record-level checks

use crate::error::StorageError;
use crate::models::{FeedbackQuestion, FeedbackQuestionType, FeedbackResponse, ResponseDetails};

fn text_response() -> FeedbackResponse {
    FeedbackResponse::new(
        "fsTest1",
        "testCourse",
        "testFeedbackQuestionId",
        "giver@email.com",
        "recipient@email.com",
        ResponseDetails::text("Text response"),
    )
}

/// Test Case 5.1: Question type serializes with upper-case names
#[test]
fn test_question_type_serialization() {
    assert_eq!(serde_json::to_value(FeedbackQuestionType::Text).unwrap(), "TEXT");
    assert_eq!(serde_json::to_value(FeedbackQuestionType::NumScale).unwrap(), "NUMSCALE");

    let parsed: FeedbackQuestionType = "MSQ".parse().unwrap();
    assert_eq!(parsed, FeedbackQuestionType::Msq);
    assert!("ESSAY".parse::<FeedbackQuestionType>().is_err());
}

/// Test Case 5.2: Response details are tagged by question type
#[test]
fn test_response_details_serialization() {
    let json = serde_json::to_value(ResponseDetails::text("Great work")).unwrap();
    assert_eq!(json["questionType"], "TEXT");
    assert_eq!(json["answer"], "Great work");

    let details: ResponseDetails =
        serde_json::from_str(r#"{"questionType":"MSQ","answers":["A","B"]}"#).unwrap();
    assert_eq!(details.question_type(), FeedbackQuestionType::Msq);
    assert_eq!(details.answer_string(), "A, B");
}

/// Test Case 5.3: New response takes its type from the details
#[test]
fn test_new_response_question_type() {
    let response = FeedbackResponse::new(
        "fsTest1",
        "testCourse",
        "q",
        "giver@email.com",
        "recipient@email.com",
        ResponseDetails::NumScale { answer: 3.0 },
    );

    assert_eq!(response.feedback_question_type, FeedbackQuestionType::NumScale);
    assert!(response.id.is_none());
    assert!(response.created_at.is_none());
}

/// Test Case 5.4: Response identification string
#[test]
fn test_response_identification_string() {
    assert_eq!(
        text_response().identification_string(),
        "testFeedbackQuestionId/giver@email.com:recipient@email.com"
    );
}

/// Test Case 5.5: Valid response passes validation
#[test]
fn test_valid_response() {
    assert!(text_response().validate().is_ok());
    assert!(text_response().invalidity_info().is_empty());
}

/// Test Case 5.6: Blank id is treated as missing
#[test]
fn test_blank_id_is_null_input() {
    let response = text_response().with_id("");

    match response.validate() {
        Err(StorageError::NullInput { argument }) => assert_eq!(argument, "feedback response id"),
        other => panic!("Expected StorageError::NullInput, got {:?}", other),
    }
}

/// Test Case 5.7: Default response is the null record
#[test]
fn test_default_response_is_null_record() {
    match FeedbackResponse::default().check_required_fields() {
        Err(StorageError::NullInput { argument }) => assert_eq!(argument, "feedback response"),
        other => panic!("Expected StorageError::NullInput, got {:?}", other),
    }
}

/// Test Case 5.8: FeedbackQuestion identification and validation
#[test]
fn test_question_identification_and_validation() {
    let question = FeedbackQuestion::new(
        "First feedback session",
        "idOfTypicalCourse1",
        1,
        FeedbackQuestionType::Text,
        "What is the best selling point of your product?",
    );

    assert_eq!(
        question.identification_string(),
        "1. What is the best selling point of your product?/First feedback session/idOfTypicalCourse1"
    );
    assert!(question.validate().is_ok());
}

/// Test Case 5.9: FeedbackResponse JSON round trip keeps optional fields
#[test]
fn test_response_json_defaults() {
    let json = r#"{
        "feedback_session_name": "fsTest1",
        "course_id": "testCourse",
        "feedback_question_id": "1",
        "feedback_question_type": "TEXT",
        "giver_email": "giver@email.com",
        "recipient_email": "recipient@email.com",
        "response_details": { "questionType": "TEXT", "answer": "Text response" }
    }"#;

    let response: FeedbackResponse = serde_json::from_str(json).unwrap();

    assert!(response.id.is_none());
    assert!(response.created_at.is_none());
    assert_eq!(response.response_details, ResponseDetails::text("Text response"));
}

/// Test Case 5.10: Stored name matches the serialized name
#[test]
fn test_question_type_names_agree() {
    for question_type in FeedbackQuestionType::ALL {
        assert_eq!(
            serde_json::to_value(question_type).unwrap(),
            question_type.as_str()
        );
        assert_eq!(
            question_type.as_str().parse::<FeedbackQuestionType>().unwrap(),
            question_type
        );
        let details = match question_type {
            FeedbackQuestionType::Text => ResponseDetails::text("a"),
            FeedbackQuestionType::Mcq => ResponseDetails::Mcq { answer: "a".to_string() },
            FeedbackQuestionType::Msq => ResponseDetails::Msq { answers: vec![] },
            FeedbackQuestionType::NumScale => ResponseDetails::NumScale { answer: 1.0 },
        };
        assert_eq!(
            serde_json::to_value(&details).unwrap()["questionType"],
            question_type.as_str()
        );
    }

    match "ESSAY".parse::<FeedbackQuestionType>() {
        Err(StorageError::Internal(message)) => assert!(message.contains("ESSAY")),
        other => panic!("Expected StorageError::Internal, got {:?}", other),
    }
}
