use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{StorageError, StorageResult};
use crate::validation::{
    course_id_invalidity, email_invalidity, session_name_invalidity, GIVER_EMAIL_FIELD,
    RECIPIENT_EMAIL_FIELD,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FeedbackQuestionType {
    #[default]
    Text,
    Mcq,
    Msq,
    NumScale,
}

impl FeedbackQuestionType {
    pub const ALL: [FeedbackQuestionType; 4] = [
        FeedbackQuestionType::Text,
        FeedbackQuestionType::Mcq,
        FeedbackQuestionType::Msq,
        FeedbackQuestionType::NumScale,
    ];

    /// Stored and serialized name, e.g. `NUMSCALE`.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackQuestionType::Text => "TEXT",
            FeedbackQuestionType::Mcq => "MCQ",
            FeedbackQuestionType::Msq => "MSQ",
            FeedbackQuestionType::NumScale => "NUMSCALE",
        }
    }
}

impl fmt::Display for FeedbackQuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackQuestionType {
    type Err = StorageError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|question_type| question_type.as_str() == value)
            .ok_or_else(|| {
                StorageError::Internal(format!("unknown feedback question type: {value}"))
            })
    }
}

/// Answer payload. The variant determines which question type it answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "questionType", rename_all = "UPPERCASE")]
pub enum ResponseDetails {
    Text { answer: String },
    Mcq { answer: String },
    Msq { answers: Vec<String> },
    NumScale { answer: f64 },
}

impl ResponseDetails {
    pub fn text(answer: impl Into<String>) -> Self {
        ResponseDetails::Text {
            answer: answer.into(),
        }
    }

    pub fn question_type(&self) -> FeedbackQuestionType {
        match self {
            ResponseDetails::Text { .. } => FeedbackQuestionType::Text,
            ResponseDetails::Mcq { .. } => FeedbackQuestionType::Mcq,
            ResponseDetails::Msq { .. } => FeedbackQuestionType::Msq,
            ResponseDetails::NumScale { .. } => FeedbackQuestionType::NumScale,
        }
    }

    /// Human readable form of the answer.
    pub fn answer_string(&self) -> String {
        match self {
            ResponseDetails::Text { answer } | ResponseDetails::Mcq { answer } => answer.clone(),
            ResponseDetails::Msq { answers } => answers.join(", "),
            ResponseDetails::NumScale { answer } => answer.to_string(),
        }
    }
}

impl Default for ResponseDetails {
    fn default() -> Self {
        ResponseDetails::text("")
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeedbackResponse {
    /// Assigned by the store. `None` asks the store to generate one on create.
    pub id: Option<String>,
    pub feedback_session_name: String,
    pub course_id: String,
    pub feedback_question_id: String,
    pub feedback_question_type: FeedbackQuestionType,
    pub giver_email: String,
    pub recipient_email: String,
    pub response_details: ResponseDetails,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl FeedbackResponse {
    pub const ENTITY_TYPE: &'static str = "Feedback Response";

    pub fn new(
        feedback_session_name: impl Into<String>,
        course_id: impl Into<String>,
        feedback_question_id: impl Into<String>,
        giver_email: impl Into<String>,
        recipient_email: impl Into<String>,
        response_details: ResponseDetails,
    ) -> Self {
        Self {
            id: None,
            feedback_session_name: feedback_session_name.into(),
            course_id: course_id.into(),
            feedback_question_id: feedback_question_id.into(),
            feedback_question_type: response_details.question_type(),
            giver_email: giver_email.into(),
            recipient_email: recipient_email.into(),
            response_details,
            created_at: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn identification_string(&self) -> String {
        format!(
            "{}/{}:{}",
            self.feedback_question_id, self.giver_email, self.recipient_email
        )
    }

    /// Fails with a precondition error when a required field is blank.
    pub fn check_required_fields(&self) -> StorageResult<()> {
        let required = [
            ("feedback session name", &self.feedback_session_name),
            ("course id", &self.course_id),
            ("feedback question id", &self.feedback_question_id),
            ("giver email", &self.giver_email),
            ("recipient email", &self.recipient_email),
        ];
        if required.iter().all(|(_, value)| value.trim().is_empty()) {
            return Err(StorageError::null_input("feedback response"));
        }
        for (argument, value) in required {
            if value.trim().is_empty() {
                return Err(StorageError::null_input(argument));
            }
        }
        if let Some(id) = &self.id {
            if id.trim().is_empty() {
                return Err(StorageError::null_input("feedback response id"));
            }
        }
        Ok(())
    }

    /// Messages for every field that breaks a format rule. Empty when valid.
    pub fn invalidity_info(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(session_name_invalidity(&self.feedback_session_name));
        errors.extend(course_id_invalidity(&self.course_id));
        errors.extend(email_invalidity(GIVER_EMAIL_FIELD, &self.giver_email));
        errors.extend(email_invalidity(RECIPIENT_EMAIL_FIELD, &self.recipient_email));
        let details_type = self.response_details.question_type();
        if details_type != self.feedback_question_type {
            errors.push(format!(
                "Invalid response details: {details_type} details cannot answer a {} question.",
                self.feedback_question_type
            ));
        }
        if let ResponseDetails::NumScale { answer } = self.response_details {
            if !answer.is_finite() {
                errors.push(format!(
                    "Invalid response details: {answer} is not a finite number."
                ));
            }
        }
        errors
    }

    pub fn validate(&self) -> StorageResult<()> {
        self.check_required_fields()?;
        let errors = self.invalidity_info();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(StorageError::InvalidParameters(errors))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeedbackQuestion {
    /// Generated by the store on create.
    #[serde(default)]
    pub id: Option<String>,
    pub feedback_session_name: String,
    pub course_id: String,
    pub question_number: u32,
    pub question_type: FeedbackQuestionType,
    pub question_text: String,
}

impl FeedbackQuestion {
    pub const ENTITY_TYPE: &'static str = "Feedback Question";

    pub fn new(
        feedback_session_name: impl Into<String>,
        course_id: impl Into<String>,
        question_number: u32,
        question_type: FeedbackQuestionType,
        question_text: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            feedback_session_name: feedback_session_name.into(),
            course_id: course_id.into(),
            question_number,
            question_type,
            question_text: question_text.into(),
        }
    }

    pub fn identification_string(&self) -> String {
        format!(
            "{}. {}/{}/{}",
            self.question_number, self.question_text, self.feedback_session_name, self.course_id
        )
    }

    pub fn validate(&self) -> StorageResult<()> {
        let required = [
            ("feedback session name", &self.feedback_session_name),
            ("course id", &self.course_id),
        ];
        for (argument, value) in required {
            if value.trim().is_empty() {
                return Err(StorageError::null_input(argument));
            }
        }

        let mut errors = Vec::new();
        errors.extend(session_name_invalidity(&self.feedback_session_name));
        errors.extend(course_id_invalidity(&self.course_id));
        if self.question_number == 0 {
            errors.push(
                "Invalid question number: question numbers start at 1.".to_string(),
            );
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(StorageError::InvalidParameters(errors))
        }
    }
}
