//! JSON fixtures of questions and responses that can be restored into a datastore.
//!
//! Responses inside a bundle name their question by its number within the
//! response's session. Persisting resolves that number to the stored
//! question's generated id.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{StorageError, StorageResult};
use crate::models::{FeedbackQuestion, FeedbackResponse};
use crate::questions_db::{find_question, insert_question, remove_question, FeedbackQuestionsDb};
use crate::responses_db::{insert_response, FeedbackResponsesDb};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataBundle {
    #[serde(default)]
    pub feedback_questions: BTreeMap<String, FeedbackQuestion>,
    #[serde(default)]
    pub feedback_responses: BTreeMap<String, FeedbackResponse>,
}

impl DataBundle {
    pub fn from_json(json: &str) -> StorageResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> StorageResult<Self> {
        tracing::info!("Loading data bundle from {:?}", path);
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Writes the bundle into the stores, replacing questions that already
    /// exist at the same position (and their responses).
    ///
    /// The whole restore runs in one transaction: if any entry is rejected the
    /// stores are left as they were. Returns the bundle as stored, with
    /// generated ids filled in and each response pointing at its question's id.
    pub fn persist(
        &self,
        questions_db: &FeedbackQuestionsDb,
        responses_db: &FeedbackResponsesDb,
    ) -> StorageResult<DataBundle> {
        if !Arc::ptr_eq(questions_db.datastore(), responses_db.datastore()) {
            return Err(StorageError::Internal(
                "questions and responses must share one datastore".to_string(),
            ));
        }
        let mut conn = questions_db.datastore().lock()?;
        let tx = conn.transaction()?;
        let mut stored = DataBundle::default();

        for (key, question) in &self.feedback_questions {
            if let Some(existing) = find_question(
                &tx,
                &question.feedback_session_name,
                &question.course_id,
                question.question_number,
            )? {
                if let Some(id) = &existing.id {
                    remove_question(&tx, id)?;
                }
            }
            let created = insert_question(&tx, question)?;
            stored.feedback_questions.insert(key.clone(), created);
        }

        for (key, response) in &self.feedback_responses {
            let question_number: u32 = response.feedback_question_id.parse().map_err(|_| {
                StorageError::InvalidParameters(vec![format!(
                    "Invalid data bundle entry {key}: \"{}\" is not a question number.",
                    response.feedback_question_id
                )])
            })?;
            let question = find_question(
                &tx,
                &response.feedback_session_name,
                &response.course_id,
                question_number,
            )?
            .and_then(|question| question.id)
            .ok_or_else(|| {
                StorageError::InvalidParameters(vec![format!(
                    "Invalid data bundle entry {key}: question {question_number} of {}/{} does not exist.",
                    response.feedback_session_name, response.course_id
                )])
            })?;

            let to_create = FeedbackResponse {
                id: None,
                created_at: None,
                feedback_question_id: question,
                ..response.clone()
            };
            to_create.validate()?;
            let created = insert_response(&tx, &to_create)?;
            stored.feedback_responses.insert(key.clone(), created);
        }

        tx.commit()?;
        tracing::info!(
            questions = stored.feedback_questions.len(),
            responses = stored.feedback_responses.len(),
            "data bundle persisted"
        );
        Ok(stored)
    }
}
