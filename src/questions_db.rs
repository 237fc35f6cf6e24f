use std::sync::Arc;

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::datastore::Datastore;
use crate::error::{is_unique_violation, require, StorageError, StorageResult};
use crate::models::FeedbackQuestion;

const QUESTION_COLUMNS: &str =
    "id, feedback_session_name, course_id, question_number, question_type, question_text";

fn question_from_row(row: &Row<'_>) -> rusqlite::Result<FeedbackQuestion> {
    let question_type: String = row.get(4)?;
    Ok(FeedbackQuestion {
        id: Some(row.get(0)?),
        feedback_session_name: row.get(1)?,
        course_id: row.get(2)?,
        question_number: row.get(3)?,
        question_type: question_type.parse().map_err(|err: StorageError| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(err))
        })?,
        question_text: row.get(5)?,
    })
}

pub(crate) fn insert_question(
    conn: &Connection,
    question: &FeedbackQuestion,
) -> StorageResult<FeedbackQuestion> {
    question.validate()?;

    let id = uuid::Uuid::new_v4().to_string();
    let result = conn.execute(
        "INSERT INTO feedback_questions
         (id, feedback_session_name, course_id, question_number, question_type, question_text)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            id,
            question.feedback_session_name,
            question.course_id,
            question.question_number,
            question.question_type.as_str(),
            question.question_text,
        ],
    );
    match result {
        Ok(_) => {}
        Err(err) if is_unique_violation(&err) => {
            tracing::warn!(
                question = %question.identification_string(),
                "rejected duplicate feedback question"
            );
            return Err(StorageError::AlreadyExists {
                entity_type: FeedbackQuestion::ENTITY_TYPE,
                identification: question.identification_string(),
            });
        }
        Err(err) => return Err(err.into()),
    }

    tracing::debug!(%id, question = %question.identification_string(), "created feedback question");
    Ok(FeedbackQuestion {
        id: Some(id),
        ..question.clone()
    })
}

pub(crate) fn find_question(
    conn: &Connection,
    feedback_session_name: &str,
    course_id: &str,
    question_number: u32,
) -> StorageResult<Option<FeedbackQuestion>> {
    require("feedback session name", feedback_session_name)?;
    require("course id", course_id)?;

    let question = conn
        .query_row(
            &format!(
                "SELECT {QUESTION_COLUMNS} FROM feedback_questions
                 WHERE feedback_session_name = ?1 AND course_id = ?2 AND question_number = ?3"
            ),
            params![feedback_session_name, course_id, question_number],
            question_from_row,
        )
        .optional()?;
    Ok(question)
}

/// Callers wanting both deletes to land together pass a transaction.
pub(crate) fn remove_question(conn: &Connection, id: &str) -> StorageResult<()> {
    let responses = conn.execute(
        "DELETE FROM feedback_responses WHERE feedback_question_id = ?1",
        params![id],
    )?;
    let questions = conn.execute("DELETE FROM feedback_questions WHERE id = ?1", params![id])?;
    if questions > 0 {
        tracing::debug!(%id, responses, "deleted feedback question");
    }
    Ok(())
}

/// Read access to feedback questions, plus the writes fixture loading needs.
pub struct FeedbackQuestionsDb {
    datastore: Arc<Datastore>,
}

impl FeedbackQuestionsDb {
    pub fn new(datastore: Arc<Datastore>) -> Self {
        Self { datastore }
    }

    pub(crate) fn datastore(&self) -> &Arc<Datastore> {
        &self.datastore
    }

    /// Persists a question under a freshly generated id.
    pub fn create(&self, question: &FeedbackQuestion) -> StorageResult<FeedbackQuestion> {
        let conn = self.datastore.lock()?;
        insert_question(&conn, question)
    }

    /// Looks a question up by its position within a session.
    pub fn find_by_composite(
        &self,
        feedback_session_name: &str,
        course_id: &str,
        question_number: u32,
    ) -> StorageResult<Option<FeedbackQuestion>> {
        require("feedback session name", feedback_session_name)?;
        require("course id", course_id)?;

        let conn = self.datastore.lock()?;
        find_question(&conn, feedback_session_name, course_id, question_number)
    }

    pub fn get_by_id(&self, id: &str) -> StorageResult<Option<FeedbackQuestion>> {
        require("feedback question id", id)?;

        let conn = self.datastore.lock()?;
        let question = conn
            .query_row(
                &format!("SELECT {QUESTION_COLUMNS} FROM feedback_questions WHERE id = ?1"),
                params![id],
                question_from_row,
            )
            .optional()?;
        Ok(question)
    }

    /// All questions of a session, ordered by question number.
    pub fn list_for_session(
        &self,
        feedback_session_name: &str,
        course_id: &str,
    ) -> StorageResult<Vec<FeedbackQuestion>> {
        require("feedback session name", feedback_session_name)?;
        require("course id", course_id)?;

        let conn = self.datastore.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {QUESTION_COLUMNS} FROM feedback_questions
             WHERE feedback_session_name = ?1 AND course_id = ?2
             ORDER BY question_number"
        ))?;
        let questions = stmt
            .query_map(params![feedback_session_name, course_id], question_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(questions)
    }

    /// Deletes a question together with its responses. Unknown ids are ignored.
    pub fn delete(&self, id: &str) -> StorageResult<()> {
        require("feedback question id", id)?;

        let mut conn = self.datastore.lock()?;
        let tx = conn.transaction()?;
        remove_question(&tx, id)?;
        tx.commit()?;
        Ok(())
    }
}
