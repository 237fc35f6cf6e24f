use std::sync::Arc;

use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::datastore::Datastore;
use crate::error::{is_unique_violation, require, StorageError, StorageResult};
use crate::models::FeedbackResponse;

const RESPONSE_COLUMNS: &str = "id, feedback_session_name, course_id, feedback_question_id, \
     feedback_question_type, giver_email, recipient_email, response_details, created_at";

fn response_from_row(row: &Row<'_>) -> rusqlite::Result<FeedbackResponse> {
    let question_type: String = row.get(4)?;
    let details: String = row.get(7)?;
    Ok(FeedbackResponse {
        id: Some(row.get(0)?),
        feedback_session_name: row.get(1)?,
        course_id: row.get(2)?,
        feedback_question_id: row.get(3)?,
        feedback_question_type: question_type.parse().map_err(|err: StorageError| {
            rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(err))
        })?,
        giver_email: row.get(5)?,
        recipient_email: row.get(6)?,
        response_details: serde_json::from_str(&details)
            .map_err(|err| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(err)))?,
        created_at: row.get(8)?,
    })
}

fn already_exists(identification: String) -> StorageError {
    StorageError::AlreadyExists {
        entity_type: FeedbackResponse::ENTITY_TYPE,
        identification,
    }
}

fn query_responses(
    conn: &Connection,
    filter: &str,
    params: &[&dyn rusqlite::ToSql],
) -> StorageResult<Vec<FeedbackResponse>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RESPONSE_COLUMNS} FROM feedback_responses WHERE {filter} ORDER BY seq"
    ))?;
    let responses = stmt
        .query_map(params, response_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(responses)
}

/// Inserts an already validated response. The caller holds the connection
/// lock, so the existence checks and the insert cannot interleave.
pub(crate) fn insert_response(
    conn: &Connection,
    response: &FeedbackResponse,
) -> StorageResult<FeedbackResponse> {
    let key_taken = conn
        .query_row(
            "SELECT 1 FROM feedback_responses
             WHERE feedback_question_id = ?1 AND giver_email = ?2 AND recipient_email = ?3",
            params![
                response.feedback_question_id,
                response.giver_email,
                response.recipient_email
            ],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    if key_taken {
        tracing::warn!(
            response = %response.identification_string(),
            "rejected duplicate feedback response"
        );
        return Err(already_exists(response.identification_string()));
    }
    if let Some(id) = &response.id {
        let id_taken = conn
            .query_row(
                "SELECT 1 FROM feedback_responses WHERE id = ?1",
                params![id],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if id_taken {
            tracing::warn!(%id, "rejected feedback response with a taken id");
            return Err(already_exists(format!("id {id}")));
        }
    }

    let id = response
        .id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let created_at = Utc::now().to_rfc3339();
    let details = serde_json::to_string(&response.response_details)?;

    let result = conn.execute(
        "INSERT INTO feedback_responses
         (id, feedback_session_name, course_id, feedback_question_id, feedback_question_type,
          giver_email, recipient_email, response_details, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            id,
            response.feedback_session_name,
            response.course_id,
            response.feedback_question_id,
            response.feedback_question_type.as_str(),
            response.giver_email,
            response.recipient_email,
            details,
            created_at,
        ],
    );
    match result {
        Ok(_) => {}
        Err(err) if is_unique_violation(&err) => {
            return Err(already_exists(response.identification_string()))
        }
        Err(err) => return Err(err.into()),
    }

    tracing::debug!(%id, response = %response.identification_string(), "created feedback response");
    Ok(FeedbackResponse {
        id: Some(id),
        created_at: Some(created_at),
        ..response.clone()
    })
}

/// Create, lookup and delete operations over stored feedback responses.
pub struct FeedbackResponsesDb {
    datastore: Arc<Datastore>,
}

impl FeedbackResponsesDb {
    pub fn new(datastore: Arc<Datastore>) -> Self {
        Self { datastore }
    }

    pub(crate) fn datastore(&self) -> &Arc<Datastore> {
        &self.datastore
    }

    /// Persists a new response and returns it with its id and creation time set.
    ///
    /// A blank required field fails with [`StorageError::NullInput`], a malformed
    /// field with [`StorageError::InvalidParameters`], and a taken composite key
    /// or id with [`StorageError::AlreadyExists`].
    pub fn create(&self, response: &FeedbackResponse) -> StorageResult<FeedbackResponse> {
        response.validate()?;

        let conn = self.datastore.lock()?;
        insert_response(&conn, response)
    }

    pub fn get_by_composite_key(
        &self,
        feedback_question_id: &str,
        giver_email: &str,
        recipient_email: &str,
    ) -> StorageResult<Option<FeedbackResponse>> {
        require("feedback question id", feedback_question_id)?;
        require("giver email", giver_email)?;
        require("recipient email", recipient_email)?;

        let conn = self.datastore.lock()?;
        let response = conn
            .query_row(
                &format!(
                    "SELECT {RESPONSE_COLUMNS} FROM feedback_responses
                     WHERE feedback_question_id = ?1 AND giver_email = ?2 AND recipient_email = ?3"
                ),
                params![feedback_question_id, giver_email, recipient_email],
                response_from_row,
            )
            .optional()?;
        Ok(response)
    }

    pub fn get_by_id(&self, id: &str) -> StorageResult<Option<FeedbackResponse>> {
        require("feedback response id", id)?;

        let conn = self.datastore.lock()?;
        let response = conn
            .query_row(
                &format!("SELECT {RESPONSE_COLUMNS} FROM feedback_responses WHERE id = ?1"),
                params![id],
                response_from_row,
            )
            .optional()?;
        Ok(response)
    }

    /// Removes the response by id, or by composite key when it has no id.
    /// Deleting a response that is not stored does nothing.
    pub fn delete(&self, response: &FeedbackResponse) -> StorageResult<()> {
        if let Some(id) = &response.id {
            return self.delete_by_id(id);
        }
        require("feedback question id", &response.feedback_question_id)?;
        require("giver email", &response.giver_email)?;
        require("recipient email", &response.recipient_email)?;

        let conn = self.datastore.lock()?;
        let removed = conn.execute(
            "DELETE FROM feedback_responses
             WHERE feedback_question_id = ?1 AND giver_email = ?2 AND recipient_email = ?3",
            params![
                response.feedback_question_id,
                response.giver_email,
                response.recipient_email
            ],
        )?;
        if removed > 0 {
            tracing::debug!(response = %response.identification_string(), "deleted feedback response");
        }
        Ok(())
    }

    pub fn delete_by_id(&self, id: &str) -> StorageResult<()> {
        require("feedback response id", id)?;

        let conn = self.datastore.lock()?;
        let removed = conn.execute("DELETE FROM feedback_responses WHERE id = ?1", params![id])?;
        if removed > 0 {
            tracing::debug!(%id, "deleted feedback response");
        }
        Ok(())
    }

    /// Removes every response to a question, returning how many were removed.
    pub fn delete_for_question(&self, feedback_question_id: &str) -> StorageResult<usize> {
        require("feedback question id", feedback_question_id)?;

        let conn = self.datastore.lock()?;
        let removed = conn.execute(
            "DELETE FROM feedback_responses WHERE feedback_question_id = ?1",
            params![feedback_question_id],
        )?;
        tracing::debug!(question_id = %feedback_question_id, removed, "deleted responses for question");
        Ok(removed)
    }

    pub fn list_for_question(
        &self,
        feedback_question_id: &str,
    ) -> StorageResult<Vec<FeedbackResponse>> {
        require("feedback question id", feedback_question_id)?;

        let conn = self.datastore.lock()?;
        query_responses(
            &conn,
            "feedback_question_id = ?1",
            params![feedback_question_id],
        )
    }

    pub fn list_for_session(
        &self,
        feedback_session_name: &str,
        course_id: &str,
    ) -> StorageResult<Vec<FeedbackResponse>> {
        require("feedback session name", feedback_session_name)?;
        require("course id", course_id)?;

        let conn = self.datastore.lock()?;
        query_responses(
            &conn,
            "feedback_session_name = ?1 AND course_id = ?2",
            params![feedback_session_name, course_id],
        )
    }

    pub fn list_for_giver_for_question(
        &self,
        feedback_question_id: &str,
        giver_email: &str,
    ) -> StorageResult<Vec<FeedbackResponse>> {
        require("feedback question id", feedback_question_id)?;
        require("giver email", giver_email)?;

        let conn = self.datastore.lock()?;
        query_responses(
            &conn,
            "feedback_question_id = ?1 AND giver_email = ?2",
            params![feedback_question_id, giver_email],
        )
    }

    pub fn list_for_receiver_for_question(
        &self,
        feedback_question_id: &str,
        recipient_email: &str,
    ) -> StorageResult<Vec<FeedbackResponse>> {
        require("feedback question id", feedback_question_id)?;
        require("recipient email", recipient_email)?;

        let conn = self.datastore.lock()?;
        query_responses(
            &conn,
            "feedback_question_id = ?1 AND recipient_email = ?2",
            params![feedback_question_id, recipient_email],
        )
    }
}
