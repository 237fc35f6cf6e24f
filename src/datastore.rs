use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use rusqlite::Connection;

use crate::error::{StorageError, StorageResult};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS feedback_questions (
        id TEXT PRIMARY KEY,
        feedback_session_name TEXT NOT NULL,
        course_id TEXT NOT NULL,
        question_number INTEGER NOT NULL,
        question_type TEXT NOT NULL,
        question_text TEXT NOT NULL,
        UNIQUE (feedback_session_name, course_id, question_number)
    );

    CREATE TABLE IF NOT EXISTS feedback_responses (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        feedback_session_name TEXT NOT NULL,
        course_id TEXT NOT NULL,
        feedback_question_id TEXT NOT NULL,
        feedback_question_type TEXT NOT NULL,
        giver_email TEXT NOT NULL,
        recipient_email TEXT NOT NULL,
        response_details TEXT NOT NULL,
        created_at TEXT NOT NULL,
        UNIQUE (feedback_question_id, giver_email, recipient_email)
    );

    CREATE INDEX IF NOT EXISTS idx_feedback_responses_session
        ON feedback_responses(feedback_session_name, course_id);
";

/// The single SQLite connection shared by the question and response stores.
pub struct Datastore {
    conn: Mutex<Connection>,
}

impl Datastore {
    pub fn open(db_path: &Path) -> StorageResult<Arc<Self>> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        tracing::info!("Opening feedback datastore at {:?}", db_path);
        let conn = Connection::open(db_path)?;
        Self::with_connection(conn)
    }

    pub fn in_memory() -> StorageResult<Arc<Self>> {
        tracing::info!("Opening in-memory feedback datastore");
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> StorageResult<Arc<Self>> {
        conn.execute_batch(SCHEMA)?;
        Ok(Arc::new(Self {
            conn: Mutex::new(conn),
        }))
    }

    pub(crate) fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Internal("Lock poisoned".into()))
    }
}

// Global datastore instance
static DATASTORE: OnceLock<Arc<Datastore>> = OnceLock::new();

pub fn init_datastore(datastore: Arc<Datastore>) -> StorageResult<()> {
    DATASTORE
        .set(datastore)
        .map_err(|_| StorageError::Internal("Datastore already initialized".into()))
}

pub fn get_datastore() -> StorageResult<Arc<Datastore>> {
    DATASTORE
        .get()
        .cloned()
        .ok_or_else(|| StorageError::Internal("Datastore not initialized".into()))
}
