pub mod config;
pub mod data_bundle;
pub mod datastore;
pub mod error;
pub mod logging;
pub mod models;
pub mod questions_db;
pub mod responses_db;
pub mod validation;

#[cfg(test)]
mod tests;

use std::sync::Arc;

pub use config::StoreConfig;
pub use data_bundle::DataBundle;
pub use datastore::{get_datastore, init_datastore, Datastore};
pub use error::{StorageError, StorageResult, NULL_INPUT_MARKER};
pub use logging::init_tracing;
pub use models::{FeedbackQuestion, FeedbackQuestionType, FeedbackResponse, ResponseDetails};
pub use questions_db::FeedbackQuestionsDb;
pub use responses_db::FeedbackResponsesDb;

/// Both stores over one datastore.
pub struct FeedbackStore {
    pub questions: FeedbackQuestionsDb,
    pub responses: FeedbackResponsesDb,
}

impl FeedbackStore {
    pub fn new(datastore: Arc<Datastore>) -> Self {
        Self {
            questions: FeedbackQuestionsDb::new(Arc::clone(&datastore)),
            responses: FeedbackResponsesDb::new(datastore),
        }
    }

    /// Opens the store described by the environment.
    pub fn from_env() -> StorageResult<Self> {
        StoreConfig::from_env().open()
    }

    /// Opens the process-wide datastore installed with [`init_datastore`].
    pub fn global() -> StorageResult<Self> {
        Ok(Self::new(get_datastore()?))
    }
}
