use std::env;
use std::path::{Path, PathBuf};

use crate::data_bundle::DataBundle;
use crate::datastore::Datastore;
use crate::error::{StorageError, StorageResult};
use crate::FeedbackStore;

pub const DB_PATH_VAR: &str = "FEEDBACK_STORE_DB";
pub const BUNDLE_PATH_VAR: &str = "FEEDBACK_STORE_BUNDLE";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    /// SQLite file. `None` keeps everything in memory.
    pub db_path: Option<PathBuf>,
    /// Data bundle restored right after opening.
    pub bundle_path: Option<PathBuf>,
}

impl StoreConfig {
    /// Reads the configuration from the environment, after loading `.env` if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let path = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
        };
        Self {
            db_path: path(DB_PATH_VAR),
            bundle_path: path(BUNDLE_PATH_VAR),
        }
    }

    pub fn require_db_path(&self) -> StorageResult<&Path> {
        self.db_path
            .as_deref()
            .ok_or(StorageError::MissingConfig(DB_PATH_VAR))
    }

    pub fn open(&self) -> StorageResult<FeedbackStore> {
        let datastore = match &self.db_path {
            Some(path) => Datastore::open(path)?,
            None => Datastore::in_memory()?,
        };
        let store = FeedbackStore::new(datastore);
        if let Some(bundle_path) = &self.bundle_path {
            DataBundle::load(bundle_path)?.persist(&store.questions, &store.responses)?;
        }
        Ok(store)
    }
}
