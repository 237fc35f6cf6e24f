// Backend Test Suite
// Organized by storage unit, shared fixtures live here

use std::sync::Arc;

use crate::data_bundle::DataBundle;
use crate::datastore::Datastore;
use crate::FeedbackStore;



#[cfg(test)]
mod models_tests;

#[cfg(test)]
mod questions_db_tests;





pub(crate) const TYPICAL_DATA_BUNDLE: &str = include_str!("data/typical_data_bundle.json");

/// Fresh in-memory store with nothing in it
pub(crate) fn create_empty_store() -> FeedbackStore {
    let datastore = Datastore::in_memory().expect("Failed to open in-memory datastore");
    FeedbackStore::new(datastore)
}

pub(crate) fn typical_data_bundle() -> DataBundle {
    DataBundle::from_json(TYPICAL_DATA_BUNDLE).expect("Typical data bundle should parse")
}

/// In-memory store restored with the typical data bundle.
/// Returns the bundle as stored so tests can compare against generated ids.
pub(crate) fn create_typical_store() -> (FeedbackStore, DataBundle) {
    let store = create_empty_store();
    let stored = typical_data_bundle()
        .persist(&store.questions, &store.responses)
        .expect("Failed to restore typical data");
    (store, stored)
}

pub(crate) fn shared_datastore() -> Arc<Datastore> {
    Datastore::in_memory().expect("Failed to open in-memory datastore")
}
