//! Shared application state

use crate::store::RunStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Reader over the storage root; every request re-reads from disk
    pub store: RunStore,
}

impl AppState {
    pub fn new(store: RunStore) -> Self {
        Self { store }
    }
}
