use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::Config;
use crate::store::{MemStorage, SharedStorage};

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStorage,
    pub config: Config,
}

impl AppState {
    /// State backed by a fresh in-memory store.
    pub fn in_memory(config: Config) -> Self {
        Self {
            store: Arc::new(MemStorage::new()),
            config,
        }
    }
}

impl FromRef<AppState> for SharedStorage {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
