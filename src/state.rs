//! Shared application state for all routes. Built once at startup and injected into the router.

use crate::config::Settings;
use crate::error::AppError;
use crate::store::DocumentStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// `None` when no database is configured or the connection failed at startup.
    pub store: Option<Arc<dyn DocumentStore>>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(settings: Settings, store: Option<Arc<dyn DocumentStore>>) -> Self {
        AppState {
            store,
            settings: Arc::new(settings),
        }
    }

    /// The store, or `StoreUnavailable` if there is none.
    pub fn store(&self) -> Result<&dyn DocumentStore, AppError> {
        self.store
            .as_deref()
            .ok_or_else(|| AppError::StoreUnavailable("database is not configured".into()))
    }
}
