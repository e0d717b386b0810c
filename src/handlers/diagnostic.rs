//! Service banner, store diagnostics and published entity shapes.

use crate::error::{truncate_diagnostic, AppError};
use crate::model::{all_schemas, EntitySchema};
use crate::response::Message;
use crate::state::AppState;
use axum::{extract::State, http::Uri, Json};
use serde::Serialize;

/// At most this many collection names are reported.
pub const MAX_COLLECTIONS: usize = 10;
const MAX_ERROR_LEN: usize = 50;

#[derive(Debug, Serialize)]
pub struct Diagnostic {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

fn set_or_not(value: &Option<String>) -> String {
    if value.is_some() { "✅ Set" } else { "❌ Not Set" }.to_string()
}

pub async fn root(State(state): State<AppState>) -> Json<Message> {
    Json(Message {
        message: format!("{} Backend Running", state.settings.site_name),
    })
}

/// Report store health. Never fails: problems become text in the report.
pub async fn diagnostic(State(state): State<AppState>) -> Json<Diagnostic> {
    let mut report = Diagnostic {
        backend: "✅ Running".into(),
        database: "❌ Not Available".into(),
        database_url: set_or_not(&state.settings.database_url),
        database_name: set_or_not(&state.settings.database_name),
        connection_status: "❌ Not Connected".into(),
        collections: Vec::new(),
    };
    if let Some(store) = &state.store {
        report.database = "✅ Available".into();
        report.connection_status = format!("✅ Connected to {}", store.database_name());
        match store.list_collections(MAX_COLLECTIONS).await {
            Ok(names) => {
                report.collections = names;
                report.database = "✅ Connected & Working".into();
            }
            Err(e) => {
                tracing::warn!(error = %e, backend = store.backend(), "collection listing failed");
                report.database = format!(
                    "⚠️  Connected but Error: {}",
                    truncate_diagnostic(&e.to_string(), MAX_ERROR_LEN)
                );
            }
        }
    }
    Json(report)
}

pub async fn schema() -> Json<Vec<EntitySchema>> {
    Json(all_schemas())
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
