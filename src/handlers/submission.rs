//! Form submissions: contact messages and prayer requests.

use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::model::{ContactMessage, Entity, PrayerRequest};
use crate::response::SubmitAck;
use crate::state::AppState;
use crate::store::StoreError;
use axum::{extract::State, Json};

/// Store one validated record in its collection.
async fn persist<T: Entity>(state: &AppState, record: &T) -> Result<Json<SubmitAck>, AppError> {
    let collection = T::collection();
    let doc = serde_json::to_value(record).map_err(StoreError::from)?;
    let id = state.store()?.insert(&collection, doc).await?;
    tracing::info!(collection = %collection, id = %id, "submission stored");
    Ok(Json(SubmitAck::ok(id)))
}

pub async fn submit_contact(
    State(state): State<AppState>,
    ValidatedJson(message): ValidatedJson<ContactMessage>,
) -> Result<Json<SubmitAck>, AppError> {
    persist(&state, &message).await
}

pub async fn submit_prayer(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<PrayerRequest>,
) -> Result<Json<SubmitAck>, AppError> {
    persist(&state, &request).await
}
