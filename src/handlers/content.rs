//! Public read endpoints: sermons, events, ministries, stories.

use crate::error::AppError;
use crate::model::{Entity, Event, Ministry, Sermon, Story};
use crate::state::AppState;
use crate::store::{FindQuery, SortOrder};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

pub const SERMON_LIMIT: u32 = 20;
pub const EVENT_LIMIT: u32 = 12;
pub const STORY_LIMIT: u32 = 6;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<u32>,
}

/// Caller's `limit` or `default`; `0` means no limit. A malformed value is a validation error.
fn resolve_limit(params: Result<Query<ListParams>, QueryRejection>, default: u32) -> Result<Option<u32>, AppError> {
    let Query(params) = params.map_err(|rejection| {
        crate::model::ValidationErrors::single("limit", rejection.body_text())
    })?;
    Ok(match params.limit.unwrap_or(default) {
        0 => None,
        n => Some(n),
    })
}

/// Run `query` on the entity's collection and decode every document.
/// A document that does not match the current shape fails the whole request.
async fn fetch<T: Entity>(state: &AppState, query: &FindQuery) -> Result<Vec<T>, AppError> {
    let collection = T::collection();
    let docs = state.store()?.find(&collection, query).await?;
    tracing::debug!(collection = %collection, count = docs.len(), "fetched");
    docs.iter()
        .map(|doc| {
            T::validate(doc).map_err(|e| AppError::Internal(format!("stored {} does not match shape: {}", T::NAME, e)))
        })
        .collect()
}

pub async fn list_sermons(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Sermon>>, AppError> {
    let query = FindQuery {
        limit: resolve_limit(params, SERMON_LIMIT)?,
        ..FindQuery::default()
    };
    let sermons = fetch(&state, &query).await?;
    Ok(Json(sermons))
}

/// Upcoming events only, soonest first.
pub async fn list_events(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Event>>, AppError> {
    let query = FindQuery {
        limit: resolve_limit(params, EVENT_LIMIT)?,
        ..FindQuery::default()
    }
    .since("start_date", Utc::now())
    .sort("start_date", SortOrder::Asc);
    let events = fetch(&state, &query).await?;
    Ok(Json(events))
}

pub async fn list_ministries(State(state): State<AppState>) -> Result<Json<Vec<Ministry>>, AppError> {
    let ministries = fetch(&state, &FindQuery::default()).await?;
    Ok(Json(ministries))
}

/// Newest stories first.
pub async fn list_stories(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Story>>, AppError> {
    let query = FindQuery {
        limit: resolve_limit(params, STORY_LIMIT)?,
        ..FindQuery::default()
    }
    .sort("date", SortOrder::Desc);
    let stories = fetch(&state, &query).await?;
    Ok(Json(stories))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_passes_through() {
        assert_eq!(resolve_limit(Ok(Query(ListParams::default())), 6).unwrap(), Some(6));
        assert_eq!(resolve_limit(Ok(Query(ListParams { limit: Some(3) })), 6).unwrap(), Some(3));
        assert_eq!(resolve_limit(Ok(Query(ListParams { limit: Some(5000) })), 6).unwrap(), Some(5000));
    }

    #[test]
    fn zero_limit_means_unlimited() {
        assert_eq!(resolve_limit(Ok(Query(ListParams { limit: Some(0) })), 6).unwrap(), None);
    }
}
