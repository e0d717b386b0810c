//! Public content routes.

use crate::handlers::{list_events, list_ministries, list_sermons, list_stories};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn content_routes(state: AppState) -> Router {
    Router::new()
        .route("/sermons", get(list_sermons))
        .route("/events", get(list_events))
        .route("/ministries", get(list_ministries))
        .route("/stories", get(list_stories))
        .with_state(state)
}
