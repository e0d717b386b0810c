//! Form submission routes. Bodies are size-capped.

use crate::handlers::{submit_contact, submit_prayer};
use crate::state::AppState;
use axum::{routing::post, Router};
use tower_http::limit::RequestBodyLimitLayer;

pub const MAX_SUBMISSION_BYTES: usize = 64 * 1024;

pub fn submission_routes(state: AppState) -> Router {
    Router::new()
        .route("/contact", post(submit_contact))
        .route("/prayer", post(submit_prayer))
        .layer(RequestBodyLimitLayer::new(MAX_SUBMISSION_BYTES))
        .with_state(state)
}
