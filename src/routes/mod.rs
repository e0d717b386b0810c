//! Route tables and the assembled application router.

mod common;
mod content;
mod submission;

pub use common::common_routes;
pub use content::content_routes;
pub use submission::{submission_routes, MAX_SUBMISSION_BYTES};

use crate::handlers::not_found;
use crate::state::AppState;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Every route, with request tracing and an open CORS policy.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(content_routes(state.clone()))
        .merge(submission_routes(state))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
