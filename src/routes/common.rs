//! Common routes: banner, diagnostics, schema.

use crate::handlers::{diagnostic, root, schema};
use crate::state::AppState;
use axum::{routing::get, Router};

/// GET /, GET /test, GET /schema.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/test", get(diagnostic))
        .route("/schema", get(schema))
        .with_state(state)
}
