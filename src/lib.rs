//! Content API for the CCBC Murrieta website.
//!
//! Read endpoints for sermons, events, ministries and stories, plus the
//! contact and prayer-request forms, over a pluggable document store.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod state;
pub mod store;

pub use config::Settings;
pub use error::{AppError, ConfigError};
pub use model::Entity;
pub use routes::app;
pub use state::AppState;
pub use store::{DocumentStore, MemoryStore, PgDocumentStore};
