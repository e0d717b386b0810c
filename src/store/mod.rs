//! Document store: named collections of JSON documents keyed by an opaque id.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("invalid name: {0}")]
    InvalidName(String),
    #[error("document encoding: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("store lock poisoned")]
    Poisoned,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Find options. Field names come from code, never from requests.
#[derive(Clone, Debug, Default)]
pub struct FindQuery {
    /// Timestamp field that must be at or after the instant.
    pub since: Option<(&'static str, DateTime<Utc>)>,
    /// Timestamp field to order by; missing values sort last.
    pub sort: Option<(&'static str, SortOrder)>,
    pub limit: Option<u32>,
}

impl FindQuery {
    pub fn since(mut self, field: &'static str, at: DateTime<Utc>) -> Self {
        self.since = Some((field, at));
        self
    }

    pub fn sort(mut self, field: &'static str, order: SortOrder) -> Self {
        self.sort = Some((field, order));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend label for diagnostics.
    fn backend(&self) -> &'static str;

    /// Name of the database (namespace) holding the collections.
    fn database_name(&self) -> &str;

    async fn find(&self, collection: &str, query: &FindQuery) -> Result<Vec<Value>, StoreError>;

    /// Insert one document and return its new id.
    async fn insert(&self, collection: &str, doc: Value) -> Result<String, StoreError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    async fn list_collections(&self, limit: usize) -> Result<Vec<String>, StoreError>;
}

/// Collection, field and database names: lowercase identifier.
pub fn check_name(name: &str) -> Result<(), StoreError> {
    static NAME: OnceLock<Option<Regex>> = OnceLock::new();
    let valid = NAME
        .get_or_init(|| Regex::new(r"^[a-z][a-z0-9_]*$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(name));
    if valid && name.len() <= 63 {
        Ok(())
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}
