//! In-process document store.

use super::{check_name, DocumentStore, FindQuery, SortOrder, StoreError};
use crate::model::parse_timestamp;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

/// Collections kept in memory, each in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    database: String,
    collections: RwLock<HashMap<String, Vec<(String, Value)>>>,
}

impl MemoryStore {
    pub fn new(database: impl Into<String>) -> Self {
        MemoryStore {
            database: database.into(),
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Number of documents in `collection`.
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|c| c.get(collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

fn timestamp_field(doc: &Value, field: &str) -> Option<DateTime<Utc>> {
    doc.get(field).and_then(Value::as_str).and_then(parse_timestamp)
}

fn compare(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match order {
            SortOrder::Asc => a.cmp(&b),
            SortOrder::Desc => b.cmp(&a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn database_name(&self) -> &str {
        &self.database
    }

    async fn find(&self, collection: &str, query: &FindQuery) -> Result<Vec<Value>, StoreError> {
        check_name(collection)?;
        let collections = self.collections.read().map_err(|_| StoreError::Poisoned)?;
        let mut docs: Vec<Value> = collections
            .get(collection)
            .map(|docs| docs.iter().map(|(_, d)| d.clone()).collect())
            .unwrap_or_default();
        drop(collections);

        if let Some((field, at)) = query.since {
            docs.retain(|d| timestamp_field(d, field).is_some_and(|t| t >= at));
        }
        if let Some((field, order)) = query.sort {
            docs.sort_by(|a, b| compare(timestamp_field(a, field), timestamp_field(b, field), order));
        }
        if let Some(limit) = query.limit {
            docs.truncate(limit as usize);
        }
        Ok(docs)
    }

    async fn insert(&self, collection: &str, doc: Value) -> Result<String, StoreError> {
        check_name(collection)?;
        let id = uuid::Uuid::new_v4().to_string();
        let mut collections = self.collections.write().map_err(|_| StoreError::Poisoned)?;
        collections
            .entry(collection.to_string())
            .or_default()
            .push((id.clone(), doc));
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        check_name(collection)?;
        let collections = self.collections.read().map_err(|_| StoreError::Poisoned)?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|(doc_id, _)| doc_id == id))
            .map(|(_, d)| d.clone()))
    }

    async fn list_collections(&self, limit: usize) -> Result<Vec<String>, StoreError> {
        let collections = self.collections.read().map_err(|_| StoreError::Poisoned)?;
        let mut names: Vec<String> = collections.keys().cloned().collect();
        names.sort();
        names.truncate(limit);
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new("test");
        for (title, start) in [
            ("past", "2020-01-01T00:00:00Z"),
            ("later", "2031-06-01T00:00:00Z"),
            ("sooner", "2030-06-01T00:00:00Z"),
        ] {
            store
                .insert("event", json!({ "title": title, "start_date": start }))
                .await
                .unwrap();
        }
        store.insert("event", json!({ "title": "undated" })).await.unwrap();
        store
    }

    fn titles(docs: &[Value]) -> Vec<&str> {
        docs.iter().map(|d| d["title"].as_str().unwrap()).collect()
    }

    #[tokio::test]
    async fn natural_order_is_insertion_order() {
        let store = seeded().await;
        let docs = store.find("event", &FindQuery::default()).await.unwrap();
        assert_eq!(titles(&docs), vec!["past", "later", "sooner", "undated"]);
    }

    #[tokio::test]
    async fn since_excludes_earlier_and_missing() {
        let store = seeded().await;
        let at = parse_timestamp("2025-01-01T00:00:00Z").unwrap();
        let q = FindQuery::default().since("start_date", at).sort("start_date", SortOrder::Asc);
        let docs = store.find("event", &q).await.unwrap();
        assert_eq!(titles(&docs), vec!["sooner", "later"]);
    }

    #[tokio::test]
    async fn descending_sort_puts_missing_last_and_limit_applies() {
        let store = seeded().await;
        let q = FindQuery::default().sort("start_date", SortOrder::Desc);
        let docs = store.find("event", &q).await.unwrap();
        assert_eq!(titles(&docs), vec!["later", "sooner", "past", "undated"]);
        let docs = store.find("event", &q.limit(2)).await.unwrap();
        assert_eq!(titles(&docs), vec!["later", "sooner"]);
    }

    #[tokio::test]
    async fn insert_then_get_by_id() {
        let store = MemoryStore::new("test");
        let id = store.insert("prayerrequest", json!({ "request": "peace" })).await.unwrap();
        assert!(!id.is_empty());
        let doc = store.get("prayerrequest", &id).await.unwrap().unwrap();
        assert_eq!(doc["request"], json!("peace"));
        assert!(store.get("prayerrequest", "missing").await.unwrap().is_none());
        assert_eq!(store.count("prayerrequest"), 1);
    }

    #[tokio::test]
    async fn unknown_collection_is_empty() {
        let store = MemoryStore::new("test");
        assert!(store.find("story", &FindQuery::default()).await.unwrap().is_empty());
        assert!(store.find("Bad Name", &FindQuery::default()).await.is_err());
    }

    #[tokio::test]
    async fn collections_are_listed_sorted_and_capped() {
        let store = seeded().await;
        store.insert("story", json!({})).await.unwrap();
        store.insert("ministry", json!({})).await.unwrap();
        assert_eq!(store.list_collections(10).await.unwrap(), vec!["event", "ministry", "story"]);
        assert_eq!(store.list_collections(1).await.unwrap(), vec!["event"]);
    }
}
