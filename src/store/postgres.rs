//! PostgreSQL-backed document store. Each collection is a table of JSONB
//! documents inside the schema named after the configured database.

use super::{check_name, DocumentStore, FindQuery, SortOrder, StoreError};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Quote identifier for PostgreSQL.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Clone, Debug)]
pub struct PgDocumentStore {
    pool: PgPool,
    schema: String,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool, database_name: impl Into<String>) -> Self {
        PgDocumentStore {
            pool,
            schema: database_name.into(),
        }
    }

    pub async fn connect(database_url: &str, database_name: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool, database_name))
    }

    fn table(&self, collection: &str) -> Result<String, StoreError> {
        check_name(collection)?;
        Ok(format!("{}.{}", quoted(&self.schema), quoted(collection)))
    }

    /// Create the schema and one table per collection if missing.
    pub async fn ensure_collections(&self, collections: &[String]) -> Result<(), StoreError> {
        sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(&self.schema)))
            .execute(&self.pool)
            .await?;
        for collection in collections {
            let ddl = format!(
                r#"
                CREATE TABLE IF NOT EXISTS {} (
                    id TEXT PRIMARY KEY,
                    doc JSONB NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
                "#,
                self.table(collection)?
            );
            sqlx::query(&ddl).execute(&self.pool).await?;
        }
        Ok(())
    }
}

/// SELECT for a find. When `since` is set the instant is the sole parameter `$1`.
pub(crate) fn find_sql(table: &str, query: &FindQuery) -> Result<String, StoreError> {
    let mut sql = format!("SELECT doc FROM {}", table);
    if let Some((field, _)) = query.since {
        check_name(field)?;
        sql.push_str(&format!(" WHERE (doc->>'{}')::timestamptz >= $1", field));
    }
    match query.sort {
        Some((field, order)) => {
            check_name(field)?;
            let dir = match order {
                SortOrder::Asc => "ASC",
                SortOrder::Desc => "DESC",
            };
            sql.push_str(&format!(
                " ORDER BY (doc->>'{}')::timestamptz {} NULLS LAST, created_at",
                field, dir
            ));
        }
        None => sql.push_str(" ORDER BY created_at, id"),
    }
    if let Some(limit) = query.limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }
    Ok(sql)
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    fn database_name(&self) -> &str {
        &self.schema
    }

    async fn find(&self, collection: &str, query: &FindQuery) -> Result<Vec<Value>, StoreError> {
        let sql = find_sql(&self.table(collection)?, query)?;
        tracing::debug!(sql = %sql, since = ?query.since, "find");
        let mut q = sqlx::query_as::<_, (Value,)>(&sql);
        if let Some((_, at)) = query.since {
            q = q.bind(at);
        }
        let rows = q.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|(doc,)| doc).collect())
    }

    async fn insert(&self, collection: &str, doc: Value) -> Result<String, StoreError> {
        let table = self.table(collection)?;
        let id = uuid::Uuid::new_v4().to_string();
        let sql = format!("INSERT INTO {} (id, doc) VALUES ($1, $2)", table);
        tracing::debug!(sql = %sql, id = %id, "insert");
        sqlx::query(&sql)
            .bind(&id)
            .bind(&doc)
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let sql = format!("SELECT doc FROM {} WHERE id = $1", self.table(collection)?);
        let row: Option<(Value,)> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(doc,)| doc))
    }

    async fn list_collections(&self, limit: usize) -> Result<Vec<String>, StoreError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT table_name::text FROM information_schema.tables WHERE table_schema = $1 ORDER BY table_name LIMIT $2",
        )
        .bind(&self.schema)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_timestamp;
    use serde_json::json;

    #[test]
    fn plain_find_uses_insertion_order() {
        let sql = find_sql("\"ccbc\".\"sermon\"", &FindQuery::default().limit(20)).unwrap();
        assert_eq!(sql, "SELECT doc FROM \"ccbc\".\"sermon\" ORDER BY created_at, id LIMIT 20");
    }

    #[test]
    fn upcoming_events_query() {
        let at = parse_timestamp("2030-01-01").unwrap();
        let q = FindQuery::default()
            .since("start_date", at)
            .sort("start_date", SortOrder::Asc)
            .limit(12);
        let sql = find_sql("t", &q).unwrap();
        assert_eq!(
            sql,
            "SELECT doc FROM t WHERE (doc->>'start_date')::timestamptz >= $1 \
             ORDER BY (doc->>'start_date')::timestamptz ASC NULLS LAST, created_at LIMIT 12"
        );
    }

    #[test]
    fn field_names_are_checked() {
        let q = FindQuery::default().sort("date'; --", SortOrder::Desc);
        assert!(matches!(find_sql("t", &q), Err(StoreError::InvalidName(_))));
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quoted("ccbc"), "\"ccbc\"");
        assert_eq!(quoted("we\"ird"), "\"we\"\"ird\"");
    }

    /// Runs against a live database: `DATABASE_URL=... cargo test -- --ignored`.
    #[tokio::test]
    #[ignore]
    async fn live_find_matches_memory_store() {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            return;
        };
        let schema = format!("ccbc_test_{}", uuid::Uuid::new_v4().simple());
        let store = PgDocumentStore::connect(&url, &schema).await.unwrap();
        let memory = crate::store::MemoryStore::new(schema.as_str());
        store
            .ensure_collections(&["event".to_string(), "sermon".to_string()])
            .await
            .unwrap();

        let docs = [
            json!({ "title": "past", "start_date": "2020-01-01T10:00:00Z" }),
            json!({ "title": "late", "start_date": "2031-06-01T10:00:00Z" }),
            json!({ "title": "undated" }),
            json!({ "title": "early", "start_date": "2030-03-01T10:00:00Z" }),
            json!({ "title": "offset", "start_date": "2030-04-01T10:00:00+02:00" }),
        ];
        for doc in docs {
            store.insert("event", doc.clone()).await.unwrap();
            memory.insert("event", doc).await.unwrap();
        }

        let titles = |docs: Vec<Value>| -> Vec<String> {
            docs.iter().map(|d| d["title"].as_str().unwrap_or_default().to_string()).collect()
        };
        let upcoming = FindQuery::default()
            .since("start_date", parse_timestamp("2025-01-01").unwrap())
            .sort("start_date", SortOrder::Asc);
        let pg = titles(store.find("event", &upcoming).await.unwrap());
        assert_eq!(pg, vec!["early", "offset", "late"]);
        assert_eq!(pg, titles(memory.find("event", &upcoming).await.unwrap()));

        let newest = FindQuery::default().sort("start_date", SortOrder::Desc).limit(4);
        let pg = titles(store.find("event", &newest).await.unwrap());
        assert_eq!(pg, vec!["late", "offset", "early", "past"]);
        assert_eq!(pg, titles(memory.find("event", &newest).await.unwrap()));

        let id = store.insert("sermon", json!({ "title": "Advent" })).await.unwrap();
        assert_eq!(store.get("sermon", &id).await.unwrap(), Some(json!({ "title": "Advent" })));
        assert_eq!(store.list_collections(10).await.unwrap(), vec!["event", "sermon"]);

        sqlx::query(&format!("DROP SCHEMA {} CASCADE", quoted(&schema)))
            .execute(&store.pool)
            .await
            .unwrap();
    }
}
