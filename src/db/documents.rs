//! Schemaless document collections stored as JSONB rows.
//!
//! Each collection is a set of `(id, data)` pairs. Reads return raw
//! [`Document`]s; callers decode them into typed entities with
//! [`Document::decode`], which fails instead of trusting the stored shape.

use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::PgPool;

use crate::errors::AppError;

pub const PROJECTS: &str = "projects";
pub const MONITORING: &str = "monitoring";
pub const ALERTS: &str = "alerts";
pub const CARBON_CREDITS: &str = "carbon-credits";
pub const DASHBOARD_ALERTS: &str = "dashboard-alerts";
pub const DASHBOARD_REPORTS: &str = "dashboard-reports";

/// A stored document before typed decoding.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    /// Decode the document body into `T`, injecting the document id as `id`.
    ///
    /// Only the shape is checked. Range rules belong to the write path, so
    /// out-of-range values already in storage come back unchanged.
    pub fn decode<T: DeserializeOwned>(self, collection: &'static str) -> Result<T, AppError> {
        let mut data = self.data;
        if let Value::Object(ref mut map) = data {
            map.insert("id".to_string(), Value::String(self.id.clone()));
        }
        serde_json::from_value(data).map_err(|source| AppError::Decode {
            collection,
            id: self.id,
            source,
        })
    }
}

/// Decode every document, failing on the first malformed one.
pub fn decode_all<T: DeserializeOwned>(
    docs: Vec<Document>,
    collection: &'static str,
) -> Result<Vec<T>, AppError> {
    docs.into_iter().map(|d| d.decode(collection)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Equality filters on top-level fields plus optional ordering and limit.
#[derive(Debug, Clone, Default)]
pub struct DocumentQuery {
    filters: Vec<(String, String)>,
    order_by: Option<(String, Direction)>,
    limit: Option<i64>,
}

impl DocumentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<String>) -> Self {
        self.filters.push((field.to_string(), value.into()));
        self
    }

    /// Add an equality filter only when a value is supplied.
    pub fn eq_opt(self, field: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.eq(field, v),
            None => self,
        }
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some((field.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit.max(0));
        self
    }

    /// Render the SQL text; parameter `$1` is always the collection name.
    fn to_sql(&self) -> String {
        let mut conditions = vec!["collection = $1".to_string()];
        let mut param_index = 1u32;

        for _ in &self.filters {
            conditions.push(format!(
                "data ->> ${}::text = ${}",
                param_index + 1,
                param_index + 2
            ));
            param_index += 2;
        }

        let mut sql = format!(
            "SELECT id, data FROM documents WHERE {}",
            conditions.join(" AND ")
        );

        match &self.order_by {
            Some((_, direction)) => {
                param_index += 1;
                let dir = match direction {
                    Direction::Asc => "ASC",
                    Direction::Desc => "DESC",
                };
                sql.push_str(&format!(" ORDER BY data ->> ${param_index}::text {dir}, id"));
            }
            None => sql.push_str(" ORDER BY created_at, id"),
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        sql
    }
}

/// Insert a new document under `id`.
pub async fn insert(
    pool: &PgPool,
    collection: &str,
    id: &str,
    data: &Value,
) -> Result<(), AppError> {
    sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
        .bind(collection)
        .bind(id)
        .bind(data)
        .execute(pool)
        .await?;
    Ok(())
}

/// Insert or overwrite a document under a caller-chosen id.
pub async fn upsert(
    pool: &PgPool,
    collection: &str,
    id: &str,
    data: &Value,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)
        ON CONFLICT (collection, id) DO UPDATE SET data = EXCLUDED.data, updated_at = now()
        "#,
    )
    .bind(collection)
    .bind(id)
    .bind(data)
    .execute(pool)
    .await?;
    Ok(())
}

/// Fetch one document by id.
pub async fn get(pool: &PgPool, collection: &str, id: &str) -> Result<Option<Document>, AppError> {
    let doc = sqlx::query_as::<_, Document>(
        "SELECT id, data FROM documents WHERE collection = $1 AND id = $2",
    )
    .bind(collection)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(doc)
}

/// Fetch every document in a collection matching `query`.
pub async fn find(
    pool: &PgPool,
    collection: &str,
    query: &DocumentQuery,
) -> Result<Vec<Document>, AppError> {
    let sql = query.to_sql();
    let mut q = sqlx::query_as::<_, Document>(&sql).bind(collection);

    for (field, value) in &query.filters {
        q = q.bind(field).bind(value);
    }
    if let Some((field, _)) = &query.order_by {
        q = q.bind(field);
    }

    let docs = q.fetch_all(pool).await?;
    Ok(docs)
}

/// Shallow-merge `patch` into an existing document. Returns false if absent.
pub async fn merge(
    pool: &PgPool,
    collection: &str,
    id: &str,
    patch: &Value,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE documents SET data = data || $3, updated_at = now()
        WHERE collection = $1 AND id = $2
        "#,
    )
    .bind(collection)
    .bind(id)
    .bind(patch)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete a document. Returns false if it did not exist.
pub async fn delete(pool: &PgPool, collection: &str, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
        .bind(collection)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Whether a collection holds no documents at all.
pub async fn is_empty(pool: &PgPool, collection: &str) -> Result<bool, AppError> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM documents WHERE collection = $1)")
            .bind(collection)
            .fetch_one(pool)
            .await?;
    Ok(!exists)
}

/// Fresh document id (time-ordered UUID).
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}
