//! Relational backend connection

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgPool, PgPoolOptions};

use super::query::{BindValue, SqlQuery};
use crate::config::DatabaseConfig;
use crate::error::{Error, Result};
use crate::hydrator::json_i64;

/// Executes built queries and returns each row as a JSON object keyed by
/// select alias.
#[async_trait]
pub trait DbalConnection: Send + Sync {
    async fn fetch_rows(&self, query: &SqlQuery) -> Result<Vec<JsonValue>>;
}

/// `DbalConnection` over a Postgres pool
#[derive(Clone)]
pub struct PgDbalConnection {
    pool: PgPool,
}

impl PgDbalConnection {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(config.pool_min_size)
            .max_connections(config.pool_max_size)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect(&config.url)
            .await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl DbalConnection for PgDbalConnection {
    async fn fetch_rows(&self, query: &SqlQuery) -> Result<Vec<JsonValue>> {
        let sql = query.to_json_sql();
        tracing::trace!(sql = %sql, binds = query.binds().len(), "Executing DBAL query");

        let mut query_builder = sqlx::query_scalar::<_, JsonValue>(&sql);
        for value in query.binds() {
            query_builder = match value {
                BindValue::Int(v) => query_builder.bind(*v),
                BindValue::IntArray(vs) => query_builder.bind(vs.clone()),
                BindValue::Float(v) => query_builder.bind(*v),
                BindValue::Text(v) => query_builder.bind(v.clone()),
            };
        }

        query_builder
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)
    }
}

/// First column value of every row as an id, skipping nulls
pub(crate) fn column_ids(rows: &[JsonValue], column: &str) -> Vec<i64> {
    rows.iter()
        .filter_map(|row| row.get(column))
        .filter_map(json_i64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn column_ids_skip_nulls_and_parse_strings() {
        let rows = vec![
            json!({"id": 3}),
            json!({"id": null}),
            json!({"id": "7"}),
            json!({"other": 1}),
        ];
        assert_eq!(column_ids(&rows, "id"), vec![3, 7]);
    }
}
