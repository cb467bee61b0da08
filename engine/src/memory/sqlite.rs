//! SQLite history store
//!
//! Rows live in `conversation_history`, ordered by their autoincrement id.
//! The insert and the trim run in one transaction, so concurrent writers of
//! the same key never leave more than `cap` rows behind.

use super::HistoryStore;
use async_trait::async_trait;
use sdk::errors::StoreError;
use sqlx::SqlitePool;

/// History store backed by the engine database
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

#[async_trait]
impl HistoryStore for SqliteStore {
    async fn push_and_trim(&self, key: &str, entry: String, cap: usize) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(backend)?;

        sqlx::query("INSERT INTO conversation_history (key, entry) VALUES (?, ?)")
            .bind(key)
            .bind(&entry)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;

        sqlx::query(
            r#"
            DELETE FROM conversation_history
            WHERE key = ?
              AND id NOT IN (
                  SELECT id FROM conversation_history
                  WHERE key = ?
                  ORDER BY id DESC
                  LIMIT ?
              )
            "#,
        )
        .bind(key)
        .bind(key)
        .bind(cap as i64)
        .execute(&mut *tx)
        .await
        .map_err(backend)?;

        tx.commit().await.map_err(backend)?;

        Ok(())
    }

    async fn range(&self, key: &str) -> Result<Vec<String>, StoreError> {
        sqlx::query_scalar("SELECT entry FROM conversation_history WHERE key = ? ORDER BY id ASC")
            .bind(key)
            .fetch_all(&self.pool)
            .await
            .map_err(backend)
    }
}
