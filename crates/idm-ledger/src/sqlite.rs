use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Row, Sqlite};
use tracing::{debug, info};

use crate::{check_key, KeyValue, LedgerStore, Result};

/// SQLite-backed ledger: one row per key in `ledger_state`.
pub struct SqliteLedger {
    pool: Pool<Sqlite>,
}

impl SqliteLedger {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Open a pool for `url` and make sure the schema exists.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;
        let ledger = Self::new(pool);
        ledger.init_schema().await?;
        Ok(ledger)
    }

    /// Create the state table
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS ledger_state (
                key TEXT PRIMARY KEY NOT NULL,
                value BLOB NOT NULL,
                updated_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("SQLite ledger schema initialized");
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for SqliteLedger {
    fn backend_name(&self) -> &str {
        "sqlite"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        check_key(key)?;
        let row = sqlx::query("SELECT value FROM ledger_state WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get::<Vec<u8>, _>("value")))
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        check_key(key)?;
        sqlx::query(
            r#"
            INSERT INTO ledger_state (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await?;

        debug!(key, "Ledger state written");
        Ok(())
    }

    async fn scan(&self, low: &str, high: &str) -> Result<Vec<KeyValue>> {
        let rows = if high.is_empty() {
            sqlx::query("SELECT key, value FROM ledger_state WHERE key >= ? ORDER BY key")
                .bind(low)
                .fetch_all(&self.pool)
                .await?
        } else {
            sqlx::query(
                "SELECT key, value FROM ledger_state WHERE key >= ? AND key < ? ORDER BY key",
            )
            .bind(low)
            .bind(high)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(rows
            .into_iter()
            .map(|row| (row.get::<String, _>("key"), row.get::<Vec<u8>, _>("value")))
            .collect())
    }
}
