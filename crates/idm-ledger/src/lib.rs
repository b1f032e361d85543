//! Ledger Store
//!
//! Key/value byte storage the identity aggregates live in. Each call is
//! atomic for the key it touches; there is no multi-key transaction.
//!
//! Backends:
//! - [`MemoryLedger`] - process-local, also the test fake
//! - `SqliteLedger` - durable, behind the `sqlite` feature

use async_trait::async_trait;

pub mod error;
pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use error::LedgerError;
pub use memory::MemoryLedger;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteLedger;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// A key and the bytes stored under it, as returned by [`LedgerStore::scan`].
pub type KeyValue = (String, Vec<u8>);

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Short backend name for logs and health output.
    fn backend_name(&self) -> &str;

    /// Read the value stored under `key`, `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// All entries with `low <= key < high`, in lexical key order.
    /// An empty `high` leaves the range unbounded above.
    async fn scan(&self, low: &str, high: &str) -> Result<Vec<KeyValue>>;
}

pub(crate) fn check_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(LedgerError::InvalidKey("key must not be empty".to_string()));
    }
    Ok(())
}
